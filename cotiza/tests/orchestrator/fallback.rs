use cotiza::{CotizaError, CurrencyCode, OrchestrationState, Status};
use cotiza_core::SnapshotStore;
use cotiza_mock::MockBehavior;
use serde_json::json;

use crate::helpers::*;

#[tokio::test]
async fn first_success_stops_the_chain() {
    let h = harness();
    h.controller.set_behavior(A, ok(1400.5, 0.93)).await;
    h.controller.set_behavior(B, ok(1.0, 1.0)).await;
    h.controller.set_behavior(C, ok(2.0, 2.0)).await;

    let res = h.cotiza.resolve().await;

    assert_eq!(res.state.status(), Status::Success);
    assert_eq!(res.state.snapshot().unwrap().provider(), A);
    assert_eq!(h.controller.calls(A).await, 1);
    assert_eq!(h.controller.calls(B).await, 0);
    assert_eq!(h.controller.calls(C).await, 0);
    assert_eq!(res.attempts.len(), 1);
    assert!(res.attempts[0].accepted());
}

#[tokio::test]
async fn falls_through_to_the_third_provider() {
    let h = harness();
    h.controller.set_behavior(A, transport_err(A)).await;
    h.controller.set_behavior(B, transport_err(B)).await;
    h.controller.set_behavior(C, ok(1400.0, 0.93)).await;

    let res = h.cotiza.resolve().await;

    match &res.state {
        OrchestrationState::Success(s) => {
            assert_eq!(s.provider(), C);
            assert_eq!(s.rate(CurrencyCode::ARS), Some(1400.0));
        }
        other => panic!("expected success, got {other:?}"),
    }
    assert_eq!(h.controller.call_order().await, [A, B, C]);
    let providers: Vec<_> = res.attempts.iter().map(|a| a.provider).collect();
    assert_eq!(providers, [A, B, C]);
    assert!(res.attempts[0].error.as_ref().is_some_and(CotizaError::is_transport));
}

#[tokio::test]
async fn malformed_and_non_2xx_bodies_fall_through() {
    let h = harness();
    h.controller
        .set_behavior(A, MockBehavior::Return(json!({ "result": "error" })))
        .await;
    h.controller.set_behavior(B, http_err(B, 429)).await;
    h.controller.set_behavior(C, ok(1.5, 2.5)).await;

    let res = h.cotiza.resolve().await;

    assert_eq!(res.state.snapshot().unwrap().provider(), C);
    assert!(matches!(
        res.attempts[0].error,
        Some(CotizaError::MalformedResponse { .. })
    ));
    assert!(matches!(
        res.attempts[1].error,
        Some(CotizaError::Transport {
            status: Some(429),
            ..
        })
    ));
}

#[tokio::test]
async fn success_is_persisted_before_it_is_reported() {
    let h = harness();
    h.controller.set_behavior(A, ok(1400.5, 0.93)).await;

    let res = h.cotiza.resolve().await;

    let saved = h.store.load().expect("snapshot persisted");
    assert_eq!(Some(&saved), res.state.snapshot());
}

#[tokio::test]
async fn all_failing_serves_the_cached_snapshot_verbatim() {
    let h = harness();
    h.store.save(&saved_snapshot());
    for p in [A, B, C] {
        h.controller.set_behavior(p, transport_err(p)).await;
    }

    let res = h.cotiza.resolve().await;

    match &res.state {
        OrchestrationState::Cached { snapshot, advisory } => {
            assert_eq!(snapshot, &saved_snapshot());
            assert_eq!(
                snapshot.fetched_at_epoch_ms(),
                saved_snapshot().fetched_at_epoch_ms()
            );
            assert_eq!(advisory, cotiza::CACHED_ADVISORY);
        }
        other => panic!("expected cached, got {other:?}"),
    }
    assert_eq!(res.attempts.len(), 3);
    assert!(res.attempts.iter().all(|a| !a.accepted()));
    // Serving from cache does not rewrite the slot.
    assert_eq!(h.store.load(), Some(saved_snapshot()));
}

#[tokio::test]
async fn all_failing_without_cache_is_an_error() {
    let h = harness();
    for p in [A, B, C] {
        h.controller.set_behavior(p, transport_err(p)).await;
    }

    let res = h.cotiza.resolve().await;

    assert_eq!(
        res.state,
        OrchestrationState::Error {
            message: "could not fetch rates from any source".into()
        }
    );
    match res.into_snapshot() {
        Err(CotizaError::NoProviderAvailable { attempts }) => assert_eq!(attempts.len(), 3),
        other => panic!("expected NoProviderAvailable, got {other:?}"),
    }
}

#[tokio::test]
async fn unreadable_cache_is_treated_as_absent() {
    use std::sync::Arc;

    use cotiza_core::{KeyValueStorage, MemoryStorage, SnapshotCache};

    let storage = Arc::new(MemoryStorage::new());
    storage.set("fxCache", "{\"base\":").unwrap();
    let (transport, controller) = cotiza_mock::DynamicMockTransport::new_with_controller();
    let cotiza = cotiza::Cotiza::builder()
        .with_provider(Arc::new(cotiza_mock::StaticProvider::new(A).unwrap()))
        .transport(transport)
        .store(Arc::new(SnapshotCache::new(storage, "fxCache")))
        .build()
        .unwrap();
    controller.set_behavior(A, transport_err(A)).await;

    let res = cotiza.resolve().await;
    assert_eq!(res.state.status(), Status::Error);
}

#[tokio::test]
async fn each_run_starts_again_from_the_first_provider() {
    let h = harness();
    h.controller.set_behavior(A, transport_err(A)).await;
    h.controller.set_behavior(B, ok(1.0, 1.0)).await;

    h.cotiza.resolve().await;
    h.controller.set_behavior(A, ok(2.0, 2.0)).await;
    let second = h.cotiza.resolve().await;

    assert_eq!(second.state.snapshot().unwrap().provider(), A);
    assert_eq!(h.controller.call_order().await, [A, B, A]);
    assert_eq!(h.store.load().unwrap().provider(), A);
}

#[tokio::test]
async fn every_request_is_the_providers_own() {
    let h = harness();
    h.controller.set_behavior(A, transport_err(A)).await;
    h.controller.set_behavior(B, ok(1.0, 1.0)).await;

    h.cotiza.resolve().await;

    let reqs = h.controller.requests(B).await;
    assert_eq!(reqs.len(), 1);
    assert_eq!(reqs[0].url.query(), Some("provider=B"));
    assert!(
        reqs[0]
            .headers
            .iter()
            .any(|(k, v)| k == "cache-control" && v == "no-cache")
    );
}
