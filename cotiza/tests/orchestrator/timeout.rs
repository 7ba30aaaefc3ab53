use std::time::Duration;

use cotiza::{CotizaError, Status};
use cotiza_mock::MockBehavior;
use tokio::time::Instant;

use crate::helpers::*;

#[tokio::test(start_paused = true)]
async fn hung_provider_is_abandoned_at_the_deadline() {
    let h = harness();
    h.controller.set_behavior(A, MockBehavior::Hang).await;
    h.controller.set_behavior(B, ok(1400.0, 0.9)).await;

    let start = Instant::now();
    let res = h.cotiza.resolve().await;
    let elapsed = start.elapsed();

    assert_eq!(res.state.snapshot().unwrap().provider(), B);
    assert!(elapsed >= DEADLINE, "{elapsed:?}");
    assert!(elapsed < DEADLINE * 2, "{elapsed:?}");
    assert_eq!(
        res.attempts[0].error,
        Some(CotizaError::ProviderTimeout {
            provider: A.into(),
            timeout_ms: 8000,
        })
    );
    // The stalled request was dropped, not left running.
    assert_eq!(h.controller.in_flight(), 0);
}

#[tokio::test(start_paused = true)]
async fn total_time_is_bounded_by_deadline_times_attempts() {
    let h = harness();
    for p in [A, B, C] {
        h.controller.set_behavior(p, MockBehavior::Hang).await;
    }

    let start = Instant::now();
    let res = h.cotiza.resolve().await;
    let elapsed = start.elapsed();

    assert_eq!(res.state.status(), Status::Error);
    assert!(elapsed >= DEADLINE * 3, "{elapsed:?}");
    assert!(elapsed <= DEADLINE * 3 + Duration::from_millis(50), "{elapsed:?}");
    assert!(
        res.attempts
            .iter()
            .all(|a| matches!(a.error, Some(CotizaError::ProviderTimeout { .. })))
    );
}

#[tokio::test(start_paused = true)]
async fn slow_but_timely_provider_still_wins() {
    let h = harness();
    h.controller
        .set_behavior(
            A,
            MockBehavior::Delayed(
                Duration::from_millis(7_900),
                cotiza_mock::fixtures::simple(1.0, 1.0),
            ),
        )
        .await;

    let res = h.cotiza.resolve().await;

    assert_eq!(res.state.snapshot().unwrap().provider(), A);
    assert_eq!(h.controller.calls(B).await, 0);
    assert!(res.attempts[0].elapsed >= Duration::from_millis(7_900));
}

#[tokio::test(start_paused = true)]
async fn custom_deadline_is_honored() {
    let (transport, controller) = cotiza_mock::DynamicMockTransport::new_with_controller();
    let cotiza = cotiza::Cotiza::builder()
        .with_provider(std::sync::Arc::new(
            cotiza_mock::StaticProvider::new(A).unwrap(),
        ))
        .transport(transport)
        .provider_timeout(Duration::from_millis(250))
        .build()
        .unwrap();
    controller.set_behavior(A, MockBehavior::Hang).await;

    let start = Instant::now();
    let res = cotiza.resolve().await;
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_millis(250), "{elapsed:?}");
    assert!(elapsed < Duration::from_millis(300), "{elapsed:?}");
    assert!(matches!(
        res.attempts[0].error,
        Some(CotizaError::ProviderTimeout {
            timeout_ms: 250,
            ..
        })
    ));
}
