use std::time::Duration;

use cotiza::{OrchestrationState, Status};
use cotiza_core::SnapshotStore;
use cotiza_mock::MockBehavior;

use crate::helpers::*;

#[tokio::test(start_paused = true)]
async fn states_go_idle_loading_success() {
    let h = harness();
    h.controller
        .set_behavior(
            A,
            MockBehavior::Delayed(Duration::from_millis(100), cotiza_mock::fixtures::simple(1.0, 2.0)),
        )
        .await;

    let mut sub = h.cotiza.resolve_rates();
    assert_eq!(sub.current(), OrchestrationState::Idle);

    let next = sub.changed().await.expect("loading");
    assert_eq!(next, OrchestrationState::Loading);

    let last = sub.changed().await.expect("terminal");
    assert_eq!(last.status(), Status::Success);
    assert_eq!(last.snapshot().unwrap().provider(), A);

    // Run finished; nothing further is delivered.
    assert_eq!(sub.changed().await, None);
    assert!(sub.is_finished());
}

#[tokio::test]
async fn wait_terminal_reports_cached_fallback() {
    let h = harness();
    h.store.save(&saved_snapshot());
    for p in [A, B, C] {
        h.controller.set_behavior(p, http_err(p, 502)).await;
    }

    let mut sub = h.cotiza.resolve_rates();
    let state = sub.wait_terminal().await.expect("terminal state");

    assert!(state.is_cached());
    assert_eq!(state.snapshot(), Some(&saved_snapshot()));
}

#[tokio::test(start_paused = true)]
async fn cancel_drops_the_in_flight_attempt_and_stops_delivery() {
    let h = harness();
    h.controller.set_behavior(A, MockBehavior::Hang).await;
    h.controller.set_behavior(B, ok(1.0, 1.0)).await;

    let mut sub = h.cotiza.resolve_rates();
    assert_eq!(sub.changed().await, Some(OrchestrationState::Loading));
    settle().await;
    assert_eq!(h.controller.in_flight(), 1);

    sub.cancel();
    assert!(sub.is_cancelled());

    // Far past A's deadline: had the run survived it would have moved on to B.
    tokio::time::sleep(DEADLINE * 4).await;

    assert_eq!(h.controller.in_flight(), 0);
    assert_eq!(h.controller.calls(B).await, 0);
    assert_eq!(sub.current(), OrchestrationState::Loading);
    assert_eq!(sub.changed().await, None);
    assert_eq!(sub.wait_terminal().await, None);
    assert_eq!(h.store.load(), None);
}

#[tokio::test(start_paused = true)]
async fn dropping_the_subscription_tears_the_run_down() {
    let h = harness();
    h.controller
        .set_behavior(
            A,
            MockBehavior::Delayed(Duration::from_secs(1), cotiza_mock::fixtures::simple(1.0, 1.0)),
        )
        .await;

    let mut sub = h.cotiza.resolve_rates();
    assert_eq!(sub.changed().await, Some(OrchestrationState::Loading));
    settle().await;
    drop(sub);

    tokio::time::sleep(Duration::from_secs(5)).await;

    assert_eq!(h.controller.in_flight(), 0);
    // The attempt never completed, so nothing was persisted.
    assert_eq!(h.store.load(), None);
}

#[tokio::test]
async fn cancel_after_completion_keeps_the_terminal_state() {
    let h = harness();
    h.controller.set_behavior(A, ok(1400.5, 0.93)).await;

    let mut sub = h.cotiza.resolve_rates();
    let state = sub.wait_terminal().await.expect("terminal");
    sub.cancel();

    assert_eq!(sub.current(), state);
    assert_eq!(h.store.load().as_ref(), state.snapshot());
}

#[tokio::test]
async fn concurrent_runs_are_independent() {
    let h = harness();
    h.controller.set_behavior(A, ok(1.0, 1.0)).await;

    let mut first = h.cotiza.resolve_rates();
    let mut second = h.cotiza.resolve_rates();

    assert_eq!(first.wait_terminal().await.unwrap().status(), Status::Success);
    assert_eq!(second.wait_terminal().await.unwrap().status(), Status::Success);
    assert_eq!(h.controller.calls(A).await, 2);
}
