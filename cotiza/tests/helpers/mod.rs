// Shared fixtures so tests can `use helpers::*;`
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use cotiza::{Cotiza, CotizaError, CurrencyCode, RateProvider, RateSnapshot};
use cotiza_core::{SnapshotCache, SnapshotStore};
use cotiza_mock::{DynamicMockController, DynamicMockTransport, MockBehavior, StaticProvider};

/// Provider labels, in priority order.
pub const A: &str = "A";
pub const B: &str = "B";
pub const C: &str = "C";

pub const DEADLINE: Duration = Duration::from_millis(8000);

/// Orchestrator over providers `A`, `B`, `C` with a scripted transport and an
/// in-memory store the test can inspect.
pub struct Harness {
    pub cotiza: Cotiza,
    pub controller: DynamicMockController,
    pub store: Arc<SnapshotCache>,
}

pub fn harness() -> Harness {
    harness_with(&[A, B, C])
}

pub fn harness_with(names: &[&'static str]) -> Harness {
    let (transport, controller) = DynamicMockTransport::new_with_controller();
    let store = Arc::new(SnapshotCache::in_memory());
    let providers = names.iter().map(|&n| {
        Arc::new(StaticProvider::new(n).expect("valid mock provider")) as Arc<dyn RateProvider>
    });
    let cotiza = Cotiza::builder()
        .with_providers(providers)
        .transport(transport)
        .store(Arc::clone(&store) as Arc<dyn SnapshotStore>)
        .provider_timeout(DEADLINE)
        .build()
        .expect("valid orchestrator");
    Harness {
        cotiza,
        controller,
        store,
    }
}

/// Body `StaticProvider` accepts.
pub fn ok(ars: f64, eur: f64) -> MockBehavior {
    MockBehavior::Return(cotiza_mock::fixtures::simple(ars, eur))
}

pub fn transport_err(provider: &str) -> MockBehavior {
    MockBehavior::Fail(CotizaError::transport(provider, "connection refused"))
}

pub fn http_err(provider: &str, status: u16) -> MockBehavior {
    MockBehavior::Fail(CotizaError::http_status(provider, status))
}

/// A snapshot as an earlier run would have saved it.
pub fn saved_snapshot() -> RateSnapshot {
    RateSnapshot::new_at(
        CurrencyCode::USD,
        "2025-10-01",
        [(CurrencyCode::ARS, 1350.0), (CurrencyCode::EUR, 0.91)]
            .into_iter()
            .collect(),
        "api.frankfurter.app",
        1_727_740_800_000,
    )
    .expect("valid snapshot")
}

/// Let spawned tasks (and aborts) make progress.
pub async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}
