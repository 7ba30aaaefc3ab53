use std::sync::Arc;

use cotiza::{Cotiza, CotizaConfig, CotizaError, SnapshotStore, Transport};
use cotiza_providers::{HttpTransport, default_chain};

/// Environment variable that switches the demos to fixture data.
pub const USE_MOCK_ENV: &str = "COTIZA_DEMOS_USE_MOCK";

/// Transport for demos: fixtures when `COTIZA_DEMOS_USE_MOCK` is set, HTTP otherwise.
#[must_use]
pub fn get_transport() -> Arc<dyn Transport> {
    if std::env::var(USE_MOCK_ENV).is_ok() {
        println!("--- (Using mock transport for CI) ---");
        Arc::new(cotiza_mock::MockTransport::new())
    } else {
        Arc::new(HttpTransport::new())
    }
}

/// Orchestrator over the production provider chain.
///
/// # Errors
/// Returns an error if the configuration is invalid.
pub fn build_cotiza(
    cfg: CotizaConfig,
    store: Option<Arc<dyn SnapshotStore>>,
) -> Result<Cotiza, CotizaError> {
    let mut builder = Cotiza::builder()
        .with_providers(default_chain(&cfg)?)
        .transport(get_transport())
        .config(cfg);
    if let Some(store) = store {
        builder = builder.store(store);
    }
    builder.build()
}
