//! cotiza-mock
//!
//! Test doubles for the cotiza workspace:
//! - [`MockTransport`]: answers the three production providers with fixed fixture
//!   bodies, for CI-safe demos.
//! - [`DynamicMockTransport`]: per-provider scripted behaviors driven from a
//!   [`DynamicMockController`], with call counting.
//! - [`StaticProvider`]: a minimal `RateProvider` with an arbitrary label.
#![warn(missing_docs)]

use async_trait::async_trait;
use cotiza_core::{CotizaError, RequestSpec, Transport};
use serde_json::Value;

mod dynamic;
pub mod fixtures;
mod provider;

pub use dynamic::{DynamicMockController, DynamicMockTransport, MockBehavior};
pub use provider::StaticProvider;

/// Transport serving deterministic fixture bodies keyed by provider label.
///
/// Labels of the production adapters get their upstream-shaped fixture; the labels
/// `"FAIL"` and `"TIMEOUT"` simulate a transport error and a slow upstream.
#[derive(Debug, Default, Clone, Copy)]
pub struct MockTransport;

impl MockTransport {
    /// Create the mock transport.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get_json(&self, provider: &str, _req: &RequestSpec) -> Result<Value, CotizaError> {
        match provider {
            "FAIL" => Err(CotizaError::transport(provider, "forced failure")),
            "TIMEOUT" => {
                // Keep short to avoid slowing tests; the orchestrator may time out
                // depending on its configured deadline.
                tokio::time::sleep(std::time::Duration::from_millis(200)).await;
                Err(CotizaError::transport(provider, "upstream too slow"))
            }
            _ => fixtures::body_for(provider)
                .ok_or_else(|| CotizaError::http_status(provider, 404)),
        }
    }
}
