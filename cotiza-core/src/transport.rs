use async_trait::async_trait;
use serde_json::Value;

use crate::{CotizaError, RequestSpec};

/// Performs the network round trip for a provider request.
///
/// Dropping the returned future must abandon the request; the orchestrator relies
/// on this for per-attempt timeouts and consumer teardown.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Execute `req` on behalf of `provider` and decode the body as JSON.
    ///
    /// # Errors
    /// `Transport` for connection failures and non-2xx statuses, `MalformedResponse`
    /// when the body is not JSON.
    async fn get_json(&self, provider: &str, req: &RequestSpec) -> Result<Value, CotizaError>;
}
