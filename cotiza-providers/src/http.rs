use async_trait::async_trait;
use cotiza_core::{CotizaError, RequestSpec, Transport};
use serde_json::Value;

/// `Transport` over a shared `reqwest::Client`.
///
/// Dropping the returned future aborts the in-flight request, which is how
/// per-attempt timeouts and run teardown cancel network work.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Transport with a default client.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Transport reusing an existing client (proxies, TLS settings, pooling).
    #[must_use]
    pub const fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "cotiza_providers::http::get_json",
            skip(self, req),
            fields(url = %req.url),
        )
    )]
    async fn get_json(&self, provider: &str, req: &RequestSpec) -> Result<Value, CotizaError> {
        let mut builder = self.client.get(req.url.clone());
        for (name, value) in &req.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        let resp = builder
            .send()
            .await
            .map_err(|e| CotizaError::transport(provider, e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(CotizaError::http_status(provider, status.as_u16()));
        }
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| CotizaError::transport(provider, e.to_string()))?;
        serde_json::from_slice(&bytes)
            .map_err(|e| CotizaError::malformed(provider, format!("body is not JSON: {e}")))
    }
}
