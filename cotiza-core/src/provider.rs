use serde_json::Value;
use url::Url;

use crate::{CotizaError, CurrencyCode, RateSnapshot};

/// Header every provider request carries so intermediaries never serve stale bodies.
pub const NO_CACHE: (&str, &str) = ("cache-control", "no-cache");

/// Fully-resolved description of one provider request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSpec {
    /// Target endpoint including any query parameters.
    pub url: Url,
    /// Extra request headers, in insertion order.
    pub headers: Vec<(String, String)>,
}

impl RequestSpec {
    /// A GET request for `url` carrying the no-cache header.
    #[must_use]
    pub fn get(url: Url) -> Self {
        Self {
            url,
            headers: vec![(NO_CACHE.0.to_string(), NO_CACHE.1.to_string())],
        }
    }

    /// Append a header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Provider-specific translator from one upstream response shape to a `RateSnapshot`.
///
/// Implementations are pure: `build_request` is constant for a given instance and
/// `normalize` performs no I/O. The request contract (endpoint, reference currency,
/// targets) is fixed at construction so new currencies or mirrors never require
/// changes to the orchestrator.
pub trait RateProvider: Send + Sync {
    /// Human-readable provider label, also stamped into produced snapshots.
    fn name(&self) -> &'static str;

    /// Reference currency this adapter is pinned to, if any.
    ///
    /// `None` means the base is whatever the upstream body reports.
    fn base(&self) -> Option<CurrencyCode> {
        None
    }

    /// Describe the request that fetches this provider's latest rates.
    fn build_request(&self) -> RequestSpec;

    /// Validate a raw body and convert it into a snapshot.
    ///
    /// Unknown fields are ignored and only allow-listed currencies are emitted.
    ///
    /// # Errors
    /// Returns `CotizaError::MalformedResponse` when the provider's required fields are
    /// missing or invalid. No other variant is ever returned.
    fn normalize(&self, body: &Value) -> Result<RateSnapshot, CotizaError>;
}
