use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for the cotiza workspace.
///
/// Per-provider failures (`Transport`, `ProviderTimeout`, `MalformedResponse`) are
/// recovered by the orchestrator and only surface in attempt reports; the consumer
/// observes `NoProviderAvailable` as the sole terminal error.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CotizaError {
    /// Network unreachable, DNS failure, or a non-2xx HTTP status.
    #[error("{provider} transport failed: {msg}")]
    Transport {
        /// Provider label the request was issued for.
        provider: String,
        /// Human-readable error message.
        msg: String,
        /// HTTP status when the server answered with a non-success code.
        status: Option<u16>,
    },

    /// An individual attempt exceeded its deadline.
    #[error("{provider} timed out after {timeout_ms} ms")]
    ProviderTimeout {
        /// Provider label that timed out.
        provider: String,
        /// Deadline that was exceeded.
        timeout_ms: u64,
    },

    /// A response arrived but lacks the provider-specific required fields.
    #[error("malformed response from {provider}: {detail}")]
    MalformedResponse {
        /// Provider label that produced the body.
        provider: String,
        /// Short diagnostic of what was missing or invalid.
        detail: String,
    },

    /// Every provider failed and no cached snapshot exists.
    #[error("could not fetch rates from any source")]
    NoProviderAvailable {
        /// The individual failures, in attempt order.
        attempts: Vec<CotizaError>,
    },

    /// A cached value exists but could not be read or parsed.
    #[error("cache read failed: {0}")]
    CacheRead(String),

    /// The snapshot slot could not be written.
    #[error("cache write failed: {0}")]
    CacheWrite(String),

    /// Invalid input argument or configuration.
    #[error("invalid argument: {0}")]
    InvalidArg(String),
}

impl CotizaError {
    /// Helper: build a `Transport` error without an HTTP status.
    pub fn transport(provider: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Transport {
            provider: provider.into(),
            msg: msg.into(),
            status: None,
        }
    }

    /// Helper: build a `Transport` error for a non-2xx HTTP status.
    pub fn http_status(provider: impl Into<String>, status: u16) -> Self {
        Self::Transport {
            provider: provider.into(),
            msg: format!("HTTP {status}"),
            status: Some(status),
        }
    }

    /// Helper: build a `ProviderTimeout` error.
    pub fn provider_timeout(provider: impl Into<String>, timeout: std::time::Duration) -> Self {
        Self::ProviderTimeout {
            provider: provider.into(),
            timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// Helper: build a `MalformedResponse` error.
    pub fn malformed(provider: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::MalformedResponse {
            provider: provider.into(),
            detail: detail.into(),
        }
    }

    /// Returns true for transport-level failures, timeouts included.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::ProviderTimeout { .. })
    }

    /// Provider label attached to a per-attempt error, if any.
    #[must_use]
    pub fn provider(&self) -> Option<&str> {
        match self {
            Self::Transport { provider, .. }
            | Self::ProviderTimeout { provider, .. }
            | Self::MalformedResponse { provider, .. } => Some(provider),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for CotizaError {
    fn from(e: serde_json::Error) -> Self {
        Self::CacheRead(e.to_string())
    }
}
