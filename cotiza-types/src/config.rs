//! Configuration shared by the orchestrator and the provider adapters.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{AllowList, CotizaError, CurrencyCode};

/// Default per-attempt deadline.
pub const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_millis(8000);

/// Default name of the persisted snapshot slot.
pub const DEFAULT_CACHE_KEY: &str = "fxCache";

/// Global configuration for the `Cotiza` orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CotizaConfig {
    /// Reference currency requested from every provider.
    pub base: CurrencyCode,
    /// Currencies reported on; adapters drop everything else.
    pub allow_list: AllowList,
    /// Deadline for each individual provider attempt.
    pub provider_timeout: Duration,
    /// Name of the single persisted snapshot slot.
    pub cache_key: String,
}

impl Default for CotizaConfig {
    fn default() -> Self {
        Self {
            base: CurrencyCode::USD,
            allow_list: AllowList::default(),
            provider_timeout: DEFAULT_PROVIDER_TIMEOUT,
            cache_key: DEFAULT_CACHE_KEY.to_string(),
        }
    }
}

impl CotizaConfig {
    /// Check the configuration for values no run could work with.
    ///
    /// # Errors
    /// Returns `InvalidArg` for an empty allow-list, a zero timeout, or an empty cache key.
    pub fn validate(&self) -> Result<(), CotizaError> {
        if self.allow_list.is_empty() {
            return Err(CotizaError::InvalidArg("allow-list cannot be empty".into()));
        }
        if self.provider_timeout.is_zero() {
            return Err(CotizaError::InvalidArg(
                "provider timeout must be greater than zero".into(),
            ));
        }
        if self.cache_key.trim().is_empty() {
            return Err(CotizaError::InvalidArg("cache key cannot be empty".into()));
        }
        Ok(())
    }
}
