//! Re-export of foundational types from `cotiza-types`.
// Consolidated re-exports so downstream crates can depend on `cotiza-core` only

pub use cotiza_types::{
    AllowList, CotizaConfig, CotizaError, CurrencyCode, DEFAULT_CACHE_KEY,
    DEFAULT_PROVIDER_TIMEOUT, RateSnapshot, is_valid_rate,
};
