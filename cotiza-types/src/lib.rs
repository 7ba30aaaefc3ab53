//! Cotiza-specific data transfer objects and configuration primitives.
#![warn(missing_docs)]

mod code;
mod config;
mod error;
mod snapshot;

pub use code::{AllowList, CurrencyCode};
pub use config::{CotizaConfig, DEFAULT_CACHE_KEY, DEFAULT_PROVIDER_TIMEOUT};
pub use error::CotizaError;
pub use snapshot::{RateSnapshot, is_valid_rate};
