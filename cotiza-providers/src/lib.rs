//! cotiza-providers
//!
//! The three public exchange-rate sources the orchestrator falls back across,
//! each implementing `RateProvider`, plus `HttpTransport`, the `reqwest`-backed
//! `Transport` used in production.
//!
//! Priority order, as returned by [`default_chain`]:
//! 1. [`OpenErApi`] (`open.er-api.com`)
//! 2. [`Frankfurter`] (`api.frankfurter.app`)
//! 3. [`FawazCurrencyApi`] (daily static snapshot served through jsDelivr)
#![warn(missing_docs)]

mod fawaz;
mod frankfurter;
mod http;
mod open_er;
mod project;

use std::sync::Arc;

use cotiza_core::{CotizaConfig, CotizaError, RateProvider};

pub use fawaz::FawazCurrencyApi;
pub use frankfurter::Frankfurter;
pub use http::HttpTransport;
pub use open_er::OpenErApi;

/// Build the default fallback chain `[OpenErApi, Frankfurter, FawazCurrencyApi]`
/// for the configured base currency and allow-list.
///
/// # Errors
/// Returns `InvalidArg` if an endpoint cannot be built from the configuration.
pub fn default_chain(cfg: &CotizaConfig) -> Result<Vec<Arc<dyn RateProvider>>, CotizaError> {
    Ok(vec![
        Arc::new(OpenErApi::from_config(cfg)?),
        Arc::new(Frankfurter::from_config(cfg)?),
        Arc::new(FawazCurrencyApi::from_config(cfg)?),
    ])
}

fn endpoint(raw: &str) -> Result<url::Url, CotizaError> {
    url::Url::parse(raw).map_err(|e| CotizaError::InvalidArg(format!("bad endpoint {raw:?}: {e}")))
}
