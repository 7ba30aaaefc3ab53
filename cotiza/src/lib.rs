//! Cotiza resolves exchange rates across several public providers.
//!
//! Overview
//! - Tries `RateProvider` adapters in a fixed priority order, one request in flight
//!   at a time, each bounded by its own deadline.
//! - The first adapter whose body normalizes into a `RateSnapshot` wins; the
//!   snapshot is persisted to the single-slot `SnapshotStore` and later adapters are
//!   never called.
//! - When every adapter fails, the last persisted snapshot is served as `Cached`
//!   together with a staleness advisory; without one the run ends in `Error`.
//! - Per-attempt failures never reach the consumer as errors. They are kept as
//!   `AttemptReport`s and logged when the `tracing` feature is on.
//!
//! Key behaviors and trade-offs
//! - Ordering is total and deliberate: no racing. The preferred source is always
//!   used when reachable, and later sources only cost latency on failure.
//! - Total latency is bounded by `provider_timeout` times the adapters tried.
//! - `resolve_rates` is observable and cancellable: dropping (or cancelling) the
//!   returned subscription aborts the in-flight attempt and no state is delivered
//!   afterwards.
//!
//! Examples
//! ```rust,ignore
//! use std::sync::Arc;
//! use cotiza::Cotiza;
//! use cotiza_core::CotizaConfig;
//! use cotiza_providers::{HttpTransport, default_chain};
//!
//! let cfg = CotizaConfig::default();
//! let cotiza = Cotiza::builder()
//!     .with_providers(default_chain(&cfg)?)
//!     .transport(Arc::new(HttpTransport::new()))
//!     .config(cfg)
//!     .build()?;
//!
//! let mut sub = cotiza.resolve_rates();
//! if let Some(state) = sub.wait_terminal().await {
//!     println!("{}", state.status());
//! }
//! ```
#![warn(missing_docs)]

mod attempt;
mod core;
/// Presentation model for the currency cards and status messages.
pub mod display;
mod run;
mod state;
mod subscription;

pub use attempt::{AttemptReport, AttemptResult, Resolution};
pub use crate::core::{Cotiza, CotizaBuilder};
pub use state::{CACHED_ADVISORY, OrchestrationState, Status};
pub use subscription::RatesSubscription;

pub use cotiza_core::{
    AllowList, CotizaConfig, CotizaError, CurrencyCode, RateProvider, RateSnapshot,
    SnapshotStore, Transport,
};
