//! cotiza-core
//!
//! Core traits and utilities shared across the cotiza ecosystem.
//!
//! - `provider`: the `RateProvider` adapter trait and the `RequestSpec` it builds.
//! - `transport`: the `Transport` capability that performs a request round trip.
//! - `cache`: the single-slot `SnapshotStore` and the key-value storage it sits on.
//! - `handle`: `RunHandle`, the teardown handle for a spawned orchestration run.
//!
//! Async runtime (Tokio)
//! ---------------------
//! `handle::RunHandle` wraps `tokio::task::JoinHandle<()>` and a
//! `tokio::sync::oneshot::Sender<()>` for cooperative shutdown, so code that
//! spawns runs must execute under a Tokio 1.x runtime.
//!
#![warn(missing_docs)]

/// Key-value storage and the single-slot snapshot cache built on it.
pub mod cache;
/// Teardown handle for spawned runs.
pub mod handle;
/// Provider adapter trait and request description.
pub mod provider;
/// Transport capability used to execute provider requests.
pub mod transport;
pub mod types;

pub use cache::{FileStorage, KeyValueStorage, MemoryStorage, SnapshotCache, SnapshotStore};
pub use handle::RunHandle;
pub use provider::{RateProvider, RequestSpec};
pub use transport::Transport;
pub use types::*;
