use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use cotiza_core::{CotizaError, RateProvider, RunHandle};
use tokio::sync::{oneshot, watch};
use tokio::time::Instant;

use crate::attempt::{AttemptReport, AttemptResult, Resolution};
use crate::core::Cotiza;
use crate::state::OrchestrationState;
use crate::subscription::RatesSubscription;

impl Cotiza {
    /// Run the fallback chain once, inline, and return the terminal state together
    /// with one report per provider tried.
    ///
    /// Nothing is published; use [`Cotiza::resolve_rates`] for the observable form.
    pub async fn resolve(&self) -> Resolution {
        self.drive(&mut |_: &OrchestrationState| {}).await
    }

    /// Start a fresh run on the Tokio runtime and observe it.
    ///
    /// The subscription starts at `Idle` and moves through `Loading` to a terminal
    /// state. Dropping or cancelling it tears the run down: the in-flight attempt
    /// and its timer are dropped and no later state is delivered. Each call starts
    /// an independent run from the first provider.
    ///
    /// # Panics
    /// Panics if called outside a Tokio runtime.
    pub fn resolve_rates(&self) -> RatesSubscription {
        let (tx, rx) = watch::channel(OrchestrationState::Idle);
        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let torn_down = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&torn_down);
        let this = self.clone();

        let task = tokio::spawn(async move {
            // The flag is checked under the channel's write lock and set by the
            // subscription under its read lock, so a torn-down consumer never sees
            // a later value.
            let mut publish = |state: &OrchestrationState| {
                tx.send_if_modified(|current| {
                    if flag.load(Ordering::Acquire) {
                        return false;
                    }
                    *current = state.clone();
                    true
                });
            };
            tokio::select! {
                biased;
                Ok(()) = stop_rx => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!("rate resolution torn down before completion");
                }
                _ = this.drive(&mut publish) => {}
            }
        });

        RatesSubscription::new(rx, torn_down, RunHandle::new(task, stop_tx))
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "cotiza::run::drive",
            skip(self, on_state),
            fields(providers = self.providers.len()),
        )
    )]
    async fn drive(
        &self,
        on_state: &mut (dyn FnMut(&OrchestrationState) + Send),
    ) -> Resolution {
        on_state(&OrchestrationState::Loading);

        let mut attempts: Vec<AttemptReport> = Vec::with_capacity(self.providers.len());
        for provider in &self.providers {
            let started = Instant::now();
            let result = self.attempt(provider.as_ref()).await;
            let elapsed = started.elapsed();
            match result {
                AttemptResult::Accepted(snapshot) => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(
                        provider = provider.name(),
                        elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
                        "provider accepted"
                    );
                    attempts.push(AttemptReport {
                        provider: provider.name(),
                        elapsed,
                        error: None,
                    });
                    self.store.save(&snapshot);
                    let state = OrchestrationState::Success(snapshot);
                    on_state(&state);
                    return Resolution { state, attempts };
                }
                AttemptResult::Rejected(e) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(
                        provider = provider.name(),
                        elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
                        error = %e,
                        "provider rejected; trying next"
                    );
                    attempts.push(AttemptReport {
                        provider: provider.name(),
                        elapsed,
                        error: Some(e),
                    });
                }
            }
        }

        let state = if let Some(snapshot) = self.store.load() {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                provider = snapshot.provider(),
                ts = snapshot.fetched_at_epoch_ms(),
                "all providers failed; serving cached snapshot"
            );
            OrchestrationState::cached(snapshot)
        } else {
            let err = CotizaError::NoProviderAvailable {
                attempts: attempts.iter().filter_map(|a| a.error.clone()).collect(),
            };
            #[cfg(feature = "tracing")]
            tracing::warn!(attempts = attempts.len(), "all providers failed; nothing cached");
            OrchestrationState::Error {
                message: err.to_string(),
            }
        };
        on_state(&state);
        Resolution { state, attempts }
    }

    async fn attempt(&self, provider: &dyn RateProvider) -> AttemptResult {
        let req = provider.build_request();
        let fetched = Self::provider_call_with_timeout(
            provider.name(),
            self.cfg.provider_timeout,
            self.transport.get_json(provider.name(), &req),
        )
        .await;
        match fetched.and_then(|body| provider.normalize(&body)) {
            Ok(snapshot) => AttemptResult::Accepted(snapshot),
            Err(e) => AttemptResult::Rejected(e),
        }
    }
}
