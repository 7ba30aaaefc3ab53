use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use cotiza_core::RunHandle;
use tokio::sync::watch;

use crate::state::OrchestrationState;

/// Consumer side of a run started by `Cotiza::resolve_rates`.
///
/// Holds the latest state (watch semantics: a slow observer may skip `Loading`
/// and see the terminal state directly). Dropping the subscription is consumer
/// teardown.
#[derive(Debug)]
pub struct RatesSubscription {
    rx: watch::Receiver<OrchestrationState>,
    torn_down: Arc<AtomicBool>,
    handle: Option<RunHandle>,
}

impl RatesSubscription {
    pub(crate) const fn new(
        rx: watch::Receiver<OrchestrationState>,
        torn_down: Arc<AtomicBool>,
        handle: RunHandle,
    ) -> Self {
        Self {
            rx,
            torn_down,
            handle: Some(handle),
        }
    }

    /// Latest delivered state.
    #[must_use]
    pub fn current(&self) -> OrchestrationState {
        self.rx.borrow().clone()
    }

    /// Wait for the next state.
    ///
    /// Returns `None` once the run has finished and its last state was already
    /// seen, or after teardown.
    pub async fn changed(&mut self) -> Option<OrchestrationState> {
        if self.is_cancelled() {
            return None;
        }
        self.rx.changed().await.ok()?;
        if self.is_cancelled() {
            return None;
        }
        Some(self.rx.borrow_and_update().clone())
    }

    /// Wait until the run reaches `Success`, `Cached` or `Error`.
    ///
    /// Returns `None` if the run was torn down first.
    pub async fn wait_terminal(&mut self) -> Option<OrchestrationState> {
        loop {
            {
                let current = self.rx.borrow_and_update();
                if current.is_terminal() {
                    return Some(current.clone());
                }
            }
            if self.is_cancelled() || self.rx.changed().await.is_err() {
                return None;
            }
        }
    }

    /// Tear the run down: abort the in-flight attempt and stop delivering states.
    ///
    /// The last state delivered before the call stays readable through `current`.
    pub fn cancel(&mut self) {
        {
            // Taken under the read lock so an in-progress publication either lands
            // before this point or not at all.
            let _guard = self.rx.borrow();
            self.torn_down.store(true, Ordering::Release);
        }
        if let Some(handle) = self.handle.take() {
            handle.cancel();
        }
    }

    /// Returns true after `cancel` (or once the subscription is being dropped).
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.torn_down.load(Ordering::Acquire)
    }

    /// Returns true once the run task has completed or was torn down.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(RunHandle::is_finished)
    }
}

impl Drop for RatesSubscription {
    fn drop(&mut self) {
        self.cancel();
    }
}
