use std::time::Duration;

use cotiza_core::{CotizaError, RateSnapshot};

use crate::state::OrchestrationState;

/// Outcome of one provider attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptResult {
    /// The body normalized into a snapshot.
    Accepted(RateSnapshot),
    /// Transport failure, non-2xx status, timeout, or malformed body.
    Rejected(CotizaError),
}

/// Diagnostic record of one provider attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct AttemptReport {
    /// Label of the provider that was tried.
    pub provider: &'static str,
    /// Time spent on the attempt, request and normalization included.
    pub elapsed: Duration,
    /// Why the attempt was rejected; `None` when it was accepted.
    pub error: Option<CotizaError>,
}

impl AttemptReport {
    /// Returns true if this attempt produced the run's snapshot.
    #[must_use]
    pub const fn accepted(&self) -> bool {
        self.error.is_none()
    }
}

/// Terminal state of a run plus the per-attempt diagnostics that led to it.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// `Success`, `Cached` or `Error`.
    pub state: OrchestrationState,
    /// One report per provider tried, in attempt order.
    pub attempts: Vec<AttemptReport>,
}

impl Resolution {
    /// Collapse into the snapshot, live or cached.
    ///
    /// # Errors
    /// Returns `NoProviderAvailable` carrying every attempt error when the run
    /// ended in `Error`.
    pub fn into_snapshot(self) -> Result<RateSnapshot, CotizaError> {
        match self.state {
            OrchestrationState::Success(s) | OrchestrationState::Cached { snapshot: s, .. } => {
                Ok(s)
            }
            _ => Err(CotizaError::NoProviderAvailable {
                attempts: self.attempts.into_iter().filter_map(|a| a.error).collect(),
            }),
        }
    }
}
