use cotiza_core::RateSnapshot;

/// Advisory attached to `Cached` results.
pub const CACHED_ADVISORY: &str =
    "No connection to the rate sources. Showing locally cached values.";

/// Observable state of one orchestration run.
///
/// Transitions are `Idle -> Loading -> (Success | Cached | Error)`; the last three
/// are terminal.
#[derive(Debug, Clone, PartialEq)]
pub enum OrchestrationState {
    /// No run has started yet.
    Idle,
    /// Providers are being tried.
    Loading,
    /// A provider answered; the snapshot is live and was persisted.
    Success(RateSnapshot),
    /// Every provider failed; the last persisted snapshot is served instead.
    Cached {
        /// The snapshot exactly as it was saved.
        snapshot: RateSnapshot,
        /// User-facing note that the data may be stale.
        advisory: String,
    },
    /// Every provider failed and nothing was cached.
    Error {
        /// User-facing description of the failure.
        message: String,
    },
}

/// Discriminant of an `OrchestrationState`, handy for logging and comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// See `OrchestrationState::Idle`.
    Idle,
    /// See `OrchestrationState::Loading`.
    Loading,
    /// See `OrchestrationState::Success`.
    Success,
    /// See `OrchestrationState::Cached`.
    Cached,
    /// See `OrchestrationState::Error`.
    Error,
}

impl Status {
    /// Lowercase label, e.g. `"cached"`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Success => "success",
            Self::Cached => "cached",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl OrchestrationState {
    pub(crate) fn cached(snapshot: RateSnapshot) -> Self {
        Self::Cached {
            snapshot,
            advisory: CACHED_ADVISORY.to_string(),
        }
    }

    /// Discriminant of this state.
    #[must_use]
    pub const fn status(&self) -> Status {
        match self {
            Self::Idle => Status::Idle,
            Self::Loading => Status::Loading,
            Self::Success(_) => Status::Success,
            Self::Cached { .. } => Status::Cached,
            Self::Error { .. } => Status::Error,
        }
    }

    /// Returns true once no further transition can happen.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Success(_) | Self::Cached { .. } | Self::Error { .. }
        )
    }

    /// The snapshot carried by `Success` or `Cached`.
    #[must_use]
    pub const fn snapshot(&self) -> Option<&RateSnapshot> {
        match self {
            Self::Success(s) | Self::Cached { snapshot: s, .. } => Some(s),
            _ => None,
        }
    }

    /// Returns true when the carried snapshot came from the cache, not a provider.
    #[must_use]
    pub const fn is_cached(&self) -> bool {
        matches!(self, Self::Cached { .. })
    }
}
