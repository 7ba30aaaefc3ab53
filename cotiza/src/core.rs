use std::sync::Arc;
use std::time::Duration;

use cotiza_core::{
    CotizaConfig, CotizaError, MemoryStorage, RateProvider, SnapshotCache, SnapshotStore,
    Transport,
};

/// Orchestrator that resolves rates across registered providers.
///
/// Cheap to clone: every collaborator sits behind an `Arc`.
#[derive(Clone)]
pub struct Cotiza {
    pub(crate) providers: Vec<Arc<dyn RateProvider>>,
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) store: Arc<dyn SnapshotStore>,
    pub(crate) cfg: CotizaConfig,
}

/// Builder for constructing a `Cotiza` orchestrator with custom configuration.
pub struct CotizaBuilder {
    providers: Vec<Arc<dyn RateProvider>>,
    transport: Option<Arc<dyn Transport>>,
    store: Option<Arc<dyn SnapshotStore>>,
    cfg: CotizaConfig,
}

impl Default for CotizaBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CotizaBuilder {
    /// Create a new builder with default configuration (USD base, ARS and EUR,
    /// 8 s per attempt, `fxCache` slot).
    ///
    /// Starts with no providers and no transport; both must be supplied.
    #[must_use]
    pub fn new() -> Self {
        Self {
            providers: vec![],
            transport: None,
            store: None,
            cfg: CotizaConfig::default(),
        }
    }

    /// Register a provider. Registration order is priority order.
    ///
    /// Duplicates are not deduplicated; a provider registered twice is tried twice.
    #[must_use]
    pub fn with_provider(mut self, p: Arc<dyn RateProvider>) -> Self {
        self.providers.push(p);
        self
    }

    /// Register several providers, highest priority first.
    #[must_use]
    pub fn with_providers(mut self, ps: impl IntoIterator<Item = Arc<dyn RateProvider>>) -> Self {
        self.providers.extend(ps);
        self
    }

    /// Set the transport that executes provider requests.
    #[must_use]
    pub fn transport(mut self, t: Arc<dyn Transport>) -> Self {
        self.transport = Some(t);
        self
    }

    /// Set the snapshot store.
    ///
    /// When unset, `build` uses an in-memory `SnapshotCache` under the configured
    /// cache key, so the last good snapshot only lives as long as the process.
    #[must_use]
    pub fn store(mut self, s: Arc<dyn SnapshotStore>) -> Self {
        self.store = Some(s);
        self
    }

    /// Set the per-attempt deadline.
    #[must_use]
    pub const fn provider_timeout(mut self, timeout: Duration) -> Self {
        self.cfg.provider_timeout = timeout;
        self
    }

    /// Replace the whole configuration.
    ///
    /// `base` must match the base every pinned provider was built with;
    /// `allow_list` is carried for the display layer.
    #[must_use]
    pub fn config(mut self, cfg: CotizaConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Build the `Cotiza` orchestrator.
    ///
    /// # Errors
    /// Returns `InvalidArg` if no provider or no transport was registered, if the
    /// configuration fails validation, or if a provider is pinned to a base other
    /// than the configured one.
    pub fn build(self) -> Result<Cotiza, CotizaError> {
        self.cfg.validate()?;
        if self.providers.is_empty() {
            return Err(CotizaError::InvalidArg(
                "no providers registered; add at least one via with_provider(...)".to_string(),
            ));
        }
        if let Some(p) = self
            .providers
            .iter()
            .find(|p| p.base().is_some_and(|b| b != self.cfg.base))
        {
            return Err(CotizaError::InvalidArg(format!(
                "provider {} is pinned to base {}, configuration says {}",
                p.name(),
                p.base().map_or_else(String::new, |b| b.to_string()),
                self.cfg.base
            )));
        }
        let Some(transport) = self.transport else {
            return Err(CotizaError::InvalidArg(
                "no transport configured; set one via transport(...)".to_string(),
            ));
        };
        let store = self.store.unwrap_or_else(|| {
            Arc::new(SnapshotCache::new(
                Arc::new(MemoryStorage::new()),
                self.cfg.cache_key.clone(),
            ))
        });

        Ok(Cotiza {
            providers: self.providers,
            transport,
            store,
            cfg: self.cfg,
        })
    }
}

impl Cotiza {
    /// Start building a new `Cotiza` instance.
    ///
    /// ```rust,ignore
    /// let cotiza = cotiza::Cotiza::builder()
    ///     .with_provider(open_er)
    ///     .with_provider(frankfurter)
    ///     .transport(Arc::new(HttpTransport::new()))
    ///     .provider_timeout(Duration::from_secs(5))
    ///     .build()?;
    /// ```
    #[must_use]
    pub fn builder() -> CotizaBuilder {
        CotizaBuilder::new()
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &CotizaConfig {
        &self.cfg
    }

    /// Provider labels in priority order.
    #[must_use]
    pub fn provider_names(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// The snapshot store runs persist to.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn SnapshotStore> {
        &self.store
    }

    /// Wrap a transport future with the per-attempt deadline and map expiry to
    /// `ProviderTimeout`. Dropping the wrapped future aborts the request.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "cotiza::core::provider_call_with_timeout",
            skip(fut, timeout),
            fields(timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX)),
        )
    )]
    pub(crate) async fn provider_call_with_timeout<T, Fut>(
        provider: &'static str,
        timeout: Duration,
        fut: Fut,
    ) -> Result<T, CotizaError>
    where
        Fut: std::future::Future<Output = Result<T, CotizaError>>,
    {
        (tokio::time::timeout(timeout, fut).await)
            .unwrap_or_else(|_| Err(CotizaError::provider_timeout(provider, timeout)))
    }
}
