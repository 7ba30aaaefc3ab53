use cotiza_core::{
    AllowList, CotizaConfig, CotizaError, CurrencyCode, RateProvider, RateSnapshot, RequestSpec,
};
use serde::Deserialize;
use serde_json::{Map, Value};
use url::Url;

use crate::project::{KeyCase, check_base, project_rates};

/// Provider B: `api.frankfurter.app`, ECB reference rates without an API key.
///
/// Success is implicit: the body must carry both `base` and `rates`.
#[derive(Debug, Clone)]
pub struct Frankfurter {
    base: CurrencyCode,
    allow_list: AllowList,
    url: Url,
}

#[derive(Debug, Deserialize)]
struct Body {
    base: Option<String>,
    date: Option<String>,
    rates: Option<Map<String, Value>>,
}

impl Frankfurter {
    /// Provider label stamped into produced snapshots.
    pub const NAME: &'static str = "api.frankfurter.app";

    /// Adapter requesting `from={base}&to={allow_list}`.
    ///
    /// # Errors
    /// Returns `InvalidArg` if the endpoint URL cannot be built.
    pub fn new(base: CurrencyCode, allow_list: AllowList) -> Result<Self, CotizaError> {
        let mut url = crate::endpoint("https://api.frankfurter.app/latest")?;
        // Commas stay literal, matching what the service documents.
        url.set_query(Some(&format!("from={base}&to={}", allow_list.join(","))));
        Ok(Self {
            base,
            allow_list,
            url,
        })
    }

    /// Adapter for the base and allow-list of `cfg`.
    ///
    /// # Errors
    /// Returns `InvalidArg` if the endpoint URL cannot be built.
    pub fn from_config(cfg: &CotizaConfig) -> Result<Self, CotizaError> {
        Self::new(cfg.base, cfg.allow_list.clone())
    }

    /// Replace the full request URL, query included.
    #[must_use]
    pub fn with_endpoint(mut self, url: Url) -> Self {
        self.url = url;
        self
    }
}

impl RateProvider for Frankfurter {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn base(&self) -> Option<CurrencyCode> {
        Some(self.base)
    }

    fn build_request(&self) -> RequestSpec {
        RequestSpec::get(self.url.clone())
    }

    fn normalize(&self, body: &Value) -> Result<RateSnapshot, CotizaError> {
        let body = Body::deserialize(body)
            .map_err(|e| CotizaError::malformed(Self::NAME, e.to_string()))?;
        let (Some(base), Some(rates)) = (body.base, body.rates) else {
            return Err(CotizaError::malformed(Self::NAME, "missing base or rates"));
        };
        let base = check_base(Self::NAME, &base, self.base)?;
        let rates = project_rates(Self::NAME, &self.allow_list, &rates, KeyCase::Upper)?;
        RateSnapshot::new(base, body.date.unwrap_or_default(), rates, Self::NAME)
            .map_err(|e| CotizaError::malformed(Self::NAME, e.to_string()))
    }
}
