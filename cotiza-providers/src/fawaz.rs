use cotiza_core::{
    AllowList, CotizaConfig, CotizaError, CurrencyCode, RateProvider, RateSnapshot, RequestSpec,
};
use serde::Deserialize;
use serde_json::{Map, Value};
use url::Url;

use crate::project::{KeyCase, project_rates};

/// Provider C: the `fawazahmed0/currency-api` daily static snapshot served by jsDelivr.
///
/// The base is implicit in the path. The body carries a `date` and one object keyed
/// by the lowercase base code that maps lowercase target codes to rates.
#[derive(Debug, Clone)]
pub struct FawazCurrencyApi {
    base: CurrencyCode,
    allow_list: AllowList,
    url: Url,
}

#[derive(Debug, Deserialize)]
struct Body {
    date: Option<String>,
    #[serde(flatten)]
    by_base: Map<String, Value>,
}

impl FawazCurrencyApi {
    /// Provider label stamped into produced snapshots.
    pub const NAME: &'static str = "jsDelivr (fawazahmed0/currency-api)";

    /// Adapter reading the static file for `base`.
    ///
    /// # Errors
    /// Returns `InvalidArg` if the endpoint URL cannot be built.
    pub fn new(base: CurrencyCode, allow_list: AllowList) -> Result<Self, CotizaError> {
        let url = crate::endpoint(&format!(
            "https://cdn.jsdelivr.net/gh/fawazahmed0/currency-api@1/latest/currencies/{}.json",
            base.as_lower()
        ))?;
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

    /// Replace the full request URL.
    #[must_use]
    pub fn with_endpoint(mut self, url: Url) -> Self {
        self.url = url;
        self
    }
}

impl RateProvider for FawazCurrencyApi {
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
        let date = body.date.filter(|d| !d.is_empty());
        let key = self.base.as_lower();
        let nested = body.by_base.get(&key).and_then(Value::as_object);
        let (Some(date), Some(nested)) = (date, nested) else {
            return Err(CotizaError::malformed(
                Self::NAME,
                format!("missing date or {key} mapping"),
            ));
        };
        let rates = project_rates(Self::NAME, &self.allow_list, nested, KeyCase::Lower)?;
        RateSnapshot::new(self.base, date, rates, Self::NAME)
            .map_err(|e| CotizaError::malformed(Self::NAME, e.to_string()))
    }
}
