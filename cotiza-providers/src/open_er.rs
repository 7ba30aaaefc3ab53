use cotiza_core::{
    AllowList, CotizaConfig, CotizaError, CurrencyCode, RateProvider, RateSnapshot, RequestSpec,
};
use serde::Deserialize;
use serde_json::{Map, Value};
use url::Url;

use crate::project::{KeyCase, check_base, project_rates};

/// Provider A: `open.er-api.com`, real-time rates without an API key.
///
/// Success is signaled explicitly by `"result": "success"`.
#[derive(Debug, Clone)]
pub struct OpenErApi {
    base: CurrencyCode,
    allow_list: AllowList,
    url: Url,
}

#[derive(Debug, Deserialize)]
struct Body {
    result: Option<String>,
    #[serde(rename = "error-type")]
    error_type: Option<String>,
    base_code: Option<String>,
    time_last_update_utc: Option<String>,
    rates: Option<Map<String, Value>>,
}

impl OpenErApi {
    /// Provider label stamped into produced snapshots.
    pub const NAME: &'static str = "open.er-api.com";

    /// Adapter requesting rates against `base`, reporting on `allow_list`.
    ///
    /// # Errors
    /// Returns `InvalidArg` if the endpoint URL cannot be built.
    pub fn new(base: CurrencyCode, allow_list: AllowList) -> Result<Self, CotizaError> {
        let url = crate::endpoint(&format!("https://open.er-api.com/v6/latest/{base}"))?;
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

    /// Replace the full request URL, e.g. to point at a mirror or a local test server.
    #[must_use]
    pub fn with_endpoint(mut self, url: Url) -> Self {
        self.url = url;
        self
    }
}

impl RateProvider for OpenErApi {
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
        if body.result.as_deref() != Some("success") {
            let detail = body.error_type.unwrap_or_else(|| "API error".to_string());
            return Err(CotizaError::malformed(Self::NAME, detail));
        }
        let (Some(base), Some(as_of), Some(rates)) =
            (body.base_code, body.time_last_update_utc, body.rates)
        else {
            return Err(CotizaError::malformed(
                Self::NAME,
                "missing base_code, time_last_update_utc or rates",
            ));
        };
        let base = check_base(Self::NAME, &base, self.base)?;
        let rates = project_rates(Self::NAME, &self.allow_list, &rates, KeyCase::Upper)?;
        RateSnapshot::new(base, as_of, rates, Self::NAME)
            .map_err(|e| CotizaError::malformed(Self::NAME, e.to_string()))
    }
}
