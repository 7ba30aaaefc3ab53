use std::collections::BTreeMap;

use cotiza_core::{
    CotizaError, CurrencyCode, RateProvider, RateSnapshot, RequestSpec, is_valid_rate,
};
use serde_json::Value;
use url::Url;

/// `RateProvider` with a caller-chosen label and a generic body shape.
///
/// `normalize` accepts `{"base": "USD", "date": "...", "rates": {"ARS": 1.0}}`,
/// requires `base` and `rates`, and keeps every valid rate. Anything else is
/// `MalformedResponse`.
#[derive(Debug, Clone)]
pub struct StaticProvider {
    name: &'static str,
    url: Url,
}

impl StaticProvider {
    /// Provider labelled `name`, requesting `mock://provider/latest?provider=<name>`.
    ///
    /// # Errors
    /// Returns `InvalidArg` if the request URL cannot be built.
    pub fn new(name: &'static str) -> Result<Self, CotizaError> {
        let mut url = Url::parse("mock://provider/latest")
            .map_err(|e| CotizaError::InvalidArg(format!("bad mock url for {name}: {e}")))?;
        url.query_pairs_mut().append_pair("provider", name);
        Ok(Self { name, url })
    }
}

impl RateProvider for StaticProvider {
    fn name(&self) -> &'static str {
        self.name
    }

    fn build_request(&self) -> RequestSpec {
        RequestSpec::get(self.url.clone())
    }

    fn normalize(&self, body: &Value) -> Result<RateSnapshot, CotizaError> {
        let malformed = |detail: &str| CotizaError::malformed(self.name, detail);
        let base = body
            .get("base")
            .and_then(Value::as_str)
            .ok_or_else(|| malformed("missing base"))?;
        let base = CurrencyCode::parse(base).map_err(|_| malformed("invalid base"))?;
        let raw = body
            .get("rates")
            .and_then(Value::as_object)
            .ok_or_else(|| malformed("missing rates"))?;
        let rates: BTreeMap<CurrencyCode, f64> = raw
            .iter()
            .filter_map(|(k, v)| Some((CurrencyCode::parse(k).ok()?, v.as_f64()?)))
            .filter(|(_, r)| is_valid_rate(*r))
            .collect();
        if rates.is_empty() {
            return Err(malformed("no usable rate"));
        }
        let date = body.get("date").and_then(Value::as_str).unwrap_or_default();
        RateSnapshot::new(base, date, rates, self.name).map_err(|e| malformed(&e.to_string()))
    }
}
