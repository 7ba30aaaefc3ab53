//! Upstream-shaped sample bodies for the production providers.

use serde_json::{Value, json};

/// Label of the first production provider.
pub const OPEN_ER: &str = "open.er-api.com";
/// Label of the second production provider.
pub const FRANKFURTER: &str = "api.frankfurter.app";
/// Label of the third production provider.
pub const FAWAZ: &str = "jsDelivr (fawazahmed0/currency-api)";

/// Fixture body for a provider label, if one exists.
#[must_use]
pub fn body_for(provider: &str) -> Option<Value> {
    match provider {
        OPEN_ER => Some(open_er()),
        FRANKFURTER => Some(frankfurter()),
        FAWAZ => Some(fawaz()),
        _ => None,
    }
}

/// A successful `open.er-api.com` response.
#[must_use]
pub fn open_er() -> Value {
    json!({
        "result": "success",
        "provider": "https://www.exchangerate-api.com",
        "time_last_update_utc": "Tue, 07 Oct 2025 00:02:31 +0000",
        "base_code": "USD",
        "rates": { "USD": 1, "ARS": 1400.5, "EUR": 0.93, "GBP": 0.74 }
    })
}

/// A successful `api.frankfurter.app` response.
#[must_use]
pub fn frankfurter() -> Value {
    json!({
        "amount": 1.0,
        "base": "USD",
        "date": "2025-10-06",
        "rates": { "ARS": 1398.75, "EUR": 0.9312 }
    })
}

/// A successful `fawazahmed0/currency-api` response.
#[must_use]
pub fn fawaz() -> Value {
    json!({
        "date": "2025-10-07",
        "usd": { "ars": 1400.0, "eur": 0.93, "gbp": 0.74 }
    })
}

/// Generic body understood by `StaticProvider`.
#[must_use]
pub fn simple(ars: f64, eur: f64) -> Value {
    json!({
        "base": "USD",
        "date": "2025-10-07",
        "rates": { "ARS": ars, "EUR": eur }
    })
}
