//! The canonical normalized rate snapshot.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{CotizaError, CurrencyCode};

/// One normalized, self-consistent set of exchange rates plus metadata.
///
/// `rates[code]` is the amount of `code` obtainable for one unit of `base`.
/// Every rate is positive and finite and `provider` is non-empty; both
/// constructors and deserialization enforce this.
///
/// The serialized form uses the keys `base`, `date`, `rates`, `provider` and `ts`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSnapshot")]
pub struct RateSnapshot {
    base: CurrencyCode,
    #[serde(rename = "date")]
    as_of: String,
    rates: BTreeMap<CurrencyCode, f64>,
    provider: String,
    #[serde(rename = "ts")]
    fetched_at_epoch_ms: i64,
}

#[derive(Deserialize)]
struct RawSnapshot {
    base: CurrencyCode,
    #[serde(rename = "date", default)]
    as_of: String,
    rates: BTreeMap<CurrencyCode, f64>,
    provider: String,
    #[serde(rename = "ts")]
    fetched_at_epoch_ms: i64,
}

impl TryFrom<RawSnapshot> for RateSnapshot {
    type Error = CotizaError;

    fn try_from(raw: RawSnapshot) -> Result<Self, Self::Error> {
        Self::new_at(
            raw.base,
            raw.as_of,
            raw.rates,
            raw.provider,
            raw.fetched_at_epoch_ms,
        )
    }
}

impl RateSnapshot {
    /// Build a snapshot accepted now (UTC wall clock).
    ///
    /// # Errors
    /// Returns `InvalidArg` if `provider` is empty or any rate is not positive and finite.
    pub fn new(
        base: CurrencyCode,
        as_of: impl Into<String>,
        rates: BTreeMap<CurrencyCode, f64>,
        provider: impl Into<String>,
    ) -> Result<Self, CotizaError> {
        Self::new_at(
            base,
            as_of,
            rates,
            provider,
            Utc::now().timestamp_millis(),
        )
    }

    /// Build a snapshot with an explicit acceptance time.
    ///
    /// # Errors
    /// Returns `InvalidArg` if `provider` is empty or any rate is not positive and finite.
    pub fn new_at(
        base: CurrencyCode,
        as_of: impl Into<String>,
        rates: BTreeMap<CurrencyCode, f64>,
        provider: impl Into<String>,
        fetched_at_epoch_ms: i64,
    ) -> Result<Self, CotizaError> {
        let provider = provider.into();
        if provider.trim().is_empty() {
            return Err(CotizaError::InvalidArg(
                "snapshot provider label is empty".into(),
            ));
        }
        if let Some((code, rate)) = rates.iter().find(|(_, r)| !is_valid_rate(**r)) {
            return Err(CotizaError::InvalidArg(format!(
                "rate for {code} must be positive and finite, got {rate}"
            )));
        }
        Ok(Self {
            base,
            as_of: as_of.into(),
            rates,
            provider,
            fetched_at_epoch_ms,
        })
    }

    /// Reference currency all rates are expressed against.
    #[must_use]
    pub const fn base(&self) -> CurrencyCode {
        self.base
    }

    /// Opaque date/time label reported by the provider, for display only.
    #[must_use]
    pub fn as_of(&self) -> &str {
        &self.as_of
    }

    /// All rates keyed by currency code.
    #[must_use]
    pub const fn rates(&self) -> &BTreeMap<CurrencyCode, f64> {
        &self.rates
    }

    /// Rate for a single code: units of `code` per one unit of `base`.
    #[must_use]
    pub fn rate(&self, code: CurrencyCode) -> Option<f64> {
        self.rates.get(&code).copied()
    }

    /// Inverse rate: units of `base` per one unit of `code`.
    #[must_use]
    pub fn inverse(&self, code: CurrencyCode) -> Option<f64> {
        self.rate(code).map(|r| 1.0 / r)
    }

    /// Label of the adapter that produced this snapshot.
    #[must_use]
    pub fn provider(&self) -> &str {
        &self.provider
    }

    /// Local wall-clock acceptance time in milliseconds since the Unix epoch.
    #[must_use]
    pub const fn fetched_at_epoch_ms(&self) -> i64 {
        self.fetched_at_epoch_ms
    }

    /// Acceptance time as a UTC timestamp.
    #[must_use]
    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.fetched_at_epoch_ms)
    }
}

/// Returns true for rates a snapshot may carry.
#[must_use]
pub fn is_valid_rate(rate: f64) -> bool {
    rate.is_finite() && rate > 0.0
}
