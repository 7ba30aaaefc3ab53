//! Presentation helpers for the currency page: one card per allow-listed currency
//! plus the banner shown for loading, cached and error states.

use std::fmt;

use chrono::{DateTime, Utc};
use cotiza_core::{AllowList, CurrencyCode, RateSnapshot};
use num_format::{Locale, ToFormattedString};

use crate::state::OrchestrationState;

/// Maximum fraction digits for direct rates ("1 USD = x ARS").
pub const RATE_FRACTION_DIGITS: usize = 4;
/// Maximum fraction digits for inverse rates ("1 ARS = x USD").
pub const INVERSE_FRACTION_DIGITS: usize = 6;

/// Display metadata for one currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrencyInfo {
    /// Currency code.
    pub code: CurrencyCode,
    /// Human-readable name.
    pub name: &'static str,
    /// Two-letter flag identifier used for the card image.
    pub flag: &'static str,
}

impl CurrencyInfo {
    /// URL of the flag image shown on the card.
    #[must_use]
    pub fn flag_url(&self) -> String {
        format!("https://flagcdn.com/256x192/{}.png", self.flag)
    }
}

/// Names and flags for the currencies shipped in the default allow-list.
pub const DEFAULT_CATALOG: &[CurrencyInfo] = &[
    CurrencyInfo {
        code: CurrencyCode::ARS,
        name: "Argentine peso",
        flag: "ar",
    },
    CurrencyInfo {
        code: CurrencyCode::EUR,
        name: "Euro",
        flag: "eu",
    },
    CurrencyInfo {
        code: CurrencyCode::USD,
        name: "US dollar",
        flag: "us",
    },
];

/// One currency card.
#[derive(Debug, Clone, PartialEq)]
pub struct RateCard {
    /// Currency shown on the card.
    pub code: CurrencyCode,
    /// Display name, or the code when the catalog has no entry.
    pub name: String,
    /// Flag image URL, when the catalog knows the currency.
    pub flag_url: Option<String>,
    /// Reference currency of the snapshot.
    pub base: CurrencyCode,
    /// Units of `code` per one `base`; `None` when the snapshot lacks the code.
    pub rate: Option<f64>,
    /// Units of `base` per one `code`.
    pub inverse: Option<f64>,
    /// Provider's date label.
    pub as_of: String,
    /// Provider label.
    pub provider: String,
}

impl RateCard {
    /// "1 USD = 1,400.5 ARS", or a dash when the rate is missing.
    #[must_use]
    pub fn rate_line(&self) -> String {
        let value = self
            .rate
            .map_or_else(|| "-".to_string(), |r| format_amount(r, RATE_FRACTION_DIGITS));
        format!("1 {} = {} {}", self.base, value, self.code)
    }

    /// "1 ARS = 0.000714 USD", when the rate is present.
    #[must_use]
    pub fn inverse_line(&self) -> Option<String> {
        self.inverse.map(|inv| {
            format!(
                "1 {} = {} {}",
                self.code,
                format_amount(inv, INVERSE_FRACTION_DIGITS),
                self.base
            )
        })
    }
}

impl fmt::Display for RateCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({})", self.name, self.code)?;
        writeln!(f, "  {}", self.rate_line())?;
        if let Some(line) = self.inverse_line() {
            writeln!(f, "  {line}")?;
        }
        writeln!(f, "  Updated (API): {}", self.as_of)?;
        write!(f, "  Provider: {}", self.provider)
    }
}

/// Build one card per allow-listed currency, in allow-list order.
#[must_use]
pub fn cards(
    snapshot: &RateSnapshot,
    allow_list: &AllowList,
    catalog: &[CurrencyInfo],
) -> Vec<RateCard> {
    allow_list
        .iter()
        .map(|code| {
            let info = catalog.iter().find(|c| c.code == code);
            RateCard {
                code,
                name: info.map_or_else(|| code.to_string(), |c| c.name.to_string()),
                flag_url: info.map(CurrencyInfo::flag_url),
                base: snapshot.base(),
                rate: snapshot.rate(code),
                inverse: snapshot.inverse(code),
                as_of: snapshot.as_of().to_string(),
                provider: snapshot.provider().to_string(),
            }
        })
        .collect()
}

/// "Reference date: ... • Base: ... • Source: ..." line shown above the cards.
#[must_use]
pub fn reference_line(snapshot: &RateSnapshot) -> String {
    format!(
        "Reference date: {} • Base: {} • Source: {}",
        snapshot.as_of(),
        snapshot.base(),
        snapshot.provider()
    )
}

/// Local acceptance time of a snapshot, e.g. `2025-10-07 00:02:31 UTC`.
#[must_use]
pub fn fetched_at_label(snapshot: &RateSnapshot) -> Option<String> {
    snapshot
        .fetched_at()
        .map(|t: DateTime<Utc>| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
}

/// Severity of a status banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    /// Work in progress.
    Info,
    /// Data shown may be stale.
    Warning,
    /// Nothing can be shown.
    Error,
}

/// Message shown above (or instead of) the cards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusBanner {
    /// Severity.
    pub kind: BannerKind,
    /// Text.
    pub message: String,
}

impl StatusBanner {
    /// Banner for a state; `None` for `Idle` and `Success`.
    #[must_use]
    pub fn from_state(state: &OrchestrationState) -> Option<Self> {
        match state {
            OrchestrationState::Idle | OrchestrationState::Success(_) => None,
            OrchestrationState::Loading => Some(Self {
                kind: BannerKind::Info,
                message: "Loading exchange rates...".to_string(),
            }),
            OrchestrationState::Cached { advisory, .. } => Some(Self {
                kind: BannerKind::Warning,
                message: advisory.clone(),
            }),
            OrchestrationState::Error { message } => Some(Self {
                kind: BannerKind::Error,
                message: format!("Could not fetch the information. {message}"),
            }),
        }
    }
}

impl fmt::Display for StatusBanner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Format `value` with at most `max_fraction_digits` decimals, trailing zeros
/// trimmed and thousands grouped with commas.
#[must_use]
pub fn format_amount(value: f64, max_fraction_digits: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let fixed = format!("{:.*}", max_fraction_digits, value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    // num-format groups integers only; the fraction is capped above. Past u128 the
    // digits stay ungrouped.
    let grouped = int_part
        .parse::<u128>()
        .map_or_else(|_| int_part.to_string(), |n| n.to_formatted_string(&Locale::en));

    let negative = value < 0.0 && (int_part != "0" || !frac_part.is_empty());
    let sign = if negative { "-" } else { "" };
    if frac_part.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{frac_part}")
    }
}
