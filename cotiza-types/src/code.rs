//! Currency codes and the allow-list of codes the system reports on.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CotizaError;

/// Three-letter ISO-style currency code, always stored uppercase.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode([u8; 3]);

impl CurrencyCode {
    /// United States dollar.
    pub const USD: Self = Self(*b"USD");
    /// Argentine peso.
    pub const ARS: Self = Self(*b"ARS");
    /// Euro.
    pub const EUR: Self = Self(*b"EUR");

    /// Parse a code in any letter case.
    ///
    /// # Errors
    /// Returns `InvalidArg` unless the input is exactly three ASCII letters.
    pub fn parse(raw: &str) -> Result<Self, CotizaError> {
        let bytes = raw.as_bytes();
        if bytes.len() != 3 || !bytes.iter().all(u8::is_ascii_alphabetic) {
            return Err(CotizaError::InvalidArg(format!(
                "currency code must be three ASCII letters, got {raw:?}"
            )));
        }
        Ok(Self([
            bytes[0].to_ascii_uppercase(),
            bytes[1].to_ascii_uppercase(),
            bytes[2].to_ascii_uppercase(),
        ]))
    }

    /// Uppercase form, e.g. `"USD"`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        // Construction only admits ASCII letters.
        core::str::from_utf8(&self.0).unwrap_or_default()
    }

    /// Lowercase form, e.g. `"usd"`, as used by some upstream payloads.
    #[must_use]
    pub fn as_lower(&self) -> String {
        self.as_str().to_ascii_lowercase()
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CurrencyCode({})", self.as_str())
    }
}

impl FromStr for CurrencyCode {
    type Err = CotizaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = CotizaError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.as_str().to_string()
    }
}

/// Ordered, de-duplicated set of currency codes the system reports on.
///
/// Adapters only ever emit rates for codes in this list, regardless of how many
/// a provider returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<CurrencyCode>", into = "Vec<CurrencyCode>")]
pub struct AllowList(Vec<CurrencyCode>);

impl AllowList {
    /// Build an allow-list, keeping the first occurrence of each code.
    pub fn new(codes: impl IntoIterator<Item = CurrencyCode>) -> Self {
        let mut out: Vec<CurrencyCode> = Vec::new();
        for code in codes {
            if !out.contains(&code) {
                out.push(code);
            }
        }
        Self(out)
    }

    /// Returns true if `code` is reported on.
    #[must_use]
    pub fn contains(&self, code: CurrencyCode) -> bool {
        self.0.contains(&code)
    }

    /// Iterate the codes in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = CurrencyCode> + '_ {
        self.0.iter().copied()
    }

    /// Number of codes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true when no code is allowed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Join the uppercase codes with `sep` (e.g. `"ARS,EUR"`).
    #[must_use]
    pub fn join(&self, sep: &str) -> String {
        self.0
            .iter()
            .map(CurrencyCode::as_str)
            .collect::<Vec<_>>()
            .join(sep)
    }
}

impl Default for AllowList {
    fn default() -> Self {
        Self(vec![CurrencyCode::ARS, CurrencyCode::EUR])
    }
}

impl From<Vec<CurrencyCode>> for AllowList {
    fn from(codes: Vec<CurrencyCode>) -> Self {
        Self::new(codes)
    }
}

impl From<AllowList> for Vec<CurrencyCode> {
    fn from(list: AllowList) -> Self {
        list.0
    }
}

impl FromIterator<CurrencyCode> for AllowList {
    fn from_iter<T: IntoIterator<Item = CurrencyCode>>(iter: T) -> Self {
        Self::new(iter)
    }
}
