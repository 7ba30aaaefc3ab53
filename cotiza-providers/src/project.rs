use std::collections::BTreeMap;

use cotiza_core::{AllowList, CotizaError, CurrencyCode, is_valid_rate};
use serde_json::{Map, Value};

/// Key casing used by an upstream rate mapping.
#[derive(Clone, Copy)]
pub enum KeyCase {
    Upper,
    Lower,
}

/// Pick the allow-listed codes out of an upstream `code -> rate` mapping.
///
/// Missing codes and values that are not positive finite numbers are skipped.
/// A mapping that yields nothing at all is malformed.
pub fn project_rates(
    provider: &str,
    allow_list: &AllowList,
    rates: &Map<String, Value>,
    case: KeyCase,
) -> Result<BTreeMap<CurrencyCode, f64>, CotizaError> {
    let mut out = BTreeMap::new();
    for code in allow_list.iter() {
        let key = match case {
            KeyCase::Upper => code.as_str().to_string(),
            KeyCase::Lower => code.as_lower(),
        };
        if let Some(rate) = rates.get(&key).and_then(Value::as_f64)
            && is_valid_rate(rate)
        {
            out.insert(code, rate);
        }
    }
    if out.is_empty() {
        return Err(CotizaError::malformed(
            provider,
            format!("no usable rate for {}", allow_list.join(",")),
        ));
    }
    Ok(out)
}

/// Parse the base code a provider reports and check it is the one requested.
pub fn check_base(
    provider: &str,
    reported: &str,
    expected: CurrencyCode,
) -> Result<CurrencyCode, CotizaError> {
    let base = CurrencyCode::parse(reported)
        .map_err(|_| CotizaError::malformed(provider, format!("invalid base {reported:?}")))?;
    if base != expected {
        return Err(CotizaError::malformed(
            provider,
            format!("base {base} does not match requested {expected}"),
        ));
    }
    Ok(base)
}
