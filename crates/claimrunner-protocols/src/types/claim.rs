//! Claimed item identifiers.

use serde_json::Value;

/// Identifier of a numbered item on the target page. Always positive.
pub type ClaimId = u64;

/// Coerce a loosely-typed value into a [`ClaimId`].
///
/// Integral numbers and numeric strings greater than zero are accepted.
/// Everything else (negative, zero, fractional, non-numeric) yields `None`.
pub fn normalize_id(value: &Value) -> Option<ClaimId> {
    match value {
        Value::Number(n) => {
            if let Some(v) = n.as_u64() {
                return (v > 0).then_some(v);
            }
            let f = n.as_f64()?;
            if f >= 1.0 && f.fract() == 0.0 && f <= u64::MAX as f64 {
                Some(f as u64)
            } else {
                None
            }
        }
        Value::String(s) => s.trim().parse::<u64>().ok().filter(|v| *v > 0),
        _ => None,
    }
}

/// Coerce a list of loosely-typed values, silently dropping invalid entries.
pub fn normalize_ids<'a, I>(values: I) -> Vec<ClaimId>
where
    I: IntoIterator<Item = &'a Value>,
{
    values.into_iter().filter_map(normalize_id).collect()
}
