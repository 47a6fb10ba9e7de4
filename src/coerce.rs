//! Scalar normalization for raw response values.
//!
//! Everything the service returns arrives as untyped JSON: counters may be
//! numbers or decimal strings, rates may be absent entirely, and timestamps
//! come in a handful of ISO-like renderings. The helpers here turn those raw
//! scalars into the crate's canonical field types with one rule throughout:
//! an *absent* value takes the documented default, a *malformed* value is a
//! hard error. The two paths never mix.
//!
//! Hash rate scaling stays in decimal arithmetic end to end; the value is
//! exported to `f64` exactly once, after the last division.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use rust_decimal::{Decimal, prelude::ToPrimitive};
use serde_json::Value;

use crate::{
    error::{Error, Result},
    types::HashRateUnit,
};

/// Hours subtracted from worker-update and transaction-creation timestamps.
///
/// Historical correction for the data source feeding those two record kinds;
/// hashrate and score histories are served without it.
pub(crate) const LEGACY_OFFSET_HOURS: i64 = 5;

/// Treats `null` and the empty string the same as a missing member.
fn present(raw: Option<&Value>) -> Option<&Value> {
    match raw {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.is_empty() => None,
        other => other,
    }
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn invalid_numeric(field: &'static str, value: &Value) -> Error {
    Error::InvalidNumericLiteral {
        field,
        value: render(value),
    }
}

fn invalid_timestamp(field: &'static str, value: &Value) -> Error {
    Error::InvalidTimestamp {
        field,
        value: render(value),
    }
}

/// Parses a base-10 numeric literal with optional sign, fraction and
/// exponent. Exponent forms go through [`Decimal::from_scientific`]; nothing
/// here touches binary floating point.
fn parse_decimal(text: &str) -> Option<Decimal> {
    let text = text.trim();
    if let Ok(parsed) = text.parse::<Decimal>() {
        return Some(parsed);
    }
    if text.contains(['e', 'E']) {
        return Decimal::from_scientific(text).ok();
    }
    None
}

/// Reads a JSON scalar as a decimal value.
///
/// JSON numbers round-trip through their literal rendering so integer wire
/// values stay exact.
fn decimal(field: &'static str, value: &Value) -> Result<Decimal> {
    let text = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        other => return Err(invalid_numeric(field, other)),
    };
    parse_decimal(&text).ok_or_else(|| invalid_numeric(field, value))
}

/// Coerces a counter field.
///
/// Absent, `null` or empty counters read as zero; anything else must be a
/// base-10 number and is truncated toward zero.
pub(crate) fn int(field: &'static str, raw: Option<&Value>) -> Result<i64> {
    match present(raw) {
        None => Ok(0),
        Some(value) => decimal(field, value)?
            .trunc()
            .to_i64()
            .ok_or_else(|| invalid_numeric(field, value)),
    }
}

/// Coerces a rate or percentage field.
///
/// Same defaulting contract as [`int`]: absent reads as `0.0`, malformed is
/// a hard error.
pub(crate) fn float(field: &'static str, raw: Option<&Value>) -> Result<f64> {
    match present(raw) {
        None => Ok(0.0),
        Some(value) => decimal(field, value)?
            .to_f64()
            .ok_or_else(|| invalid_numeric(field, value)),
    }
}

/// Scales a raw hashes-per-second reading into `units`.
///
/// The scale exponent comes from the unit's fixed power-of-1000 table; the
/// raw value is divided by 1000 once per step. Each division rounds
/// half-to-even at [`Decimal`]'s 28-significant-digit limit, which is the
/// only rounding applied. An absent reading scales to `0.0`.
pub(crate) fn hashrate(
    field: &'static str,
    raw: Option<&Value>,
    units: HashRateUnit,
) -> Result<f64> {
    let mut value = match present(raw) {
        None => Decimal::ZERO,
        Some(value) => decimal(field, value)?,
    };
    for _ in 0..units.scale_exponent() {
        value /= Decimal::ONE_THOUSAND;
    }
    value
        .to_f64()
        .ok_or_else(|| Error::InvalidNumericLiteral {
            field,
            value: value.to_string(),
        })
}

/// Passthrough accessor for string fields already in canonical form
/// (identifiers, status enumerations, decimal-string money amounts).
pub(crate) fn string(field: &'static str, node: &Value) -> Result<String> {
    node.get(field)
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or(Error::MalformedResponseShape(field))
}

/// Passthrough accessor for numeric identifiers.
pub(crate) fn id(field: &'static str, node: &Value) -> Result<i64> {
    node.get(field)
        .and_then(Value::as_i64)
        .ok_or(Error::MalformedResponseShape(field))
}

/// Parses an ISO-like timestamp field into an absolute instant.
///
/// Accepts RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS[.f]` read as UTC, and a
/// bare `YYYY-MM-DD` date (midnight UTC; score-history dates arrive in this
/// form). When `legacy_offset` is set, [`LEGACY_OFFSET_HOURS`] wall-clock
/// hours are subtracted from the parsed instant before it is returned.
pub(crate) fn timestamp(
    field: &'static str,
    raw: Option<&Value>,
    legacy_offset: bool,
) -> Result<DateTime<Utc>> {
    let value = match raw {
        None | Some(Value::Null) => return Err(Error::MalformedResponseShape(field)),
        Some(value) => value,
    };
    let text = value
        .as_str()
        .ok_or_else(|| invalid_timestamp(field, value))?;
    let parsed = parse_instant(text).ok_or_else(|| invalid_timestamp(field, value))?;

    if legacy_offset {
        Ok(parsed - Duration::hours(LEGACY_OFFSET_HOURS))
    } else {
        Ok(parsed)
    }
}

fn parse_instant(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(Utc.from_utc_datetime(&naive));
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?));
    }
    None
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_int_defaults_when_absent() {
        assert_eq!(int("validShares", None).unwrap(), 0);
        assert_eq!(int("validShares", Some(&Value::Null)).unwrap(), 0);
        assert_eq!(int("validShares", Some(&json!(""))).unwrap(), 0);
    }

    #[test]
    fn test_int_parses_numbers_and_strings() {
        assert_eq!(int("n", Some(&json!(42))).unwrap(), 42);
        assert_eq!(int("n", Some(&json!("42"))).unwrap(), 42);
        assert_eq!(int("n", Some(&json!("5.9"))).unwrap(), 5);
        assert_eq!(int("n", Some(&json!("-3.7"))).unwrap(), -3);
        assert_eq!(int("n", Some(&json!("1e3"))).unwrap(), 1000);
    }

    #[test]
    fn test_int_rejects_malformed_input() {
        let err = int("validShares", Some(&json!("abc"))).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidNumericLiteral {
                field: "validShares",
                ..
            }
        ));
        assert!(int("n", Some(&json!(true))).is_err());
        assert!(int("n", Some(&json!({}))).is_err());
    }

    #[test]
    fn test_float_defaults_when_absent() {
        assert_eq!(float("efficiency", None).unwrap(), 0.0);
        assert_eq!(float("efficiency", Some(&Value::Null)).unwrap(), 0.0);
    }

    #[test]
    fn test_float_preserves_decimal_strings() {
        assert_eq!(float("coinPrice", Some(&json!("43250.55"))).unwrap(), 43250.55);
        assert_eq!(float("coinPrice", Some(&json!(99.25))).unwrap(), 99.25);
    }

    #[test]
    fn test_float_rejects_malformed_input() {
        assert!(float("coinPrice", Some(&json!("n/a"))).is_err());
    }

    #[test]
    fn test_hashrate_defaults_when_absent() {
        assert_eq!(hashrate("hashrate", None, HashRateUnit::Tera).unwrap(), 0.0);
    }

    #[test]
    fn test_hashrate_scales_exactly() {
        let raw = json!("5000000000000");
        assert_eq!(
            hashrate("hashrate", Some(&raw), HashRateUnit::Tera).unwrap(),
            5.0
        );
        assert_eq!(
            hashrate("hashrate", Some(&raw), HashRateUnit::Hash).unwrap(),
            5e12
        );
    }

    #[test]
    fn test_hashrate_scaling_is_consistent_across_units() {
        // 1000^n raw hashes expressed in the unit at exponent n is always
        // the same figure as 1 hash expressed in H.
        for unit in HashRateUnit::ALL {
            let raw = json!(format!("1{}", "000".repeat(unit.scale_exponent() as usize)));
            assert_eq!(
                hashrate("hashrate", Some(&raw), unit).unwrap(),
                1.0,
                "unit {unit}"
            );
        }
    }

    #[test]
    fn test_hashrate_accepts_exponent_literals() {
        assert_eq!(
            hashrate("hashrate", Some(&json!("5e12")), HashRateUnit::Tera).unwrap(),
            5.0
        );
    }

    #[test]
    fn test_timestamp_applies_legacy_offset() {
        let raw = json!("2024-01-01T12:00:00Z");
        let adjusted = timestamp("updatedAt", Some(&raw), true).unwrap();
        assert_eq!(adjusted.to_rfc3339(), "2024-01-01T07:00:00+00:00");

        let untouched = timestamp("time", Some(&raw), false).unwrap();
        assert_eq!(untouched.to_rfc3339(), "2024-01-01T12:00:00+00:00");
    }

    #[test]
    fn test_timestamp_accepts_naive_and_date_forms() {
        let naive = timestamp("time", Some(&json!("2024-06-01T08:30:00")), false).unwrap();
        assert_eq!(naive.to_rfc3339(), "2024-06-01T08:30:00+00:00");

        let date = timestamp("date", Some(&json!("2024-06-01")), false).unwrap();
        assert_eq!(date.to_rfc3339(), "2024-06-01T00:00:00+00:00");
    }

    #[test]
    fn test_timestamp_rejects_malformed_input() {
        let err = timestamp("updatedAt", Some(&json!("not-a-time")), true).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidTimestamp {
                field: "updatedAt",
                ..
            }
        ));
        assert!(matches!(
            timestamp("updatedAt", None, true).unwrap_err(),
            Error::MalformedResponseShape("updatedAt")
        ));
    }

    #[test]
    fn test_passthrough_accessors() {
        let node = json!({ "status": "Active", "minerId": 77 });
        assert_eq!(string("status", &node).unwrap(), "Active");
        assert_eq!(id("minerId", &node).unwrap(), 77);
        assert!(matches!(
            string("username", &node).unwrap_err(),
            Error::MalformedResponseShape("username")
        ));
    }
}
