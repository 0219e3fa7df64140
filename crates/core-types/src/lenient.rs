//! Forgiving field decoders for journal exports.
//!
//! A malformed field never rejects the record. Each decoder maps anything it
//! cannot interpret to `None`, and the analytics layer applies its neutral
//! defaults (zero P&L, left out of dated series).

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};
use std::str::FromStr;

#[derive(Deserialize)]
#[serde(untagged)]
enum RawValue {
    Int(i64),
    Float(f64),
    Text(String),
    Other(IgnoredAny),
}

fn raw<'de, D>(deserializer: D) -> Result<Option<RawValue>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<RawValue>::deserialize(deserializer)
}

/// Decodes a number or numeric string. Non-finite floats decode as `None`.
pub fn decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match raw(deserializer)? {
        Some(RawValue::Int(i)) => Some(Decimal::from(i)),
        Some(RawValue::Float(f)) => Decimal::from_f64(f),
        Some(RawValue::Text(s)) => parse_decimal(&s),
        Some(RawValue::Other(_)) | None => None,
    };
    Ok(value)
}

/// Decodes a calendar date from `YYYY-MM-DD` or a timestamp string.
pub fn date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match raw(deserializer)? {
        Some(RawValue::Text(s)) => parse_date(&s),
        _ => None,
    };
    Ok(value)
}

/// Decodes a timestamp from RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS`, a bare date,
/// or integer milliseconds since the Unix epoch.
pub fn timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match raw(deserializer)? {
        Some(RawValue::Text(s)) => parse_timestamp(&s),
        Some(RawValue::Int(millis)) => DateTime::from_timestamp_millis(millis),
        _ => None,
    };
    Ok(value)
}

/// Decodes a free-text label. Numbers are rendered as text; blanks become `None`.
pub fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match raw(deserializer)? {
        Some(RawValue::Text(s)) => Some(s),
        Some(RawValue::Int(i)) => Some(i.to_string()),
        Some(RawValue::Float(f)) => Some(f.to_string()),
        Some(RawValue::Other(_)) | None => None,
    };
    Ok(value.filter(|s| !s.trim().is_empty()))
}

/// Decodes an opaque identifier, which journals emit as either a string or a number.
pub fn identifier<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(text(deserializer)?.unwrap_or_default())
}

pub fn parse_decimal(s: &str) -> Option<Decimal> {
    let s = s.trim();
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    parse_naive_datetime(s).map(|dt| dt.date())
}

pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Some(dt) = parse_naive_datetime(s) {
        return Some(dt.and_utc());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

fn parse_naive_datetime(s: &str) -> Option<NaiveDateTime> {
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}
