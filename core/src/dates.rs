//! Lenient date handling for API payloads
//!
//! The server emits ISO timestamps (`2024-05-01T00:00:00`) for date-only
//! fields. Only the date part is kept; null, empty and malformed values read
//! as "no date".

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer};

/// Parse the leading `YYYY-MM-DD` of an ISO date or timestamp.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let date_part = raw.trim().split('T').next()?;
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

pub fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| parse_date(raw).and_then(|d| d.and_hms_opt(0, 0, 0)))
}

pub fn deserialize_date_opt<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_date))
}

pub fn deserialize_datetime_opt<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_datetime))
}
