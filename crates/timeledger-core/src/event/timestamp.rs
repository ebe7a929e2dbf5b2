//! Timestamp parsing shared by every input format.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;

use crate::{Error, Result};

/// Naive date-time layouts, interpreted as UTC.
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Parses an absolute date-time.
///
/// Accepts RFC 3339 (`2023-01-01T00:00:00Z`, `...+02:00`), naive ISO
/// date-times without an offset (taken as UTC) and bare dates
/// (`2023-01-01`, midnight UTC).
///
/// # Errors
///
/// Returns [`Error::InvalidTimestamp`] for anything else.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.with_timezone(&Utc));
    }

    if let Some(naive) = NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
    {
        return Ok(naive.and_utc());
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| Error::InvalidTimestamp(value.to_string()))
}

/// A timestamp as it appears in a JSON data file.
///
/// Strings go through [`parse_timestamp`]; numbers are milliseconds since
/// the Unix epoch.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawTimestamp {
    Millis(i64),
    Text(String),
}

impl RawTimestamp {
    pub(crate) fn resolve(&self) -> Result<DateTime<Utc>> {
        match self {
            Self::Text(text) => parse_timestamp(text),
            Self::Millis(ms) => DateTime::from_timestamp_millis(*ms)
                .ok_or_else(|| Error::InvalidTimestamp(ms.to_string())),
        }
    }
}
