//! Lenient `Date` header parsing.

use chrono::{DateTime, FixedOffset};

use crate::error::{Error, Result};

/// Formats tried after strict RFC 2822 parsing fails.
const FALLBACK_FORMATS: &[&str] = &[
    "%a, %d %b %Y %H:%M:%S %z",
    "%d %b %Y %H:%M:%S %z",
    "%a, %d %b %Y %H:%M %z",
    "%d %b %Y %H:%M %z",
    "%a %b %d %H:%M:%S %Y %z",
];

/// Parses an RFC 2822 `Date` header value.
///
/// Trailing zone comments such as `(UTC)` are dropped and runs of
/// whitespace collapsed before parsing, which covers most dates written
/// by real mail clients.
///
/// # Errors
///
/// Returns [`Error::InvalidDate`] if no known format matches.
pub fn parse_date(value: &str) -> Result<DateTime<FixedOffset>> {
    let cleaned = normalize(value);
    if cleaned.is_empty() {
        return Err(Error::InvalidDate(value.to_string()));
    }

    if let Ok(parsed) = DateTime::parse_from_rfc2822(&cleaned) {
        return Ok(parsed);
    }

    FALLBACK_FORMATS
        .iter()
        .find_map(|format| DateTime::parse_from_str(&cleaned, format).ok())
        .ok_or_else(|| Error::InvalidDate(value.to_string()))
}

fn normalize(value: &str) -> String {
    let without_comment = match value.find('(') {
        Some(index) => &value[..index],
        None => value,
    };
    without_comment
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
