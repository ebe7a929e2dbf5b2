//! Inclusive date-range filtering.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::Result;
use crate::event::{Timestamped, parse_timestamp};

/// An inclusive `[from, to]` range; a missing bound is unconstrained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DateRange {
    /// Earliest instant kept.
    pub from: Option<DateTime<Utc>>,
    /// Latest instant kept.
    pub to: Option<DateTime<Utc>>,
}

impl DateRange {
    /// A range that keeps everything.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            from: None,
            to: None,
        }
    }

    /// Parses user-supplied bounds; empty strings and `-` mean unbounded.
    ///
    /// # Errors
    ///
    /// Returns an error if a non-empty bound is not a date-time.
    pub fn parse(from: &str, to: &str) -> Result<Self> {
        Ok(Self {
            from: parse_bound(from)?,
            to: parse_bound(to)?,
        })
    }

    /// Returns true when neither bound is set.
    #[must_use]
    pub const fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    /// Inclusive on both ends.
    #[must_use]
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.from.is_none_or(|from| instant >= from) && self.to.is_none_or(|to| instant <= to)
    }

    /// Keeps the events inside the range, preserving order.
    pub fn apply<T: Timestamped>(&self, events: impl IntoIterator<Item = T>) -> Vec<T> {
        events
            .into_iter()
            .filter(|event| self.contains(event.timestamp()))
            .collect()
    }
}

/// Parses one range bound; blank input and `-` mean "no bound".
///
/// # Errors
///
/// Returns an error if the bound is not a date-time.
pub fn parse_bound(value: &str) -> Result<Option<DateTime<Utc>>> {
    let value = value.trim();
    if value.is_empty() || value == "-" {
        return Ok(None);
    }
    parse_timestamp(value).map(Some)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::event::ImageEvent;
    use chrono::TimeZone;
    use std::path::PathBuf;

    fn image(day: u32) -> ImageEvent {
        ImageEvent {
            name: format!("{day}.jpg"),
            path: PathBuf::from(format!("{day}.jpg")),
            timestamp: Utc.with_ymd_and_hms(2023, 1, day, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let events = vec![image(1), image(2), image(3), image(4)];
        let range = DateRange::parse("2023-01-02", "2023-01-03T00:00:00Z").unwrap();

        let kept: Vec<_> = range.apply(&events);
        let names: Vec<_> = kept.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["2.jpg", "3.jpg"]);
    }

    #[test]
    fn test_open_bounds() {
        let events = vec![image(1), image(5)];
        assert_eq!(DateRange::parse("", "-").unwrap().apply(&events).len(), 2);
        assert_eq!(DateRange::parse("2023-01-02", "").unwrap().apply(&events).len(), 1);
        assert_eq!(DateRange::parse("", "2023-01-02").unwrap().apply(&events).len(), 1);
    }

    #[test]
    fn test_inverted_range_keeps_nothing() {
        let events = vec![image(1), image(2)];
        let range = DateRange::parse("2023-01-02", "2023-01-01").unwrap();
        assert!(range.apply(&events).is_empty());
    }

    #[test]
    fn test_parse_bound_rejects_garbage() {
        assert!(parse_bound("someday").is_err());
        assert!(DateRange::unbounded().is_unbounded());
    }
}
