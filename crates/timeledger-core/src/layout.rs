//! Shared time axis and linear positioning.
//!
//! Positions are percentages of the axis span, at millisecond resolution.
//! An axis whose span is below one millisecond (a single distinct instant)
//! puts everything in the middle, at 50%.

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;

use crate::settings::TimeZoneChoice;

/// Position used for every instant on a zero-length axis.
pub const CENTER: f64 = 50.0;

/// The minimum/maximum instant range all visible events are placed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Axis {
    /// Earliest visible instant.
    pub min: DateTime<Utc>,
    /// Latest visible instant.
    pub max: DateTime<Utc>,
    /// `max - min`.
    #[serde(skip)]
    pub duration: TimeDelta,
}

/// One tick on the axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisLabel {
    /// Percentage along the axis.
    pub position: f64,
    /// The instant the tick stands for.
    pub timestamp: DateTime<Utc>,
    /// Formatted date.
    pub display: String,
}

/// How axis labels are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelFormat {
    /// `strftime` pattern.
    pub pattern: String,
    /// Zone the date is shown in.
    pub zone: TimeZoneChoice,
}

impl Default for LabelFormat {
    fn default() -> Self {
        Self {
            pattern: "%Y-%m-%d".to_string(),
            zone: TimeZoneChoice::Local,
        }
    }
}

impl Axis {
    /// Spans the given instants.
    ///
    /// Returns `None` for an empty input: there is nothing to lay out and
    /// the caller should render nothing.
    pub fn compute(instants: impl IntoIterator<Item = DateTime<Utc>>) -> Option<Self> {
        let mut instants = instants.into_iter();
        let first = instants.next()?;
        let (min, max) = instants.fold((first, first), |(min, max), t| (min.min(t), max.max(t)));
        Some(Self {
            min,
            max,
            duration: max - min,
        })
    }

    /// Returns true when every instant maps to the same spot.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.duration.num_milliseconds() == 0
    }

    /// Maps an instant to a percentage in `[0, 100]`.
    ///
    /// Instants outside the axis are clamped; a degenerate axis yields
    /// [`CENTER`].
    #[must_use]
    #[allow(clippy::cast_precision_loss)] // Millisecond spans fit comfortably in f64
    pub fn position_of(&self, instant: DateTime<Utc>) -> f64 {
        if self.is_degenerate() {
            return CENTER;
        }
        let offset = (instant - self.min).num_milliseconds() as f64;
        let span = self.duration.num_milliseconds() as f64;
        (offset / span * 100.0).clamp(0.0, 100.0)
    }

    /// Evenly spaced labels from `min` to `max` inclusive.
    ///
    /// `count` below 2 is raised to 2. A degenerate axis gets a single
    /// label at [`CENTER`].
    #[must_use]
    pub fn labels(&self, count: usize, format: &LabelFormat) -> Vec<AxisLabel> {
        if self.is_degenerate() {
            return vec![self.label(self.min, format)];
        }

        let count = count.max(2);
        let steps = i64::try_from(count - 1).unwrap_or(i64::MAX);
        let span_ms = self.duration.num_milliseconds();

        (0..count)
            .map(|i| {
                let instant = if i == count - 1 {
                    self.max
                } else {
                    let i = i64::try_from(i).unwrap_or(i64::MAX);
                    let offset = i128::from(span_ms) * i128::from(i) / i128::from(steps);
                    self.min + TimeDelta::milliseconds(i64::try_from(offset).unwrap_or(span_ms))
                };
                self.label(instant, format)
            })
            .collect()
    }

    fn label(&self, instant: DateTime<Utc>, format: &LabelFormat) -> AxisLabel {
        AxisLabel {
            position: self.position_of(instant),
            timestamp: instant,
            display: format.zone.format(instant, &format.pattern),
        }
    }
}
