//! Visibility filtering.
//!
//! A date range applies to every collection; the marked and excluded
//! sender sets apply to mail only.

mod engine;
mod range;

pub use engine::{FilterEngine, Filtered, Inclusion, VisibleEvents};
pub use range::{DateRange, parse_bound};
