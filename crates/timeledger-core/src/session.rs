//! Session state and the action reducer.
//!
//! All mutable state of a running timeline lives in one [`Session`].
//! Presenters dispatch [`Action`]s to [`Session::update`] and re-derive the
//! whole view from [`Session::timeline`] afterwards; nothing is cached
//! between renders.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::filter::{DateRange, FilterEngine};
use crate::layout::{Axis, AxisLabel};
use crate::loader::Batch;
use crate::marker::{Marker, build_markers};
use crate::settings::Settings;
use crate::store::{EventStore, SenderSet, normalize_sender};

/// Everything that can change session state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Replace one collection with a successfully parsed batch.
    Replace(Batch),
    /// Emphasize events involving an address.
    Mark(String),
    /// Stop emphasizing an address.
    Unmark(String),
    /// Hide events involving an address.
    Exclude(String),
    /// Show an excluded address again.
    Include(String),
    /// Set or clear the lower date bound.
    SetFrom(Option<DateTime<Utc>>),
    /// Set or clear the upper date bound.
    SetTo(Option<DateTime<Utc>>),
    /// Remove both date bounds.
    ClearDateRange,
}

/// The derived render product.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Timeline {
    /// Shared axis of all visible events.
    pub axis: Axis,
    /// Date ticks under the axis.
    pub labels: Vec<AxisLabel>,
    /// One marker per visible event.
    pub markers: Vec<Marker>,
}

/// Loaded events plus the user's filters and settings.
#[derive(Debug, Clone, Default)]
pub struct Session {
    store: EventStore,
    marked: SenderSet,
    excluded: SenderSet,
    range: DateRange,
    settings: Settings,
}

impl Session {
    /// Creates an empty session.
    #[must_use]
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    /// Applies an action. Returns true if anything changed.
    pub fn update(&mut self, action: Action) -> bool {
        match action {
            Action::Replace(batch) => {
                let category = batch.category();
                let count = batch.len();
                match batch {
                    Batch::Sent(events) => self.store.replace_sent(events),
                    Batch::Inbox(events) => self.store.replace_inbox(events),
                    Batch::Images(events) => self.store.replace_images(events),
                    Batch::History(records) => self.store.replace_history(records),
                }
                info!(%category, count, "Collection replaced");
                true
            }
            Action::Mark(raw) => Self::edit_set(&mut self.marked, &raw, true, "marked"),
            Action::Unmark(raw) => Self::edit_set(&mut self.marked, &raw, false, "marked"),
            Action::Exclude(raw) => Self::edit_set(&mut self.excluded, &raw, true, "excluded"),
            Action::Include(raw) => Self::edit_set(&mut self.excluded, &raw, false, "excluded"),
            Action::SetFrom(from) => self.set_range(DateRange { from, ..self.range }),
            Action::SetTo(to) => self.set_range(DateRange { to, ..self.range }),
            Action::ClearDateRange => self.set_range(DateRange::unbounded()),
        }
    }

    fn edit_set(set: &mut SenderSet, raw: &str, add: bool, name: &str) -> bool {
        let Some(sender) = normalize_sender(raw) else {
            debug!(set = name, "Ignoring blank address");
            return false;
        };

        let changed = if add {
            set.insert(&sender)
        } else {
            set.remove(&sender)
        };
        if changed {
            info!(set = name, %sender, added = add, "Sender set updated");
        }
        changed
    }

    fn set_range(&mut self, range: DateRange) -> bool {
        if range == self.range {
            return false;
        }
        info!(from = ?range.from, to = ?range.to, "Date range updated");
        self.range = range;
        true
    }

    /// Derives the current view, or `None` when nothing is visible.
    #[must_use]
    pub fn timeline(&self) -> Option<Timeline> {
        let engine = FilterEngine::new(&self.marked, &self.excluded, self.range);
        let visible = engine.visible(&self.store);
        let axis = Axis::compute(visible.timestamps())?;

        let labels = axis.labels(self.settings.label_count, &self.settings.label_format());
        let markers = build_markers(&visible, &axis, self.settings.preview_chars);
        debug!(markers = markers.len(), degenerate = axis.is_degenerate(), "Timeline derived");

        Some(Timeline {
            axis,
            labels,
            markers,
        })
    }

    /// Marked addresses, sorted.
    #[must_use]
    pub fn marked(&self) -> Vec<&str> {
        self.marked.iter().collect()
    }

    /// Excluded addresses, sorted.
    #[must_use]
    pub fn excluded(&self) -> Vec<&str> {
        self.excluded.iter().collect()
    }

    /// The active date range.
    #[must_use]
    pub const fn range(&self) -> DateRange {
        self.range
    }

    /// The loaded events.
    #[must_use]
    pub const fn store(&self) -> &EventStore {
        &self.store
    }

    /// The active settings.
    #[must_use]
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// A filter engine over the current sets and range.
    #[must_use]
    pub const fn filter(&self) -> FilterEngine<'_> {
        FilterEngine::new(&self.marked, &self.excluded, self.range)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::event::{Category, InboxEvent, SentEvent};
    use crate::loader::parse_inbox;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 1, day, 0, 0, 0).unwrap()
    }

    fn inbox(sender: &str, day: u32) -> InboxEvent {
        InboxEvent {
            id: None,
            sender: Some(sender.to_string()),
            subject: "hi".to_string(),
            body: None,
            timestamp: at(day),
        }
    }

    #[test]
    fn test_empty_session_has_no_timeline() {
        assert!(Session::default().timeline().is_none());
    }

    #[test]
    fn test_mark_and_unmark() {
        let mut session = Session::default();
        assert!(session.update(Action::Mark("  Friend@X.com ".to_string())));
        assert!(!session.update(Action::Mark("friend@x.com".to_string())));
        assert_eq!(session.marked(), vec!["friend@x.com"]);

        assert!(session.update(Action::Unmark("FRIEND@x.com".to_string())));
        assert!(session.marked().is_empty());
    }

    #[test]
    fn test_blank_address_is_ignored() {
        let mut session = Session::default();
        assert!(!session.update(Action::Exclude("   ".to_string())));
        assert!(session.excluded().is_empty());
    }

    #[test]
    fn test_malformed_load_keeps_previous_collection() {
        let mut session = Session::default();
        session.update(Action::Replace(Batch::Inbox(vec![inbox("a@x.com", 1)])));

        // The parse fails before any action can be dispatched
        assert!(parse_inbox("{not json").is_err());
        assert_eq!(session.store().inbox().len(), 1);
    }

    #[test]
    fn test_marked_inbox_is_boosted() {
        let mut session = Session::default();
        session.update(Action::Replace(Batch::Inbox(vec![
            inbox("a@x.com", 1),
            inbox("b@x.com", 2),
        ])));
        session.update(Action::Mark("b@x.com".to_string()));

        let timeline = session.timeline().unwrap();
        let boosted: Vec<bool> = timeline.markers.iter().map(|m| m.boosted).collect();
        assert_eq!(boosted, vec![false, true]);
        assert_eq!(timeline.labels.len(), 5);
    }

    #[test]
    fn test_exclude_hides_inbox_and_sent() {
        let mut session = Session::default();
        session.update(Action::Replace(Batch::Inbox(vec![inbox("a@x.com", 1)])));
        session.update(Action::Replace(Batch::Sent(vec![SentEvent {
            id: None,
            sender: "me".to_string(),
            receivers: vec!["a@x.com".to_string()],
            subject: "re".to_string(),
            body: None,
            timestamp: at(2),
        }])));
        session.update(Action::Exclude("a@x.com".to_string()));

        let visible = session.filter().visible(session.store());
        assert!(visible.inbox.is_empty());
        assert!(visible.sent.is_empty());
        assert!(session.timeline().is_none());
    }

    #[test]
    fn test_sender_sets_survive_reload() {
        let mut session = Session::default();
        session.update(Action::Mark("b@x.com".to_string()));
        session.update(Action::Exclude("a@x.com".to_string()));
        session.update(Action::Replace(Batch::Inbox(vec![inbox("a@x.com", 1)])));
        session.update(Action::Replace(Batch::Inbox(vec![
            inbox("a@x.com", 3),
            inbox("b@x.com", 4),
        ])));

        assert_eq!(session.excluded(), vec!["a@x.com"]);
        assert_eq!(session.marked(), vec!["b@x.com"]);
        let visible = session.filter().visible(session.store());
        assert_eq!(visible.inbox.len(), 1);
        let timeline = session.timeline().unwrap();
        assert_eq!(timeline.markers.len(), 1);
        assert!(timeline.markers[0].boosted);
    }

    #[test]
    fn test_date_range_actions() {
        let mut session = Session::default();
        session.update(Action::Replace(Batch::Inbox(vec![
            inbox("a@x.com", 1),
            inbox("a@x.com", 5),
        ])));

        assert!(session.update(Action::SetFrom(Some(at(2)))));
        assert!(!session.update(Action::SetFrom(Some(at(2)))));
        let timeline = session.timeline().unwrap();
        assert_eq!(timeline.markers.len(), 1);
        // A single visible event sits in the middle
        assert!((timeline.markers[0].position - 50.0).abs() < f64::EPSILON);

        assert!(session.update(Action::ClearDateRange));
        assert!(session.range().is_unbounded());
        assert_eq!(session.timeline().unwrap().markers.len(), 2);
    }

    #[test]
    fn test_replace_reports_category() {
        let mut session = Session::default();
        let batch = Batch::Images(Vec::new());
        assert_eq!(batch.category(), Category::Images);
        assert!(session.update(Action::Replace(batch)));
        assert!(session.store().is_empty());
    }

    #[derive(Debug, Clone)]
    enum Op {
        Exclude(String),
        Include(String),
    }

    fn op() -> impl Strategy<Value = Op> {
        let addr = prop_oneof![
            Just("a@x.com"),
            Just(" A@X.com"),
            Just("b@x.com"),
            Just("B@x.COM "),
        ]
        .prop_map(ToString::to_string);
        prop_oneof![
            addr.clone().prop_map(Op::Exclude),
            addr.prop_map(Op::Include),
        ]
    }

    proptest! {
        #[test]
        fn prop_excluded_iff_last_op_was_exclude(ops in proptest::collection::vec(op(), 0..20)) {
            let mut session = Session::default();
            for op in &ops {
                match op {
                    Op::Exclude(s) => session.update(Action::Exclude(s.clone())),
                    Op::Include(s) => session.update(Action::Include(s.clone())),
                };
            }

            for address in ["a@x.com", "b@x.com"] {
                let last = ops.iter().rev().find_map(|op| match op {
                    Op::Exclude(s) if normalize_sender(s).as_deref() == Some(address) => Some(true),
                    Op::Include(s) if normalize_sender(s).as_deref() == Some(address) => Some(false),
                    _ => None,
                });
                prop_assert_eq!(session.filter().is_sender_excluded(address), last.unwrap_or(false));
            }
        }
    }
}
