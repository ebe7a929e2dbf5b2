//! Sender-based inclusion and emphasis.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::range::DateRange;
use crate::event::{BrowserVisit, ImageEvent, InboxEvent, SentEvent};
use crate::store::{EventStore, SenderSet};

/// Filtering verdict for one mail event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Inclusion {
    /// Whether the event is rendered at all.
    pub visible: bool,
    /// Whether it is emphasized because of a marked address.
    pub boosted: bool,
}

impl Inclusion {
    const HIDDEN: Self = Self {
        visible: false,
        boosted: false,
    };
}

/// A visible event together with its emphasis flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Filtered<T> {
    /// The event.
    pub event: T,
    /// Whether a marked address is involved.
    pub boosted: bool,
}

/// The visible subset of every collection.
#[derive(Debug, Clone, Default)]
pub struct VisibleEvents<'a> {
    /// Visible received mail.
    pub inbox: Vec<Filtered<&'a InboxEvent>>,
    /// Visible sent mail.
    pub sent: Vec<Filtered<&'a SentEvent>>,
    /// Images inside the date range.
    pub images: Vec<&'a ImageEvent>,
    /// Browser visits inside the date range.
    pub visits: Vec<BrowserVisit<'a>>,
}

impl VisibleEvents<'_> {
    /// Instants of every visible event, across all categories.
    pub fn timestamps(&self) -> impl Iterator<Item = DateTime<Utc>> + '_ {
        self.inbox
            .iter()
            .map(|f| f.event.timestamp)
            .chain(self.sent.iter().map(|f| f.event.timestamp))
            .chain(self.images.iter().map(|i| i.timestamp))
            .chain(self.visits.iter().map(|v| v.timestamp))
    }

    /// Number of visible events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inbox.len() + self.sent.len() + self.images.len() + self.visits.len()
    }

    /// Returns true if nothing is visible.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Applies the date range and the marked/excluded sender sets.
///
/// Exclusion always wins over marking. Images and browser visits have no
/// sender and are filtered by date only.
#[derive(Debug, Clone, Copy)]
pub struct FilterEngine<'a> {
    marked: &'a SenderSet,
    excluded: &'a SenderSet,
    range: DateRange,
}

impl<'a> FilterEngine<'a> {
    /// Creates an engine over the given sets and range.
    #[must_use]
    pub const fn new(marked: &'a SenderSet, excluded: &'a SenderSet, range: DateRange) -> Self {
        Self {
            marked,
            excluded,
            range,
        }
    }

    /// Whether the (trimmed, case-folded) sender is marked.
    #[must_use]
    pub fn is_sender_marked(&self, sender: &str) -> bool {
        self.marked.contains(sender)
    }

    /// Whether the (trimmed, case-folded) sender is excluded.
    #[must_use]
    pub fn is_sender_excluded(&self, sender: &str) -> bool {
        self.excluded.contains(sender)
    }

    /// Inbox mail is hidden when its sender is excluded and boosted when
    /// its sender is marked. A missing or blank sender is always visible.
    #[must_use]
    pub fn filter_inbox(&self, event: &InboxEvent) -> Inclusion {
        let Some(sender) = event.sender.as_deref().filter(|s| !s.trim().is_empty()) else {
            return Inclusion {
                visible: true,
                boosted: false,
            };
        };

        if self.is_sender_excluded(sender) {
            return Inclusion::HIDDEN;
        }

        Inclusion {
            visible: true,
            boosted: self.is_sender_marked(sender),
        }
    }

    /// Sent mail is judged by its receivers: the first excluded receiver
    /// hides the whole event, otherwise any marked receiver boosts it.
    #[must_use]
    pub fn filter_sent(&self, event: &SentEvent) -> Inclusion {
        let mut boosted = false;

        for receiver in &event.receivers {
            if self.is_sender_excluded(receiver) {
                return Inclusion::HIDDEN;
            }
            boosted |= self.is_sender_marked(receiver);
        }

        Inclusion {
            visible: true,
            boosted,
        }
    }

    /// Computes the visible subset of every collection in the store.
    #[must_use]
    pub fn visible(&self, store: &'a EventStore) -> VisibleEvents<'a> {
        let inbox = self
            .range
            .apply(store.inbox())
            .into_iter()
            .filter_map(|event| {
                let inclusion = self.filter_inbox(event);
                inclusion.visible.then_some(Filtered {
                    event,
                    boosted: inclusion.boosted,
                })
            })
            .collect();

        let sent = self
            .range
            .apply(store.sent())
            .into_iter()
            .filter_map(|event| {
                let inclusion = self.filter_sent(event);
                inclusion.visible.then_some(Filtered {
                    event,
                    boosted: inclusion.boosted,
                })
            })
            .collect();

        VisibleEvents {
            inbox,
            sent,
            images: self.range.apply(store.images()),
            visits: self.range.apply(store.visits()),
        }
    }
}
