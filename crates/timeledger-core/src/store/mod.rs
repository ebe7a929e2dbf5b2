//! In-memory event store.
//!
//! Collections are replaced wholesale on every successful load and never
//! merged across loads. Parsing happens before replacement (see
//! [`crate::loader`]), so a failed load cannot leave a collection half
//! filled.

mod senders;

pub use senders::{SenderSet, normalize_sender};

use crate::event::{BrowserRecord, BrowserVisit, ImageEvent, InboxEvent, SentEvent};

/// The four event collections of a session.
#[derive(Debug, Clone, Default)]
pub struct EventStore {
    sent: Vec<SentEvent>,
    inbox: Vec<InboxEvent>,
    images: Vec<ImageEvent>,
    history: Vec<BrowserRecord>,
}

impl EventStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sent mail.
    #[must_use]
    pub fn sent(&self) -> &[SentEvent] {
        &self.sent
    }

    /// Received mail.
    #[must_use]
    pub fn inbox(&self) -> &[InboxEvent] {
        &self.inbox
    }

    /// Image files.
    #[must_use]
    pub fn images(&self) -> &[ImageEvent] {
        &self.images
    }

    /// Browser history records (unexpanded).
    #[must_use]
    pub fn history(&self) -> &[BrowserRecord] {
        &self.history
    }

    /// Every browser visit, one per recorded timestamp.
    pub fn visits(&self) -> impl Iterator<Item = BrowserVisit<'_>> {
        self.history.iter().flat_map(BrowserRecord::visits)
    }

    /// Replaces the sent collection.
    pub fn replace_sent(&mut self, events: Vec<SentEvent>) {
        self.sent = events;
    }

    /// Replaces the inbox collection.
    pub fn replace_inbox(&mut self, events: Vec<InboxEvent>) {
        self.inbox = events;
    }

    /// Replaces the image collection.
    pub fn replace_images(&mut self, events: Vec<ImageEvent>) {
        self.images = events;
    }

    /// Replaces the browser history collection.
    pub fn replace_history(&mut self, records: Vec<BrowserRecord>) {
        self.history = records;
    }

    /// Total number of events, counting every browser visit separately.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sent.len() + self.inbox.len() + self.images.len() + self.visits().count()
    }

    /// Returns true if there is nothing to show.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn inbox(subject: &str) -> InboxEvent {
        InboxEvent {
            id: None,
            sender: Some("a@x.com".to_string()),
            subject: subject.to_string(),
            body: None,
            timestamp: Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_replace_is_wholesale() {
        let mut store = EventStore::new();
        store.replace_inbox(vec![inbox("one"), inbox("two")]);
        store.replace_inbox(vec![inbox("three")]);

        assert_eq!(store.inbox().len(), 1);
        assert_eq!(store.inbox()[0].subject, "three");
    }

    #[test]
    fn test_len_counts_visits() {
        let mut store = EventStore::new();
        assert!(store.is_empty());

        store.replace_history(vec![BrowserRecord {
            title: "T".to_string(),
            url: "http://x".to_string(),
            visit_count: 2,
            timestamps: vec![
                Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2023, 1, 2, 0, 0, 0).unwrap(),
            ],
        }]);
        store.replace_inbox(vec![inbox("x")]);

        assert_eq!(store.len(), 3);
    }
}
