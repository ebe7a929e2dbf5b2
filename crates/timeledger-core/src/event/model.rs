//! Event data models.

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The four kinds of event a timeline can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Mail sent by the user.
    Sent,
    /// Mail received by the user.
    Inbox,
    /// Image files.
    Images,
    /// Browser history visits.
    History,
}

impl Category {
    /// All categories, in presentation order (top lane first).
    pub const ALL: [Self; 4] = [Self::Sent, Self::Images, Self::History, Self::Inbox];

    /// Parse from a user-facing name.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "sent" => Some(Self::Sent),
            "inbox" => Some(Self::Inbox),
            "images" | "image" => Some(Self::Images),
            "history" | "browser" => Some(Self::History),
            _ => None,
        }
    }

    /// Convert to string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sent => "sent",
            Self::Inbox => "inbox",
            Self::Images => "images",
            Self::History => "history",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Anything positioned on the timeline by a single instant.
pub trait Timestamped {
    /// The instant this event happened.
    fn timestamp(&self) -> DateTime<Utc>;
}

/// A message the user sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SentEvent {
    /// Position in the exported mailbox, if the exporter recorded one.
    pub id: Option<u64>,
    /// Sending address.
    pub sender: String,
    /// Recipients, in header order.
    pub receivers: Vec<String>,
    /// Subject line.
    pub subject: String,
    /// Plain-text body.
    pub body: Option<String>,
    /// When it was sent.
    pub timestamp: DateTime<Utc>,
}

/// A message the user received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InboxEvent {
    /// Position in the exported mailbox, if the exporter recorded one.
    pub id: Option<u64>,
    /// Sending address; some exports leave it out.
    pub sender: Option<String>,
    /// Subject line.
    pub subject: String,
    /// Plain-text body.
    pub body: Option<String>,
    /// When it arrived.
    pub timestamp: DateTime<Utc>,
}

/// An image file, dated by its last-modified time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageEvent {
    /// Display name (file name).
    pub name: String,
    /// Where the image data lives; never read by the core.
    pub path: PathBuf,
    /// Last-modified time of the file.
    pub timestamp: DateTime<Utc>,
}

/// One page in the browser history with all of its visits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowserRecord {
    /// Page title.
    pub title: String,
    /// Page URL.
    pub url: String,
    /// Visit counter as reported by the browser.
    pub visit_count: u64,
    /// Every recorded visit, in file order.
    pub timestamps: Vec<DateTime<Utc>>,
}

impl BrowserRecord {
    /// Expands the record into one visit per timestamp.
    pub fn visits(&self) -> impl Iterator<Item = BrowserVisit<'_>> {
        self.timestamps
            .iter()
            .map(move |&timestamp| BrowserVisit {
                record: self,
                timestamp,
            })
    }
}

/// A single browser visit, borrowed from its [`BrowserRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrowserVisit<'a> {
    /// The page that was visited.
    pub record: &'a BrowserRecord,
    /// When.
    pub timestamp: DateTime<Utc>,
}

impl BrowserVisit<'_> {
    /// Page title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.record.title
    }

    /// Page URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.record.url
    }

    /// Visit counter of the page.
    #[must_use]
    pub const fn visit_count(&self) -> u64 {
        self.record.visit_count
    }
}

impl Timestamped for SentEvent {
    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

impl Timestamped for InboxEvent {
    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

impl Timestamped for ImageEvent {
    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

impl Timestamped for BrowserVisit<'_> {
    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

impl<T: Timestamped + ?Sized> Timestamped for &T {
    fn timestamp(&self) -> DateTime<Utc> {
        (**self).timestamp()
    }
}
