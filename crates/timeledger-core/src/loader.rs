//! Loading event collections from data files.
//!
//! Every parse function is pure: it either returns the complete new
//! collection or an error, and never touches a store. Replacing the
//! collection is left to the caller (see [`crate::Action::Replace`]), so a
//! malformed file can never corrupt what is already loaded.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::event::{BrowserRecord, Category, ImageEvent, InboxEvent, RawTimestamp, SentEvent};
use crate::{Error, Result};

/// A freshly parsed collection, ready to replace the stored one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Batch {
    /// Sent mail.
    Sent(Vec<SentEvent>),
    /// Received mail.
    Inbox(Vec<InboxEvent>),
    /// Image files.
    Images(Vec<ImageEvent>),
    /// Browser history.
    History(Vec<BrowserRecord>),
}

impl Batch {
    /// The collection this batch replaces.
    #[must_use]
    pub const fn category(&self) -> Category {
        match self {
            Self::Sent(_) => Category::Sent,
            Self::Inbox(_) => Category::Inbox,
            Self::Images(_) => Category::Images,
            Self::History(_) => Category::History,
        }
    }

    /// Number of records in the batch.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Sent(events) => events.len(),
            Self::Inbox(events) => events.len(),
            Self::Images(events) => events.len(),
            Self::History(records) => records.len(),
        }
    }

    /// Returns true if the batch holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Result of a successful load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    /// The parsed collection.
    pub batch: Batch,
    /// Records dropped because they carried no timestamp.
    pub skipped: usize,
}

/// Parses a sent-mail JSON array.
///
/// # Errors
///
/// Returns [`Error::InvalidFile`] if the text is not a JSON array of sent
/// records or a timestamp cannot be parsed.
pub fn parse_sent(text: &str) -> Result<LoadReport> {
    let (events, skipped) = parse_records::<RawSent>(Category::Sent, text)?;
    Ok(LoadReport {
        batch: Batch::Sent(events),
        skipped,
    })
}

/// Parses an inbox JSON array.
///
/// # Errors
///
/// Returns [`Error::InvalidFile`] if the text is not a JSON array of inbox
/// records or a timestamp cannot be parsed.
pub fn parse_inbox(text: &str) -> Result<LoadReport> {
    let (events, skipped) = parse_records::<RawInbox>(Category::Inbox, text)?;
    Ok(LoadReport {
        batch: Batch::Inbox(events),
        skipped,
    })
}

/// Parses a browser history JSON array.
///
/// Records keep all of their visit timestamps; expansion into individual
/// visits happens at filter time.
///
/// # Errors
///
/// Returns [`Error::InvalidFile`] if the text is not a JSON array of
/// history records or a timestamp cannot be parsed.
pub fn parse_history(text: &str) -> Result<LoadReport> {
    let (records, skipped) = parse_records::<RawBrowser>(Category::History, text)?;
    Ok(LoadReport {
        batch: Batch::History(records),
        skipped,
    })
}

/// Builds image events from file-system metadata.
///
/// Directories are expanded to the regular files they contain, sorted by
/// name. File contents are never read.
///
/// # Errors
///
/// Returns [`Error::Unreadable`] if any path or its modification time
/// cannot be read; nothing is returned in that case.
pub async fn load_images(paths: &[PathBuf]) -> Result<LoadReport> {
    let mut events = Vec::new();

    for path in paths {
        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|e| Error::unreadable(path, e))?;

        if metadata.is_dir() {
            for file in list_files(path).await? {
                events.push(image_event(&file).await?);
            }
        } else {
            events.push(image_event(path).await?);
        }
    }

    info!(count = events.len(), "Loaded image events");
    Ok(LoadReport {
        batch: Batch::Images(events),
        skipped: 0,
    })
}

/// Reads and parses a data file for the given collection.
///
/// Images take any number of files or directories; the JSON collections
/// take exactly one file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub async fn load(category: Category, paths: &[PathBuf]) -> Result<LoadReport> {
    let parse: fn(&str) -> Result<LoadReport> = match category {
        Category::Sent => parse_sent,
        Category::Inbox => parse_inbox,
        Category::History => parse_history,
        Category::Images => return load_images(paths).await,
    };

    let [path] = paths else {
        return Err(Error::InvalidFile {
            category,
            reason: format!("expected one file, got {}", paths.len()),
        });
    };

    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| Error::unreadable(path, e))?;
    debug!(path = %path.display(), bytes = text.len(), "Read data file");

    parse(&text)
}

async fn list_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .map_err(|e| Error::unreadable(dir, e))?;

    let mut files = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| Error::unreadable(dir, e))?
    {
        let file_type = entry
            .file_type()
            .await
            .map_err(|e| Error::unreadable(entry.path(), e))?;
        if file_type.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

async fn image_event(path: &Path) -> Result<ImageEvent> {
    let modified = tokio::fs::metadata(path)
        .await
        .and_then(|metadata| metadata.modified())
        .map_err(|e| Error::unreadable(path, e))?;

    let name = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());

    Ok(ImageEvent {
        name,
        path: path.to_path_buf(),
        timestamp: DateTime::<Utc>::from(modified),
    })
}

/// A JSON record that turns into an event, or into nothing when undated.
trait RawRecord: DeserializeOwned {
    type Event;

    fn into_event(self) -> Result<Option<Self::Event>>;
}

fn parse_records<R: RawRecord>(category: Category, text: &str) -> Result<(Vec<R::Event>, usize)> {
    let raw: Vec<R> = serde_json::from_str(text).map_err(|e| Error::InvalidFile {
        category,
        reason: e.to_string(),
    })?;

    let mut events = Vec::with_capacity(raw.len());
    let mut skipped = 0;

    for (index, record) in raw.into_iter().enumerate() {
        match record.into_event() {
            Ok(Some(event)) => events.push(event),
            Ok(None) => {
                warn!(%category, index, "Skipping record without timestamp");
                skipped += 1;
            }
            Err(e) => {
                return Err(Error::InvalidFile {
                    category,
                    reason: format!("record {index}: {e}"),
                });
            }
        }
    }

    info!(%category, count = events.len(), skipped, "Parsed data file");
    Ok((events, skipped))
}

/// `receivers` as exported: normally a list, occasionally a single string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Receivers {
    Many(Vec<String>),
    One(String),
}

impl From<Receivers> for Vec<String> {
    fn from(receivers: Receivers) -> Self {
        match receivers {
            Receivers::Many(list) => list,
            Receivers::One(single) => vec![single],
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawSent {
    id: Option<u64>,
    sender: Option<String>,
    receivers: Option<Receivers>,
    subject: Option<String>,
    body: Option<String>,
    timestamp: Option<RawTimestamp>,
}

impl RawRecord for RawSent {
    type Event = SentEvent;

    fn into_event(self) -> Result<Option<SentEvent>> {
        let Some(timestamp) = self.timestamp else {
            return Ok(None);
        };
        Ok(Some(SentEvent {
            id: self.id,
            sender: self.sender.unwrap_or_default(),
            receivers: self.receivers.map(Vec::from).unwrap_or_default(),
            subject: self.subject.unwrap_or_default(),
            body: self.body,
            timestamp: timestamp.resolve()?,
        }))
    }
}

#[derive(Debug, Deserialize)]
struct RawInbox {
    id: Option<u64>,
    sender: Option<String>,
    subject: Option<String>,
    body: Option<String>,
    timestamp: Option<RawTimestamp>,
}

impl RawRecord for RawInbox {
    type Event = InboxEvent;

    fn into_event(self) -> Result<Option<InboxEvent>> {
        let Some(timestamp) = self.timestamp else {
            return Ok(None);
        };
        Ok(Some(InboxEvent {
            id: self.id,
            sender: self.sender,
            subject: self.subject.unwrap_or_default(),
            body: self.body,
            timestamp: timestamp.resolve()?,
        }))
    }
}

#[derive(Debug, Deserialize)]
struct RawBrowser {
    title: Option<String>,
    url: Option<String>,
    visit_count: Option<u64>,
    timestamps: Option<Vec<Option<RawTimestamp>>>,
}

impl RawRecord for RawBrowser {
    type Event = BrowserRecord;

    fn into_event(self) -> Result<Option<BrowserRecord>> {
        let timestamps = self
            .timestamps
            .unwrap_or_default()
            .iter()
            .flatten()
            .map(RawTimestamp::resolve)
            .collect::<Result<Vec<_>>>()?;

        Ok(Some(BrowserRecord {
            title: self.title.unwrap_or_default(),
            url: self.url.unwrap_or_default(),
            visit_count: self.visit_count.unwrap_or_default(),
            timestamps,
        }))
    }
}
