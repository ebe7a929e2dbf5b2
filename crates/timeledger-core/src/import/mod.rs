//! Exporters that turn raw mail archives and browser profiles into the
//! JSON files the loader reads.
//!
//! - [`mbox`]: an mbox archive becomes a list of [`MailRecord`]s, usable as
//!   either a sent or an inbox file
//! - [`firefox`]: a `places.sqlite` database becomes a list of
//!   [`BrowserRecord`](crate::event::BrowserRecord)s

pub mod firefox;
pub mod mbox;

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::Result;

/// One exported message.
///
/// The field set is a superset of both the sent and the inbox schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailRecord {
    /// Position in the archive, starting at 1.
    pub id: u64,
    /// Decoded subject.
    pub subject: String,
    /// Lowercased sender address.
    pub sender: String,
    /// Lowercased `To` addresses.
    pub receivers: Vec<String>,
    /// RFC 3339 date, or `None` when the message has no usable date.
    pub timestamp: Option<String>,
    /// Plain-text body.
    pub body: String,
}

/// Writes `value` as pretty-printed JSON, creating parent directories.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub async fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }

    let contents = serde_json::to_string_pretty(value)?;
    tokio::fs::write(path, contents).await?;

    info!(path = %path.display(), "Export written");
    Ok(())
}
