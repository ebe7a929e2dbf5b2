//! mbox archive export.

use std::path::Path;

use chrono::{DateTime, Utc};
use timeledger_mime::{Headers, Mbox, Message, parse_address_list, parse_date};
use tracing::{info, warn};

use super::MailRecord;
use crate::{Error, Result};

const NO_SUBJECT: &str = "(No subject)";
const UNKNOWN_SENDER: &str = "(unknown)";

/// Converts every message of an mbox archive into a [`MailRecord`].
///
/// Records come back in chronological order with undated messages first;
/// ids keep the archive position.
#[must_use]
pub fn parse_mbox(text: &str) -> Vec<MailRecord> {
    let mut dated: Vec<(Option<DateTime<Utc>>, MailRecord)> = Mbox::new(text)
        .zip(1u64..)
        .map(|(raw, id)| record_from_raw(id, &raw))
        .collect();

    dated.sort_by_key(|(instant, _)| *instant);
    dated.into_iter().map(|(_, record)| record).collect()
}

/// Reads an mbox file and converts it.
///
/// Non-UTF-8 bytes are replaced rather than rejected.
///
/// # Errors
///
/// Returns [`Error::Unreadable`] if the file cannot be read.
pub async fn import_mbox(path: &Path) -> Result<Vec<MailRecord>> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| Error::unreadable(path, e))?;
    let text = String::from_utf8_lossy(&bytes);

    let records = parse_mbox(&text);
    let undated = records.iter().filter(|r| r.timestamp.is_none()).count();
    info!(path = %path.display(), count = records.len(), undated, "Imported mbox");
    Ok(records)
}

fn record_from_raw(id: u64, raw: &str) -> (Option<DateTime<Utc>>, MailRecord) {
    let (headers, body) = match Message::parse(raw) {
        Ok(message) => {
            let body = message.plain_text().unwrap_or_default();
            (message.headers, body)
        }
        Err(e) => {
            warn!(id, error = %e, "Unparseable message body, keeping headers only");
            let head = raw.split("\n\n").next().unwrap_or(raw);
            (Headers::parse(head), String::new())
        }
    };

    let subject = headers
        .decoded("subject")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| NO_SUBJECT.to_string());

    let sender = headers
        .get("from")
        .and_then(|from| parse_address_list(from).into_iter().next())
        .map_or_else(|| UNKNOWN_SENDER.to_string(), |a| a.email.to_lowercase());

    let receivers = headers
        .get_all("to")
        .into_iter()
        .flat_map(parse_address_list)
        .map(|a| a.email.to_lowercase())
        .collect();

    let date = headers.get("date").and_then(|date| match parse_date(date) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            warn!(id, date, error = %e, "Unparseable Date header");
            None
        }
    });

    let record = MailRecord {
        id,
        subject,
        sender,
        receivers,
        timestamp: date.map(|d| d.to_rfc3339()),
        body,
    };
    (date.map(|d| d.with_timezone(&Utc)), record)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const ARCHIVE: &str = "From alice@example.com Mon Jan  2 10:00:00 2023\n\
From: \"Alice\" <Alice@Example.com>\n\
To: Bob <BOB@example.com>, carol@example.com\n\
Subject: =?UTF-8?B?SMOpbGxv?=\n\
Date: Mon, 2 Jan 2023 10:00:00 +0100\n\
\n\
Second message.\n\
\n\
From nobody Thu Jan  1 00:00:00 1970\n\
From: dave@example.com\n\
To: alice@example.com\n\
\n\
No date here.\n\
\n\
From bob@example.com Sun Jan  1 09:00:00 2023\n\
From: bob@example.com\n\
To: alice@example.com\n\
Subject: First\n\
Date: Sun, 1 Jan 2023 09:00:00 +0000\n\
Content-Type: multipart/mixed; boundary=\"xyz\"\n\
\n\
--xyz\n\
Content-Type: text/plain; charset=utf-8\n\
\n\
Plain body.\n\
--xyz\n\
Content-Type: text/plain\n\
Content-Disposition: attachment; filename=\"notes.txt\"\n\
\n\
Attached.\n\
--xyz--\n";

    #[test]
    fn test_parse_mbox_orders_and_normalizes() {
        let records = parse_mbox(ARCHIVE);
        assert_eq!(records.len(), 3);

        // Undated first, then chronological
        let ids: Vec<u64> = records.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);

        let undated = &records[0];
        assert_eq!(undated.timestamp, None);
        assert_eq!(undated.subject, NO_SUBJECT);

        let first = &records[1];
        assert_eq!(first.subject, "First");
        assert_eq!(first.body.trim(), "Plain body.");
        assert_eq!(first.timestamp.as_deref(), Some("2023-01-01T09:00:00+00:00"));

        let second = &records[2];
        assert_eq!(second.subject, "Héllo");
        assert_eq!(second.sender, "alice@example.com");
        assert_eq!(second.receivers, vec!["bob@example.com", "carol@example.com"]);
        assert_eq!(second.timestamp.as_deref(), Some("2023-01-02T10:00:00+01:00"));
    }

    #[test]
    fn test_missing_from_is_unknown() {
        let records = parse_mbox("From x\nSubject: hi\n\nbody\n");
        assert_eq!(records[0].sender, UNKNOWN_SENDER);
        assert!(records[0].receivers.is_empty());
    }

    #[test]
    fn test_broken_multipart_keeps_headers() {
        let records = parse_mbox(
            "From x\nFrom: a@x.com\nSubject: broken\nContent-Type: multipart/mixed\n\nbody\n",
        );
        assert_eq!(records[0].subject, "broken");
        assert_eq!(records[0].sender, "a@x.com");
        assert!(records[0].body.is_empty());
    }

    #[test]
    fn test_sloppy_transfer_encodings_keep_body() {
        let records = parse_mbox(
            "From x\nFrom: a@x.com\nSubject: qp\n\
Content-Type: text/plain; charset=utf-8\n\
Content-Transfer-Encoding: quoted-printable\n\
\n\
price = 5 caf=C3=A9\n\
\n\
From y\nFrom: b@x.com\nSubject: b64\n\
Content-Transfer-Encoding: base64\n\
\n\
aGVsbG8\n",
        );
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].body.trim(), "price = 5 café");
        assert_eq!(records[1].body.trim(), "hello");
    }

    #[tokio::test]
    async fn test_import_mbox_file_feeds_the_loader() {
        let dir = tempfile::tempdir().unwrap();
        let mbox = dir.path().join("inbox.mbox");
        let json = dir.path().join("out").join("inbox.json");
        std::fs::write(&mbox, ARCHIVE).unwrap();

        let records = import_mbox(&mbox).await.unwrap();
        super::super::write_json(&json, &records).await.unwrap();

        let text = std::fs::read_to_string(&json).unwrap();
        let report = crate::loader::parse_inbox(&text).unwrap();
        assert_eq!(report.batch.len(), 2);
        assert_eq!(report.skipped, 1);
    }
}
