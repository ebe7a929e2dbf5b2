//! MIME message structure and handling.

use crate::content_type::ContentType;
use crate::encoding::{decode_base64, decode_charset, decode_quoted_printable};
use crate::error::{Error, Result};
use crate::header::Headers;
use std::fmt;

/// Transfer encoding types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferEncoding {
    /// 7-bit ASCII.
    SevenBit,
    /// 8-bit binary.
    EightBit,
    /// Base64 encoding.
    Base64,
    /// Quoted-Printable encoding.
    QuotedPrintable,
    /// Binary (no encoding).
    Binary,
}

impl TransferEncoding {
    /// Parses transfer encoding from string.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "8bit" => Self::EightBit,
            "base64" => Self::Base64,
            "quoted-printable" => Self::QuotedPrintable,
            "binary" => Self::Binary,
            _ => Self::SevenBit, // Default (includes "7bit")
        }
    }

    /// Decodes a body encoded with this transfer encoding.
    ///
    /// # Errors
    ///
    /// Returns an error if a Base64 payload is truncated past recovery.
    pub fn decode(self, body: &[u8]) -> Result<Vec<u8>> {
        match self {
            Self::Base64 => decode_base64(&String::from_utf8_lossy(body)),
            Self::QuotedPrintable => Ok(decode_quoted_printable(body)),
            Self::SevenBit | Self::EightBit | Self::Binary => Ok(body.to_vec()),
        }
    }
}

impl fmt::Display for TransferEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SevenBit => write!(f, "7bit"),
            Self::EightBit => write!(f, "8bit"),
            Self::Base64 => write!(f, "base64"),
            Self::QuotedPrintable => write!(f, "quoted-printable"),
            Self::Binary => write!(f, "binary"),
        }
    }
}

/// A leaf MIME part (never itself multipart).
#[derive(Debug, Clone)]
pub struct Part {
    /// Part headers.
    pub headers: Headers,
    /// Part body, still transfer-encoded.
    pub body: Vec<u8>,
}

impl Part {
    /// Creates a new part.
    #[must_use]
    pub const fn new(headers: Headers, body: Vec<u8>) -> Self {
        Self { headers, body }
    }

    /// Gets the content type, defaulting to `text/plain` when absent or malformed.
    #[must_use]
    pub fn content_type(&self) -> ContentType {
        content_type_of(&self.headers)
    }

    /// Gets the transfer encoding.
    #[must_use]
    pub fn transfer_encoding(&self) -> TransferEncoding {
        self.headers
            .get("content-transfer-encoding")
            .map_or(TransferEncoding::SevenBit, TransferEncoding::parse)
    }

    /// Checks whether the part is declared as an attachment.
    #[must_use]
    pub fn is_attachment(&self) -> bool {
        self.headers
            .get("content-disposition")
            .is_some_and(|d| d.to_ascii_lowercase().contains("attachment"))
    }

    /// Decodes the body according to the transfer encoding.
    ///
    /// # Errors
    ///
    /// Returns an error if decoding fails.
    pub fn decode_body(&self) -> Result<Vec<u8>> {
        self.transfer_encoding().decode(&self.body)
    }

    /// Gets the decoded body as text, applying the part's charset.
    ///
    /// # Errors
    ///
    /// Returns an error if transfer decoding fails.
    pub fn body_text(&self) -> Result<String> {
        let decoded = self.decode_body()?;
        Ok(decode_charset(&decoded, self.content_type().charset()))
    }
}

/// A parsed MIME message.
///
/// Multipart bodies are flattened into their leaf parts in document
/// order, nested multiparts included.
#[derive(Debug, Clone)]
pub struct Message {
    /// Top-level message headers.
    pub headers: Headers,
    /// Leaf parts (a single-part message has exactly one).
    pub parts: Vec<Part>,
}

impl Message {
    /// Parses a raw RFC 5322 message.
    ///
    /// # Errors
    ///
    /// Returns an error if a multipart body lacks its boundary parameter.
    pub fn parse(raw: &str) -> Result<Self> {
        let (head, body) = split_head_body(raw);
        let headers = Headers::parse(head);
        let mut parts = Vec::new();
        collect_parts(headers.clone(), body, &mut parts)?;
        Ok(Self { headers, parts })
    }

    /// Gets the content type of the message itself.
    #[must_use]
    pub fn content_type(&self) -> ContentType {
        content_type_of(&self.headers)
    }

    /// Extracts the plain-text body.
    ///
    /// For multipart messages this is the first `text/plain` part that is
    /// not an attachment; a single-part message yields its decoded body
    /// whatever its type. Parts that fail to decode are skipped.
    #[must_use]
    pub fn plain_text(&self) -> Option<String> {
        if !self.content_type().is_multipart() {
            return self.parts.first().and_then(|p| p.body_text().ok());
        }

        self.parts
            .iter()
            .filter(|p| p.content_type().is_text_plain() && !p.is_attachment())
            .find_map(|p| p.body_text().ok())
    }
}

fn content_type_of(headers: &Headers) -> ContentType {
    headers
        .get("content-type")
        .and_then(|ct| ContentType::parse(ct).ok())
        .unwrap_or_else(ContentType::text_plain)
}

/// Splits a raw entity at the first empty line.
fn split_head_body(raw: &str) -> (&str, &str) {
    let crlf = raw.find("\r\n\r\n").map(|i| (i, 4));
    let lf = raw.find("\n\n").map(|i| (i, 2));
    let split = match (crlf, lf) {
        (Some(a), Some(b)) => Some(if a.0 <= b.0 { a } else { b }),
        (a, b) => a.or(b),
    };

    match split {
        Some((index, len)) => (&raw[..index], &raw[index + len..]),
        None => (raw, ""),
    }
}

fn collect_parts(headers: Headers, body: &str, out: &mut Vec<Part>) -> Result<()> {
    let content_type = content_type_of(&headers);
    if !content_type.is_multipart() {
        out.push(Part::new(headers, body.as_bytes().to_vec()));
        return Ok(());
    }

    let boundary = content_type.boundary().ok_or(Error::MissingBoundary)?;
    for section in split_multipart(body, boundary) {
        let (head, inner) = split_head_body(section);
        collect_parts(Headers::parse(head), inner, out)?;
    }
    Ok(())
}

/// Returns the sections between `--boundary` delimiter lines.
fn split_multipart<'a>(body: &'a str, boundary: &str) -> Vec<&'a str> {
    let delimiter = format!("--{boundary}");
    let closing = format!("--{boundary}--");

    let mut sections = Vec::new();
    let mut start: Option<usize> = None;
    let mut offset = 0;

    for line in body.split_inclusive('\n') {
        let trimmed = line.trim_end();
        if trimmed == delimiter || trimmed == closing {
            if let Some(s) = start {
                sections.push(body[s..offset].trim_end_matches(['\r', '\n']));
            }
            if trimmed == closing {
                return sections;
            }
            start = Some(offset + line.len());
        }
        offset += line.len();
    }

    // Unterminated multipart: keep whatever followed the last delimiter
    if let Some(s) = start {
        sections.push(&body[s..]);
    }
    sections
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_transfer_encoding_parse() {
        assert_eq!(TransferEncoding::parse("7bit"), TransferEncoding::SevenBit);
        assert_eq!(TransferEncoding::parse(" Base64 "), TransferEncoding::Base64);
        assert_eq!(
            TransferEncoding::parse("quoted-printable"),
            TransferEncoding::QuotedPrintable
        );
    }

    #[test]
    fn test_single_part_message() {
        let raw = "From: Sender <sender@example.com>\nTo: recipient@example.com\nSubject: Test\n\nHello, World!\n";
        let message = Message::parse(raw).unwrap();

        assert_eq!(message.headers.get("from"), Some("Sender <sender@example.com>"));
        assert_eq!(message.headers.get("to"), Some("recipient@example.com"));
        assert_eq!(message.headers.get("subject"), Some("Test"));
        assert_eq!(message.parts.len(), 1);
        assert_eq!(message.plain_text().unwrap(), "Hello, World!\n");
    }

    #[test]
    fn test_single_part_quoted_printable_latin1() {
        let raw = concat!(
            "Subject: =?iso-8859-1?Q?caf=E9?=\r\n",
            "Content-Type: text/plain; charset=iso-8859-1\r\n",
            "Content-Transfer-Encoding: quoted-printable\r\n",
            "\r\n",
            "caf=E9 cr=E8me"
        );
        let message = Message::parse(raw).unwrap();
        assert_eq!(message.headers.decoded("subject").unwrap(), "café");
        assert_eq!(message.plain_text().unwrap(), "café crème");
    }

    #[test]
    fn test_multipart_skips_attachments_and_html() {
        let raw = concat!(
            "Content-Type: multipart/mixed; boundary=\"outer\"\n",
            "\n",
            "preamble\n",
            "--outer\n",
            "Content-Type: text/plain\n",
            "Content-Disposition: attachment; filename=notes.txt\n",
            "\n",
            "attached notes\n",
            "--outer\n",
            "Content-Type: multipart/alternative; boundary=inner\n",
            "\n",
            "--inner\n",
            "Content-Type: text/html\n",
            "\n",
            "<p>Hi</p>\n",
            "--inner\n",
            "Content-Type: text/plain; charset=utf-8\n",
            "Content-Transfer-Encoding: base64\n",
            "\n",
            "SMOpbGxv\n",
            "--inner--\n",
            "--outer--\n",
            "epilogue\n"
        );

        let message = Message::parse(raw).unwrap();
        assert_eq!(message.parts.len(), 3);
        assert!(message.parts[0].is_attachment());
        assert_eq!(message.plain_text().unwrap(), "Héllo");
    }

    #[test]
    fn test_multipart_without_text_part() {
        let raw = concat!(
            "Content-Type: multipart/mixed; boundary=b\n",
            "\n",
            "--b\n",
            "Content-Type: image/png\n",
            "\n",
            "xyz\n",
            "--b--\n"
        );
        let message = Message::parse(raw).unwrap();
        assert!(message.plain_text().is_none());
    }

    #[test]
    fn test_multipart_missing_boundary() {
        let raw = "Content-Type: multipart/mixed\n\nbody";
        assert!(matches!(Message::parse(raw), Err(Error::MissingBoundary)));
    }

    #[test]
    fn test_headers_only_message() {
        let message = Message::parse("Subject: empty").unwrap();
        assert_eq!(message.headers.get("subject"), Some("empty"));
        assert_eq!(message.plain_text().unwrap(), "");
    }
}
