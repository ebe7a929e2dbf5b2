//! Presentation-ready markers.
//!
//! A [`Marker`] is everything a presenter needs to draw one event: where,
//! what kind, the hover text, whether it is emphasized and what clicking it
//! should do. Presenters own no timeline logic.

use std::path::PathBuf;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::event::{BrowserVisit, Category, ImageEvent, InboxEvent, SentEvent};
use crate::filter::VisibleEvents;
use crate::layout::Axis;

/// Side effect requested when a marker is activated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "target", rename_all = "snake_case")]
pub enum ClickAction {
    /// Copy text (addresses) to the clipboard.
    CopyText(String),
    /// Open a local file.
    OpenPath(PathBuf),
    /// Open a URL.
    OpenUrl(String),
}

/// One visible event, positioned on the axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    /// Which lane it belongs to.
    pub category: Category,
    /// Percentage along the axis.
    pub position: f64,
    /// The event's instant.
    pub timestamp: DateTime<Utc>,
    /// Hover text.
    pub tooltip: String,
    /// Emphasized because a marked address is involved.
    pub boosted: bool,
    /// What activating the marker does, if anything.
    pub click: Option<ClickAction>,
}

/// Flattens a mail body into a one-line preview of at most `limit` chars.
///
/// An ellipsis is appended when the body was cut.
#[must_use]
pub fn body_preview(body: &str, limit: usize) -> String {
    let flat: String = body
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect();

    let mut chars = flat.chars();
    let mut preview: String = chars.by_ref().take(limit).collect();
    if chars.next().is_some() {
        preview.push('…');
    }
    preview
}

fn display_time(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn with_preview(mut text: String, body: Option<&str>, limit: usize) -> String {
    text.push_str("\n\n");
    if let Some(body) = body {
        text.push_str(&body_preview(body, limit));
    }
    text
}

impl Marker {
    /// Marker for a received message. Clicking copies the sender.
    #[must_use]
    pub fn inbox(event: &InboxEvent, boosted: bool, axis: &Axis, preview_chars: usize) -> Self {
        let sender = event.sender.as_deref().unwrap_or("?");
        let tooltip = format!(
            "From: {sender}\nSubject: {}\nDate: {}",
            event.subject,
            display_time(event.timestamp)
        );

        let click = event
            .sender
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| ClickAction::CopyText(s.to_string()));

        Self {
            category: Category::Inbox,
            position: axis.position_of(event.timestamp),
            timestamp: event.timestamp,
            tooltip: with_preview(tooltip, event.body.as_deref(), preview_chars),
            boosted,
            click,
        }
    }

    /// Marker for a sent message. Clicking copies the receivers.
    #[must_use]
    pub fn sent(event: &SentEvent, boosted: bool, axis: &Axis, preview_chars: usize) -> Self {
        let receivers = event.receivers.join(", ");
        let tooltip = format!(
            "From: {}\nTo: {}\nSubject: {}\nDate: {}",
            event.sender,
            if receivers.is_empty() { "?" } else { &receivers },
            event.subject,
            display_time(event.timestamp)
        );

        let click = (!receivers.is_empty()).then(|| ClickAction::CopyText(receivers.clone()));

        Self {
            category: Category::Sent,
            position: axis.position_of(event.timestamp),
            timestamp: event.timestamp,
            tooltip: with_preview(tooltip, event.body.as_deref(), preview_chars),
            boosted,
            click,
        }
    }

    /// Marker for an image. Clicking opens the file.
    #[must_use]
    pub fn image(event: &ImageEvent, axis: &Axis) -> Self {
        Self {
            category: Category::Images,
            position: axis.position_of(event.timestamp),
            timestamp: event.timestamp,
            tooltip: format!(
                "Image: {}\nDate: {}",
                event.name,
                display_time(event.timestamp)
            ),
            boosted: false,
            click: Some(ClickAction::OpenPath(event.path.clone())),
        }
    }

    /// Marker for a browser visit. Clicking opens the URL.
    #[must_use]
    pub fn visit(visit: &BrowserVisit<'_>, axis: &Axis) -> Self {
        let click = (!visit.url().is_empty()).then(|| ClickAction::OpenUrl(visit.url().to_string()));
        Self {
            category: Category::History,
            position: axis.position_of(visit.timestamp),
            timestamp: visit.timestamp,
            tooltip: format!(
                "Visit: {}\nURL: {}\nVisits: {}\nDate: {}",
                visit.title(),
                visit.url(),
                visit.visit_count(),
                display_time(visit.timestamp)
            ),
            boosted: false,
            click,
        }
    }
}

/// Builds markers for every visible event: inbox, sent, images, history.
#[must_use]
pub fn build_markers(visible: &VisibleEvents<'_>, axis: &Axis, preview_chars: usize) -> Vec<Marker> {
    let mut markers = Vec::with_capacity(visible.len());
    markers.extend(
        visible
            .inbox
            .iter()
            .map(|f| Marker::inbox(f.event, f.boosted, axis, preview_chars)),
    );
    markers.extend(
        visible
            .sent
            .iter()
            .map(|f| Marker::sent(f.event, f.boosted, axis, preview_chars)),
    );
    markers.extend(visible.images.iter().map(|image| Marker::image(image, axis)));
    markers.extend(visible.visits.iter().map(|visit| Marker::visit(visit, axis)));
    markers
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn axis() -> Axis {
        Axis::compute([
            Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2023, 1, 3, 0, 0, 0).unwrap(),
        ])
        .unwrap()
    }

    #[test]
    fn test_body_preview() {
        assert_eq!(body_preview("line one\nline two", 200), "line one line two");
        assert_eq!(body_preview("abcdef", 3), "abc…");
        assert_eq!(body_preview("abc", 3), "abc");
        assert_eq!(body_preview("héllo wörld", 5), "héllo…");
    }

    #[test]
    fn test_inbox_marker() {
        let event = InboxEvent {
            id: None,
            sender: Some(" a@x.com ".to_string()),
            subject: "hi".to_string(),
            body: Some("hello\nthere".to_string()),
            timestamp: Utc.with_ymd_and_hms(2023, 1, 2, 0, 0, 0).unwrap(),
        };
        let marker = Marker::inbox(&event, true, &axis(), 200);

        assert_eq!(marker.category, Category::Inbox);
        assert!((marker.position - 50.0).abs() < f64::EPSILON);
        assert!(marker.boosted);
        assert_eq!(
            marker.tooltip,
            "From:  a@x.com \nSubject: hi\nDate: 2023-01-02T00:00:00Z\n\nhello there"
        );
        assert_eq!(
            marker.click,
            Some(ClickAction::CopyText("a@x.com".to_string()))
        );
    }

    #[test]
    fn test_sent_marker_copies_receivers() {
        let event = SentEvent {
            id: None,
            sender: "me".to_string(),
            receivers: vec!["a@x.com".to_string(), "b@x.com".to_string()],
            subject: "re".to_string(),
            body: None,
            timestamp: Utc.with_ymd_and_hms(2023, 1, 3, 0, 0, 0).unwrap(),
        };
        let marker = Marker::sent(&event, false, &axis(), 200);

        assert!(marker.tooltip.starts_with("From: me\nTo: a@x.com, b@x.com\n"));
        assert_eq!(
            marker.click,
            Some(ClickAction::CopyText("a@x.com, b@x.com".to_string()))
        );
    }

    #[test]
    fn test_sent_marker_without_receivers_has_no_click() {
        let event = SentEvent {
            id: None,
            sender: "me".to_string(),
            receivers: Vec::new(),
            subject: "draft".to_string(),
            body: None,
            timestamp: Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap(),
        };
        let marker = Marker::sent(&event, false, &axis(), 200);
        assert!(marker.click.is_none());
        assert!(marker.tooltip.contains("To: ?"));
    }

    #[test]
    fn test_image_marker_opens_file() {
        let event = ImageEvent {
            name: "cat.jpg".to_string(),
            path: PathBuf::from("/photos/cat.jpg"),
            timestamp: Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap(),
        };
        let marker = Marker::image(&event, &axis());
        assert_eq!(marker.position, 0.0);
        assert_eq!(
            marker.click,
            Some(ClickAction::OpenPath(PathBuf::from("/photos/cat.jpg")))
        );
    }
}
