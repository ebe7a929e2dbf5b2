//! Terminal views.
//!
//! Views only format what the core derived; they hold no state.

mod details;
mod timeline;

pub use details::render_details;
pub use timeline::{render_timeline, terminal_columns, track_width};

use chrono::{DateTime, Utc};
use timeledger_core::Session;

/// Summary of filters and loaded collections.
pub fn render_status(session: &Session) -> String {
    let store = session.store();
    let range = session.range();
    let bound = |b: Option<DateTime<Utc>>| b.map_or_else(|| "-".to_string(), |t| t.to_rfc3339());
    let list = |items: Vec<&str>| {
        if items.is_empty() {
            "(none)".to_string()
        } else {
            items.join(", ")
        }
    };

    format!(
        "sent: {}  inbox: {}  images: {}  history: {} pages / {} visits\n\
         range: {} .. {}\n\
         marked: {}\n\
         excluded: {}\n",
        store.sent().len(),
        store.inbox().len(),
        store.images().len(),
        store.history().len(),
        store.visits().count(),
        bound(range.from),
        bound(range.to),
        list(session.marked()),
        list(session.excluded()),
    )
}
