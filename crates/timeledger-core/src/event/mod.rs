//! Timeline events.
//!
//! Four kinds of record end up on a timeline:
//! - **Sent** and **Inbox** mail, exported from a mailbox
//! - **Images**, dated by file modification time
//! - **History**, browser pages that expand into one visit per timestamp
//!
//! Every event carries exactly one absolute instant once expanded, which
//! is what the filter and layout stages work with through [`Timestamped`].

mod model;
mod timestamp;

pub use model::{
    BrowserRecord, BrowserVisit, Category, ImageEvent, InboxEvent, SentEvent, Timestamped,
};
pub(crate) use timestamp::RawTimestamp;
pub use timestamp::parse_timestamp;
