//! # timeledger-mime
//!
//! Read-only MIME parsing for importing mailbox archives into `TimeLedger`.
//!
//! ## Features
//!
//! - **Mailbox splitting**: Split mbox archives into individual messages
//! - **Message parsing**: Headers, single-part and (nested) multipart bodies
//! - **Decoding**: Base64, Quoted-Printable, RFC 2047 encoded words
//! - **Addresses**: Extract mailbox addresses from `From`/`To` header values
//! - **Dates**: Lenient RFC 2822 `Date` header parsing
//!
//! ## Quick Start
//!
//! ```ignore
//! use timeledger_mime::{Mbox, Message};
//!
//! for raw in Mbox::new(&archive) {
//!     let message = Message::parse(raw)?;
//!     println!("Subject: {}", message.headers.get("subject").unwrap_or("(no subject)"));
//!     println!("Body: {}", message.plain_text().unwrap_or_default());
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod address;
mod content_type;
mod date;
mod error;
mod header;
mod mbox;
mod message;

pub mod encoding;

pub use address::{Address, parse_address_list};
pub use content_type::ContentType;
pub use date::parse_date;
pub use error::{Error, Result};
pub use header::Headers;
pub use mbox::Mbox;
pub use message::{Message, Part, TransferEncoding};
