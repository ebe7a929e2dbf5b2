//! # timeledger-core
//!
//! Core logic for the `TimeLedger` event timeline.
//!
//! This crate provides:
//! - Event models for sent mail, received mail, images and browser history
//! - Loading of JSON data files and image metadata
//! - **Filtering** - inclusive date ranges plus marked/excluded senders
//! - **Timeline layout** - a shared axis, linear positions and date labels
//! - **Session** - one state object updated through [`Action`]s
//! - **Importers** - mbox archives and Firefox history to loadable JSON
//! - Persistent settings

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod error;
pub mod event;
pub mod filter;
pub mod import;
pub mod layout;
pub mod loader;
pub mod marker;
mod session;
mod settings;
pub mod store;

pub use error::{Error, Result};
pub use event::{
    BrowserRecord, BrowserVisit, Category, ImageEvent, InboxEvent, SentEvent, Timestamped,
    parse_timestamp,
};
pub use filter::{DateRange, FilterEngine, Filtered, Inclusion, VisibleEvents, parse_bound};
pub use import::MailRecord;
pub use layout::{Axis, AxisLabel, LabelFormat};
pub use loader::{Batch, LoadReport};
pub use marker::{ClickAction, Marker};
pub use session::{Action, Session, Timeline};
pub use settings::{Settings, TimeZoneChoice};
pub use store::{EventStore, SenderSet, normalize_sender};
