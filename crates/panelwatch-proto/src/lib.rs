//! panelwatch protocol types.
//!
//! This crate defines the data exchanged between the webinar API, the
//! snapshot store and event sinks.
//!
//! # Modules
//!
//! - [`panelist`] - Panelist records with order-preserving fields
//! - [`snapshot`] - Per-webinar panelist snapshots
//! - [`webinar`] - Webinar ids and API listing pages
//! - [`event`] - Change events and their delivery metadata
//! - [`error`] - Protocol error types

pub mod error;
pub mod event;
pub mod panelist;
pub mod snapshot;
pub mod webinar;

pub use error::Error;

// Re-export commonly used types at crate root
pub use event::{ChangeEvent, EventMeta, EventType};
pub use panelist::Panelist;
pub use snapshot::Snapshot;
pub use webinar::{PanelistList, Webinar, WebinarId, WebinarPage};
