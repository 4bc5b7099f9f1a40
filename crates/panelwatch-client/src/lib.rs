//! panelwatch client - REST client for the webinar platform.
//!
//! The [`Client`] implements [`panelwatch_core::WebinarSource`], so it can be
//! handed directly to the change detector.
//!
//! # Quick Start
//!
//! ```ignore
//! use panelwatch_client::{Client, ClientConfig};
//!
//! let client = Client::new(ClientConfig::default().with_token(token))?;
//! let panelists = client.list_webinar_panelists(&"81234567890".into()).await?;
//! ```

pub mod client;
pub mod config;
pub mod error;

pub use client::Client;
pub use config::ClientConfig;
pub use error::Error;

/// Re-export protocol types.
pub use panelwatch_proto as proto;
