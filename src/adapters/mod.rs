//! External system integrations for Scribe.
//!
//! This module provides the collaborators the export pipeline talks to:
//!
//! - [`traits`] - the seams: media source, event renderer, output sink
//! - [`matrix`] - homeserver media repository client
//! - [`render`] - default HTML tile renderer
//! - [`sink`] - file system and in-memory sinks
//!
//! # Design Pattern
//!
//! Adapters follow the **Adapter Pattern** to isolate external dependencies and
//! enable testing with stub implementations. The pipeline only holds trait
//! objects, so any homeserver client or output destination can be plugged in.
//!
//! ```rust,no_run
//! use scribe::adapters::matrix::HttpMediaSource;
//! use scribe::config::HomeserverConfig;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = HomeserverConfig {
//!     base_url: "https://matrix.example.org".to_string(),
//!     access_token: None,
//!     timeout_seconds: 30,
//! };
//!
//! let source = HttpMediaSource::new(&config)?;
//! # Ok(())
//! # }
//! ```

pub mod matrix;
pub mod render;
pub mod sink;
pub mod traits;

pub use traits::{AttachmentDecryptor, EventRenderer, ExportSink, MediaSlot, MediaSource, SinkWriter};
