//! Core business logic for Scribe.
//!
//! This module contains the export pipeline.
//!
//! # Modules
//!
//! - [`layout`] - Date separators and message continuation
//! - [`media`] - Media resolution into archive assets
//! - [`archive`] - Archive assembly and ZIP encoding
//! - [`export`] - Document assembly, export formats, chunked streaming,
//!   job lifecycle and coordination
//!
//! # Export Workflow
//!
//! 1. **Assemble**: Walk the ordered events, render tiles, resolve media
//! 2. **Archive**: Wrap the body into `index.html` and encode the ZIP
//! 3. **Stream**: Deliver the archive to the sink in fixed-size chunks
//! 4. **Report**: Generate export summary
//!
//! # Example
//!
//! ```rust,no_run
//! use scribe::config::load_config;
//! use scribe::core::export::ExportCoordinator;
//! use scribe::domain::{Room, RoomId};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Load configuration
//! let config = load_config("scribe.toml")?;
//!
//! // Create shutdown signal
//! let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//!
//! // Create export coordinator
//! let coordinator = ExportCoordinator::new(&config, shutdown_rx)?;
//!
//! // Execute export
//! let room = Room::new(RoomId::new("!abc:example.org")?, "General");
//! let summary = coordinator.execute_export(room, Vec::new()).await?;
//!
//! println!("Rendered: {}", summary.rendered_events);
//! println!("Missing media: {}", summary.media_missing);
//! # Ok(())
//! # }
//! ```

pub mod archive;
pub mod export;
pub mod layout;
pub mod media;
