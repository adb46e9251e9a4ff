// Scribe - Matrix room export tool
// Copyright (c) 2025 Scribe Contributors
// Licensed under the MIT License

//! # Scribe - Matrix room export
//!
//! Scribe turns the ordered timeline of a Matrix room into a single,
//! self-contained, browsable archive: an `index.html` page plus the room's
//! media, packed as ZIP and delivered to an output sink in fixed-size chunks.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Laying out** the timeline with date separators and message continuation
//! - **Resolving** media (plain or encrypted attachments) into archive assets
//! - **Assembling** the document and the archive with unique entry paths
//! - **Streaming** the archive to a sink with sequential backpressure
//!
//! ## Architecture
//!
//! Scribe follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (layout, media, archive, export)
//! - [`adapters`] - External integrations (homeserver media, renderers, sinks)
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scribe::config::load_config;
//! use scribe::core::export::ExportCoordinator;
//! use scribe::domain::{Room, RoomId};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Load configuration
//!     let config = load_config("scribe.toml")?;
//!
//!     // Create export coordinator
//!     let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//!     let coordinator = ExportCoordinator::new(&config, shutdown_rx)?;
//!
//!     // Execute export
//!     let room = Room::new(RoomId::new("!abc:example.org")?, "General");
//!     let summary = coordinator.execute_export(room, Vec::new()).await?;
//!
//!     println!("Rendered {} events", summary.rendered_events);
//!     Ok(())
//! }
//! ```
//!
//! ## Embedding
//!
//! Every collaborator is a trait object, so the pipeline can run against any
//! media source, renderer or sink:
//!
//! ```rust,no_run
//! use scribe::adapters::sink::MemorySink;
//! use scribe::adapters::traits::MediaSource;
//! use scribe::core::export::{never_cancelled, ChunkedStreamWriter, ExportJob, HtmlExporter};
//! use scribe::domain::{Room, RoomId};
//! use std::sync::Arc;
//!
//! # async fn example(media: Arc<dyn MediaSource>) -> Result<(), Box<dyn std::error::Error>> {
//! let exporter = HtmlExporter::builder().media_source(media).build()?;
//! let sink = MemorySink::new();
//! let writer = ChunkedStreamWriter::new(1024 * 1024)?;
//!
//! let room = Room::new(RoomId::new("!abc:example.org")?, "General");
//! let job = ExportJob::new(room, Vec::new());
//! let report = job.run(&exporter, &sink, &writer, &never_cancelled()).await?;
//!
//! println!("{} bytes in {} chunks", report.archive_bytes, report.stream.chunks_written);
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Scribe uses the [`domain::ScribeError`] type for all errors. Media failures
//! never abort an export; the event is rendered as missing media and counted
//! in the summary.
//!
//! ## Logging
//!
//! Scribe uses structured logging with the `tracing` crate:
//!
//! ```rust,no_run
//! use tracing::{info, warn};
//!
//! info!("Starting export");
//! warn!(event_id = "$abc:example.org", "Media unavailable");
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
