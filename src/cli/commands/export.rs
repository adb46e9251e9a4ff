//! Export command implementation
//!
//! This module implements the `export` command: read a room's events from a
//! JSON file, build the HTML archive and stream it into the output directory.

use crate::config::load_config;
use crate::core::export::{ExportCoordinator, ExportErrorType};
use crate::domain::{Event, RawEvent, Result, Room, ScribeError};
use clap::Args;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tokio::sync::watch;

/// Arguments for the export command
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// JSON file with `{ "room": {...}, "events": [...] }`
    #[arg(short, long)]
    pub events: String,

    /// Override the output directory
    #[arg(short, long)]
    pub output_dir: Option<String>,

    /// Override the sink chunk size in bytes
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Override the number of media downloads in flight
    #[arg(long)]
    pub media_concurrency: Option<usize>,

    /// Do not fetch the room avatar
    #[arg(long)]
    pub no_avatar: bool,
}

/// Contents of an events file
#[derive(Debug, Deserialize)]
pub struct ExportInput {
    pub room: Room,
    #[serde(default)]
    pub events: Vec<RawEvent>,
}

/// Read and convert an events file
///
/// # Errors
///
/// Returns a validation error for unreadable files, malformed JSON and
/// events that cannot be converted.
pub fn load_events(path: impl AsRef<Path>) -> Result<(Room, Vec<Event>)> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|e| {
        ScribeError::Validation(format!("Failed to read events file {}: {e}", path.display()))
    })?;

    let input: ExportInput = serde_json::from_str(&contents).map_err(|e| {
        ScribeError::Validation(format!("Failed to parse events file {}: {e}", path.display()))
    })?;

    let events = input
        .events
        .into_iter()
        .enumerate()
        .map(|(index, raw)| {
            Event::try_from(raw)
                .map_err(|e| ScribeError::Validation(format!("Invalid event at index {index}: {e}")))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok((input.room, events))
}

impl ExportArgs {
    /// Execute the export command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting export command");

        // Load configuration
        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Failed to load configuration: {e}");
                return Ok(2);
            }
        };

        // Apply CLI overrides
        if let Some(output_dir) = &self.output_dir {
            tracing::info!(output_dir = %output_dir, "Overriding output directory from CLI");
            config.export.output_dir = output_dir.clone();
        }
        if let Some(chunk_size) = self.chunk_size {
            tracing::info!(chunk_size, "Overriding chunk size from CLI");
            config.export.chunk_size_bytes = chunk_size;
        }
        if let Some(concurrency) = self.media_concurrency {
            tracing::info!(concurrency, "Overriding media concurrency from CLI");
            config.export.media_concurrency = concurrency;
        }
        if self.no_avatar {
            config.export.include_room_avatar = false;
        }

        // Validate configuration
        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(2); // Configuration error exit code
        }

        let (room, events) = match load_events(&self.events) {
            Ok(loaded) => loaded,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load events");
                eprintln!("Failed to load events: {e}");
                return Ok(4); // Input error exit code
            }
        };

        let coordinator = match ExportCoordinator::new(&config, shutdown_signal) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to create export coordinator");
                eprintln!("Failed to initialize export: {e}");
                return Ok(2);
            }
        };

        println!("🚀 Exporting {} ({} events)...", room.display_name(), events.len());
        println!();

        let summary = match coordinator.execute_export(room, events).await {
            Ok(s) => s,
            Err(e) if e.is_cancelled() => {
                println!();
                println!("⚠️  Export interrupted. No archive was written.");
                tracing::info!("Export interrupted by user signal");
                return Ok(130); // SIGINT exit code (standard Unix convention)
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    error_type = ?ExportErrorType::from(&e),
                    "Export failed"
                );
                eprintln!("Export failed: {e}");
                return Ok(5); // Fatal error exit code
            }
        };

        // Display summary
        println!("📊 Export Summary:");
        if let Some(file_name) = &summary.file_name {
            println!("  Archive: {}", Path::new(&config.export.output_dir).join(file_name).display());
        }
        println!("  Events: {}", summary.total_events);
        println!("  Rendered: {}", summary.rendered_events);
        println!("  Skipped: {}", summary.skipped_events);
        println!("  Media Exported: {}", summary.media_exported);
        println!("  Media Missing: {}", summary.media_missing);
        println!("  Archive Size: {} bytes", summary.archive_bytes);
        println!("  Chunks Written: {}", summary.chunks_written);
        println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
        println!();

        if !summary.errors.is_empty() {
            println!("⚠️  Errors encountered:");
            for error in &summary.errors {
                println!("  - {:?}: {}", error.error_type, error.message);
                if let Some(context) = &error.context {
                    println!("    Context: {context}");
                }
            }
            println!();
        }

        // Determine exit code
        let exit_code = if summary.is_successful() {
            println!("✅ Export completed successfully!");
            0
        } else {
            println!("⚠️  Export completed with missing media");
            1 // Partial success
        };

        Ok(exit_code)
    }
}
