//! Logging and observability
//!
//! Structured logging through `tracing`:
//! - Human-readable console output on stderr
//! - Optional JSON log files with rotation
//! - Helper macros for the recurring export log lines
//!
//! # Example
//!
//! ```no_run
//! use scribe::logging::init_logging;
//! use scribe::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log the start of an export job
///
/// # Example
///
/// ```no_run
/// use scribe::log_export_start;
///
/// let job_id = "6f1c";
/// log_export_start!(job_id, "!room:example.org", 120);
/// ```
#[macro_export]
macro_rules! log_export_start {
    ($job_id:expr, $room_id:expr, $event_count:expr) => {
        tracing::info!(
            job_id = %$job_id,
            room_id = %$room_id,
            event_count = $event_count,
            "Starting export"
        );
    };
}

/// Log the completion of an export job
///
/// # Example
///
/// ```no_run
/// use scribe::log_export_complete;
/// use std::time::Duration;
///
/// log_export_complete!("6f1c", 1_048_576, Duration::from_secs(3));
/// ```
#[macro_export]
macro_rules! log_export_complete {
    ($job_id:expr, $bytes:expr, $duration:expr) => {
        tracing::info!(
            job_id = %$job_id,
            archive_bytes = $bytes,
            duration_ms = $duration.as_millis(),
            "Export completed"
        );
    };
}

/// Log a media asset that was skipped and rendered as missing
///
/// # Example
///
/// ```no_run
/// use scribe::log_media_skipped;
///
/// log_media_skipped!("$abc:example.org", "connection reset");
/// ```
#[macro_export]
macro_rules! log_media_skipped {
    ($event_id:expr, $reason:expr) => {
        tracing::warn!(
            event_id = %$event_id,
            reason = %$reason,
            "Media unavailable, rendering event as missing media"
        );
    };
}

/// Log a chunk written to the sink
#[macro_export]
macro_rules! log_chunk_written {
    ($index:expr, $total:expr, $len:expr) => {
        tracing::debug!(
            chunk = $index + 1,
            total_chunks = $total,
            bytes = $len,
            progress_pct = (($index + 1) as f64 / $total as f64 * 100.0),
            "Chunk written"
        );
    };
}
