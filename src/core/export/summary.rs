//! Export summary and reporting
//!
//! This module defines structures for tracking and reporting export results.

use super::assembler::MissingMedia;
use super::job::JobReport;
use crate::domain::ScribeError;
use std::time::Duration;

/// Summary of an export operation
#[derive(Debug, Clone, Default)]
pub struct ExportSummary {
    /// Job identifier
    pub job_id: Option<String>,

    /// Room that was exported
    pub room_id: String,

    /// Archive file name delivered to the sink
    pub file_name: Option<String>,

    /// Number of input events
    pub total_events: usize,

    /// Number of events rendered into the document
    pub rendered_events: usize,

    /// Number of events without a visual representation
    pub skipped_events: usize,

    /// Number of date separators inserted
    pub date_separators: usize,

    /// Number of events rendered as continuations
    pub continuations: usize,

    /// Number of media assets stored in the archive
    pub media_exported: usize,

    /// Number of media events rendered as missing media
    pub media_missing: usize,

    /// Whether `room.png` was included
    pub avatar_included: bool,

    /// Size of the serialized archive
    pub archive_bytes: usize,

    /// Hex SHA-256 of the serialized archive
    pub archive_sha256: Option<String>,

    /// Number of sink writes
    pub chunks_written: usize,

    /// Duration of the export
    pub duration: Duration,

    /// Recoverable errors encountered during export
    pub errors: Vec<ExportError>,
}

impl ExportSummary {
    /// Create a new empty export summary
    pub fn new(room_id: impl Into<String>) -> Self {
        Self {
            room_id: room_id.into(),
            ..Self::default()
        }
    }

    /// Fill the summary from a completed job
    pub fn from_report(room_id: impl Into<String>, report: &JobReport) -> Self {
        let stats = &report.archive.stats;
        let mut summary = Self {
            job_id: Some(report.job_id.to_string()),
            room_id: room_id.into(),
            file_name: Some(report.file_name.clone()),
            total_events: stats.events_total,
            rendered_events: stats.events_rendered,
            skipped_events: stats.events_skipped,
            date_separators: stats.date_separators,
            continuations: stats.continuations,
            media_exported: stats.media_exported,
            media_missing: stats.media_missing,
            avatar_included: report.archive.avatar_included,
            archive_bytes: report.archive_bytes,
            archive_sha256: Some(report.archive_sha256.clone()),
            chunks_written: report.stream.chunks_written,
            ..Self::default()
        };

        for missing in &report.archive.missing_media {
            summary.add_error(ExportError::from_missing_media(missing));
        }
        summary
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Add an error
    pub fn add_error(&mut self, error: ExportError) {
        self.errors.push(error);
    }

    /// Check if every media event made it into the archive
    pub fn is_successful(&self) -> bool {
        self.media_missing == 0 && self.errors.is_empty()
    }

    /// Share of media events whose asset was exported, as a percentage
    pub fn media_success_rate(&self) -> f64 {
        let total = self.media_exported + self.media_missing;
        if total == 0 {
            return 100.0;
        }
        (self.media_exported as f64 / total as f64) * 100.0
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            job_id = self.job_id.as_deref().unwrap_or("-"),
            room_id = %self.room_id,
            file_name = self.file_name.as_deref().unwrap_or("-"),
            total_events = self.total_events,
            rendered = self.rendered_events,
            skipped = self.skipped_events,
            media_exported = self.media_exported,
            media_missing = self.media_missing,
            archive_bytes = self.archive_bytes,
            chunks = self.chunks_written,
            duration_ms = self.duration.as_millis() as u64,
            media_success_rate = format!("{:.2}%", self.media_success_rate()),
            "Export summary"
        );

        if !self.errors.is_empty() {
            tracing::warn!(
                error_count = self.errors.len(),
                "Export completed with errors"
            );
            for error in &self.errors {
                tracing::warn!(
                    error_type = ?error.error_type,
                    message = %error.message,
                    context = error.context.as_deref().unwrap_or(""),
                    "Export error"
                );
            }
        }
    }
}

/// Type of export error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportErrorType {
    /// Media fetch or decrypt failure
    Media,
    /// Event renderer failure
    Render,
    /// Archive serialization failure
    Archive,
    /// Sink open, write or close failure
    Stream,
    /// Shutdown requested
    Cancelled,
    /// Configuration error
    Configuration,
    /// Malformed input
    Input,
    /// Unknown error
    Unknown,
}

impl From<&ScribeError> for ExportErrorType {
    fn from(error: &ScribeError) -> Self {
        match error {
            ScribeError::Media(_) => ExportErrorType::Media,
            ScribeError::Render { .. } => ExportErrorType::Render,
            ScribeError::Archive(_) => ExportErrorType::Archive,
            ScribeError::Stream(_) => ExportErrorType::Stream,
            ScribeError::Cancelled(_) => ExportErrorType::Cancelled,
            ScribeError::Configuration(_) => ExportErrorType::Configuration,
            ScribeError::Validation(_) | ScribeError::Serialization(_) => ExportErrorType::Input,
            ScribeError::InvalidTransition { .. } | ScribeError::Io(_) | ScribeError::Other(_) => {
                ExportErrorType::Unknown
            }
        }
    }
}

/// Export error with context
#[derive(Debug, Clone)]
pub struct ExportError {
    /// Type of error
    pub error_type: ExportErrorType,

    /// Error message
    pub message: String,

    /// Optional context (e.g., event ID)
    pub context: Option<String>,
}

impl ExportError {
    /// Create a new export error
    pub fn new(error_type: ExportErrorType, message: String) -> Self {
        Self {
            error_type,
            message,
            context: None,
        }
    }

    /// Add context to the error
    pub fn with_context(mut self, context: String) -> Self {
        self.context = Some(context);
        self
    }

    fn from_missing_media(missing: &MissingMedia) -> Self {
        Self::new(ExportErrorType::Media, missing.reason.clone())
            .with_context(format!("event_id={}", missing.event_id))
    }
}
