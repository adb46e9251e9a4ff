//! Export coordinator - main orchestrator for the export process
//!
//! Wires configuration and collaborators together, runs one job per export
//! request and turns the result into an [`ExportSummary`].

use super::cancel::ShutdownSignal;
use super::exporter::{Exporter, HtmlExporter};
use super::job::ExportJob;
use super::stream::ChunkedStreamWriter;
use super::summary::ExportSummary;
use crate::adapters::matrix::HttpMediaSource;
use crate::adapters::sink::FileSink;
use crate::adapters::traits::{ExportSink, MediaSource};
use crate::config::ScribeConfig;
use crate::core::layout::TimelineRules;
use crate::domain::{Event, Result, Room};
use crate::{log_export_complete, log_export_start};
use std::sync::Arc;
use std::time::Instant;

/// Export coordinator
pub struct ExportCoordinator {
    exporter: Arc<dyn Exporter>,
    sink: Arc<dyn ExportSink>,
    writer: ChunkedStreamWriter,
    shutdown: ShutdownSignal,
}

impl ExportCoordinator {
    /// Create a coordinator from configuration
    ///
    /// Media comes from the configured homeserver and archives are written
    /// to `export.output_dir`.
    pub fn new(config: &ScribeConfig, shutdown: ShutdownSignal) -> Result<Self> {
        let http = HttpMediaSource::new(&config.homeserver)?;
        tracing::info!(
            homeserver = http.base_url(),
            output_dir = %config.export.output_dir,
            "Fetching media from homeserver"
        );
        let media: Arc<dyn MediaSource> = Arc::new(http);
        let sink: Arc<dyn ExportSink> = Arc::new(FileSink::new(&config.export.output_dir));
        Self::with_media_source(config, media, sink, shutdown)
    }

    /// Create a coordinator around an existing media source and sink
    pub fn with_media_source(
        config: &ScribeConfig,
        media: Arc<dyn MediaSource>,
        sink: Arc<dyn ExportSink>,
        shutdown: ShutdownSignal,
    ) -> Result<Self> {
        config
            .validate()
            .map_err(crate::domain::ScribeError::Configuration)?;

        let exporter = HtmlExporter::builder()
            .rules(Arc::new(TimelineRules::from_config(&config.layout)))
            .media_source(media)
            .export_config(&config.export)
            .build()?;

        Self::with_exporter(
            Arc::new(exporter),
            sink,
            config.export.chunk_size_bytes,
            shutdown,
        )
    }

    /// Create a coordinator from fully built parts
    pub fn with_exporter(
        exporter: Arc<dyn Exporter>,
        sink: Arc<dyn ExportSink>,
        chunk_size: usize,
        shutdown: ShutdownSignal,
    ) -> Result<Self> {
        Ok(Self {
            exporter,
            sink,
            writer: ChunkedStreamWriter::new(chunk_size)?,
            shutdown,
        })
    }

    /// Execute one export
    ///
    /// Events must already be in timeline order.
    ///
    /// # Errors
    ///
    /// Fatal job errors (render, archive, sink, cancellation) are returned
    /// as is. Media failures are recorded in the summary instead.
    pub async fn execute_export(&self, room: Room, events: Vec<Event>) -> Result<ExportSummary> {
        let start_time = Instant::now();
        let room_id = room.room_id.to_string();

        let job = ExportJob::new(room, events);
        let job_id = job.id();
        log_export_start!(job_id, room_id, job.events().len());
        tracing::info!(
            job_id = %job_id,
            format = %self.exporter.format(),
            chunk_size = self.writer.chunk_size(),
            "Starting export process"
        );

        let report = job
            .run(
                self.exporter.as_ref(),
                self.sink.as_ref(),
                &self.writer,
                &self.shutdown,
            )
            .await?;

        let duration = start_time.elapsed();
        log_export_complete!(job_id, report.archive_bytes, duration);

        let summary = ExportSummary::from_report(room_id, &report).with_duration(duration);
        summary.log_summary();

        Ok(summary)
    }
}
