//! Export job lifecycle
//!
//! ```text
//! Created -> Assembling -> Archived -> Streaming -> Completed
//!     \__________\____________\___________\______-> Failed
//! ```
//!
//! A job owns its input events and is consumed by [`ExportJob::run`], so it
//! can never be restarted. Retrying means creating a new job.

use super::cancel::ShutdownSignal;
use super::exporter::{ExportArchive, Exporter};
use super::stream::{ChunkedStreamWriter, StreamReport};
use crate::adapters::traits::ExportSink;
use crate::core::archive::archive_checksum;
use crate::domain::{Event, Result, Room, ScribeError};
use std::fmt;
use uuid::Uuid;

/// Lifecycle state of an [`ExportJob`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobState {
    Created,
    Assembling,
    Archived,
    Streaming,
    Completed,
    Failed,
}

impl JobState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Completed | JobState::Failed)
    }

    /// Whether `next` directly follows `self`
    pub fn can_transition_to(&self, next: JobState) -> bool {
        use JobState::*;
        match (self, next) {
            (Created, Assembling)
            | (Assembling, Archived)
            | (Archived, Streaming)
            | (Streaming, Completed) => true,
            (state, Failed) => !state.is_terminal(),
            _ => false,
        }
    }

    /// Move to `next`
    ///
    /// # Errors
    ///
    /// Returns [`ScribeError::InvalidTransition`] for any move the lifecycle
    /// does not allow, including leaving a terminal state.
    pub fn transition(self, next: JobState) -> Result<JobState> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(ScribeError::InvalidTransition {
                from: self.to_string(),
                to: next.to_string(),
            })
        }
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JobState::Created => "created",
            JobState::Assembling => "assembling",
            JobState::Archived => "archived",
            JobState::Streaming => "streaming",
            JobState::Completed => "completed",
            JobState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Result of a completed job
#[derive(Debug, Clone)]
pub struct JobReport {
    pub job_id: Uuid,
    pub state: JobState,
    pub file_name: String,
    pub archive_bytes: usize,
    pub archive_sha256: String,
    pub stream: StreamReport,
    /// Archive minus its bytes
    pub archive: ExportArchive,
}

/// One export request
#[derive(Debug)]
pub struct ExportJob {
    id: Uuid,
    room: Room,
    events: Vec<Event>,
    state: JobState,
}

impl ExportJob {
    pub fn new(room: Room, events: Vec<Event>) -> Self {
        Self {
            id: Uuid::new_v4(),
            room,
            events,
            state: JobState::Created,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    pub fn room(&self) -> &Room {
        &self.room
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Run the job to completion
    ///
    /// Builds the archive with `exporter`, then streams it to `sink` under
    /// the archive's file name.
    ///
    /// # Errors
    ///
    /// The first fatal error moves the job to `Failed` and is returned.
    /// Bytes already handed to the sink must then be treated as partial.
    pub async fn run(
        mut self,
        exporter: &dyn Exporter,
        sink: &dyn ExportSink,
        writer: &ChunkedStreamWriter,
        cancel: &ShutdownSignal,
    ) -> Result<JobReport> {
        match self.drive(exporter, sink, writer, cancel).await {
            Ok(report) => Ok(report),
            Err(e) => {
                let from = self.state;
                self.state = self.state.transition(JobState::Failed)?;
                tracing::error!(
                    job_id = %self.id,
                    state = %from,
                    error = %e,
                    "Export job failed"
                );
                Err(e)
            }
        }
    }

    async fn drive(
        &mut self,
        exporter: &dyn Exporter,
        sink: &dyn ExportSink,
        writer: &ChunkedStreamWriter,
        cancel: &ShutdownSignal,
    ) -> Result<JobReport> {
        self.advance(JobState::Assembling)?;
        let mut archive = exporter.export(&self.events, &self.room, cancel).await?;

        self.advance(JobState::Archived)?;
        let archive_bytes = archive.bytes.len();
        let archive_sha256 = archive_checksum(&archive.bytes);

        self.advance(JobState::Streaming)?;
        let stream = writer
            .stream(&archive.bytes, sink, &archive.file_name, cancel)
            .await?;

        self.advance(JobState::Completed)?;
        archive.bytes = Vec::new();

        Ok(JobReport {
            job_id: self.id,
            state: self.state,
            file_name: archive.file_name.clone(),
            archive_bytes,
            archive_sha256,
            stream,
            archive,
        })
    }

    fn advance(&mut self, next: JobState) -> Result<()> {
        self.state = self.state.transition(next)?;
        tracing::debug!(job_id = %self.id, state = %self.state, "Export job state changed");
        Ok(())
    }
}
