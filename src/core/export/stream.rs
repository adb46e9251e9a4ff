//! Chunked delivery to an output sink
//!
//! The sink is opened with the blob's total length, fed one chunk at a time
//! (each write awaited before the next slice is taken) and closed after the
//! last chunk. A blob of `L` bytes with chunk size `C` takes exactly
//! `ceil(L / C)` writes.

use super::cancel::{ensure_running, ShutdownSignal};
use crate::adapters::traits::{ExportSink, SinkWriter};
use crate::domain::{Result, StreamError};
use crate::log_chunk_written;
use std::num::NonZeroUsize;

/// Outcome of a successful stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StreamReport {
    pub chunks_written: usize,
    pub bytes_written: u64,
}

/// Sequential, chunked sink writer
#[derive(Debug, Clone, Copy)]
pub struct ChunkedStreamWriter {
    chunk_size: NonZeroUsize,
}

impl ChunkedStreamWriter {
    /// # Errors
    ///
    /// Returns [`StreamError::InvalidChunkSize`] for a zero chunk size.
    pub fn new(chunk_size: usize) -> std::result::Result<Self, StreamError> {
        NonZeroUsize::new(chunk_size)
            .map(|chunk_size| Self { chunk_size })
            .ok_or(StreamError::InvalidChunkSize)
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size.get()
    }

    /// Number of writes needed for a blob of `len` bytes
    pub fn chunk_count(&self, len: usize) -> usize {
        len.div_ceil(self.chunk_size.get())
    }

    /// Iterator over the windows written for `blob`
    pub fn chunks<'a>(&self, blob: &'a [u8]) -> std::slice::Chunks<'a, u8> {
        blob.chunks(self.chunk_size.get())
    }

    /// Deliver `blob` to `sink` under `name`
    ///
    /// The shutdown signal is checked before opening and after every chunk.
    /// On cancellation or a failed write the open writer is aborted, never
    /// closed.
    ///
    /// # Errors
    ///
    /// Returns a [`StreamError`] for sink failures and
    /// [`crate::domain::ScribeError::Cancelled`] on shutdown.
    pub async fn stream(
        &self,
        blob: &[u8],
        sink: &dyn ExportSink,
        name: &str,
        cancel: &ShutdownSignal,
    ) -> Result<StreamReport> {
        ensure_running(cancel, "streaming")?;

        let total = self.chunk_count(blob.len());
        let mut writer = sink
            .open(name, blob.len() as u64)
            .await
            .map_err(|e| StreamError::OpenFailed {
                name: name.to_string(),
                message: e.to_string(),
            })?;

        tracing::info!(
            name,
            bytes = blob.len(),
            chunks = total,
            chunk_size = self.chunk_size.get(),
            "Streaming archive to sink"
        );

        let mut report = StreamReport::default();
        for (index, chunk) in self.chunks(blob).enumerate() {
            if let Err(e) = writer.write(chunk).await {
                abort(writer).await;
                return Err(StreamError::WriteFailed {
                    index,
                    message: e.to_string(),
                }
                .into());
            }
            report.chunks_written += 1;
            report.bytes_written += chunk.len() as u64;
            log_chunk_written!(index, total, chunk.len());

            if let Err(e) = ensure_running(cancel, "streaming") {
                abort(writer).await;
                return Err(e);
            }
        }

        writer
            .close()
            .await
            .map_err(|e| StreamError::CloseFailed(e.to_string()))?;

        Ok(report)
    }
}

async fn abort(writer: Box<dyn SinkWriter>) {
    if let Err(e) = writer.abort().await {
        tracing::warn!(error = %e, "Failed to abort sink writer");
    }
}
