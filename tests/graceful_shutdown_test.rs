//! Integration tests for graceful shutdown
//!
//! These tests verify that:
//! - Shutdown signals reach every holder of a receiver
//! - A cancelled job fails with `Cancelled` and never closes its sink
//! - No partial archive is left behind by the file sink

mod common;

use async_trait::async_trait;
use common::{image, room, text, GapRules, MarkerRenderer, StubMediaSource};
use scribe::adapters::sink::{FileSink, MemorySink};
use scribe::adapters::traits::{ExportSink, SinkWriter};
use scribe::core::export::{
    ensure_running, ChunkedStreamWriter, ExportCoordinator, ExportJob, HtmlExporter,
};
use scribe::domain::{Event, ScribeError};
use std::io;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::sync::watch;

/// Flips the shutdown signal as soon as the first chunk has been written
struct CancellingSink<S> {
    inner: S,
    shutdown: Arc<watch::Sender<bool>>,
}

struct CancellingWriter {
    inner: Box<dyn SinkWriter>,
    shutdown: Arc<watch::Sender<bool>>,
}

#[async_trait]
impl<S: ExportSink> ExportSink for CancellingSink<S> {
    async fn open(&self, name: &str, total_size: u64) -> io::Result<Box<dyn SinkWriter>> {
        let inner = self.inner.open(name, total_size).await?;
        Ok(Box::new(CancellingWriter {
            inner,
            shutdown: Arc::clone(&self.shutdown),
        }))
    }
}

#[async_trait]
impl SinkWriter for CancellingWriter {
    async fn write(&mut self, chunk: &[u8]) -> io::Result<()> {
        self.inner.write(chunk).await?;
        let _ = self.shutdown.send(true);
        Ok(())
    }

    async fn close(self: Box<Self>) -> io::Result<()> {
        self.inner.close().await
    }

    async fn abort(self: Box<Self>) -> io::Result<()> {
        self.inner.abort().await
    }
}

fn exporter() -> HtmlExporter {
    HtmlExporter::builder()
        .rules(Arc::new(GapRules))
        .renderer(Arc::new(MarkerRenderer))
        .media_source(Arc::new(StubMediaSource::new()))
        .build()
        .unwrap()
}

fn events() -> Vec<Event> {
    (0..20)
        .map(|i| {
            if i % 3 == 0 {
                image(&format!("E{i}"), "@alice:example.org", i * 1_000)
            } else {
                text(&format!("E{i}"), "@bob:example.org", i * 1_000)
            }
        })
        .collect()
}

#[tokio::test]
async fn test_shutdown_signal_propagation() {
    let (shutdown_tx, shutdown_rx1) = watch::channel(false);
    let shutdown_rx2 = shutdown_rx1.clone();

    assert!(ensure_running(&shutdown_rx1, "assembling").is_ok());
    assert!(ensure_running(&shutdown_rx2, "assembling").is_ok());

    shutdown_tx.send(true).unwrap();

    let err = ensure_running(&shutdown_rx1, "streaming").unwrap_err();
    assert!(err.is_cancelled());
    assert!(err.to_string().contains("streaming"));
    assert!(ensure_running(&shutdown_rx2, "streaming").is_err());
}

#[tokio::test]
async fn test_cancelled_before_start_never_opens_sink() {
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    shutdown_tx.send(true).unwrap();

    let sink = MemorySink::new();
    let writer = ChunkedStreamWriter::new(64).unwrap();

    let err = ExportJob::new(room(), events())
        .run(&exporter(), &sink, &writer, &shutdown_rx)
        .await
        .unwrap_err();

    assert!(matches!(err, ScribeError::Cancelled(_)));
    let record = sink.record();
    assert!(record.name.is_none());
    assert!(record.chunks.is_empty());
}

#[tokio::test]
async fn test_cancel_during_streaming_aborts_sink() {
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let memory = MemorySink::new();
    let sink = CancellingSink {
        inner: memory.clone(),
        shutdown: Arc::new(shutdown_tx),
    };
    let writer = ChunkedStreamWriter::new(64).unwrap();

    let err = ExportJob::new(room(), events())
        .run(&exporter(), &sink, &writer, &shutdown_rx)
        .await
        .unwrap_err();

    assert!(err.is_cancelled());
    let record = memory.record();
    assert_eq!(record.chunks.len(), 1);
    assert!(record.aborted);
    assert!(!record.closed);
}

#[tokio::test]
async fn test_cancel_leaves_no_file_behind() {
    let dir = TempDir::new().unwrap();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let sink = CancellingSink {
        inner: FileSink::new(dir.path()),
        shutdown: Arc::new(shutdown_tx),
    };
    let writer = ChunkedStreamWriter::new(64).unwrap();

    let err = ExportJob::new(room(), events())
        .run(&exporter(), &sink, &writer, &shutdown_rx)
        .await
        .unwrap_err();

    assert!(err.is_cancelled());
    let leftovers: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
    assert!(leftovers.is_empty());
}

#[tokio::test]
async fn test_coordinator_returns_cancellation() {
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let sink = MemorySink::new();
    let coordinator = ExportCoordinator::with_exporter(
        Arc::new(exporter()),
        Arc::new(sink.clone()),
        1024,
        shutdown_rx,
    )
    .unwrap();

    shutdown_tx.send(true).unwrap();
    let err = coordinator
        .execute_export(room(), vec![text("A", "@alice:example.org", 0)])
        .await
        .unwrap_err();

    assert!(err.is_cancelled());
    assert!(!sink.record().closed);
}

#[tokio::test]
async fn test_uncancelled_run_completes() {
    let (_shutdown_tx, shutdown_rx) = watch::channel(false);
    let sink = MemorySink::new();
    let coordinator = ExportCoordinator::with_exporter(
        Arc::new(exporter()),
        Arc::new(sink.clone()),
        64,
        shutdown_rx,
    )
    .unwrap();

    let summary = coordinator.execute_export(room(), events()).await.unwrap();

    assert!(summary.is_successful());
    assert_eq!(summary.total_events, 20);
    assert_eq!(summary.media_exported, 7);
    assert!(summary.chunks_written > 1);
    assert_eq!(summary.archive_bytes, sink.record().bytes().len());
    assert!(sink.record().closed);
}
