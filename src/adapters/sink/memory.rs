//! In-memory sink
//!
//! Records every call it receives. Useful for embedding the exporter in a
//! process that forwards the bytes elsewhere, and for tests.

use crate::adapters::traits::{ExportSink, SinkWriter};
use async_trait::async_trait;
use std::io;
use std::sync::{Arc, Mutex};

/// Everything a [`MemorySink`] has seen
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SinkRecord {
    /// Name passed to `open`, if it was opened
    pub name: Option<String>,
    /// Size announced to `open`
    pub total_size: u64,
    /// Chunks in write order
    pub chunks: Vec<Vec<u8>>,
    pub closed: bool,
    pub aborted: bool,
}

impl SinkRecord {
    /// All chunks concatenated
    pub fn bytes(&self) -> Vec<u8> {
        self.chunks.concat()
    }
}

/// Sink that keeps the archive in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    record: Arc<Mutex<SinkRecord>>,
    fail_on_write: Option<usize>,
    fail_on_open: bool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink whose `index`-th write (zero-based) fails
    pub fn failing_at_write(index: usize) -> Self {
        Self {
            fail_on_write: Some(index),
            ..Self::default()
        }
    }

    /// A sink that cannot be opened
    pub fn failing_on_open() -> Self {
        Self {
            fail_on_open: true,
            ..Self::default()
        }
    }

    /// Copy of what the sink has recorded so far
    pub fn record(&self) -> SinkRecord {
        self.record
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ExportSink for MemorySink {
    async fn open(&self, name: &str, total_size: u64) -> io::Result<Box<dyn SinkWriter>> {
        if self.fail_on_open {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "sink refused"));
        }

        let mut record = lock(&self.record)?;
        *record = SinkRecord {
            name: Some(name.to_string()),
            total_size,
            ..SinkRecord::default()
        };

        Ok(Box::new(MemorySinkWriter {
            record: Arc::clone(&self.record),
            fail_on_write: self.fail_on_write,
            writes: 0,
        }))
    }
}

struct MemorySinkWriter {
    record: Arc<Mutex<SinkRecord>>,
    fail_on_write: Option<usize>,
    writes: usize,
}

#[async_trait]
impl SinkWriter for MemorySinkWriter {
    async fn write(&mut self, chunk: &[u8]) -> io::Result<()> {
        let index = self.writes;
        self.writes += 1;
        if self.fail_on_write == Some(index) {
            return Err(io::Error::new(io::ErrorKind::WriteZero, "sink write failed"));
        }
        lock(&self.record)?.chunks.push(chunk.to_vec());
        Ok(())
    }

    async fn close(self: Box<Self>) -> io::Result<()> {
        lock(&self.record)?.closed = true;
        Ok(())
    }

    async fn abort(self: Box<Self>) -> io::Result<()> {
        lock(&self.record)?.aborted = true;
        Ok(())
    }
}

fn lock(record: &Mutex<SinkRecord>) -> io::Result<std::sync::MutexGuard<'_, SinkRecord>> {
    record
        .lock()
        .map_err(|_| io::Error::new(io::ErrorKind::Other, "sink record poisoned"))
}
