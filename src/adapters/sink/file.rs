//! File system sink
//!
//! Chunks go to `<dir>/<name>.part`; `close` renames it to `<dir>/<name>`
//! and `abort` deletes it, so a finished file is never partial.

use crate::adapters::traits::{ExportSink, SinkWriter};
use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;

/// Writes archives into a directory
#[derive(Debug, Clone)]
pub struct FileSink {
    dir: PathBuf,
}

impl FileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl ExportSink for FileSink {
    async fn open(&self, name: &str, total_size: u64) -> io::Result<Box<dyn SinkWriter>> {
        if name.is_empty() || name.contains(['/', '\\']) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid archive name '{name}'"),
            ));
        }

        fs::create_dir_all(&self.dir).await?;

        let final_path = self.dir.join(name);
        let part_path = self.dir.join(format!("{name}.part"));
        let file = File::create(&part_path).await?;

        tracing::debug!(
            path = %final_path.display(),
            total_size,
            "Opened file sink"
        );

        Ok(Box::new(FileSinkWriter {
            file,
            part_path,
            final_path,
            expected: total_size,
            written: 0,
        }))
    }
}

struct FileSinkWriter {
    file: File,
    part_path: PathBuf,
    final_path: PathBuf,
    expected: u64,
    written: u64,
}

#[async_trait]
impl SinkWriter for FileSinkWriter {
    async fn write(&mut self, chunk: &[u8]) -> io::Result<()> {
        self.file.write_all(chunk).await?;
        self.written += chunk.len() as u64;
        Ok(())
    }

    async fn close(mut self: Box<Self>) -> io::Result<()> {
        if self.written != self.expected {
            let message = format!(
                "wrote {} bytes, expected {}",
                self.written, self.expected
            );
            drop(self.file);
            let _ = fs::remove_file(&self.part_path).await;
            return Err(io::Error::new(io::ErrorKind::InvalidData, message));
        }

        self.file.flush().await?;
        self.file.sync_all().await?;
        drop(self.file);
        fs::rename(&self.part_path, &self.final_path).await?;

        tracing::info!(
            path = %self.final_path.display(),
            bytes = self.written,
            "Archive written"
        );
        Ok(())
    }

    async fn abort(self: Box<Self>) -> io::Result<()> {
        drop(self.file);
        match fs::remove_file(&self.part_path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}
