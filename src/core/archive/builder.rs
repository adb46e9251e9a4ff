//! Archive builder
//!
//! Append-only, path-keyed container for archive entries. `finalize`
//! consumes the builder and encodes a ZIP with the fixed entries first and
//! then every added entry in insertion order. Entries use a fixed timestamp
//! so identical input always yields identical bytes.

use super::shell::{INDEX_PATH, SCRIPT, SCRIPT_PATH, STYLESHEET, STYLESHEET_PATH};
use crate::domain::{ArchiveError, Asset};
use std::collections::HashSet;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

/// Paths written by `finalize` itself
const RESERVED_PATHS: [&str; 3] = [INDEX_PATH, STYLESHEET_PATH, SCRIPT_PATH];

/// One file inside the archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub path: String,
    pub bytes: Vec<u8>,
}

/// Accumulates archive entries for one export job
#[derive(Debug, Default)]
pub struct ArchiveBuilder {
    entries: Vec<ArchiveEntry>,
    paths: HashSet<String>,
}

impl ArchiveBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entry
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::DuplicatePath`] if the path is already taken
    /// (including the fixed entries) and [`ArchiveError::InvalidPath`] for
    /// empty, absolute or parent-relative paths.
    pub fn add(&mut self, path: impl Into<String>, bytes: Vec<u8>) -> Result<(), ArchiveError> {
        let path = path.into();
        validate_path(&path)?;

        if RESERVED_PATHS.contains(&path.as_str()) || !self.paths.insert(path.clone()) {
            return Err(ArchiveError::DuplicatePath(path));
        }

        tracing::trace!(path = %path, bytes = bytes.len(), "Archive entry added");
        self.entries.push(ArchiveEntry { path, bytes });
        Ok(())
    }

    /// Register a resolved media asset under its own path
    pub fn add_asset(&mut self, asset: Asset) -> Result<(), ArchiveError> {
        self.add(asset.path, asset.bytes)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.paths.contains(path)
    }

    /// Number of added entries, fixed entries excluded
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Added paths in insertion order
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.path.as_str())
    }

    /// Encode the archive
    ///
    /// Writes `index.html`, the stylesheet and the script, followed by every
    /// added entry.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::Serialization`] if the encoder fails.
    pub fn finalize(self, index_html: &str) -> Result<Vec<u8>, ArchiveError> {
        let fixed_time = DateTime::from_date_and_time(1980, 1, 1, 0, 0, 0)
            .map_err(|e| ArchiveError::Serialization(e.to_string()))?;
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(fixed_time)
            .unix_permissions(0o644);

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

        let fixed = [
            (INDEX_PATH, index_html.as_bytes()),
            (STYLESHEET_PATH, STYLESHEET.as_bytes()),
            (SCRIPT_PATH, SCRIPT.as_bytes()),
        ];
        for (path, bytes) in fixed {
            write_entry(&mut zip, path, bytes, options)?;
        }
        for entry in &self.entries {
            write_entry(&mut zip, &entry.path, &entry.bytes, options)?;
        }

        let blob = zip.finish()?.into_inner();
        tracing::debug!(
            entries = self.entries.len() + RESERVED_PATHS.len(),
            bytes = blob.len(),
            "Archive serialized"
        );
        Ok(blob)
    }
}

fn write_entry(
    zip: &mut ZipWriter<Cursor<Vec<u8>>>,
    path: &str,
    bytes: &[u8],
    options: SimpleFileOptions,
) -> Result<(), ArchiveError> {
    zip.start_file(path, options)?;
    zip.write_all(bytes)
        .map_err(|e| ArchiveError::Serialization(format!("{path}: {e}")))
}

fn validate_path(path: &str) -> Result<(), ArchiveError> {
    let invalid = path.is_empty()
        || path.starts_with('/')
        || path.contains('\\')
        || path.split('/').any(|part| part.is_empty() || part == "." || part == "..");
    if invalid {
        return Err(ArchiveError::InvalidPath(path.to_string()));
    }
    Ok(())
}
