//! Archive assembly
//!
//! - [`builder`] - path-keyed entry accumulator and ZIP encoder
//! - [`shell`] - fixed page shell, stylesheet and script
//! - [`checksum`] - archive digests for the export summary

pub mod builder;
pub mod checksum;
pub mod shell;

pub use builder::{ArchiveBuilder, ArchiveEntry};
pub use checksum::archive_checksum;
pub use shell::{wrap_document, AVATAR_PATH, INDEX_PATH, SCRIPT_PATH, STYLESHEET_PATH};
