//! Output sinks
//!
//! - [`FileSink`] - writes archives into a directory
//! - [`MemorySink`] - keeps archives in memory and records every call

pub mod file;
pub mod memory;

pub use file::FileSink;
pub use memory::{MemorySink, SinkRecord};
