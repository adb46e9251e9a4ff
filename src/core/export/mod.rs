//! Export orchestration
//!
//! This module provides the export pipeline for Scribe, including:
//! - Document assembly over the ordered event sequence
//! - Export formats and archive production
//! - Chunked delivery to the output sink
//! - Job lifecycle, coordination and reporting

pub mod assembler;
pub mod cancel;
pub mod coordinator;
pub mod exporter;
pub mod job;
pub mod stream;
pub mod summary;

pub use assembler::{Assembly, AssemblyStats, DocumentAssembler, MissingMedia};
pub use cancel::{ensure_running, never_cancelled, ShutdownSignal};
pub use coordinator::ExportCoordinator;
pub use exporter::{archive_file_name, ExportArchive, ExportFormat, Exporter, HtmlExporter};
pub use job::{ExportJob, JobReport, JobState};
pub use stream::{ChunkedStreamWriter, StreamReport};
pub use summary::{ExportError, ExportErrorType, ExportSummary};
