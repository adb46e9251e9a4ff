//! Domain error types
//!
//! This module defines the error hierarchy for Scribe. Errors are grouped by
//! pipeline stage so callers can tell a recoverable media failure apart from
//! a fatal archive or sink failure. Third-party error types are flattened into
//! strings at this boundary.

use thiserror::Error;

/// Main Scribe error type
///
/// This is the primary error type used throughout the application.
#[derive(Debug, Error)]
pub enum ScribeError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Validation errors (bad identifiers, malformed input events)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Media fetch/decrypt errors
    #[error("Media error: {0}")]
    Media(#[from] MediaError),

    /// The event renderer failed; aborts the whole job
    #[error("Render error for event {event_id}: {message}")]
    Render { event_id: String, message: String },

    /// Archive assembly or serialization errors
    #[error("Archive error: {0}")]
    Archive(#[from] ArchiveError),

    /// Output sink errors
    #[error("Stream error: {0}")]
    Stream(#[from] StreamError),

    /// The export was cancelled through the shutdown signal
    #[error("Export cancelled during {0}")]
    Cancelled(String),

    /// Export job state machine misuse
    #[error("Invalid job transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl ScribeError {
    /// Builds a render error for the given event
    pub fn render(event_id: impl Into<String>, message: impl Into<String>) -> Self {
        ScribeError::Render {
            event_id: event_id.into(),
            message: message.into(),
        }
    }

    /// Whether this error came from the cancellation signal
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ScribeError::Cancelled(_))
    }
}

/// Media resolution errors
///
/// These are recoverable: the assembler skips the asset and renders the
/// event as missing media.
#[derive(Debug, Error)]
pub enum MediaError {
    /// The event carries no usable media reference
    #[error("Event has no media reference: {0}")]
    MissingReference(String),

    /// The media URI could not be parsed
    #[error("Invalid media URI: {0}")]
    InvalidUri(String),

    /// Failed to download the payload
    #[error("Failed to fetch media: {0}")]
    FetchFailed(String),

    /// Homeserver answered with a non-success status
    #[error("Media repository returned {status}: {message}")]
    Http { status: u16, message: String },

    /// Ciphertext hash does not match the advertised hash
    #[error("Encrypted attachment hash mismatch for {0}")]
    HashMismatch(String),

    /// Decryption failed
    #[error("Failed to decrypt media: {0}")]
    DecryptionFailed(String),

    /// Request timed out
    #[error("Media request timeout: {0}")]
    Timeout(String),
}

/// Archive errors
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// Two entries derived the same archive path
    #[error("Duplicate archive path: {0}")]
    DuplicatePath(String),

    /// Entry path is empty, absolute or escapes the archive root
    #[error("Invalid archive path: {0}")]
    InvalidPath(String),

    /// The container encoder failed
    #[error("Failed to serialize archive: {0}")]
    Serialization(String),
}

/// Output sink errors
///
/// Any bytes already delivered to the sink are partial once one of these
/// is returned.
#[derive(Debug, Error)]
pub enum StreamError {
    /// Chunk size must be positive
    #[error("Chunk size must be greater than zero")]
    InvalidChunkSize,

    /// Sink could not be opened
    #[error("Failed to open sink {name}: {message}")]
    OpenFailed { name: String, message: String },

    /// A chunk write failed
    #[error("Failed to write chunk {index}: {message}")]
    WriteFailed { index: usize, message: String },

    /// Closing the sink failed
    #[error("Failed to close sink: {0}")]
    CloseFailed(String),
}

// Conversion from std::io::Error
impl From<std::io::Error> for ScribeError {
    fn from(err: std::io::Error) -> Self {
        ScribeError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for ScribeError {
    fn from(err: serde_json::Error) -> Self {
        ScribeError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for ScribeError {
    fn from(err: toml::de::Error) -> Self {
        ScribeError::Configuration(format!("TOML parse error: {err}"))
    }
}

impl From<zip::result::ZipError> for ArchiveError {
    fn from(err: zip::result::ZipError) -> Self {
        ArchiveError::Serialization(err.to_string())
    }
}

impl From<zip::result::ZipError> for ScribeError {
    fn from(err: zip::result::ZipError) -> Self {
        ScribeError::Archive(err.into())
    }
}
