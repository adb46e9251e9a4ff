//! Domain models and types for Scribe.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`EventId`], [`UserId`], [`RoomId`])
//! - **Timeline model** ([`Event`], [`ContentKind`], [`MediaRef`], [`Room`])
//! - **Media payloads** ([`MediaPayload`], [`Asset`])
//! - **Error types** ([`ScribeError`], [`MediaError`], [`ArchiveError`], [`StreamError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, ScribeError>`]:
//!
//! ```rust
//! use scribe::domain::{Result, ScribeError};
//!
//! fn example() -> Result<()> {
//!     Err(ScribeError::Validation("empty timeline".to_string()))
//! }
//! ```

pub mod asset;
pub mod errors;
pub mod event;
pub mod ids;
pub mod result;
pub mod room;

// Re-export commonly used types for convenience
pub use asset::{Asset, MediaPayload};
pub use errors::{ArchiveError, MediaError, ScribeError, StreamError};
pub use event::{ContentKind, EncryptedFile, Event, EventBuilder, MediaRef, RawEvent};
pub use ids::{EventId, RoomId, UserId};
pub use result::Result;
pub use room::Room;
