//! Collaborator traits
//!
//! The export pipeline never talks to a homeserver, a markup engine or a
//! file system directly. It goes through the traits below, which callers
//! implement or pick from the adapters in this crate.

use crate::domain::{EncryptedFile, Event, MediaError, MediaPayload, MediaRef, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Source of media payloads
///
/// Implementations fetch plaintext media, fetch and decrypt encrypted
/// attachments, and fetch thumbnails (used for the room avatar).
#[async_trait]
pub trait MediaSource: Send + Sync {
    /// Fetch an unencrypted media payload
    ///
    /// # Errors
    ///
    /// Returns a [`MediaError`] if the payload cannot be downloaded.
    async fn fetch_media(&self, media: &MediaRef) -> std::result::Result<MediaPayload, MediaError>;

    /// Fetch an encrypted attachment and return the plaintext
    ///
    /// # Errors
    ///
    /// Returns a [`MediaError`] if the download, hash check or decryption fails.
    async fn decrypt_media(
        &self,
        media: &MediaRef,
    ) -> std::result::Result<MediaPayload, MediaError>;

    /// Fetch a server-side thumbnail of an mxc URI
    ///
    /// # Errors
    ///
    /// Returns a [`MediaError`] if the thumbnail cannot be downloaded.
    async fn fetch_thumbnail(
        &self,
        url: &str,
        width: u32,
        height: u32,
    ) -> std::result::Result<MediaPayload, MediaError>;
}

/// Decrypts encrypted attachments (AES-CTR per the Matrix attachment format)
///
/// Called after the ciphertext hash has been verified.
pub trait AttachmentDecryptor: Send + Sync {
    /// Decrypt `ciphertext` with the key material in `file`
    ///
    /// # Errors
    ///
    /// Returns [`MediaError::DecryptionFailed`] on bad key material.
    fn decrypt(
        &self,
        file: &EncryptedFile,
        ciphertext: &[u8],
    ) -> std::result::Result<Vec<u8>, MediaError>;
}

/// What the renderer should show for an event's media
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaSlot<'a> {
    /// The event carries no media
    None,
    /// Media was stored in the archive at this relative path
    Resolved(&'a str),
    /// The event carries media that could not be resolved
    Missing,
}

/// Renders single events into markup
///
/// Rendering is synchronous: it must not perform I/O.
pub trait EventRenderer: Send + Sync {
    /// Whether the event has a visual representation at all
    fn is_renderable(&self, event: &Event) -> bool;

    /// Render one event tile
    ///
    /// The fragment must carry an anchor derived from the event ID.
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::ScribeError::Render`]; the export is aborted.
    fn render_event(&self, event: &Event, continuation: bool, media: MediaSlot<'_>)
        -> Result<String>;

    /// Render a day separator placed before the event with this timestamp
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::ScribeError::Render`]; the export is aborted.
    fn render_date_separator(&self, timestamp: DateTime<Utc>) -> Result<String>;
}

/// Destination for the serialized archive
#[async_trait]
pub trait ExportSink: Send + Sync {
    /// Open a writer for an archive called `name` of exactly `total_size` bytes
    async fn open(&self, name: &str, total_size: u64) -> std::io::Result<Box<dyn SinkWriter>>;
}

/// Open handle on an [`ExportSink`]
///
/// `close` and `abort` consume the writer so nothing can be written after
/// either of them.
#[async_trait]
pub trait SinkWriter: Send {
    /// Write one chunk; the next chunk is only issued after this resolves
    async fn write(&mut self, chunk: &[u8]) -> std::io::Result<()>;

    /// Finish the archive
    async fn close(self: Box<Self>) -> std::io::Result<()>;

    /// Give up on a partially written archive
    async fn abort(self: Box<Self>) -> std::io::Result<()> {
        Ok(())
    }
}
