//! Timeline event domain model
//!
//! Events arrive already ordered by the caller. The pipeline only reads them;
//! nothing here is mutated after construction.

use super::ids::{EventId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Visual content kind of an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    /// Text-like messages (`m.text`, `m.notice`, `m.emote`)
    Plain,
    /// `m.image`
    Image,
    /// `m.video`
    Video,
    /// `m.audio`
    Audio,
    /// Anything else, including events without a `msgtype`
    Other,
}

impl ContentKind {
    /// Maps a Matrix `msgtype` to a content kind
    pub fn from_msgtype(msgtype: Option<&str>) -> Self {
        match msgtype {
            Some("m.image") => ContentKind::Image,
            Some("m.video") => ContentKind::Video,
            Some("m.audio") => ContentKind::Audio,
            Some("m.text") | Some("m.notice") | Some("m.emote") => ContentKind::Plain,
            _ => ContentKind::Other,
        }
    }

    /// Archive folder for media kinds, `None` for kinds that carry no asset
    pub fn media_folder(&self) -> Option<&'static str> {
        match self {
            ContentKind::Image => Some("images"),
            ContentKind::Video => Some("videos"),
            ContentKind::Audio => Some("audio"),
            ContentKind::Plain | ContentKind::Other => None,
        }
    }

    /// Whether events of this kind carry a media payload
    pub fn is_media(&self) -> bool {
        self.media_folder().is_some()
    }
}

/// JSON Web Key of an encrypted attachment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonWebKey {
    pub kty: String,
    #[serde(default)]
    pub key_ops: Vec<String>,
    pub alg: String,
    /// Unpadded url-safe base64 AES key
    pub k: String,
    #[serde(default)]
    pub ext: bool,
}

/// Encrypted attachment descriptor (`content.file`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncryptedFile {
    /// mxc URI of the ciphertext
    pub url: String,
    pub key: JsonWebKey,
    /// Unpadded base64 initialisation vector
    pub iv: String,
    /// Hash algorithm name to unpadded base64 digest of the ciphertext
    #[serde(default)]
    pub hashes: BTreeMap<String, String>,
    #[serde(default)]
    pub v: Option<String>,
}

impl EncryptedFile {
    /// Advertised SHA-256 of the ciphertext, if any
    pub fn sha256(&self) -> Option<&str> {
        self.hashes.get("sha256").map(String::as_str)
    }
}

/// Reference to the media payload of a media-bearing event
#[derive(Debug, Clone, PartialEq)]
pub struct MediaRef {
    /// mxc URI of the payload (ciphertext URI when encrypted)
    pub url: String,

    /// MIME type advertised in `content.info.mimetype`
    pub mimetype: Option<String>,

    /// Present for encrypted attachments
    pub file: Option<EncryptedFile>,
}

/// One timeline event
///
/// # Examples
///
/// ```
/// use scribe::domain::event::{ContentKind, Event};
/// use chrono::Utc;
/// use serde_json::json;
///
/// let event = Event::builder()
///     .event_id("$abc:example.org")
///     .sender("@alice:example.org")
///     .timestamp(Utc::now())
///     .content(json!({"msgtype": "m.image", "body": "cat.png", "url": "mxc://example.org/cat"}))
///     .build()
///     .unwrap();
///
/// assert_eq!(event.kind, ContentKind::Image);
/// assert!(!event.encrypted);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub event_id: EventId,

    pub timestamp: DateTime<Utc>,

    pub sender: UserId,

    /// Matrix event type, e.g. `m.room.message`
    pub event_type: String,

    /// Set for state events
    pub state_key: Option<String>,

    pub kind: ContentKind,

    /// True when the media payload is an encrypted attachment
    pub encrypted: bool,

    /// Raw event content
    pub content: serde_json::Value,
}

impl Event {
    /// Creates a new builder for constructing an Event
    pub fn builder() -> EventBuilder {
        EventBuilder::default()
    }

    /// Whether this is a state event
    pub fn is_state(&self) -> bool {
        self.state_key.is_some()
    }

    /// Message body text, if any
    pub fn body(&self) -> Option<&str> {
        self.content.get("body").and_then(|b| b.as_str())
    }

    /// Extracts the media reference for media kinds
    ///
    /// Returns `None` for non-media kinds and for media events whose content
    /// carries neither `url` nor a well-formed `file`.
    pub fn media_ref(&self) -> Option<MediaRef> {
        if !self.kind.is_media() {
            return None;
        }

        let mimetype = self
            .content
            .get("info")
            .and_then(|info| info.get("mimetype"))
            .and_then(|m| m.as_str())
            .map(str::to_string);

        if self.encrypted {
            let file: EncryptedFile =
                serde_json::from_value(self.content.get("file")?.clone()).ok()?;
            return Some(MediaRef {
                url: file.url.clone(),
                mimetype,
                file: Some(file),
            });
        }

        let url = self.content.get("url")?.as_str()?.to_string();
        Some(MediaRef {
            url,
            mimetype,
            file: None,
        })
    }
}

/// Builder for constructing Event instances
///
/// `kind` and `encrypted` are derived from the content on `build`.
#[derive(Debug, Default)]
pub struct EventBuilder {
    event_id: Option<String>,
    timestamp: Option<DateTime<Utc>>,
    sender: Option<String>,
    event_type: Option<String>,
    state_key: Option<String>,
    content: Option<serde_json::Value>,
}

impl EventBuilder {
    /// Creates a new EventBuilder
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the event ID
    pub fn event_id(mut self, event_id: impl Into<String>) -> Self {
        self.event_id = Some(event_id.into());
        self
    }

    /// Sets the origin server timestamp
    pub fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Sets the sender
    pub fn sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = Some(sender.into());
        self
    }

    /// Sets the event type (defaults to `m.room.message`)
    pub fn event_type(mut self, event_type: impl Into<String>) -> Self {
        self.event_type = Some(event_type.into());
        self
    }

    /// Marks the event as a state event with the given key
    pub fn state_key(mut self, state_key: impl Into<String>) -> Self {
        self.state_key = Some(state_key.into());
        self
    }

    /// Sets the content
    pub fn content(mut self, content: serde_json::Value) -> Self {
        self.content = Some(content);
        self
    }

    /// Builds the Event
    ///
    /// # Errors
    ///
    /// Returns an error if a required field is missing or an identifier is invalid
    pub fn build(self) -> Result<Event, String> {
        let event_id = EventId::new(self.event_id.ok_or("event_id is required")?)?;
        let sender = UserId::new(self.sender.ok_or("sender is required")?)?;
        let timestamp = self.timestamp.ok_or("timestamp is required")?;
        let content = self
            .content
            .unwrap_or_else(|| serde_json::Value::Object(Default::default()));

        let kind = ContentKind::from_msgtype(content.get("msgtype").and_then(|m| m.as_str()));
        let encrypted = content.get("file").is_some_and(|f| f.is_object());

        Ok(Event {
            event_id,
            timestamp,
            sender,
            event_type: self
                .event_type
                .unwrap_or_else(|| "m.room.message".to_string()),
            state_key: self.state_key,
            kind,
            encrypted,
            content,
        })
    }
}

/// Event in the Matrix client-server wire shape
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawEvent {
    pub event_id: String,
    pub sender: String,
    /// Epoch milliseconds
    pub origin_server_ts: i64,
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub state_key: Option<String>,
    #[serde(default)]
    pub content: serde_json::Value,
}

impl TryFrom<RawEvent> for Event {
    type Error = String;

    fn try_from(raw: RawEvent) -> Result<Self, Self::Error> {
        let timestamp = DateTime::<Utc>::from_timestamp_millis(raw.origin_server_ts)
            .ok_or_else(|| {
                format!(
                    "origin_server_ts {} out of range for event {}",
                    raw.origin_server_ts, raw.event_id
                )
            })?;

        let mut builder = EventBuilder::new()
            .event_id(raw.event_id)
            .sender(raw.sender)
            .timestamp(timestamp)
            .event_type(raw.event_type)
            .content(raw.content);
        if let Some(state_key) = raw.state_key {
            builder = builder.state_key(state_key);
        }
        builder.build()
    }
}
