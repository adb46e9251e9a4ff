//! Domain identifier types with validation
//!
//! Newtype wrappers for Matrix identifiers. Each type keeps event, user and
//! room identifiers from being mixed up and rejects empty values.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Bytes escaped when an event ID becomes an archive file name
const PATH_COMPONENT: &AsciiSet = &CONTROLS.add(b'%').add(b'/').add(b'\\');

/// Event identifier newtype wrapper
///
/// Unique within one exported timeline. Matrix event IDs look like
/// `$Rqnc-F-dvnEYJTyHq_iKxU2bZ1CI92-kuZq3a5lr5Zg` (room v4+) or
/// `$143273582443PhrSn:example.org` (older rooms).
///
/// # Examples
///
/// ```
/// use scribe::domain::ids::EventId;
/// use std::str::FromStr;
///
/// let event_id = EventId::from_str("$143273582443PhrSn:example.org").unwrap();
/// assert_eq!(event_id.as_str(), "$143273582443PhrSn:example.org");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EventId(String);

impl EventId {
    /// Creates a new EventId from a string
    ///
    /// # Returns
    ///
    /// Returns `Ok(EventId)` if the ID is valid, `Err` otherwise
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Event ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the event ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Returns the ID in a form usable as a single archive path segment
    ///
    /// `%`, path separators and control characters are percent-encoded.
    /// The mapping is reversible, so distinct IDs never share a segment.
    pub fn to_path_component(&self) -> String {
        utf8_percent_encode(&self.0, PATH_COMPONENT).to_string()
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EventId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for EventId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// User identifier newtype wrapper (`@alice:example.org`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(String);

impl UserId {
    /// Creates a new UserId from a string
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("User ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the user ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Localpart without the sigil and server name, used as a display fallback
    pub fn localpart(&self) -> &str {
        let without_sigil = self.0.strip_prefix('@').unwrap_or(&self.0);
        without_sigil.split(':').next().unwrap_or(without_sigil)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UserId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Room identifier newtype wrapper (`!opaque:example.org`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoomId(String);

impl RoomId {
    /// Creates a new RoomId from a string
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Room ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the room ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RoomId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
