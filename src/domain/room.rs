//! Room domain model

use super::ids::RoomId;
use serde::{Deserialize, Serialize};

/// The room being exported
///
/// Only the pieces the archive header needs: identifier, display name and
/// an optional avatar mxc URI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub room_id: RoomId,

    pub name: String,

    #[serde(default)]
    pub avatar_url: Option<String>,
}

impl Room {
    /// Creates a room without an avatar
    pub fn new(room_id: RoomId, name: impl Into<String>) -> Self {
        Self {
            room_id,
            name: name.into(),
            avatar_url: None,
        }
    }

    /// Sets the avatar mxc URI
    pub fn with_avatar_url(mut self, avatar_url: impl Into<String>) -> Self {
        self.avatar_url = Some(avatar_url.into());
        self
    }

    /// Name shown in the archive header, falling back to the room ID
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            self.room_id.as_str()
        } else {
            &self.name
        }
    }
}
