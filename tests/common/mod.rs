//! Shared fixtures for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use scribe::adapters::traits::{EventRenderer, MediaSlot, MediaSource};
use scribe::core::layout::LayoutRules;
use scribe::domain::{Event, MediaError, MediaPayload, MediaRef, Result, Room, RoomId};
use serde_json::json;
use std::collections::HashSet;
use std::sync::Mutex;

/// Date gap when timestamps are more than 100 s apart; continuation for
/// the same sender
pub struct GapRules;

impl LayoutRules for GapRules {
    fn needs_date_gap(&self, prev: DateTime<Utc>, cur: DateTime<Utc>) -> bool {
        (cur - prev).num_milliseconds() > 100_000
    }

    fn forms_continuation(&self, prev: &Event, cur: &Event) -> bool {
        prev.sender == cur.sender
    }
}

/// Renders `[sep]` and `[<id>|c|<path>]` markers, easy to assert on
pub struct MarkerRenderer;

impl EventRenderer for MarkerRenderer {
    fn is_renderable(&self, event: &Event) -> bool {
        !event.is_state()
    }

    fn render_event(&self, event: &Event, continuation: bool, media: MediaSlot<'_>) -> Result<String> {
        let media = match media {
            MediaSlot::None => String::new(),
            MediaSlot::Resolved(path) => format!("|{path}"),
            MediaSlot::Missing => "|missing".to_string(),
        };
        let cont = if continuation { "|c" } else { "" };
        Ok(format!("[{}{cont}{media}]", event.event_id))
    }

    fn render_date_separator(&self, _timestamp: DateTime<Utc>) -> Result<String> {
        Ok("[sep]".to_string())
    }
}

/// Serves PNG bytes for every mxc URI except the ones marked as failing
#[derive(Default)]
pub struct StubMediaSource {
    failing: HashSet<String>,
    avatar: Option<Vec<u8>>,
    pub thumbnail_requests: Mutex<Vec<String>>,
}

impl StubMediaSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(mut self, url: &str) -> Self {
        self.failing.insert(url.to_string());
        self
    }

    pub fn with_avatar(mut self, bytes: Vec<u8>) -> Self {
        self.avatar = Some(bytes);
        self
    }
}

#[async_trait]
impl MediaSource for StubMediaSource {
    async fn fetch_media(&self, media: &MediaRef) -> std::result::Result<MediaPayload, MediaError> {
        if self.failing.contains(&media.url) {
            return Err(MediaError::FetchFailed(media.url.clone()));
        }
        Ok(MediaPayload::new(
            media.url.as_bytes().to_vec(),
            media.mimetype.clone().unwrap_or_else(|| "image/png".to_string()),
        ))
    }

    async fn decrypt_media(&self, media: &MediaRef) -> std::result::Result<MediaPayload, MediaError> {
        Err(MediaError::DecryptionFailed(media.url.clone()))
    }

    async fn fetch_thumbnail(
        &self,
        url: &str,
        _width: u32,
        _height: u32,
    ) -> std::result::Result<MediaPayload, MediaError> {
        self.thumbnail_requests
            .lock()
            .unwrap()
            .push(url.to_string());
        self.avatar
            .clone()
            .map(|bytes| MediaPayload::new(bytes, "image/png"))
            .ok_or_else(|| MediaError::FetchFailed(url.to_string()))
    }
}

pub fn room() -> Room {
    Room::new(RoomId::new("!room:example.org").unwrap(), "General")
}

pub fn ts(millis: i64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(millis).unwrap()
}

pub fn text(id: &str, sender: &str, millis: i64) -> Event {
    Event::builder()
        .event_id(id)
        .sender(sender)
        .timestamp(ts(millis))
        .content(json!({"msgtype": "m.text", "body": format!("message {id}")}))
        .build()
        .unwrap()
}

pub fn image(id: &str, sender: &str, millis: i64) -> Event {
    media_event(id, sender, millis, "m.image", &format!("mxc://example.org/{id}"))
}

pub fn media_event(id: &str, sender: &str, millis: i64, msgtype: &str, url: &str) -> Event {
    Event::builder()
        .event_id(id)
        .sender(sender)
        .timestamp(ts(millis))
        .content(json!({"msgtype": msgtype, "body": "attachment", "url": url}))
        .build()
        .unwrap()
}

pub fn state(id: &str, millis: i64) -> Event {
    Event::builder()
        .event_id(id)
        .sender("@admin:example.org")
        .event_type("m.room.topic")
        .state_key("")
        .timestamp(ts(millis))
        .content(json!({"topic": "Rust"}))
        .build()
        .unwrap()
}
