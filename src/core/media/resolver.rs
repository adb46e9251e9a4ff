//! Media resolution
//!
//! Turns a media-bearing event into an archive [`Asset`]: fetch (or fetch
//! and decrypt) the payload, then derive `<folder>/<eventId>.<ext>` from the
//! content kind and the payload's MIME type.

use crate::adapters::traits::MediaSource;
use crate::domain::{Asset, Event, MediaError, MediaPayload};
use std::sync::Arc;

/// Resolves event media through a [`MediaSource`]
#[derive(Clone)]
pub struct MediaResolver {
    source: Arc<dyn MediaSource>,
}

impl MediaResolver {
    pub fn new(source: Arc<dyn MediaSource>) -> Self {
        Self { source }
    }

    /// Resolve the media of one event
    ///
    /// Returns `Ok(None)` for kinds that carry no media.
    ///
    /// # Errors
    ///
    /// Returns a [`MediaError`] if the event has no usable reference or the
    /// payload cannot be fetched or decrypted. The caller decides how to
    /// degrade.
    pub async fn resolve(&self, event: &Event) -> Result<Option<Asset>, MediaError> {
        let Some(folder) = event.kind.media_folder() else {
            return Ok(None);
        };

        let media = event
            .media_ref()
            .ok_or_else(|| MediaError::MissingReference(event.event_id.to_string()))?;

        let payload = if event.encrypted {
            self.source.decrypt_media(&media).await?
        } else {
            self.source.fetch_media(&media).await?
        };

        let path = asset_path(folder, event, &payload);
        tracing::debug!(
            event_id = %event.event_id,
            path = %path,
            bytes = payload.bytes.len(),
            encrypted = event.encrypted,
            "Resolved media"
        );

        Ok(Some(Asset {
            path,
            bytes: payload.bytes,
            mime_type: payload.mime_type,
        }))
    }
}

/// Archive path for an event's media payload
pub fn asset_path(folder: &str, event: &Event, payload: &MediaPayload) -> String {
    format!(
        "{folder}/{}.{}",
        event.event_id.to_path_component(),
        payload.extension()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct StubSource {
        fetches: AtomicUsize,
        decrypts: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl MediaSource for StubSource {
        async fn fetch_media(
            &self,
            media: &crate::domain::MediaRef,
        ) -> Result<MediaPayload, MediaError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(MediaError::FetchFailed(media.url.clone()));
            }
            Ok(MediaPayload::new(b"plain".to_vec(), "image/png"))
        }

        async fn decrypt_media(
            &self,
            _media: &crate::domain::MediaRef,
        ) -> Result<MediaPayload, MediaError> {
            self.decrypts.fetch_add(1, Ordering::SeqCst);
            Ok(MediaPayload::new(b"secret".to_vec(), "video/mp4"))
        }

        async fn fetch_thumbnail(
            &self,
            _url: &str,
            _width: u32,
            _height: u32,
        ) -> Result<MediaPayload, MediaError> {
            unreachable!("resolver never fetches thumbnails")
        }
    }

    fn event(id: &str, content: serde_json::Value) -> Event {
        Event::builder()
            .event_id(id)
            .sender("@alice:example.org")
            .timestamp(Utc.timestamp_millis_opt(0).unwrap())
            .content(content)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_resolve_plain_media() {
        let source = Arc::new(StubSource::default());
        let resolver = MediaResolver::new(source.clone());

        let image = event(
            "$img",
            json!({"msgtype": "m.image", "body": "a.png", "url": "mxc://e.org/a"}),
        );
        let asset = resolver.resolve(&image).await.unwrap().unwrap();

        assert_eq!(asset.path, "images/$img.png");
        assert_eq!(asset.bytes, b"plain");
        assert_eq!(source.fetches.load(Ordering::SeqCst), 1);
        assert_eq!(source.decrypts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_resolve_encrypted_media_decrypts() {
        let source = Arc::new(StubSource::default());
        let resolver = MediaResolver::new(source.clone());

        let video = event(
            "$vid",
            json!({
                "msgtype": "m.video",
                "body": "clip.mp4",
                "file": {
                    "url": "mxc://e.org/v",
                    "key": {"kty": "oct", "key_ops": ["decrypt"], "alg": "A256CTR", "k": "key", "ext": true},
                    "iv": "iv",
                    "hashes": {"sha256": "hash"},
                    "v": "v2"
                }
            }),
        );
        let asset = resolver.resolve(&video).await.unwrap().unwrap();

        assert_eq!(asset.path, "videos/$vid.mp4");
        assert_eq!(source.decrypts.load(Ordering::SeqCst), 1);
        assert_eq!(source.fetches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_resolve_non_media_is_none() {
        let source = Arc::new(StubSource::default());
        let resolver = MediaResolver::new(source.clone());

        let text = event("$t", json!({"msgtype": "m.text", "body": "hi"}));
        assert!(resolver.resolve(&text).await.unwrap().is_none());
        assert_eq!(source.fetches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_resolve_failures() {
        let source = Arc::new(StubSource {
            fail: true,
            ..StubSource::default()
        });
        let resolver = MediaResolver::new(source);

        let audio = event(
            "$aud",
            json!({"msgtype": "m.audio", "body": "a.ogg", "url": "mxc://e.org/a"}),
        );
        assert!(matches!(
            resolver.resolve(&audio).await,
            Err(MediaError::FetchFailed(_))
        ));

        let no_url = event("$nourl", json!({"msgtype": "m.image", "body": "a.png"}));
        assert!(matches!(
            resolver.resolve(&no_url).await,
            Err(MediaError::MissingReference(_))
        ));
    }

    #[test]
    fn test_asset_path_sanitises_event_id() {
        let e = event("$a/b", json!({"msgtype": "m.image"}));
        let payload = MediaPayload::new(Vec::new(), "image/jpeg");
        assert_eq!(asset_path("images", &e, &payload), "images/$a_b.jpeg");
    }
}
