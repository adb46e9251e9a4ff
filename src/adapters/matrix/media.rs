//! Homeserver media repository client
//!
//! Downloads media through the client-server media API:
//! `GET /_matrix/media/v3/download/{serverName}/{mediaId}` and
//! `GET /_matrix/media/v3/thumbnail/{serverName}/{mediaId}`.

use super::decrypt::AesCtrDecryptor;
use crate::adapters::traits::{AttachmentDecryptor, MediaSource};
use crate::config::{HomeserverConfig, SecretString};
use crate::domain::asset::DEFAULT_MIME_TYPE;
use crate::domain::{MediaError, MediaPayload, MediaRef, Result, ScribeError};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD_NO_PAD;
use base64::Engine as _;
use reqwest::header::CONTENT_TYPE;
use secrecy::ExposeSecret;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Media source backed by a homeserver's media repository
pub struct HttpMediaSource {
    client: reqwest::Client,
    base_url: Url,
    access_token: Option<SecretString>,
    decryptor: Arc<dyn AttachmentDecryptor>,
}

impl HttpMediaSource {
    /// Create a media source from homeserver configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the base URL is invalid or the HTTP
    /// client cannot be built.
    pub fn new(config: &HomeserverConfig) -> Result<Self> {
        let mut base = config.base_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base).map_err(|e| {
            ScribeError::Configuration(format!(
                "Invalid homeserver base_url '{}': {e}",
                config.base_url
            ))
        })?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("scribe/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                ScribeError::Configuration(format!("Failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            base_url,
            access_token: config.access_token.clone(),
            decryptor: Arc::new(AesCtrDecryptor),
        })
    }

    /// Replace the default AES-CTR attachment decryptor
    pub fn with_decryptor(mut self, decryptor: Arc<dyn AttachmentDecryptor>) -> Self {
        self.decryptor = decryptor;
        self
    }

    /// Homeserver base URL
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    fn download_url(&self, mxc: &str) -> std::result::Result<Url, MediaError> {
        let (server, media_id) = parse_mxc(mxc)?;
        self.base_url
            .join(&format!("_matrix/media/v3/download/{server}/{media_id}"))
            .map_err(|e| MediaError::InvalidUri(format!("{mxc}: {e}")))
    }

    fn thumbnail_url(
        &self,
        mxc: &str,
        width: u32,
        height: u32,
    ) -> std::result::Result<Url, MediaError> {
        let (server, media_id) = parse_mxc(mxc)?;
        let mut url = self
            .base_url
            .join(&format!("_matrix/media/v3/thumbnail/{server}/{media_id}"))
            .map_err(|e| MediaError::InvalidUri(format!("{mxc}: {e}")))?;
        url.query_pairs_mut()
            .append_pair("width", &width.to_string())
            .append_pair("height", &height.to_string())
            .append_pair("method", "crop");
        Ok(url)
    }

    /// GET a URL, returning the body and the Content-Type header
    async fn get(&self, url: Url) -> std::result::Result<(Vec<u8>, Option<String>), MediaError> {
        tracing::debug!(url = %url, "Downloading media");

        let mut request = self.client.get(url.clone());
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token.expose_secret().as_ref());
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                MediaError::Timeout(url.to_string())
            } else {
                MediaError::FetchFailed(format!("{url}: {e}"))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(MediaError::Http {
                status: status.as_u16(),
                message,
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let bytes = response
            .bytes()
            .await
            .map_err(|e| MediaError::FetchFailed(format!("{url}: {e}")))?;

        Ok((bytes.to_vec(), content_type))
    }
}

#[async_trait]
impl MediaSource for HttpMediaSource {
    async fn fetch_media(&self, media: &MediaRef) -> std::result::Result<MediaPayload, MediaError> {
        let url = self.download_url(&media.url)?;
        let (bytes, content_type) = self.get(url).await?;
        let mime_type = pick_mime_type(content_type, media.mimetype.as_deref());
        Ok(MediaPayload::new(bytes, mime_type))
    }

    async fn decrypt_media(
        &self,
        media: &MediaRef,
    ) -> std::result::Result<MediaPayload, MediaError> {
        let file = media
            .file
            .as_ref()
            .ok_or_else(|| MediaError::MissingReference(media.url.clone()))?;

        let url = self.download_url(&file.url)?;
        let (ciphertext, _) = self.get(url).await?;

        let expected = file.sha256().ok_or_else(|| {
            MediaError::DecryptionFailed(format!("{} has no sha256 hash", file.url))
        })?;
        if !verify_sha256(&ciphertext, expected) {
            return Err(MediaError::HashMismatch(file.url.clone()));
        }

        let plaintext = self.decryptor.decrypt(file, &ciphertext)?;

        let mime_type = media
            .mimetype
            .clone()
            .unwrap_or_else(|| DEFAULT_MIME_TYPE.to_string());
        Ok(MediaPayload::new(plaintext, mime_type))
    }

    async fn fetch_thumbnail(
        &self,
        url: &str,
        width: u32,
        height: u32,
    ) -> std::result::Result<MediaPayload, MediaError> {
        let url = self.thumbnail_url(url, width, height)?;
        let (bytes, content_type) = self.get(url).await?;
        Ok(MediaPayload::new(bytes, pick_mime_type(content_type, None)))
    }
}

/// Split an `mxc://server/mediaId` URI into server name and media ID
pub fn parse_mxc(uri: &str) -> std::result::Result<(String, String), MediaError> {
    let url = Url::parse(uri).map_err(|e| MediaError::InvalidUri(format!("{uri}: {e}")))?;
    if url.scheme() != "mxc" {
        return Err(MediaError::InvalidUri(format!("{uri}: not an mxc URI")));
    }

    let host = url
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or_else(|| MediaError::InvalidUri(format!("{uri}: missing server name")))?;
    let server = match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    };

    let media_id = url.path().trim_start_matches('/');
    if media_id.is_empty() || media_id.contains('/') {
        return Err(MediaError::InvalidUri(format!("{uri}: invalid media ID")));
    }

    Ok((server, media_id.to_string()))
}

/// Compare the SHA-256 of `data` against an unpadded base64 digest
pub fn verify_sha256(data: &[u8], expected: &str) -> bool {
    let digest = Sha256::digest(data);
    STANDARD_NO_PAD.encode(digest) == expected.trim_end_matches('=')
}

/// Prefer the server's Content-Type unless it is missing or generic
fn pick_mime_type(content_type: Option<String>, advertised: Option<&str>) -> String {
    let header = content_type.filter(|ct| {
        let essence = ct.split(';').next().unwrap_or_default().trim();
        !essence.is_empty() && essence != DEFAULT_MIME_TYPE
    });

    header
        .or_else(|| advertised.map(str::to_string))
        .unwrap_or_else(|| DEFAULT_MIME_TYPE.to_string())
}
