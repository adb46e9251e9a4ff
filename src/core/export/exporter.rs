//! Export formats
//!
//! Every format implements [`Exporter`]: it turns an ordered event sequence
//! and its room into one archive blob. HTML is the only format today; new
//! formats are new implementations, not new code paths in the job.

use super::assembler::{AssemblyStats, DocumentAssembler, MissingMedia};
use super::cancel::{ensure_running, ShutdownSignal};
use crate::adapters::render::HtmlTileRenderer;
use crate::adapters::traits::{EventRenderer, MediaSource};
use crate::config::ExportConfig;
use crate::core::archive::{wrap_document, ArchiveBuilder, AVATAR_PATH};
use crate::core::layout::{LayoutRules, TimelineRules};
use crate::core::media::MediaResolver;
use crate::domain::{Event, Result, Room, ScribeError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Room avatar thumbnail edge, in pixels
const AVATAR_SIZE: u32 = 32;

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    /// Browsable HTML page with media, packed as ZIP
    Html,
}

impl ExportFormat {
    /// File extension of the produced archive
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Html => "zip",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Html => write!(f, "html"),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ScribeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "html" => Ok(ExportFormat::Html),
            other => Err(ScribeError::Validation(format!(
                "Unknown export format '{other}'. Must be one of: html"
            ))),
        }
    }
}

/// A serialized export, ready to stream
#[derive(Debug, Clone)]
pub struct ExportArchive {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub stats: AssemblyStats,
    pub missing_media: Vec<MissingMedia>,
    pub avatar_included: bool,
}

/// An export format
#[async_trait]
pub trait Exporter: Send + Sync {
    fn format(&self) -> ExportFormat;

    /// Build the archive for `events` of `room`
    ///
    /// # Errors
    ///
    /// Render and archive failures and cancellation. Media failures degrade
    /// instead of failing.
    async fn export(
        &self,
        events: &[Event],
        room: &Room,
        cancel: &ShutdownSignal,
    ) -> Result<ExportArchive>;
}

/// `<prefix>-<UTC start time>.<ext>`
///
/// The timestamp uses the ISO-8601 basic format (`20240305T140709.042Z`),
/// which has no colons and is therefore a valid file name on Windows too.
pub fn archive_file_name(prefix: &str, started_at: DateTime<Utc>, format: ExportFormat) -> String {
    format!(
        "{prefix}-{}.{}",
        started_at.format("%Y%m%dT%H%M%S%.3fZ"),
        format.extension()
    )
}

/// HTML export: `index.html` plus stylesheet, script, room avatar and media
pub struct HtmlExporter {
    assembler: DocumentAssembler,
    media: Arc<dyn MediaSource>,
    include_room_avatar: bool,
    file_prefix: String,
}

impl HtmlExporter {
    pub fn builder() -> HtmlExporterBuilder {
        HtmlExporterBuilder::default()
    }

    /// Fetch the room avatar into the archive once
    ///
    /// Returns whether `room.png` is present afterwards. Failures only cost
    /// the avatar.
    async fn attach_avatar(&self, room: &Room, archive: &mut ArchiveBuilder) -> Result<bool> {
        if archive.contains(AVATAR_PATH) {
            return Ok(true);
        }
        let Some(url) = room.avatar_url.as_deref().filter(|_| self.include_room_avatar) else {
            return Ok(false);
        };

        match self.media.fetch_thumbnail(url, AVATAR_SIZE, AVATAR_SIZE).await {
            Ok(payload) => {
                archive.add(AVATAR_PATH, payload.bytes)?;
                Ok(true)
            }
            Err(e) => {
                tracing::warn!(
                    room_id = %room.room_id,
                    error = %e,
                    "Room avatar unavailable, using initial"
                );
                Ok(false)
            }
        }
    }
}

#[async_trait]
impl Exporter for HtmlExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Html
    }

    async fn export(
        &self,
        events: &[Event],
        room: &Room,
        cancel: &ShutdownSignal,
    ) -> Result<ExportArchive> {
        let started_at = Utc::now();
        let mut archive = ArchiveBuilder::new();

        let assembly = self.assembler.assemble(events, &mut archive, cancel).await?;

        let avatar_included = self.attach_avatar(room, &mut archive).await?;
        ensure_running(cancel, "media resolution")?;

        let index = wrap_document(room, avatar_included, &assembly.body);
        let bytes = archive.finalize(&index)?;

        Ok(ExportArchive {
            file_name: archive_file_name(&self.file_prefix, started_at, self.format()),
            bytes,
            stats: assembly.stats,
            missing_media: assembly.missing_media,
            avatar_included,
        })
    }
}

/// Builder for [`HtmlExporter`]
///
/// Only the media source is required. Layout rules default to
/// [`TimelineRules`] and rendering to [`HtmlTileRenderer`].
pub struct HtmlExporterBuilder {
    rules: Option<Arc<dyn LayoutRules>>,
    renderer: Option<Arc<dyn EventRenderer>>,
    media: Option<Arc<dyn MediaSource>>,
    media_concurrency: usize,
    include_room_avatar: bool,
    file_prefix: String,
}

impl Default for HtmlExporterBuilder {
    fn default() -> Self {
        let defaults = ExportConfig::default();
        Self {
            rules: None,
            renderer: None,
            media: None,
            media_concurrency: defaults.media_concurrency,
            include_room_avatar: defaults.include_room_avatar,
            file_prefix: defaults.file_prefix,
        }
    }
}

impl HtmlExporterBuilder {
    pub fn rules(mut self, rules: Arc<dyn LayoutRules>) -> Self {
        self.rules = Some(rules);
        self
    }

    pub fn renderer(mut self, renderer: Arc<dyn EventRenderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    pub fn media_source(mut self, media: Arc<dyn MediaSource>) -> Self {
        self.media = Some(media);
        self
    }

    pub fn media_concurrency(mut self, n: usize) -> Self {
        self.media_concurrency = n;
        self
    }

    pub fn include_room_avatar(mut self, include: bool) -> Self {
        self.include_room_avatar = include;
        self
    }

    pub fn file_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.file_prefix = prefix.into();
        self
    }

    /// Apply the `[export]` settings that concern the exporter
    pub fn export_config(self, config: &ExportConfig) -> Self {
        self.media_concurrency(config.media_concurrency)
            .include_room_avatar(config.include_room_avatar)
            .file_prefix(config.file_prefix.clone())
    }

    /// # Errors
    ///
    /// Returns a validation error without a media source or with a zero
    /// media concurrency.
    pub fn build(self) -> Result<HtmlExporter> {
        let media = self
            .media
            .ok_or_else(|| ScribeError::Validation("media source is required".to_string()))?;
        if self.media_concurrency == 0 {
            return Err(ScribeError::Validation(
                "media concurrency must be at least 1".to_string(),
            ));
        }

        let rules = self
            .rules
            .unwrap_or_else(|| Arc::new(TimelineRules::default()));
        let renderer = self
            .renderer
            .unwrap_or_else(|| Arc::new(HtmlTileRenderer::new()));
        let assembler = DocumentAssembler::new(rules, renderer, MediaResolver::new(media.clone()))
            .with_media_concurrency(self.media_concurrency);

        Ok(HtmlExporter {
            assembler,
            media,
            include_room_avatar: self.include_room_avatar,
            file_prefix: self.file_prefix,
        })
    }
}
