//! Document assembly
//!
//! Folds the ordered event sequence into the timeline body. Each step reads
//! the last rendered event, decides on separator and continuation, commits
//! the event's media to the archive and appends the rendered markup.
//!
//! Media is fetched ahead of the cursor on a background task
//! (`media_concurrency` downloads in flight), but results are consumed in
//! order, so assets are registered and tiles appended strictly in event
//! order.

use super::cancel::{ensure_running, ShutdownSignal};
use crate::adapters::traits::{EventRenderer, MediaSlot};
use crate::core::archive::ArchiveBuilder;
use crate::core::layout::{plan_event, LayoutRules, TilePlan};
use crate::core::media::{MediaPrefetch, MediaResolver, Resolved};
use crate::domain::{Event, EventId, MediaError, Result};
use crate::log_media_skipped;
use std::sync::Arc;

/// Counters collected while assembling
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssemblyStats {
    pub events_total: usize,
    pub events_rendered: usize,
    pub events_skipped: usize,
    pub date_separators: usize,
    pub continuations: usize,
    pub media_exported: usize,
    pub media_missing: usize,
}

/// A media event rendered without its asset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingMedia {
    pub event_id: EventId,
    pub reason: String,
}

/// Result of assembling one event sequence
#[derive(Debug, Clone, Default)]
pub struct Assembly {
    /// Concatenated separator and tile markup, in event order
    pub body: String,
    pub stats: AssemblyStats,
    pub missing_media: Vec<MissingMedia>,
}

/// State threaded from one step to the next
struct AssemblerState<'e> {
    last_rendered: Option<&'e Event>,
    assembly: Assembly,
}

impl<'e> AssemblerState<'e> {
    fn new(events_total: usize) -> Self {
        let mut assembly = Assembly::default();
        assembly.stats.events_total = events_total;
        Self {
            last_rendered: None,
            assembly,
        }
    }

    fn skip(mut self) -> Self {
        self.assembly.stats.events_skipped += 1;
        self
    }

    fn commit(
        mut self,
        event: &'e Event,
        plan: TilePlan,
        separator: Option<String>,
        fragment: String,
    ) -> Self {
        let stats = &mut self.assembly.stats;
        if let Some(separator) = separator {
            self.assembly.body.push_str(&separator);
            stats.date_separators += 1;
        }
        if plan.continuation {
            stats.continuations += 1;
        }
        stats.events_rendered += 1;
        self.assembly.body.push_str(&fragment);
        self.last_rendered = Some(event);
        self
    }
}

/// What happened to one event's media
enum MediaOutcome {
    NoMedia,
    Stored(String),
    Missing(MediaError),
}

/// Drives the per-event loop of an export
#[derive(Clone)]
pub struct DocumentAssembler {
    rules: Arc<dyn LayoutRules>,
    renderer: Arc<dyn EventRenderer>,
    resolver: MediaResolver,
    media_concurrency: usize,
}

impl DocumentAssembler {
    pub fn new(
        rules: Arc<dyn LayoutRules>,
        renderer: Arc<dyn EventRenderer>,
        resolver: MediaResolver,
    ) -> Self {
        Self {
            rules,
            renderer,
            resolver,
            media_concurrency: 1,
        }
    }

    /// Allow up to `n` media downloads in flight ahead of the cursor
    pub fn with_media_concurrency(mut self, n: usize) -> Self {
        self.media_concurrency = n.max(1);
        self
    }

    /// Assemble the timeline body, registering resolved media in `archive`
    ///
    /// # Errors
    ///
    /// Render errors, archive path collisions and cancellation abort the
    /// assembly. Media failures do not: the event is rendered as missing
    /// media and reported in [`Assembly::missing_media`].
    pub async fn assemble(
        &self,
        events: &[Event],
        archive: &mut ArchiveBuilder,
        cancel: &ShutdownSignal,
    ) -> Result<Assembly> {
        let renderer = &self.renderer;

        // Yields one result per renderable media event, in event order
        let media_events: Vec<Event> = events
            .iter()
            .filter(|e| e.kind.is_media() && renderer.is_renderable(e))
            .cloned()
            .collect();
        let mut media =
            MediaPrefetch::spawn(self.resolver.clone(), media_events, self.media_concurrency);

        let mut state = AssemblerState::new(events.len());
        for event in events {
            if !renderer.is_renderable(event) {
                tracing::trace!(event_id = %event.event_id, "Skipping non-renderable event");
                state = state.skip();
                continue;
            }

            let plan = plan_event(self.rules.as_ref(), state.last_rendered, event);
            let separator = if plan.separator {
                Some(renderer.render_date_separator(event.timestamp)?)
            } else {
                None
            };

            let outcome = if event.kind.is_media() {
                let resolved = media.next().await.unwrap_or_else(|| {
                    Err(MediaError::MissingReference(event.event_id.to_string()))
                });
                ensure_running(cancel, "media resolution")?;
                commit_media(resolved, archive)?
            } else {
                MediaOutcome::NoMedia
            };

            let slot = match &outcome {
                MediaOutcome::NoMedia => MediaSlot::None,
                MediaOutcome::Stored(path) => MediaSlot::Resolved(path),
                MediaOutcome::Missing(_) => MediaSlot::Missing,
            };
            let fragment = renderer.render_event(event, plan.continuation, slot)?;

            match outcome {
                MediaOutcome::Stored(_) => state.assembly.stats.media_exported += 1,
                MediaOutcome::Missing(e) => {
                    log_media_skipped!(event.event_id, e);
                    state.assembly.stats.media_missing += 1;
                    state.assembly.missing_media.push(MissingMedia {
                        event_id: event.event_id.clone(),
                        reason: e.to_string(),
                    });
                }
                MediaOutcome::NoMedia => {}
            }

            state = state.commit(event, plan, separator, fragment);
            ensure_running(cancel, "assembling")?;
        }

        let assembly = state.assembly;
        tracing::info!(
            events = assembly.stats.events_total,
            rendered = assembly.stats.events_rendered,
            skipped = assembly.stats.events_skipped,
            media = assembly.stats.media_exported,
            media_missing = assembly.stats.media_missing,
            "Document assembled"
        );
        Ok(assembly)
    }
}

fn commit_media(
    resolved: Resolved,
    archive: &mut ArchiveBuilder,
) -> Result<MediaOutcome> {
    match resolved {
        Ok(Some(asset)) => {
            let path = asset.path.clone();
            archive.add_asset(asset)?;
            Ok(MediaOutcome::Stored(path))
        }
        Ok(None) => Ok(MediaOutcome::NoMedia),
        Err(e) => Ok(MediaOutcome::Missing(e)),
    }
}
