//! Background media prefetch
//!
//! Downloads run on their own task, so they keep making progress while the
//! assembler renders text tiles. Results come back in event order.

use super::MediaResolver;
use crate::domain::{Asset, Event, MediaError};
use futures::stream::{self, StreamExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Outcome of resolving one media event
pub type Resolved = Result<Option<Asset>, MediaError>;

/// Ordered stream of resolved media fed by a spawned task
///
/// Dropping the prefetch aborts downloads still in flight.
pub struct MediaPrefetch {
    results: mpsc::Receiver<Resolved>,
    task: JoinHandle<()>,
}

impl MediaPrefetch {
    /// Start resolving `events` with at most `concurrency` downloads in flight
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(resolver: MediaResolver, events: Vec<Event>, concurrency: usize) -> Self {
        let concurrency = concurrency.max(1);
        let (tx, results) = mpsc::channel(concurrency);

        let task = tokio::spawn(async move {
            let mut resolved = stream::iter(events)
                .map(move |event| {
                    let resolver = resolver.clone();
                    async move { resolver.resolve(&event).await }
                })
                .buffered(concurrency);

            while let Some(result) = resolved.next().await {
                // Receiver gone: the assembly stopped early
                if tx.send(result).await.is_err() {
                    break;
                }
            }
        });

        Self { results, task }
    }

    /// Next result in event order, `None` once every event was resolved
    pub async fn next(&mut self) -> Option<Resolved> {
        self.results.recv().await
    }
}

impl Drop for MediaPrefetch {
    fn drop(&mut self) {
        self.task.abort();
    }
}
