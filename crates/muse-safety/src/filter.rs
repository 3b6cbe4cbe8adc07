//! Batch filter orchestration.
//!
//! Takes one batch of raw third-party records, runs every moderation stage
//! concurrently per item and across items, and returns only the items that
//! passed, with unsafe images replaced by the placeholder. Never returns
//! an error: a batch the pipeline cannot vouch for comes back smaller, not
//! failed.

use std::sync::Arc;

use muse_core::{CandidateRecord, FilteredItem, RecordKind};
use serde_json::Value;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::config::SafetyConfig;
use crate::image::{ImageSafety, ImageSafetyClient};
use crate::text::{is_safe_text, TextModeration, TextModerationClient};

/// Orchestrator applying text and image moderation to record batches.
pub struct ItemFilter {
    text: Arc<dyn TextModeration>,
    image: Arc<dyn ImageSafety>,
    semaphore: Arc<Semaphore>,
    min_playlist_tracks: u32,
}

impl ItemFilter {
    /// Build with explicit backends (tests inject mocks here).
    pub fn new(
        text: Arc<dyn TextModeration>,
        image: Arc<dyn ImageSafety>,
        max_concurrent_items: usize,
        min_playlist_tracks: u32,
    ) -> Self {
        Self {
            text,
            image,
            semaphore: Arc::new(Semaphore::new(max_concurrent_items.max(1))),
            min_playlist_tracks,
        }
    }

    /// Build the full remote-backed pipeline sharing one HTTP client.
    pub fn from_config(client: reqwest::Client, config: &SafetyConfig) -> Self {
        Self::new(
            Arc::new(TextModerationClient::new(client.clone(), config)),
            Arc::new(ImageSafetyClient::new(client, config)),
            config.max_concurrent_items,
            config.min_playlist_tracks,
        )
    }

    /// Filter one batch of raw records of the given kind.
    ///
    /// Records without a display name are dropped before filtering. Items
    /// complete in whatever order the runtime delivers; callers re-sort if
    /// they need a stable order.
    pub async fn filter_batch(&self, records: &[Value], kind: RecordKind) -> Vec<FilteredItem> {
        let start = tokio::time::Instant::now();
        let candidates: Vec<CandidateRecord> = records
            .iter()
            .filter_map(|raw| CandidateRecord::from_value(kind, raw))
            .collect();

        debug!(
            kind = %kind,
            batch_size = records.len(),
            candidates = candidates.len(),
            "filtering batch"
        );

        let mut tasks = JoinSet::new();
        for candidate in candidates {
            let semaphore = self.semaphore.clone();
            let text = self.text.clone();
            let image = self.image.clone();
            let min_tracks = self.min_playlist_tracks;
            tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok();
                process_item(text, image, min_tracks, candidate).await
            });
        }

        let mut items = Vec::new();
        while let Some(result) = tasks.join_next().await {
            match result {
                Ok(Some(item)) => items.push(item),
                Ok(None) => {}
                Err(e) => error!(error = ?e, "item filter task panicked"),
            }
        }

        info!(
            kind = %kind,
            batch_size = records.len(),
            retained = items.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "batch filtered"
        );
        items
    }

    /// Like [`filter_batch`](Self::filter_batch) for callers holding the
    /// kind as a string. An unsupported kind yields an empty batch, not an
    /// error.
    pub async fn filter_batch_str(&self, records: &[Value], kind: &str) -> Vec<FilteredItem> {
        match kind.parse::<RecordKind>() {
            Ok(kind) => self.filter_batch(records, kind).await,
            Err(err) => {
                warn!(kind, error = %err, "skipping batch of unsupported kind");
                Vec::new()
            }
        }
    }
}

/// Run every check for one candidate. Text gates the item; the image only
/// ever substitutes.
async fn process_item(
    text: Arc<dyn TextModeration>,
    image: Arc<dyn ImageSafety>,
    min_playlist_tracks: u32,
    candidate: CandidateRecord,
) -> Option<FilteredItem> {
    if candidate.kind == RecordKind::Playlist {
        if let Some(count) = candidate.track_count {
            if count < min_playlist_tracks {
                debug!(item_name = %candidate.name, track_count = count, "low-track playlist dropped");
                return None;
            }
        }
    }

    let description = candidate.description.clone();
    let (name_safe, description_safe, display_image) = tokio::join!(
        is_safe_text(text.as_ref(), &candidate.name),
        async {
            match description {
                Some(ref d) => is_safe_text(text.as_ref(), d).await,
                None => true,
            }
        },
        image.resolve(candidate.image_url.as_deref()),
    );

    if !(name_safe && description_safe) {
        warn!(kind = %candidate.kind, item_name = %candidate.name, "item hidden by text moderation");
        return None;
    }

    Some(candidate.into_item(display_image))
}
