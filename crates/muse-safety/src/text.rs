//! Remote text moderation with caching.
//!
//! Final pass for text the keyword pre-filter could not decide. Remote
//! failure fails open: a transient moderation outage must not blank out
//! every recommendation, and text verdicts are cheap to retract compared
//! to images.

use async_trait::async_trait;
use muse_core::keyword::normalize;
use tracing::{debug, warn};

use crate::cache::TtlCache;
use crate::config::SafetyConfig;
use crate::moderation::ModerationEndpoint;
use crate::retry::{retry, RetryPolicy};

/// Backend for deciding whether display text is safe to show.
#[async_trait]
pub trait TextModeration: Send + Sync {
    /// Returns true when the text is safe.
    async fn check(&self, text: &str) -> bool;
}

/// Moderation-endpoint-backed text checker with a TTL verdict cache.
pub struct TextModerationClient {
    endpoint: ModerationEndpoint,
    cache: TtlCache<bool>,
    retry_policy: RetryPolicy,
}

impl TextModerationClient {
    pub fn new(client: reqwest::Client, config: &SafetyConfig) -> Self {
        Self {
            endpoint: ModerationEndpoint::new(
                client,
                config.moderation_url.clone(),
                config.moderation_api_key.clone(),
                config.moderation_model.clone(),
                config.thresholds.clone(),
                config.remote_timeout,
            ),
            cache: TtlCache::new(config.cache_ttl, config.text_cache_capacity),
            retry_policy: RetryPolicy::new(config.retry_attempts, config.retry_initial_delay),
        }
    }

    /// Override the retry schedule (tests use short delays).
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }
}

#[async_trait]
impl TextModeration for TextModerationClient {
    async fn check(&self, text: &str) -> bool {
        let key = normalize(text);
        if key.is_empty() {
            return true;
        }

        if let Some(safe) = self.cache.get(&key) {
            debug!(component = "text_moderation", cache_hit = true, safe, "cached verdict");
            return safe;
        }

        match retry(&self.retry_policy, "text_moderation", || {
            self.endpoint.flag_text(&key)
        })
        .await
        {
            Ok(flagged) => {
                let safe = !flagged;
                if !safe {
                    warn!(component = "text_moderation", "text blocked by remote moderation");
                }
                self.cache.insert(key, safe);
                safe
            }
            Err(err) => {
                // Fail open: availability over blocking valid content on
                // transient errors. Not cached, so the next request
                // re-checks.
                warn!(
                    component = "text_moderation",
                    fallback = "fail_open",
                    error = %err,
                    "moderation call failed, treating text as safe"
                );
                true
            }
        }
    }
}

/// Apply the full two-stage text policy: keyword pre-filter first, remote
/// moderation only for an undecided verdict.
pub async fn is_safe_text(backend: &dyn TextModeration, text: &str) -> bool {
    match muse_core::classify(text) {
        muse_core::Verdict::Safe => true,
        muse_core::Verdict::Unsafe => false,
        muse_core::Verdict::Undecided => backend.check(text).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockTextModeration;

    #[tokio::test]
    async fn test_safe_text_skips_backend() {
        let mock = MockTextModeration::flagging_everything();
        // allow-listed, keyword filter decides without the backend
        assert!(is_safe_text(&mock, "Chill Lofi Beats").await);
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_unsafe_text_skips_backend() {
        let mock = MockTextModeration::passing_everything();
        assert!(!is_safe_text(&mock, "nsfw gallery").await);
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_undecided_text_asks_backend() {
        let mock = MockTextModeration::flagging_everything();
        assert!(!is_safe_text(&mock, "zxqv collection vol. 3").await);
        assert_eq!(mock.call_count(), 1);

        let mock = MockTextModeration::passing_everything();
        assert!(is_safe_text(&mock, "zxqv collection vol. 3").await);
        assert_eq!(mock.call_count(), 1);
    }
}
