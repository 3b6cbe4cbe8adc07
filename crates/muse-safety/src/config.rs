//! Configuration for the safety pipeline.
//!
//! Everything is environment-supplied with documented defaults; see
//! `muse_core::defaults` for the variable names and fallback values.
//! Missing API keys are not a construction error — each client applies its
//! own failure policy at call time when a key is absent.

use std::time::Duration;

use muse_core::defaults;

/// Per-category moderation sensitivity thresholds, floats in [0, 1].
///
/// Lower = stricter. Sexual content, content involving minors, and
/// harassment/threats stay near zero; violence is more permissive.
#[derive(Debug, Clone, PartialEq)]
pub struct ModerationThresholds {
    pub sexual: f64,
    pub sexual_minors: f64,
    pub harassment_threatening: f64,
    pub violence: f64,
}

impl Default for ModerationThresholds {
    fn default() -> Self {
        Self {
            sexual: defaults::THRESHOLD_SEXUAL,
            sexual_minors: defaults::THRESHOLD_SEXUAL_MINORS,
            harassment_threatening: defaults::THRESHOLD_HARASSMENT_THREATENING,
            violence: defaults::THRESHOLD_VIOLENCE,
        }
    }
}

/// Configuration for the safety pipeline and its remote clients.
#[derive(Debug, Clone)]
pub struct SafetyConfig {
    /// Text/image moderation endpoint.
    pub moderation_url: String,
    /// Moderation API key (optional; absent key fails per client policy).
    pub moderation_api_key: Option<String>,
    /// Moderation model name.
    pub moderation_model: String,
    /// Image safe-search classifier endpoint.
    pub vision_url: Option<String>,
    /// Image safe-search classifier API key.
    pub vision_api_key: Option<String>,
    /// Malicious-URL-check endpoint.
    pub safebrowsing_url: Option<String>,
    /// Malicious-URL-check API key.
    pub safebrowsing_api_key: Option<String>,
    /// Per-category moderation thresholds.
    pub thresholds: ModerationThresholds,
    /// Verdict cache time-to-live.
    pub cache_ttl: Duration,
    /// Image cache capacity (entries).
    pub image_cache_capacity: usize,
    /// Text cache capacity (entries).
    pub text_cache_capacity: usize,
    /// Attempts for a retryable remote call.
    pub retry_attempts: u32,
    /// Initial backoff delay between attempts.
    pub retry_initial_delay: Duration,
    /// Per-call timeout for remote requests.
    pub remote_timeout: Duration,
    /// Maximum items of one batch checked concurrently.
    pub max_concurrent_items: usize,
    /// Placeholder substituted for blocked or missing images.
    pub placeholder_image: String,
    /// Playlists with fewer tracks are dropped.
    pub min_playlist_tracks: u32,
}

impl Default for SafetyConfig {
    fn default() -> Self {
        Self {
            moderation_url: defaults::MODERATION_API_URL.to_string(),
            moderation_api_key: None,
            moderation_model: defaults::MODERATION_MODEL.to_string(),
            vision_url: None,
            vision_api_key: None,
            safebrowsing_url: None,
            safebrowsing_api_key: None,
            thresholds: ModerationThresholds::default(),
            cache_ttl: Duration::from_secs(defaults::CACHE_TTL_SECS),
            image_cache_capacity: defaults::IMAGE_CACHE_CAPACITY,
            text_cache_capacity: defaults::TEXT_CACHE_CAPACITY,
            retry_attempts: defaults::RETRY_ATTEMPTS,
            retry_initial_delay: Duration::from_millis(defaults::RETRY_INITIAL_DELAY_MS),
            remote_timeout: Duration::from_secs(defaults::REMOTE_TIMEOUT_SECS),
            max_concurrent_items: defaults::MAX_CONCURRENT_ITEMS,
            placeholder_image: defaults::PLACEHOLDER_IMAGE.to_string(),
            min_playlist_tracks: defaults::MIN_PLAYLIST_TRACKS,
        }
    }
}

impl SafetyConfig {
    /// Create from environment variables, falling back to defaults for
    /// anything unset or unparseable.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(url) = env_string(defaults::ENV_MODERATION_URL) {
            config.moderation_url = url;
        }
        config.moderation_api_key = env_string(defaults::ENV_MODERATION_API_KEY);
        config.vision_url = env_string(defaults::ENV_VISION_URL);
        config.vision_api_key = env_string(defaults::ENV_VISION_API_KEY);
        config.safebrowsing_url = env_string(defaults::ENV_SAFEBROWSING_URL);
        config.safebrowsing_api_key = env_string(defaults::ENV_SAFEBROWSING_API_KEY);

        config.thresholds.sexual =
            env_parse(defaults::ENV_THRESHOLD_SEXUAL, config.thresholds.sexual);
        config.thresholds.sexual_minors = env_parse(
            defaults::ENV_THRESHOLD_SEXUAL_MINORS,
            config.thresholds.sexual_minors,
        );
        config.thresholds.harassment_threatening = env_parse(
            defaults::ENV_THRESHOLD_HARASSMENT,
            config.thresholds.harassment_threatening,
        );
        config.thresholds.violence =
            env_parse(defaults::ENV_THRESHOLD_VIOLENCE, config.thresholds.violence);

        config.cache_ttl = Duration::from_secs(env_parse(
            defaults::ENV_CACHE_TTL_SECS,
            defaults::CACHE_TTL_SECS,
        ));
        config.retry_attempts = env_parse(defaults::ENV_RETRY_ATTEMPTS, config.retry_attempts);
        config.remote_timeout = Duration::from_secs(env_parse(
            defaults::ENV_REMOTE_TIMEOUT_SECS,
            defaults::REMOTE_TIMEOUT_SECS,
        ));

        config
    }
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

fn env_parse<T: std::str::FromStr>(key: &str, fallback: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(fallback)
}
