//! Centralized default constants for the muse content-safety pipeline.
//!
//! **This module is the single source of truth** for all shared default
//! values. The safety crate and any embedding application should reference
//! these constants instead of defining their own magic numbers.
//!
//! Organized by domain area. When adding new constants, place them in the
//! appropriate section and document the rationale for the chosen value.

// =============================================================================
// CACHING
// =============================================================================

/// Verdict cache time-to-live in seconds (30 minutes).
///
/// A verdict older than this is considered stale and re-checked.
pub const CACHE_TTL_SECS: u64 = 1800;

/// Maximum number of resolved image URLs kept in the image cache.
pub const IMAGE_CACHE_CAPACITY: usize = 1000;

/// Maximum number of text verdicts kept in the text cache.
///
/// Text inputs are smaller and more repetitive than image URLs, so the
/// text cache holds more entries.
pub const TEXT_CACHE_CAPACITY: usize = 5000;

// =============================================================================
// REMOTE CALLS
// =============================================================================

/// Per-call timeout for remote moderation/classification requests.
pub const REMOTE_TIMEOUT_SECS: u64 = 5;

/// Number of attempts for a retryable remote call.
pub const RETRY_ATTEMPTS: u32 = 3;

/// Initial delay between retry attempts, in milliseconds.
///
/// Each subsequent delay is multiplied by a random factor in [1.5, 2.5].
pub const RETRY_INITIAL_DELAY_MS: u64 = 1000;

/// Upper bound on a single backoff delay, in milliseconds.
pub const RETRY_MAX_DELAY_MS: u64 = 10_000;

/// Default moderation endpoint (OpenAI omni moderation).
pub const MODERATION_API_URL: &str = "https://api.openai.com/v1/moderations";

/// Default moderation model.
pub const MODERATION_MODEL: &str = "omni-moderation-latest";

// =============================================================================
// MODERATION THRESHOLDS
// =============================================================================
//
// Floats in [0, 1]; lower = stricter. Sexual content, content involving
// minors, and harassment/threats sit near zero — false negatives there are
// unacceptable. Violence is more permissive: album art and playlist covers
// legitimately depict stylized violence.

/// Threshold for the `sexual` category.
pub const THRESHOLD_SEXUAL: f64 = 0.001;

/// Threshold for the `sexual/minors` category (strictest).
pub const THRESHOLD_SEXUAL_MINORS: f64 = 0.0001;

/// Threshold for the `harassment/threatening` category.
pub const THRESHOLD_HARASSMENT_THREATENING: f64 = 0.001;

/// Threshold for the `violence` category.
pub const THRESHOLD_VIOLENCE: f64 = 0.1;

// =============================================================================
// FILTERING
// =============================================================================

/// Placeholder substituted for any blocked or missing image.
pub const PLACEHOLDER_IMAGE: &str = "/static/images/censored-image.png";

/// Maximum items of one batch checked concurrently.
///
/// Bounds fan-out against upstream rate limits; remote calls within one
/// item still run concurrently with each other.
pub const MAX_CONCURRENT_ITEMS: usize = 8;

/// Playlists with fewer tracks than this are dropped as low-quality.
pub const MIN_PLAYLIST_TRACKS: u32 = 5;

// =============================================================================
// ENVIRONMENT VARIABLES
// =============================================================================

/// Moderation API key.
pub const ENV_MODERATION_API_KEY: &str = "MUSE_MODERATION_API_KEY";

/// Moderation endpoint override.
pub const ENV_MODERATION_URL: &str = "MUSE_MODERATION_URL";

/// Image safe-search classifier endpoint.
pub const ENV_VISION_URL: &str = "MUSE_VISION_URL";

/// Image safe-search classifier API key.
pub const ENV_VISION_API_KEY: &str = "MUSE_VISION_API_KEY";

/// Malicious-URL-check endpoint.
pub const ENV_SAFEBROWSING_URL: &str = "MUSE_SAFEBROWSING_URL";

/// Malicious-URL-check API key.
pub const ENV_SAFEBROWSING_API_KEY: &str = "MUSE_SAFEBROWSING_API_KEY";

/// Cache TTL override, in seconds.
pub const ENV_CACHE_TTL_SECS: &str = "MUSE_CACHE_TTL_SECS";

/// Retry attempt count override.
pub const ENV_RETRY_ATTEMPTS: &str = "MUSE_RETRY_ATTEMPTS";

/// Remote call timeout override, in seconds.
pub const ENV_REMOTE_TIMEOUT_SECS: &str = "MUSE_REMOTE_TIMEOUT_SECS";

/// Per-category threshold overrides.
pub const ENV_THRESHOLD_SEXUAL: &str = "MUSE_THRESHOLD_SEXUAL";
pub const ENV_THRESHOLD_SEXUAL_MINORS: &str = "MUSE_THRESHOLD_SEXUAL_MINORS";
pub const ENV_THRESHOLD_HARASSMENT: &str = "MUSE_THRESHOLD_HARASSMENT";
pub const ENV_THRESHOLD_VIOLENCE: &str = "MUSE_THRESHOLD_VIOLENCE";
