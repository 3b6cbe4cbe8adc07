//! Structured logging schema and field name constants for muse.
//!
//! All crates use these constants for consistent structured logging fields,
//! so log aggregation tools can query by standardized field names across
//! every subsystem.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | Recoverable issue, automatic fallback applied |
//! | INFO  | Lifecycle events, verdict summaries |
//! | DEBUG | Decision points, cache hits, config choices |
//! | TRACE | Per-item iteration, high-volume data |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Component within the pipeline.
/// Values: "keyword", "text_moderation", "image_safety", "safebrowsing",
/// "filter", "cache", "retry"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "classify", "check", "resolve", "filter_batch"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Record kind being filtered ("playlist", "album", "track", "artist",
/// "artwork").
pub const KIND: &str = "kind";

/// Display name of the record under moderation.
pub const ITEM_NAME: &str = "item_name";

/// Image URL under classification.
pub const IMAGE_URL: &str = "image_url";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of records entering a batch.
pub const BATCH_SIZE: &str = "batch_size";

/// Number of records surviving a batch.
pub const RETAINED: &str = "retained";

/// Retry attempt number.
pub const ATTEMPT: &str = "attempt";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Moderation verdict ("safe", "unsafe", "undecided").
pub const VERDICT: &str = "verdict";

/// Whether a cached verdict was used.
pub const CACHE_HIT: &str = "cache_hit";

/// Which fallback policy was applied ("fail_open", "fail_closed").
pub const FALLBACK: &str = "fallback";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";
