//! # muse-safety
//!
//! Async content-safety moderation pipeline for untrusted catalog records.
//!
//! This crate provides:
//! - Batch orchestrator applying text and image moderation concurrently
//! - Remote text moderation client (keyword escalation, fail-open)
//! - Two-classifier image safety client (parallel AND, fail-closed)
//! - Malicious-URL lookup client
//! - TTL verdict cache and bounded retry-with-backoff helper
//! - Short-lived cached bearer credential for upstream catalog APIs
//!
//! # Example
//!
//! ```rust,no_run
//! use muse_core::RecordKind;
//! use muse_safety::{ItemFilter, SafetyConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = SafetyConfig::from_env();
//!     let filter = ItemFilter::from_config(reqwest::Client::new(), &config);
//!
//!     let records: Vec<serde_json::Value> = vec![/* raw API results */];
//!     let safe = filter.filter_batch(&records, RecordKind::Playlist).await;
//!     assert!(safe.len() <= records.len());
//! }
//! ```

pub mod cache;
pub mod config;
pub mod credentials;
pub mod filter;
pub mod image;
mod moderation;
pub mod retry;
pub mod safebrowsing;
pub mod text;

// Mock safety backends for testing
#[cfg(test)]
pub mod mock;

pub use cache::TtlCache;
pub use config::{ModerationThresholds, SafetyConfig};
pub use credentials::CachedToken;
pub use filter::ItemFilter;
pub use image::{ImageSafety, ImageSafetyClient, Likelihood, SafeSearchAnnotation};
pub use retry::{retry, RetryPolicy};
pub use safebrowsing::SafeBrowsingClient;
pub use text::{is_safe_text, TextModeration, TextModerationClient};
