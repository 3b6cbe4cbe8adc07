//! Image safety resolution.
//!
//! Every image URL resolves to a concrete displayable URL: the original
//! when both classifiers pass, the placeholder otherwise. Two independent
//! classifiers run concurrently — a safe-search classifier scoring
//! likelihood per category, and the moderation-model image check — and
//! either one flagging (or failing) blocks the image. Images fail closed:
//! a blocked thumbnail is a substitution, not a lost item, and an unsafe
//! image shown once is hard to retract.

use async_trait::async_trait;
use muse_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use crate::cache::TtlCache;
use crate::config::SafetyConfig;
use crate::moderation::ModerationEndpoint;
use crate::retry::{retry, RetryPolicy};

/// Backend resolving an optional image URL to a displayable URL.
#[async_trait]
pub trait ImageSafety: Send + Sync {
    /// Returns the original URL when safe, the placeholder otherwise.
    /// Never leaves an image undecided.
    async fn resolve(&self, image_url: Option<&str>) -> String;
}

/// Likelihood levels reported by the safe-search classifier, ordered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum Likelihood {
    #[default]
    Unknown,
    VeryUnlikely,
    Unlikely,
    Possible,
    Likely,
    VeryLikely,
}

impl<'de> Deserialize<'de> for Likelihood {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let level = String::deserialize(deserializer)?;
        // Unrecognized levels map to Unknown rather than failing the
        // whole annotation.
        Ok(match level.as_str() {
            "VERY_UNLIKELY" => Likelihood::VeryUnlikely,
            "UNLIKELY" => Likelihood::Unlikely,
            "POSSIBLE" => Likelihood::Possible,
            "LIKELY" => Likelihood::Likely,
            "VERY_LIKELY" => Likelihood::VeryLikely,
            _ => Likelihood::Unknown,
        })
    }
}

#[derive(Serialize)]
struct AnnotateRequest {
    requests: Vec<AnnotateEntry>,
}

#[derive(Serialize)]
struct AnnotateEntry {
    image: AnnotateImage,
    features: Vec<AnnotateFeature>,
}

#[derive(Serialize)]
struct AnnotateImage {
    source: AnnotateSource,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AnnotateSource {
    image_uri: String,
}

#[derive(Serialize)]
struct AnnotateFeature {
    #[serde(rename = "type")]
    feature_type: &'static str,
}

#[derive(Deserialize)]
struct AnnotateResponse {
    #[serde(default)]
    responses: Vec<AnnotateResult>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnnotateResult {
    safe_search_annotation: Option<SafeSearchAnnotation>,
}

/// Per-category likelihoods for one image.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SafeSearchAnnotation {
    pub adult: Likelihood,
    pub violence: Likelihood,
    pub racy: Likelihood,
}

impl SafeSearchAnnotation {
    /// Risky when any watched category is Possible or higher.
    pub fn is_risky(&self) -> bool {
        [self.adult, self.violence, self.racy]
            .into_iter()
            .any(|level| level >= Likelihood::Possible)
    }
}

/// Two-classifier image checker with a TTL cache of resolved URLs.
pub struct ImageSafetyClient {
    client: reqwest::Client,
    vision_url: Option<String>,
    vision_api_key: Option<String>,
    moderation: ModerationEndpoint,
    cache: TtlCache<String>,
    retry_policy: RetryPolicy,
    timeout: Duration,
    placeholder: String,
}

impl ImageSafetyClient {
    pub fn new(client: reqwest::Client, config: &SafetyConfig) -> Self {
        Self {
            moderation: ModerationEndpoint::new(
                client.clone(),
                config.moderation_url.clone(),
                config.moderation_api_key.clone(),
                config.moderation_model.clone(),
                config.thresholds.clone(),
                config.remote_timeout,
            ),
            client,
            vision_url: config.vision_url.clone(),
            vision_api_key: config.vision_api_key.clone(),
            cache: TtlCache::new(config.cache_ttl, config.image_cache_capacity),
            retry_policy: RetryPolicy::new(config.retry_attempts, config.retry_initial_delay),
            timeout: config.remote_timeout,
            placeholder: config.placeholder_image.clone(),
        }
    }

    /// Override the retry schedule (tests use short delays).
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// One safe-search call. Returns whether the classifier flags the image.
    async fn safe_search_flags(&self, image_url: &str) -> Result<bool> {
        let vision_url = self
            .vision_url
            .as_deref()
            .ok_or_else(|| Error::Config("safe-search endpoint not configured".to_string()))?;

        let request = AnnotateRequest {
            requests: vec![AnnotateEntry {
                image: AnnotateImage {
                    source: AnnotateSource {
                        image_uri: image_url.to_string(),
                    },
                },
                features: vec![AnnotateFeature {
                    feature_type: "SAFE_SEARCH_DETECTION",
                }],
            }],
        };

        let mut req = self.client.post(vision_url).timeout(self.timeout);
        if let Some(ref key) = self.vision_api_key {
            req = req.query(&[("key", key)]);
        }

        let response = req.json(&request).send().await?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::UpstreamStatus {
                status,
                message: body,
            });
        }

        let result: AnnotateResponse = response
            .json()
            .await
            .map_err(|e| Error::ImageSafety(format!("failed to parse response: {e}")))?;

        let annotation = result
            .responses
            .into_iter()
            .next()
            .and_then(|r| r.safe_search_annotation)
            .ok_or_else(|| Error::ImageSafety("missing safe-search annotation".to_string()))?;

        debug!(
            adult = ?annotation.adult,
            violence = ?annotation.violence,
            racy = ?annotation.racy,
            "safe-search annotation"
        );
        Ok(annotation.is_risky())
    }
}

#[async_trait]
impl ImageSafety for ImageSafetyClient {
    async fn resolve(&self, image_url: Option<&str>) -> String {
        let raw = match image_url {
            Some(u) if !u.trim().is_empty() => u,
            _ => return self.placeholder.clone(),
        };

        if Url::parse(raw).is_err() {
            warn!(component = "image_safety", image_url = raw, "unparseable image url");
            return self.placeholder.clone();
        }

        if let Some(display) = self.cache.get(raw) {
            debug!(component = "image_safety", cache_hit = true, "cached display url");
            return display;
        }

        // Both classifiers run concurrently; either flagging or failing
        // blocks the image (fail closed).
        let (search, moderation) = tokio::join!(
            retry(&self.retry_policy, "safe_search", || {
                self.safe_search_flags(raw)
            }),
            retry(&self.retry_policy, "image_moderation", || {
                self.moderation.flag_image(raw)
            }),
        );

        let blocked = match (search, moderation) {
            (Ok(false), Ok(false)) => false,
            (Ok(true), _) | (_, Ok(true)) => {
                warn!(component = "image_safety", image_url = raw, "image blocked by classifier");
                true
            }
            (Err(err), _) | (_, Err(err)) => {
                warn!(
                    component = "image_safety",
                    fallback = "fail_closed",
                    error = %err,
                    "classifier failed, blocking image"
                );
                true
            }
        };

        let display = if blocked {
            self.placeholder.clone()
        } else {
            raw.to_string()
        };
        self.cache.insert(raw, display.clone());
        display
    }
}
