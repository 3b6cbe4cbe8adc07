//! Malicious-URL check against a threat-matches endpoint.
//!
//! Complements the content classifiers: where those judge what an image
//! shows, this judges whether the URL itself is known-hostile. Exposed to
//! the caller layer for outbound links; assumes safe when unconfigured or
//! on transport failure.

use muse_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::warn;

use crate::config::SafetyConfig;
use crate::retry::{retry, RetryPolicy};

#[derive(Serialize)]
struct ThreatMatchesRequest {
    client: ClientInfo,
    #[serde(rename = "threatInfo")]
    threat_info: ThreatInfo,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ClientInfo {
    client_id: &'static str,
    client_version: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ThreatInfo {
    threat_types: Vec<&'static str>,
    platform_types: Vec<&'static str>,
    threat_entry_types: Vec<&'static str>,
    threat_entries: Vec<ThreatEntry>,
}

#[derive(Serialize)]
struct ThreatEntry {
    url: String,
}

#[derive(Deserialize)]
struct ThreatMatchesResponse {
    #[serde(default)]
    matches: Vec<serde_json::Value>,
}

/// Client for the threat-matches (safe browsing) endpoint.
pub struct SafeBrowsingClient {
    client: reqwest::Client,
    url: Option<String>,
    api_key: Option<String>,
    retry_policy: RetryPolicy,
    timeout: Duration,
}

impl SafeBrowsingClient {
    pub fn new(client: reqwest::Client, config: &SafetyConfig) -> Self {
        Self {
            client,
            url: config.safebrowsing_url.clone(),
            api_key: config.safebrowsing_api_key.clone(),
            retry_policy: RetryPolicy::new(config.retry_attempts, config.retry_initial_delay),
            timeout: config.remote_timeout,
        }
    }

    /// Whether a URL is free of known threat matches.
    ///
    /// Unconfigured endpoint/key, empty URL, or transport failure all
    /// resolve to safe — this check gates outbound links, not content, and
    /// must not take recommendations down with it.
    pub async fn is_safe_url(&self, url: &str) -> bool {
        let (endpoint, api_key) = match (&self.url, &self.api_key) {
            (Some(endpoint), Some(api_key)) if !url.is_empty() => (endpoint, api_key),
            _ => return true,
        };

        match retry(&self.retry_policy, "safebrowsing", || {
            self.lookup(endpoint, api_key, url)
        })
        .await
        {
            Ok(matched) => !matched,
            Err(err) => {
                warn!(
                    component = "safebrowsing",
                    fallback = "fail_open",
                    error = %err,
                    "threat lookup failed, assuming safe"
                );
                true
            }
        }
    }

    /// One threat-matches call. Returns whether any match was reported.
    async fn lookup(&self, endpoint: &str, api_key: &str, url: &str) -> Result<bool> {
        let request = ThreatMatchesRequest {
            client: ClientInfo {
                client_id: "muse-safety",
                client_version: env!("CARGO_PKG_VERSION"),
            },
            threat_info: ThreatInfo {
                threat_types: vec!["MALWARE", "SOCIAL_ENGINEERING", "UNWANTED_SOFTWARE"],
                platform_types: vec!["ANY_PLATFORM"],
                threat_entry_types: vec!["URL"],
                threat_entries: vec![ThreatEntry {
                    url: url.to_string(),
                }],
            },
        };

        let response = self
            .client
            .post(endpoint)
            .query(&[("key", api_key)])
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::UpstreamStatus {
                status,
                message: body,
            });
        }

        let result: ThreatMatchesResponse = response
            .json()
            .await
            .map_err(|e| Error::Request(format!("failed to parse response: {e}")))?;
        Ok(!result.matches.is_empty())
    }
}
