//! Wire types and transport for the remote omni-moderation endpoint.
//!
//! Both the text client and the image-safety client call the same
//! endpoint, with text or image-URL input respectively. This module owns
//! the request/response bodies and the single-call transport; retry and
//! failure policy belong to the callers.

use std::time::Duration;

use muse_core::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ModerationThresholds;

#[derive(Serialize)]
struct ModerationRequest {
    model: String,
    input: Vec<ModerationInput>,
    thresholds: ThresholdsBody,
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ModerationInput {
    Text { text: String },
    ImageUrl { image_url: ImageUrlBody },
}

#[derive(Serialize)]
struct ImageUrlBody {
    url: String,
}

/// Per-category sensitivity thresholds as the endpoint names them.
#[derive(Serialize)]
struct ThresholdsBody {
    sexual: f64,
    #[serde(rename = "sexual/minors")]
    sexual_minors: f64,
    #[serde(rename = "harassment/threatening")]
    harassment_threatening: f64,
    violence: f64,
}

impl From<&ModerationThresholds> for ThresholdsBody {
    fn from(t: &ModerationThresholds) -> Self {
        Self {
            sexual: t.sexual,
            sexual_minors: t.sexual_minors,
            harassment_threatening: t.harassment_threatening,
            violence: t.violence,
        }
    }
}

#[derive(Deserialize)]
struct ModerationResponse {
    #[serde(default)]
    results: Vec<ModerationResult>,
}

#[derive(Deserialize)]
struct ModerationResult {
    #[serde(default)]
    flagged: bool,
}

/// One configured moderation endpoint.
#[derive(Clone)]
pub(crate) struct ModerationEndpoint {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
    model: String,
    thresholds: ModerationThresholds,
    timeout: Duration,
}

impl ModerationEndpoint {
    pub(crate) fn new(
        client: reqwest::Client,
        url: String,
        api_key: Option<String>,
        model: String,
        thresholds: ModerationThresholds,
        timeout: Duration,
    ) -> Self {
        Self {
            client,
            url,
            api_key,
            model,
            thresholds,
            timeout,
        }
    }

    /// One moderation call over text input. Returns whether it was flagged.
    pub(crate) async fn flag_text(&self, text: &str) -> Result<bool> {
        self.flag(ModerationInput::Text {
            text: text.to_string(),
        })
        .await
    }

    /// One moderation call over an image URL. Returns whether it was flagged.
    pub(crate) async fn flag_image(&self, image_url: &str) -> Result<bool> {
        self.flag(ModerationInput::ImageUrl {
            image_url: ImageUrlBody {
                url: image_url.to_string(),
            },
        })
        .await
    }

    async fn flag(&self, input: ModerationInput) -> Result<bool> {
        let request = ModerationRequest {
            model: self.model.clone(),
            input: vec![input],
            thresholds: (&self.thresholds).into(),
        };

        let mut req = self
            .client
            .post(&self.url)
            .timeout(self.timeout)
            .header("Content-Type", "application/json");
        if let Some(ref api_key) = self.api_key {
            req = req.header("Authorization", format!("Bearer {}", api_key));
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

        let result: ModerationResponse = response
            .json()
            .await
            .map_err(|e| Error::Moderation(format!("failed to parse response: {e}")))?;

        let flagged = result.results.iter().any(|r| r.flagged);
        debug!(model = %self.model, flagged, "moderation call complete");
        Ok(flagged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_request_serialization() {
        let request = ModerationRequest {
            model: "omni-moderation-latest".to_string(),
            input: vec![ModerationInput::Text {
                text: "hello".to_string(),
            }],
            thresholds: (&ModerationThresholds::default()).into(),
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "omni-moderation-latest");
        assert_eq!(json["input"][0]["type"], "text");
        assert_eq!(json["input"][0]["text"], "hello");
        assert_eq!(json["thresholds"]["sexual/minors"], 0.0001);
        assert_eq!(json["thresholds"]["harassment/threatening"], 0.001);
    }

    #[test]
    fn test_image_request_serialization() {
        let request = ModerationRequest {
            model: "omni-moderation-latest".to_string(),
            input: vec![ModerationInput::ImageUrl {
                image_url: ImageUrlBody {
                    url: "https://img.example/a.jpg".to_string(),
                },
            }],
            thresholds: (&ModerationThresholds::default()).into(),
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["input"][0]["type"], "image_url");
        assert_eq!(json["input"][0]["image_url"]["url"], "https://img.example/a.jpg");
    }

    #[test]
    fn test_response_deserialization_flagged() {
        let json = r#"{"results": [{"flagged": true, "categories": {"sexual": true}}]}"#;
        let response: ModerationResponse = serde_json::from_str(json).unwrap();
        assert!(response.results.iter().any(|r| r.flagged));
    }

    #[test]
    fn test_response_deserialization_defaults() {
        // Missing fields are tolerated and read as unflagged
        let response: ModerationResponse = serde_json::from_str("{}").unwrap();
        assert!(response.results.is_empty());

        let response: ModerationResponse =
            serde_json::from_str(r#"{"results": [{}]}"#).unwrap();
        assert!(!response.results[0].flagged);
    }
}
