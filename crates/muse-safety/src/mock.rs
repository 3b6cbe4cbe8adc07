//! Mock safety backends for deterministic testing.
//!
//! In-memory implementations of the text and image backends with call
//! logs, so orchestrator tests can assert both verdicts and how many
//! remote checks would have been issued.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::image::ImageSafety;
use crate::text::TextModeration;

/// Mock text backend with a per-input verdict map and a call log.
pub struct MockTextModeration {
    default_safe: bool,
    verdicts: HashMap<String, bool>,
    calls: Mutex<Vec<String>>,
}

impl MockTextModeration {
    /// Every check passes unless overridden.
    pub fn passing_everything() -> Self {
        Self {
            default_safe: true,
            verdicts: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every check is flagged unless overridden.
    pub fn flagging_everything() -> Self {
        Self {
            default_safe: false,
            ..Self::passing_everything()
        }
    }

    /// Fix the verdict for one exact input.
    pub fn with_verdict(mut self, text: impl Into<String>, safe: bool) -> Self {
        self.verdicts.insert(text.into(), safe);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextModeration for MockTextModeration {
    async fn check(&self, text: &str) -> bool {
        self.calls.lock().unwrap().push(text.to_string());
        self.verdicts.get(text).copied().unwrap_or(self.default_safe)
    }
}

/// Mock image backend with a blocked-URL set and a call log.
pub struct MockImageSafety {
    placeholder: String,
    blocked: Vec<String>,
    calls: Mutex<Vec<Option<String>>>,
}

impl MockImageSafety {
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            placeholder: placeholder.into(),
            blocked: Vec::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Mark one URL as unsafe.
    pub fn blocking(mut self, url: impl Into<String>) -> Self {
        self.blocked.push(url.into());
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls(&self) -> Vec<Option<String>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageSafety for MockImageSafety {
    async fn resolve(&self, image_url: Option<&str>) -> String {
        self.calls
            .lock()
            .unwrap()
            .push(image_url.map(String::from));
        match image_url {
            Some(url) if !self.blocked.iter().any(|b| b == url) => url.to_string(),
            _ => self.placeholder.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_text_mock_default_and_override() {
        let mock = MockTextModeration::passing_everything().with_verdict("bad", false);
        assert!(mock.check("fine").await);
        assert!(!mock.check("bad").await);
        assert_eq!(mock.calls(), vec!["fine".to_string(), "bad".to_string()]);
    }

    #[tokio::test]
    async fn test_image_mock_blocks_listed_url() {
        let mock = MockImageSafety::new("/placeholder.png").blocking("https://img.example/bad.jpg");
        assert_eq!(
            mock.resolve(Some("https://img.example/good.jpg")).await,
            "https://img.example/good.jpg"
        );
        assert_eq!(
            mock.resolve(Some("https://img.example/bad.jpg")).await,
            "/placeholder.png"
        );
        assert_eq!(mock.resolve(None).await, "/placeholder.png");
        assert_eq!(mock.call_count(), 3);
    }
}
