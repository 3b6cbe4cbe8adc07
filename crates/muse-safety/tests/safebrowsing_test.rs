//! Integration tests for the malicious-URL lookup client.

use std::time::Duration;

use muse_safety::{SafeBrowsingClient, SafetyConfig};
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config(server: &MockServer) -> SafetyConfig {
    SafetyConfig {
        safebrowsing_url: Some(format!("{}/v4/threatMatches:find", server.uri())),
        safebrowsing_api_key: Some("sb-key".to_string()),
        retry_attempts: 2,
        retry_initial_delay: Duration::from_millis(1),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_clean_url_is_safe() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v4/threatMatches:find"))
        .and(query_param("key", "sb-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let client = SafeBrowsingClient::new(reqwest::Client::new(), &test_config(&server));
    assert!(client.is_safe_url("https://img.example/cover.jpg").await);
}

#[tokio::test]
async fn test_matched_url_is_unsafe() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v4/threatMatches:find"))
        .and(body_string_contains("evil.example"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "matches": [{"threatType": "MALWARE", "threat": {"url": "https://evil.example"}}]
        })))
        .mount(&server)
        .await;

    let client = SafeBrowsingClient::new(reqwest::Client::new(), &test_config(&server));
    assert!(!client.is_safe_url("https://evil.example").await);
}

#[tokio::test]
async fn test_lookup_failure_assumes_safe() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v4/threatMatches:find"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = SafeBrowsingClient::new(reqwest::Client::new(), &test_config(&server));
    assert!(client.is_safe_url("https://anything.example").await);
}
