//! Google Translate provider for machine translation
//!
//! Two endpoints are supported:
//!
//! - **Keyless**: the public `translate_a/single?client=gtx` endpoint used by
//!   browser extensions. No account needed; rate limits apply.
//! - **API v2**: the official `language/translate/v2` endpoint, used when a
//!   `GOOGLE_TRANSLATE_API_KEY` is available.
//!
//! # Example
//!
//! ```ignore
//! use wordbridge_mt::{MachineTranslator, GoogleTranslateProvider};
//!
//! let provider = GoogleTranslateProvider::keyless()?;
//! let result = provider.translate("hello", "en", "ru").await?;
//! ```

use crate::error::{MtError, MtResult};
use crate::translator::MachineTranslator;
use async_trait::async_trait;
use reqwest::Url;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

const SERVICE: &str = "translation";

const KEYLESS_BASE_URL: &str = "https://translate.googleapis.com";
const V2_BASE_URL: &str = "https://translation.googleapis.com/language/translate/v2";

#[derive(Clone)]
enum Endpoint {
    Keyless,
    V2 { api_key: String },
}

/// Google Translate provider
#[derive(Clone)]
pub struct GoogleTranslateProvider {
    endpoint: Endpoint,
    /// HTTP client for async requests
    client: reqwest::Client,
    base_url: String,
}

impl GoogleTranslateProvider {
    /// Maximum characters per string (30KB per Google Translate API limits)
    const MAX_CHARS_PER_STRING: usize = 30_000;

    fn build_client() -> MtResult<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| MtError::ConfigError(format!("Failed to create HTTP client: {}", e)))
    }

    /// Create a provider for the official v2 API with an explicit API key
    pub fn new(api_key: String) -> MtResult<Self> {
        if api_key.trim().is_empty() {
            return Err(MtError::ConfigError("API key cannot be empty".to_string()));
        }

        Ok(Self {
            endpoint: Endpoint::V2 { api_key },
            client: Self::build_client()?,
            base_url: V2_BASE_URL.to_string(),
        })
    }

    /// Create a provider for the keyless public endpoint
    pub fn keyless() -> MtResult<Self> {
        Ok(Self {
            endpoint: Endpoint::Keyless,
            client: Self::build_client()?,
            base_url: KEYLESS_BASE_URL.to_string(),
        })
    }

    /// Point the provider at a different host (proxies, test servers)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn is_keyless(&self) -> bool {
        matches!(self.endpoint, Endpoint::Keyless)
    }

    async fn translate_keyless(&self, text: &str, source: &str, target: &str) -> MtResult<String> {
        let url = Url::parse_with_params(
            &format!("{}/translate_a/single", self.base_url),
            &[
                ("client", "gtx"),
                ("sl", source),
                ("tl", target),
                ("dt", "t"),
                ("q", text),
            ],
        )
        .map_err(|e| MtError::ConfigError(format!("Invalid translation URL: {}", e)))?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| MtError::network(SERVICE, e))?;
        let response = MtError::check_status(SERVICE, response).await?;

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| MtError::malformed(SERVICE, format!("Failed to parse response: {}", e)))?;

        parse_keyless_response(&json)
    }

    async fn translate_v2(
        &self,
        api_key: &str,
        text: &str,
        source: &str,
        target: &str,
    ) -> MtResult<String> {
        let url = Url::parse_with_params(&self.base_url, &[("key", api_key)])
            .map_err(|e| MtError::ConfigError(format!("Invalid translation URL: {}", e)))?;

        let body = json!({
            "q": [text],
            "source": source,
            "target": target,
            "format": "text"
        });

        let response = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| MtError::network(SERVICE, e))?;
        let response = MtError::check_status(SERVICE, response).await?;

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| MtError::malformed(SERVICE, format!("Failed to parse response: {}", e)))?;

        parse_v2_response(&json)
    }
}

/// Concatenate the translated segments found at `[0][*][0]`
fn parse_keyless_response(json: &serde_json::Value) -> MtResult<String> {
    let segments = json
        .get(0)
        .and_then(|v| v.as_array())
        .ok_or_else(|| MtError::malformed(SERVICE, "missing segment array at index 0"))?;

    let translation: String = segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(|v| v.as_str()))
        .collect();

    if translation.is_empty() {
        return Err(MtError::malformed(SERVICE, "empty translation"));
    }
    Ok(translation)
}

fn parse_v2_response(json: &serde_json::Value) -> MtResult<String> {
    let translations = json["data"]["translations"]
        .as_array()
        .ok_or_else(|| MtError::malformed(SERVICE, "missing 'data.translations' array"))?;

    translations
        .first()
        .and_then(|t| t["translatedText"].as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| MtError::malformed(SERVICE, "missing 'translatedText' field"))
}

impl std::fmt::Debug for GoogleTranslateProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mode = match self.endpoint {
            Endpoint::Keyless => "keyless",
            Endpoint::V2 { .. } => "v2 (api_key: ***)",
        };
        f.debug_struct("GoogleTranslateProvider")
            .field("endpoint", &mode)
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[async_trait]
impl MachineTranslator for GoogleTranslateProvider {
    async fn translate(
        &self,
        text: &str,
        source_locale: &str,
        target_locale: &str,
    ) -> MtResult<String> {
        if text.is_empty() {
            return Ok(String::new());
        }

        if text.len() > Self::MAX_CHARS_PER_STRING {
            return Err(MtError::InvalidInput(format!(
                "Text exceeds maximum length of {} characters",
                Self::MAX_CHARS_PER_STRING
            )));
        }

        debug!("Translating '{}' {} → {}", text, source_locale, target_locale);

        match &self.endpoint {
            Endpoint::Keyless => self.translate_keyless(text, source_locale, target_locale).await,
            Endpoint::V2 { api_key } => {
                self.translate_v2(api_key, text, source_locale, target_locale).await
            }
        }
    }

    fn provider_name(&self) -> &str {
        "Google Translate"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    // ========== Initialization Tests ==========

    #[test]
    fn test_new_with_valid_key() {
        let provider = GoogleTranslateProvider::new("test-api-key".to_string()).unwrap();
        assert!(!provider.is_keyless());
        assert_eq!(provider.provider_name(), "Google Translate");
    }

    #[test]
    fn test_new_with_empty_key() {
        match GoogleTranslateProvider::new("   ".to_string()) {
            Err(MtError::ConfigError(msg)) => assert!(msg.contains("empty")),
            other => panic!("Expected ConfigError, got {:?}", other),
        }
    }

    #[test]
    fn test_keyless() {
        assert!(GoogleTranslateProvider::keyless().unwrap().is_keyless());
    }

    #[test]
    fn test_debug_masks_key() {
        let provider = GoogleTranslateProvider::new("secret-key".to_string()).unwrap();
        let debug_str = format!("{:?}", provider);
        assert!(debug_str.contains("***"));
        assert!(!debug_str.contains("secret-key"));
    }

    // ========== Response Parsing Tests ==========

    #[test]
    fn test_parse_keyless_concatenates_segments() {
        let json = serde_json::json!([
            [["Guten ", "Good ", null], ["Morgen", "morning", null]],
            null,
            "en"
        ]);
        assert_eq!(parse_keyless_response(&json).unwrap(), "Guten Morgen");
    }

    #[test]
    fn test_parse_keyless_rejects_missing_segments() {
        let json = serde_json::json!({"unexpected": true});
        assert!(matches!(
            parse_keyless_response(&json),
            Err(MtError::MalformedResponse { .. })
        ));
    }

    #[test]
    fn test_parse_v2_response() {
        let json =
            serde_json::json!({"data": {"translations": [{"translatedText": "привет"}]}});
        assert_eq!(parse_v2_response(&json).unwrap(), "привет");

        let json = serde_json::json!({"data": {"translations": []}});
        assert!(parse_v2_response(&json).is_err());
    }

    // ========== HTTP Tests ==========

    #[tokio::test]
    async fn test_keyless_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/translate_a/single"))
            .and(query_param("client", "gtx"))
            .and(query_param("sl", "en"))
            .and(query_param("tl", "de"))
            .and(query_param("q", "hello"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!([
                    [["hallo", "hello", null, null, 1]],
                    null,
                    "en"
                ])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let provider = GoogleTranslateProvider::keyless()
            .unwrap()
            .with_base_url(server.uri());
        let result = provider.translate("hello", "en", "de").await.unwrap();
        assert_eq!(result, "hallo");
    }

    #[tokio::test]
    async fn test_regional_codes_are_sent_unchanged() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/translate_a/single"))
            .and(query_param("tl", "zh-TW"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!([[["你好", "hello", null]], null, "en"])),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/translate_a/single"))
            .and(query_param("tl", "zh"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!([
                    [["你好 (zh)", "hello", null]],
                    null,
                    "en"
                ])),
            )
            .mount(&server)
            .await;

        let provider = GoogleTranslateProvider::keyless()
            .unwrap()
            .with_base_url(server.uri());
        assert_eq!(provider.translate("hello", "en", "zh-TW").await.unwrap(), "你好");
    }

    #[tokio::test]
    async fn test_v2_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(query_param("key", "test-key"))
            .and(body_partial_json(serde_json::json!({"source": "en", "target": "ru"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                serde_json::json!({"data": {"translations": [{"translatedText": "привет"}]}}),
            ))
            .mount(&server)
            .await;

        let provider = GoogleTranslateProvider::new("test-key".to_string())
            .unwrap()
            .with_base_url(server.uri());
        assert_eq!(provider.translate("hello", "en", "ru").await.unwrap(), "привет");
    }

    #[tokio::test]
    async fn test_server_error_is_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let provider = GoogleTranslateProvider::keyless()
            .unwrap()
            .with_base_url(server.uri());
        match provider.translate("hello", "en", "de").await {
            Err(MtError::ApiError { status, body, .. }) => {
                assert_eq!(status, 503);
                assert_eq!(body, "overloaded");
            }
            other => panic!("Expected ApiError, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_translate_empty_text() {
        let provider = GoogleTranslateProvider::keyless().unwrap();
        assert_eq!(provider.translate("", "en", "de").await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_translate_text_too_long() {
        let provider = GoogleTranslateProvider::keyless().unwrap();
        let long_text = "x".repeat(GoogleTranslateProvider::MAX_CHARS_PER_STRING + 1);
        match provider.translate(&long_text, "en", "de").await {
            Err(MtError::InvalidInput(msg)) => assert!(msg.contains("exceeds maximum")),
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[tokio::test]
    #[ignore] // Run with: cargo test --ignored
    async fn test_real_keyless_translation() {
        let provider = GoogleTranslateProvider::keyless().unwrap();
        let result = provider.translate("hello", "en", "de").await.unwrap();
        println!("Translation: hello → {}", result);
        assert!(!result.is_empty());
    }
}
