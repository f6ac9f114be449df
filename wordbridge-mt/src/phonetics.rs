//! IPA transcription providers
//!
//! [`UnalenguaProvider`] talks to the unalengua `ipav3` endpoint, which accepts
//! a text and a language and answers with its IPA rendering.

use crate::error::{MtError, MtResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const SERVICE: &str = "phonetics";

const UNALENGUA_BASE_URL: &str = "https://api2.unalengua.com";

/// Turns text into its phonetic transcription
#[async_trait]
pub trait PhoneticTranscriber: Send + Sync {
    /// Transcribe `text`, read as language `lang`, into IPA
    ///
    /// Fails if the service has no transcription to offer.
    async fn transcribe(&self, text: &str, lang: &str) -> MtResult<String>;

    fn provider_name(&self) -> &str;
}

#[derive(Serialize)]
struct IpaRequest<'a> {
    text: &'a str,
    lang: &'a str,
    mode: bool,
}

#[derive(Deserialize)]
struct IpaResponse {
    ipa: Option<String>,
}

/// Client for the unalengua IPA service
#[derive(Debug, Clone)]
pub struct UnalenguaProvider {
    client: reqwest::Client,
    base_url: String,
}

impl UnalenguaProvider {
    pub fn new() -> MtResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| MtError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: UNALENGUA_BASE_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl PhoneticTranscriber for UnalenguaProvider {
    async fn transcribe(&self, text: &str, lang: &str) -> MtResult<String> {
        debug!("Fetching IPA for '{}' ({})", text, lang);

        let response = self
            .client
            .post(format!("{}/ipav3", self.base_url))
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&IpaRequest {
                text,
                lang,
                mode: true,
            })
            .send()
            .await
            .map_err(|e| MtError::network(SERVICE, e))?;
        let response = MtError::check_status(SERVICE, response).await?;

        let body: IpaResponse = response
            .json()
            .await
            .map_err(|e| MtError::malformed(SERVICE, format!("Failed to parse response: {}", e)))?;

        match body.ipa {
            Some(ipa) if !ipa.is_empty() => Ok(ipa),
            _ => Err(MtError::malformed(
                SERVICE,
                format!("Could not fetch IPA for '{}'", text),
            )),
        }
    }

    fn provider_name(&self) -> &str {
        "unalengua"
    }
}
