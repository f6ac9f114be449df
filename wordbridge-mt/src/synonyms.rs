//! Synonym providers
//!
//! The Datamuse `words?rel_syn=` query only knows English, so synonym
//! expansion is only meaningful for English source words.

use crate::error::{MtError, MtResult};
use async_trait::async_trait;
use reqwest::Url;
use std::time::Duration;
use tracing::debug;
use wordbridge::SynonymCandidate;

const SERVICE: &str = "synonyms";

const DATAMUSE_BASE_URL: &str = "https://api.datamuse.com";

/// Looks up words related in meaning to a given word
#[async_trait]
pub trait SynonymProvider: Send + Sync {
    /// Candidates for `word`, most relevant first
    async fn synonyms(&self, word: &str) -> MtResult<Vec<SynonymCandidate>>;

    fn provider_name(&self) -> &str;
}

/// Client for the Datamuse words API
#[derive(Debug, Clone)]
pub struct DatamuseProvider {
    client: reqwest::Client,
    base_url: String,
}

impl DatamuseProvider {
    pub fn new() -> MtResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| MtError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: DATAMUSE_BASE_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl SynonymProvider for DatamuseProvider {
    async fn synonyms(&self, word: &str) -> MtResult<Vec<SynonymCandidate>> {
        let url = Url::parse_with_params(&format!("{}/words", self.base_url), &[("rel_syn", word)])
            .map_err(|e| MtError::ConfigError(format!("Invalid synonym URL: {}", e)))?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| MtError::network(SERVICE, e))?;
        let response = MtError::check_status(SERVICE, response).await?;

        let candidates: Vec<SynonymCandidate> = response
            .json()
            .await
            .map_err(|e| MtError::malformed(SERVICE, format!("Failed to parse response: {}", e)))?;

        debug!("{} synonym candidates for '{}'", candidates.len(), word);
        Ok(candidates)
    }

    fn provider_name(&self) -> &str {
        "Datamuse"
    }
}
