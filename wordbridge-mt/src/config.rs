use std::env;
use std::sync::Arc;
use std::time::Duration;

use wordbridge::LanguageSet;

use crate::error::MtResult;
use crate::expansion::{DEFAULT_CACHE_MAX_AGE, DEFAULT_CALL_TIMEOUT, ExpansionEngine};
use crate::google_translate::GoogleTranslateProvider;
use crate::phonetics::UnalenguaProvider;
use crate::synonyms::DatamuseProvider;

/// Settings for the expansion engine and its upstream services
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    /// Languages accepted as `inputLang` / `outputLang`
    pub languages: LanguageSet,
    /// How long translations and synonym lists stay cached
    pub cache_max_age: Duration,
    /// Deadline for each individual upstream call
    pub call_timeout: Duration,
    pub google_api_key: Option<String>,
    pub translate_url: Option<String>,
    pub phonetic_url: Option<String>,
    pub synonym_url: Option<String>,
}

impl ServiceConfig {
    /// Read settings from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read settings through `lookup`, falling back to defaults for absent or unparsable values
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let languages = non_blank("WORDBRIDGE_LANGUAGES")
            .map(|csv| LanguageSet::from_csv(&csv))
            .filter(|set| !set.is_empty())
            .unwrap_or_default();

        let cache_max_age_secs = non_blank("WORDBRIDGE_CACHE_MAX_AGE_SECS")
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(DEFAULT_CACHE_MAX_AGE.as_secs());

        let call_timeout_ms = non_blank("WORDBRIDGE_CALL_TIMEOUT_MS")
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(DEFAULT_CALL_TIMEOUT.as_millis() as u64);

        ServiceConfig {
            languages,
            cache_max_age: Duration::from_secs(cache_max_age_secs),
            call_timeout: Duration::from_millis(call_timeout_ms),
            google_api_key: non_blank("GOOGLE_TRANSLATE_API_KEY"),
            translate_url: non_blank("WORDBRIDGE_TRANSLATE_URL"),
            phonetic_url: non_blank("WORDBRIDGE_PHONETIC_URL"),
            synonym_url: non_blank("WORDBRIDGE_SYNONYM_URL"),
        }
    }

    /// Google Translate, keyed if an API key is configured
    pub fn translator(&self) -> MtResult<GoogleTranslateProvider> {
        let provider = match &self.google_api_key {
            Some(key) => GoogleTranslateProvider::new(key.clone())?,
            None => GoogleTranslateProvider::keyless()?,
        };
        Ok(match &self.translate_url {
            Some(url) => provider.with_base_url(url.clone()),
            None => provider,
        })
    }

    pub fn phonetics(&self) -> MtResult<UnalenguaProvider> {
        let provider = UnalenguaProvider::new()?;
        Ok(match &self.phonetic_url {
            Some(url) => provider.with_base_url(url.clone()),
            None => provider,
        })
    }

    pub fn synonyms(&self) -> MtResult<DatamuseProvider> {
        let provider = DatamuseProvider::new()?;
        Ok(match &self.synonym_url {
            Some(url) => provider.with_base_url(url.clone()),
            None => provider,
        })
    }

    /// An engine over the configured providers with in-memory caches
    pub fn engine(&self) -> MtResult<ExpansionEngine> {
        Ok(ExpansionEngine::in_memory(
            Arc::new(self.translator()?),
            Arc::new(self.phonetics()?),
            Arc::new(self.synonyms()?),
            self.cache_max_age,
        )
        .with_call_timeout(self.call_timeout))
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
