//! Expansion Engine: words × target languages × synonyms
//!
//! For every requested word the engine fetches its pronunciation, then for
//! every target language its translation and, when asked, the translations of
//! its synonyms. The result is an [`OutputMap`] of entries in a fixed order:
//!
//! ```text
//! word order → target order → primary entry, then synonyms in service order
//! ```
//!
//! Everything runs sequentially; each upstream call is awaited before the next
//! one starts, so the order above is also the order calls are made in.
//!
//! # Failure policy
//!
//! - The word's own IPA has no fallback: if it fails, the request fails.
//! - A failed translation (or a failed synonym IPA) drops only that entry.
//! - A failed synonym lookup counts as "no synonyms".
//! - A word that ends up with no entries fails the whole request.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};
use wordbridge::{
    ExpansionRequest, LanguageCode, OutputMap, SynonymCandidate, TranslatedEntry,
    TranslationResult,
};

use crate::cache::{CachePolicy, CacheStore, CachedFunction, MemoryStore};
use crate::error::{ExpansionError, MtError, MtResult};
use crate::phonetics::PhoneticTranscriber;
use crate::synonyms::SynonymProvider;
use crate::translator::MachineTranslator;

/// Default deadline for a single upstream call
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(10);

/// Default lifetime of cached translations and synonym lists
pub const DEFAULT_CACHE_MAX_AGE: Duration = Duration::from_secs(60 * 60);

/// Orchestrates the translation, phonetic and synonym services for a request
pub struct ExpansionEngine {
    translator: Arc<dyn MachineTranslator>,
    phonetics: Arc<dyn PhoneticTranscriber>,
    synonyms: Arc<dyn SynonymProvider>,
    translations: CachedFunction<TranslationResult>,
    synonym_lists: CachedFunction<Vec<SynonymCandidate>>,
    call_timeout: Duration,
}

impl ExpansionEngine {
    /// Create an engine with explicit cache stores for translations and synonym lists
    pub fn new(
        translator: Arc<dyn MachineTranslator>,
        phonetics: Arc<dyn PhoneticTranscriber>,
        synonyms: Arc<dyn SynonymProvider>,
        translation_store: Arc<dyn CacheStore<TranslationResult>>,
        synonym_store: Arc<dyn CacheStore<Vec<SynonymCandidate>>>,
        cache_max_age: Duration,
    ) -> Self {
        Self {
            translator,
            phonetics,
            synonyms,
            translations: CachedFunction::new(
                CachePolicy::new("translation", cache_max_age),
                translation_store,
            ),
            synonym_lists: CachedFunction::new(
                CachePolicy::new("synonyms", cache_max_age),
                synonym_store,
            ),
            call_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }

    /// Create an engine whose caches live in process memory
    pub fn in_memory(
        translator: Arc<dyn MachineTranslator>,
        phonetics: Arc<dyn PhoneticTranscriber>,
        synonyms: Arc<dyn SynonymProvider>,
        cache_max_age: Duration,
    ) -> Self {
        Self::new(
            translator,
            phonetics,
            synonyms,
            Arc::new(MemoryStore::new()),
            Arc::new(MemoryStore::new()),
            cache_max_age,
        )
    }

    pub fn with_call_timeout(mut self, call_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self
    }

    /// Build the [`OutputMap`] for a validated request
    ///
    /// Repeated words are expanded again each time; the last expansion wins
    /// but the word keeps its first position in the map.
    pub async fn expand(&self, request: &ExpansionRequest) -> Result<OutputMap, ExpansionError> {
        info!(
            "Expanding {} word(s) {} → {:?} (synonyms: {})",
            request.words.len(),
            request.source,
            request.targets.iter().map(LanguageCode::as_str).collect::<Vec<_>>(),
            request.synonym_count
        );

        let mut output = OutputMap::new();
        for word in &request.words {
            let entries = self.expand_word(word, request).await?;
            output.insert(word.clone(), entries);
        }
        Ok(output)
    }

    async fn expand_word(
        &self,
        word: &str,
        request: &ExpansionRequest,
    ) -> Result<Vec<TranslatedEntry>, ExpansionError> {
        let source = &request.source;
        let original_ipa = self.transcribe(word, source.as_str()).await?;

        let mut entries = Vec::new();
        for target in &request.targets {
            match self.translation(word, source, target).await {
                Ok(translation) => entries.push(TranslatedEntry::primary(
                    word,
                    translation,
                    original_ipa.clone(),
                    target.clone(),
                )),
                Err(e) => warn!("Dropping translation of '{}' to {}: {}", word, target, e),
            }

            if request.synonym_count == 0 {
                continue;
            }

            // The synonym service only understands English, whatever the source language
            let candidates = self.synonyms_of(word).await;
            for candidate in candidates.iter().take(request.synonym_count) {
                match self.expand_synonym(word, candidate, source, target).await {
                    Ok(entry) => entries.push(entry),
                    Err(e) => warn!(
                        "Dropping synonym '{}' of '{}' for {}: {}",
                        candidate.word, word, target, e
                    ),
                }
            }
        }

        if entries.is_empty() {
            return Err(ExpansionError::Untranslatable {
                word: word.to_string(),
            });
        }
        debug!("'{}' expanded to {} entries", word, entries.len());
        Ok(entries)
    }

    async fn expand_synonym(
        &self,
        base_word: &str,
        candidate: &SynonymCandidate,
        source: &LanguageCode,
        target: &LanguageCode,
    ) -> MtResult<TranslatedEntry> {
        let translation = self.translation(&candidate.word, source, target).await?;
        let original_ipa = self.transcribe(&candidate.word, source.as_str()).await?;
        Ok(TranslatedEntry::synonym(
            base_word,
            candidate,
            translation,
            original_ipa,
            target.clone(),
        ))
    }

    /// Cached translation of `text` plus the IPA of the translated text
    async fn translation(
        &self,
        text: &str,
        source: &LanguageCode,
        target: &LanguageCode,
    ) -> MtResult<TranslationResult> {
        let key = self
            .translations
            .key(&[text, source.as_str(), target.as_str()]);

        self.translations
            .call(key, || async {
                let translated = self
                    .bounded(
                        "translation",
                        self.translator
                            .translate(text, source.as_str(), target.as_str()),
                    )
                    .await?;
                let translated_ipa = self.transcribe(&translated, target.as_str()).await?;
                Ok::<_, MtError>(TranslationResult {
                    translated,
                    translated_ipa,
                })
            })
            .await
    }

    /// Cached single-word synonyms of `word`; lookup failures yield an empty list
    async fn synonyms_of(&self, word: &str) -> Vec<SynonymCandidate> {
        let key = self.synonym_lists.key(&[word]);
        let looked_up = self
            .synonym_lists
            .call(key, || async {
                let candidates = self
                    .bounded("synonyms", self.synonyms.synonyms(word))
                    .await?;
                Ok::<_, MtError>(
                    candidates
                        .into_iter()
                        .filter(SynonymCandidate::is_single_word)
                        .collect(),
                )
            })
            .await;

        looked_up.unwrap_or_else(|e| {
            warn!("Synonym lookup for '{}' failed: {}", word, e);
            Vec::new()
        })
    }

    async fn transcribe(&self, text: &str, lang: &str) -> MtResult<String> {
        self.bounded("phonetics", self.phonetics.transcribe(text, lang))
            .await
    }

    /// Run an upstream call under the per-call deadline
    async fn bounded<T>(
        &self,
        service: &'static str,
        call: impl Future<Output = MtResult<T>>,
    ) -> MtResult<T> {
        match tokio::time::timeout(self.call_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(MtError::Timeout {
                service,
                elapsed_ms: self.call_timeout.as_millis() as u64,
            }),
        }
    }
}

impl std::fmt::Debug for ExpansionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExpansionEngine")
            .field("translator", &self.translator.provider_name())
            .field("phonetics", &self.phonetics.provider_name())
            .field("synonyms", &self.synonyms.provider_name())
            .field("call_timeout", &self.call_timeout)
            .finish()
    }
}
