//! Mock providers for testing
//!
//! Deterministic, network-free stand-ins for the translation, phonetic and
//! synonym services. The CLI's `--mock` flag and the test suites run the
//! whole expansion pipeline against these.
//!
//! # Example
//!
//! ```ignore
//! use wordbridge_mt::{MachineTranslator, MockTranslator, MockMode};
//!
//! let mock = MockTranslator::new(MockMode::Suffix);
//! let result = mock.translate("hello", "en", "de").await.unwrap();
//! assert_eq!(result, "hello_de");
//! ```

use crate::error::{MtError, MtResult};
use crate::phonetics::PhoneticTranscriber;
use crate::synonyms::SynonymProvider;
use crate::translator::MachineTranslator;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use wordbridge::SynonymCandidate;

/// Mock translation modes for testing different scenarios
#[derive(Debug, Clone)]
pub enum MockMode {
    /// Append locale suffix: "hello" → "hello_de"
    Suffix,

    /// Use predefined mappings for realistic translations
    /// (text, target_locale) → translation, falling back to `Suffix`
    Mappings(HashMap<(String, String), String>),

    /// Simulate API errors
    Error(String),
}

/// Mock translator that simulates various translation scenarios
#[derive(Debug)]
pub struct MockTranslator {
    mode: MockMode,
    /// Texts that fail regardless of mode
    failing: HashSet<String>,
    /// Optional simulated network delay (in milliseconds)
    delay_ms: u64,
    calls: AtomicUsize,
}

impl MockTranslator {
    pub fn new(mode: MockMode) -> Self {
        Self {
            mode,
            failing: HashSet::new(),
            delay_ms: 0,
            calls: AtomicUsize::new(0),
        }
    }

    /// Create a MockTranslator with simulated network delay
    pub fn with_delay(mode: MockMode, delay_ms: u64) -> Self {
        Self {
            delay_ms,
            ..Self::new(mode)
        }
    }

    /// Make translations of `text` fail
    pub fn failing_on(mut self, text: &str) -> Self {
        self.failing.insert(text.to_string());
        self
    }

    /// Number of `translate` calls received so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Internal helper to apply the simulated delay
    async fn apply_delay(&self) {
        if self.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
        }
    }

    fn apply_translation(&self, text: &str, target: &str) -> MtResult<String> {
        if self.failing.contains(text) {
            return Err(MtError::MockError(format!("Cannot translate '{}'", text)));
        }

        match &self.mode {
            MockMode::Suffix => Ok(format!("{}_{}", text, target)),
            MockMode::Mappings(map) => {
                let key = (text.to_string(), target.to_string());
                Ok(map
                    .get(&key)
                    .cloned()
                    .unwrap_or_else(|| format!("{}_{}", text, target)))
            }
            MockMode::Error(msg) => Err(MtError::MockError(msg.clone())),
        }
    }
}

#[async_trait]
impl MachineTranslator for MockTranslator {
    async fn translate(
        &self,
        text: &str,
        _source_locale: &str,
        target_locale: &str,
    ) -> MtResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.apply_delay().await;
        self.apply_translation(text, target_locale)
    }

    fn provider_name(&self) -> &str {
        "Mock Translator"
    }
}

/// Mock IPA service: wraps text in slashes and tags it with the language
///
/// `("hello", "en")` → `"/hello/en"`, unless a mapping or failure is registered.
#[derive(Debug, Default)]
pub struct MockPhonetics {
    mappings: HashMap<(String, String), String>,
    failing: HashSet<String>,
    calls: AtomicUsize,
}

impl MockPhonetics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mapping(mut self, text: &str, lang: &str, ipa: &str) -> Self {
        self.mappings
            .insert((text.to_string(), lang.to_string()), ipa.to_string());
        self
    }

    /// Make transcriptions of `text` fail in every language
    pub fn failing_on(mut self, text: &str) -> Self {
        self.failing.insert(text.to_string());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PhoneticTranscriber for MockPhonetics {
    async fn transcribe(&self, text: &str, lang: &str) -> MtResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.contains(text) {
            return Err(MtError::MockError(format!("Could not fetch IPA for '{}'", text)));
        }
        Ok(self
            .mappings
            .get(&(text.to_string(), lang.to_string()))
            .cloned()
            .unwrap_or_else(|| format!("/{}/{}", text, lang)))
    }

    fn provider_name(&self) -> &str {
        "Mock Phonetics"
    }
}

/// Mock synonym service with a fixed thesaurus
#[derive(Debug, Default)]
pub struct MockSynonyms {
    thesaurus: HashMap<String, Vec<SynonymCandidate>>,
    error: Option<String>,
    calls: AtomicUsize,
}

impl MockSynonyms {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the candidates returned for `word`, in order
    pub fn with_synonyms(mut self, word: &str, candidates: &[(&str, u64)]) -> Self {
        self.thesaurus.insert(
            word.to_string(),
            candidates
                .iter()
                .map(|(w, score)| SynonymCandidate::new(*w, *score))
                .collect(),
        );
        self
    }

    /// Make every lookup fail
    pub fn failing(mut self, msg: &str) -> Self {
        self.error = Some(msg.to_string());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// A small English thesaurus for demos
    pub fn sample() -> Self {
        Self::new()
            .with_synonyms(
                "hello",
                &[("hi", 1000), ("howdy", 900), ("how do you do", 800), ("hullo", 700)],
            )
            .with_synonyms(
                "happy",
                &[("glad", 1200), ("felicitous", 900), ("well chosen", 700)],
            )
            .with_synonyms("house", &[("home", 1100), ("dwelling", 950), ("abode", 800)])
    }
}

#[async_trait]
impl SynonymProvider for MockSynonyms {
    async fn synonyms(&self, word: &str) -> MtResult<Vec<SynonymCandidate>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(msg) = &self.error {
            return Err(MtError::MockError(msg.clone()));
        }
        Ok(self.thesaurus.get(word).cloned().unwrap_or_default())
    }

    fn provider_name(&self) -> &str {
        "Mock Synonyms"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========== Translator Tests ==========

    #[tokio::test]
    async fn test_suffix_different_targets() {
        let mock = MockTranslator::new(MockMode::Suffix);
        assert_eq!(mock.translate("hello", "en", "de").await.unwrap(), "hello_de");
        assert_eq!(mock.translate("hello", "en", "ru").await.unwrap(), "hello_ru");
        assert_eq!(mock.calls(), 2);
    }

    #[tokio::test]
    async fn test_mapping_with_fallback() {
        let mut map = HashMap::new();
        map.insert(("hello".to_string(), "de".to_string()), "hallo".to_string());

        let mock = MockTranslator::new(MockMode::Mappings(map));
        assert_eq!(mock.translate("hello", "en", "de").await.unwrap(), "hallo");
        assert_eq!(mock.translate("unknown", "en", "de").await.unwrap(), "unknown_de");
    }

    #[tokio::test]
    async fn test_error_mode_returns_error() {
        let mock = MockTranslator::new(MockMode::Error("API unavailable".to_string()));
        match mock.translate("hello", "en", "de").await {
            Err(MtError::MockError(msg)) => assert_eq!(msg, "API unavailable"),
            other => panic!("Expected MockError, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_failing_on_single_text() {
        let mock = MockTranslator::new(MockMode::Suffix).failing_on("broken");
        assert!(mock.translate("broken", "en", "de").await.is_err());
        assert!(mock.translate("fine", "en", "de").await.is_ok());
    }

    #[tokio::test]
    async fn test_delay_adds_latency() {
        let mock = MockTranslator::with_delay(MockMode::Suffix, 50);
        let start = std::time::Instant::now();
        let _ = mock.translate("hello", "en", "de").await.unwrap();
        assert!(start.elapsed().as_millis() >= 50);
    }

    // ========== Phonetics Tests ==========

    #[tokio::test]
    async fn test_phonetics_default_and_mapping() {
        let mock = MockPhonetics::new().with_mapping("hello", "en", "həˈloʊ");
        assert_eq!(mock.transcribe("hello", "en").await.unwrap(), "həˈloʊ");
        assert_eq!(mock.transcribe("hallo", "de").await.unwrap(), "/hallo/de");
        assert_eq!(mock.calls(), 2);
    }

    #[tokio::test]
    async fn test_phonetics_failure() {
        let mock = MockPhonetics::new().failing_on("xyzzy");
        assert!(mock.transcribe("xyzzy", "en").await.is_err());
    }

    // ========== Synonym Tests ==========

    #[tokio::test]
    async fn test_synonyms_keep_registration_order() {
        let mock = MockSynonyms::new().with_synonyms("big", &[("large", 10), ("huge", 5)]);
        let found = mock.synonyms("big").await.unwrap();
        assert_eq!(
            found,
            vec![SynonymCandidate::new("large", 10), SynonymCandidate::new("huge", 5)]
        );
        assert!(mock.synonyms("small").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_synonyms_failure() {
        let mock = MockSynonyms::sample().failing("down");
        assert!(mock.synonyms("hello").await.is_err());
        assert_eq!(mock.calls(), 1);
    }

    #[test]
    fn test_provider_names() {
        assert_eq!(MockTranslator::new(MockMode::Suffix).provider_name(), "Mock Translator");
        assert_eq!(MockPhonetics::new().provider_name(), "Mock Phonetics");
        assert_eq!(MockSynonyms::new().provider_name(), "Mock Synonyms");
    }
}
