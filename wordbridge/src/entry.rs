use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::language::LanguageCode;

/// Score given to the direct translation of a requested word, ranking it above any synonym
pub const PRIMARY_SCORE: u64 = 10_000;

/// A word related to the requested word, as ranked by the synonym service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynonymCandidate {
    pub word: String,
    #[serde(default)]
    pub score: u64,
}

impl SynonymCandidate {
    pub fn new(word: impl Into<String>, score: u64) -> Self {
        Self {
            word: word.into(),
            score,
        }
    }

    /// Multi-word phrases can't be looked up as a single word downstream
    pub fn is_single_word(&self) -> bool {
        !self.word.contains(' ')
    }
}

/// A translated text and its IPA transcription in the target language
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationResult {
    pub translated: String,
    #[serde(rename = "translatedIPA")]
    pub translated_ipa: String,
}

/// One row of the response for a requested word
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslatedEntry {
    #[serde(flatten)]
    pub translation: TranslationResult,
    /// The word the caller asked for
    pub base_word: String,
    /// What was actually translated: the requested word or one of its synonyms
    pub original: String,
    #[serde(rename = "originalIPA")]
    pub original_ipa: String,
    pub lang: LanguageCode,
    pub score: u64,
}

impl TranslatedEntry {
    /// The direct translation of `word`
    pub fn primary(
        word: &str,
        translation: TranslationResult,
        original_ipa: String,
        lang: LanguageCode,
    ) -> Self {
        Self {
            translation,
            base_word: word.to_string(),
            original: word.to_string(),
            original_ipa,
            lang,
            score: PRIMARY_SCORE,
        }
    }

    /// The translation of a synonym of `base_word`
    pub fn synonym(
        base_word: &str,
        candidate: &SynonymCandidate,
        translation: TranslationResult,
        original_ipa: String,
        lang: LanguageCode,
    ) -> Self {
        Self {
            translation,
            base_word: base_word.to_string(),
            original: candidate.word.clone(),
            original_ipa,
            lang,
            score: candidate.score,
        }
    }

    pub fn is_primary(&self) -> bool {
        self.original == self.base_word && self.score == PRIMARY_SCORE
    }
}

/// Response body: requested word → entries, in request order
pub type OutputMap = IndexMap<String, Vec<TranslatedEntry>>;
