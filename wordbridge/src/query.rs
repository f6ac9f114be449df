//! Request parsing and validation
//!
//! Turns the loosely-typed query parameters of a translation request into an
//! [`ExpansionRequest`] whose languages are known to be supported and whose
//! words are already normalized. Nothing here touches the network: a request
//! that fails validation never reaches a translation service.

use serde::Deserialize;

use crate::error::ValidationError;
use crate::language::{LanguageCode, LanguageSet};

/// Query parameters exactly as they arrive on the wire
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawQuery {
    pub input: Option<String>,
    pub input_lang: Option<String>,
    pub output_lang: Option<String>,
    pub synonym_count: Option<String>,
}

/// A validated translation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpansionRequest {
    /// Lowercased, trimmed words in input order, duplicates included
    pub words: Vec<String>,
    pub source: LanguageCode,
    /// Target languages in the order requested
    pub targets: Vec<LanguageCode>,
    /// How many synonyms to expand per word and target; 0 disables expansion
    pub synonym_count: usize,
}

/// Split a comma-separated word list into normalized words
///
/// Each token is trimmed and lowercased. Tokens that are empty after trimming
/// are dropped; repeated words are kept.
pub fn normalize_words(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(|token| token.trim().to_lowercase())
        .filter(|word| !word.is_empty())
        .collect()
}

fn required<'a>(
    value: &'a Option<String>,
    name: &'static str,
) -> Result<&'a str, ValidationError> {
    match value.as_deref() {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ValidationError::MissingParameter { name }),
    }
}

fn parse_synonym_count(value: Option<&str>) -> Result<usize, ValidationError> {
    match value.map(str::trim) {
        None | Some("") => Ok(0),
        Some(v) => v
            .parse::<usize>()
            .map_err(|_| ValidationError::InvalidSynonymCount {
                value: v.to_string(),
            }),
    }
}

/// Validate raw query parameters against the accepted language set
///
/// Presence is checked first (`input`, `inputLang`, `outputLang`), then the
/// language codes, then `synonymCount`.
pub fn parse_query(
    raw: &RawQuery,
    languages: &LanguageSet,
) -> Result<ExpansionRequest, ValidationError> {
    let input = required(&raw.input, "input")?;
    let input_lang = required(&raw.input_lang, "inputLang")?;
    let output_lang = required(&raw.output_lang, "outputLang")?;

    let source = languages.parse("inputLang", input_lang)?;
    let targets = languages.parse_list("outputLang", output_lang)?;
    let synonym_count = parse_synonym_count(raw.synonym_count.as_deref())?;

    let words = normalize_words(input);
    if words.is_empty() {
        return Err(ValidationError::EmptyInput);
    }

    Ok(ExpansionRequest {
        words,
        source,
        targets,
        synonym_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(input: &str, input_lang: &str, output_lang: &str) -> RawQuery {
        RawQuery {
            input: Some(input.to_string()),
            input_lang: Some(input_lang.to_string()),
            output_lang: Some(output_lang.to_string()),
            synonym_count: None,
        }
    }

    fn spanish() -> LanguageSet {
        LanguageSet::new(["en", "es", "de", "ru"])
    }

    #[test]
    fn test_normalize_words() {
        assert_eq!(normalize_words("Casa, PERRO "), vec!["casa", "perro"]);
    }

    #[test]
    fn test_normalize_words_drops_empty_tokens() {
        assert_eq!(normalize_words("a,, ,b,"), vec!["a", "b"]);
        assert!(normalize_words(" , ").is_empty());
    }

    #[test]
    fn test_normalize_words_keeps_duplicates() {
        assert_eq!(normalize_words("Hello,hello"), vec!["hello", "hello"]);
    }

    #[test]
    fn test_parse_full_query() {
        let mut query = raw("Casa, PERRO ", "es", "de,ru");
        query.synonym_count = Some("3".to_string());

        let request = parse_query(&query, &spanish()).unwrap();
        assert_eq!(request.words, vec!["casa", "perro"]);
        assert_eq!(request.source.as_str(), "es");
        let targets: Vec<&str> = request.targets.iter().map(|t| t.as_str()).collect();
        assert_eq!(targets, vec!["de", "ru"]);
        assert_eq!(request.synonym_count, 3);
    }

    #[test]
    fn test_synonym_count_defaults_to_zero() {
        let request = parse_query(&raw("hello", "en", "de"), &LanguageSet::default()).unwrap();
        assert_eq!(request.synonym_count, 0);

        let mut blank = raw("hello", "en", "de");
        blank.synonym_count = Some(" ".to_string());
        assert_eq!(
            parse_query(&blank, &LanguageSet::default()).unwrap().synonym_count,
            0
        );
    }

    #[test]
    fn test_invalid_synonym_count() {
        for bad in ["-1", "two", "1.5"] {
            let mut query = raw("hello", "en", "de");
            query.synonym_count = Some(bad.to_string());
            match parse_query(&query, &LanguageSet::default()) {
                Err(ValidationError::InvalidSynonymCount { value }) => assert_eq!(value, bad),
                other => panic!("Expected InvalidSynonymCount for {}, got {:?}", bad, other),
            }
        }
    }

    #[test]
    fn test_missing_parameters_in_order() {
        let languages = LanguageSet::default();

        let empty = RawQuery::default();
        assert_eq!(
            parse_query(&empty, &languages),
            Err(ValidationError::MissingParameter { name: "input" })
        );

        let mut query = raw("hello", "en", "de");
        query.input_lang = None;
        assert_eq!(
            parse_query(&query, &languages),
            Err(ValidationError::MissingParameter { name: "inputLang" })
        );

        let mut query = raw("hello", "en", "de");
        query.output_lang = Some("   ".to_string());
        assert_eq!(
            parse_query(&query, &languages),
            Err(ValidationError::MissingParameter { name: "outputLang" })
        );
    }

    #[test]
    fn test_unsupported_languages() {
        let languages = LanguageSet::default();

        let err = parse_query(&raw("hello", "fr", "de"), &languages).unwrap_err();
        assert_eq!(err.parameter(), "inputLang");

        let err = parse_query(&raw("hello", "en", "de,fr"), &languages).unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnsupportedLanguage {
                parameter: "outputLang",
                code: "fr".to_string()
            }
        );
    }

    #[test]
    fn test_input_lang_must_be_single() {
        let err = parse_query(&raw("hello", "en,de", "ru"), &LanguageSet::default()).unwrap_err();
        assert!(matches!(err, ValidationError::UnsupportedLanguage { parameter: "inputLang", .. }));
    }

    #[test]
    fn test_input_of_only_separators() {
        assert_eq!(
            parse_query(&raw(" , ,", "en", "de"), &LanguageSet::default()),
            Err(ValidationError::EmptyInput)
        );
    }
}
