//! Language codes and the set of languages a deployment accepts
//!
//! The accepted set is a value, not a constant: the server builds one from
//! configuration and hands it to [`crate::query::parse_query`], so tests and
//! deployments can swap it freely.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;

/// Languages accepted when no explicit set is configured
pub const DEFAULT_LANGUAGES: &[&str] = &["en", "de", "ru"];

/// A language code that has been checked against a [`LanguageSet`]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LanguageCode(String);

impl LanguageCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for LanguageCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The closed set of language codes a request may use
///
/// Lookups are exact: `"EN"` is not `"en"`. Insertion order is kept so the
/// set can be listed back in the order it was configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageSet {
    codes: Vec<String>,
}

impl LanguageSet {
    /// Build a set from any list of codes, trimming each and skipping blanks and repeats
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut unique: Vec<String> = Vec::new();
        for code in codes {
            let code = code.as_ref().trim();
            if !code.is_empty() && !unique.iter().any(|c| c == code) {
                unique.push(code.to_string());
            }
        }
        Self { codes: unique }
    }

    /// Parse a comma-separated list such as `"en,de,ru"`
    pub fn from_csv(csv: &str) -> Self {
        Self::new(csv.split(','))
    }

    pub fn contains(&self, code: &str) -> bool {
        self.codes.iter().any(|c| c == code)
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.codes.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Validate a single code supplied through the named request parameter
    pub fn parse(
        &self,
        parameter: &'static str,
        code: &str,
    ) -> Result<LanguageCode, ValidationError> {
        let code = code.trim();
        if self.contains(code) {
            Ok(LanguageCode(code.to_string()))
        } else {
            Err(ValidationError::UnsupportedLanguage {
                parameter,
                code: code.to_string(),
            })
        }
    }

    /// Validate a comma-separated list of codes, keeping order and repeats
    ///
    /// An empty element (as in `"de,"`) is rejected like any other unknown code.
    pub fn parse_list(
        &self,
        parameter: &'static str,
        csv: &str,
    ) -> Result<Vec<LanguageCode>, ValidationError> {
        csv.split(',').map(|code| self.parse(parameter, code)).collect()
    }
}

impl Default for LanguageSet {
    fn default() -> Self {
        Self::new(DEFAULT_LANGUAGES.iter().copied())
    }
}
