//! Request model for wordbridge
//!
//! wordbridge answers "how do you say these words in those languages, and how
//! are they pronounced?" This crate holds the pieces that don't talk to the
//! network: the accepted language set, request validation and word
//! normalization, and the entries that make up a response.
//!
//! # Example
//!
//! ```ignore
//! use wordbridge::{LanguageSet, RawQuery, parse_query};
//!
//! let raw = RawQuery {
//!     input: Some("Casa, PERRO ".into()),
//!     input_lang: Some("es".into()),
//!     output_lang: Some("de,ru".into()),
//!     synonym_count: None,
//! };
//! let request = parse_query(&raw, &LanguageSet::new(["es", "de", "ru"]))?;
//! assert_eq!(request.words, vec!["casa", "perro"]);
//! ```

pub mod entry;
pub mod error;
pub mod language;
pub mod query;

pub use entry::{
    OutputMap, PRIMARY_SCORE, SynonymCandidate, TranslatedEntry, TranslationResult,
};
pub use error::ValidationError;
pub use language::{DEFAULT_LANGUAGES, LanguageCode, LanguageSet};
pub use query::{ExpansionRequest, RawQuery, normalize_words, parse_query};
