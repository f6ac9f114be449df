//! Translation services and the expansion engine for wordbridge
//!
//! This crate wires three upstream services (machine translation, IPA
//! transcription, synonym lookup) behind traits, caches their answers, and
//! expands validated requests into translated entries.
//!
//! # Workflow Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use wordbridge::{LanguageSet, RawQuery, parse_query};
//! use wordbridge_mt::{ExpansionEngine, ServiceConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ServiceConfig::from_env();
//!
//!     // 1. Build the engine from the configured providers
//!     let engine = ExpansionEngine::in_memory(
//!         Arc::new(config.translator()?),
//!         Arc::new(config.phonetics()?),
//!         Arc::new(config.synonyms()?),
//!         config.cache_max_age,
//!     );
//!
//!     // 2. Validate the request
//!     let raw = RawQuery {
//!         input: Some("hello".into()),
//!         input_lang: Some("en".into()),
//!         output_lang: Some("de,ru".into()),
//!         synonym_count: Some("2".into()),
//!     };
//!     let request = parse_query(&raw, &config.languages)?;
//!
//!     // 3. Expand
//!     let output = engine.expand(&request).await?;
//!     println!("{}", serde_json::to_string_pretty(&output)?);
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod expansion;
pub mod google_translate;
pub mod mock;
pub mod phonetics;
pub mod synonyms;
pub mod translator;

// Re-export main types for convenient access
pub use cache::{CachePolicy, CacheStore, CachedFunction, MemoryStore, cache_key};
pub use config::ServiceConfig;
pub use error::{ExpansionError, MtError, MtResult};
pub use expansion::{DEFAULT_CACHE_MAX_AGE, DEFAULT_CALL_TIMEOUT, ExpansionEngine};
pub use google_translate::GoogleTranslateProvider;
pub use mock::{MockMode, MockPhonetics, MockSynonyms, MockTranslator};
pub use phonetics::{PhoneticTranscriber, UnalenguaProvider};
pub use synonyms::{DatamuseProvider, SynonymProvider};
pub use translator::MachineTranslator;
