//! Machine Translation trait and utilities
//!
//! This module defines the `MachineTranslator` trait for provider abstraction,
//! so the expansion engine can run against Google Translate, a mock, or any
//! other backend without knowing which.
//!
//! # Example
//!
//! ```ignore
//! use wordbridge_mt::{MachineTranslator, GoogleTranslateProvider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = GoogleTranslateProvider::keyless()?;
//!     let result = provider.translate("hello", "en", "de").await?;
//!     println!("{}", result); // "hallo"
//!     Ok(())
//! }
//! ```

use crate::error::MtResult;
use async_trait::async_trait;

/// Generic trait for machine translation providers
///
/// Implementations of this trait handle the actual translation work,
/// whether through an API (Google Translate) or deterministic logic (Mock).
#[async_trait]
pub trait MachineTranslator: Send + Sync {
    /// Translate a single word or short phrase from source to target language
    ///
    /// # Arguments
    ///
    /// * `text` - The text to translate
    /// * `source_locale` - Source language code, passed to the service as given
    /// * `target_locale` - Target language code, passed to the service as given
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The translated text
    /// * `Err(MtError)` - If translation fails
    async fn translate(
        &self,
        text: &str,
        source_locale: &str,
        target_locale: &str,
    ) -> MtResult<String>;

    /// Get the name of this translation provider
    ///
    /// Used for logging to identify which provider handled a translation.
    fn provider_name(&self) -> &str;
}
