/// Reasons a translation request is rejected before any service is called
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A required query parameter is absent or blank
    #[error("Missing required parameter '{name}'")]
    MissingParameter { name: &'static str },

    /// A language code outside the accepted set
    #[error("Unsupported language '{code}' in parameter '{parameter}'")]
    UnsupportedLanguage {
        parameter: &'static str,
        code: String,
    },

    /// `synonymCount` is not a non-negative integer
    #[error("Invalid synonymCount '{value}': expected a non-negative integer")]
    InvalidSynonymCount { value: String },

    /// `input` contained only separators and whitespace
    #[error("Input contains no words")]
    EmptyInput,
}

impl ValidationError {
    /// The request parameter this error refers to
    pub fn parameter(&self) -> &'static str {
        match self {
            ValidationError::MissingParameter { name } => *name,
            ValidationError::UnsupportedLanguage { parameter, .. } => *parameter,
            ValidationError::InvalidSynonymCount { .. } => "synonymCount",
            ValidationError::EmptyInput => "input",
        }
    }
}
