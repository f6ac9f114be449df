/// Errors raised by the external services wordbridge depends on
#[derive(Debug, thiserror::Error)]
pub enum MtError {
    /// The request never produced a response
    #[error("{service}: network error: {source}")]
    NetworkError {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The service answered with a non-success status
    #[error("{service}: API error ({status}): {body}")]
    ApiError {
        service: &'static str,
        status: u16,
        body: String,
    },

    /// The service answered, but not with what we asked for
    #[error("{service}: malformed response: {reason}")]
    MalformedResponse {
        service: &'static str,
        reason: String,
    },

    /// The call outlived its deadline
    #[error("{service}: timed out after {elapsed_ms}ms")]
    Timeout {
        service: &'static str,
        elapsed_ms: u64,
    },

    /// The request was refused before being sent
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A provider could not be constructed
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Failure injected by a mock provider
    #[error("{0}")]
    MockError(String),
}

impl MtError {
    pub(crate) fn network(service: &'static str, source: reqwest::Error) -> Self {
        MtError::NetworkError { service, source }
    }

    pub(crate) fn malformed(service: &'static str, reason: impl Into<String>) -> Self {
        MtError::MalformedResponse {
            service,
            reason: reason.into(),
        }
    }

    /// Turn a non-success HTTP response into an [`MtError::ApiError`], passing successes through
    pub(crate) async fn check_status(
        service: &'static str,
        response: reqwest::Response,
    ) -> MtResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        Err(MtError::ApiError {
            service,
            status: status.as_u16(),
            body,
        })
    }
}

/// Result type for calls to external services
pub type MtResult<T> = Result<T, MtError>;

/// Why an expansion request produced no response
#[derive(Debug, thiserror::Error)]
pub enum ExpansionError {
    /// A call the request cannot do without failed
    #[error(transparent)]
    Upstream(#[from] MtError),

    /// Every attempt to translate this word failed or came back empty
    #[error("Cannot translate '{word}'")]
    Untranslatable { word: String },
}
