use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::warn;
use wordbridge::ValidationError;
use wordbridge_mt::ExpansionError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameter: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub word: Option<String>,
}

/// Everything a handler can fail with, mapped onto an HTTP status
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Invalid query string: {0}")]
    BadQuery(String),

    #[error("Missing required parameter '{0}'")]
    MissingParameter(&'static str),

    #[error("Invalid upstream URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Could not read request body: {0}")]
    Body(String),

    #[error(transparent)]
    Expansion(#[from] ExpansionError),

    #[error("Upstream request failed: {0}")]
    Unreachable(#[from] reqwest::Error),

    #[error("Method not allowed")]
    MethodNotAllowed { allow: &'static str },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_)
            | ApiError::BadQuery(_)
            | ApiError::MissingParameter(_)
            | ApiError::InvalidUrl { .. }
            | ApiError::Body(_) => StatusCode::BAD_REQUEST,
            ApiError::Expansion(_) | ApiError::Unreachable(_) => StatusCode::BAD_GATEWAY,
            ApiError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
        }
    }

    fn parameter(&self) -> Option<&'static str> {
        match self {
            ApiError::Validation(e) => Some(e.parameter()),
            ApiError::MissingParameter(name) => Some(*name),
            ApiError::InvalidUrl { .. } => Some("apiurl"),
            _ => None,
        }
    }

    fn word(&self) -> Option<String> {
        match self {
            ApiError::Expansion(ExpansionError::Untranslatable { word }) => Some(word.clone()),
            _ => None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            warn!("Request failed upstream: {}", self);
        }

        let body = Json(ErrorResponse {
            error: self.to_string(),
            parameter: self.parameter(),
            word: self.word(),
        });

        match self {
            ApiError::MethodNotAllowed { allow } => {
                (status, [(header::ALLOW, allow)], body).into_response()
            }
            _ => (status, body).into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wordbridge_mt::MtError;

    #[test]
    fn test_status_mapping() {
        let missing = ApiError::from(ValidationError::MissingParameter { name: "input" });
        assert_eq!(missing.status(), StatusCode::BAD_REQUEST);
        assert_eq!(missing.parameter(), Some("input"));

        let untranslatable = ApiError::from(ExpansionError::Untranslatable {
            word: "xyzzy".to_string(),
        });
        assert_eq!(untranslatable.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(untranslatable.word().as_deref(), Some("xyzzy"));

        let upstream = ApiError::from(ExpansionError::from(MtError::MockError(
            "down".to_string(),
        )));
        assert_eq!(upstream.status(), StatusCode::BAD_GATEWAY);
        assert!(upstream.parameter().is_none());
        assert!(upstream.word().is_none());
    }

    #[test]
    fn test_method_not_allowed_sets_allow_header() {
        let response = ApiError::MethodNotAllowed {
            allow: "GET, HEAD, POST",
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[header::ALLOW], "GET, HEAD, POST");
    }
}
