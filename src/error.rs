use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::contact::FieldErrors;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Content error: {0}")]
    Content(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("GitHub API rate limit exhausted")]
    RateLimited,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid form: {} field(s) rejected", .0.len())]
    InvalidForm(FieldErrors),

    #[error("Template error: {0}")]
    Template(String),

    #[error("Mail delivery failed: {0}")]
    Mail(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Get a sanitized error message safe for logging
    /// Filters out potentially sensitive information
    pub fn log_safe(&self) -> String {
        match self {
            // Transport errors may carry URLs with credentials in them
            Error::Http(_) => "External HTTP request failed".to_string(),

            Error::Internal(msg) | Error::Mail(msg) => {
                let lower = msg.to_lowercase();
                if lower.contains("password")
                    || lower.contains("secret")
                    || lower.contains("token")
                    || lower.contains("key")
                    || lower.contains("bearer")
                {
                    "Internal error (details redacted)".to_string()
                } else {
                    self.to_string()
                }
            }

            Error::Json(_) => "Malformed JSON payload".to_string(),
            Error::Yaml(_) => "Malformed YAML document".to_string(),
            Error::InvalidUrl(_) => "Invalid URL provided".to_string(),
            Error::Io(_) => "File system operation failed".to_string(),

            Error::Config(_)
            | Error::Content(_)
            | Error::NotFound(_)
            | Error::RateLimited
            | Error::Validation(_)
            | Error::InvalidForm(_)
            | Error::Template(_) => self.to_string(),
        }
    }
}

impl From<askama::Error> for Error {
    fn from(e: askama::Error) -> Self {
        Error::Template(e.to_string())
    }
}

// Implement IntoResponse for API error handling
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        tracing::error!("Request error: {}", self.log_safe());

        if let Error::InvalidForm(errors) = &self {
            let body = Json(json!({ "errors": errors }));
            return (StatusCode::UNPROCESSABLE_ENTITY, body).into_response();
        }

        let (status, error_message) = match &self {
            Error::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            Error::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Error::Http(_) | Error::Mail(_) => (
                StatusCode::BAD_GATEWAY,
                "External service error".to_string(),
            ),
            Error::RateLimited => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Upstream rate limit exhausted".to_string(),
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_safe_redacts_credentials() {
        let err = Error::Internal("Invalid GitHub token: abc".to_string());
        assert_eq!(err.log_safe(), "Internal error (details redacted)");

        let err = Error::Internal("upstream closed connection".to_string());
        assert!(err.log_safe().contains("upstream closed connection"));
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            Error::NotFound("x".into()).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            Error::RateLimited.into_response().status(),
            StatusCode::SERVICE_UNAVAILABLE
        );

        let mut errors = FieldErrors::new();
        errors.insert("email", "Email is required".to_string());
        assert_eq!(
            Error::InvalidForm(errors).into_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }
}
