//! Backend error types.

use miette::Diagnostic;
use thiserror::Error;

/// Errors raised while talking to the token backend.
#[derive(Error, Debug, Diagnostic)]
pub enum ApiError {
    #[error("backend rejected the request ({status}): {message}")]
    #[diagnostic(code("TOKENDECK::API_STATUS"))]
    Status { status: u16, message: String },

    #[error("could not reach the backend: {0}")]
    #[diagnostic(
        code("TOKENDECK::API_TRANSPORT"),
        help("Check api.base_url and that the backend is running")
    )]
    Transport(#[from] reqwest::Error),

    #[error("unexpected response body: {0}")]
    #[diagnostic(code("TOKENDECK::API_DECODE"))]
    Decode(#[from] serde_json::Error),

    #[error("invalid backend URL: {0}")]
    #[diagnostic(
        code("TOKENDECK::API_URL"),
        help("api.base_url must be an absolute http(s) URL")
    )]
    InvalidUrl(#[from] url::ParseError),
}

impl ApiError {
    /// Short text suitable for a form error line or a notification.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Status { message, .. } if !message.is_empty() => message.clone(),
            ApiError::Status { status, .. } => format!("request failed with status {status}"),
            other => other.to_string(),
        }
    }
}

/// Result type alias for backend operations
pub type Result<T> = std::result::Result<T, ApiError>;
