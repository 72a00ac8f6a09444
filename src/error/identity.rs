use axum::http::StatusCode;
use thiserror::Error as ThisError;

/// Failures while resolving a bearer token through the identity provider.
#[derive(Debug, ThisError)]
pub enum IdentityError {
    #[error("identity provider rejected the token with status: {0}")]
    Rejected(StatusCode),

    #[error("identity provider error with status: {0}")]
    UpstreamStatus(StatusCode),

    #[error("identity provider request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("identity provider response parse error: {message}. Body: {body}")]
    Parse { message: String, body: String },
}

impl IdentityError {
    /// Transport failures and provider-side 5xx are worth another attempt; a
    /// rejected token never is.
    pub fn is_retryable(&self) -> bool {
        match self {
            IdentityError::Request(e) => e.is_connect() || e.is_timeout() || e.is_request(),
            IdentityError::UpstreamStatus(status) => status.is_server_error(),
            IdentityError::Rejected(_) | IdentityError::Parse { .. } => false,
        }
    }
}
