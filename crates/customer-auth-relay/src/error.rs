//! Error types for the customer auth relay.
//!
//! Uses `thiserror` for structured error handling with automatic `From` implementations.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Longest upstream error body relayed back to the caller.
pub const MAX_UPSTREAM_BODY: usize = 512;

/// Errors from the token exchange client.
#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    /// HTTP transport error (connection, DNS, TLS, timeout)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider answered with a non-success status
    #[error("{body}")]
    Rejected {
        /// HTTP status code
        status: u16,
        /// Response body from the provider
        body: String,
    },

    /// Success status but no usable token in the body
    #[error("Malformed token response: {0}")]
    MalformedResponse(String),
}

impl ClientError {
    /// Create a rejected error from an upstream status and body.
    #[must_use]
    pub fn rejected(status: u16, body: impl Into<String>) -> Self {
        Self::Rejected { status, body: body.into() }
    }

    /// Upstream status code, if the provider answered at all.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Errors surfaced by the relay HTTP handlers.
#[derive(thiserror::Error, Debug)]
pub enum RelayError {
    /// Missing required start-flow inputs
    #[error("{0}")]
    BadRequest(String),

    /// Unknown, expired or mismatched session/state at callback
    #[error("Invalid session/state")]
    InvalidSession,

    /// Non-success response from the provider token endpoint
    #[error("Token exchange failed: {0}")]
    UpstreamTokenExchangeFailed(String),

    /// Session store is full of live sessions
    #[error("Too many pending sessions")]
    CapacityExhausted,

    /// Misconfiguration discovered while handling a request
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RelayError {
    /// Create a bad request error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    /// Create an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// HTTP status for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) | Self::InvalidSession | Self::UpstreamTokenExchangeFailed(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::CapacityExhausted => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ClientError> for RelayError {
    fn from(err: ClientError) -> Self {
        Self::UpstreamTokenExchangeFailed(truncate_body(&err.to_string(), MAX_UPSTREAM_BODY))
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        (self.status_code(), self.to_string()).into_response()
    }
}

/// Truncate text to at most `max` bytes on a char boundary.
#[must_use]
pub fn truncate_body(text: &str, max: usize) -> String {
    if text.len() <= max {
        return text.to_string();
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &text[..end])
}

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Result type alias for relay handlers.
pub type RelayResult<T> = Result<T, RelayError>;
