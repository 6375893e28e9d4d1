//! Failure taxonomy for API calls
//!
//! Every outbound request resolves to either a parsed body or an
//! `ApiError`. Callers branch on the HTTP status to pick a user-facing
//! message; nothing here formats text for display.

use thiserror::Error;

/// Errors produced by the authenticated transport and the resource clients
#[derive(Error, Debug)]
pub enum ApiError {
    /// No bearer token is persisted; raised before any network I/O
    #[error("no access token found")]
    NoToken,

    /// The server answered with a non-2xx status
    #[error("HTTP error {status}: {status_text}")]
    Http { status: u16, status_text: String },

    /// The request never completed (connection refused, DNS, timeout, ...)
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// A successful response body did not match the expected shape
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// HTTP status carried by this error, if any
    ///
    /// Used by the action layer to map 400/401/409 onto specific messages.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True when the server rejected the session (HTTP 401)
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}
