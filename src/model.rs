//! Data models for the shorty administration client
//!
//! This module defines the records exchanged with the remote API and the
//! transient message type used by the form and list flows.

use serde::{Deserialize, Serialize};

/// A short-path to URL mapping as returned by the API
///
/// # Example
/// ```json
/// {
///   "path": "docs",
///   "url": "https://example.com/handbook",
///   "owner": "ada@example.com",
///   "modify": true
/// }
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UrlMapping {
    /// User-chosen short slug, unique across the service
    pub path: String,

    /// Absolute target URL the slug redirects to
    pub url: String,

    /// Principal that created the mapping
    pub owner: String,

    /// Whether the current viewer may edit or delete this row
    ///
    /// Derived server-side from ownership and admin capability; the client
    /// only uses it to gate affordances, the server enforces it again.
    pub modify: bool,
}

/// Request body for creating or updating a mapping
///
/// ```json
/// { "path": "docs", "url": "https://example.com/handbook" }
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MappingPayload {
    /// Short slug the mapping is stored under
    pub path: String,

    /// Normalized absolute target URL
    pub url: String,
}

/// Request body for granting admin rights
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AdminPayload {
    /// Email address of the user to promote
    pub email: String,
}

/// Severity of a transient user-facing message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Success,
    Error,
}

/// A transient message attached to a form or a list row
///
/// Messages auto-expire a few seconds after being set; see
/// [`crate::actions::MessageBoard`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub kind: MessageKind,
    pub text: String,
}

impl Message {
    pub fn success(text: impl Into<String>) -> Self {
        Message {
            kind: MessageKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Message {
            kind: MessageKind::Error,
            text: text.into(),
        }
    }
}
