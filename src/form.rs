//! Form validation and submission guarding
//!
//! Explicit schema validation: each field runs its rules and failures come
//! back as plain (field, message) pairs, independent of any rendering.
//! Successful validation yields the normalized payload that goes on the
//! wire.

use crate::model::MappingPayload;
use crate::validate::{is_valid_email, is_valid_url, normalize};

/// A single failed field rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: &str) -> Self {
        FieldError {
            field,
            message: message.to_string(),
        }
    }
}

/// Validates the mapping form: required fields, lower-casing, scheme
/// normalization and URL syntax
pub fn validate_mapping_form(path: &str, url: &str) -> Result<MappingPayload, Vec<FieldError>> {
    let mut errors = Vec::new();

    let path = path.trim().to_lowercase();
    if path.is_empty() {
        errors.push(FieldError::new("path", "Path is required"));
    }

    let url = url.trim();
    let mut normalized = String::new();
    if url.is_empty() {
        errors.push(FieldError::new("url", "Long url is required."));
    } else {
        normalized = normalize(url);
        if !is_valid_url(&normalized) {
            errors.push(FieldError::new(
                "url",
                "The provided URL is not valid. Please try again.",
            ));
        }
    }

    if errors.is_empty() {
        Ok(MappingPayload {
            path,
            url: normalized,
        })
    } else {
        Err(errors)
    }
}

/// Validates the admin form and returns the lower-cased email
pub fn validate_admin_form(email: &str) -> Result<String, Vec<FieldError>> {
    let email = email.trim().to_lowercase();
    if email.is_empty() {
        return Err(vec![FieldError::new("email", "Email is required")]);
    }
    if !is_valid_email(&email) {
        return Err(vec![FieldError::new(
            "email",
            "Please provide a valid email address.",
        )]);
    }
    Ok(email)
}

/// Allows at most one in-flight submission per form
///
/// `begin` refuses while a submission is pending; `finish` re-arms after
/// the response settles, success or failure.
#[derive(Debug, Default)]
pub struct SubmitGuard {
    pending: bool,
}

impl SubmitGuard {
    pub fn new() -> Self {
        SubmitGuard::default()
    }

    pub fn begin(&mut self) -> bool {
        if self.pending {
            return false;
        }
        self.pending = true;
        true
    }

    pub fn finish(&mut self) {
        self.pending = false;
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }
}
