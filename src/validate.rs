//! Client-side syntax validation
//!
//! Candidate URLs are checked before anything is submitted so the common
//! typos never reach the API. The policy is deliberately strict: only
//! absolute http/https URLs with a named host carrying a top-level domain
//! are accepted. The server performs its own validation again; this layer
//! only exists for immediate feedback.

use url::Url;

/// Longest accepted URL, matching the common validator cut-off
const MAX_URL_LEN: usize = 2084;

/// Normalizes raw form input before validation
///
/// Lower-cases the input and prepends `https://` when no http(s) scheme is
/// present, so `Example.COM/Docs` becomes `https://example.com/docs`.
pub fn normalize(input: &str) -> String {
    let lowered = input.to_lowercase();
    if lowered.starts_with("http://") || lowered.starts_with("https://") {
        lowered
    } else {
        format!("https://{}", lowered)
    }
}

/// Decides whether `candidate` is an absolute URL suitable for redirection
///
/// Policy:
/// - scheme must be `http` or `https` and must be present (protocol-relative
///   input is rejected outright)
/// - the host must be a named domain with a top-level domain; IP literals,
///   underscores, empty labels and a trailing dot are rejected
/// - optional port, query, fragment and userinfo are allowed
///
/// Pure and deterministic; returns only pass/fail.
pub fn is_valid_url(candidate: &str) -> bool {
    if candidate.is_empty() || candidate.len() > MAX_URL_LEN {
        return false;
    }
    // Protocol-relative form is never acceptable as a redirect target
    if candidate.starts_with("//") {
        return false;
    }
    // Nor is a smuggled one: extra slashes after the scheme would otherwise
    // be ignored by the URL parser
    if let Some((_, rest)) = candidate.split_once("://") {
        if rest.starts_with('/') {
            return false;
        }
    }

    let parsed = match Url::parse(candidate) {
        Ok(parsed) => parsed,
        Err(_) => return false,
    };

    match parsed.scheme() {
        "http" | "https" => {}
        _ => return false,
    }

    match parsed.host_str() {
        Some(host) if !host.is_empty() => valid_hostname(host),
        _ => false,
    }
}

/// Checks the host part: named domain, TLD required, conservative charset
fn valid_hostname(host: &str) -> bool {
    if host.contains('_') || host.ends_with('.') {
        return false;
    }
    // IPv6 literals come through bracketed
    if host.starts_with('[') {
        return false;
    }

    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() < 2 {
        return false;
    }
    if labels.iter().any(|label| label.is_empty()) {
        return false;
    }

    // The final label must look like a TLD; this also rejects IPv4 literals
    let tld = labels[labels.len() - 1];
    if tld.len() < 2 || !tld.chars().all(|c| c.is_ascii_alphabetic()) {
        return false;
    }

    labels.iter().all(|label| {
        label
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
            && !label.starts_with('-')
            && !label.ends_with('-')
    })
}

/// Minimal email shape check for the admin form
///
/// Exactly one `@`, a non-empty local part and a dotted domain. Anything
/// fancier is the identity provider's problem.
pub fn is_valid_email(email: &str) -> bool {
    if email.is_empty() || email.contains(char::is_whitespace) {
        return false;
    }
    if email.matches('@').count() != 1 {
        return false;
    }
    let (local, domain) = match email.split_once('@') {
        Some(parts) => parts,
        None => return false,
    };
    !local.is_empty()
        && !domain.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}
