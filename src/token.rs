//! Persisted bearer token
//!
//! The login flow (browser + identity provider) produces an access token
//! that is handed to this store. The token is kept in a single file as a
//! quoted string; quotes are stripped on load so callers always see the
//! bare token.

use std::fs;
use std::io;
use std::path::PathBuf;

/// File-backed store for the session bearer token
#[derive(Clone, Debug)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        TokenStore { path: path.into() }
    }

    /// Loads the persisted token, if any
    ///
    /// Strips surrounding quotes and whitespace. A missing, unreadable or
    /// empty file reads as "no session".
    pub fn load(&self) -> Option<String> {
        let raw = fs::read_to_string(&self.path).ok()?;
        let token: String = raw.trim().replace('"', "");
        if token.is_empty() {
            None
        } else {
            Some(token)
        }
    }

    /// Persists a token in the quoted form the login flow uses
    pub fn save(&self, token: &str) -> io::Result<()> {
        fs::write(&self.path, format!("\"{}\"", token.trim()))
    }

    /// Removes the persisted token; clearing an absent token is not an error
    pub fn clear(&self) -> io::Result<()> {
        match fs::remove_file(&self.path) {
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }
}
