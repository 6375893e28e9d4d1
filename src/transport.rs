//! Authenticated transport to the shorty API
//!
//! Every call made by the resource clients funnels through
//! [`Transport::request`], which:
//! 1. Loads the persisted bearer token and fails fast with
//!    [`ApiError::NoToken`] before any network I/O
//! 2. Attaches `Authorization: Bearer <token>` to the outbound request
//! 3. Turns every non-2xx response into [`ApiError::Http`] carrying the
//!    status code callers branch on
//! 4. Decodes successful bodies as JSON, falling back to the raw text when
//!    the body is not JSON (204 deletes, plain-text endpoints)
//!
//! No retries happen here. Idempotent reads may be re-issued by the caching
//! layer; mutations are never repeated automatically to avoid duplicate
//! side effects.

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;
use crate::token::TokenStore;

/// A successful response body
///
/// Non-JSON success payloads are returned as raw text instead of failing;
/// this leniency keeps 204/empty responses unexceptional.
#[derive(Debug, Clone)]
pub enum ApiBody {
    Json(Value),
    Text(String),
}

impl ApiBody {
    /// Converts the body into a typed value
    ///
    /// A text fallback that does not parse as `T` surfaces as
    /// [`ApiError::Decode`].
    pub fn json<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        match self {
            ApiBody::Json(value) => Ok(serde_json::from_value(value)?),
            ApiBody::Text(raw) => Ok(serde_json::from_str(&raw)?),
        }
    }
}

/// HTTP transport that attaches the persisted bearer token
#[derive(Clone)]
pub struct Transport {
    http: Client,
    tokens: TokenStore,
}

impl Transport {
    pub fn new(tokens: TokenStore) -> Self {
        Transport {
            http: Client::new(),
            tokens,
        }
    }

    /// The token store backing this transport
    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    /// Issues an authenticated request and normalizes the outcome
    ///
    /// # Errors
    ///
    /// - [`ApiError::NoToken`] - no session token is persisted
    /// - [`ApiError::Http`] - the server answered with a non-2xx status
    /// - [`ApiError::Network`] - the request never completed
    pub async fn request(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
    ) -> Result<ApiBody, ApiError> {
        // Fail before any network I/O when there is no session
        let token = self.tokens.load().ok_or(ApiError::NoToken)?;

        let mut request = self
            .http
            .request(method.clone(), url)
            .header(AUTHORIZATION, format!("Bearer {}", token))
            .header(ACCEPT, "application/json");

        if let Some(body) = body {
            request = request
                .header(CONTENT_TYPE, "application/json")
                .json(body);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            tracing::debug!(%method, url, status = status.as_u16(), "request rejected");
            return Err(ApiError::Http {
                status: status.as_u16(),
                status_text: status
                    .canonical_reason()
                    .unwrap_or("unknown status")
                    .to_string(),
            });
        }

        let raw = response.text().await?;
        match serde_json::from_str::<Value>(&raw) {
            Ok(value) => Ok(ApiBody::Json(value)),
            Err(_) => {
                // Deliberate leniency: hand back the raw body instead of
                // failing on non-JSON success payloads
                tracing::debug!(url, "non-JSON success body, returning raw text");
                Ok(ApiBody::Text(raw))
            }
        }
    }
}
