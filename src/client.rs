//! Resource clients for the shorty REST API
//!
//! Thin request builders composing the authenticated transport with a
//! fixed resource path, one client per resource. No policy lives here:
//! error mapping is the action layer's job and caching is the read
//! cache's job.

use reqwest::Method;
use serde_json::json;

use crate::config::Config;
use crate::error::ApiError;
use crate::model::{MappingPayload, UrlMapping};
use crate::transport::Transport;

/// Client for the URL-mapping collection at `{api}/admin/`
#[derive(Clone)]
pub struct UrlClient {
    transport: Transport,
    endpoint: String,
}

impl UrlClient {
    pub fn new(transport: Transport, config: &Config) -> Self {
        UrlClient {
            transport,
            endpoint: config.mappings_endpoint(),
        }
    }

    /// Fetches all mappings visible to the current principal
    pub async fn list(&self) -> Result<Vec<UrlMapping>, ApiError> {
        self.transport
            .request(Method::GET, &self.endpoint, None)
            .await?
            .json()
    }

    /// Creates a new mapping; 409 means the path is already taken
    pub async fn add(&self, payload: &MappingPayload) -> Result<(), ApiError> {
        let body = json!({ "path": payload.path, "url": payload.url });
        self.transport
            .request(Method::POST, &self.endpoint, Some(&body))
            .await?;
        Ok(())
    }

    /// Updates the target URL of an existing mapping
    pub async fn update(&self, payload: &MappingPayload) -> Result<(), ApiError> {
        let url = format!("{}{}", self.endpoint, payload.path);
        let body = json!({ "path": payload.path, "url": payload.url });
        self.transport
            .request(Method::PATCH, &url, Some(&body))
            .await?;
        Ok(())
    }

    /// Deletes a mapping by path
    pub async fn remove(&self, path: &str) -> Result<(), ApiError> {
        let url = format!("{}{}", self.endpoint, path);
        self.transport.request(Method::DELETE, &url, None).await?;
        Ok(())
    }
}

/// Client for the admin-user collection at `{api}/admin/user`
#[derive(Clone)]
pub struct AdminClient {
    transport: Transport,
    endpoint: String,
}

impl AdminClient {
    pub fn new(transport: Transport, config: &Config) -> Self {
        AdminClient {
            transport,
            endpoint: config.admin_users_endpoint(),
        }
    }

    /// Fetches the admin email list; an empty or non-JSON body reads as "no admins"
    pub async fn list(&self) -> Result<Vec<String>, ApiError> {
        let body = self
            .transport
            .request(Method::GET, &self.endpoint, None)
            .await?;
        // The endpoint answers an empty body when no admins exist yet
        match body {
            crate::transport::ApiBody::Text(raw) if raw.trim().is_empty() => Ok(Vec::new()),
            other => other.json(),
        }
    }

    /// Grants admin rights to an email; 409 means it is already an admin
    pub async fn add(&self, email: &str) -> Result<(), ApiError> {
        let body = json!({ "email": email });
        self.transport
            .request(Method::POST, &self.endpoint, Some(&body))
            .await?;
        Ok(())
    }

    /// Revokes admin rights
    pub async fn remove(&self, email: &str) -> Result<(), ApiError> {
        let url = format!("{}/{}", self.endpoint, email);
        self.transport.request(Method::DELETE, &url, None).await?;
        Ok(())
    }
}
