//! Environment-driven configuration
//!
//! All externally supplied settings live here: the base address of the
//! shorty REST API, the identity-provider endpoints used by the browser
//! login flow, and the location of the persisted bearer token.

use std::env;

/// Fixed OAuth scope requested by the login flow
pub const OAUTH_SCOPE: &str = "openid profile email groups";

/// Runtime configuration resolved from the environment
///
/// Every field has a development default so the tool works out of the box
/// against a locally running shorty stack.
///
/// # Environment Variables
///
/// - `SHORTY_API_URL` - Base URL of the shorty REST API (default: "http://localhost:8880")
/// - `SHORTY_AUTH_URL` - Base URL of the identity provider (default: "http://localhost:5556")
/// - `SHORTY_REDIRECT_URI` - Redirect URI registered for the login flow (default: "http://localhost:5173")
/// - `SHORTY_CLIENT_ID` - OAuth client id (default: "shortyfront")
/// - `SHORTY_TOKEN_FILE` - Path of the persisted bearer token (default: ".shorty-token")
#[derive(Clone, Debug)]
pub struct Config {
    /// Base URL of the shorty REST API, without a trailing slash
    pub api_url: String,

    /// Base URL of the identity provider (Dex)
    pub auth_url: String,

    /// Redirect URI registered with the identity provider
    pub redirect_uri: String,

    /// OAuth client id of this front-end
    pub client_id: String,

    /// File path where the bearer token is persisted
    pub token_file: String,
}

impl Config {
    /// Resolves the configuration from environment variables
    ///
    /// Call `dotenvy::dotenv()` first so a local `.env` file is honored.
    pub fn from_env() -> Self {
        let api_url =
            env::var("SHORTY_API_URL").unwrap_or_else(|_| "http://localhost:8880".to_string());
        let auth_url =
            env::var("SHORTY_AUTH_URL").unwrap_or_else(|_| "http://localhost:5556".to_string());
        let redirect_uri =
            env::var("SHORTY_REDIRECT_URI").unwrap_or_else(|_| "http://localhost:5173".to_string());
        let client_id =
            env::var("SHORTY_CLIENT_ID").unwrap_or_else(|_| "shortyfront".to_string());
        let token_file =
            env::var("SHORTY_TOKEN_FILE").unwrap_or_else(|_| ".shorty-token".to_string());

        Config {
            api_url: api_url.trim_end_matches('/').to_string(),
            auth_url: auth_url.trim_end_matches('/').to_string(),
            redirect_uri,
            client_id,
            token_file,
        }
    }

    /// Authorization endpoint of the identity provider
    pub fn authorization_endpoint(&self) -> String {
        format!("{}/dex/auth", self.auth_url)
    }

    /// Token endpoint of the identity provider
    pub fn token_endpoint(&self) -> String {
        format!("{}/dex/token", self.auth_url)
    }

    /// Collection endpoint for URL mappings: `{api}/admin/`
    pub fn mappings_endpoint(&self) -> String {
        format!("{}/admin/", self.api_url)
    }

    /// Collection endpoint for admin users: `{api}/admin/user`
    pub fn admin_users_endpoint(&self) -> String {
        format!("{}/admin/user", self.api_url)
    }

    /// Endpoint probed for the admin capability header: `{api}/v1/`
    pub fn probe_endpoint(&self) -> String {
        format!("{}/v1/", self.api_url)
    }
}
