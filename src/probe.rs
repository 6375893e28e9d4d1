//! Admin-authorization probe
//!
//! The API reports whether the bearer of the current token is an
//! administrator through the `x-is-admin` response header on `{api}/v1/`.
//! The probe derives a process-wide boolean capability from that header
//! and refreshes it in the background every five minutes.
//!
//! Every failure path - missing token, network error, non-2xx status,
//! absent or malformed header - reads as "not admin". The flag gates UI
//! affordances only; the server enforces authorization on every call.

use std::time::Duration;

use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use tokio::sync::watch;

use crate::config::Config;
use crate::token::TokenStore;

/// Response header carrying the admin capability
pub const ADMIN_HEADER: &str = "x-is-admin";

/// How often the capability is re-derived
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// One-shot probe; fail closed on every error path
pub async fn fetch_is_admin(http: &Client, probe_url: &str, tokens: &TokenStore) -> bool {
    let token = match tokens.load() {
        Some(token) => token,
        None => return false,
    };

    let response = match http
        .get(probe_url)
        .header(AUTHORIZATION, format!("Bearer {}", token))
        .send()
        .await
    {
        Ok(response) => response,
        Err(err) => {
            tracing::warn!(%err, "admin probe request failed");
            return false;
        }
    };

    if !response.status().is_success() {
        return false;
    }

    response
        .headers()
        .get(ADMIN_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(|value| value == "true")
        .unwrap_or(false)
}

/// Probes once with a fresh client; used by one-shot callers
pub async fn probe_once(config: &Config, tokens: &TokenStore) -> bool {
    fetch_is_admin(&Client::new(), &config.probe_endpoint(), tokens).await
}

/// Background admin probe exposing the capability as a watch channel
///
/// The first probe fires immediately on spawn; consumers read the current
/// flag without triggering any fetch of their own.
pub struct AdminProbe {
    rx: watch::Receiver<bool>,
}

impl AdminProbe {
    pub fn spawn(config: &Config, tokens: TokenStore) -> AdminProbe {
        let (tx, rx) = watch::channel(false);
        let probe_url = config.probe_endpoint();

        tokio::spawn(async move {
            let http = Client::new();
            let mut ticker = tokio::time::interval(REFRESH_INTERVAL);
            loop {
                // First tick completes immediately
                ticker.tick().await;
                let is_admin = fetch_is_admin(&http, &probe_url, &tokens).await;
                tracing::debug!(is_admin, "admin probe refreshed");
                if tx.send(is_admin).is_err() {
                    // No receivers left, stop probing
                    break;
                }
            }
        });

        AdminProbe { rx }
    }

    /// Current capability; defaults to false until the first probe lands
    pub fn is_admin(&self) -> bool {
        *self.rx.borrow()
    }

    /// A receiver other tasks can await changes on
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.rx.clone()
    }

    /// Waits for the next refresh and returns the new value
    pub async fn changed(&mut self) -> bool {
        // A closed channel means the probe task ended; stay fail-closed
        if self.rx.changed().await.is_err() {
            return false;
        }
        *self.rx.borrow()
    }
}
