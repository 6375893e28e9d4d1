//! Mutation coordinators for the mapping and admin-user resources
//!
//! Each coordinator owns a resource client, the shared read cache and a
//! message board. The flow for every mutation is the same:
//!
//! 1. call the client
//! 2. on success, invalidate the collection key and revalidate it exactly
//!    once so the next render sees the mutation
//! 3. set a transient success or error message, mapping HTTP status codes
//!    (400 invalid, 409 conflict) to specific texts
//!
//! Errors are also returned to the caller, but they never escape this
//! layer unmapped: anything user-visible comes off the message board.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use crate::cache::{ReadCache, ADMIN_USERS_KEY, URLS_KEY};
use crate::client::{AdminClient, UrlClient};
use crate::error::ApiError;
use crate::model::{MappingPayload, Message, UrlMapping};

/// How long mapping form and list messages stay visible
pub const MESSAGE_TTL: Duration = Duration::from_secs(3);

/// The admin form keeps its messages a beat longer
pub const ADMIN_MESSAGE_TTL: Duration = Duration::from_secs(4);

const MSG_UNEXPECTED: &str = "An unexpected error occurred. Please try again later.";
const MSG_INVALID_URL_INPUT: &str = "Invalid input. Please check the url and try again.";
const MSG_INVALID_ADMIN_INPUT: &str = "Invalid input. Please check the data and try again.";
const MSG_SHORTENED: &str = "URL has been shortened successfully!";
const MSG_UPDATED: &str = "Path updated successfully!";
const MSG_UPDATE_FAILED: &str = "Failed to update path. Please try again later.";
const MSG_DELETE_FAILED: &str = "Failed to delete path. Please try again later.";
const MSG_ADMIN_ADDED: &str = "email is added as admin successfully!";
const MSG_ADMIN_DELETED: &str = "email deleted successfully!";
const MSG_ADMIN_DELETE_FAILED: &str = "Failed to delete admin user.";

struct Timed {
    message: Message,
    expires_at: Instant,
}

impl Timed {
    fn new(message: Message, now: Instant, ttl: Duration) -> Self {
        Timed {
            message,
            expires_at: now + ttl,
        }
    }

    fn live(&self, now: Instant) -> Option<&Message> {
        (now < self.expires_at).then_some(&self.message)
    }
}

/// Transient messages for one page: a form slot, a list slot, and per-row
/// slots keyed by stable entity identity (path or email, never position)
#[derive(Default)]
pub struct MessageBoard {
    form: Option<Timed>,
    list: Option<Timed>,
    rows: HashMap<String, Timed>,
}

impl MessageBoard {
    fn set_form(&mut self, message: Message, now: Instant, ttl: Duration) {
        self.form = Some(Timed::new(message, now, ttl));
    }

    fn set_list(&mut self, message: Message, now: Instant, ttl: Duration) {
        self.list = Some(Timed::new(message, now, ttl));
    }

    fn set_row(&mut self, key: &str, message: Message, now: Instant, ttl: Duration) {
        self.rows
            .insert(key.to_string(), Timed::new(message, now, ttl));
    }

    fn form(&self, now: Instant) -> Option<Message> {
        self.form.as_ref().and_then(|t| t.live(now)).cloned()
    }

    fn list(&self, now: Instant) -> Option<Message> {
        self.list.as_ref().and_then(|t| t.live(now)).cloned()
    }

    fn row(&self, key: &str, now: Instant) -> Option<Message> {
        self.rows.get(key).and_then(|t| t.live(now)).cloned()
    }

    fn clear_form(&mut self) {
        self.form = None;
    }

    /// Drops every expired entry; called on user action, matching the
    /// "auto-clear or next action" lifecycle
    fn purge_expired(&mut self, now: Instant) {
        if self.form.as_ref().is_some_and(|t| t.live(now).is_none()) {
            self.form = None;
        }
        if self.list.as_ref().is_some_and(|t| t.live(now).is_none()) {
            self.list = None;
        }
        self.rows.retain(|_, t| t.live(now).is_some());
    }
}

fn mapping_create_message(path: &str, err: &ApiError) -> String {
    match err.status() {
        Some(409) => format!("Path \"{}\" already exists.", path),
        Some(400) => MSG_INVALID_URL_INPUT.to_string(),
        _ => MSG_UNEXPECTED.to_string(),
    }
}

fn admin_create_message(email: &str, err: &ApiError) -> String {
    match err.status() {
        Some(409) => format!("Email \"{}\" already exists as an admin user.", email),
        Some(400) => MSG_INVALID_ADMIN_INPUT.to_string(),
        _ => MSG_UNEXPECTED.to_string(),
    }
}

/// Coordinator for URL-mapping reads and mutations
pub struct PathActions {
    client: UrlClient,
    cache: Arc<ReadCache>,
    board: Mutex<MessageBoard>,
}

impl PathActions {
    pub fn new(client: UrlClient, cache: Arc<ReadCache>) -> Self {
        PathActions {
            client,
            cache,
            board: Mutex::new(MessageBoard::default()),
        }
    }

    /// Current mapping collection: cache hit when fresh, fetch otherwise
    pub async fn mappings(&self) -> Result<Vec<UrlMapping>, ApiError> {
        if let Some(cached) = self.cache.get::<Vec<UrlMapping>>(URLS_KEY) {
            return Ok(cached);
        }
        let fresh = self.client.list().await?;
        self.cache.store(URLS_KEY, &fresh);
        Ok(fresh)
    }

    /// Invalidate and refetch the collection once after a mutation
    async fn revalidate(&self) {
        self.cache.invalidate(URLS_KEY);
        match self.client.list().await {
            Ok(fresh) => self.cache.store(URLS_KEY, &fresh),
            // Leave the key stale so the next read refetches
            Err(err) => tracing::warn!(%err, "revalidation of mappings failed"),
        }
    }

    /// Submits a new mapping from the form
    pub async fn submit(&self, payload: &MappingPayload, now: Instant) -> Result<(), ApiError> {
        self.purge(now);
        match self.client.add(payload).await {
            Ok(()) => {
                self.revalidate().await;
                self.lock()
                    .set_form(Message::success(MSG_SHORTENED), now, MESSAGE_TTL);
                Ok(())
            }
            Err(err) => {
                let text = mapping_create_message(&payload.path, &err);
                self.lock().set_form(Message::error(text), now, MESSAGE_TTL);
                Err(err)
            }
        }
    }

    /// Saves an in-place edit of an existing mapping
    pub async fn update(&self, payload: &MappingPayload, now: Instant) -> Result<(), ApiError> {
        self.purge(now);
        match self.client.update(payload).await {
            Ok(()) => {
                self.revalidate().await;
                self.lock()
                    .set_row(&payload.path, Message::success(MSG_UPDATED), now, MESSAGE_TTL);
                Ok(())
            }
            Err(err) => {
                self.lock().set_row(
                    &payload.path,
                    Message::error(MSG_UPDATE_FAILED),
                    now,
                    MESSAGE_TTL,
                );
                Err(err)
            }
        }
    }

    /// Deletes a mapping by path
    pub async fn delete(&self, path: &str, now: Instant) -> Result<(), ApiError> {
        self.purge(now);
        match self.client.remove(path).await {
            Ok(()) => {
                self.revalidate().await;
                let text = format!("Path \"{}\" deleted successfully!", path);
                self.lock()
                    .set_list(Message::success(text), now, MESSAGE_TTL);
                Ok(())
            }
            Err(err) => {
                self.lock()
                    .set_list(Message::error(MSG_DELETE_FAILED), now, MESSAGE_TTL);
                Err(err)
            }
        }
    }

    pub fn form_message(&self, now: Instant) -> Option<Message> {
        self.lock().form(now)
    }

    pub fn list_message(&self, now: Instant) -> Option<Message> {
        self.lock().list(now)
    }

    pub fn row_message(&self, path: &str, now: Instant) -> Option<Message> {
        self.lock().row(path, now)
    }

    pub fn clear_form_message(&self) {
        self.lock().clear_form();
    }

    fn purge(&self, now: Instant) {
        self.lock().purge_expired(now);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MessageBoard> {
        self.board.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Coordinator for admin-user reads and mutations
pub struct AdminActions {
    client: AdminClient,
    cache: Arc<ReadCache>,
    board: Mutex<MessageBoard>,
}

impl AdminActions {
    pub fn new(client: AdminClient, cache: Arc<ReadCache>) -> Self {
        AdminActions {
            client,
            cache,
            board: Mutex::new(MessageBoard::default()),
        }
    }

    /// Current admin list: cache hit when fresh, fetch otherwise
    pub async fn admins(&self) -> Result<Vec<String>, ApiError> {
        if let Some(cached) = self.cache.get::<Vec<String>>(ADMIN_USERS_KEY) {
            return Ok(cached);
        }
        let fresh = self.client.list().await?;
        self.cache.store(ADMIN_USERS_KEY, &fresh);
        Ok(fresh)
    }

    async fn revalidate(&self) {
        self.cache.invalidate(ADMIN_USERS_KEY);
        match self.client.list().await {
            Ok(fresh) => self.cache.store(ADMIN_USERS_KEY, &fresh),
            Err(err) => tracing::warn!(%err, "revalidation of admin users failed"),
        }
    }

    /// Grants admin rights to an email address
    pub async fn add(&self, email: &str, now: Instant) -> Result<(), ApiError> {
        self.lock().purge_expired(now);
        match self.client.add(email).await {
            Ok(()) => {
                self.revalidate().await;
                self.lock()
                    .set_form(Message::success(MSG_ADMIN_ADDED), now, ADMIN_MESSAGE_TTL);
                Ok(())
            }
            Err(err) => {
                let text = admin_create_message(email, &err);
                self.lock()
                    .set_form(Message::error(text), now, ADMIN_MESSAGE_TTL);
                Err(err)
            }
        }
    }

    /// Revokes admin rights
    pub async fn remove(&self, email: &str, now: Instant) -> Result<(), ApiError> {
        self.lock().purge_expired(now);
        match self.client.remove(email).await {
            Ok(()) => {
                self.revalidate().await;
                self.lock()
                    .set_row(email, Message::success(MSG_ADMIN_DELETED), now, ADMIN_MESSAGE_TTL);
                Ok(())
            }
            Err(err) => {
                self.lock().set_row(
                    email,
                    Message::error(MSG_ADMIN_DELETE_FAILED),
                    now,
                    ADMIN_MESSAGE_TTL,
                );
                Err(err)
            }
        }
    }

    pub fn form_message(&self, now: Instant) -> Option<Message> {
        self.lock().form(now)
    }

    pub fn row_message(&self, email: &str, now: Instant) -> Option<Message> {
        self.lock().row(email, now)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MessageBoard> {
        self.board.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
