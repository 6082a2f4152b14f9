//! The persisted session: a bearer token and a user record
//!
//! Two keys in one storage namespace. They are written together, cleared
//! together, and only ever read back as a complete pair.

use super::store::{KeyValueStore, StorageError};
use super::user::User;
use std::sync::Arc;

pub const DEFAULT_TOKEN_KEY: &str = "token";
pub const DEFAULT_USER_KEY: &str = "usuario";

/// Token and user as read back from storage
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedSession {
    pub token: String,
    pub user: User,
}

/// Session persistence over a [`KeyValueStore`]
#[derive(Clone)]
pub struct SessionStore {
    backend: Arc<dyn KeyValueStore>,
    token_key: String,
    user_key: String,
}

impl SessionStore {
    /// Store using the default `token` / `usuario` keys
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self::with_keys(backend, DEFAULT_TOKEN_KEY, DEFAULT_USER_KEY)
    }

    pub fn with_keys(
        backend: Arc<dyn KeyValueStore>,
        token_key: impl Into<String>,
        user_key: impl Into<String>,
    ) -> Self {
        Self { backend, token_key: token_key.into(), user_key: user_key.into() }
    }

    pub fn token_key(&self) -> &str {
        &self.token_key
    }

    pub fn user_key(&self) -> &str {
        &self.user_key
    }

    /// Read the stored pair
    ///
    /// A missing half, or a user record that no longer parses, reads as
    /// no session at all.
    pub fn load(&self) -> Result<Option<PersistedSession>, StorageError> {
        let token = self.backend.get(&self.token_key)?;
        let user = self.backend.get(&self.user_key)?;

        match (token, user) {
            (Some(token), Some(user)) => match serde_json::from_str::<User>(&user) {
                Ok(user) => Ok(Some(PersistedSession { token, user })),
                Err(e) => {
                    log::warn!("Stored user record is unreadable: {}", e);
                    Ok(None)
                }
            },
            (None, None) => Ok(None),
            _ => {
                log::warn!("Stored session is incomplete, ignoring it");
                Ok(None)
            }
        }
    }

    /// Persist both halves; on failure neither is left behind
    pub fn save(&self, token: &str, user: &User) -> Result<(), StorageError> {
        let user_json = serde_json::to_string(user)?;

        let result = self
            .backend
            .set(&self.token_key, token)
            .and_then(|_| self.backend.set(&self.user_key, &user_json));

        if result.is_err() {
            // Best effort, the original error is the one worth reporting
            let _ = self.clear();
        }
        result
    }

    /// Replace the stored user record, leaving the token untouched
    pub fn save_user(&self, user: &User) -> Result<(), StorageError> {
        let user_json = serde_json::to_string(user)?;
        self.backend.set(&self.user_key, &user_json)
    }

    /// Remove both keys; clearing an empty store is a no-op
    pub fn clear(&self) -> Result<(), StorageError> {
        let token = self.backend.remove(&self.token_key);
        let user = self.backend.remove(&self.user_key);
        token.and(user)
    }

    /// True when either key is still present
    pub fn has_any(&self) -> Result<bool, StorageError> {
        Ok(self.backend.contains(&self.token_key)? || self.backend.contains(&self.user_key)?)
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("token_key", &self.token_key)
            .field("user_key", &self.user_key)
            .finish_non_exhaustive()
    }
}
