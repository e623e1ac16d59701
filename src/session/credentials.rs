//! Credential store: the only code that reads or writes session state.

use std::sync::Arc;

use campus_core::models::Principal;

use super::storage::KeyValueStorage;
use crate::error::StorageError;

/// Storage key for the bearer token.
pub const TOKEN_KEY: &str = "token";
/// Storage key for the cached principal profile.
pub const USER_KEY: &str = "user";

/// Handle over the session's token and cached principal.
///
/// Clones share the same underlying storage, so a session cleared through one
/// handle is gone for every holder.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    storage: Arc<dyn KeyValueStorage>,
}

impl CredentialStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    /// The stored token with any JSON quoting removed, or `None` when no
    /// usable token is stored.
    pub fn get_token(&self) -> Option<String> {
        self.storage.get(TOKEN_KEY).and_then(|raw| normalize_token(&raw))
    }

    pub fn set_token(&self, token: &str) -> Result<(), StorageError> {
        match normalize_token(token) {
            Some(token) => self.storage.set(TOKEN_KEY, &token),
            None => self.storage.remove(TOKEN_KEY),
        }
    }

    /// The cached principal.
    ///
    /// A profile that doesn't parse into a complete [`Principal`] is deleted
    /// and reported as absent.
    pub fn get_principal(&self) -> Option<Principal> {
        let raw = self.storage.get(USER_KEY)?;
        match serde_json::from_str::<Principal>(&raw) {
            Ok(principal) => Some(principal),
            Err(e) => {
                tracing::warn!("Removing corrupt stored user profile: {}", e);
                if let Err(e) = self.storage.remove(USER_KEY) {
                    tracing::error!("Failed to remove corrupt user profile: {}", e);
                }
                None
            }
        }
    }

    pub fn set_principal(&self, principal: &Principal) -> Result<(), StorageError> {
        let json = serde_json::to_string(principal)?;
        self.storage.set(USER_KEY, &json)
    }

    /// Remove token and profile.
    pub fn clear(&self) {
        for key in [TOKEN_KEY, USER_KEY] {
            if let Err(e) = self.storage.remove(key) {
                tracing::error!("Failed to remove `{}` from session storage: {}", key, e);
            }
        }
        tracing::info!("Session cleared");
    }

    pub fn has_token(&self) -> bool {
        self.get_token().is_some()
    }
}

/// Strip whitespace and incidental JSON quoting from a stored token.
///
/// `"abc"` and `abc` normalize to `abc`; a blank token normalizes to `None`.
pub fn normalize_token(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let unquoted = if trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"') {
        serde_json::from_str::<String>(trimmed)
            .unwrap_or_else(|_| trimmed[1..trimmed.len() - 1].to_string())
    } else {
        trimmed.to_string()
    };

    let token = unquoted.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}
