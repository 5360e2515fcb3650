//! # Local storage token store: browser-side persistence
//!
//! [`LocalStorageTokenStore`] keeps the access token in `window.localStorage`
//! under a fixed key, so a reload keeps the member signed in.
//!
//! Storage errors (private browsing, disabled storage) are logged, never
//! returned: an unavailable store degrades to "no token", which the session
//! treats as logged out.

use crate::token::{TokenStore, DEFAULT_TOKEN_KEY};

#[derive(Clone, Debug)]
pub struct LocalStorageTokenStore {
    key: String,
}

impl Default for LocalStorageTokenStore {
    fn default() -> Self {
        Self::new(DEFAULT_TOKEN_KEY)
    }
}

impl LocalStorageTokenStore {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok().flatten()
    }
}

impl TokenStore for LocalStorageTokenStore {
    fn load(&self) -> Option<String> {
        Self::storage()?
            .get_item(&self.key)
            .ok()
            .flatten()
            .filter(|t| !t.is_empty())
    }

    fn save(&self, token: &str) {
        let Some(storage) = Self::storage() else {
            tracing::warn!("Local storage unavailable, token not persisted");
            return;
        };
        if storage.set_item(&self.key, token).is_err() {
            tracing::warn!("Failed to persist token under {}", self.key);
        }
    }

    fn clear(&self) {
        let Some(storage) = Self::storage() else {
            tracing::warn!("Local storage unavailable, token not cleared");
            return;
        };
        if storage.remove_item(&self.key).is_err() {
            tracing::warn!("Failed to clear token under {}", self.key);
        }
    }
}
