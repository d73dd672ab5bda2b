//! Persisted key-value mirror of the session.
//!
//! SYSTEM CONTEXT
//! ==============
//! The session store owns the in-memory session; this module is only the
//! durable copy that survives reloads. Browser builds write `localStorage`,
//! everything else (SSR, tests, non-browser hosts) uses `MemoryStorage` or
//! the no-op `LocalStorage` stub.

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::net::types::User;

pub const ACCESS_TOKEN_KEY: &str = "tm.access_token";
pub const REFRESH_TOKEN_KEY: &str = "tm.refresh_token";
pub const USER_KEY: &str = "tm.user";

/// Keys written by the older client. Removed on sight, never read.
pub const LEGACY_KEYS: [&str; 2] = ["userData", "token"];

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    #[error("persistent storage is not available")]
    Unavailable,
    #[error("failed to write `{key}`: {reason}")]
    Write { key: String, reason: String },
    #[error("failed to encode `{key}`: {reason}")]
    Encode { key: String, reason: String },
}

/// String key-value area at the platform boundary.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;

    /// # Errors
    ///
    /// Returns an error when the backing store rejects the write.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove(&self, key: &str);
}

/// Browser `localStorage`. A no-op outside `hydrate` builds.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalStorage;

#[cfg(feature = "hydrate")]
fn browser_storage() -> Option<web_sys::Storage> {
    match web_sys::window().map(|w| w.local_storage()) {
        Some(Ok(storage)) => storage,
        _ => None,
    }
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        #[cfg(feature = "hydrate")]
        {
            match browser_storage()?.get_item(key) {
                Ok(value) => value,
                Err(_) => None,
            }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _key = key;
            None
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        #[cfg(feature = "hydrate")]
        {
            let storage = browser_storage().ok_or(StorageError::Unavailable)?;
            storage.set_item(key, value).map_err(|e| StorageError::Write {
                key: key.to_owned(),
                reason: format!("{e:?}"),
            })
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _unused = (key, value);
            Err(StorageError::Unavailable)
        }
    }

    fn remove(&self, key: &str) {
        #[cfg(feature = "hydrate")]
        {
            if let Some(storage) = browser_storage() {
                if let Err(e) = storage.remove_item(key) {
                    log::warn!("storage remove failed for {key}: {e:?}");
                }
            }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _key = key;
        }
    }
}

/// In-process store. Clones share the same entries.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<BTreeMap<String, String>>>,
}

impl MemoryStorage {
    /// Copy of every stored entry.
    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).is_empty()
    }
}

impl KeyValueStore for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).remove(key);
    }
}

/// Load a JSON value stored under `key`. Undecodable entries read as absent.
pub fn load_json<S: KeyValueStore, T: DeserializeOwned>(store: &S, key: &str) -> Option<T> {
    let raw = store.get(key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("discarding undecodable {key}: {e}");
            None
        }
    }
}

/// Save `value` as JSON under `key`.
///
/// # Errors
///
/// Returns an error if encoding or the underlying write fails.
pub fn save_json<S: KeyValueStore, T: Serialize>(store: &S, key: &str, value: &T) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value).map_err(|e| StorageError::Encode {
        key: key.to_owned(),
        reason: e.to_string(),
    })?;
    store.set(key, &raw)
}

/// Read a token, treating blank values as absent.
pub fn load_token<S: KeyValueStore>(store: &S, key: &str) -> Option<String> {
    store
        .get(key)
        .map(|token| token.trim().to_owned())
        .filter(|token| !token.is_empty())
}

/// Write tokens and user. A missing refresh token removes any stale one.
///
/// # Errors
///
/// Returns the first storage error; earlier keys may already be written, so
/// callers clear the whole set on failure.
pub fn persist_session<S: KeyValueStore>(
    store: &S,
    access_token: &str,
    refresh_token: Option<&str>,
    user: &User,
) -> Result<(), StorageError> {
    store.set(ACCESS_TOKEN_KEY, access_token)?;
    match refresh_token {
        Some(token) => store.set(REFRESH_TOKEN_KEY, token)?,
        None => store.remove(REFRESH_TOKEN_KEY),
    }
    save_json(store, USER_KEY, user)
}

/// Remove every session key, current and legacy.
pub fn clear_session<S: KeyValueStore>(store: &S) {
    store.remove(ACCESS_TOKEN_KEY);
    store.remove(REFRESH_TOKEN_KEY);
    store.remove(USER_KEY);
    clear_legacy(store);
}

pub fn clear_legacy<S: KeyValueStore>(store: &S) {
    for key in LEGACY_KEYS {
        store.remove(key);
    }
}
