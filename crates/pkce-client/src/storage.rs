//! Pluggable session storage for flow secrets
//!
//! The verifier and state must survive the page navigation between the
//! authorization redirect and the token exchange, so they live in a
//! caller-supplied key/value store rather than in the client instance.
//! Any durable medium works as long as it satisfies [`Storage`].

use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::{Error, Result};
use crate::pkce;

/// Storage key for the PKCE code verifier.
pub const VERIFIER_KEY: &str = "pkce_code_verifier";

/// Storage key for the CSRF state token.
pub const STATE_KEY: &str = "pkce_state";

/// A durable string key/value store.
///
/// The client only ever uses the two fixed keys above and manages no
/// expiry. Implementations may be session-scoped, persistent, or
/// in-memory.
pub trait Storage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
}

/// In-memory [`Storage`], scoped to wherever the handle is shared.
///
/// The default when no store is supplied. The mutex only exists to make
/// the map `Sync`; there is no cross-operation locking discipline here.
#[derive(Default)]
pub struct MemoryStorage {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        let values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        values.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        values.insert(key.to_string(), value.to_string());
    }
}

/// Binds flow secrets to the storage scope for one authorization attempt.
pub(crate) struct SessionBinder {
    storage: std::sync::Arc<dyn Storage>,
}

impl SessionBinder {
    pub(crate) fn new(storage: std::sync::Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Read `key`, or generate a fresh secret, persist it, and return it.
    pub(crate) fn get_or_create(&self, key: &str) -> String {
        match self.storage.get(key) {
            Some(value) => value,
            None => {
                let value = pkce::generate_secret();
                self.storage.set(key, &value);
                value
            }
        }
    }

    /// Unconditionally overwrite `key` (caller-pinned state).
    pub(crate) fn set(&self, key: &str, value: &str) {
        self.storage.set(key, value);
    }

    /// Read `key`, failing if no flow has stored it yet.
    pub(crate) fn require(&self, key: &'static str) -> Result<String> {
        self.storage.get(key).ok_or(Error::NotInitialized(key))
    }
}
