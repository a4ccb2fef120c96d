//! In-memory session store.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use super::SessionStore;
use crate::AuthResult;
use crate::error::AuthError;

/// Session store backed by a shared `HashMap`.
///
/// Clones share the same map, which mirrors several views reading one
/// browser storage area.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemorySessionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `entries`.
    #[must_use]
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            entries: Arc::new(RwLock::new(map)),
        }
    }

    /// Returns a copy of every entry.
    #[must_use]
    pub fn snapshot(&self) -> HashMap<String, String> {
        self.entries
            .read()
            .map(|map| map.clone())
            .unwrap_or_default()
    }
}

fn poisoned() -> AuthError {
    AuthError::storage("session map lock poisoned")
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, key: &str) -> AuthResult<Option<String>> {
        let map = self.entries.read().map_err(|_| poisoned())?;
        Ok(map.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> AuthResult<()> {
        let mut map = self.entries.write().map_err(|_| poisoned())?;
        map.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> AuthResult<()> {
        let mut map = self.entries.write().map_err(|_| poisoned())?;
        map.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        tokio_test::block_on(async {
            let store = MemorySessionStore::new();
            assert_eq!(store.get("access").await.unwrap(), None);

            store.set("access", "abc").await.unwrap();
            assert_eq!(store.get("access").await.unwrap().as_deref(), Some("abc"));

            store.set("access", "def").await.unwrap();
            assert_eq!(store.get("access").await.unwrap().as_deref(), Some("def"));

            store.remove("access").await.unwrap();
            assert_eq!(store.get("access").await.unwrap(), None);

            // Removing twice is fine
            store.remove("access").await.unwrap();
        });
    }

    #[tokio::test]
    async fn test_clones_share_entries() {
        let store = MemorySessionStore::with_entries([("user_role", "sotuvchi")]);
        let other = store.clone();

        other.set("has_company", "1").await.unwrap();

        let entries = store.snapshot();
        assert_eq!(entries.get("user_role").map(String::as_str), Some("sotuvchi"));
        assert_eq!(entries.get("has_company").map(String::as_str), Some("1"));
    }
}
