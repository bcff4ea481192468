//! Key-Value store wrapper with automatic serialization.

use std::sync::Arc;

use crate::{CacheError, MemoryStore};
use serde::{de::DeserializeOwned, Serialize};

/// Raw byte-level key-value storage.
///
/// Implementations stand in for the browser's local storage: a handful of
/// small values keyed by string, read on startup and rewritten on change.
pub trait KvStore: Send + Sync {
    /// Read the bytes stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    /// Replace the bytes stored under `key`.
    fn set(&self, key: &str, value: &[u8]) -> Result<(), CacheError>;

    /// Remove `key`. Removing a missing key is not an error.
    fn delete(&self, key: &str) -> Result<(), CacheError>;

    /// Check whether `key` holds a value.
    fn exists(&self, key: &str) -> Result<bool, CacheError> {
        Ok(self.get(key)?.is_some())
    }

    /// List every stored key.
    fn keys(&self) -> Result<Vec<String>, CacheError>;
}

/// Type-safe cache on top of a [`KvStore`].
///
/// Provides automatic JSON serialization for any type that implements
/// `Serialize` and `DeserializeOwned`. Cloning is cheap; clones share the
/// same backing store.
#[derive(Clone)]
pub struct Cache {
    store: Arc<dyn KvStore>,
    namespace: Option<String>,
}

impl Cache {
    /// Wrap an existing store.
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self {
            store,
            namespace: None,
        }
    }

    /// Open a process-local, non-durable cache.
    ///
    /// # Example
    ///
    /// ```
    /// let cache = vatika_cache::Cache::in_memory();
    /// cache.set("greeting", &"hello").unwrap();
    /// assert_eq!(cache.get::<String>("greeting").unwrap().as_deref(), Some("hello"));
    /// ```
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Prefix every key with `namespace:`.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Get a value from the cache.
    ///
    /// Returns `None` if the key doesn't exist.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let cart: Option<PersistedCart> = cache.get("cart")?;
    /// ```
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        match self.store.get(&self.full_key(key))? {
            Some(bytes) => {
                let value: T = serde_json::from_slice(&bytes)?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Set a value in the cache.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// cache.set("cart", &persisted)?;
    /// ```
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), CacheError> {
        let bytes = serde_json::to_vec(value)?;
        self.store.set(&self.full_key(key), &bytes)
    }

    /// Delete a value from the cache.
    pub fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.store.delete(&self.full_key(key))
    }

    /// Check if a key exists in the cache.
    pub fn exists(&self, key: &str) -> Result<bool, CacheError> {
        self.store.exists(&self.full_key(key))
    }

    /// Get all keys visible through this cache (namespace stripped).
    pub fn keys(&self) -> Result<Vec<String>, CacheError> {
        let keys = self.store.keys()?;
        Ok(match &self.namespace {
            Some(ns) => {
                let prefix = format!("{}:", ns);
                keys.into_iter()
                    .filter_map(|k| k.strip_prefix(&prefix).map(str::to_string))
                    .collect()
            }
            None => keys,
        })
    }

    fn full_key(&self, key: &str) -> String {
        match &self.namespace {
            Some(ns) => format!("{}:{}", ns, key),
            None => key.to_string(),
        }
    }
}

impl std::fmt::Debug for Cache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cache")
            .field("namespace", &self.namespace)
            .finish_non_exhaustive()
    }
}

/// Helper to build cache keys with namespacing.
///
/// # Example
///
/// ```
/// let key = vatika_cache::cache_key!("cart", "session-1");
/// assert_eq!(key, "cart:session-1");
/// ```
#[macro_export]
macro_rules! cache_key {
    ($prefix:expr, $($part:expr),+) => {{
        let mut key = String::from($prefix);
        $(
            key.push(':');
            key.push_str(&$part.to_string());
        )+
        key
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Line {
        id: String,
        quantity: u32,
    }

    #[test]
    fn test_set_and_get_typed() {
        let cache = Cache::in_memory();
        let lines = vec![Line {
            id: "a".into(),
            quantity: 2,
        }];
        cache.set("cart", &lines).unwrap();

        let loaded: Vec<Line> = cache.get("cart").unwrap().unwrap();
        assert_eq!(loaded, lines);
    }

    #[test]
    fn test_missing_key() {
        let cache = Cache::in_memory();
        let value: Option<String> = cache.get("nothing").unwrap();
        assert!(value.is_none());
        assert!(!cache.exists("nothing").unwrap());
    }

    #[test]
    fn test_delete() {
        let cache = Cache::in_memory();
        cache.set("user", &"u1").unwrap();
        cache.delete("user").unwrap();
        assert!(!cache.exists("user").unwrap());
        // Deleting twice is fine
        cache.delete("user").unwrap();
    }

    #[test]
    fn test_corrupt_value_is_serialize_error() {
        let store = Arc::new(MemoryStore::new());
        store.set("cart", b"{not json").unwrap();
        let cache = Cache::new(store);

        let result: Result<Option<Vec<Line>>, _> = cache.get("cart");
        assert!(matches!(result, Err(CacheError::SerializeError(_))));
    }

    #[test]
    fn test_namespace_isolation() {
        let store: Arc<dyn KvStore> = Arc::new(MemoryStore::new());
        let a = Cache::new(store.clone()).with_namespace("tab-a");
        let b = Cache::new(store.clone()).with_namespace("tab-b");

        a.set("cart", &1u32).unwrap();
        assert_eq!(b.get::<u32>("cart").unwrap(), None);
        assert_eq!(a.keys().unwrap(), vec!["cart".to_string()]);
        assert_eq!(store.keys().unwrap(), vec!["tab-a:cart".to_string()]);
    }

    #[test]
    fn test_cache_key_macro() {
        assert_eq!(cache_key!("cart", "s1"), "cart:s1");
        assert_eq!(cache_key!("user", 7, "profile"), "user:7:profile");
    }
}
