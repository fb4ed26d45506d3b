//! Memoization of expensive model instances.
//!
//! Classification, generation, and embedding back ends are costly to
//! construct, so the application caches one instance per configuration key.
//! The cache is an explicit abstraction rather than process-wide mutable
//! globals: create-on-miss, shared ownership through `Arc`, and no eviction
//! at this scale.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex};

use thiserror::Error;

/// Errors raised by [`ModelCache`].
#[derive(Debug, Error, PartialEq)]
pub enum CacheError<E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    /// The cache mutex was poisoned by a previous panic.
    #[error("cache mutex was poisoned by a previous panic")]
    Poisoned,
    /// The factory failed while building the missing entry.
    #[error("failed to build cached instance: {0}")]
    Build(#[source] E),
}

/// Keyed cache of shared model instances.
///
/// # Examples
///
/// ```
/// use tst_eval::ModelCache;
///
/// let cache: ModelCache<String, usize> = ModelCache::new();
/// let value = cache
///     .get_or_try_insert("answer".to_string(), || Ok::<_, std::io::Error>(42))
///     .expect("factory succeeds");
/// assert_eq!(*value, 42);
/// ```
#[derive(Debug, Default)]
pub struct ModelCache<K, V> {
    entries: Mutex<HashMap<K, Arc<V>>>,
}

impl<K, V> ModelCache<K, V>
where
    K: Eq + Hash,
{
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Return the cached instance for `key`, building it with `factory` on a
    /// miss. Factory errors propagate and cache nothing, so a later call
    /// retries the construction.
    ///
    /// The lock is held across the factory call: construction is expensive
    /// and must run at most once per key even under concurrent access.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Build`] when the factory fails and
    /// [`CacheError::Poisoned`] when a previous panic poisoned the cache.
    pub fn get_or_try_insert<E>(
        &self,
        key: K,
        factory: impl FnOnce() -> Result<V, E>,
    ) -> Result<Arc<V>, CacheError<E>>
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        let mut entries = self.entries.lock().map_err(|_| CacheError::Poisoned)?;
        if let Some(existing) = entries.get(&key) {
            return Ok(Arc::clone(existing));
        }
        let built = Arc::new(factory().map_err(CacheError::Build)?);
        entries.insert(key, Arc::clone(&built));
        Ok(built)
    }

    /// Number of cached instances.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Poisoned`] when a previous panic poisoned the
    /// cache.
    pub fn len(&self) -> Result<usize, CacheError<std::convert::Infallible>> {
        self.entries
            .lock()
            .map(|entries| entries.len())
            .map_err(|_| CacheError::Poisoned)
    }

    /// Whether the cache holds no instances.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Poisoned`] when a previous panic poisoned the
    /// cache.
    pub fn is_empty(&self) -> Result<bool, CacheError<std::convert::Infallible>> {
        self.len().map(|len| len == 0)
    }
}
