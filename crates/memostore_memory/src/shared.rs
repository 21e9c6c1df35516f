// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Concurrent store backed by moka.

use std::hash::Hash;

use memostore_store::{Error, Store};
use moka::sync::Cache;

use crate::builder::SharedStoreBuilder;

/// An internally synchronized in-memory store.
///
/// Every operation is individually atomic, so a repository built on this
/// store is `Send + Sync`. The repository's own read-then-write sequences are
/// still not atomic as a whole: two threads missing the same key may both
/// compute it, and the last write wins.
///
/// No capacity bound or time-based eviction is configured; entries stay until
/// they are removed.
///
/// # Examples
///
/// ```
/// use memostore_memory::SharedStore;
/// use memostore_store::{Entry, Store};
///
/// let store = SharedStore::<String, Entry<i32>>::new();
/// store.insert(&"key".to_string(), Entry::new(42))?;
/// assert_eq!(store.len(), Some(1));
/// # Ok::<(), memostore_store::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct SharedStore<K, E>
where
    K: Hash + Eq + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    inner: Cache<K, E>,
}

impl<K, E> Default for SharedStore<K, E>
where
    K: Hash + Eq + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, E> SharedStore<K, E>
where
    K: Hash + Eq + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    /// Creates a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Creates a new builder for configuring a shared store.
    ///
    /// # Examples
    ///
    /// ```
    /// use memostore_memory::SharedStore;
    ///
    /// let store = SharedStore::<String, i32>::builder()
    ///     .initial_capacity(1000)
    ///     .name("sessions")
    ///     .build();
    /// ```
    #[must_use]
    pub fn builder() -> SharedStoreBuilder<K, E> {
        SharedStoreBuilder::new()
    }

    pub(crate) fn from_builder(builder: &SharedStoreBuilder<K, E>) -> Self {
        let mut moka_builder = Cache::builder();

        if let Some(capacity) = builder.initial_capacity {
            moka_builder = moka_builder.initial_capacity(capacity);
        }

        if let Some(name) = builder.name.as_deref() {
            moka_builder = moka_builder.name(name);
        }

        Self {
            inner: moka_builder.build(),
        }
    }
}

impl<K, E> Store<K, E> for SharedStore<K, E>
where
    K: Clone + Hash + Eq + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    fn get(&self, key: &K) -> Result<Option<E>, Error> {
        Ok(self.inner.get(key))
    }

    fn contains(&self, key: &K) -> Result<bool, Error> {
        Ok(self.inner.contains_key(key))
    }

    fn insert(&self, key: &K, entry: E) -> Result<(), Error> {
        self.inner.insert(key.clone(), entry);
        Ok(())
    }

    fn remove(&self, key: &K) -> Result<bool, Error> {
        Ok(self.inner.remove(key).is_some())
    }

    fn keys(&self) -> Result<Vec<K>, Error> {
        Ok(self.inner.iter().map(|(key, _)| K::clone(&key)).collect())
    }

    fn clear(&self) -> Result<(), Error> {
        self.inner.invalidate_all();
        self.inner.run_pending_tasks();
        Ok(())
    }

    fn len(&self) -> Option<u64> {
        // entry_count lags behind writes until pending maintenance has run
        self.inner.run_pending_tasks();
        Some(self.inner.entry_count())
    }
}
