// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Mock store implementation for testing.
//!
//! This module provides `MockStore`, an in-memory store that records every
//! operation and supports failure injection for exercising error paths.

use std::{collections::HashMap, hash::Hash, sync::Arc};

use parking_lot::Mutex;

use crate::{Error, Store};

/// Recorded store operation with full context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOp<K, E> {
    /// A get operation was performed with the given key.
    Get(K),
    /// A contains operation was performed with the given key.
    Contains(K),
    /// An insert operation was performed with the given key and entry.
    Insert {
        /// The key that was inserted.
        key: K,
        /// The entry that was inserted.
        entry: E,
    },
    /// A remove operation was performed with the given key.
    Remove(K),
    /// A key snapshot was taken.
    Keys,
    /// A clear operation was performed.
    Clear,
}

type FailPredicate<K, E> = Box<dyn Fn(&StoreOp<K, E>) -> bool + Send + Sync>;

/// A configurable mock store for testing.
///
/// Data lives behind a mutex, so the mock is `Send + Sync` and can back a
/// shared repository. Clones share data, recorded operations, and the failure
/// predicate.
///
/// # Examples
///
/// ```
/// use memostore_store::testing::{MockStore, StoreOp};
/// use memostore_store::{Entry, Store};
///
/// let store = MockStore::<String, Entry<i32>>::new();
///
/// store.insert(&"key".to_string(), Entry::new(42)).unwrap();
/// let entry = store.get(&"key".to_string()).unwrap();
/// assert_eq!(*entry.unwrap().values(), 42);
///
/// assert_eq!(
///     store.operations(),
///     vec![
///         StoreOp::Insert { key: "key".to_string(), entry: Entry::new(42) },
///         StoreOp::Get("key".to_string()),
///     ]
/// );
/// ```
///
/// # Failure Injection
///
/// ```
/// use memostore_store::testing::{MockStore, StoreOp};
/// use memostore_store::{Entry, Store};
///
/// let store: MockStore<String, Entry<i32>> = MockStore::new();
///
/// store.fail_when(|op| matches!(op, StoreOp::Get(k) if k == "forbidden"));
/// assert!(store.get(&"forbidden".to_string()).is_err());
/// assert!(store.get(&"allowed".to_string()).is_ok());
/// ```
pub struct MockStore<K, E> {
    data: Arc<Mutex<HashMap<K, E>>>,
    operations: Arc<Mutex<Vec<StoreOp<K, E>>>>,
    fail_when: Arc<Mutex<Option<FailPredicate<K, E>>>>,
}

impl<K, E> std::fmt::Debug for MockStore<K, E>
where
    K: std::fmt::Debug,
    E: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockStore")
            .field("data", &self.data)
            .field("operations", &self.operations)
            .field("fail_when", &self.fail_when.lock().is_some())
            .finish()
    }
}

impl<K, E> Clone for MockStore<K, E> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
            operations: Arc::clone(&self.operations),
            fail_when: Arc::clone(&self.fail_when),
        }
    }
}

impl<K, E> Default for MockStore<K, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, E> MockStore<K, E> {
    /// Creates a new empty mock store.
    #[must_use]
    pub fn new() -> Self {
        Self::from_map(HashMap::new())
    }

    fn from_map(data: HashMap<K, E>) -> Self {
        Self {
            data: Arc::new(Mutex::new(data)),
            operations: Arc::new(Mutex::new(Vec::new())),
            fail_when: Arc::new(Mutex::new(None)),
        }
    }
}

impl<K, E> MockStore<K, E>
where
    K: Eq + Hash,
{
    /// Creates a mock store with pre-populated data.
    #[must_use]
    pub fn with_data(data: HashMap<K, E>) -> Self {
        Self::from_map(data)
    }

    /// Returns the number of entries, bypassing recording and failure injection.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.data.lock().len()
    }

    /// Returns true if the store holds the key, bypassing recording and failure injection.
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.data.lock().contains_key(key)
    }
}

impl<K, E> MockStore<K, E>
where
    K: Clone,
    E: Clone,
{
    /// Sets a predicate that decides which operations fail.
    ///
    /// The predicate receives the operation and returns `true` if it should
    /// fail. Failed operations are still recorded but leave the data untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use memostore_store::testing::{MockStore, StoreOp};
    ///
    /// let store: MockStore<String, i32> = MockStore::new();
    ///
    /// // Fail all operations
    /// store.fail_when(|_| true);
    ///
    /// // Fail only inserts
    /// store.fail_when(|op| matches!(op, StoreOp::Insert { .. }));
    /// ```
    pub fn fail_when<F>(&self, predicate: F)
    where
        F: Fn(&StoreOp<K, E>) -> bool + Send + Sync + 'static,
    {
        *self.fail_when.lock() = Some(Box::new(predicate));
    }

    /// Clears the failure predicate, allowing all operations to succeed.
    pub fn clear_failures(&self) {
        *self.fail_when.lock() = None;
    }

    /// Returns a clone of all recorded operations.
    #[must_use]
    pub fn operations(&self) -> Vec<StoreOp<K, E>> {
        self.operations.lock().clone()
    }

    /// Clears all recorded operations.
    pub fn clear_operations(&self) {
        self.operations.lock().clear();
    }

    fn check(&self, op: StoreOp<K, E>, what: &'static str) -> Result<(), Error> {
        let fail = self.fail_when.lock().as_ref().is_some_and(|predicate| predicate(&op));
        self.operations.lock().push(op);
        if fail {
            return Err(Error::store(format!("mock: {what} failed")));
        }
        Ok(())
    }
}

impl<K, E> Store<K, E> for MockStore<K, E>
where
    K: Clone + Eq + Hash,
    E: Clone,
{
    fn get(&self, key: &K) -> Result<Option<E>, Error> {
        self.check(StoreOp::Get(key.clone()), "get")?;
        Ok(self.data.lock().get(key).cloned())
    }

    fn contains(&self, key: &K) -> Result<bool, Error> {
        self.check(StoreOp::Contains(key.clone()), "contains")?;
        Ok(self.data.lock().contains_key(key))
    }

    fn insert(&self, key: &K, entry: E) -> Result<(), Error> {
        self.check(
            StoreOp::Insert {
                key: key.clone(),
                entry: entry.clone(),
            },
            "insert",
        )?;
        self.data.lock().insert(key.clone(), entry);
        Ok(())
    }

    fn remove(&self, key: &K) -> Result<bool, Error> {
        self.check(StoreOp::Remove(key.clone()), "remove")?;
        Ok(self.data.lock().remove(key).is_some())
    }

    fn keys(&self) -> Result<Vec<K>, Error> {
        self.check(StoreOp::Keys, "keys")?;
        Ok(self.data.lock().keys().cloned().collect())
    }

    fn clear(&self) -> Result<(), Error> {
        self.check(StoreOp::Clear, "clear")?;
        self.data.lock().clear();
        Ok(())
    }

    fn len(&self) -> Option<u64> {
        Some(self.data.lock().len() as u64)
    }
}
