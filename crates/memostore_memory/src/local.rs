// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Single-threaded store backed by a `RefCell<HashMap>`.

use std::cell::RefCell;
use std::collections::HashMap;
use std::hash::Hash;

use memostore_store::{Error, Store};

/// A single-writer in-memory store.
///
/// `LocalStore` can move between threads but cannot be shared, so a repository
/// that owns one is `!Sync`. Access is checked at runtime: re-entering the
/// store while it is borrowed, for example from inside a producer that calls
/// back into the same repository, surfaces as a store error instead of a
/// panic.
///
/// # Examples
///
/// ```
/// use memostore_memory::LocalStore;
/// use memostore_store::{Entry, Store};
///
/// let store = LocalStore::<&str, Entry<i32>>::new();
/// store.insert(&"a", Entry::new(1))?;
/// assert!(store.contains(&"a")?);
/// assert_eq!(store.len(), Some(1));
/// # Ok::<(), memostore_store::Error>(())
/// ```
#[derive(Debug)]
pub struct LocalStore<K, E> {
    map: RefCell<HashMap<K, E>>,
}

impl<K, E> Default for LocalStore<K, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, E> LocalStore<K, E> {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            map: RefCell::new(HashMap::new()),
        }
    }

    /// Creates an empty store with room for `capacity` entries.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            map: RefCell::new(HashMap::with_capacity(capacity)),
        }
    }
}

fn reentered(cause: std::cell::BorrowError) -> Error {
    Error::store(format!("local store is already being written: {cause}"))
}

fn reentered_mut(cause: std::cell::BorrowMutError) -> Error {
    Error::store(format!("local store is already in use: {cause}"))
}

impl<K, E> Store<K, E> for LocalStore<K, E>
where
    K: Clone + Eq + Hash,
    E: Clone,
{
    fn get(&self, key: &K) -> Result<Option<E>, Error> {
        Ok(self.map.try_borrow().map_err(reentered)?.get(key).cloned())
    }

    fn contains(&self, key: &K) -> Result<bool, Error> {
        Ok(self.map.try_borrow().map_err(reentered)?.contains_key(key))
    }

    fn insert(&self, key: &K, entry: E) -> Result<(), Error> {
        self.map.try_borrow_mut().map_err(reentered_mut)?.insert(key.clone(), entry);
        Ok(())
    }

    fn remove(&self, key: &K) -> Result<bool, Error> {
        Ok(self.map.try_borrow_mut().map_err(reentered_mut)?.remove(key).is_some())
    }

    fn keys(&self) -> Result<Vec<K>, Error> {
        Ok(self.map.try_borrow().map_err(reentered)?.keys().cloned().collect())
    }

    fn clear(&self) -> Result<(), Error> {
        self.map.try_borrow_mut().map_err(reentered_mut)?.clear();
        Ok(())
    }

    fn len(&self) -> Option<u64> {
        self.map.try_borrow().ok().map(|map| map.len() as u64)
    }
}
