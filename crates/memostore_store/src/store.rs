// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The core trait for repository backing maps.
//!
//! [`Store`] is the only thing a repository knows about where its entries
//! live. It is deliberately synchronous and minimal: lookup, insert, remove,
//! a key snapshot, and clear.

use crate::Error;

/// Trait for backing maps owned by a repository.
///
/// Every method takes `&self`; implementations choose their own interior
/// mutability. That choice also decides thread safety: the repository
/// performs unsynchronized read-then-write sequences, so concurrent use is
/// only sound when the store itself is synchronized.
///
/// Five methods are required: `get`, `insert`, `remove`, `keys`, and `clear`.
/// The rest have default implementations:
/// - `contains`: Delegates to `get`
/// - `len`: Returns `None` (not all stores track size)
/// - `is_empty`: Delegates to `len`
pub trait Store<K, E> {
    /// Returns a copy of the entry stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn get(&self, key: &K) -> Result<Option<E>, Error>;

    /// Stores `entry` under `key`, replacing any previous entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    fn insert(&self, key: &K, entry: E) -> Result<(), Error>;

    /// Removes the entry stored under `key`, returning whether one was present.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    fn remove(&self, key: &K) -> Result<bool, Error>;

    /// Returns a snapshot of all keys currently held.
    ///
    /// The snapshot is detached from the store, so callers may mutate the
    /// store while walking it.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn keys(&self) -> Result<Vec<K>, Error>;

    /// Removes every entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    fn clear(&self) -> Result<(), Error>;

    /// Returns `true` if an entry is stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn contains(&self, key: &K) -> Result<bool, Error> {
        Ok(self.get(key)?.is_some())
    }

    /// Returns the number of entries, if supported.
    ///
    /// Returns `None` for implementations that don't track size.
    fn len(&self) -> Option<u64> {
        None
    }

    /// Returns `true` if the store contains no entries.
    ///
    /// Returns `None` for implementations that don't track size.
    fn is_empty(&self) -> Option<bool> {
        self.len().map(|len| len == 0)
    }
}
