// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Builder for configuring shared stores.
//!
//! The builder keeps moka's configuration types out of the public API.

use std::hash::Hash;
use std::marker::PhantomData;

use crate::shared::SharedStore;

/// Builder for configuring a [`SharedStore`].
///
/// # Examples
///
/// ```
/// use memostore_memory::SharedStore;
///
/// let store = SharedStore::<String, i32>::builder()
///     .initial_capacity(100)
///     .name("my-store")
///     .build();
/// ```
#[derive(Debug)]
pub struct SharedStoreBuilder<K, E> {
    pub(crate) initial_capacity: Option<usize>,
    pub(crate) name: Option<String>,
    _phantom: PhantomData<(K, E)>,
}

impl<K, E> Default for SharedStoreBuilder<K, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, E> SharedStoreBuilder<K, E> {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            initial_capacity: None,
            name: None,
            _phantom: PhantomData,
        }
    }

    /// Sets the initial capacity (pre-allocation hint) for the store.
    ///
    /// The store still grows beyond this size; it never evicts.
    #[must_use]
    pub fn initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = Some(capacity);
        self
    }

    /// Sets a name that may appear in debugging output from the underlying map.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Builds the configured [`SharedStore`].
    #[must_use]
    pub fn build(self) -> SharedStore<K, E>
    where
        K: Hash + Eq + Send + Sync + 'static,
        E: Clone + Send + Sync + 'static,
    {
        SharedStore::from_builder(&self)
    }
}
