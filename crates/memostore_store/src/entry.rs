// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::ops::Deref;

/// The per-key record a repository keeps in its store.
///
/// An entry holds the computed `values` (one value, or a tuple of values when
/// the repository has several producers) and an optional `state` recorded at
/// computation time. Plain repositories use `()` as the state; stateful
/// repositories store whatever their validity predicate inspects, such as an
/// expiry instant.
///
/// # Examples
///
/// ```
/// use memostore_store::Entry;
///
/// let entry = Entry::new(42);
/// assert_eq!(*entry.values(), 42);
///
/// let entry = Entry::with_state("fresh", (1, "one"));
/// assert_eq!(*entry.state(), "fresh");
/// assert_eq!(entry.values().1, "one");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Entry<T, St = ()> {
    state: St,
    values: T,
}

impl<T> Entry<T> {
    /// Creates an entry without state.
    pub fn new(values: T) -> Self {
        Self { state: (), values }
    }
}

impl<T, St> Entry<T, St> {
    /// Creates an entry carrying the given state.
    pub fn with_state(state: St, values: T) -> Self {
        Self { state, values }
    }

    /// Returns the state recorded when the entry was computed.
    #[must_use]
    pub fn state(&self) -> &St {
        &self.state
    }

    /// Returns a reference to the cached values.
    #[must_use]
    pub fn values(&self) -> &T {
        &self.values
    }

    /// Consumes the entry and returns the cached values.
    #[must_use]
    pub fn into_values(self) -> T {
        self.values
    }

    /// Consumes the entry and returns its state and values.
    #[must_use]
    pub fn into_parts(self) -> (St, T) {
        (self.state, self.values)
    }
}

impl<T, St> Deref for Entry<T, St> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.values
    }
}

impl<T> From<T> for Entry<T> {
    fn from(values: T) -> Self {
        Self::new(values)
    }
}
