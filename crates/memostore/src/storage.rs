// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Store access shared by plain and stateful repositories.
//!
//! The engine owns the store and turns every store failure into a reported
//! diagnostic. It adds no synchronization of its own.

use std::fmt::Debug;
use std::marker::PhantomData;

use memostore_store::Store;

use crate::Error;
use crate::telemetry::{Activity, Diagnostics, Operation, RepositoryName, emit};

#[derive(Debug)]
pub(crate) struct Engine<K, E, S> {
    name: RepositoryName,
    store: S,
    diagnostics: Diagnostics,
    _entry: PhantomData<fn(&K) -> E>,
}

impl<K, E, S> Engine<K, E, S> {
    pub fn new(name: RepositoryName, store: S, diagnostics: Diagnostics) -> Self {
        Self {
            name,
            store,
            diagnostics,
            _entry: PhantomData,
        }
    }

    pub fn name(&self) -> RepositoryName {
        self.name
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn record(&self, operation: Operation, activity: Activity) {
        emit(self.name, operation, activity, None, None);
    }

    pub fn record_count(&self, operation: Operation, activity: Activity, count: usize) {
        emit(self.name, operation, activity, Some(count), None);
    }

    pub fn report(&self, operation: Operation, key: &K, error: &Error)
    where
        K: Debug,
    {
        self.diagnostics.report(self.name, operation, format_args!("{key:?}"), error);
    }

    pub fn report_keys(&self, operation: Operation, error: &Error) {
        self.diagnostics.report(self.name, operation, "<key snapshot>", error);
    }
}

impl<K, E, S> Engine<K, E, S>
where
    K: Debug,
    S: Store<K, E>,
{
    /// Reads the entry without reporting; the caller reports with its own operation.
    pub fn read(&self, key: &K) -> Result<Option<E>, Error> {
        self.store.get(key)
    }

    pub fn write(&self, key: &K, entry: E) -> Result<(), Error> {
        self.store.insert(key, entry)
    }

    /// Stores a freshly computed entry and returns it.
    ///
    /// A computation or write failure is reported and leaves the store as it was.
    pub fn commit(&self, key: &K, computed: Result<E, Error>) -> Option<E>
    where
        E: Clone,
    {
        let committed = computed.and_then(|entry| self.write(key, entry.clone()).map(|()| entry));
        match committed {
            Ok(entry) => {
                self.record(Operation::Get, Activity::Computed);
                Some(entry)
            }
            Err(error) => {
                self.report(Operation::Get, key, &error);
                None
            }
        }
    }

    pub fn contains(&self, key: &K) -> bool {
        match self.store.contains(key) {
            Ok(found) => found,
            Err(error) => {
                self.report(Operation::Contains, key, &error);
                false
            }
        }
    }

    /// Removes `key` as part of `operation`, reporting failures.
    pub fn evict(&self, operation: Operation, key: &K) -> bool {
        match self.store.remove(key) {
            Ok(removed) => removed,
            Err(error) => {
                self.report(operation, key, &error);
                false
            }
        }
    }

    pub fn remove(&self, key: &K) -> bool {
        let removed = self.evict(Operation::Remove, key);
        if removed {
            self.record(Operation::Remove, Activity::Removed);
        }
        removed
    }

    /// Returns a detached key snapshot, or `None` after reporting a failure.
    pub fn keys(&self, operation: Operation) -> Option<Vec<K>> {
        match self.store.keys() {
            Ok(keys) => Some(keys),
            Err(error) => {
                self.report_keys(operation, &error);
                None
            }
        }
    }

    pub fn remove_where(&self, mut predicate: impl FnMut(&K) -> bool) -> usize {
        let Some(keys) = self.keys(Operation::Remove) else {
            return 0;
        };

        let removed = keys
            .iter()
            .filter(|key| predicate(key))
            .filter(|key| self.evict(Operation::Remove, key))
            .count();

        self.record_count(Operation::Remove, Activity::Removed, removed);
        removed
    }

    pub fn clear(&self) {
        match self.store.clear() {
            Ok(()) => self.record(Operation::Clear, Activity::Cleared),
            Err(error) => self.report_keys(Operation::Clear, &error),
        }
    }

    pub fn len(&self) -> Option<u64> {
        self.store.len()
    }
}
