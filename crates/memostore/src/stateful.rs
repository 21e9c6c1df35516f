// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Repositories whose entries can become stale.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use memostore_memory::LocalStore;
use memostore_store::{Entry, Store};

use crate::producer::{Factory, Producer};
use crate::storage::Engine;
use crate::strategy::Field;
use crate::telemetry::{Activity, Operation, RepositoryName};

pub(crate) type ValidityFn<K, St> = dyn Fn(&K, &St) -> bool + Send + Sync;

/// A repository that records per-entry state and revalidates it on every hit.
///
/// Each entry stores a state value computed right after its values, for
/// example the instant it expires. A lookup returns the stored values only
/// while the validity predicate accepts that state; otherwise the entry is
/// recomputed and replaced. Staleness is observed lazily, on
/// [`get`](Self::get), [`is_valid`](Self::is_valid) or [`trim`](Self::trim);
/// nothing runs in the background.
///
/// If the recomputation of a stale entry fails, the stale entry stays in the
/// store and the lookup returns `None`.
///
/// Built with [`RepositoryBuilder::validity`](crate::RepositoryBuilder::validity)
/// and [`RepositoryBuilder::state`](crate::RepositoryBuilder::state), or with
/// [`RepositoryBuilder::expire_after`](crate::RepositoryBuilder::expire_after)
/// for an [`ExpirableRepository`].
pub struct StatefulRepository<K, St, T, S = LocalStore<K, Entry<T, St>>> {
    engine: Engine<K, Entry<T, St>, S>,
    factory: Factory<K, T>,
    state: Producer<K, St>,
    validity: Arc<ValidityFn<K, St>>,
}

/// A [`StatefulRepository`] whose state is the instant an entry expires.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use memostore::{ExpirableRepository, Repository};
/// use tick::ClockControl;
///
/// let control = ClockControl::new();
/// let repository: ExpirableRepository<u32, String> = Repository::builder()
///     .producer(|id: &u32| format!("session-{id}"))
///     .expire_after(control.to_clock(), Duration::from_secs(60))
///     .build()?;
///
/// assert!(repository.get(&1).is_some());
/// assert!(repository.is_valid(&1));
///
/// control.advance(Duration::from_secs(61));
/// assert!(!repository.is_valid(&1));
/// assert_eq!(repository.trim(), 1);
/// # Ok::<(), memostore::Error>(())
/// ```
pub type ExpirableRepository<K, T, S = LocalStore<K, Entry<T, Instant>>> = StatefulRepository<K, Instant, T, S>;

impl<K, St, T, S> StatefulRepository<K, St, T, S> {
    pub(crate) fn new(engine: Engine<K, Entry<T, St>, S>, factory: Factory<K, T>, state: Producer<K, St>, validity: Arc<ValidityFn<K, St>>) -> Self {
        Self {
            engine,
            factory,
            state,
            validity,
        }
    }

    /// Returns the name used in telemetry.
    #[must_use]
    pub fn name(&self) -> RepositoryName {
        self.engine.name()
    }

    /// Returns the factory that [`get`](Self::get) runs on a miss.
    #[must_use]
    pub fn default_factory(&self) -> &Factory<K, T> {
        &self.factory
    }

    /// Returns the backing store.
    #[must_use]
    pub fn store(&self) -> &S {
        self.engine.store()
    }
}

impl<K, St, T, S> StatefulRepository<K, St, T, S>
where
    K: fmt::Debug,
    St: Clone,
    T: Clone,
    S: Store<K, Entry<T, St>>,
{
    /// Returns `true` if the store holds an entry for `key`, valid or not.
    pub fn contains(&self, key: &K) -> bool {
        self.engine.contains(key)
    }

    /// Returns `true` if an entry for `key` is stored and still valid.
    pub fn is_valid(&self, key: &K) -> bool {
        self.inspect(Operation::IsValid, key) == Some(true)
    }

    /// Returns the stored state for `key` without validating it.
    pub fn state(&self, key: &K) -> Option<St> {
        match self.engine.read(key) {
            Ok(entry) => entry.map(|entry| entry.into_parts().0),
            Err(error) => {
                self.engine.report(Operation::Get, key, &error);
                None
            }
        }
    }

    /// Returns the values for `key`, computing them on a miss or when the
    /// stored entry is no longer valid.
    pub fn get(&self, key: &K) -> Option<T> {
        self.get_entry(key).map(Entry::into_values)
    }

    /// Like [`get`](Self::get), but returns the state along with the values.
    pub fn get_entry(&self, key: &K) -> Option<Entry<T, St>> {
        self.resolve(key, &self.factory)
    }

    /// Like [`get`](Self::get), but computes a miss or a stale entry with `factory`.
    ///
    /// The default factory is not replaced.
    pub fn get_with(&self, key: &K, factory: &Factory<K, T>) -> Option<T> {
        self.resolve(key, factory).map(Entry::into_values)
    }

    /// Returns `(true, values)` on success and `(false, T::default())` on failure.
    pub fn get_or_reset(&self, key: &K) -> (bool, T)
    where
        T: Default,
    {
        self.get(key).map_or_else(|| (false, T::default()), |values| (true, values))
    }

    /// Returns the value at position `I` of a multi-value entry.
    pub fn get_field<const I: usize>(&self, key: &K) -> Option<<T as Field<I>>::Output>
    where
        T: Field<I>,
    {
        self.get(key).map(<T as Field<I>>::into_field)
    }

    /// Removes every entry that is no longer valid and returns how many were removed.
    ///
    /// Valid entries are never touched. Calling `trim` again right away
    /// returns `0` unless entries became stale in between.
    pub fn trim(&self) -> usize {
        let Some(keys) = self.engine.keys(Operation::Trim) else {
            return 0;
        };

        let trimmed = keys
            .iter()
            .filter(|key| self.inspect(Operation::Trim, key) == Some(false))
            .filter(|key| self.engine.evict(Operation::Trim, key))
            .count();

        self.engine.record_count(Operation::Trim, Activity::Trimmed, trimmed);
        trimmed
    }

    /// Removes the entry for `key`. Returns `true` if one was removed.
    pub fn remove(&self, key: &K) -> bool {
        self.engine.remove(key)
    }

    /// Removes every entry whose key satisfies `predicate` and returns how many were removed.
    pub fn remove_where(&self, predicate: impl FnMut(&K) -> bool) -> usize {
        self.engine.remove_where(predicate)
    }

    /// Removes every entry.
    pub fn clear(&self) {
        self.engine.clear();
    }

    /// Returns the number of stored entries, valid or not, if the store can tell.
    #[must_use]
    pub fn len(&self) -> Option<u64> {
        self.engine.len()
    }

    /// Returns `true` if the store holds no entries, if the store can tell.
    #[must_use]
    pub fn is_empty(&self) -> Option<bool> {
        self.len().map(|len| len == 0)
    }

    /// Reads `key` and applies the validity predicate.
    ///
    /// `None` means absent, or a store failure that was already reported.
    fn inspect(&self, operation: Operation, key: &K) -> Option<bool> {
        match self.engine.read(key) {
            Ok(entry) => entry.map(|entry| (self.validity)(key, entry.state())),
            Err(error) => {
                self.engine.report(operation, key, &error);
                None
            }
        }
    }

    fn resolve(&self, key: &K, factory: &Factory<K, T>) -> Option<Entry<T, St>> {
        match self.engine.read(key) {
            Ok(Some(entry)) if (self.validity)(key, entry.state()) => {
                self.engine.record(Operation::Get, Activity::Hit);
                return Some(entry);
            }
            Ok(Some(_)) => self.engine.record(Operation::Get, Activity::Stale),
            Ok(None) => self.engine.record(Operation::Get, Activity::Miss),
            Err(error) => {
                self.engine.report(Operation::Get, key, &error);
                return None;
            }
        }

        let computed = factory
            .compute(key)
            .and_then(|values| Ok(Entry::with_state(self.state.produce(key)?, values)));
        self.engine.commit(key, computed)
    }
}

impl<K, St, T, S> fmt::Debug for StatefulRepository<K, St, T, S>
where
    S: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatefulRepository")
            .field("name", &self.engine.name())
            .field("store", self.engine.store())
            .finish_non_exhaustive()
    }
}
