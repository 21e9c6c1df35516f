// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The plain memoizing repository.

use std::fmt;

use memostore_memory::LocalStore;
use memostore_store::{Entry, Store};

use crate::builder::RepositoryBuilder;
use crate::producer::Factory;
use crate::storage::Engine;
use crate::strategy::Field;
use crate::telemetry::{Activity, Operation, RepositoryName};

/// A cache that computes each key's values at most once.
///
/// On the first [`get`](Self::get) for a key the repository runs its default
/// [`Factory`], stores the result, and returns it; later lookups return the
/// stored values without running any producer. Failed computations are
/// never stored, so the next lookup retries.
///
/// Lookups never fail loudly. A producer error or panic, or a store failure,
/// is logged, handed to the diagnostic hook configured with
/// [`on_diagnostic`](RepositoryBuilder::on_diagnostic), and turned into
/// `None`.
///
/// # Thread safety
///
/// The repository performs unsynchronized check-then-act sequences against
/// its store. With the default [`LocalStore`] the repository is `!Sync` and
/// the compiler keeps it on one thread at a time. Building with a
/// [`SharedStore`](crate::SharedStore) makes it `Send + Sync`; concurrent
/// misses on the same key may then compute twice, and the last write wins.
///
/// # Examples
///
/// ```
/// use memostore::Repository;
///
/// let repository = Repository::builder()
///     .producer(|i: &i32| format!("Default Value of {i}"))
///     .build();
///
/// assert_eq!(repository.get(&3).as_deref(), Some("Default Value of 3"));
/// assert!(repository.contains(&3));
///
/// assert!(repository.remove(&3));
/// assert!(!repository.contains(&3));
/// ```
pub struct Repository<K, T, S = LocalStore<K, Entry<T>>> {
    engine: Engine<K, Entry<T>, S>,
    factory: Factory<K, T>,
}

impl Repository<(), ()> {
    /// Creates a builder for a repository keyed by `K`.
    ///
    /// The key type is usually inferred from the first producer.
    #[must_use]
    pub fn builder<K>() -> RepositoryBuilder<K> {
        RepositoryBuilder::new()
    }
}

impl<K, T, S> Repository<K, T, S> {
    pub(crate) fn new(engine: Engine<K, Entry<T>, S>, factory: Factory<K, T>) -> Self {
        Self { engine, factory }
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

impl<K, T, S> Repository<K, T, S>
where
    K: fmt::Debug,
    T: Clone,
    S: Store<K, Entry<T>>,
{
    /// Returns `true` if the store holds an entry for `key`.
    pub fn contains(&self, key: &K) -> bool {
        self.engine.contains(key)
    }

    /// Returns the values for `key`, computing and storing them on a miss.
    ///
    /// Returns `None` if the computation or the store failed.
    pub fn get(&self, key: &K) -> Option<T> {
        self.get_with(key, &self.factory)
    }

    /// Like [`get`](Self::get), but computes a miss with `factory`.
    ///
    /// The result is stored as usual. The default factory is not replaced, and
    /// an already stored entry is returned without running `factory`.
    pub fn get_with(&self, key: &K, factory: &Factory<K, T>) -> Option<T> {
        match self.engine.read(key) {
            Ok(Some(entry)) => {
                self.engine.record(Operation::Get, Activity::Hit);
                return Some(entry.into_values());
            }
            Ok(None) => self.engine.record(Operation::Get, Activity::Miss),
            Err(error) => {
                self.engine.report(Operation::Get, key, &error);
                return None;
            }
        }

        let computed = factory.compute(key).map(Entry::new);
        self.engine.commit(key, computed).map(Entry::into_values)
    }

    /// Returns `(true, values)` on success and `(false, T::default())` on failure.
    pub fn get_or_reset(&self, key: &K) -> (bool, T)
    where
        T: Default,
    {
        self.get(key).map_or_else(|| (false, T::default()), |values| (true, values))
    }

    /// Returns the value at position `I` of a multi-value entry.
    ///
    /// # Examples
    ///
    /// ```
    /// use memostore::Repository;
    ///
    /// let repository = Repository::builder()
    ///     .producer(|n: &u32| n * 2)
    ///     .producer(|n: &u32| n.to_string())
    ///     .build();
    ///
    /// assert_eq!(repository.get_field::<1>(&21).as_deref(), Some("21"));
    /// assert_eq!(repository.get_field::<0>(&21), Some(42));
    /// ```
    pub fn get_field<const I: usize>(&self, key: &K) -> Option<<T as Field<I>>::Output>
    where
        T: Field<I>,
    {
        self.get(key).map(<T as Field<I>>::into_field)
    }

    /// Removes the entry for `key`. Returns `true` if one was removed.
    pub fn remove(&self, key: &K) -> bool {
        self.engine.remove(key)
    }

    /// Removes every entry whose key satisfies `predicate` and returns how many were removed.
    ///
    /// The keys are snapshotted before the first removal, so `predicate` sees
    /// each held key exactly once.
    pub fn remove_where(&self, predicate: impl FnMut(&K) -> bool) -> usize {
        self.engine.remove_where(predicate)
    }

    /// Removes every entry.
    pub fn clear(&self) {
        self.engine.clear();
    }

    /// Returns the number of stored entries, if the store can tell.
    #[must_use]
    pub fn len(&self) -> Option<u64> {
        self.engine.len()
    }

    /// Returns `true` if the store holds no entries, if the store can tell.
    #[must_use]
    pub fn is_empty(&self) -> Option<bool> {
        self.len().map(|len| len == 0)
    }
}

impl<K, T, S> fmt::Debug for Repository<K, T, S>
where
    S: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Repository")
            .field("name", &self.engine.name())
            .field("store", self.engine.store())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::telemetry::attributes;
    use crate::telemetry::testing::LogCapture;

    #[test]
    fn hit_and_miss_are_logged() {
        let capture = LogCapture::new();
        let _guard = tracing::subscriber::set_default(capture.subscriber());

        let repository = Repository::builder().name("numbers").producer(|n: &u8| u16::from(*n) + 1).build();
        assert_eq!(repository.get(&1), Some(2));
        assert_eq!(repository.get(&1), Some(2));

        capture.assert_contains("numbers");
        capture.assert_contains(attributes::REPOSITORY_ACTIVITY);
        capture.assert_contains(Activity::Miss.as_str());
        capture.assert_contains(Activity::Computed.as_str());
        capture.assert_contains(Activity::Hit.as_str());
    }

    #[test]
    fn get_with_does_not_replace_default_factory() {
        let repository = Repository::builder().producer(|n: &i32| n + 1).build();
        let calls = Arc::new(AtomicUsize::new(0));
        let counted = Arc::clone(&calls);
        let doubled = Factory::composed(move |n: &i32| {
            counted.fetch_add(1, Ordering::SeqCst);
            n * 2
        });

        assert_eq!(repository.get_with(&5, &doubled), Some(10));
        assert_eq!(repository.get(&5), Some(10));
        assert_eq!(repository.get(&6), Some(7));
        assert_eq!(repository.get_with(&6, &doubled), Some(7));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn debug_shows_name_and_store() {
        let repository = Repository::builder().name("debugged").producer(|n: &i32| *n).build();
        let debug = format!("{repository:?}");
        assert!(debug.contains("debugged"), "got: {debug}");
        assert!(debug.contains("LocalStore"), "got: {debug}");
    }
}
