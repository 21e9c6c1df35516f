// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Builders for plain and stateful repositories.
//!
//! A builder starts without producers and has no `build` method until at
//! least one producer or a composed factory is supplied. Setting a validity
//! predicate, a state producer, or an expiration switches to
//! [`StatefulRepositoryBuilder`], whose `build` validates that both halves of
//! the validity policy are present.

use std::hash::Hash;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::{Duration, Instant};

use memostore_memory::LocalStore;
use memostore_store::{Entry, Store};
use tick::Clock;

use crate::producer::{Factory, Producer};
use crate::stateful::{StatefulRepository, ValidityFn};
use crate::storage::Engine;
use crate::strategy::{Append, IntoFactory};
use crate::telemetry::{Diagnostics, RepositoryName};
use crate::{Error, Execution, Repository};

const DEFAULT_NAME: RepositoryName = "repository";

/// Builder for [`Repository`].
///
/// Created by [`Repository::builder`]. `P` is the collection of producers
/// gathered so far.
///
/// # Examples
///
/// ```
/// use memostore::{Execution, Repository};
///
/// let repository = Repository::builder()
///     .name("users")
///     .producer(|id: &u64| format!("user-{id}"))
///     .try_producer(|id: &u64| u8::try_from(*id))
///     .execution(Execution::Sequential)
///     .on_diagnostic(|message| eprintln!("{message}"))
///     .build();
///
/// assert_eq!(repository.get(&7), Some(("user-7".to_string(), 7)));
/// assert_eq!(repository.get(&700), None);
/// ```
pub struct RepositoryBuilder<K, P = ()> {
    name: RepositoryName,
    producers: P,
    execution: Option<Execution>,
    diagnostics: Diagnostics,
    _key: PhantomData<fn(&K)>,
}

impl<K> RepositoryBuilder<K> {
    pub(crate) fn new() -> Self {
        Self {
            name: DEFAULT_NAME,
            producers: (),
            execution: None,
            diagnostics: Diagnostics::default(),
            _key: PhantomData,
        }
    }

    /// Uses `f` to compute every value of an entry at once.
    ///
    /// A composed factory ignores the configured [`Execution`].
    pub fn composed<T, F>(self, f: F) -> RepositoryBuilder<K, Factory<K, T>>
    where
        F: Fn(&K) -> T + Send + Sync + 'static,
        K: 'static,
        T: 'static,
    {
        self.factory(Factory::composed(f))
    }

    /// Uses a fallible `f` to compute every value of an entry at once.
    pub fn try_composed<T, E, F>(self, f: F) -> RepositoryBuilder<K, Factory<K, T>>
    where
        F: Fn(&K) -> Result<T, E> + Send + Sync + 'static,
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
        K: 'static,
        T: 'static,
    {
        self.factory(Factory::try_composed(f))
    }

    /// Uses an existing factory as the default factory.
    pub fn factory<T>(self, factory: Factory<K, T>) -> RepositoryBuilder<K, Factory<K, T>> {
        self.with_producers(factory)
    }
}

impl<K, P> RepositoryBuilder<K, P> {
    /// Appends a producer for the next value slot.
    pub fn producer<V, F>(self, f: F) -> RepositoryBuilder<K, P::Output>
    where
        P: Append<K, V>,
        F: Fn(&K) -> V + Send + Sync + 'static,
        K: 'static,
        V: 'static,
    {
        self.append(Producer::new(f))
    }

    /// Appends a fallible producer for the next value slot.
    pub fn try_producer<V, E, F>(self, f: F) -> RepositoryBuilder<K, P::Output>
    where
        P: Append<K, V>,
        F: Fn(&K) -> Result<V, E> + Send + Sync + 'static,
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
        K: 'static,
        V: 'static,
    {
        self.append(Producer::fallible(f))
    }

    /// Appends an existing producer for the next value slot.
    pub fn append<V>(self, producer: Producer<K, V>) -> RepositoryBuilder<K, P::Output>
    where
        P: Append<K, V>,
    {
        let producers = self.producers;
        RepositoryBuilder {
            name: self.name,
            producers: producers.append(producer),
            execution: self.execution,
            diagnostics: self.diagnostics,
            _key: PhantomData,
        }
    }

    /// Sets the name used in telemetry. Defaults to `"repository"`.
    #[must_use]
    pub fn name(mut self, name: RepositoryName) -> Self {
        self.name = name;
        self
    }

    /// Overrides the process-wide [`Execution`] default for this repository.
    #[must_use]
    pub fn execution(mut self, execution: Execution) -> Self {
        self.execution = Some(execution);
        self
    }

    /// Sets the callback that receives one message per internal failure.
    #[must_use]
    pub fn on_diagnostic(mut self, hook: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.diagnostics = Diagnostics::new(hook);
        self
    }

    /// Installs a validity predicate, making the repository stateful.
    pub fn validity<St, F>(self, f: F) -> StatefulRepositoryBuilder<K, St, P>
    where
        F: Fn(&K, &St) -> bool + Send + Sync + 'static,
    {
        StatefulRepositoryBuilder::new(self).validity(f)
    }

    /// Installs the producer of per-entry state, making the repository stateful.
    pub fn state<St, F>(self, f: F) -> StatefulRepositoryBuilder<K, St, P>
    where
        F: Fn(&K) -> St + Send + Sync + 'static,
        K: 'static,
        St: 'static,
    {
        StatefulRepositoryBuilder::new(self).state(f)
    }

    /// Installs a fallible producer of per-entry state, making the repository stateful.
    pub fn try_state<St, E, F>(self, f: F) -> StatefulRepositoryBuilder<K, St, P>
    where
        F: Fn(&K) -> Result<St, E> + Send + Sync + 'static,
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
        K: 'static,
        St: 'static,
    {
        StatefulRepositoryBuilder::new(self).try_state(f)
    }

    /// Makes entries expire `ttl` after they were computed, as measured by `clock`.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::Duration;
    ///
    /// use memostore::Repository;
    /// use tick::Clock;
    ///
    /// # fn build(clock: Clock) -> Result<(), memostore::Error> {
    /// let repository = Repository::builder()
    ///     .producer(|path: &String| path.len())
    ///     .expire_after(clock, Duration::from_secs(30))
    ///     .build()?;
    /// # let _ = repository;
    /// # Ok(())
    /// # }
    /// ```
    pub fn expire_after(self, clock: Clock, ttl: Duration) -> StatefulRepositoryBuilder<K, Instant, P>
    where
        K: 'static,
    {
        StatefulRepositoryBuilder::new(self).expire_after(clock, ttl)
    }

    fn with_producers<Q>(self, producers: Q) -> RepositoryBuilder<K, Q> {
        RepositoryBuilder {
            name: self.name,
            producers,
            execution: self.execution,
            diagnostics: self.diagnostics,
            _key: PhantomData,
        }
    }

    fn into_parts(self) -> (RepositoryName, P, Execution, Diagnostics) {
        (self.name, self.producers, self.execution.unwrap_or_default(), self.diagnostics)
    }
}

impl<K, P> RepositoryBuilder<K, P>
where
    P: IntoFactory<K>,
{
    /// Builds a repository backed by a [`LocalStore`].
    #[must_use]
    pub fn build(self) -> Repository<K, P::Values>
    where
        K: Clone + Eq + Hash,
        P::Values: Clone,
    {
        self.build_with_store(LocalStore::new())
    }

    /// Builds a repository backed by `store`.
    #[must_use]
    pub fn build_with_store<S>(self, store: S) -> Repository<K, P::Values, S>
    where
        S: Store<K, Entry<P::Values>>,
    {
        let (name, producers, execution, diagnostics) = self.into_parts();
        Repository::new(Engine::new(name, store, diagnostics), producers.into_factory(execution))
    }
}

impl<K, P> std::fmt::Debug for RepositoryBuilder<K, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RepositoryBuilder")
            .field("name", &self.name)
            .field("execution", &self.execution)
            .field("diagnostics", &self.diagnostics)
            .finish_non_exhaustive()
    }
}

/// Builder for [`StatefulRepository`].
///
/// Created from a [`RepositoryBuilder`] by calling
/// [`validity`](RepositoryBuilder::validity),
/// [`state`](RepositoryBuilder::state), or
/// [`expire_after`](RepositoryBuilder::expire_after). Both a validity
/// predicate and a state producer must be set before building.
///
/// # Examples
///
/// ```
/// use memostore::Repository;
///
/// let repository = Repository::builder()
///     .producer(|word: &String| word.to_uppercase())
///     .state(|word: &String| word.len())
///     .validity(|_: &String, len: &usize| *len < 8)
///     .build()?;
///
/// assert_eq!(repository.get(&"short".to_string()).as_deref(), Some("SHORT"));
/// assert!(repository.is_valid(&"short".to_string()));
///
/// assert!(repository.get(&"much longer".to_string()).is_some());
/// assert!(!repository.is_valid(&"much longer".to_string()));
/// assert_eq!(repository.trim(), 1);
/// # Ok::<(), memostore::Error>(())
/// ```
pub struct StatefulRepositoryBuilder<K, St, P = ()> {
    base: RepositoryBuilder<K, P>,
    validity: Option<Arc<ValidityFn<K, St>>>,
    state: Option<Producer<K, St>>,
    invalid: Option<Error>,
}

impl<K, St, P> StatefulRepositoryBuilder<K, St, P> {
    fn new(base: RepositoryBuilder<K, P>) -> Self {
        Self {
            base,
            validity: None,
            state: None,
            invalid: None,
        }
    }

    fn map_base<Q>(self, f: impl FnOnce(RepositoryBuilder<K, P>) -> RepositoryBuilder<K, Q>) -> StatefulRepositoryBuilder<K, St, Q> {
        StatefulRepositoryBuilder {
            base: f(self.base),
            validity: self.validity,
            state: self.state,
            invalid: self.invalid,
        }
    }

    /// Appends a producer for the next value slot.
    pub fn producer<V, F>(self, f: F) -> StatefulRepositoryBuilder<K, St, P::Output>
    where
        P: Append<K, V>,
        F: Fn(&K) -> V + Send + Sync + 'static,
        K: 'static,
        V: 'static,
    {
        self.map_base(|base| base.producer(f))
    }

    /// Appends a fallible producer for the next value slot.
    pub fn try_producer<V, E, F>(self, f: F) -> StatefulRepositoryBuilder<K, St, P::Output>
    where
        P: Append<K, V>,
        F: Fn(&K) -> Result<V, E> + Send + Sync + 'static,
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
        K: 'static,
        V: 'static,
    {
        self.map_base(|base| base.try_producer(f))
    }

    /// Sets the name used in telemetry.
    #[must_use]
    pub fn name(self, name: RepositoryName) -> Self {
        self.map_base(|base| base.name(name))
    }

    /// Overrides the process-wide [`Execution`] default for this repository.
    #[must_use]
    pub fn execution(self, execution: Execution) -> Self {
        self.map_base(|base| base.execution(execution))
    }

    /// Sets the callback that receives one message per internal failure.
    #[must_use]
    pub fn on_diagnostic(self, hook: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.map_base(|base| base.on_diagnostic(hook))
    }

    /// Sets the predicate deciding whether a stored entry is still usable.
    #[must_use]
    pub fn validity<F>(mut self, f: F) -> Self
    where
        F: Fn(&K, &St) -> bool + Send + Sync + 'static,
    {
        self.validity = Some(Arc::new(f));
        self
    }

    /// Sets the function computing an entry's state when it is written.
    #[must_use]
    pub fn state<F>(mut self, f: F) -> Self
    where
        F: Fn(&K) -> St + Send + Sync + 'static,
        K: 'static,
        St: 'static,
    {
        self.state = Some(Producer::new(f));
        self
    }

    /// Sets a fallible function computing an entry's state when it is written.
    ///
    /// A state failure fails the lookup like a producer failure.
    #[must_use]
    pub fn try_state<E, F>(mut self, f: F) -> Self
    where
        F: Fn(&K) -> Result<St, E> + Send + Sync + 'static,
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
        K: 'static,
        St: 'static,
    {
        self.state = Some(Producer::fallible(f));
        self
    }
}

impl<K, St> StatefulRepositoryBuilder<K, St> {
    /// Uses `f` to compute every value of an entry at once.
    pub fn composed<T, F>(self, f: F) -> StatefulRepositoryBuilder<K, St, Factory<K, T>>
    where
        F: Fn(&K) -> T + Send + Sync + 'static,
        K: 'static,
        T: 'static,
    {
        self.map_base(|base| base.composed(f))
    }

    /// Uses a fallible `f` to compute every value of an entry at once.
    pub fn try_composed<T, E, F>(self, f: F) -> StatefulRepositoryBuilder<K, St, Factory<K, T>>
    where
        F: Fn(&K) -> Result<T, E> + Send + Sync + 'static,
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
        K: 'static,
        T: 'static,
    {
        self.map_base(|base| base.try_composed(f))
    }

    /// Uses an existing factory as the default factory.
    pub fn factory<T>(self, factory: Factory<K, T>) -> StatefulRepositoryBuilder<K, St, Factory<K, T>> {
        self.map_base(|base| base.factory(factory))
    }
}

impl<K, P> StatefulRepositoryBuilder<K, Instant, P> {
    /// Makes entries expire `ttl` after they were computed, as measured by `clock`.
    ///
    /// Replaces any validity predicate or state producer set before. A zero
    /// `ttl` is rejected when the repository is built.
    #[must_use]
    pub fn expire_after(mut self, clock: Clock, ttl: Duration) -> Self
    where
        K: 'static,
    {
        if ttl.is_zero() {
            self.invalid = Some(Error::construction("expiration duration must be greater than zero"));
        }

        let now = clock.clone();
        self.validity(move |_: &K, expiry: &Instant| now.instant() < *expiry)
            .try_state(move |_: &K| {
                clock
                    .instant()
                    .checked_add(ttl)
                    .ok_or_else(|| format!("expiry overflows the clock after {ttl:?}"))
            })
    }
}

impl<K, St, P> StatefulRepositoryBuilder<K, St, P>
where
    P: IntoFactory<K>,
{
    /// Builds a repository backed by a [`LocalStore`].
    ///
    /// # Errors
    ///
    /// Returns a construction error if the validity predicate or the state
    /// producer is missing, or if an expiration was configured with a zero
    /// duration.
    pub fn build(self) -> Result<StatefulRepository<K, St, P::Values>, Error>
    where
        K: Clone + Eq + Hash,
        St: Clone,
        P::Values: Clone,
    {
        self.build_with_store(LocalStore::new())
    }

    /// Builds a repository backed by `store`.
    ///
    /// # Errors
    ///
    /// Returns a construction error if the validity predicate or the state
    /// producer is missing, or if an expiration was configured with a zero
    /// duration.
    pub fn build_with_store<S>(self, store: S) -> Result<StatefulRepository<K, St, P::Values, S>, Error>
    where
        S: Store<K, Entry<P::Values, St>>,
    {
        if let Some(error) = self.invalid {
            return Err(error);
        }
        let validity = self
            .validity
            .ok_or_else(|| Error::construction("a validity predicate is required"))?;
        let state = self.state.ok_or_else(|| Error::construction("a state producer is required"))?;

        let (name, producers, execution, diagnostics) = self.base.into_parts();
        Ok(StatefulRepository::new(
            Engine::new(name, store, diagnostics),
            producers.into_factory(execution),
            state,
            validity,
        ))
    }
}

impl<K, St, P> std::fmt::Debug for StatefulRepositoryBuilder<K, St, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatefulRepositoryBuilder")
            .field("base", &self.base)
            .field("validity", &self.validity.is_some())
            .field("state", &self.state.is_some())
            .finish_non_exhaustive()
    }
}
