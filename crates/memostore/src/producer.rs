// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Value producers and pre-composed factories.

use std::any::Any;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use crate::Error;

type ProduceFn<K, V> = dyn Fn(&K) -> Result<V, Error> + Send + Sync;

/// Runs `f`, converting a panic into a computation error.
pub(crate) fn guarded<V>(f: impl FnOnce() -> Result<V, Error>) -> Result<V, Error> {
    catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|payload| Err(Error::computation(panic_message(payload.as_ref()))))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    let message = payload
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| payload.downcast_ref::<&str>().copied())
        .unwrap_or("non-string payload");
    format!("producer panicked: {message}")
}

/// A function computing one value from a key.
///
/// Producers are cheap to clone and shareable across threads. A producer that
/// returns an error or panics never surfaces as a panic from a repository;
/// the failure is reported and the lookup returns no value.
///
/// # Examples
///
/// ```
/// use memostore::Producer;
///
/// let len = Producer::new(|s: &String| s.len());
/// assert_eq!(len.produce(&"four".to_string())?, 4);
///
/// let parsed = Producer::fallible(|s: &String| s.parse::<u8>());
/// assert!(parsed.produce(&"x".to_string()).is_err());
/// # Ok::<(), memostore::Error>(())
/// ```
pub struct Producer<K, V> {
    inner: Arc<ProduceFn<K, V>>,
}

impl<K, V> Producer<K, V> {
    /// Wraps an infallible function.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&K) -> V + Send + Sync + 'static,
        K: 'static,
        V: 'static,
    {
        Self {
            inner: Arc::new(move |key: &K| Ok(f(key))),
        }
    }

    /// Wraps a function that may fail. Errors become computation errors.
    pub fn fallible<F, E>(f: F) -> Self
    where
        F: Fn(&K) -> Result<V, E> + Send + Sync + 'static,
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
        K: 'static,
        V: 'static,
    {
        Self {
            inner: Arc::new(move |key: &K| f(key).map_err(Error::computation)),
        }
    }

    /// Computes the value for `key`.
    ///
    /// # Errors
    ///
    /// Returns a computation error if the function fails or panics.
    pub fn produce(&self, key: &K) -> Result<V, Error> {
        guarded(|| (self.inner)(key))
    }
}

impl<K, V> Clone for Producer<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V> fmt::Debug for Producer<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Producer").finish_non_exhaustive()
    }
}

/// A computation producing every value of an entry at once.
///
/// A factory is what a repository runs on a miss. It is assembled from the
/// builder's producers according to the chosen
/// [`Execution`](crate::Execution), or supplied directly with
/// [`Factory::composed`] when the values are naturally computed together.
///
/// # Examples
///
/// ```
/// use memostore::Factory;
///
/// let split = Factory::composed(|line: &String| {
///     let (left, right) = line.split_once('=').unwrap_or_default();
///     (left.to_string(), right.to_string())
/// });
///
/// assert_eq!(
///     split.compute_or_reset(&"a=b".to_string()),
///     (true, ("a".to_string(), "b".to_string()))
/// );
/// ```
pub struct Factory<K, T> {
    inner: Arc<ProduceFn<K, T>>,
}

impl<K, T> Factory<K, T> {
    /// Wraps an infallible function producing all values together.
    pub fn composed<F>(f: F) -> Self
    where
        F: Fn(&K) -> T + Send + Sync + 'static,
        K: 'static,
        T: 'static,
    {
        Self {
            inner: Arc::new(move |key: &K| Ok(f(key))),
        }
    }

    /// Wraps a fallible function producing all values together.
    pub fn try_composed<F, E>(f: F) -> Self
    where
        F: Fn(&K) -> Result<T, E> + Send + Sync + 'static,
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
        K: 'static,
        T: 'static,
    {
        Self {
            inner: Arc::new(move |key: &K| f(key).map_err(Error::computation)),
        }
    }

    pub(crate) fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&K) -> Result<T, Error> + Send + Sync + 'static,
    {
        Self { inner: Arc::new(f) }
    }

    /// Computes every value for `key`.
    ///
    /// # Errors
    ///
    /// Returns a computation error if any part of the computation fails or
    /// panics. No partial result is ever returned.
    pub fn compute(&self, key: &K) -> Result<T, Error> {
        guarded(|| (self.inner)(key))
    }

    /// Computes every value for `key`, falling back to `T::default()`.
    ///
    /// The flag is `true` when the computation succeeded.
    pub fn compute_or_reset(&self, key: &K) -> (bool, T)
    where
        T: Default,
    {
        self.compute(key).map_or_else(|_| (false, T::default()), |values| (true, values))
    }
}

impl<K, V> From<Producer<K, V>> for Factory<K, V> {
    fn from(producer: Producer<K, V>) -> Self {
        Self { inner: producer.inner }
    }
}

impl<K, T> Clone for Factory<K, T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, T> fmt::Debug for Factory<K, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Factory").finish_non_exhaustive()
    }
}
