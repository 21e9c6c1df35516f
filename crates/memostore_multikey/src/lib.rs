// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Composite keys for memoizing repositories.
//!
//! [`MultiKeyRepository`] takes two or three key parts, folds them into a
//! tuple, and forwards every operation to a [`Repository`] keyed by that
//! tuple. Tuples compare and hash structurally, so two calls with equal parts
//! always address the same entry.
//!
//! # Examples
//!
//! ```
//! use memostore_multikey::TwoKeyRepository;
//!
//! let distances = TwoKeyRepository::new(|x: &i64, y: &i64| x.abs() + y.abs());
//!
//! assert_eq!(distances.get(3, -4), Some(7));
//! assert!(distances.contains(3, -4));
//! assert_eq!(distances.remove_where(|x, _| *x > 0), 1);
//! ```
//!
//! Any repository over a tuple key can be wrapped, which keeps every builder
//! option available:
//!
//! ```
//! use memostore::{Execution, Repository};
//! use memostore_multikey::MultiKeyRepository;
//!
//! let repository = Repository::builder()
//!     .name("routes")
//!     .producer(|(from, to, _): &(String, String, u8)| format!("{from}->{to}"))
//!     .producer(|(_, _, hops): &(String, String, u8)| u32::from(*hops) * 10)
//!     .execution(Execution::Parallel)
//!     .build();
//!
//! let routes = MultiKeyRepository::from_repository(repository);
//! assert_eq!(
//!     routes.get("a".to_string(), "b".to_string(), 2),
//!     Some(("a->b".to_string(), 20))
//! );
//! ```

use std::fmt::Debug;
use std::hash::Hash;

use memostore::{Factory, Repository};
use memostore_memory::LocalStore;
use memostore_store::{Entry, Store};

/// A repository addressed by two or three key parts.
///
/// `Key` is the tuple of parts, `(K1, K2)` or `(K1, K2, K3)`. The
/// [`TwoKeyRepository`] and [`ThreeKeyRepository`] aliases name each arity,
/// and are the types to call `new` on.
#[derive(Debug)]
pub struct MultiKeyRepository<Key, T, S = LocalStore<Key, Entry<T>>> {
    inner: Repository<Key, T, S>,
}

/// A [`MultiKeyRepository`] addressed by two key parts.
pub type TwoKeyRepository<K1, K2, T, S = LocalStore<(K1, K2), Entry<T>>> = MultiKeyRepository<(K1, K2), T, S>;

/// A [`MultiKeyRepository`] addressed by three key parts.
pub type ThreeKeyRepository<K1, K2, K3, T, S = LocalStore<(K1, K2, K3), Entry<T>>> = MultiKeyRepository<(K1, K2, K3), T, S>;

impl<Key, T, S> MultiKeyRepository<Key, T, S> {
    /// Wraps a repository keyed by a tuple of parts.
    #[must_use]
    pub fn from_repository(inner: Repository<Key, T, S>) -> Self {
        Self { inner }
    }

    /// Returns the wrapped repository.
    #[must_use]
    pub fn inner(&self) -> &Repository<Key, T, S> {
        &self.inner
    }

    /// Consumes the adapter and returns the wrapped repository.
    #[must_use]
    pub fn into_inner(self) -> Repository<Key, T, S> {
        self.inner
    }
}

macro_rules! impl_multi_key {
    ($(($K:ident, $k:ident)),+) => {
        impl<$($K,)+ T> MultiKeyRepository<($($K,)+), T>
        where
            $($K: Clone + Eq + Hash + 'static,)+
            T: Clone + 'static,
        {
            /// Creates a repository that computes values from the key parts with `f`.
            #[must_use]
            pub fn new<F>(f: F) -> Self
            where
                F: Fn($(&$K),+) -> T + Send + Sync + 'static,
            {
                Self::from_repository(Repository::builder().composed(move |($($k,)+): &($($K,)+)| f($($k),+)).build())
            }

            /// Creates a repository that computes values from the key parts with a fallible `f`.
            #[must_use]
            pub fn try_new<F, E>(f: F) -> Self
            where
                F: Fn($(&$K),+) -> Result<T, E> + Send + Sync + 'static,
                E: Into<Box<dyn std::error::Error + Send + Sync>>,
            {
                Self::from_repository(Repository::builder().try_composed(move |($($k,)+): &($($K,)+)| f($($k),+)).build())
            }
        }

        impl<$($K,)+ T, S> MultiKeyRepository<($($K,)+), T, S>
        where
            $($K: Debug,)+
            T: Clone,
            S: Store<($($K,)+), Entry<T>>,
        {
            /// Returns the values for the key parts, computing them on a miss.
            pub fn get(&self, $($k: $K),+) -> Option<T> {
                self.inner.get(&($($k,)+))
            }

            /// Like [`get`](Self::get), but computes a miss with `factory`.
            pub fn get_with(&self, $($k: $K,)+ factory: &Factory<($($K,)+), T>) -> Option<T> {
                self.inner.get_with(&($($k,)+), factory)
            }

            /// Returns `true` if an entry is stored for the key parts.
            pub fn contains(&self, $($k: $K),+) -> bool {
                self.inner.contains(&($($k,)+))
            }

            /// Removes the entry for the key parts. Returns `true` if one was removed.
            pub fn remove(&self, $($k: $K),+) -> bool {
                self.inner.remove(&($($k,)+))
            }

            /// Removes every entry whose key parts satisfy `predicate` and returns how many were removed.
            pub fn remove_where(&self, mut predicate: impl FnMut($(&$K),+) -> bool) -> usize {
                self.inner.remove_where(|($($k,)+)| predicate($($k),+))
            }

            /// Removes every entry.
            pub fn clear(&self) {
                self.inner.clear();
            }
        }
    };
}

impl_multi_key!((K1, k1), (K2, k2));
impl_multi_key!((K1, k1), (K2, k2), (K3, k3));
