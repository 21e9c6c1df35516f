// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Storage abstractions for memoizing repositories.
//!
//! This crate defines the [`Store`] trait that every backing map must satisfy,
//! along with [`Entry`] for the per-key tuple a repository caches and [`Error`]
//! for fallible operations.
//!
//! # Overview
//!
//! A repository owns exactly one store and performs plain check-then-act
//! sequences against it. The store decides whether those sequences are safe
//! across threads: a store built on a `RefCell` keeps the repository `!Sync`,
//! while an internally synchronized store makes it shareable. The repository
//! itself never adds locking.
//!
//! # Implementing a Store
//!
//! ```
//! use memostore_store::{Entry, Error, Store};
//! use std::collections::HashMap;
//! use std::sync::Mutex;
//!
//! struct SimpleStore<K, E>(Mutex<HashMap<K, E>>);
//!
//! impl<K, E> Store<K, E> for SimpleStore<K, E>
//! where
//!     K: Clone + Eq + std::hash::Hash,
//!     E: Clone,
//! {
//!     fn get(&self, key: &K) -> Result<Option<E>, Error> {
//!         Ok(self.0.lock().unwrap().get(key).cloned())
//!     }
//!
//!     fn insert(&self, key: &K, entry: E) -> Result<(), Error> {
//!         self.0.lock().unwrap().insert(key.clone(), entry);
//!         Ok(())
//!     }
//!
//!     fn remove(&self, key: &K) -> Result<bool, Error> {
//!         Ok(self.0.lock().unwrap().remove(key).is_some())
//!     }
//!
//!     fn keys(&self) -> Result<Vec<K>, Error> {
//!         Ok(self.0.lock().unwrap().keys().cloned().collect())
//!     }
//!
//!     fn clear(&self) -> Result<(), Error> {
//!         self.0.lock().unwrap().clear();
//!         Ok(())
//!     }
//! }
//!
//! let store = SimpleStore(Mutex::new(HashMap::new()));
//! store.insert(&1, Entry::new("one"))?;
//! assert_eq!(store.get(&1)?.map(Entry::into_values), Some("one"));
//! # Ok::<(), Error>(())
//! ```

mod entry;
pub mod error;
pub(crate) mod store;
#[cfg(any(feature = "test-util", test))]
pub mod testing;

#[doc(inline)]
pub use entry::Entry;
#[doc(inline)]
pub use error::{Error, ErrorKind, Result};
#[doc(inline)]
pub use store::Store;
