// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! A memoizing key-value repository.
//!
//! A [`Repository`] computes the values for a key at most once, stores them,
//! and returns the stored values on every later lookup. The values come from
//! one to seven producers, or from one composed [`Factory`] that computes
//! them together.
//!
//! # Overview
//!
//! - **Producers**: each [`Producer`] computes one value from a key. Several
//!   producers form a multi-value entry, computed in declared order
//!   ([`Execution::Sequential`]) or concurrently on the rayon pool
//!   ([`Execution::Parallel`]). Either way an entry is stored only if every
//!   producer succeeded.
//! - **Failures**: producer errors and panics, and store failures, never
//!   escape a lookup. They are logged through `tracing`, passed to an
//!   optional diagnostic hook, and surface as `None`.
//! - **Validity**: a [`StatefulRepository`] records a state value with each
//!   entry and recomputes entries its validity predicate rejects.
//!   [`ExpirableRepository`] is the time-based case, driven by a
//!   [`tick::Clock`].
//! - **Stores**: entries live in a [`Store`]. The default [`LocalStore`] keeps
//!   the repository single-threaded; a [`SharedStore`] makes it shareable.
//!
//! # Quick Start
//!
//! ```
//! use memostore::Repository;
//!
//! let repository = Repository::builder()
//!     .producer(|id: &u32| format!("user-{id}"))
//!     .producer(|id: &u32| id % 2 == 0)
//!     .build();
//!
//! assert_eq!(repository.get(&4), Some(("user-4".to_string(), true)));
//! assert_eq!(repository.get_field::<0>(&4).as_deref(), Some("user-4"));
//! ```
//!
//! # Expiration
//!
//! ```
//! use std::time::Duration;
//!
//! use memostore::Repository;
//! use tick::ClockControl;
//!
//! let control = ClockControl::new();
//! let repository = Repository::builder()
//!     .producer(|id: &u32| id * 2)
//!     .expire_after(control.to_clock(), Duration::from_secs(1))
//!     .build()?;
//!
//! let first = repository.get_entry(&1).map(|entry| *entry.state());
//! control.advance(Duration::from_millis(1100));
//! assert!(!repository.is_valid(&1));
//!
//! let second = repository.get_entry(&1).map(|entry| *entry.state());
//! assert!(second > first);
//! # Ok::<(), memostore::Error>(())
//! ```
//!
//! # Shared Repositories
//!
//! ```
//! use std::thread;
//!
//! use memostore::{Repository, SharedStore};
//!
//! let repository = Repository::builder()
//!     .producer(|n: &u64| n * n)
//!     .build_with_store(SharedStore::new());
//!
//! thread::scope(|scope| {
//!     for n in 0..4 {
//!         let repository = &repository;
//!         scope.spawn(move || repository.get(&n));
//!     }
//! });
//!
//! assert_eq!(repository.len(), Some(4));
//! ```

mod builder;
mod execution;
mod producer;
mod repository;
mod stateful;
mod storage;
mod strategy;
mod telemetry;

#[doc(inline)]
pub use builder::{RepositoryBuilder, StatefulRepositoryBuilder};
#[doc(inline)]
pub use execution::Execution;
#[doc(inline)]
pub use memostore_memory::{LocalStore, SharedStore};
#[doc(inline)]
pub use memostore_store::{Entry, Error, ErrorKind, Result, Store};
#[cfg(any(feature = "test-util", test))]
#[doc(inline)]
pub use memostore_store::testing::{MockStore, StoreOp};
#[doc(inline)]
pub use producer::{Factory, Producer};
#[doc(inline)]
pub use repository::Repository;
#[doc(inline)]
pub use stateful::{ExpirableRepository, StatefulRepository};
#[doc(inline)]
pub use strategy::{Append, Field, IntoFactory};
#[doc(inline)]
pub use telemetry::RepositoryName;
