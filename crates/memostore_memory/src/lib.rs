// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! In-memory backing stores for memoizing repositories.
//!
//! Two [`Store`](memostore_store::Store) implementations are provided:
//!
//! - [`LocalStore`]: a plain hash map behind a `RefCell`. It is the default
//!   store and keeps the owning repository `!Sync`, matching the single-writer
//!   contract of the repository's check-then-act sequences.
//! - [`SharedStore`]: a concurrent map backed by moka. Use it when a
//!   repository must be shared between threads.
//!
//! # Quick Start
//!
//! ```
//! use memostore_memory::SharedStore;
//! use memostore_store::{Entry, Store};
//!
//! let store = SharedStore::<String, Entry<i32>>::builder()
//!     .initial_capacity(100)
//!     .build();
//!
//! store.insert(&"key".to_string(), Entry::new(42))?;
//! let entry = store.get(&"key".to_string())?;
//! assert_eq!(*entry.unwrap().values(), 42);
//! # Ok::<(), memostore_store::Error>(())
//! ```
//!
//! # Features
//!
//! - **No eviction**: entries stay until they are removed explicitly
//! - **Key snapshots**: `keys()` returns a detached copy, safe to walk while removing
//! - **Zero external types**: the builder avoids exposing moka in your public API

pub mod builder;
mod local;
mod shared;

#[doc(inline)]
pub use builder::SharedStoreBuilder;
#[doc(inline)]
pub use local::LocalStore;
#[doc(inline)]
pub use shared::SharedStore;
