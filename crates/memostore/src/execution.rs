// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::sync::atomic::{AtomicBool, Ordering};

static PARALLEL_BY_DEFAULT: AtomicBool = AtomicBool::new(false);

/// How a repository with several producers computes a missing entry.
///
/// Repositories built from a single producer or from a composed
/// [`Factory`](crate::Factory) ignore this setting.
///
/// [`Execution::default()`] returns the process-wide default, which starts as
/// [`Sequential`](Execution::Sequential) and can be changed with
/// [`Execution::set_default`]. Builders read the default once, when
/// [`build`](crate::RepositoryBuilder::build) is called, unless an explicit
/// value was passed to [`execution`](crate::RepositoryBuilder::execution).
///
/// # Examples
///
/// ```
/// use memostore::{Execution, Repository};
///
/// let repository = Repository::builder()
///     .producer(|id: &u32| format!("name-{id}"))
///     .producer(|id: &u32| u64::from(*id) * 10)
///     .execution(Execution::Parallel)
///     .build();
///
/// assert_eq!(repository.get(&4), Some(("name-4".to_string(), 40)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Execution {
    /// Producers run on the calling thread in declared order. The first
    /// failure stops the computation.
    Sequential,
    /// Every producer runs as its own task on the rayon pool and the caller
    /// waits for all of them. The entry is committed only if all succeed.
    Parallel,
}

impl Execution {
    /// Changes the process-wide default returned by [`Execution::default()`].
    ///
    /// Repositories that were already built keep the strategy they were built
    /// with.
    pub fn set_default(execution: Self) {
        PARALLEL_BY_DEFAULT.store(execution == Self::Parallel, Ordering::Relaxed);
    }
}

impl Default for Execution {
    fn default() -> Self {
        if PARALLEL_BY_DEFAULT.load(Ordering::Relaxed) {
            Self::Parallel
        } else {
            Self::Sequential
        }
    }
}
