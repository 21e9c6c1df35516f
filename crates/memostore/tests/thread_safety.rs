// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The thread-safety boundary is decided by the store.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Instant;

use memostore::{Entry, ExpirableRepository, Factory, Producer, Repository, SharedStore, StatefulRepository};
use static_assertions::{assert_impl_all, assert_not_impl_any};

assert_impl_all!(Repository<u32, String>: Send);
assert_not_impl_any!(Repository<u32, String>: Sync);
assert_impl_all!(Repository<u32, String, SharedStore<u32, Entry<String>>>: Send, Sync);

assert_not_impl_any!(ExpirableRepository<u32, String>: Sync);
assert_impl_all!(ExpirableRepository<u32, String, SharedStore<u32, Entry<String, Instant>>>: Send, Sync);
assert_impl_all!(StatefulRepository<u32, u8, (u8, u8), SharedStore<u32, Entry<(u8, u8), u8>>>: Send, Sync);

assert_impl_all!(Producer<u32, String>: Send, Sync, Clone);
assert_impl_all!(Factory<u32, (u8, String)>: Send, Sync, Clone);

#[test]
fn shared_repository_serves_many_threads() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let repository = Repository::builder()
        .producer(move |i: &u64| {
            counter.fetch_add(1, Ordering::SeqCst);
            i * 2
        })
        .build_with_store(SharedStore::new());

    thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                for i in 0..16 {
                    assert_eq!(repository.get(&i), Some(i * 2));
                }
            });
        }
    });

    assert_eq!(repository.len(), Some(16));
    // Concurrent misses on one key may compute more than once.
    assert!(calls.load(Ordering::SeqCst) >= 16);
}

#[test]
fn local_repository_moves_between_threads() {
    let repository = Repository::builder().producer(|i: &u8| u16::from(*i) * 3).build();
    assert_eq!(repository.get(&1), Some(3));

    let repository = thread::spawn(move || {
        assert_eq!(repository.get(&2), Some(6));
        repository
    })
    .join()
    .unwrap();

    assert_eq!(repository.len(), Some(2));
}
