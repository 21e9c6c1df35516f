// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Integration tests for `LocalStore` and `SharedStore`.

use std::thread;

use memostore_memory::{LocalStore, SharedStore};
use memostore_store::{Entry, Store};

static_assertions::assert_impl_all!(LocalStore<String, Entry<i32>>: Send);
static_assertions::assert_not_impl_any!(LocalStore<String, Entry<i32>>: Sync);
static_assertions::assert_impl_all!(SharedStore<String, Entry<i32>>: Send, Sync);

fn exercise(store: &impl Store<String, Entry<i32>>) {
    let key = "key".to_string();
    assert!(store.get(&key).expect("get failed").is_none());
    assert!(!store.contains(&key).expect("contains failed"));

    store.insert(&key, Entry::new(42)).expect("insert failed");
    assert_eq!(store.get(&key).expect("get failed"), Some(Entry::new(42)));

    store.insert(&key, Entry::new(7)).expect("insert failed");
    assert_eq!(*store.get(&key).expect("get failed").expect("entry should exist").values(), 7);
    assert_eq!(store.len(), Some(1));

    assert!(store.remove(&key).expect("remove failed"));
    assert!(!store.remove(&key).expect("remove failed"));
    assert_eq!(store.is_empty(), Some(true));
}

#[test]
fn local_store_basic_operations() {
    exercise(&LocalStore::new());
}

#[test]
fn shared_store_basic_operations() {
    exercise(&SharedStore::new());
}

#[test]
fn local_keys_snapshot_survives_removal() {
    let store = LocalStore::<i32, Entry<i32>>::with_capacity(16);
    for i in 0..10 {
        store.insert(&i, Entry::new(i)).unwrap();
    }

    let mut keys = store.keys().unwrap();
    keys.sort_unstable();
    assert_eq!(keys, (0..10).collect::<Vec<_>>());

    for key in keys.iter().filter(|k| **k % 2 == 0) {
        assert!(store.remove(key).unwrap());
    }
    assert_eq!(store.len(), Some(5));
}

#[test]
fn shared_keys_snapshot_and_clear() {
    let store = SharedStore::<i32, Entry<i32>>::builder().initial_capacity(16).name("test").build();
    for i in 0..10 {
        store.insert(&i, Entry::new(i)).unwrap();
    }

    let mut keys = store.keys().unwrap();
    keys.sort_unstable();
    assert_eq!(keys, (0..10).collect::<Vec<_>>());

    store.clear().unwrap();
    assert_eq!(store.len(), Some(0));
    assert!(store.keys().unwrap().is_empty());
}

#[test]
fn shared_store_is_usable_across_threads() {
    let store = SharedStore::<u32, Entry<u32>>::new();

    thread::scope(|scope| {
        for t in 0..4u32 {
            let store = &store;
            scope.spawn(move || {
                for i in 0..25u32 {
                    let key = t * 100 + i;
                    store.insert(&key, Entry::new(key)).unwrap();
                }
            });
        }
    });

    assert_eq!(store.len(), Some(100));
    assert_eq!(store.get(&301).unwrap(), Some(Entry::new(301)));
}

#[test]
fn clones_of_shared_store_see_same_entries() {
    let store = SharedStore::<u32, Entry<&'static str>>::default();
    let clone = store.clone();

    store.insert(&1, Entry::new("one")).unwrap();
    assert!(clone.contains(&1).unwrap());
}
