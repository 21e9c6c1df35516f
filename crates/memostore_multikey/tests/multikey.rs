// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Integration tests for composite-key repositories.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use memostore::{Entry, Factory, Repository, SharedStore};
use memostore_multikey::{MultiKeyRepository, ThreeKeyRepository, TwoKeyRepository};
use memostore_store::testing::{MockStore, StoreOp};
use static_assertions::{assert_impl_all, assert_not_impl_any};

assert_not_impl_any!(TwoKeyRepository<u8, u8, u8>: Sync);
assert_impl_all!(TwoKeyRepository<u8, u8, u8, SharedStore<(u8, u8), Entry<u8>>>: Send, Sync);

#[test]
fn equal_parts_address_the_same_entry() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let repository = TwoKeyRepository::new(move |first: &String, last: &String| {
        counter.fetch_add(1, Ordering::SeqCst);
        format!("{last}, {first}")
    });

    let name = repository.get("Ada".to_string(), "Lovelace".to_string());
    assert_eq!(name.as_deref(), Some("Lovelace, Ada"));
    assert_eq!(repository.get("Ada".to_string(), "Lovelace".to_string()), name);
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    assert!(!repository.contains("Lovelace".to_string(), "Ada".to_string()));
    assert!(repository.remove("Ada".to_string(), "Lovelace".to_string()));
    assert!(!repository.contains("Ada".to_string(), "Lovelace".to_string()));
}

#[test]
fn three_parts_with_predicate_removal() {
    let repository = ThreeKeyRepository::new(|x: &i32, y: &i32, z: &i32| x * y * z);
    for x in 0..3 {
        for y in 0..3 {
            assert_eq!(repository.get(x, y, 1), Some(x * y));
        }
    }

    assert_eq!(repository.remove_where(|x, y, _| x == y), 3);
    assert_eq!(repository.inner().len(), Some(6));
    assert!(!repository.contains(1, 1, 1));
    assert!(repository.contains(1, 2, 1));

    repository.clear();
    assert_eq!(repository.inner().is_empty(), Some(true));
}

#[test]
fn fallible_constructor_does_not_cache_failures() {
    let repository = TwoKeyRepository::try_new(|a: &u32, b: &u32| a.checked_sub(*b).ok_or("underflow"));

    assert_eq!(repository.get(5, 3), Some(2));
    assert_eq!(repository.get(3, 5), None);
    assert!(!repository.contains(3, 5));
}

#[test]
fn get_with_override_factory() {
    let repository = TwoKeyRepository::new(|a: &u8, b: &u8| u16::from(*a) + u16::from(*b));
    let product = Factory::composed(|(a, b): &(u8, u8)| u16::from(*a) * u16::from(*b));

    assert_eq!(repository.get_with(3, 4, &product), Some(12));
    assert_eq!(repository.get(3, 4), Some(12));
    assert_eq!(repository.get(2, 2), Some(4));
}

#[test]
fn wraps_any_tuple_keyed_repository() {
    let store = MockStore::<(u8, char), Entry<String>>::new();
    let repository = Repository::builder()
        .name("labels")
        .producer(|(n, c): &(u8, char)| format!("{c}{n}"))
        .build_with_store(store.clone());

    let labels = MultiKeyRepository::from_repository(repository);
    assert_eq!(labels.get(7, 'x').as_deref(), Some("x7"));
    assert_eq!(labels.inner().name(), "labels");
    assert!(store.operations().contains(&StoreOp::Get((7, 'x'))));

    let repository = labels.into_inner();
    assert!(repository.contains(&(7, 'x')));
}
