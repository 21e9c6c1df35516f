// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Shared Repository Example
//!
//! Demonstrates a repository backed by an internally synchronized store, so
//! it can be used from several threads at once.

use std::thread;

use memostore::{Repository, SharedStore};

fn main() {
    let store = SharedStore::builder().name("squares").initial_capacity(64).build();

    let squares = Repository::builder()
        .name("squares")
        .producer(|n: &u64| n * n)
        .build_with_store(store);

    thread::scope(|scope| {
        for worker in 0..4_u64 {
            let squares = &squares;
            scope.spawn(move || {
                for n in (worker * 16)..((worker + 1) * 16) {
                    let _square = squares.get(&n);
                }
            });
        }
    });

    let _count = squares.len();
    squares.clear();
}
