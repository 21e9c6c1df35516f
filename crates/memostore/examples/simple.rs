// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Simple Repository Example
//!
//! Demonstrates memoized lookups, removal by key and by predicate, and
//! multi-value entries.

use memostore::{Execution, Repository};

fn main() {
    // One producer: each key is computed at most once
    let labels = Repository::builder()
        .name("labels")
        .producer(|i: &i32| format!("Default Value of {i}"))
        .build();

    for i in 0..12 {
        let _label = labels.get(&i);
    }

    // Returns the stored value without running the producer again
    let _again = labels.get(&3);

    // Remove one key, then every key above 7
    let _removed = labels.remove(&3);
    let _count = labels.remove_where(|i| *i > 7);

    // Several producers: values are computed together and stored as a tuple
    let stats = Repository::builder()
        .name("stats")
        .producer(|n: &u64| n * n)
        .producer(|n: &u64| n.is_power_of_two())
        .try_producer(|n: &u64| u8::try_from(*n))
        .execution(Execution::Parallel)
        .on_diagnostic(|message| eprintln!("stats: {message}"))
        .build();

    // All three producers succeed: the tuple is stored
    let _full = stats.get(&8);

    // The third producer fails: nothing is stored and the defaults are returned
    let (_ok, _defaults) = stats.get_or_reset(&1_000);

    // Access one position of the tuple
    let _square = stats.get_field::<0>(&8);
}
