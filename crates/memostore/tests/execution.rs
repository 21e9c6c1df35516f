// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Multi-producer behavior under both execution strategies.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use memostore::{Execution, Repository};
use rstest::rstest;

#[rstest]
#[case::sequential(Execution::Sequential)]
#[case::parallel(Execution::Parallel)]
fn all_values_are_committed_together(#[case] execution: Execution) {
    let repository = Repository::builder()
        .producer(|i: &u32| i + 1)
        .producer(|i: &u32| format!("#{i}"))
        .producer(|i: &u32| f64::from(*i) / 2.0)
        .execution(execution)
        .build();

    assert_eq!(repository.get(&5), Some((6, "#5".to_string(), 2.5)));
    assert!(repository.contains(&5));
}

#[rstest]
#[case::sequential(Execution::Sequential)]
#[case::parallel(Execution::Parallel)]
fn one_failure_discards_the_whole_entry(#[case] execution: Execution) {
    let repository = Repository::builder()
        .producer(|i: &u32| *i)
        .try_producer(|i: &u32| if *i % 2 == 0 { Ok(*i) } else { Err("odd key") })
        .producer(|i: &u32| i.to_string())
        .execution(execution)
        .build();

    assert_eq!(repository.get(&3), None);
    assert!(!repository.contains(&3));
    assert_eq!(repository.get_or_reset(&3), (false, (0, 0, String::new())));

    assert_eq!(repository.get(&4), Some((4, 4, "4".to_string())));
}

#[rstest]
#[case::sequential(Execution::Sequential)]
#[case::parallel(Execution::Parallel)]
fn panicking_producer_fails_the_entry(#[case] execution: Execution) {
    let repository = Repository::builder()
        .producer(|i: &i32| *i)
        .producer(|_: &i32| -> i32 { panic!("boom") })
        .execution(execution)
        .build();

    assert_eq!(repository.get(&1), None);
    assert!(!repository.contains(&1));
}

#[test]
fn sequential_stops_after_first_failure() {
    let later = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&later);
    let repository = Repository::builder()
        .try_producer(|_: &i32| Err::<i32, _>("always"))
        .producer(move |_: &i32| counter.fetch_add(1, Ordering::SeqCst))
        .execution(Execution::Sequential)
        .build();

    assert_eq!(repository.get(&1), None);
    assert_eq!(later.load(Ordering::SeqCst), 0);
}

#[test]
fn parallel_runs_every_producer_even_after_a_failure() {
    let later = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&later);
    let repository = Repository::builder()
        .try_producer(|_: &i32| Err::<i32, _>("always"))
        .producer(move |_: &i32| counter.fetch_add(1, Ordering::SeqCst))
        .execution(Execution::Parallel)
        .build();

    assert_eq!(repository.get(&1), None);
    assert_eq!(later.load(Ordering::SeqCst), 1);
}

#[test]
fn parallel_keeps_positions_regardless_of_completion_order() {
    let repository = Repository::builder()
        .producer(|i: &u64| {
            thread::sleep(Duration::from_millis(30));
            i * 2
        })
        .producer(|i: &u64| i * 3)
        .producer(|i: &u64| {
            thread::sleep(Duration::from_millis(10));
            i * 5
        })
        .execution(Execution::Parallel)
        .build();

    assert_eq!(repository.get(&1), Some((2, 3, 5)));
}

#[test]
fn single_producer_is_unaffected_by_execution() {
    let repository = Repository::builder()
        .producer(|i: &i32| i - 1)
        .execution(Execution::Parallel)
        .build();

    assert_eq!(repository.get(&1), Some(0));
}
