// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Expiring Repository Example
//!
//! Demonstrates time-based validity: entries are recomputed once their
//! expiry passes, and `trim` sweeps out everything that has expired.

use std::thread;
use std::time::Duration;

use memostore::Repository;
use tick::runtime::InactiveClock;

fn main() -> Result<(), memostore::Error> {
    let (clock, _driver) = InactiveClock::default().activate();
    let stamp = clock.clone();

    // Each entry records when it was computed and expires one second later
    let sessions = Repository::builder()
        .name("sessions")
        .producer(move |user: &String| (format!("token-for-{user}"), stamp.system_time()))
        .expire_after(clock, Duration::from_secs(1))
        .build()?;

    let alice = "alice".to_string();
    let _first = sessions.get_entry(&alice);
    let _valid = sessions.is_valid(&alice);

    thread::sleep(Duration::from_millis(1100));

    // Expired: is_valid is false until the next get recomputes the entry
    let _expired = !sessions.is_valid(&alice);
    let _second = sessions.get_entry(&alice);

    // Nothing else has expired yet
    let _trimmed = sessions.trim();

    Ok(())
}
