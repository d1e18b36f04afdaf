// Copyright (c) The dossier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Duration measurement for test invocations.
//!
//! Each invocation moves through a small state machine, keyed by its [`InvocationKey`]:
//!
//! ```text
//!   Idle --mark_start--> Started --mark_end--> Completed --take_completed--> Idle
//!                           |
//!                           +----mark_end_and_get_duration----> Idle
//! ```
//!
//! Any other transition is a [`ProtocolViolation`]. State is only ever keyed by invocation, so
//! concurrent invocations of the same test method never observe each other's timestamps.

use crate::{
    errors::{ProtocolViolation, ProtocolViolationKind},
    time::{StopwatchStart, stopwatch},
};
use std::{
    collections::HashMap,
    fmt,
    sync::{Mutex, MutexGuard, PoisonError},
    time::Duration,
};
use tracing::trace;

/// Uniquely identifies one concrete test invocation.
///
/// Keys are supplied by the driving framework. When tests run in parallel, a key must be unique
/// per invocation rather than per test method.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct InvocationKey(String);

impl InvocationKey {
    /// Creates a new key.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }
}

impl fmt::Display for InvocationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for InvocationKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for InvocationKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

#[derive(Debug)]
enum InvocationState {
    Started(StopwatchStart),
    Completed(Duration),
}

/// Tracks start timestamps and measured durations of in-flight invocations.
///
/// All methods take `&self`, so a single tracker can be shared across worker threads.
#[derive(Debug, Default)]
pub struct DurationTracker {
    invocations: Mutex<HashMap<InvocationKey, InvocationState>>,
}

impl DurationTracker {
    /// Creates a new tracker with no invocations in flight.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the start of an invocation.
    pub fn mark_start(&self, key: &InvocationKey) -> Result<(), ProtocolViolation> {
        let mut invocations = self.lock();
        if invocations.contains_key(key) {
            return Err(ProtocolViolation::new(
                key,
                ProtocolViolationKind::AlreadyStarted,
            ));
        }
        let start = stopwatch();
        trace!("invocation {key} started at {}", start.start_time());
        invocations.insert(key.clone(), InvocationState::Started(start));
        Ok(())
    }

    /// Ends a started invocation and returns its elapsed time in milliseconds.
    ///
    /// The invocation returns to the idle state.
    pub fn mark_end_and_get_duration(&self, key: &InvocationKey) -> Result<u64, ProtocolViolation> {
        let mut invocations = self.lock();
        match invocations.remove(key) {
            Some(InvocationState::Started(start)) => Ok(duration_millis(start.snapshot().duration)),
            Some(state @ InvocationState::Completed(_)) => {
                invocations.insert(key.clone(), state);
                Err(ProtocolViolation::new(
                    key,
                    ProtocolViolationKind::AlreadyCompleted,
                ))
            }
            None => Err(ProtocolViolation::new(key, ProtocolViolationKind::NotStarted)),
        }
    }

    /// Ends a started invocation, measuring its elapsed time. The duration is kept until
    /// [`take_completed`](Self::take_completed) is called.
    pub fn mark_end(&self, key: &InvocationKey) -> Result<(), ProtocolViolation> {
        self.complete_with(key, |start| {
            let snapshot = start.snapshot();
            trace!("invocation {key} ended at {}", snapshot.end_time());
            snapshot.duration
        })
    }

    /// Ends a started invocation with an elapsed time measured by the driver itself.
    pub fn mark_end_with_elapsed(
        &self,
        key: &InvocationKey,
        elapsed: Duration,
    ) -> Result<(), ProtocolViolation> {
        self.complete_with(key, |_| elapsed)
    }

    /// Takes the measured duration of a completed invocation, in milliseconds.
    ///
    /// The invocation returns to the idle state.
    pub fn take_completed(&self, key: &InvocationKey) -> Result<u64, ProtocolViolation> {
        let mut invocations = self.lock();
        match invocations.remove(key) {
            Some(InvocationState::Completed(duration)) => Ok(duration_millis(duration)),
            Some(state @ InvocationState::Started(_)) => {
                invocations.insert(key.clone(), state);
                Err(ProtocolViolation::new(
                    key,
                    ProtocolViolationKind::NotCompleted,
                ))
            }
            None => Err(ProtocolViolation::new(key, ProtocolViolationKind::NotStarted)),
        }
    }

    /// Forgets any state kept for an invocation. Returns true if there was any.
    pub fn discard(&self, key: &InvocationKey) -> bool {
        self.lock().remove(key).is_some()
    }

    /// Returns the number of invocations that have started but not been consumed yet.
    pub fn in_flight(&self) -> usize {
        self.lock().len()
    }

    fn complete_with(
        &self,
        key: &InvocationKey,
        elapsed: impl FnOnce(&StopwatchStart) -> Duration,
    ) -> Result<(), ProtocolViolation> {
        let mut invocations = self.lock();
        let state = invocations
            .get_mut(key)
            .ok_or_else(|| ProtocolViolation::new(key, ProtocolViolationKind::NotStarted))?;
        match state {
            InvocationState::Started(start) => {
                *state = InvocationState::Completed(elapsed(start));
                Ok(())
            }
            InvocationState::Completed(_) => Err(ProtocolViolation::new(
                key,
                ProtocolViolationKind::AlreadyCompleted,
            )),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<InvocationKey, InvocationState>> {
        // A panic while holding the lock cannot leave the map half-updated: every critical
        // section performs a single insert, remove or replace.
        self.invocations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

fn duration_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
