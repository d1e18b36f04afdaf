// Copyright (c) The dossier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::outcome::{OutcomeRecord, OutcomeStatus};
use indexmap::IndexMap;
use std::{
    fmt,
    sync::{
        Mutex, PoisonError,
        atomic::{AtomicU64, Ordering},
    },
};

/// Collects outcome records into groups and sub-groups, keeping first-seen order.
///
/// The aggregator can be shared across threads: [`add_result`](Self::add_result) takes `&self`.
/// Each call is assigned a sequence number as soon as it is made, and groups and sub-groups are
/// ordered by the lowest sequence number they have seen, while records within a sub-group are
/// ordered by their own sequence number. The order of the report is therefore the order in which
/// results were submitted, even if threads race for the internal lock.
#[derive(Debug, Default)]
pub struct ResultAggregator {
    next_sequence: AtomicU64,
    groups: Mutex<IndexMap<String, Slot<IndexMap<String, Slot<Vec<(u64, OutcomeRecord)>>>>>>,
}

impl ResultAggregator {
    /// Creates a new, empty aggregator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a record to the aggregate.
    ///
    /// Records are never deduplicated: adding the same record twice stores it twice.
    pub fn add_result(&self, record: OutcomeRecord) {
        let sequence = self.next_sequence.fetch_add(1, Ordering::Relaxed);
        self.add_result_at(record, sequence);
    }

    fn add_result_at(&self, record: OutcomeRecord, sequence: u64) {
        // Every mutation below completes before the guard is dropped, so a poisoned lock still
        // holds a consistent map.
        let mut groups = self.groups.lock().unwrap_or_else(PoisonError::into_inner);
        let group = slot_at_sequence(&mut groups, record.group_id(), sequence);
        let sub_group = slot_at_sequence(&mut group.value, record.sub_group_id(), sequence);
        let index = sub_group
            .value
            .partition_point(|&(existing, _)| existing <= sequence);
        sub_group.value.insert(index, (sequence, record));
    }

    /// Freezes the aggregate into a read-only view.
    pub fn finish(self) -> AggregatedResults {
        let groups = self
            .groups
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        let groups = groups
            .into_iter()
            .map(|(group_id, group)| {
                let sub_groups = group
                    .value
                    .into_iter()
                    .map(|(sub_group_id, sub_group)| {
                        let sub_group = ResultSubGroup {
                            id: sub_group_id.clone(),
                            records: sub_group
                                .value
                                .into_iter()
                                .map(|(_, record)| record)
                                .collect(),
                        };
                        (sub_group_id, sub_group)
                    })
                    .collect();
                let group = ResultGroup {
                    id: group_id.clone(),
                    sub_groups,
                };
                (group_id, group)
            })
            .collect();
        AggregatedResults { groups }
    }
}

#[derive(Debug, Default)]
struct Slot<T> {
    first_sequence: u64,
    value: T,
}

/// Returns the slot for `key`, creating it if necessary, such that the map stays sorted by
/// `first_sequence`.
fn slot_at_sequence<'a, T: Default>(
    map: &'a mut IndexMap<String, Slot<T>>,
    key: &str,
    sequence: u64,
) -> &'a mut Slot<T> {
    let index = match map.get_index_of(key) {
        Some(index) if sequence < map[index].first_sequence => {
            // Seen before, but only by a later submission that won the race for the lock.
            map[index].first_sequence = sequence;
            let target = map
                .values()
                .take(index)
                .position(|slot| slot.first_sequence > sequence)
                .unwrap_or(index);
            map.move_index(index, target);
            target
        }
        Some(index) => index,
        None => {
            let index = map
                .values()
                .position(|slot| slot.first_sequence > sequence)
                .unwrap_or(map.len());
            let slot = Slot {
                first_sequence: sequence,
                value: T::default(),
            };
            map.shift_insert(index, key.to_owned(), slot);
            index
        }
    };
    &mut map[index]
}

/// A frozen, read-only view of all outcomes recorded during a run.
///
/// Groups, sub-groups and records are all iterated in first-seen order.
#[derive(Clone, Debug, Default)]
pub struct AggregatedResults {
    groups: IndexMap<String, ResultGroup>,
}

impl AggregatedResults {
    /// Returns the groups of this aggregate.
    pub fn groups(&self) -> impl ExactSizeIterator<Item = &ResultGroup> + '_ {
        self.groups.values()
    }

    /// Looks up a group by ID.
    pub fn group(&self, id: &str) -> Option<&ResultGroup> {
        self.groups.get(id)
    }

    /// Returns every record, flattened in report order.
    pub fn records(&self) -> impl Iterator<Item = &OutcomeRecord> + '_ {
        self.groups().flat_map(|group| group.records())
    }

    /// Returns the total number of records.
    pub fn record_count(&self) -> usize {
        self.groups().map(|group| group.records().count()).sum()
    }

    /// Returns true if no records were added.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Counts records by status.
    pub fn summary(&self) -> RunSummary {
        let mut summary = RunSummary::default();
        for record in self.records() {
            summary.add(record.status());
        }
        summary
    }
}

/// All records sharing a namespace.
#[derive(Clone, Debug)]
pub struct ResultGroup {
    id: String,
    sub_groups: IndexMap<String, ResultSubGroup>,
}

impl ResultGroup {
    /// The group ID: a namespace.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the sub-groups of this group.
    pub fn sub_groups(&self) -> impl ExactSizeIterator<Item = &ResultSubGroup> + '_ {
        self.sub_groups.values()
    }

    /// Looks up a sub-group by ID.
    pub fn sub_group(&self, id: &str) -> Option<&ResultSubGroup> {
        self.sub_groups.get(id)
    }

    /// Returns every record in this group.
    pub fn records(&self) -> impl Iterator<Item = &OutcomeRecord> + '_ {
        self.sub_groups().flat_map(|sub_group| sub_group.records().iter())
    }
}

/// All records sharing a declaring unit.
#[derive(Clone, Debug)]
pub struct ResultSubGroup {
    id: String,
    records: Vec<OutcomeRecord>,
}

impl ResultSubGroup {
    /// The sub-group ID: the simple name of a declaring unit.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The records in this sub-group, in the order they were submitted.
    pub fn records(&self) -> &[OutcomeRecord] {
        &self.records
    }
}

/// Counts of records by status.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct RunSummary {
    /// The number of passed tests.
    pub passed: usize,

    /// The number of failed tests.
    pub failed: usize,

    /// The number of aborted tests.
    pub aborted: usize,

    /// The number of skipped tests.
    pub skipped: usize,
}

impl RunSummary {
    /// Returns the total number of tests.
    pub fn total(&self) -> usize {
        self.passed + self.failed + self.aborted + self.skipped
    }

    /// Returns the number of tests with the given status.
    pub fn count(&self, status: OutcomeStatus) -> usize {
        match status {
            OutcomeStatus::Passed => self.passed,
            OutcomeStatus::Failed => self.failed,
            OutcomeStatus::Aborted => self.aborted,
            OutcomeStatus::Skipped => self.skipped,
        }
    }

    /// Returns true if every recorded test passed.
    pub fn all_passed(&self) -> bool {
        self.passed == self.total()
    }

    fn add(&mut self, status: OutcomeStatus) {
        match status {
            OutcomeStatus::Passed => self.passed += 1,
            OutcomeStatus::Failed => self.failed += 1,
            OutcomeStatus::Aborted => self.aborted += 1,
            OutcomeStatus::Skipped => self.skipped += 1,
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.total();
        write!(
            f,
            "{total} {} recorded: {} passed, {} failed, {} aborted, {} skipped",
            if total == 1 { "test" } else { "tests" },
            self.passed,
            self.failed,
            self.aborted,
            self.skipped,
        )
    }
}
