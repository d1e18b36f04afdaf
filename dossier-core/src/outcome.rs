// Copyright (c) The dossier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outcome records: the immutable result of a single test invocation.

use crate::metadata::MethodMetadata;
use std::fmt;

/// The tag list recorded for tests that do not declare any tags.
///
/// This sentinel never shows up in the tag index of a report.
pub const NO_TAGS: &str = "N/A";

/// The status of a finished test invocation.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum OutcomeStatus {
    /// The test passed.
    Passed,

    /// The test failed.
    Failed,

    /// The test was aborted, for example because an assumption did not hold.
    Aborted,

    /// The test was skipped or disabled.
    Skipped,
}

impl OutcomeStatus {
    /// All statuses, in declaration order.
    pub const ALL: [Self; 4] = [Self::Passed, Self::Failed, Self::Aborted, Self::Skipped];

    /// Returns true if this is [`Passed`](Self::Passed).
    pub fn is_success(self) -> bool {
        matches!(self, Self::Passed)
    }

    /// Returns the label used for this status in reports.
    pub fn label(self) -> &'static str {
        match self {
            Self::Passed => "Passed",
            Self::Failed => "Failed",
            Self::Aborted => "Aborted",
            Self::Skipped => "Skipped",
        }
    }
}

impl fmt::Display for OutcomeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The immutable record of one observed test invocation.
///
/// Records are created by the [`ResultRecorder`](crate::reporter::ResultRecorder) and never change
/// afterwards.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OutcomeRecord {
    group_id: String,
    sub_group_id: String,
    method_name: String,
    title: Option<String>,
    description: Option<String>,
    tags: Vec<String>,
    status: OutcomeStatus,
    duration_millis: u64,
}

impl OutcomeRecord {
    /// Creates a new record.
    ///
    /// Missing or empty tags are replaced with [`NO_TAGS`], and the duration is forced to zero
    /// for every status other than [`OutcomeStatus::Passed`].
    pub(crate) fn new(
        group_id: impl Into<String>,
        sub_group_id: impl Into<String>,
        method_name: impl Into<String>,
        metadata: MethodMetadata,
        status: OutcomeStatus,
        duration_millis: u64,
    ) -> Self {
        let MethodMetadata {
            title,
            description,
            tags,
        } = metadata;
        let tags = match tags {
            Some(tags) if !tags.is_empty() => tags,
            _ => vec![NO_TAGS.to_owned()],
        };
        let duration_millis = if status.is_success() {
            duration_millis
        } else {
            0
        };

        Self {
            group_id: group_id.into(),
            sub_group_id: sub_group_id.into(),
            method_name: method_name.into(),
            title,
            description,
            tags,
            status,
            duration_millis,
        }
    }

    /// The group this record belongs to: the namespace of the declaring unit.
    pub fn group_id(&self) -> &str {
        &self.group_id
    }

    /// The sub-group this record belongs to: the simple name of the declaring unit.
    pub fn sub_group_id(&self) -> &str {
        &self.sub_group_id
    }

    /// The name of the test method.
    pub fn method_name(&self) -> &str {
        &self.method_name
    }

    /// The title of the test, if one was declared.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// The description of the test, if one was declared.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The tags of the test. Never empty: tests without tags carry [`NO_TAGS`].
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// The status of the invocation.
    pub fn status(&self) -> OutcomeStatus {
        self.status
    }

    /// The time the test took, in milliseconds. Always zero unless the test passed.
    pub fn duration_millis(&self) -> u64 {
        self.duration_millis
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(OutcomeStatus::Failed ; "failed")]
    #[test_case(OutcomeStatus::Aborted ; "aborted")]
    #[test_case(OutcomeStatus::Skipped ; "skipped")]
    fn non_success_duration_is_zero(status: OutcomeStatus) {
        let record = test_helpers::record("pkg.a", "ClassX", "m", &[], status, 4242);
        assert_eq!(record.duration_millis(), 0);
    }

    #[test]
    fn passed_keeps_duration() {
        let record = test_helpers::record("pkg.a", "ClassX", "m", &[], OutcomeStatus::Passed, 120);
        assert_eq!(record.duration_millis(), 120);
    }

    #[test]
    fn tags_default_to_sentinel() {
        let metadata = MethodMetadata {
            tags: Some(vec![]),
            ..MethodMetadata::default()
        };
        let record =
            OutcomeRecord::new("pkg.a", "ClassX", "m", metadata, OutcomeStatus::Passed, 0);
        assert_eq!(record.tags(), [NO_TAGS]);

        let record = test_helpers::record(
            "pkg.a",
            "ClassX",
            "m",
            &["R1", "R1"],
            OutcomeStatus::Passed,
            0,
        );
        assert_eq!(record.tags(), ["R1", "R1"], "tags are not deduplicated");
    }

    #[test]
    fn status_labels() {
        let labels: Vec<_> = OutcomeStatus::ALL.iter().map(|s| s.to_string()).collect();
        assert_eq!(labels, ["Passed", "Failed", "Aborted", "Skipped"]);
        assert!(OutcomeStatus::Passed.is_success());
        assert!(!OutcomeStatus::Skipped.is_success());
    }
}
