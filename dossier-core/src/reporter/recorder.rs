// Copyright (c) The dossier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{
    errors::{ProtocolViolation, ProtocolViolationKind, RecordError},
    metadata::{MetadataLookup, MethodIdentity},
    outcome::{OutcomeRecord, OutcomeStatus},
};
use tracing::debug;

/// Turns finished test invocations into [`OutcomeRecord`]s.
///
/// The recorder resolves the declaring unit of each method and attaches the metadata returned by
/// its [`MetadataLookup`]. It has no side effects on any aggregate: callers decide what to do with
/// the records.
#[derive(Clone, Debug)]
pub struct ResultRecorder<M> {
    lookup: M,
}

impl<M: MetadataLookup> ResultRecorder<M> {
    /// Creates a new recorder.
    pub fn new(lookup: M) -> Self {
        Self { lookup }
    }

    /// Records the outcome of a test invocation.
    ///
    /// A measured duration is required for passing tests, and ignored otherwise.
    pub fn record_outcome(
        &self,
        method: &MethodIdentity,
        status: OutcomeStatus,
        measured_millis: Option<u64>,
    ) -> Result<OutcomeRecord, RecordError> {
        let unit = method.resolve()?;

        let duration_millis = match (status, measured_millis) {
            (OutcomeStatus::Passed, Some(millis)) => millis,
            (OutcomeStatus::Passed, None) => {
                return Err(ProtocolViolation::new(
                    method,
                    ProtocolViolationKind::MissingDuration,
                )
                .into());
            }
            (_, _) => 0,
        };

        let metadata = self.lookup.lookup(method);
        debug!(
            group = unit.namespace,
            sub_group = unit.name,
            title = ?metadata.title,
            description = ?metadata.description,
            tags = ?metadata.tags,
            "recording {status} outcome for {method}",
        );

        Ok(OutcomeRecord::new(
            unit.namespace,
            unit.name,
            method.method_name(),
            metadata,
            status,
            duration_millis,
        ))
    }
}
