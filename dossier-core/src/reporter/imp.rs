// Copyright (c) The dossier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{AggregatedResults, ResultAggregator, ResultRecorder, RunSummary};
use crate::{
    config::ProjectConfig,
    document::DossierBuilder,
    errors::{ProtocolViolation, RecordError, WriteReportError},
    metadata::{MetadataLookup, MethodIdentity},
    outcome::OutcomeStatus,
    timing::{DurationTracker, InvocationKey},
    write::{report_file_name, write_document},
};
use camino::Utf8PathBuf;
use chrono::{Local, NaiveDate};
use dossier_document::Document;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Observes test invocations and produces a report once the run is over.
///
/// The test framework driving the reporter calls, for each invocation:
///
/// 1. [`before_invocation`](Self::before_invocation) just before the test body runs,
/// 2. [`after_invocation`](Self::after_invocation) (or
///    [`after_invocation_with_elapsed`](Self::after_invocation_with_elapsed)) just after,
/// 3. exactly one of [`on_passed`](Self::on_passed), [`on_failed`](Self::on_failed),
///    [`on_aborted`](Self::on_aborted) or [`on_skipped`](Self::on_skipped).
///
/// Skipped tests may report their outcome without ever being started.
///
/// Every hook takes `&self`, so a reporter can be shared by worker threads running tests
/// concurrently, as long as each invocation has its own [`InvocationKey`].
#[derive(Debug)]
pub struct DossierReporter<M> {
    config: ProjectConfig,
    tracker: DurationTracker,
    recorder: ResultRecorder<M>,
    aggregator: ResultAggregator,
}

impl<M: MetadataLookup> DossierReporter<M> {
    /// Creates a new reporter.
    pub fn new(config: ProjectConfig, lookup: M) -> Self {
        Self {
            config,
            tracker: DurationTracker::new(),
            recorder: ResultRecorder::new(lookup),
            aggregator: ResultAggregator::new(),
        }
    }

    /// Returns the project configuration.
    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    /// Called just before the body of a test runs.
    pub fn before_invocation(&self, key: &InvocationKey) -> Result<(), ProtocolViolation> {
        self.tracker.mark_start(key)
    }

    /// Called just after the body of a test ran, whatever its outcome.
    pub fn after_invocation(&self, key: &InvocationKey) -> Result<(), ProtocolViolation> {
        self.tracker.mark_end(key)
    }

    /// Like [`after_invocation`](Self::after_invocation), for drivers that measure elapsed time
    /// themselves.
    pub fn after_invocation_with_elapsed(
        &self,
        key: &InvocationKey,
        elapsed: Duration,
    ) -> Result<(), ProtocolViolation> {
        self.tracker.mark_end_with_elapsed(key, elapsed)
    }

    /// Called when a test passed. The invocation must have ended.
    pub fn on_passed(&self, key: &InvocationKey, method: &MethodIdentity) -> Result<(), RecordError> {
        let duration_millis = self.tracker.take_completed(key)?;
        self.record(method, OutcomeStatus::Passed, Some(duration_millis))
    }

    /// Called when a test failed.
    pub fn on_failed(
        &self,
        key: &InvocationKey,
        method: &MethodIdentity,
        cause: &str,
    ) -> Result<(), RecordError> {
        self.tracker.discard(key);
        debug!("{method} failed: {cause}");
        self.record(method, OutcomeStatus::Failed, None)
    }

    /// Called when a test was aborted, for example because one of its assumptions did not hold.
    pub fn on_aborted(
        &self,
        key: &InvocationKey,
        method: &MethodIdentity,
        cause: &str,
    ) -> Result<(), RecordError> {
        self.tracker.discard(key);
        debug!("{method} aborted: {cause}");
        self.record(method, OutcomeStatus::Aborted, None)
    }

    /// Called when a test was skipped or disabled.
    pub fn on_skipped(
        &self,
        key: &InvocationKey,
        method: &MethodIdentity,
        reason: Option<&str>,
    ) -> Result<(), RecordError> {
        self.tracker.discard(key);
        match reason {
            Some(reason) => debug!("{method} skipped: {reason}"),
            None => debug!("{method} skipped"),
        }
        self.record(method, OutcomeStatus::Skipped, None)
    }

    fn record(
        &self,
        method: &MethodIdentity,
        status: OutcomeStatus,
        measured_millis: Option<u64>,
    ) -> Result<(), RecordError> {
        let record = self.recorder.record_outcome(method, status, measured_millis)?;
        self.aggregator.add_result(record);
        Ok(())
    }

    /// Builds the report, dated today, and writes it to the configured output directory.
    pub fn finish(self) -> Result<FinishedReport, WriteReportError> {
        self.finish_with_date(Local::now().date_naive())
    }

    /// Builds the report with the given date and writes it to the configured output directory.
    pub fn finish_with_date(self, date: NaiveDate) -> Result<FinishedReport, WriteReportError> {
        let path = self.config.output_dir().join(report_file_name(
            self.config.project_name(),
            self.config.version(),
            date,
        ));
        let (results, document) = self.into_parts(date);

        write_document(&document, &path)?;
        let summary = results.summary();
        info!("wrote report for {} tests to {path}", summary.total());

        Ok(FinishedReport {
            path,
            summary,
            page_count: document.page_count(),
        })
    }

    /// Builds the report with the given date, without writing it.
    pub fn into_document(self, date: NaiveDate) -> Document {
        self.into_parts(date).1
    }

    fn into_parts(self, date: NaiveDate) -> (AggregatedResults, Document) {
        let in_flight = self.tracker.in_flight();
        if in_flight > 0 {
            warn!("{in_flight} invocations started but never reported an outcome");
        }

        let results = self.aggregator.finish();
        let document = DossierBuilder::new(self.config.project_name(), self.config.version())
            .with_date(date)
            .build(&results);
        (results, document)
    }
}

/// A report that has been written to disk.
#[derive(Clone, Debug)]
pub struct FinishedReport {
    /// Where the report was written.
    pub path: Utf8PathBuf,

    /// Counts of recorded outcomes.
    pub summary: RunSummary,

    /// The number of pages of the report.
    pub page_count: usize,
}
