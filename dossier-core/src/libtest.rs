// Copyright (c) The dossier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Drive a [`DossierReporter`] from libtest's JSON output.
//!
//! libtest (the test harness used by `cargo test`) can print one JSON object per line when run
//! with `-Z unstable-options --format json`. Adding `--report-time` includes the execution time
//! of each test. The events this module understands look like:
//!
//! ```json
//! { "type": "suite", "event": "started", "test_count": 2 }
//! { "type": "test", "event": "started", "name": "parser::tests::parses" }
//! { "type": "test", "name": "parser::tests::parses", "event": "ok", "exec_time": 0.012 }
//! { "type": "test", "name": "parser::tests::rejects", "event": "failed", "stdout": "..." }
//! { "type": "test", "name": "parser::tests::slow", "event": "ignored", "message": "slow" }
//! { "type": "suite", "event": "failed", "passed": 1, "failed": 1, "ignored": 1, ... }
//! ```
//!
//! Output from `cargo` itself and from tests that print to stdout is interleaved with the JSON
//! events, so lines that do not start with `{` are skipped.
//!
//! Test names are paths relative to the crate root: everything up to the last `::` is the
//! declaring unit. Each `suite started` event starts a new test binary, so invocation keys are
//! formed from the suite index and the test name.

use crate::{
    errors::{LibtestError, RecordError},
    metadata::{MetadataLookup, MethodIdentity},
    reporter::DossierReporter,
    timing::InvocationKey,
};
use serde::Deserialize;
use std::{io::BufRead, time::Duration};
use tracing::{debug, warn};

/// Replays libtest JSON events into a [`DossierReporter`].
#[derive(Debug)]
pub struct LibtestDriver<'a, M> {
    reporter: &'a DossierReporter<M>,
    root_unit: Option<String>,
    suite_index: usize,
    line_number: usize,
}

impl<'a, M: MetadataLookup> LibtestDriver<'a, M> {
    /// Creates a new driver.
    pub fn new(reporter: &'a DossierReporter<M>) -> Self {
        Self {
            reporter,
            root_unit: None,
            suite_index: 0,
            line_number: 0,
        }
    }

    /// Sets the declaring unit for tests at the root of a crate, whose names have no module path.
    ///
    /// Without a root unit, such tests fail to resolve.
    pub fn with_root_unit(mut self, root_unit: impl Into<String>) -> Self {
        self.root_unit = Some(root_unit.into());
        self
    }

    /// Reads events until the end of `reader`.
    pub fn drive(&mut self, reader: impl BufRead) -> Result<(), LibtestError> {
        for line in reader.lines() {
            let line = line.map_err(|error| LibtestError::Read { error })?;
            self.handle_line(&line)?;
        }
        Ok(())
    }

    /// Handles a single line of output.
    pub fn handle_line(&mut self, line: &str) -> Result<(), LibtestError> {
        self.line_number += 1;
        let line = line.trim();
        if !line.starts_with('{') {
            return Ok(());
        }

        let line_number = self.line_number;
        let event: LibtestEvent = serde_json::from_str(line)
            .map_err(|error| LibtestError::Parse { line_number, error })?;
        self.handle_event(event)
            .map_err(|error| LibtestError::Record { line_number, error })
    }

    fn handle_event(&mut self, event: LibtestEvent) -> Result<(), RecordError> {
        let reporter = self.reporter;
        match event {
            LibtestEvent::Suite(SuiteEvent::Started { test_count }) => {
                self.suite_index += 1;
                debug!(
                    "suite {} started with {test_count} tests",
                    self.suite_index
                );
            }
            LibtestEvent::Suite(SuiteEvent::Finished {
                passed,
                failed,
                ignored,
            }) => {
                debug!(
                    "suite {} finished: {passed} passed, {failed} failed, {ignored} ignored",
                    self.suite_index
                );
            }
            LibtestEvent::Test(TestEvent::Started { name }) => {
                reporter.before_invocation(&self.key(&name))?;
            }
            LibtestEvent::Test(TestEvent::Ok { name, exec_time }) => {
                let key = self.key(&name);
                match exec_time.and_then(|secs| Duration::try_from_secs_f64(secs).ok()) {
                    Some(elapsed) => reporter.after_invocation_with_elapsed(&key, elapsed)?,
                    None => reporter.after_invocation(&key)?,
                }
                reporter.on_passed(&key, &self.identity(&name))?;
            }
            LibtestEvent::Test(TestEvent::Failed {
                name,
                message,
                stdout,
            }) => {
                let cause = message
                    .or(stdout)
                    .unwrap_or_else(|| "test failed".to_owned());
                reporter.on_failed(&self.key(&name), &self.identity(&name), &cause)?;
            }
            LibtestEvent::Test(TestEvent::Ignored { name, message }) => {
                reporter.on_skipped(&self.key(&name), &self.identity(&name), message.as_deref())?;
            }
            LibtestEvent::Test(TestEvent::Timeout { name }) => {
                warn!("test {name} has been running for a long time");
            }
            LibtestEvent::Suite(SuiteEvent::Other)
            | LibtestEvent::Test(TestEvent::Other)
            | LibtestEvent::Other => {}
        }
        Ok(())
    }

    fn key(&self, name: &str) -> InvocationKey {
        InvocationKey::new(format!("{}:{name}", self.suite_index))
    }

    fn identity(&self, name: &str) -> MethodIdentity {
        match (name.contains("::"), &self.root_unit) {
            (false, Some(root_unit)) => MethodIdentity::new(root_unit.clone(), name),
            _ => MethodIdentity::from_test_path(name),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum LibtestEvent {
    Suite(SuiteEvent),
    Test(TestEvent),
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "event", rename_all = "lowercase")]
enum SuiteEvent {
    Started {
        test_count: usize,
    },
    #[serde(rename = "ok", alias = "failed")]
    Finished {
        passed: usize,
        failed: usize,
        ignored: usize,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "event", rename_all = "lowercase")]
enum TestEvent {
    Started {
        name: String,
    },
    Ok {
        name: String,
        #[serde(default)]
        exec_time: Option<f64>,
    },
    Failed {
        name: String,
        #[serde(default)]
        message: Option<String>,
        #[serde(default)]
        stdout: Option<String>,
    },
    Ignored {
        name: String,
        #[serde(default)]
        message: Option<String>,
    },
    Timeout {
        name: String,
    },
    #[serde(other)]
    Other,
}
