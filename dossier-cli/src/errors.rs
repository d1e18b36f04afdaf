// Copyright (c) The dossier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::output::{NO_HEADING, StderrStyles};
use camino::Utf8PathBuf;
use dossier_core::{
    errors::{ConfigLoadError, LibtestError, MetadataTableError, WriteReportError},
    reporter::RunSummary,
};
use owo_colors::OwoColorize;
use std::error::Error;
use thiserror::Error;
use tracing::error;

pub(crate) type Result<T, E = ExpectedError> = std::result::Result<T, E>;

/// Documented exit codes for `dossier` failures.
///
/// Unknown/unexpected failures will always result in exit code 1.
pub enum DossierExitCode {}

impl DossierExitCode {
    /// No errors occurred and dossier exited normally.
    pub const OK: i32 = 0;

    /// The project configuration or the test metadata could not be loaded.
    pub const SETUP_ERROR: i32 = 96;

    /// One or more tests did not pass, and `--fail-on-test-failure` was passed in.
    pub const TEST_RUN_FAILED: i32 = 100;

    /// The libtest event stream could not be read or replayed.
    pub const EVENT_STREAM_FAILED: i32 = 104;

    /// The report could not be written.
    pub const WRITE_REPORT_FAILED: i32 = 110;
}

// The #[error()] strings are placeholders: errors are meant to be printed with display_to_stderr,
// which colorizes them and prints their causes.

/// An expected error that stops `dossier` from producing a report.
#[derive(Debug, Error)]
#[doc(hidden)]
pub enum ExpectedError {
    #[error("failed to load project configuration")]
    ConfigLoad {
        #[from]
        err: ConfigLoadError,
    },
    #[error("failed to load test metadata")]
    MetadataLoad {
        #[from]
        err: MetadataTableError,
    },
    #[error("failed to open libtest event stream")]
    InputOpen {
        path: Utf8PathBuf,
        #[source]
        err: std::io::Error,
    },
    #[error("failed to replay libtest event stream")]
    EventStream {
        #[from]
        err: LibtestError,
    },
    #[error("failed to write report")]
    WriteReport {
        #[from]
        err: WriteReportError,
    },
    #[error("test run failed")]
    TestRunFailed { summary: RunSummary },
}

impl ExpectedError {
    /// Returns the exit code for the process.
    pub fn process_exit_code(&self) -> i32 {
        match self {
            Self::ConfigLoad { .. } | Self::MetadataLoad { .. } => DossierExitCode::SETUP_ERROR,
            Self::InputOpen { .. } | Self::EventStream { .. } => {
                DossierExitCode::EVENT_STREAM_FAILED
            }
            Self::WriteReport { .. } => DossierExitCode::WRITE_REPORT_FAILED,
            Self::TestRunFailed { .. } => DossierExitCode::TEST_RUN_FAILED,
        }
    }

    /// Displays this error to stderr.
    pub fn display_to_stderr(&self, styles: &StderrStyles) {
        let mut next_error = match self {
            Self::ConfigLoad { err } => {
                error!("{err}");
                err.source()
            }
            Self::MetadataLoad { err } => {
                error!("{err}");
                err.source()
            }
            Self::InputOpen { path, err } => {
                error!(
                    "failed to open libtest event stream at `{}`",
                    path.style(styles.bold)
                );
                Some(err as &(dyn Error + 'static))
            }
            Self::EventStream { err } => {
                error!("{err}");
                err.source()
            }
            Self::WriteReport { err } => {
                error!("{err}");
                err.source()
            }
            Self::TestRunFailed { summary } => {
                let not_passed = summary.total() - summary.passed;
                error!(
                    "test run failed: {} of {} tests did not pass",
                    not_passed.style(styles.failure),
                    summary.total(),
                );
                None
            }
        };

        while let Some(err) = next_error {
            error!(target: NO_HEADING, "\nCaused by:\n  {}", err);
            next_error = err.source();
        }
    }
}
