// Copyright (c) The dossier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Errors produced by dossier.

use crate::metadata::MethodIdentity;
use camino::Utf8PathBuf;
use config::ConfigError;
use dossier_document::SerializeError;
use std::{fmt, io};
use thiserror::Error;

/// An error returned when a method identity cannot be resolved to a declaring unit.
///
/// Identity is structural: without a declaring unit, an outcome cannot be placed in the report at
/// all, so this is never recovered from.
#[derive(Clone, Debug, Error)]
#[error("failed to resolve declaring unit for test method `{method}`: {reason}")]
pub struct ResolutionError {
    method: MethodIdentity,
    reason: ResolutionFailure,
}

impl ResolutionError {
    pub(crate) fn new(method: MethodIdentity, reason: ResolutionFailure) -> Self {
        Self { method, reason }
    }

    /// Returns the method identity that failed to resolve.
    pub fn method(&self) -> &MethodIdentity {
        &self.method
    }

    /// Returns the reason resolution failed.
    pub fn reason(&self) -> ResolutionFailure {
        self.reason
    }
}

/// The reason a [`ResolutionError`] occurred.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ResolutionFailure {
    /// The method has no declaring unit.
    NoDeclaringUnit,

    /// The declaring unit has an empty name.
    EmptyUnitName,

    /// The method name is empty.
    EmptyMethodName,
}

impl fmt::Display for ResolutionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoDeclaringUnit => write!(f, "no declaring unit"),
            Self::EmptyUnitName => write!(f, "declaring unit name is empty"),
            Self::EmptyMethodName => write!(f, "method name is empty"),
        }
    }
}

/// Lifecycle hooks were invoked out of order by the driving test framework.
#[derive(Clone, Debug, Error)]
#[error("lifecycle protocol violated for `{subject}`: {kind}")]
pub struct ProtocolViolation {
    subject: String,
    kind: ProtocolViolationKind,
}

impl ProtocolViolation {
    pub(crate) fn new(subject: impl fmt::Display, kind: ProtocolViolationKind) -> Self {
        Self {
            subject: subject.to_string(),
            kind,
        }
    }

    /// Returns the invocation key or method the violation was detected for.
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Returns the kind of violation.
    pub fn kind(&self) -> ProtocolViolationKind {
        self.kind
    }
}

/// The kind of [`ProtocolViolation`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ProtocolViolationKind {
    /// The invocation was started twice.
    AlreadyStarted,

    /// The invocation was ended without having been started.
    NotStarted,

    /// The invocation was ended twice.
    AlreadyCompleted,

    /// A duration was requested before the invocation ended.
    NotCompleted,

    /// A passing outcome was reported without a measured duration.
    MissingDuration,
}

impl fmt::Display for ProtocolViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyStarted => write!(f, "invocation started twice"),
            Self::NotStarted => write!(f, "invocation was never started"),
            Self::AlreadyCompleted => write!(f, "invocation ended twice"),
            Self::NotCompleted => write!(f, "invocation has not ended yet"),
            Self::MissingDuration => write!(f, "passing outcome has no measured duration"),
        }
    }
}

/// An error that occurred while recording a test outcome.
#[derive(Clone, Debug, Error)]
pub enum RecordError {
    /// The method identity could not be resolved.
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    /// Lifecycle hooks were called out of order.
    #[error(transparent)]
    Protocol(#[from] ProtocolViolation),
}

/// An error that occurred while loading the project configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigLoadError {
    /// The configuration file does not exist.
    #[error("project configuration `{path}` not found")]
    NotFound {
        /// The path that was looked up.
        path: Utf8PathBuf,
    },

    /// The configuration file could not be read or deserialized.
    #[error("failed to parse project configuration at `{path}`")]
    Parse {
        /// The path of the configuration file.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        err: ConfigError,
    },
}

/// An error that occurred while loading a metadata table.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MetadataTableError {
    /// The metadata file could not be read.
    #[error("failed to read test metadata from `{path}`")]
    Read {
        /// The path of the metadata file.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: io::Error,
    },

    /// The metadata file is not valid TOML, or does not have the expected shape.
    #[error("failed to parse test metadata at `{path}`")]
    Parse {
        /// The path of the metadata file.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: toml::de::Error,
    },
}

/// An error that occurred while writing the report document to disk.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WriteReportError {
    /// The output directory could not be created.
    #[error("failed to create report directory `{dir}`")]
    CreateDir {
        /// The directory that could not be created.
        dir: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: io::Error,
    },

    /// The report could not be written atomically.
    #[error("failed to write report to `{path}`")]
    Write {
        /// The destination of the report.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: io::Error,
    },

    /// The report could not be serialized.
    #[error("failed to serialize report to `{path}`")]
    Serialize {
        /// The destination of the report.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: SerializeError,
    },
}

/// An error that occurred while driving a reporter from a libtest JSON event stream.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LibtestError {
    /// The event stream could not be read.
    #[error("failed to read libtest event stream")]
    Read {
        /// The underlying error.
        #[source]
        error: io::Error,
    },

    /// A line of the event stream is not a valid libtest event.
    #[error("invalid libtest event on line {line_number}")]
    Parse {
        /// The 1-based line number.
        line_number: usize,

        /// The underlying error.
        #[source]
        error: serde_json::Error,
    },

    /// An event could not be recorded.
    #[error("failed to record libtest event on line {line_number}")]
    Record {
        /// The 1-based line number.
        line_number: usize,

        /// The underlying error.
        #[source]
        error: RecordError,
    },
}
