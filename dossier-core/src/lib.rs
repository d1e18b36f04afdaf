// Copyright (c) The dossier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

#![warn(missing_docs)]

//! Core functionality for [dossier](https://crates.io/crates/dossier-cli), which turns the
//! outcomes of a test run into a human-readable report.
//!
//! The entry point is [`reporter::DossierReporter`]. A test framework calls its lifecycle hooks
//! for every test invocation, and [`finish`](reporter::DossierReporter::finish) writes a report
//! with one card per test, grouped by module, along with an index of the business rules the run
//! covered. [`libtest::LibtestDriver`] feeds a reporter from the JSON output of `cargo test`.

pub mod config;
pub mod document;
pub mod errors;
pub mod libtest;
pub mod metadata;
pub mod outcome;
pub mod reporter;
mod time;
pub mod timing;
pub mod write;
