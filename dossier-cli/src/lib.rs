// Copyright (c) The dossier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Render human-readable test reports from the JSON output of `cargo test`.
//!
//! ```sh
//! cargo test -- -Z unstable-options --format json --report-time | dossier render
//! ```
//!
//! The report is an XHTML document with a cover page, an index of the business rules covered by
//! the run and one card per test. See [`dossier_core`] for the library behind it.

#![warn(missing_docs)]

mod dispatch;
mod errors;
mod output;

#[doc(hidden)]
pub use dispatch::*;
#[doc(hidden)]
pub use errors::*;
#[doc(hidden)]
pub use output::{OutputContext, StderrStyles};
