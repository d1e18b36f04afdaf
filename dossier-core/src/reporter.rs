// Copyright (c) The dossier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Observe test invocations and collect their outcomes into a report.
//!
//! The main type here is [`DossierReporter`], which ties the pieces together: lifecycle hooks are
//! timed through a [`DurationTracker`](crate::timing::DurationTracker), turned into
//! [`OutcomeRecord`](crate::outcome::OutcomeRecord)s by a [`ResultRecorder`], and collected by a
//! [`ResultAggregator`]. Once the run is over, [`DossierReporter::finish`] builds and writes the
//! report document.

mod aggregator;
mod imp;
mod recorder;

pub use aggregator::*;
pub use imp::*;
pub use recorder::*;
