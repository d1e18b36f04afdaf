// Copyright (c) The dossier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Writing report documents to disk.

use crate::errors::WriteReportError;
use atomicwrites::{AtomicFile, OverwriteBehavior};
use camino::Utf8Path;
use chrono::NaiveDate;
use dossier_document::{Document, SerializeError};
use std::io::{BufWriter, Write};
use tracing::debug;

/// Returns the file name of the report for a project: `FTU_<PROJECT>-<version>_<yyyy-mm-dd>.html`.
///
/// The project name is upper-cased.
pub fn report_file_name(project_name: &str, version: &str, date: NaiveDate) -> String {
    format!(
        "FTU_{}-{}_{}.html",
        project_name.to_uppercase(),
        version,
        date.format("%Y-%m-%d"),
    )
}

/// Writes a document to `path`, creating parent directories as needed.
///
/// The document is written to a temporary file first and then renamed into place, so `path` is
/// either left untouched or fully written.
pub fn write_document(document: &Document, path: &Utf8Path) -> Result<(), WriteReportError> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|error| WriteReportError::CreateDir {
            dir: dir.to_owned(),
            error,
        })?;
    }

    AtomicFile::new(path, OverwriteBehavior::AllowOverwrite)
        .write(|file| {
            let mut writer = BufWriter::new(file);
            document.serialize(&mut writer)?;
            writer.flush().map_err(SerializeError::from)
        })
        .map_err(|error| match error {
            atomicwrites::Error::Internal(error) => WriteReportError::Write {
                path: path.to_owned(),
                error,
            },
            atomicwrites::Error::User(error) => WriteReportError::Serialize {
                path: path.to_owned(),
                error,
            },
        })?;

    debug!("wrote report with {} pages to {path}", document.page_count());
    Ok(())
}
