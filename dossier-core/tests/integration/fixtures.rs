// Copyright (c) The dossier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use camino::Utf8PathBuf;
use camino_tempfile::Utf8TempDir;
use chrono::NaiveDate;
use indoc::{formatdoc, indoc};

pub(crate) const METADATA: &str = indoc! {r#"
    ["billing::invoices::totals_include_tax"]
    title = "Totals include tax"
    description = "The invoice total is the sum of its lines plus VAT."
    tags = ["RG-14", "RG-12"]

    ["billing::invoices::rejects_negative_lines"]
    title = "Negative lines are rejected"
    tags = ["RG-12"]
"#};

pub(crate) fn run_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 7).expect("valid date")
}

/// A temporary project directory holding `report.properties` and `metadata.toml`.
pub(crate) struct ProjectDir {
    pub(crate) dir: Utf8TempDir,
}

impl ProjectDir {
    pub(crate) fn new() -> Self {
        let dir = Utf8TempDir::new().expect("temp dir created");
        let properties = formatdoc! {"
            projectname=billing
            version=2.4.0
            output-dir={}
            ",
            dir.path().join("reports"),
        };
        std::fs::write(dir.path().join("report.properties"), properties)
            .expect("properties written");
        std::fs::write(dir.path().join("metadata.toml"), METADATA).expect("metadata written");
        Self { dir }
    }

    pub(crate) fn config_path(&self) -> Utf8PathBuf {
        self.dir.path().join("report.properties")
    }

    pub(crate) fn metadata_path(&self) -> Utf8PathBuf {
        self.dir.path().join("metadata.toml")
    }

    pub(crate) fn reports_dir(&self) -> Utf8PathBuf {
        self.dir.path().join("reports")
    }
}
