// Copyright (c) The dossier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{
    errors::{DossierExitCode, ExpectedError, Result},
    output::{NO_HEADING, OutputContext, OutputOpts, clap_styles},
};
use camino::Utf8PathBuf;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use dossier_core::{
    config::ProjectConfig,
    libtest::LibtestDriver,
    metadata::MetadataTable,
    reporter::{DossierReporter, FinishedReport},
};
use owo_colors::OwoColorize;
use std::{
    fs::File,
    io::{self, BufReader},
};
use tracing::{debug, info};

/// Render human-readable test reports.
///
/// `dossier render` reads the JSON event stream printed by
/// `cargo test -- -Z unstable-options --format json --report-time` and writes a report with one
/// card per test.
#[derive(Debug, Parser)]
#[command(version, name = "dossier", styles = clap_styles::style())]
pub struct DossierApp {
    #[command(flatten)]
    output: OutputOpts,

    #[command(subcommand)]
    command: Command,
}

impl DossierApp {
    /// Initializes the output context.
    pub fn init_output(&self) -> OutputContext {
        self.output.init()
    }

    /// Executes the app, returning the process exit code.
    pub fn exec(self, output: &OutputContext) -> Result<i32> {
        match self.command {
            Command::Render(opts) => opts.exec(output),
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Render a report from a libtest JSON event stream
    Render(RenderOpts),
}

#[derive(Debug, Args)]
struct RenderOpts {
    /// Project configuration, with `projectname` and `version` keys
    #[arg(long, value_name = "PATH", default_value = ProjectConfig::DEFAULT_FILE_NAME)]
    config: Utf8PathBuf,

    /// TOML file with titles, descriptions and tags for tests
    #[arg(long, value_name = "PATH")]
    metadata: Option<Utf8PathBuf>,

    /// File to read libtest events from, or `-` for standard input
    #[arg(long, value_name = "PATH", default_value = "-")]
    input: Utf8PathBuf,

    /// Directory to write the report to [default: from configuration]
    #[arg(long, value_name = "DIR")]
    output_dir: Option<Utf8PathBuf>,

    /// Declaring unit for tests defined at the root of a crate
    #[arg(long, value_name = "NAME", default_value = "crate")]
    root_unit: String,

    /// Date printed on the report, as YYYY-MM-DD [default: today]
    #[arg(long, value_name = "DATE")]
    date: Option<NaiveDate>,

    /// Exit with a non-zero code if any test did not pass
    #[arg(long)]
    fail_on_test_failure: bool,
}

impl RenderOpts {
    fn exec(self, output: &OutputContext) -> Result<i32> {
        let mut config = ProjectConfig::from_file(&self.config)?;
        if let Some(output_dir) = self.output_dir {
            config.set_output_dir(output_dir);
        }
        let metadata = match &self.metadata {
            Some(path) => MetadataTable::from_file(path)?,
            None => MetadataTable::new(),
        };
        debug!("loaded metadata for {} tests", metadata.len());

        let reporter = DossierReporter::new(config, metadata);
        let config = reporter.config();
        debug!(
            "rendering report for {} {} into {}",
            config.project_name(),
            config.version(),
            config.output_dir(),
        );
        let mut driver = LibtestDriver::new(&reporter).with_root_unit(self.root_unit);
        if self.input == "-" {
            driver.drive(io::stdin().lock())?;
        } else {
            let file = File::open(&self.input).map_err(|err| ExpectedError::InputOpen {
                path: self.input.clone(),
                err,
            })?;
            driver.drive(BufReader::new(file))?;
        }

        let finished = match self.date {
            Some(date) => reporter.finish_with_date(date)?,
            None => reporter.finish()?,
        };
        print_summary(&finished, output);

        if self.fail_on_test_failure && !finished.summary.all_passed() {
            return Err(ExpectedError::TestRunFailed {
                summary: finished.summary,
            });
        }
        Ok(DossierExitCode::OK)
    }
}

fn print_summary(finished: &FinishedReport, output: &OutputContext) {
    let styles = output.stderr_styles();
    let summary_style = if finished.summary.all_passed() {
        styles.success
    } else {
        styles.failure
    };
    info!(
        target: NO_HEADING,
        "{}: {}",
        "Summary".style(summary_style),
        finished.summary,
    );
    info!(
        "wrote {} pages to {}",
        finished.page_count,
        finished.path.style(styles.bold),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::Color;
    use camino::Utf8Path;
    use camino_tempfile::Utf8TempDir;
    use clap::CommandFactory;
    use indoc::{formatdoc, indoc};

    #[test]
    fn verify_app() {
        DossierApp::command().debug_assert();
    }

    #[test]
    fn render_defaults() {
        let app = DossierApp::try_parse_from(["dossier", "render"]).expect("valid arguments");
        let Command::Render(opts) = app.command;
        assert_eq!(opts.config, "report.properties");
        assert_eq!(opts.input, "-");
        assert_eq!(opts.root_unit, "crate");
        assert_eq!(opts.date, None);
        assert!(!opts.fail_on_test_failure);
    }

    #[test]
    fn render_options() {
        let app = DossierApp::try_parse_from([
            "dossier",
            "render",
            "--config",
            "dossier.toml",
            "--date",
            "2024-03-07",
            "--output-dir",
            "out",
            "--fail-on-test-failure",
            "--color",
            "never",
        ])
        .expect("valid arguments");
        assert_eq!(app.output.color, Color::Never);
        let Command::Render(opts) = app.command;
        assert_eq!(opts.config, "dossier.toml");
        assert_eq!(opts.date, NaiveDate::from_ymd_opt(2024, 3, 7));
        assert_eq!(opts.output_dir.as_deref(), Some(Utf8Path::new("out")));
        assert!(opts.fail_on_test_failure);

        DossierApp::try_parse_from(["dossier", "render", "--date", "07/03/2024"])
            .expect_err("dates are YYYY-MM-DD");
    }

    #[test]
    fn render_from_file() {
        let dir = Utf8TempDir::new().expect("temp dir created");
        let config = dir.path().join("report.properties");
        std::fs::write(
            &config,
            formatdoc! {"
                projectname=billing
                version=2.4.0
                output-dir={}
                ",
                dir.path().join("reports"),
            },
        )
        .expect("config written");
        let input = dir.path().join("events.json");
        std::fs::write(
            &input,
            indoc! {r#"
                { "type": "suite", "event": "started", "test_count": 2 }
                { "type": "test", "event": "started", "name": "invoices::totals" }
                { "type": "test", "event": "started", "name": "smoke" }
                { "type": "test", "name": "invoices::totals", "event": "ok", "exec_time": 0.5 }
                { "type": "test", "name": "smoke", "event": "failed", "stdout": "boom" }
            "#},
        )
        .expect("events written");

        let output = OutputContext {
            color: Color::Never,
        };
        let args = [
            "dossier",
            "render",
            "--config",
            config.as_str(),
            "--input",
            input.as_str(),
            "--date",
            "2024-03-07",
        ];

        let app = DossierApp::try_parse_from(args).expect("valid arguments");
        assert_eq!(app.exec(&output).expect("report rendered"), 0);
        assert!(
            dir.path()
                .join("reports/FTU_BILLING-2.4.0_2024-03-07.html")
                .is_file()
        );

        let app = DossierApp::try_parse_from(args.into_iter().chain(["--fail-on-test-failure"]))
            .expect("valid arguments");
        let error = app.exec(&output).expect_err("a test failed");
        assert_eq!(error.process_exit_code(), DossierExitCode::TEST_RUN_FAILED);
    }

    #[test]
    fn missing_config_is_setup_error() {
        let dir = Utf8TempDir::new().expect("temp dir created");
        let config = dir.path().join("missing.properties");
        let app = DossierApp::try_parse_from(["dossier", "render", "--config", config.as_str()])
            .expect("valid arguments");
        let output = OutputContext {
            color: Color::Never,
        };
        let error = app.exec(&output).expect_err("config is missing");
        assert_eq!(error.process_exit_code(), DossierExitCode::SETUP_ERROR);
    }
}
