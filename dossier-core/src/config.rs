// Copyright (c) The dossier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Project configuration: the name and version printed on the report, and where it is written.
//!
//! Configuration is read from a file (by default `report.properties`), with environment variables
//! prefixed by `DOSSIER_` layered on top:
//!
//! ```properties
//! projectname=billing
//! version=2.4.0
//! output-dir=target/reports
//! ```

use crate::errors::ConfigLoadError;
use camino::{Utf8Path, Utf8PathBuf};
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

/// Project configuration.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProjectConfig {
    project_name: String,
    version: String,
    output_dir: Utf8PathBuf,
}

impl ProjectConfig {
    /// The file configuration is read from by default.
    pub const DEFAULT_FILE_NAME: &'static str = "report.properties";

    /// Environment configuration uses this prefix, plus a _.
    pub const ENVIRONMENT_PREFIX: &'static str = "DOSSIER";

    /// The directory reports are written to, unless configured otherwise.
    pub const DEFAULT_OUTPUT_DIR: &'static str = "target";

    /// Creates a new configuration that writes to [`DEFAULT_OUTPUT_DIR`](Self::DEFAULT_OUTPUT_DIR).
    pub fn new(project_name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            project_name: project_name.into(),
            version: version.into(),
            output_dir: Self::DEFAULT_OUTPUT_DIR.into(),
        }
    }

    /// Reads configuration from a file.
    ///
    /// Files ending in `.toml` are read as TOML. Anything else is read as a list of `key=value`
    /// pairs, which covers Java-style `.properties` files.
    pub fn from_file(path: &Utf8Path) -> Result<Self, ConfigLoadError> {
        if !path.is_file() {
            return Err(ConfigLoadError::NotFound {
                path: path.to_owned(),
            });
        }

        let format = match path.extension() {
            Some("toml") => FileFormat::Toml,
            _ => FileFormat::Ini,
        };
        let config = Config::builder()
            .add_source(File::new(path.as_str(), format))
            .add_source(Environment::with_prefix(Self::ENVIRONMENT_PREFIX))
            .build()
            .and_then(|config| config.try_deserialize::<ProjectConfigDeserialize>())
            .map_err(|err| ConfigLoadError::Parse {
                path: path.to_owned(),
                err,
            })?;

        Ok(Self {
            project_name: config.project_name,
            version: config.version,
            output_dir: config
                .output_dir
                .unwrap_or_else(|| Self::DEFAULT_OUTPUT_DIR.into()),
        })
    }

    /// Sets the output directory.
    pub fn set_output_dir(&mut self, output_dir: impl Into<Utf8PathBuf>) -> &mut Self {
        self.output_dir = output_dir.into();
        self
    }

    /// The name of the project under test.
    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    /// The version of the project under test.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// The directory reports are written to.
    pub fn output_dir(&self) -> &Utf8Path {
        &self.output_dir
    }
}

#[derive(Debug, Deserialize)]
struct ProjectConfigDeserialize {
    #[serde(rename = "projectname")]
    project_name: String,
    version: String,
    #[serde(default, rename = "output-dir", alias = "output_dir")]
    output_dir: Option<Utf8PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino_tempfile::Utf8TempDir;
    use indoc::indoc;
    use test_case::test_case;

    fn write_config(dir: &Utf8TempDir, file_name: &str, contents: &str) -> Utf8PathBuf {
        let path = dir.path().join(file_name);
        std::fs::write(&path, contents).expect("config file written");
        path
    }

    #[test_case(
        "report.properties",
        indoc! {"
            projectname=billing
            version=2.4.0
        "},
        "target"
        ; "properties with default output dir"
    )]
    #[test_case(
        "report.properties",
        indoc! {"
            # Generated by the release pipeline.
            projectname = billing
            version = 2.4.0
            output-dir = out/reports
        "},
        "out/reports"
        ; "properties with output dir"
    )]
    #[test_case(
        "dossier.toml",
        indoc! {r#"
            projectname = "billing"
            version = "2.4.0"
            output-dir = "reports"
        "#},
        "reports"
        ; "toml"
    )]
    fn load_valid(file_name: &str, contents: &str, output_dir: &str) {
        let dir = Utf8TempDir::new().expect("temp dir created");
        let path = write_config(&dir, file_name, contents);

        let config = ProjectConfig::from_file(&path).expect("config is valid");
        assert_eq!(config.project_name(), "billing");
        assert_eq!(config.version(), "2.4.0");
        assert_eq!(config.output_dir(), output_dir);
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = Utf8TempDir::new().expect("temp dir created");
        let path = dir.path().join(ProjectConfig::DEFAULT_FILE_NAME);

        let error = ProjectConfig::from_file(&path).expect_err("file does not exist");
        assert!(
            matches!(&error, ConfigLoadError::NotFound { path: p } if *p == path),
            "unexpected error: {error}"
        );
    }

    #[test]
    fn missing_key_is_parse_error() {
        let dir = Utf8TempDir::new().expect("temp dir created");
        let path = write_config(&dir, "report.properties", "projectname=billing\n");

        let error = ProjectConfig::from_file(&path).expect_err("version is missing");
        assert!(
            matches!(error, ConfigLoadError::Parse { .. }),
            "unexpected error: {error}"
        );
    }

    #[test]
    fn programmatic_config() {
        let mut config = ProjectConfig::new("billing", "2.4.0");
        assert_eq!(config.output_dir(), ProjectConfig::DEFAULT_OUTPUT_DIR);
        config.set_output_dir("elsewhere");
        assert_eq!(config.output_dir(), "elsewhere");
    }
}
