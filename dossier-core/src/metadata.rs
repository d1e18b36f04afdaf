// Copyright (c) The dossier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test method identities and the optional metadata attached to them.
//!
//! The driving test framework identifies each test method by its declaring unit (for example a
//! Rust module path like `crate::parser::tests`, or a qualified type name like `pkg.a.ClassX`) and
//! its method name. Titles, descriptions and business-rule tags are looked up separately through
//! the [`MetadataLookup`] capability, so that nothing here depends on how the framework stores
//! them.

use crate::errors::{MetadataTableError, ResolutionError, ResolutionFailure};
use camino::Utf8Path;
use indexmap::IndexMap;
use serde::Deserialize;
use std::fmt;

/// Identifies a test method.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct MethodIdentity {
    declaring_unit: Option<String>,
    method_name: String,
}

impl MethodIdentity {
    /// Creates a new identity for a method declared in the given unit.
    pub fn new(declaring_unit: impl Into<String>, method_name: impl Into<String>) -> Self {
        Self {
            declaring_unit: Some(declaring_unit.into()),
            method_name: method_name.into(),
        }
    }

    /// Creates an identity for a method that has no declaring unit.
    ///
    /// Such identities fail to [`resolve`](Self::resolve).
    pub fn detached(method_name: impl Into<String>) -> Self {
        Self {
            declaring_unit: None,
            method_name: method_name.into(),
        }
    }

    /// Parses a Rust test path, such as `my_crate::parser::tests::parses_empty_input`.
    ///
    /// Everything up to the last `::` is the declaring unit. A path without `::` produces a
    /// [detached](Self::detached) identity.
    pub fn from_test_path(path: &str) -> Self {
        match path.rsplit_once("::") {
            Some((unit, method)) => Self::new(unit, method),
            None => Self::detached(path),
        }
    }

    /// Returns the declaring unit, if any.
    pub fn declaring_unit(&self) -> Option<&str> {
        self.declaring_unit.as_deref()
    }

    /// Returns the method name.
    pub fn method_name(&self) -> &str {
        &self.method_name
    }

    /// Resolves the declaring unit into its namespace and simple name.
    ///
    /// The unit is split at its last `::`, or at its last `.` if it contains no `::`. A unit
    /// without any separator lives in the empty namespace.
    pub fn resolve(&self) -> Result<DeclaringUnit<'_>, ResolutionError> {
        let unit = self
            .declaring_unit
            .as_deref()
            .ok_or_else(|| self.resolution_error(ResolutionFailure::NoDeclaringUnit))?;
        if self.method_name.is_empty() {
            return Err(self.resolution_error(ResolutionFailure::EmptyMethodName));
        }

        let (namespace, name) = unit
            .rsplit_once("::")
            .or_else(|| unit.rsplit_once('.'))
            .unwrap_or(("", unit));
        if name.is_empty() {
            return Err(self.resolution_error(ResolutionFailure::EmptyUnitName));
        }

        Ok(DeclaringUnit { namespace, name })
    }

    fn resolution_error(&self, reason: ResolutionFailure) -> ResolutionError {
        ResolutionError::new(self.clone(), reason)
    }
}

impl fmt::Display for MethodIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.declaring_unit {
            Some(unit) => write!(f, "{unit}::{}", self.method_name),
            None => write!(f, "{}", self.method_name),
        }
    }
}

/// A declaring unit, split into its namespace and simple name.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct DeclaringUnit<'a> {
    /// The namespace the unit lives in. Used as the report group.
    pub namespace: &'a str,

    /// The simple name of the unit. Used as the report sub-group.
    pub name: &'a str,
}

/// Optional metadata attached to a test method.
#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MethodMetadata {
    /// A short, human-readable title.
    #[serde(default)]
    pub title: Option<String>,

    /// A longer description of what the test checks.
    #[serde(default)]
    pub description: Option<String>,

    /// The business rules or requirements exercised by the test.
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

/// Looks up optional metadata for a test method.
///
/// This is implemented for closures, so drivers can adapt whatever mechanism their test framework
/// uses to attach metadata.
pub trait MetadataLookup {
    /// Returns the metadata attached to `method`. Methods without metadata return
    /// `MethodMetadata::default()`.
    fn lookup(&self, method: &MethodIdentity) -> MethodMetadata;
}

impl<F> MetadataLookup for F
where
    F: Fn(&MethodIdentity) -> MethodMetadata,
{
    fn lookup(&self, method: &MethodIdentity) -> MethodMetadata {
        self(method)
    }
}

/// A [`MetadataLookup`] that never has any metadata.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoMetadata;

impl MetadataLookup for NoMetadata {
    fn lookup(&self, _method: &MethodIdentity) -> MethodMetadata {
        MethodMetadata::default()
    }
}

/// A table of metadata keyed by the display form of a [`MethodIdentity`].
///
/// Tables are usually loaded from TOML, with one table per test:
///
/// ```toml
/// ["billing::invoices::tests::totals_include_tax"]
/// title = "Totals include tax"
/// description = "The invoice total is the sum of its lines plus VAT."
/// tags = ["RG-12", "RG-14"]
/// ```
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(transparent)]
pub struct MetadataTable {
    entries: IndexMap<String, MethodMetadata>,
}

impl MetadataTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a table from a TOML file.
    pub fn from_file(path: &Utf8Path) -> Result<Self, MetadataTableError> {
        let contents =
            std::fs::read_to_string(path).map_err(|error| MetadataTableError::Read {
                path: path.to_owned(),
                error,
            })?;
        toml::from_str(&contents).map_err(|error| MetadataTableError::Parse {
            path: path.to_owned(),
            error,
        })
    }

    /// Inserts metadata for a method, replacing any existing entry.
    pub fn insert(&mut self, method: &MethodIdentity, metadata: MethodMetadata) -> &mut Self {
        self.entries.insert(method.to_string(), metadata);
        self
    }

    /// Returns the number of methods with metadata.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl MetadataLookup for MetadataTable {
    fn lookup(&self, method: &MethodIdentity) -> MethodMetadata {
        self.entries
            .get(method.to_string().as_str())
            .cloned()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use test_case::test_case;

    #[test_case(
        MethodIdentity::new("pkg.a.ClassX", "adds"),
        "pkg.a", "ClassX"
        ; "dotted unit")]
    #[test_case(
        MethodIdentity::from_test_path("my_crate::parser::tests::parses"),
        "my_crate::parser", "tests"
        ; "rust test path")]
    #[test_case(
        MethodIdentity::new("ClassX", "adds"),
        "", "ClassX"
        ; "unit without namespace")]
    #[test_case(
        MethodIdentity::new("a.b::Unit", "m"),
        "a.b", "Unit"
        ; "double colon wins over dot")]
    fn resolve_valid(method: MethodIdentity, namespace: &str, name: &str) {
        let unit = method.resolve().expect("identity resolves");
        assert_eq!(unit, DeclaringUnit { namespace, name });
    }

    #[test_case(MethodIdentity::detached("lonely"), ResolutionFailure::NoDeclaringUnit ; "detached")]
    #[test_case(MethodIdentity::from_test_path("lonely"), ResolutionFailure::NoDeclaringUnit ; "path without module")]
    #[test_case(MethodIdentity::new("pkg.", "m"), ResolutionFailure::EmptyUnitName ; "trailing dot")]
    #[test_case(MethodIdentity::new("", "m"), ResolutionFailure::EmptyUnitName ; "empty unit")]
    #[test_case(MethodIdentity::new("pkg.Unit", ""), ResolutionFailure::EmptyMethodName ; "empty method")]
    fn resolve_invalid(method: MethodIdentity, expected: ResolutionFailure) {
        let error = method.resolve().expect_err("identity does not resolve");
        assert_eq!(error.reason(), expected);
        assert_eq!(error.method(), &method);
    }

    #[test]
    fn display_roundtrips_test_path() {
        let path = "my_crate::parser::tests::parses";
        assert_eq!(MethodIdentity::from_test_path(path).to_string(), path);
        assert_eq!(MethodIdentity::detached("lonely").to_string(), "lonely");
    }

    #[test]
    fn metadata_table_from_toml() {
        let input = indoc! {r#"
            ["pkg.a.ClassX::adds"]
            title = "Adds two numbers"
            tags = ["R1", "R2"]

            ["pkg.a.ClassX::subtracts"]
            description = "No title here."
        "#};
        let table: MetadataTable = toml::from_str(input).expect("valid metadata table");
        assert_eq!(table.len(), 2);

        let adds = table.lookup(&MethodIdentity::new("pkg.a.ClassX", "adds"));
        assert_eq!(adds.title.as_deref(), Some("Adds two numbers"));
        assert_eq!(adds.description, None);
        assert_eq!(adds.tags, Some(vec!["R1".to_owned(), "R2".to_owned()]));

        let subtracts = table.lookup(&MethodIdentity::new("pkg.a.ClassX", "subtracts"));
        assert_eq!(subtracts.title, None);
        assert_eq!(subtracts.description.as_deref(), Some("No title here."));

        let missing = table.lookup(&MethodIdentity::new("pkg.a.ClassX", "missing"));
        assert_eq!(missing, MethodMetadata::default());
    }

    #[test]
    fn metadata_table_rejects_unknown_fields() {
        let input = indoc! {r#"
            ["pkg.a.ClassX::adds"]
            titel = "typo"
        "#};
        toml::from_str::<MetadataTable>(input).expect_err("unknown field is rejected");
    }

    #[test]
    fn closures_are_lookups() {
        let lookup = |method: &MethodIdentity| MethodMetadata {
            title: Some(method.method_name().to_uppercase()),
            ..MethodMetadata::default()
        };
        let metadata = lookup.lookup(&MethodIdentity::new("pkg.Unit", "adds"));
        assert_eq!(metadata.title.as_deref(), Some("ADDS"));
    }
}
