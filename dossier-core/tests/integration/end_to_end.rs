// Copyright (c) The dossier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::fixtures::{ProjectDir, run_date};
use dossier_core::{
    config::ProjectConfig,
    errors::ConfigLoadError,
    libtest::LibtestDriver,
    metadata::{MetadataTable, MethodIdentity},
    reporter::{DossierReporter, RunSummary},
    timing::InvocationKey,
};
use indoc::indoc;
use pretty_assertions::assert_eq;
use std::time::Duration;

#[test]
fn hooks_to_report_file() {
    let project = ProjectDir::new();
    let config = ProjectConfig::from_file(&project.config_path()).expect("config loads");
    let metadata = MetadataTable::from_file(&project.metadata_path()).expect("metadata loads");
    let reporter = DossierReporter::new(config, metadata);

    let totals = MethodIdentity::new("billing::invoices", "totals_include_tax");
    let key = InvocationKey::from("totals#1");
    reporter.before_invocation(&key).expect("start");
    reporter
        .after_invocation_with_elapsed(&key, Duration::from_millis(120))
        .expect("end");
    reporter.on_passed(&key, &totals).expect("passed");

    let negative = MethodIdentity::new("billing::invoices", "rejects_negative_lines");
    let key = InvocationKey::from("negative#1");
    reporter.before_invocation(&key).expect("start");
    reporter.after_invocation(&key).expect("end");
    reporter
        .on_failed(&key, &negative, "assertion failed: total < 0")
        .expect("failed");

    let assumption = MethodIdentity::new("billing::currency", "rounds_half_even");
    let key = InvocationKey::from("rounding#1");
    reporter.before_invocation(&key).expect("start");
    reporter
        .on_aborted(&key, &assumption, "exchange rates unavailable")
        .expect("aborted");

    let finished = reporter.finish_with_date(run_date()).expect("report written");
    assert_eq!(
        finished.path,
        project.reports_dir().join("FTU_BILLING-2.4.0_2024-03-07.html")
    );
    assert_eq!(
        finished.summary,
        RunSummary {
            passed: 1,
            failed: 1,
            aborted: 1,
            skipped: 0,
        }
    );
    assert_eq!(finished.page_count, 3);

    let contents = std::fs::read_to_string(&finished.path).expect("report readable");
    assert!(contents.contains("<title>Unit test report: billing 2.4.0</title>"));
    assert!(contents.contains("BILLING 2.4.0<br/>Executed on 07/03/2024"));
    let index = contents
        .find("Business rules covered in this report:")
        .expect("index rendered");
    let rg12 = contents.find("<li>- RG-12</li>").expect("RG-12 indexed");
    let rg14 = contents.find("<li>- RG-14</li>").expect("RG-14 indexed");
    assert!(index < rg12 && rg12 < rg14, "index is sorted");
    assert!(contents.contains("Test: Totals include tax"));
    assert!(contents.contains("120ms"));
    assert!(contents.contains("<li>• N/A</li>"), "untagged tests list N/A");
    assert!(!contents.contains("<li>- N/A</li>"), "N/A is never indexed");
}

#[test]
fn libtest_stream_to_report_file() {
    let project = ProjectDir::new();
    let config = ProjectConfig::from_file(&project.config_path()).expect("config loads");
    let metadata = MetadataTable::from_file(&project.metadata_path()).expect("metadata loads");
    let reporter = DossierReporter::new(config, metadata);

    let input = indoc! {r#"
        { "type": "suite", "event": "started", "test_count": 2 }
        { "type": "test", "event": "started", "name": "billing::invoices::totals_include_tax" }
        { "type": "test", "event": "started", "name": "smoke" }
        { "type": "test", "name": "billing::invoices::totals_include_tax", "event": "ok", "exec_time": 0.25 }
        { "type": "test", "name": "smoke", "event": "ok", "exec_time": 0.5 }
        { "type": "suite", "event": "ok", "passed": 2, "failed": 0, "ignored": 0, "measured": 0, "filtered_out": 0 }
    "#};
    LibtestDriver::new(&reporter)
        .with_root_unit("billing")
        .drive(input.as_bytes())
        .expect("stream is valid");

    let finished = reporter.finish_with_date(run_date()).expect("report written");
    assert_eq!(finished.summary.passed, 2);
    assert!(finished.summary.all_passed());

    let contents = std::fs::read_to_string(&finished.path).expect("report readable");
    assert!(contents.contains("250ms"));
    assert!(contents.contains("[smoke]"));
}

#[test]
fn missing_config_fails_before_recording() {
    let project = ProjectDir::new();
    let path = project.dir.path().join("missing.properties");
    let error = ProjectConfig::from_file(&path).expect_err("config is missing");
    assert!(
        matches!(error, ConfigLoadError::NotFound { .. }),
        "unexpected error: {error}"
    );
}
