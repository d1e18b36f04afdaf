// Copyright (c) The dossier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::fixtures::run_date;
use dossier_core::{
    config::ProjectConfig,
    metadata::{MethodIdentity, NoMetadata},
    reporter::DossierReporter,
    timing::InvocationKey,
};
use std::{sync::Barrier, thread, time::Duration};

#[test]
fn parallel_invocations_of_one_method() {
    const THREADS: usize = 8;
    const RUNS: usize = 25;

    let reporter = DossierReporter::new(ProjectConfig::new("billing", "2.4.0"), NoMetadata);
    let method = MethodIdentity::new("billing::invoices", "totals_include_tax");
    let barrier = Barrier::new(THREADS);

    thread::scope(|scope| {
        for thread_index in 0..THREADS {
            let reporter = &reporter;
            let method = &method;
            let barrier = &barrier;
            scope.spawn(move || {
                barrier.wait();
                for run in 0..RUNS {
                    // Each invocation gets its own key, even though the method is shared.
                    let key = InvocationKey::new(format!("{thread_index}:{run}"));
                    reporter.before_invocation(&key).expect("start");
                    reporter
                        .after_invocation_with_elapsed(&key, Duration::from_millis(7))
                        .expect("end");
                    if run % 5 == 0 {
                        reporter.on_failed(&key, method, "flaked").expect("failed");
                    } else {
                        reporter.on_passed(&key, method).expect("passed");
                    }
                }
            });
        }
    });

    let document = reporter.into_document(run_date());
    let body = document.pages()[2].text();
    let total = THREADS * RUNS;
    let failed = THREADS * RUNS.div_ceil(5);
    assert_eq!(body.matches("[totals_include_tax]").count(), total);
    assert_eq!(body.matches("Failed\n").count(), failed);
    assert_eq!(body.matches("7ms\n").count(), total - failed);
}
