// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn summary_partitions_results() {
    let mut summary = RunSummary::default();
    summary.push(StepResult::succeeded("pdf-flash"));
    summary.push(StepResult::failed("diffex", "no diffex.csv attachment"));
    summary.push(StepResult::succeeded("cla"));

    assert_eq!(summary.succeeded(), vec!["pdf-flash", "cla"]);
    assert_eq!(summary.failed(), vec!["diffex"]);
    assert!(summary.has_failures());
}

#[test]
fn empty_summary_has_no_failures() {
    let summary = RunSummary::default();
    assert!(!summary.has_failures());
    assert!(summary.succeeded().is_empty());
    assert!(summary.failed().is_empty());
}
