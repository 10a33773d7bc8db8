// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Admission policy: which pipeline steps apply to a record, and whether
//! the record belongs in the queue at all.
//!
//! Pure functions of the record snapshot — no network, no filesystem.
//! The listener applies [`decide`] to every record it polls; the executor
//! re-applies it to the freshly loaded record and then subtracts the
//! persisted completed-step markers.

use crate::record::JobRecord;
use regex::Regex;
use std::sync::LazyLock;

/// Step names, in the order steps run when more than one applies.
pub const STEP_PDF_FLASH: &str = "pdf-flash";
pub const STEP_CLA: &str = "cla";
pub const STEP_DIFFEX: &str = "diffex";

/// Trackers rename a re-uploaded attachment by appending ` (<guid>)`.
/// Stripping the suffix makes the latest upload match the expected name.
#[allow(clippy::expect_used)]
static GUID_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r" \([0-9a-f]{8}-[0-9a-f]{4}-[1-5][0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}\)")
        .expect("constant regex pattern is valid")
});

/// Tunable inputs to the admission decision.
#[derive(Debug, Clone)]
pub struct AdmissionPolicy {
    /// Status meaning the record is finished and its queue entry and
    /// output directory should be cleaned up.
    pub terminal_status: String,
    /// Statuses in which the crawl-log analysis step applies.
    pub qa_statuses: Vec<String>,
    /// Label requesting the PDF link sweep.
    pub pdf_flash_label: String,
    /// Attachment name (lowercase, suffix-stripped) that triggers the
    /// expected-vs-crawled diff step.
    pub diffex_filename: String,
}

impl Default for AdmissionPolicy {
    fn default() -> Self {
        Self {
            terminal_status: "Done".to_string(),
            qa_statuses: vec!["Ready For QA".to_string(), "Partner QA".to_string()],
            pdf_flash_label: "run-pdf-flash".to_string(),
            diffex_filename: "diffex.csv".to_string(),
        }
    }
}

/// What the listener should do with a polled record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Queue (or refresh) the record; these steps currently apply.
    Admit(Vec<String>),
    /// Drop any queue entry; optionally purge the job's output directory.
    Remove { purge_output: bool },
    /// Not a queue concern at all.
    Ignore,
}

/// Decide admission for one record.
///
/// Records whose key is not a valid job id are ignored outright — the
/// tracker project also carries tickets that are not crawls. Terminal
/// records are removed with their output; records with no applicable
/// steps are removed from the queue but keep their output.
pub fn decide(record: &JobRecord, policy: &AdmissionPolicy) -> Decision {
    if crate::id::JobId::parse(&record.id).is_err() {
        return Decision::Ignore;
    }
    if record.status == policy.terminal_status {
        return Decision::Remove { purge_output: true };
    }
    let steps = applicable_steps(record, policy);
    if steps.is_empty() {
        return Decision::Remove { purge_output: false };
    }
    Decision::Admit(steps)
}

/// The ordered list of steps that apply to a record right now.
pub fn applicable_steps(record: &JobRecord, policy: &AdmissionPolicy) -> Vec<String> {
    let mut steps = Vec::new();

    if record.has_label(&policy.pdf_flash_label) {
        steps.push(STEP_PDF_FLASH.to_string());
    }

    if policy.qa_statuses.iter().any(|s| *s == record.status) {
        steps.push(STEP_CLA.to_string());
    }

    let has_diffex = record
        .attachments
        .iter()
        .any(|a| strip_guid_suffix(&a.filename).to_lowercase() == policy.diffex_filename);
    if has_diffex {
        steps.push(STEP_DIFFEX.to_string());
    }

    steps
}

/// Remove the tracker's duplicate-rename guid suffix from a filename.
pub fn strip_guid_suffix(filename: &str) -> String {
    GUID_SUFFIX.replace_all(filename, "").into_owned()
}

#[cfg(test)]
#[path = "admission_tests.rs"]
mod tests;
