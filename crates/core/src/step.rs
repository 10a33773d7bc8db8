// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-step outcomes and the job-level run summary.

use serde::{Deserialize, Serialize};

/// Outcome of one pipeline step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepStatus {
    Succeeded,
    Failed,
}

/// Result of running one step, kept only for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepResult {
    pub step: String,
    pub status: StepStatus,
    /// Failure detail when status is Failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl StepResult {
    pub fn succeeded(step: impl Into<String>) -> Self {
        Self { step: step.into(), status: StepStatus::Succeeded, detail: None }
    }

    pub fn failed(step: impl Into<String>, detail: impl Into<String>) -> Self {
        Self { step: step.into(), status: StepStatus::Failed, detail: Some(detail.into()) }
    }
}

/// Summary of one full pipeline run over a job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub results: Vec<StepResult>,
}

impl RunSummary {
    pub fn push(&mut self, result: StepResult) {
        self.results.push(result);
    }

    pub fn succeeded(&self) -> Vec<&str> {
        self.results
            .iter()
            .filter(|r| r.status == StepStatus::Succeeded)
            .map(|r| r.step.as_str())
            .collect()
    }

    pub fn failed(&self) -> Vec<&str> {
        self.results
            .iter()
            .filter(|r| r.status == StepStatus::Failed)
            .map(|r| r.step.as_str())
            .collect()
    }

    pub fn has_failures(&self) -> bool {
        self.results.iter().any(|r| r.status == StepStatus::Failed)
    }
}

#[cfg(test)]
#[path = "step_tests.rs"]
mod tests;
