// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job executor: one pipeline run over one job.
//!
//! Runs inside its own worker process. Loads the job context, computes
//! the applicable step list, and executes the steps sequentially. One
//! step's failure never aborts the remaining steps; every step — failed
//! or not — gets its completion marker before the executor moves on.
//! Only a context-stage fault (no record, no logs, unregistered step)
//! skips the markers, since none are addressable yet.

use std::sync::Arc;

use aqa_adapters::{LogStore, QaToolkit, Tracker};
use aqa_core::{applicable_steps, AdmissionPolicy, JobId, RunSummary, StepResult};
use aqa_storage::{MarkerStore, StepLogger, Workdir};

use crate::context::JobContext;
use crate::error::EngineError;
use crate::registry::{Step, StepCtx, StepFailure, StepRegistry};

/// Executes pipeline runs.
pub struct Executor {
    tracker: Arc<dyn Tracker>,
    logs: Arc<dyn LogStore>,
    toolkit: Arc<dyn QaToolkit>,
    markers: MarkerStore,
    workdir: Workdir,
    registry: StepRegistry,
    policy: AdmissionPolicy,
    logs_prefix: String,
}

impl Executor {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        tracker: Arc<dyn Tracker>,
        logs: Arc<dyn LogStore>,
        toolkit: Arc<dyn QaToolkit>,
        markers: MarkerStore,
        workdir: Workdir,
        registry: StepRegistry,
        policy: AdmissionPolicy,
        logs_prefix: impl Into<String>,
    ) -> Self {
        Self {
            tracker,
            logs,
            toolkit,
            markers,
            workdir,
            registry,
            policy,
            logs_prefix: logs_prefix.into(),
        }
    }

    /// Run the applicable pipeline steps for `id`.
    ///
    /// Returns the per-step summary; `Err` only for context-stage
    /// faults, which abort this job without writing any marker.
    pub async fn run_job(&self, id: &JobId) -> Result<RunSummary, EngineError> {
        tracing::info!(job_id = %id, "QA run starting");
        let ctx = JobContext::load(id, &self.tracker, &self.logs, &self.logs_prefix).await?;

        let completed = self.markers.completed(id)?;
        let to_run: Vec<String> = applicable_steps(&ctx.record, &self.policy)
            .into_iter()
            .filter(|s| !completed.contains(s))
            .collect();

        if to_run.is_empty() {
            tracing::info!(job_id = %id, "no applicable steps, nothing to do");
            return Ok(RunSummary::default());
        }

        // Resolve every step up front: an unregistered name fails the
        // whole job here, before any side effects.
        let steps: Vec<Arc<dyn Step>> = to_run
            .iter()
            .map(|name| {
                self.registry
                    .get(name)
                    .ok_or_else(|| EngineError::UnregisteredStep(name.clone()))
            })
            .collect::<Result<_, _>>()?;

        self.comment_best_effort(
            &ctx.record.key,
            id,
            &format!("Automated QA starting.\nWill run: {}", to_run.join(", ")),
        )
        .await;

        let date = Workdir::date_stamp();
        let mut summary = RunSummary::default();
        for step in steps {
            let name = step.name();
            tracing::info!(job_id = %id, step = name, "step starting");
            match self.run_step(&ctx, step.as_ref(), &date).await {
                Ok(()) => {
                    tracing::info!(job_id = %id, step = name, "step complete");
                    summary.push(StepResult::succeeded(name));
                }
                Err(e) => {
                    tracing::error!(job_id = %id, step = name, error = %e,
                        "step failed, moving onto next step");
                    self.comment_best_effort(&ctx.record.key, id, &format!("{name} failed:\n{e}"))
                        .await;
                    summary.push(StepResult::failed(name, e.to_string()));
                }
            }
            // Marker regardless of outcome, so a step that can never
            // succeed is not re-selected forever.
            if let Err(e) = self.markers.mark_complete(id, name) {
                tracing::error!(job_id = %id, step = name, error = %e,
                    "failed to persist completion marker");
            }
        }

        let text = format!(
            "Automated QA finished.\nSucceeded: {}\nFailed: {}",
            fmt_list(&summary.succeeded()),
            fmt_list(&summary.failed()),
        );
        self.comment_best_effort(&ctx.record.key, id, &text).await;
        tracing::info!(
            job_id = %id,
            succeeded = ?summary.succeeded(),
            failed = ?summary.failed(),
            "QA run finished"
        );
        Ok(summary)
    }

    /// Run one step in its own date-stamped directory with its own logs.
    async fn run_step(
        &self,
        ctx: &JobContext,
        step: &dyn Step,
        date: &str,
    ) -> Result<(), StepFailure> {
        let dir = self
            .workdir
            .create_step_dir(&ctx.id, step.name(), date)
            .map_err(|e| StepFailure::new(format!("creating step directory: {e}")))?;
        let log = StepLogger::new(&dir.join("logs"));
        log.info(&format!("step {} starting", step.name()));

        let step_ctx = StepCtx {
            job: ctx,
            dir: &dir,
            log: &log,
            tracker: self.tracker.as_ref(),
            toolkit: self.toolkit.as_ref(),
            policy: &self.policy,
        };
        match step.run(&step_ctx).await {
            Ok(()) => {
                log.info(&format!("step {} finished", step.name()));
                Ok(())
            }
            Err(e) => {
                log.error(&format!("step {} failed: {e}", step.name()));
                Err(e)
            }
        }
    }

    async fn comment_best_effort(&self, key: &str, id: &JobId, text: &str) {
        if let Err(e) = self.tracker.add_comment(key, text).await {
            tracing::error!(job_id = %id, error = %e, "failed to post tracker comment");
        }
    }
}

fn fmt_list(items: &[&str]) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join(", ")
    }
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
