// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job context loading.
//!
//! Pulls together everything a pipeline run needs: the fresh tracker
//! record (not the queued snapshot), the combined crawl log, and the
//! scope rules. Any piece failing to load aborts the job run before a
//! single step executes — and before any completion marker is written.

use std::sync::Arc;

use aqa_adapters::{LogStore, Tracker};
use aqa_core::{JobId, JobRecord};

use crate::error::EngineError;

/// Label put on records identified as duplicates of another record for
/// the same crawl, so they are only reported once.
const DUPLICATE_LABEL: &str = "duplicate";

/// Everything loaded for one job run.
#[derive(Debug)]
pub struct JobContext {
    pub id: JobId,
    /// The record as it is *now*, re-fetched at load time.
    pub record: JobRecord,
    /// All of the crawl's `crawl.log` files joined into one string.
    pub crawl_log: String,
    /// Scope rules: URL prefixes considered in scope for this crawl.
    pub scope: Vec<String>,
}

impl JobContext {
    /// Load the full context for `id`.
    ///
    /// `logs_prefix` is the log-store key prefix completed by the job id
    /// (e.g. `crawl-logs/tna-`).
    pub async fn load(
        id: &JobId,
        tracker: &Arc<dyn Tracker>,
        logs: &Arc<dyn LogStore>,
        logs_prefix: &str,
    ) -> Result<Self, EngineError> {
        let record = load_record(id, tracker).await?;
        let keys = logs
            .list(&format!("{logs_prefix}{id}"))
            .await
            .map_err(|e| context_fault(id, format!("listing crawl output: {e}")))?;

        let crawl_log = load_crawl_log(id, logs, &keys).await?;
        let scope = load_scope(id, logs, &keys).await?;

        tracing::info!(
            job_id = %id,
            log_bytes = crawl_log.len(),
            scope_rules = scope.len(),
            "job context loaded"
        );

        Ok(Self { id: id.clone(), record, crawl_log, scope })
    }
}

fn context_fault(id: &JobId, reason: impl Into<String>) -> EngineError {
    EngineError::ContextLoad { id: id.to_string(), reason: reason.into() }
}

/// Fetch the job's tracker record, failing on zero or multiple matches.
///
/// When the tracker holds duplicates, each un-flagged duplicate gets a
/// best-effort diagnostic comment and the duplicate label so a human can
/// fold them together; the job itself stays unrunnable until then.
async fn load_record(id: &JobId, tracker: &Arc<dyn Tracker>) -> Result<JobRecord, EngineError> {
    let mut records = tracker
        .records_for_job(id)
        .await
        .map_err(|e| context_fault(id, format!("fetching record: {e}")))?;

    match records.len() {
        0 => Err(context_fault(id, "no tracker record")),
        1 => Ok(records.remove(0)),
        n => {
            for record in &records {
                if record.has_label(DUPLICATE_LABEL) {
                    continue;
                }
                let others: Vec<String> = records
                    .iter()
                    .filter(|r| r.key != record.key)
                    .map(|r| format!("- {}", if r.link.is_empty() { &r.key } else { &r.link }))
                    .collect();
                let text = format!(
                    "Record appears to be a duplicate of:\n{}\n\
                     Please remove the crawl-id label from the redundant record \
                     and move it to its terminal status.",
                    others.join("\n")
                );
                if let Err(e) = tracker.add_comment(&record.key, &text).await {
                    tracing::error!(job_id = %id, key = %record.key, error = %e,
                        "failed to post duplicate diagnostic");
                }
                if let Err(e) = tracker.add_label(&record.key, DUPLICATE_LABEL).await {
                    tracing::error!(job_id = %id, key = %record.key, error = %e,
                        "failed to flag duplicate record");
                }
            }
            Err(context_fault(id, format!("{n} tracker records for one job")))
        }
    }
}

/// Combine every `crawl.log` under the job's prefix into one string.
async fn load_crawl_log(
    id: &JobId,
    logs: &Arc<dyn LogStore>,
    keys: &[String],
) -> Result<String, EngineError> {
    let mut log_keys: Vec<&String> = keys.iter().filter(|k| k.ends_with("crawl.log")).collect();
    log_keys.sort();
    if log_keys.is_empty() {
        return Err(context_fault(id, "no crawl logs"));
    }

    let mut combined = String::new();
    for key in log_keys {
        let bytes = logs
            .fetch(key)
            .await
            .map_err(|e| context_fault(id, format!("fetching {key}: {e}")))?;
        if !combined.is_empty() {
            combined.push('\n');
        }
        combined.push_str(&String::from_utf8_lossy(&bytes));
    }
    Ok(combined)
}

/// Load scope rules from the crawl's specification files.
///
/// `also-in-scope` entries are doubled onto both protocols so either
/// rendering of a URL matches; `associated` and `also-capture` entries
/// are taken as-is.
async fn load_scope(
    id: &JobId,
    logs: &Arc<dyn LogStore>,
    keys: &[String],
) -> Result<Vec<String>, EngineError> {
    let mut scope = Vec::new();

    for key in keys.iter().filter(|k| k.contains("also-in-scope.txt")) {
        let bytes = logs
            .fetch(key)
            .await
            .map_err(|e| context_fault(id, format!("fetching {key}: {e}")))?;
        for line in String::from_utf8_lossy(&bytes).lines().filter(|l| !l.trim().is_empty()) {
            let line = line.trim();
            match line.split_once("://") {
                Some((_, rest)) => {
                    scope.push(format!("https://{rest}"));
                    scope.push(format!("http://{rest}"));
                }
                None => scope.push(line.to_string()),
            }
        }
    }

    for key in keys
        .iter()
        .filter(|k| k.contains("associated.txt") || k.contains("also-capture.txt"))
    {
        let bytes = logs
            .fetch(key)
            .await
            .map_err(|e| context_fault(id, format!("fetching {key}: {e}")))?;
        scope.extend(
            String::from_utf8_lossy(&bytes)
                .lines()
                .filter(|l| !l.trim().is_empty())
                .map(|l| l.trim().to_string()),
        );
    }

    scope.dedup();
    Ok(scope)
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
