// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bounded worker pool and scheduling loop.
//!
//! One OS process per dispatched job, a reserved slot for the listener,
//! and a hard concurrency cap that is never exceeded. Liveness is
//! advisory polling via `try_wait` — a reaped worker is reconciled
//! against the queue, deleting the entry only when the record has not
//! changed since launch.

use std::collections::HashMap;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use aqa_core::JobId;
use aqa_storage::{QueueStore, StoreError};
use tokio::process::{Child, Command};

use crate::error::EngineError;

/// Interval between capacity/queue re-checks while dispatch is blocked.
pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_secs(5);

/// How worker and listener processes are launched.
///
/// Workers re-invoke this binary: `<program> run <job-id>` for a job,
/// `<program> listen` for the listener.
#[derive(Debug, Clone)]
pub struct WorkerCommand {
    pub program: PathBuf,
    pub worker_args: Vec<String>,
    pub listener_args: Vec<String>,
}

impl WorkerCommand {
    /// Re-invoke the current executable.
    pub fn current_exe() -> std::io::Result<Self> {
        Ok(Self {
            program: std::env::current_exe()?,
            worker_args: vec!["run".to_string()],
            listener_args: vec!["listen".to_string()],
        })
    }

    fn worker(&self, id: &JobId) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.worker_args).arg(id.as_str()).stdin(Stdio::null());
        cmd
    }

    fn listener(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.listener_args).stdin(Stdio::null());
        cmd
    }
}

/// Live binding between a worker process and the job it serves.
struct WorkerHandle {
    id: JobId,
    /// The record's `updated_at` captured at launch time.
    updated_at: String,
    child: Child,
}

/// Scheduler owning all worker processes.
pub struct WorkerPool {
    queue: QueueStore,
    command: WorkerCommand,
    max_workers: usize,
    retry_interval: Duration,
    running: HashMap<String, WorkerHandle>,
    /// Reserved slot: the listener does not count against `max_workers`.
    listener: Option<Child>,
}

impl WorkerPool {
    pub fn new(queue: QueueStore, command: WorkerCommand, max_workers: usize) -> Self {
        Self {
            queue,
            command,
            max_workers: max_workers.max(1),
            retry_interval: DEFAULT_RETRY_INTERVAL,
            running: HashMap::new(),
            listener: None,
        }
    }

    /// Override the blocked-dispatch retry interval.
    pub fn with_retry_interval(mut self, interval: Duration) -> Self {
        self.retry_interval = interval;
        self
    }

    pub fn running_count(&self) -> usize {
        self.running.len()
    }

    /// Whether the listener slot holds a live process.
    pub fn listener_running(&mut self) -> bool {
        match &mut self.listener {
            Some(child) => matches!(child.try_wait(), Ok(None)),
            None => false,
        }
    }

    /// Main driver loop; never exits on a caught error.
    pub async fn run(mut self) {
        tracing::info!(max_workers = self.max_workers, "scheduler started");
        loop {
            self.ensure_listener();
            self.prune_dead();
            if let Err(e) = self.dispatch_next().await {
                tracing::error!(error = %e, "scheduler cycle failed");
                tokio::time::sleep(self.retry_interval).await;
            }
        }
    }

    /// Launch the listener if its slot is empty or its process died.
    ///
    /// Called every scheduling cycle, so listener crashes self-heal.
    pub fn ensure_listener(&mut self) {
        if self.listener_running() {
            return;
        }
        if self.listener.is_some() {
            tracing::warn!("listener worker died, relaunching");
        }
        match self.command.listener().spawn() {
            Ok(child) => {
                tracing::info!("listener worker started");
                self.listener = Some(child);
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to launch listener worker");
                self.listener = None;
            }
        }
    }

    /// Reap exited workers and reconcile them against the queue.
    pub fn prune_dead(&mut self) {
        let mut reaped = Vec::new();
        for (key, handle) in self.running.iter_mut() {
            match handle.child.try_wait() {
                Ok(Some(status)) => {
                    tracing::info!(job_id = %handle.id, %status, "worker exited");
                    reaped.push(key.clone());
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(job_id = %handle.id, error = %e, "worker liveness check failed");
                }
            }
        }
        for key in reaped {
            if let Some(handle) = self.running.remove(&key) {
                self.reconcile(&handle);
            }
        }
    }

    /// Delete the reaped worker's queue entry — but only when the entry
    /// still carries the launch-time snapshot. A newer `updated_at`
    /// means the record changed mid-run and must be picked up again.
    fn reconcile(&self, handle: &WorkerHandle) {
        match self.queue.read(&handle.id) {
            Ok(entry) if entry.updated_at == handle.updated_at => {
                match self.queue.delete(&handle.id) {
                    Ok(()) => tracing::info!(job_id = %handle.id, "job consumed, entry removed"),
                    Err(e) => {
                        tracing::error!(job_id = %handle.id, error = %e,
                            "failed to remove consumed queue entry");
                    }
                }
            }
            Ok(_) => {
                tracing::info!(job_id = %handle.id, "record updated while running, leaving queued");
            }
            Err(StoreError::NotFound(_)) => {}
            Err(e) => {
                tracing::error!(job_id = %handle.id, error = %e, "failed to reconcile queue entry");
            }
        }
    }

    /// Block until below capacity and an eligible pending job exists,
    /// then launch a worker for it.
    pub async fn dispatch_next(&mut self) -> Result<(), EngineError> {
        while self.running.len() >= self.max_workers {
            tokio::time::sleep(self.retry_interval).await;
            self.prune_dead();
            self.ensure_listener();
        }
        let id = loop {
            if let Some(id) = self.next_eligible()? {
                break id;
            }
            tokio::time::sleep(self.retry_interval).await;
            self.prune_dead();
            self.ensure_listener();
        };
        self.launch(&id)
    }

    /// Any pending id with no worker currently running for it.
    fn next_eligible(&self) -> Result<Option<JobId>, EngineError> {
        Ok(self
            .queue
            .list_pending()?
            .into_iter()
            .find(|id| !self.running.contains_key(id.as_str())))
    }

    fn launch(&mut self, id: &JobId) -> Result<(), EngineError> {
        let entry = self.queue.read(id)?;
        let child = self.command.worker(id).spawn()?;
        tracing::info!(job_id = %id, pid = child.id().unwrap_or_default(), "worker launched");
        self.running.insert(
            id.to_string(),
            WorkerHandle { id: id.clone(), updated_at: entry.updated_at, child },
        );
        Ok(())
    }
}

#[cfg(test)]
#[path = "pool_tests.rs"]
mod tests;
