// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tracker polling listener.
//!
//! Single loop: every period, fetch the records updated since the last
//! poll and apply the admission decision to the queue. The poll window
//! is re-derived from the tracker each cycle, so a failed cycle loses
//! nothing — the next one covers the gap. `last_poll` is stamped
//! *before* the fetch; a crash mid-query can only widen the next
//! window, never shrink it. Overlap is harmless because admission is
//! idempotent on unchanged records.

use std::sync::Arc;
use std::time::Duration;

use aqa_adapters::Tracker;
use aqa_core::{decide, AdmissionPolicy, Clock, Decision, JobId, JobRecord};
use aqa_storage::{MarkerStore, QueueStore, Workdir};

use crate::error::EngineError;

/// Polls the tracker and keeps the queue in sync.
pub struct Listener<C: Clock> {
    tracker: Arc<dyn Tracker>,
    queue: QueueStore,
    markers: MarkerStore,
    workdir: Workdir,
    policy: AdmissionPolicy,
    clock: C,
    poll_interval: Duration,
    lookback: Duration,
    last_poll: Option<u64>,
}

impl<C: Clock> Listener<C> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        tracker: Arc<dyn Tracker>,
        queue: QueueStore,
        markers: MarkerStore,
        workdir: Workdir,
        policy: AdmissionPolicy,
        clock: C,
        poll_interval: Duration,
        lookback: Duration,
    ) -> Self {
        Self {
            tracker,
            queue,
            markers,
            workdir,
            policy,
            clock,
            poll_interval,
            lookback,
            last_poll: None,
        }
    }

    /// Run forever. A failed cycle is logged and swallowed — one bad
    /// poll must never kill the listener.
    pub async fn run(mut self) {
        tracing::info!(period_secs = self.poll_interval.as_secs(), "listener started");
        loop {
            if let Err(e) = self.cycle().await {
                tracing::error!(error = %e, "poll cycle failed, retrying next interval");
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    /// One poll cycle: fetch updated records, apply admission to each.
    pub async fn cycle(&mut self) -> Result<(), EngineError> {
        let now = self.clock.epoch_secs();
        let last = self.last_poll.unwrap_or_else(|| now.saturating_sub(self.lookback.as_secs()));
        // Whole minutes only, rounded up so the window always covers the gap
        let since_minutes = (now.saturating_sub(last)) / 60 + 1;
        self.last_poll = Some(now);

        let records = self.tracker.records_updated_since(since_minutes).await?;
        if records.is_empty() {
            tracing::debug!(since_minutes, "no records updated");
        } else {
            tracing::info!(since_minutes, count = records.len(), "records updated");
        }

        for record in &records {
            self.apply(record)?;
        }
        Ok(())
    }

    /// Apply the admission decision for one polled record.
    fn apply(&self, record: &JobRecord) -> Result<(), EngineError> {
        match decide(record, &self.policy) {
            Decision::Ignore => {
                tracing::debug!(record_id = %record.id, "not a job record, skipping");
                Ok(())
            }
            Decision::Remove { purge_output } => {
                let Ok(id) = JobId::parse(&record.id) else { return Ok(()) };
                self.queue.delete(&id)?;
                if purge_output {
                    tracing::info!(job_id = %id, "record reached terminal state, cleaning up");
                    self.workdir.purge_job(&id);
                    if let Err(e) = self.markers.clear(&id) {
                        tracing::warn!(job_id = %id, error = %e, "failed to clear step markers");
                    }
                } else {
                    tracing::info!(job_id = %id, "no applicable steps, dequeued");
                }
                Ok(())
            }
            Decision::Admit(steps) => {
                let Ok(id) = JobId::parse(&record.id) else { return Ok(()) };
                // Same snapshot already queued → leave untouched, so an
                // unchanged record never relaunches a finished run.
                if self.queue.exists(&id) {
                    if let Ok(existing) = self.queue.read(&id) {
                        if existing.updated_at == record.updated_at {
                            tracing::debug!(job_id = %id, "no updates since joining queue");
                            return Ok(());
                        }
                        tracing::info!(job_id = %id, "record updated, refreshing queue entry");
                    }
                }
                self.queue.upsert(&id, record)?;
                tracing::info!(job_id = %id, steps = ?steps, "queued");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
#[path = "listener_tests.rs"]
mod tests;
