// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-job working directories.
//!
//! Layout under the crawl-output root:
//!
//! ```text
//! <root>/<job-id>/                      job tree
//! <root>/<job-id>/<YYYYMMDD>-<step>/    one pipeline-run step directory
//! <root>/<job-id>/<YYYYMMDD>-<step>/logs/   rotating step logs
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use aqa_core::JobId;

use crate::error::StoreError;

/// Root of the per-job output tree.
#[derive(Debug, Clone)]
pub struct Workdir {
    root: PathBuf,
}

impl Workdir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The job's output tree.
    pub fn job_dir(&self, id: &JobId) -> PathBuf {
        self.root.join(id.as_str())
    }

    /// Today's date stamp for run directories.
    pub fn date_stamp() -> String {
        chrono::Utc::now().format("%Y%m%d").to_string()
    }

    /// A step's run directory for a given date stamp.
    pub fn step_dir(&self, id: &JobId, step: &str, date: &str) -> PathBuf {
        self.job_dir(id).join(format!("{date}-{step}"))
    }

    /// Create a step run directory with its `logs/` subfolder and return it.
    pub fn create_step_dir(&self, id: &JobId, step: &str, date: &str) -> Result<PathBuf, StoreError> {
        let dir = self.step_dir(id, step, date);
        fs::create_dir_all(dir.join("logs"))?;
        Ok(dir)
    }

    /// Best-effort removal of the whole job tree.
    ///
    /// Used when a record reaches its terminal state; failure is logged
    /// and swallowed since the queue entry removal is what matters.
    pub fn purge_job(&self, id: &JobId) {
        let dir = self.job_dir(id);
        if !dir.exists() {
            return;
        }
        if let Err(e) = fs::remove_dir_all(&dir) {
            tracing::warn!(job_id = %id, error = %e, "failed to purge job directory");
        }
    }
}

#[cfg(test)]
#[path = "workdir_tests.rs"]
mod tests;
