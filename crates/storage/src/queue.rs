// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! File-backed job queue.
//!
//! One JSON entry per job id under the queue directory; directory
//! enumeration is the authoritative pending list. The listener creates,
//! overwrites, and deletes entries; the scheduler reads and deletes them.
//! No locks — atomic rename keeps every entry all-or-nothing.

use std::fs;
use std::path::{Path, PathBuf};

use aqa_core::{JobId, JobRecord};

use crate::atomic::{is_tmp_name, write_atomic};
use crate::error::StoreError;

/// Durable set of pending jobs, keyed by job id.
#[derive(Debug, Clone)]
pub struct QueueStore {
    dir: PathBuf,
}

impl QueueStore {
    /// Open the queue at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// The queue directory path.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, id: &JobId) -> PathBuf {
        self.dir.join(id.as_str())
    }

    /// Create or overwrite the entry for `id`. Idempotent.
    pub fn upsert(&self, id: &JobId, record: &JobRecord) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(record)?;
        write_atomic(&self.entry_path(id), &bytes)?;
        Ok(())
    }

    /// Whether an entry exists for `id`.
    pub fn exists(&self, id: &JobId) -> bool {
        self.entry_path(id).is_file()
    }

    /// Read the entry for `id`.
    pub fn read(&self, id: &JobId) -> Result<JobRecord, StoreError> {
        let path = self.entry_path(id);
        let bytes = match fs::read(&path) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(id.to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Delete the entry for `id`. No-op when absent.
    pub fn delete(&self, id: &JobId) -> Result<(), StoreError> {
        match fs::remove_file(self.entry_path(id)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Enumerate pending job ids. Order is not significant.
    ///
    /// Temp files and foreign names are skipped rather than erroring:
    /// the directory is shared state and a crashed writer may leave a
    /// `.tmp` behind.
    pub fn list_pending(&self) -> Result<Vec<JobId>, StoreError> {
        let mut ids = Vec::new();
        for dirent in fs::read_dir(&self.dir)? {
            let dirent = dirent?;
            let name = dirent.file_name();
            let Some(name) = name.to_str() else { continue };
            if is_tmp_name(name) {
                continue;
            }
            match JobId::parse(name) {
                Ok(id) => ids.push(id),
                Err(_) => {
                    tracing::warn!(entry = name, "skipping foreign file in queue directory");
                }
            }
        }
        Ok(ids)
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
