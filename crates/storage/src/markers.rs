// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Completed-step markers.
//!
//! One JSON file per job holding the set of step names that have already
//! run to completion (successfully or not). The executor writes a marker
//! after every step and subtracts marked steps when computing the
//! applicable list, so a step that can never succeed does not retry
//! forever.

use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;

use aqa_core::JobId;

use crate::atomic::write_atomic;
use crate::error::StoreError;

/// Per-job persisted set of completed step names.
#[derive(Debug, Clone)]
pub struct MarkerStore {
    dir: PathBuf,
}

impl MarkerStore {
    /// Open the marker store at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn marker_path(&self, id: &JobId) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }

    /// The set of steps marked complete for `id`. Empty when none.
    pub fn completed(&self, id: &JobId) -> Result<BTreeSet<String>, StoreError> {
        let bytes = match fs::read(self.marker_path(id)) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeSet::new()),
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Whether `step` is marked complete for `id`.
    pub fn is_complete(&self, id: &JobId, step: &str) -> Result<bool, StoreError> {
        Ok(self.completed(id)?.contains(step))
    }

    /// Mark `step` complete for `id`. Idempotent.
    pub fn mark_complete(&self, id: &JobId, step: &str) -> Result<(), StoreError> {
        let mut steps = self.completed(id)?;
        if !steps.insert(step.to_string()) {
            return Ok(());
        }
        let bytes = serde_json::to_vec_pretty(&steps)?;
        write_atomic(&self.marker_path(id), &bytes)?;
        Ok(())
    }

    /// Drop all markers for `id`. No-op when absent.
    pub fn clear(&self, id: &JobId) -> Result<(), StoreError> {
        match fs::remove_file(self.marker_path(id)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
#[path = "markers_tests.rs"]
mod tests;
