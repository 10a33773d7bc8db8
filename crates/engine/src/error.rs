// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine error type.

use thiserror::Error;

/// Errors that can occur in engine operations
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Store(#[from] aqa_storage::StoreError),
    #[error(transparent)]
    Tracker(#[from] aqa_adapters::TrackerError),
    #[error("context load failed for job {id}: {reason}")]
    ContextLoad { id: String, reason: String },
    #[error("step '{0}' is not registered")]
    UnregisteredStep(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("another scheduler holds the lock at {0}")]
    AlreadyRunning(std::path::PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl EngineError {
    /// Whether this failure happened before any step could run.
    ///
    /// Context-stage faults leave no completion markers and drive the
    /// CLI exit status for single-job runs.
    pub fn is_context_fault(&self) -> bool {
        matches!(self, Self::ContextLoad { .. } | Self::UnregisteredStep(_))
    }
}
