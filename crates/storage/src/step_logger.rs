// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-step human-readable logs.
//!
//! Every step run gets a `logs/` folder with three rotating files:
//! `full.log` (everything), `info.log` (info and above), `err.log`
//! (errors only). Lines are timestamped. Write failures are reported
//! via tracing but never propagate — logging must not break a step.

use std::path::Path;

use crate::rotate::{RotatingLog, DEFAULT_BACKUPS, DEFAULT_MAX_BYTES};

/// Level fan-out logger for one step run.
#[derive(Debug, Clone)]
pub struct StepLogger {
    full: RotatingLog,
    info: RotatingLog,
    err: RotatingLog,
}

impl StepLogger {
    /// Logger writing into `log_dir` with the default caps.
    pub fn new(log_dir: &Path) -> Self {
        Self::with_limits(log_dir, DEFAULT_MAX_BYTES, DEFAULT_BACKUPS)
    }

    pub fn with_limits(log_dir: &Path, max_bytes: u64, backups: u32) -> Self {
        Self {
            full: RotatingLog::with_limits(log_dir.join("full.log"), max_bytes, backups),
            info: RotatingLog::with_limits(log_dir.join("info.log"), max_bytes, backups),
            err: RotatingLog::with_limits(log_dir.join("err.log"), max_bytes, backups),
        }
    }

    pub fn debug(&self, message: &str) {
        let line = stamp(message);
        self.write(&self.full, &line);
    }

    pub fn info(&self, message: &str) {
        let line = stamp(message);
        self.write(&self.full, &line);
        self.write(&self.info, &line);
    }

    pub fn error(&self, message: &str) {
        let line = stamp(message);
        self.write(&self.full, &line);
        self.write(&self.info, &line);
        self.write(&self.err, &line);
    }

    fn write(&self, log: &RotatingLog, line: &str) {
        if let Err(e) = log.append(line) {
            tracing::warn!(path = %log.path().display(), error = %e, "failed to write step log");
        }
    }
}

fn stamp(message: &str) -> String {
    let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
    format!("{ts}\t{message}")
}

#[cfg(test)]
#[path = "step_logger_tests.rs"]
mod tests;
