// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Size-capped rotating log file.
//!
//! Append-only writer that rotates `<name>` to `<name>.1`, shifting
//! older backups up to a retained cap. Each append opens, writes, and
//! closes the file; step logs are low-frequency enough that this is
//! simpler than holding handles across a long job run.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Default size cap per log file (200 MB).
pub const DEFAULT_MAX_BYTES: u64 = 200 * 1024 * 1024;

/// Default number of retained backups.
pub const DEFAULT_BACKUPS: u32 = 5;

/// A log file with a size cap and numbered backups.
#[derive(Debug, Clone)]
pub struct RotatingLog {
    path: PathBuf,
    max_bytes: u64,
    backups: u32,
}

impl RotatingLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_limits(path, DEFAULT_MAX_BYTES, DEFAULT_BACKUPS)
    }

    pub fn with_limits(path: impl Into<PathBuf>, max_bytes: u64, backups: u32) -> Self {
        Self { path: path.into(), max_bytes, backups }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one line, rotating first when the file is at its cap.
    pub fn append(&self, line: &str) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        if self.at_capacity(line.len() as u64) {
            self.rotate()?;
        }
        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        writeln!(file, "{}", line)
    }

    fn at_capacity(&self, incoming: u64) -> bool {
        match fs::metadata(&self.path) {
            Ok(meta) => meta.len() + incoming + 1 > self.max_bytes,
            Err(_) => false,
        }
    }

    fn backup_path(&self, n: u32) -> PathBuf {
        let mut name = self.path.file_name().map(|f| f.to_os_string()).unwrap_or_default();
        name.push(format!(".{n}"));
        self.path.with_file_name(name)
    }

    /// Shift backups up by one and move the live file to `.1`.
    ///
    /// The oldest backup is removed when the retained cap is reached.
    fn rotate(&self) -> std::io::Result<()> {
        if self.backups == 0 {
            return fs::remove_file(&self.path);
        }
        let oldest = self.backup_path(self.backups);
        if oldest.exists() {
            fs::remove_file(&oldest)?;
        }
        for n in (1..self.backups).rev() {
            let src = self.backup_path(n);
            if src.exists() {
                fs::rename(&src, self.backup_path(n + 1))?;
            }
        }
        fs::rename(&self.path, self.backup_path(1))
    }
}

#[cfg(test)]
#[path = "rotate_tests.rs"]
mod tests;
