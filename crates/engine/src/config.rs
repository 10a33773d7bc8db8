// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the engine.
//!
//! Resolution order for the data directory:
//! `AQA_DATA_DIR` > `XDG_STATE_HOME/aqa` > `~/.local/state/aqa`.

use std::path::PathBuf;
use std::time::Duration;

use aqa_adapters::RestConfig;

use crate::error::EngineError;

/// Default listener poll period.
pub const DEFAULT_POLL_SECS: u64 = 60;

/// First-run lookback window (~2 months), so no historical update is
/// missed when the listener has never polled before.
pub const DEFAULT_LOOKBACK_SECS: u64 = 5_256_000;

/// Engine configuration, resolved once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub poll_interval: Duration,
    pub lookback: Duration,
    pub max_workers: usize,
    /// Tracker connection; absent when the env vars are not set, in
    /// which case anything needing the tracker fails with a clear error.
    pub tracker: Option<RestConfig>,
    /// Root of the directory-backed crawl-log store.
    pub logstore_dir: Option<PathBuf>,
    /// Key prefix under which a job's crawl output lives, completed by
    /// the job id.
    pub logs_prefix: String,
}

impl Config {
    /// Resolve configuration from the environment.
    pub fn from_env() -> Result<Self, EngineError> {
        Ok(Self {
            data_dir: data_dir()?,
            poll_interval: Duration::from_secs(
                env_u64("AQA_POLL_SECS").unwrap_or(DEFAULT_POLL_SECS),
            ),
            lookback: Duration::from_secs(
                env_u64("AQA_LOOKBACK_SECS").unwrap_or(DEFAULT_LOOKBACK_SECS),
            ),
            max_workers: env_u64("AQA_MAX_WORKERS")
                .map(|n| n.max(1) as usize)
                .unwrap_or_else(default_max_workers),
            tracker: tracker_config()?,
            logstore_dir: std::env::var("AQA_LOGSTORE_DIR").ok().map(PathBuf::from),
            logs_prefix: std::env::var("AQA_LOGS_PREFIX")
                .unwrap_or_else(|_| "crawl-logs/tna-".to_string()),
        })
    }

    pub fn queue_dir(&self) -> PathBuf {
        self.data_dir.join("queue")
    }

    pub fn markers_dir(&self) -> PathBuf {
        self.data_dir.join("markers")
    }

    /// Root of the per-job output tree.
    pub fn jobs_dir(&self) -> PathBuf {
        self.data_dir.join("jobs")
    }

    /// Where the daemon's own rolling log goes.
    pub fn daemon_log_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }
}

/// Maximum worker processes: available parallelism minus two, floor one.
pub fn default_max_workers() -> usize {
    let cpus = std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1);
    cpus.saturating_sub(2).max(1)
}

/// Resolve data directory: AQA_DATA_DIR > XDG_STATE_HOME/aqa > ~/.local/state/aqa
fn data_dir() -> Result<PathBuf, EngineError> {
    if let Ok(dir) = std::env::var("AQA_DATA_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("aqa"));
    }
    let home = dirs::home_dir()
        .ok_or_else(|| EngineError::Config("no home directory for data dir".to_string()))?;
    Ok(home.join(".local/state/aqa"))
}

fn tracker_config() -> Result<Option<RestConfig>, EngineError> {
    let Ok(base_url) = std::env::var("AQA_TRACKER_URL") else {
        return Ok(None);
    };
    let require = |name: &str| {
        std::env::var(name)
            .map_err(|_| EngineError::Config(format!("AQA_TRACKER_URL is set but {name} is not")))
    };
    Ok(Some(RestConfig {
        base_url,
        project: require("AQA_TRACKER_PROJECT")?,
        user: require("AQA_TRACKER_USER")?,
        token: require("AQA_TRACKER_TOKEN")?,
        id_label_prefix: std::env::var("AQA_ID_LABEL_PREFIX")
            .unwrap_or_else(|_| "client-ref:".to_string()),
    }))
}

fn env_u64(name: &str) -> Option<u64> {
    std::env::var(name).ok().and_then(|s| s.parse().ok())
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
