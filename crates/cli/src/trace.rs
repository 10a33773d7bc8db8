// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tracing setup: env-filtered, to stderr and a daily-rolling file.

use aqa_engine::Config;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

/// Initialize the global subscriber for one process.
///
/// Each process kind (`daemon`, `listener`, `worker`) gets its own
/// rolling file under the data directory's `logs/`. Returns the guard
/// that flushes the file writer on drop; hold it for the process
/// lifetime. Falls back to stderr-only if the log directory cannot be
/// created.
pub fn init(config: &Config, process: &str) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let log_dir = config.daemon_log_dir();

    if std::fs::create_dir_all(&log_dir).is_err() {
        tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
        return None;
    }

    let appender = tracing_appender::rolling::daily(&log_dir, format!("{process}.log"));
    let (file_writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(file_writer.and(std::io::stderr))
        .init();
    Some(guard)
}
