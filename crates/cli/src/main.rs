// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! aqa: automated QA for web-crawl jobs.
//!
//! Three entry points sharing one binary: `daemon` runs the scheduler,
//! which spawns `listen` (the tracker poller) and one `run <job-id>`
//! process per dispatched job. `run` is also the manual/debug surface.

use std::sync::Arc;

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use aqa_adapters::{FsLogStore, LogStore, RestTracker, StdToolkit, Tracker};
use aqa_core::{AdmissionPolicy, JobId, SystemClock};
use aqa_engine::{
    Config, Executor, InstanceLock, Listener, StepRegistry, WorkerCommand, WorkerPool,
};
use aqa_storage::{MarkerStore, QueueStore, Workdir};

mod trace;

#[derive(Parser)]
#[command(name = "aqa", version, about = "Automated QA for web-crawl jobs")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the scheduler: listener plus a bounded pool of job workers
    Daemon,
    /// Run the tracker-polling listener loop (normally spawned by `daemon`)
    Listen,
    /// Run the QA pipeline for one job, then exit.
    ///
    /// The exit status reflects whether the job context loaded; step
    /// failures are reported but do not change it.
    Run { job_id: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;

    match cli.command {
        Command::Daemon => {
            let _guard = trace::init(&config, "daemon");
            let _lock = InstanceLock::acquire(&config.data_dir)?;
            tracing::info!(
                version = env!("CARGO_PKG_VERSION"),
                data_dir = %config.data_dir.display(),
                "aqa daemon starting"
            );
            let queue = QueueStore::open(config.queue_dir())?;
            let pool =
                WorkerPool::new(queue, WorkerCommand::current_exe()?, config.max_workers);
            pool.run().await;
            Ok(())
        }
        Command::Listen => {
            let _guard = trace::init(&config, "listener");
            let listener = Listener::new(
                tracker(&config)?,
                QueueStore::open(config.queue_dir())?,
                MarkerStore::open(config.markers_dir())?,
                Workdir::new(config.jobs_dir()),
                AdmissionPolicy::default(),
                SystemClock,
                config.poll_interval,
                config.lookback,
            );
            listener.run().await;
            Ok(())
        }
        Command::Run { job_id } => {
            let _guard = trace::init(&config, "worker");
            let id = JobId::parse(&job_id)
                .map_err(|e| anyhow::anyhow!("{e}"))
                .context("job id must be the numeric crawl id")?;
            let executor = Executor::new(
                tracker(&config)?,
                logstore(&config)?,
                Arc::new(StdToolkit::new()),
                MarkerStore::open(config.markers_dir())?,
                Workdir::new(config.jobs_dir()),
                StepRegistry::builtin(),
                AdmissionPolicy::default(),
                config.logs_prefix.clone(),
            );
            let summary = executor.run_job(&id).await?;
            println!("succeeded: {}", join_or_none(&summary.succeeded()));
            println!("failed: {}", join_or_none(&summary.failed()));
            Ok(())
        }
    }
}

fn tracker(config: &Config) -> anyhow::Result<Arc<dyn Tracker>> {
    let rest = config
        .tracker
        .clone()
        .context("tracker not configured (set AQA_TRACKER_URL and credentials)")?;
    Ok(Arc::new(RestTracker::new(rest)))
}

fn logstore(config: &Config) -> anyhow::Result<Arc<dyn LogStore>> {
    let dir = config
        .logstore_dir
        .clone()
        .context("crawl-log store not configured (set AQA_LOGSTORE_DIR)")?;
    Ok(Arc::new(FsLogStore::new(dir)))
}

fn join_or_none(items: &[&str]) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join(", ")
    }
}
