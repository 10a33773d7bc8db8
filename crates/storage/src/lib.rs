// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! aqa-storage: durable state for the crawl-QA pipeline.
//!
//! Everything on disk lives here: the file-backed job queue, the per-job
//! completed-step markers, the per-job working directories, and the
//! size-capped rotating step logs. The queue directory is the only state
//! shared between processes (listener writes, scheduler reads and
//! deletes), so every entry write is an atomic tmp-then-rename.

mod atomic;
mod error;
pub mod markers;
pub mod queue;
pub mod rotate;
pub mod step_logger;
pub mod workdir;

pub use error::StoreError;
pub use markers::MarkerStore;
pub use queue::QueueStore;
pub use rotate::{RotatingLog, DEFAULT_BACKUPS, DEFAULT_MAX_BYTES};
pub use step_logger::StepLogger;
pub use workdir::Workdir;
