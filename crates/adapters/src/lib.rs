// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! aqa-adapters: external collaborators behind traits.
//!
//! The engine never talks to the tracker, the crawl-log store, or the QA
//! analysis code directly — only through the traits here. Fakes for all
//! of them are exported under the `test-support` feature.

pub mod logstore;
pub mod qa;
pub mod rest;
pub mod tracker;

pub use logstore::{FsLogStore, LogStore, LogStoreError};
pub use qa::{DiffReport, LogReport, PdfLinkReport, QaError, QaToolkit, StdToolkit};
pub use rest::{RestConfig, RestTracker};
pub use tracker::{Tracker, TrackerError};

#[cfg(any(test, feature = "test-support"))]
pub use logstore::FakeLogStore;
#[cfg(any(test, feature = "test-support"))]
pub use qa::FakeToolkit;
#[cfg(any(test, feature = "test-support"))]
pub use tracker::{FakeTracker, TrackerCall};
