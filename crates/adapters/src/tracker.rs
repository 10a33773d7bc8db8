// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Issue-tracker collaborator contract.

use std::path::Path;

use aqa_core::{JobId, JobRecord};
use async_trait::async_trait;
use thiserror::Error;

/// Errors from tracker operations
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("tracker request failed: {0}")]
    Request(String),
    #[error("unexpected tracker response: {0}")]
    Response(String),
    #[error("attachment fetch failed for {url}: {reason}")]
    Attachment { url: String, reason: String },
}

/// Adapter for the external issue tracker.
///
/// Comment, label, and attach failures must be caught by the *caller* and
/// logged — a reporting hiccup is never fatal to a pipeline run.
#[async_trait]
pub trait Tracker: Send + Sync {
    /// All records updated within the last `minutes` minutes.
    async fn records_updated_since(&self, minutes: u64) -> Result<Vec<JobRecord>, TrackerError>;

    /// All records carrying the given job id. More than one result means
    /// the tracker holds duplicates; the caller decides what to do.
    async fn records_for_job(&self, id: &JobId) -> Result<Vec<JobRecord>, TrackerError>;

    /// Post a comment on a record, addressed by the tracker's record key.
    async fn add_comment(&self, key: &str, text: &str) -> Result<(), TrackerError>;

    /// Add a label to a record.
    async fn add_label(&self, key: &str, label: &str) -> Result<(), TrackerError>;

    /// Attach a local file to a record under the given filename.
    async fn attach_file(&self, key: &str, name: &str, path: &Path) -> Result<(), TrackerError>;

    /// Fetch the raw content of an attachment by its content URL.
    async fn fetch_attachment(&self, url: &str) -> Result<Vec<u8>, TrackerError>;
}

#[cfg(any(test, feature = "test-support"))]
mod fake {
    use super::{Tracker, TrackerError};
    use aqa_core::{JobId, JobRecord};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::path::Path;
    use std::sync::Arc;

    /// A recorded side-effect call against the fake tracker.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum TrackerCall {
        Comment { key: String, text: String },
        Label { key: String, label: String },
        Attach { key: String, name: String },
    }

    #[derive(Default)]
    struct FakeTrackerState {
        poll_batches: Vec<Vec<JobRecord>>,
        records: HashMap<String, Vec<JobRecord>>,
        attachments: HashMap<String, Vec<u8>>,
        calls: Vec<TrackerCall>,
        fail_next_poll: bool,
        fail_side_effects: bool,
    }

    /// In-memory tracker for tests.
    ///
    /// Poll batches are consumed in order; once exhausted, polls return
    /// an empty list. Records for `records_for_job` are keyed by job id.
    #[derive(Clone, Default)]
    pub struct FakeTracker {
        inner: Arc<Mutex<FakeTrackerState>>,
    }

    impl FakeTracker {
        pub fn new() -> Self {
            Self::default()
        }

        /// Queue one batch of records to be returned by the next poll.
        pub fn push_poll_batch(&self, records: Vec<JobRecord>) {
            self.inner.lock().poll_batches.push(records);
        }

        /// Serve these records for `records_for_job(id)`.
        pub fn set_records_for_job(&self, id: &str, records: Vec<JobRecord>) {
            self.inner.lock().records.insert(id.to_string(), records);
        }

        /// Serve attachment bytes for a content URL.
        pub fn set_attachment(&self, url: &str, bytes: Vec<u8>) {
            self.inner.lock().attachments.insert(url.to_string(), bytes);
        }

        /// Make the next poll fail with a request error.
        pub fn fail_next_poll(&self) {
            self.inner.lock().fail_next_poll = true;
        }

        /// Make every comment/label/attach call fail.
        pub fn fail_side_effects(&self) {
            self.inner.lock().fail_side_effects = true;
        }

        /// All recorded side-effect calls, in order.
        pub fn calls(&self) -> Vec<TrackerCall> {
            self.inner.lock().calls.clone()
        }

        /// Comments posted to the given record key, in order.
        pub fn comments_for(&self, key: &str) -> Vec<String> {
            self.inner
                .lock()
                .calls
                .iter()
                .filter_map(|c| match c {
                    TrackerCall::Comment { key: k, text } if k == key => Some(text.clone()),
                    _ => None,
                })
                .collect()
        }
    }

    #[async_trait]
    impl Tracker for FakeTracker {
        async fn records_updated_since(
            &self,
            _minutes: u64,
        ) -> Result<Vec<JobRecord>, TrackerError> {
            let mut state = self.inner.lock();
            if state.fail_next_poll {
                state.fail_next_poll = false;
                return Err(TrackerError::Request("injected poll failure".to_string()));
            }
            if state.poll_batches.is_empty() {
                return Ok(Vec::new());
            }
            Ok(state.poll_batches.remove(0))
        }

        async fn records_for_job(&self, id: &JobId) -> Result<Vec<JobRecord>, TrackerError> {
            Ok(self.inner.lock().records.get(id.as_str()).cloned().unwrap_or_default())
        }

        async fn add_comment(&self, key: &str, text: &str) -> Result<(), TrackerError> {
            let mut state = self.inner.lock();
            if state.fail_side_effects {
                return Err(TrackerError::Request("injected comment failure".to_string()));
            }
            state
                .calls
                .push(TrackerCall::Comment { key: key.to_string(), text: text.to_string() });
            Ok(())
        }

        async fn add_label(&self, key: &str, label: &str) -> Result<(), TrackerError> {
            let mut state = self.inner.lock();
            if state.fail_side_effects {
                return Err(TrackerError::Request("injected label failure".to_string()));
            }
            state
                .calls
                .push(TrackerCall::Label { key: key.to_string(), label: label.to_string() });
            Ok(())
        }

        async fn attach_file(
            &self,
            key: &str,
            name: &str,
            _path: &Path,
        ) -> Result<(), TrackerError> {
            let mut state = self.inner.lock();
            if state.fail_side_effects {
                return Err(TrackerError::Request("injected attach failure".to_string()));
            }
            state
                .calls
                .push(TrackerCall::Attach { key: key.to_string(), name: name.to_string() });
            Ok(())
        }

        async fn fetch_attachment(&self, url: &str) -> Result<Vec<u8>, TrackerError> {
            self.inner.lock().attachments.get(url).cloned().ok_or_else(|| {
                TrackerError::Attachment {
                    url: url.to_string(),
                    reason: "no such attachment".to_string(),
                }
            })
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeTracker, TrackerCall};
