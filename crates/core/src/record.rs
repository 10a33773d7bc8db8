// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tracker record snapshot.

use serde::{Deserialize, Serialize};

/// A file attached to a tracker record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub filename: String,
    /// URL the attachment content can be fetched from.
    pub content_url: String,
    /// Creation timestamp as reported by the tracker, opaque but sortable.
    #[serde(default)]
    pub created: String,
}

/// Snapshot of one tracker record, as queued and as consumed by the
/// admission policy and the pipeline steps.
///
/// `id` is the raw record key — validation into a [`crate::JobId`] happens
/// at the listener boundary, since the tracker also returns records that
/// are not crawl jobs at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    pub id: String,
    /// The tracker's own record key (e.g. `WQA-213`), used when posting
    /// comments, labels, and attachments back.
    #[serde(default)]
    pub key: String,
    /// Last-modification timestamp from the tracker. Compared for equality
    /// only, never parsed or ordered.
    pub updated_at: String,
    pub status: String,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    #[serde(default)]
    pub summary: String,
    /// Human-facing link to the record, used in diagnostic comments.
    #[serde(default)]
    pub link: String,
}

impl JobRecord {
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;
