// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Builders for tests in this crate and downstream crates.

use crate::record::{Attachment, JobRecord};

/// Fluent builder for [`JobRecord`] fixtures.
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    record: JobRecord,
}

impl RecordBuilder {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            record: JobRecord {
                key: format!("WQA-{id}"),
                id,
                updated_at: "2026-08-01T10:00:00.000+0000".to_string(),
                status: "Open".to_string(),
                labels: Vec::new(),
                attachments: Vec::new(),
                summary: String::new(),
                link: String::new(),
            },
        }
    }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.record.key = key.into();
        self
    }

    pub fn updated_at(mut self, ts: impl Into<String>) -> Self {
        self.record.updated_at = ts.into();
        self
    }

    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.record.status = status.into();
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.record.labels.push(label.into());
        self
    }

    pub fn attachment(mut self, filename: impl Into<String>, url: impl Into<String>) -> Self {
        self.record.attachments.push(Attachment {
            filename: filename.into(),
            content_url: url.into(),
            created: String::new(),
        });
        self
    }

    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.record.summary = summary.into();
        self
    }

    pub fn build(self) -> JobRecord {
        self.record
    }
}
