// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! REST implementation of the [`Tracker`] trait.
//!
//! Speaks a Jira-flavored REST API: JQL search for polling, per-record
//! comment/label/attachment endpoints for reporting. The crawl id is
//! carried as a `<prefix><id>` label on the record, so records without
//! that label are skipped during polling.

use std::path::Path;

use aqa_core::{Attachment, JobId, JobRecord};
use async_trait::async_trait;
use serde_json::{json, Value};

use crate::tracker::{Tracker, TrackerError};

const PAGE_SIZE: usize = 100;
const SEARCH_FIELDS: &str = "summary,status,labels,updated,attachment";

/// Connection settings for the REST tracker.
#[derive(Debug, Clone)]
pub struct RestConfig {
    /// Base URL, e.g. `https://tracker.example`.
    pub base_url: String,
    /// Project key used in the poll query.
    pub project: String,
    pub user: String,
    pub token: String,
    /// Label prefix carrying the crawl id, e.g. `client-ref:`.
    pub id_label_prefix: String,
}

/// Tracker client over HTTP.
#[derive(Clone)]
pub struct RestTracker {
    http: reqwest::Client,
    config: RestConfig,
}

impl RestTracker {
    pub fn new(config: RestConfig) -> Self {
        let http = reqwest::Client::builder()
            .user_agent(concat!("aqa/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_default();
        Self { http, config }
    }

    fn api(&self, path: &str) -> String {
        format!("{}/rest/api/2/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Run a JQL search, following pagination until exhausted.
    async fn search(&self, jql: &str) -> Result<Vec<JobRecord>, TrackerError> {
        let url = self.api("search");
        let mut records = Vec::new();
        let mut start_at = 0usize;

        loop {
            let max_results = PAGE_SIZE.to_string();
            let start = start_at.to_string();
            let resp = self
                .http
                .get(&url)
                .basic_auth(&self.config.user, Some(&self.config.token))
                .query(&[
                    ("jql", jql),
                    ("fields", SEARCH_FIELDS),
                    ("maxResults", &max_results),
                    ("startAt", &start),
                ])
                .send()
                .await
                .map_err(|e| TrackerError::Request(e.to_string()))?;

            if !resp.status().is_success() {
                return Err(TrackerError::Response(format!(
                    "search returned [{}] for jql '{}'",
                    resp.status(),
                    jql
                )));
            }

            let body: Value =
                resp.json().await.map_err(|e| TrackerError::Response(e.to_string()))?;
            let issues = body
                .get("issues")
                .and_then(Value::as_array)
                .ok_or_else(|| TrackerError::Response("search body has no issues".to_string()))?;

            for issue in issues {
                match record_from_issue(
                    issue,
                    &self.config.id_label_prefix,
                    &self.config.base_url,
                ) {
                    Some(record) => records.push(record),
                    None => {
                        tracing::debug!(
                            key = issue.get("key").and_then(|v| v.as_str()).unwrap_or("?"),
                            "record has no crawl-id label, skipping"
                        );
                    }
                }
            }

            if issues.len() < PAGE_SIZE {
                break;
            }
            start_at += PAGE_SIZE;
        }

        Ok(records)
    }
}

#[async_trait]
impl Tracker for RestTracker {
    async fn records_updated_since(&self, minutes: u64) -> Result<Vec<JobRecord>, TrackerError> {
        let jql = format!(
            "project = {} AND updated >= -{}m ORDER BY updated ASC",
            self.config.project, minutes
        );
        tracing::debug!(%jql, "polling tracker for updated records");
        self.search(&jql).await
    }

    async fn records_for_job(&self, id: &JobId) -> Result<Vec<JobRecord>, TrackerError> {
        let jql = format!("labels = {}{}", self.config.id_label_prefix, id);
        self.search(&jql).await
    }

    async fn add_comment(&self, key: &str, text: &str) -> Result<(), TrackerError> {
        let url = self.api(&format!("issue/{key}/comment"));
        let resp = self
            .http
            .post(&url)
            .basic_auth(&self.config.user, Some(&self.config.token))
            .json(&json!({ "body": text }))
            .send()
            .await
            .map_err(|e| TrackerError::Request(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(TrackerError::Response(format!(
                "comment on {key} returned [{}]",
                resp.status()
            )));
        }
        Ok(())
    }

    async fn add_label(&self, key: &str, label: &str) -> Result<(), TrackerError> {
        let url = self.api(&format!("issue/{key}"));
        let resp = self
            .http
            .put(&url)
            .basic_auth(&self.config.user, Some(&self.config.token))
            .json(&json!({ "update": { "labels": [ { "add": label } ] } }))
            .send()
            .await
            .map_err(|e| TrackerError::Request(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(TrackerError::Response(format!(
                "label on {key} returned [{}]",
                resp.status()
            )));
        }
        Ok(())
    }

    async fn attach_file(&self, key: &str, name: &str, path: &Path) -> Result<(), TrackerError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| TrackerError::Request(format!("read {}: {e}", path.display())))?;
        let part = reqwest::multipart::Part::bytes(bytes).file_name(name.to_string());
        let form = reqwest::multipart::Form::new().part("file", part);

        let url = self.api(&format!("issue/{key}/attachments"));
        let resp = self
            .http
            .post(&url)
            .basic_auth(&self.config.user, Some(&self.config.token))
            .header("X-Atlassian-Token", "no-check")
            .multipart(form)
            .send()
            .await
            .map_err(|e| TrackerError::Request(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(TrackerError::Response(format!(
                "attach to {key} returned [{}]",
                resp.status()
            )));
        }
        Ok(())
    }

    async fn fetch_attachment(&self, url: &str) -> Result<Vec<u8>, TrackerError> {
        let resp = self
            .http
            .get(url)
            .basic_auth(&self.config.user, Some(&self.config.token))
            .send()
            .await
            .map_err(|e| TrackerError::Attachment { url: url.to_string(), reason: e.to_string() })?;
        if !resp.status().is_success() {
            return Err(TrackerError::Attachment {
                url: url.to_string(),
                reason: format!("status {}", resp.status()),
            });
        }
        resp.bytes()
            .await
            .map(|b| b.to_vec())
            .map_err(|e| TrackerError::Attachment { url: url.to_string(), reason: e.to_string() })
    }
}

/// Map one search-result issue to a [`JobRecord`].
///
/// Returns `None` when the issue carries no crawl-id label — those
/// records are not jobs and never reach the admission policy.
fn record_from_issue(issue: &Value, id_label_prefix: &str, base_url: &str) -> Option<JobRecord> {
    let key = issue.get("key").and_then(Value::as_str)?;
    let fields = issue.get("fields")?;

    let labels: Vec<String> = fields
        .get("labels")
        .and_then(Value::as_array)
        .map(|ls| ls.iter().filter_map(Value::as_str).map(str::to_string).collect())
        .unwrap_or_default();

    let id = labels.iter().find_map(|l| l.strip_prefix(id_label_prefix))?.to_string();

    let attachments = fields
        .get("attachment")
        .and_then(Value::as_array)
        .map(|atts| {
            atts.iter()
                .filter_map(|a| {
                    Some(Attachment {
                        filename: a.get("filename").and_then(Value::as_str)?.to_string(),
                        content_url: a.get("content").and_then(Value::as_str)?.to_string(),
                        created: a
                            .get("created")
                            .and_then(Value::as_str)
                            .unwrap_or_default()
                            .to_string(),
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    Some(JobRecord {
        id,
        key: key.to_string(),
        updated_at: fields.get("updated").and_then(Value::as_str).unwrap_or_default().to_string(),
        status: fields
            .get("status")
            .and_then(|s| s.get("name"))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        labels,
        attachments,
        summary: fields.get("summary").and_then(Value::as_str).unwrap_or_default().to_string(),
        link: format!("{}/browse/{}", base_url.trim_end_matches('/'), key),
    })
}

#[cfg(test)]
#[path = "rest_tests.rs"]
mod tests;
