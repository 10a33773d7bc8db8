// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! QA analysis collaborator contract.
//!
//! The pipeline steps own orchestration (directories, logs, tracker
//! reporting); the analysis itself — what is in the crawl log, what is
//! missing, what needs patching — sits behind [`QaToolkit`].
//! [`StdToolkit`] ships plain crawl-log implementations; the heavyweight
//! checks (PDF document harvesting, index lookups, live-site probing)
//! belong to external implementations of the same trait.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use thiserror::Error;

/// Errors from QA analysis
#[derive(Debug, Error)]
pub enum QaError {
    #[error("analysis failed: {0}")]
    Analysis(String),
}

/// Outcome of the PDF link sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PdfLinkReport {
    /// Successfully crawled PDF URLs found in the crawl log.
    pub pdfs_checked: Vec<String>,
    /// URLs discovered inside the PDF documents themselves.
    pub discovered_urls: Vec<String>,
    /// Discovered, in-scope URLs not yet captured anywhere.
    pub patchlist: Vec<String>,
}

/// Outcome of the expected-vs-crawled diff.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffReport {
    pub expected_count: usize,
    pub crawled_count: usize,
    /// Expected URLs absent from the crawl.
    pub missing: Vec<String>,
}

/// Outcome of the crawl-log analysis.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogReport {
    /// Fetch-status histogram over the whole log.
    pub status_counts: BTreeMap<i32, usize>,
    /// Number of entries examined.
    pub checked: usize,
    /// In-scope URLs that errored and need patching.
    pub patchlist: Vec<String>,
}

/// Adapter for the QA analysis suite.
#[async_trait]
pub trait QaToolkit: Send + Sync {
    async fn pdf_link_report(&self, crawl_log: &str) -> Result<PdfLinkReport, QaError>;
    async fn diff_report(&self, expected_csv: &str, crawl_log: &str)
        -> Result<DiffReport, QaError>;
    async fn log_report(&self, crawl_log: &str, scope: &[String]) -> Result<LogReport, QaError>;
}

/// Strip protocol, `www.`, and trailing slash so URL comparisons survive
/// the usual renderings of the same address.
#[allow(clippy::expect_used)]
static URL_CLEAN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:https?://)?(?:www\.)?(.*?)/?$").expect("constant regex pattern is valid")
});

pub(crate) fn clean_url(url: &str) -> String {
    URL_CLEAN.replace(url.trim(), "$1").into_owned()
}

/// One parsed crawl-log entry: status, URL, content type.
struct LogEntry<'a> {
    status: i32,
    url: &'a str,
    mime: &'a str,
}

/// Crawl-log lines are whitespace-separated:
/// `timestamp status size url hop via mime …`. Lines that don't parse
/// are skipped — crawler output contains banners and wrapped lines.
fn parse_log_line(line: &str) -> Option<LogEntry<'_>> {
    let mut fields = line.split_whitespace();
    let _timestamp = fields.next()?;
    let status: i32 = fields.next()?.parse().ok()?;
    let _size = fields.next()?;
    let url = fields.next()?;
    let mime = fields.nth(2).unwrap_or("");
    Some(LogEntry { status, url, mime })
}

fn is_success(status: i32) -> bool {
    (200..400).contains(&status)
}

/// Plain crawl-log analysis.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdToolkit;

impl StdToolkit {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl QaToolkit for StdToolkit {
    /// Inventory of successfully crawled PDFs.
    ///
    /// Harvesting links out of the documents needs a PDF parser and an
    /// index client; toolkit implementations that have them fill
    /// `discovered_urls` and `patchlist`.
    async fn pdf_link_report(&self, crawl_log: &str) -> Result<PdfLinkReport, QaError> {
        let mut seen = BTreeSet::new();
        for entry in crawl_log.lines().filter_map(parse_log_line) {
            if entry.mime.contains("application/pdf") && is_success(entry.status) {
                seen.insert(entry.url.to_string());
            }
        }
        Ok(PdfLinkReport {
            pdfs_checked: seen.into_iter().collect(),
            discovered_urls: Vec::new(),
            patchlist: Vec::new(),
        })
    }

    /// Expected URLs (first CSV column, header skipped) not present among
    /// the successfully crawled URLs.
    async fn diff_report(
        &self,
        expected_csv: &str,
        crawl_log: &str,
    ) -> Result<DiffReport, QaError> {
        let crawled: HashSet<String> = crawl_log
            .lines()
            .filter_map(parse_log_line)
            .filter(|e| is_success(e.status))
            .map(|e| clean_url(e.url))
            .collect();

        let mut expected = Vec::new();
        let mut seen = HashSet::new();
        for line in expected_csv.lines().skip(1) {
            let Some(url) = line.split(',').next() else { continue };
            let url = clean_url(url.trim_start_matches('\u{feff}'));
            if !url.is_empty() && seen.insert(url.clone()) {
                expected.push(url);
            }
        }

        let missing: Vec<String> =
            expected.iter().filter(|u| !crawled.contains(*u)).cloned().collect();

        Ok(DiffReport { expected_count: expected.len(), crawled_count: crawled.len(), missing })
    }

    /// Status histogram plus the in-scope error URLs.
    ///
    /// Status 1 (DNS lookup) and 404 are excluded from the patchlist as
    /// expected noise, matching long-standing QA practice.
    async fn log_report(&self, crawl_log: &str, scope: &[String]) -> Result<LogReport, QaError> {
        let scope_cleaned: Vec<String> = scope.iter().map(|s| clean_url(s)).collect();
        let mut status_counts: BTreeMap<i32, usize> = BTreeMap::new();
        let mut patchlist = Vec::new();
        let mut seen = HashSet::new();
        let mut checked = 0usize;

        for entry in crawl_log.lines().filter_map(parse_log_line) {
            checked += 1;
            *status_counts.entry(entry.status).or_insert(0) += 1;

            if is_success(entry.status) || entry.status == 1 || entry.status == 404 {
                continue;
            }
            let cleaned = clean_url(entry.url);
            let in_scope = scope_cleaned.iter().any(|p| !p.is_empty() && cleaned.starts_with(p));
            if in_scope && seen.insert(cleaned) {
                patchlist.push(entry.url.to_string());
            }
        }

        Ok(LogReport { status_counts, checked, patchlist })
    }
}

#[cfg(any(test, feature = "test-support"))]
mod fake {
    use super::{DiffReport, LogReport, PdfLinkReport, QaError, QaToolkit};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Default)]
    struct FakeToolkitState {
        pdf: PdfLinkReport,
        diff: DiffReport,
        log: LogReport,
        fail: bool,
    }

    /// Canned-report toolkit for tests.
    #[derive(Clone, Default)]
    pub struct FakeToolkit {
        inner: Arc<Mutex<FakeToolkitState>>,
    }

    impl FakeToolkit {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn set_pdf_report(&self, report: PdfLinkReport) {
            self.inner.lock().pdf = report;
        }

        pub fn set_diff_report(&self, report: DiffReport) {
            self.inner.lock().diff = report;
        }

        pub fn set_log_report(&self, report: LogReport) {
            self.inner.lock().log = report;
        }

        /// Make every analysis call fail.
        pub fn fail_all(&self) {
            self.inner.lock().fail = true;
        }

        fn check(&self) -> Result<(), QaError> {
            if self.inner.lock().fail {
                return Err(QaError::Analysis("injected analysis failure".to_string()));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl QaToolkit for FakeToolkit {
        async fn pdf_link_report(&self, _crawl_log: &str) -> Result<PdfLinkReport, QaError> {
            self.check()?;
            Ok(self.inner.lock().pdf.clone())
        }

        async fn diff_report(
            &self,
            _expected_csv: &str,
            _crawl_log: &str,
        ) -> Result<DiffReport, QaError> {
            self.check()?;
            Ok(self.inner.lock().diff.clone())
        }

        async fn log_report(
            &self,
            _crawl_log: &str,
            _scope: &[String],
        ) -> Result<LogReport, QaError> {
            self.check()?;
            Ok(self.inner.lock().log.clone())
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeToolkit;

#[cfg(test)]
#[path = "qa_tests.rs"]
mod tests;
