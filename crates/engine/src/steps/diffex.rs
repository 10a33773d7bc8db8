// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Expected-vs-crawled diff step.

use aqa_core::{admission::strip_guid_suffix, Attachment, STEP_DIFFEX};
use async_trait::async_trait;

use super::{attach_best_effort, comment_best_effort, write_lines};
use crate::registry::{Step, StepCtx, StepFailure};

/// Compares the partner's expected-URL listing (attached to the record)
/// against what the crawl actually fetched.
pub struct Diffex;

#[async_trait]
impl Step for Diffex {
    fn name(&self) -> &'static str {
        STEP_DIFFEX
    }

    async fn run(&self, ctx: &StepCtx<'_>) -> Result<(), StepFailure> {
        let expected_name = &ctx.policy.diffex_filename;
        // Newest matching attachment wins: a re-upload gets a guid
        // suffix from the tracker, and the original may be deleted.
        let mut files: Vec<&Attachment> = ctx
            .job
            .record
            .attachments
            .iter()
            .filter(|a| strip_guid_suffix(&a.filename).to_lowercase() == *expected_name)
            .collect();
        files.sort_by(|a, b| b.created.cmp(&a.created));
        let Some(file) = files.first() else {
            return Err(StepFailure::new(format!("no {expected_name} attachment on record")));
        };

        ctx.log.info(&format!("fetching {}", file.filename));
        let bytes = ctx.tracker.fetch_attachment(&file.content_url).await?;
        let content = String::from_utf8_lossy(&bytes).into_owned();
        let content = content.strip_prefix('\u{feff}').unwrap_or(&content).to_string();

        // Keep a copy of exactly what was diffed next to the results
        std::fs::write(ctx.dir.join(expected_name), &content)?;

        let report = ctx.toolkit.diff_report(&content, &ctx.job.crawl_log).await?;
        ctx.log.info(&format!(
            "{} expected URL(s), {} crawled, {} missing",
            report.expected_count,
            report.crawled_count,
            report.missing.len()
        ));

        let mut comment = format!(
            "Diffex:\n{expected_name} contains {} URL(s)\ncrawl log contains {} URL(s)\n\
             {} URL(s) expected but not found in the crawl.",
            report.expected_count,
            report.crawled_count,
            report.missing.len()
        );

        if !report.missing.is_empty() {
            let path = ctx.dir.join("undiscovered-urls.txt");
            write_lines(&path, &report.missing)?;
            let name = format!("diffex-undiscovered-urls-{}.txt", ctx.job.id);
            comment.push_str(&attach_best_effort(ctx, &name, &path, "Missing URL list").await);
        }

        comment_best_effort(ctx, &comment).await;
        Ok(())
    }
}
