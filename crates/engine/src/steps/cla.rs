// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Crawl-log analysis step.

use aqa_core::STEP_CLA;
use async_trait::async_trait;

use super::{attach_best_effort, comment_best_effort, write_lines};
use crate::registry::{Step, StepCtx, StepFailure};

/// Pre-handover crawl-log analysis: status breakdown plus the in-scope
/// error URLs that need patching.
pub struct Cla;

#[async_trait]
impl Step for Cla {
    fn name(&self) -> &'static str {
        STEP_CLA
    }

    async fn run(&self, ctx: &StepCtx<'_>) -> Result<(), StepFailure> {
        ctx.log.info(&format!(
            "analysing crawl log ({} scope rules)",
            ctx.job.scope.len()
        ));
        let report = ctx.toolkit.log_report(&ctx.job.crawl_log, &ctx.job.scope).await?;
        ctx.log.info(&format!(
            "{} URL(s) checked, {} to patch",
            report.checked,
            report.patchlist.len()
        ));

        let breakdown: Vec<String> =
            report.status_counts.iter().map(|(code, n)| format!("{code}\t{n}")).collect();
        write_lines(&ctx.dir.join("status-breakdown.txt"), &breakdown)?;
        write_lines(&ctx.dir.join("patchlist.txt"), &report.patchlist)?;

        let mut comment = format!(
            "Crawl log analysis:\n{} URL(s) checked. {} to patch.",
            report.checked,
            report.patchlist.len()
        );

        if !report.patchlist.is_empty() {
            let name = format!("cla-patchlist-{}.txt", ctx.job.id);
            comment.push_str(
                &attach_best_effort(ctx, &name, &ctx.dir.join("patchlist.txt"), "Patchlist").await,
            );
        }

        comment_best_effort(ctx, &comment).await;
        Ok(())
    }
}
