// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! PDF link sweep step.

use aqa_core::STEP_PDF_FLASH;
use async_trait::async_trait;

use super::{attach_best_effort, comment_best_effort, write_lines};
use crate::registry::{Step, StepCtx, StepFailure};

/// Inventories the crawl's PDFs and reports the in-scope links found in
/// them that are not captured yet.
pub struct PdfFlash;

#[async_trait]
impl Step for PdfFlash {
    fn name(&self) -> &'static str {
        STEP_PDF_FLASH
    }

    async fn run(&self, ctx: &StepCtx<'_>) -> Result<(), StepFailure> {
        ctx.log.info("generating PDF inventory from crawl log");
        let report = ctx.toolkit.pdf_link_report(&ctx.job.crawl_log).await?;
        ctx.log.info(&format!(
            "{} PDFs checked, {} URLs discovered, {} to patch",
            report.pdfs_checked.len(),
            report.discovered_urls.len(),
            report.patchlist.len()
        ));

        write_lines(&ctx.dir.join("pdfs-checked.txt"), &report.pdfs_checked)?;
        write_lines(&ctx.dir.join("discovered-urls.txt"), &report.discovered_urls)?;

        let mut comment = format!(
            "PDF link sweep:\n{} PDFs checked.\n{} URLs discovered.\n\
             {} in scope and not yet captured.",
            report.pdfs_checked.len(),
            report.discovered_urls.len(),
            report.patchlist.len()
        );

        if !report.patchlist.is_empty() {
            let path = ctx.dir.join("pdfflash-patchlist.txt");
            write_lines(&path, &report.patchlist)?;
            let name = format!("pdfflash-patchlist-{}.txt", ctx.job.id);
            comment.push_str(&attach_best_effort(ctx, &name, &path, "Patchlist").await);
        }

        comment_best_effort(ctx, &comment).await;
        Ok(())
    }
}
