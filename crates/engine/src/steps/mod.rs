// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Built-in pipeline steps.
//!
//! Each step owns orchestration only: its run directory, its logs, its
//! artifacts, and its tracker reporting. The analysis itself comes from
//! the [`aqa_adapters::QaToolkit`] collaborator. Attach and comment
//! failures are logged and noted in the comment text, never fatal.

mod cla;
mod diffex;
mod pdf_flash;

pub use cla::Cla;
pub use diffex::Diffex;
pub use pdf_flash::PdfFlash;

use std::path::Path;

use crate::registry::{StepCtx, StepFailure};

/// Write one line per item, creating the file.
pub(crate) fn write_lines(path: &Path, lines: &[String]) -> Result<(), StepFailure> {
    std::fs::write(path, lines.join("\n"))?;
    Ok(())
}

/// Attach an artifact to the job's record, best-effort.
///
/// Returns the sentence to append to the step's result comment.
pub(crate) async fn attach_best_effort(
    ctx: &StepCtx<'_>,
    name: &str,
    path: &Path,
    what: &str,
) -> String {
    match ctx.tracker.attach_file(&ctx.job.record.key, name, path).await {
        Ok(()) => {
            ctx.log.info(&format!("{what} attached"));
            format!("\n{what} attached as \"{name}\".")
        }
        Err(e) => {
            ctx.log.error(&format!("{what} upload failed: {e}"));
            format!("\n{what} upload failed.")
        }
    }
}

/// Post the step's result comment, best-effort.
pub(crate) async fn comment_best_effort(ctx: &StepCtx<'_>, text: &str) {
    match ctx.tracker.add_comment(&ctx.job.record.key, text).await {
        Ok(()) => ctx.log.info("comment posted"),
        Err(e) => ctx.log.error(&format!("comment post failed: {e}")),
    }
}

#[cfg(test)]
#[path = "steps_tests.rs"]
mod tests;
