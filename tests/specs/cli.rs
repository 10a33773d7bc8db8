// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `aqa` CLI surface specs.
//!
//! These run the real binary. Nothing here talks to a live tracker: the
//! interesting contracts are argument validation, configuration errors,
//! and the exit-status rule for single-job runs (context-load failures
//! are fatal, step failures are not — the latter needs a live pipeline
//! and is covered by the engine's executor tests).

use assert_cmd::Command;
use tempfile::TempDir;

fn aqa(temp: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("aqa").expect("aqa binary");
    cmd.env_clear().env("AQA_DATA_DIR", temp.path());
    cmd
}

fn with_tracker_env(cmd: &mut Command, base_url: &str) {
    cmd.env("AQA_TRACKER_URL", base_url)
        .env("AQA_TRACKER_PROJECT", "WQA")
        .env("AQA_TRACKER_USER", "qa-bot")
        .env("AQA_TRACKER_TOKEN", "secret");
}

#[test]
fn help_lists_the_entry_points() {
    let temp = tempfile::tempdir().expect("tempdir");
    aqa(&temp)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicates::str::contains("daemon"))
        .stdout(predicates::str::contains("listen"))
        .stdout(predicates::str::contains("run"));
}

#[test]
fn run_rejects_non_numeric_job_ids() {
    let temp = tempfile::tempdir().expect("tempdir");
    let mut cmd = aqa(&temp);
    with_tracker_env(&mut cmd, "https://tracker.invalid");
    cmd.env("AQA_LOGSTORE_DIR", temp.path())
        .args(["run", "not-a-crawl"])
        .assert()
        .failure()
        .stderr(predicates::str::contains("numeric"));
}

#[test]
fn run_without_tracker_config_fails_clearly() {
    let temp = tempfile::tempdir().expect("tempdir");
    aqa(&temp)
        .args(["run", "1002"])
        .assert()
        .failure()
        .stderr(predicates::str::contains("tracker not configured"));
}

#[test]
fn incomplete_tracker_env_is_a_config_error() {
    let temp = tempfile::tempdir().expect("tempdir");
    aqa(&temp)
        .env("AQA_TRACKER_URL", "https://tracker.invalid")
        .args(["run", "1002"])
        .assert()
        .failure()
        .stderr(predicates::str::contains("AQA_TRACKER_PROJECT"));
}

#[test]
fn context_load_failure_is_a_nonzero_exit() {
    let temp = tempfile::tempdir().expect("tempdir");
    let mut cmd = aqa(&temp);
    // Nothing listens on this port; record fetch fails, so the context
    // stage aborts the job and the process exits nonzero.
    with_tracker_env(&mut cmd, "http://127.0.0.1:9");
    cmd.env("AQA_LOGSTORE_DIR", temp.path())
        .args(["run", "1002"])
        .assert()
        .failure()
        .stderr(predicates::str::contains("context load failed"));
}
