// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn append_creates_parent_and_file() {
    let temp = tempfile::tempdir().unwrap();
    let log = RotatingLog::new(temp.path().join("logs/full.log"));
    log.append("first line").unwrap();
    let content = fs::read_to_string(log.path()).unwrap();
    assert_eq!(content, "first line\n");
}

#[test]
fn rotates_at_size_cap() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("full.log");
    let log = RotatingLog::with_limits(&path, 32, 2);

    for i in 0..10 {
        log.append(&format!("line number {i} padding padding")).unwrap();
    }

    assert!(path.exists());
    assert!(temp.path().join("full.log.1").exists());
    // Live file stays under the cap after every rotation
    assert!(fs::metadata(&path).unwrap().len() <= 64);
}

#[test]
fn retains_at_most_n_backups() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("full.log");
    let log = RotatingLog::with_limits(&path, 16, 2);

    for i in 0..40 {
        log.append(&format!("line {i} with some padding")).unwrap();
    }

    assert!(temp.path().join("full.log.1").exists());
    assert!(temp.path().join("full.log.2").exists());
    assert!(!temp.path().join("full.log.3").exists());
}

#[test]
fn oldest_backup_content_is_dropped() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("full.log");
    let log = RotatingLog::with_limits(&path, 12, 1);

    log.append("aaaaaaaaaaaa").unwrap();
    log.append("bbbbbbbbbbbb").unwrap();
    log.append("cccccccccccc").unwrap();

    // "a" rotated out and was then replaced by "b"'s backup
    let backup = fs::read_to_string(temp.path().join("full.log.1")).unwrap();
    assert!(backup.contains("bbbb"));
    let live = fs::read_to_string(&path).unwrap();
    assert!(live.contains("cccc"));
}
