// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use aqa_core::RecordBuilder;

fn id(raw: &str) -> JobId {
    JobId::parse(raw).unwrap()
}

#[test]
fn upsert_read_round_trip() {
    let temp = tempfile::tempdir().unwrap();
    let queue = QueueStore::open(temp.path().join("queue")).unwrap();
    let record = RecordBuilder::new("1002").status("Ready For QA").build();

    queue.upsert(&id("1002"), &record).unwrap();
    assert!(queue.exists(&id("1002")));
    assert_eq!(queue.read(&id("1002")).unwrap(), record);
}

#[test]
fn upsert_overwrites_existing_entry() {
    let temp = tempfile::tempdir().unwrap();
    let queue = QueueStore::open(temp.path()).unwrap();

    let first = RecordBuilder::new("1002").updated_at("t1").build();
    let second = RecordBuilder::new("1002").updated_at("t2").build();
    queue.upsert(&id("1002"), &first).unwrap();
    queue.upsert(&id("1002"), &second).unwrap();

    assert_eq!(queue.read(&id("1002")).unwrap().updated_at, "t2");
    assert_eq!(queue.list_pending().unwrap().len(), 1);
}

#[test]
fn read_missing_is_not_found() {
    let temp = tempfile::tempdir().unwrap();
    let queue = QueueStore::open(temp.path()).unwrap();
    assert!(matches!(queue.read(&id("9")), Err(StoreError::NotFound(_))));
}

#[test]
fn delete_is_noop_when_absent() {
    let temp = tempfile::tempdir().unwrap();
    let queue = QueueStore::open(temp.path()).unwrap();
    queue.delete(&id("1002")).unwrap();

    queue.upsert(&id("1002"), &RecordBuilder::new("1002").build()).unwrap();
    queue.delete(&id("1002")).unwrap();
    assert!(!queue.exists(&id("1002")));
}

#[test]
fn list_pending_skips_tmp_and_foreign_files() {
    let temp = tempfile::tempdir().unwrap();
    let queue = QueueStore::open(temp.path()).unwrap();
    queue.upsert(&id("1001"), &RecordBuilder::new("1001").build()).unwrap();
    queue.upsert(&id("1002"), &RecordBuilder::new("1002").build()).unwrap();

    // Simulate a crashed writer and an unrelated file
    std::fs::write(temp.path().join("1003.tmp"), b"{").unwrap();
    std::fs::write(temp.path().join("README"), b"not an entry").unwrap();

    let mut ids: Vec<String> =
        queue.list_pending().unwrap().into_iter().map(|i| i.to_string()).collect();
    ids.sort();
    assert_eq!(ids, vec!["1001", "1002"]);
}

#[test]
fn no_tmp_file_remains_after_upsert() {
    let temp = tempfile::tempdir().unwrap();
    let queue = QueueStore::open(temp.path()).unwrap();
    queue.upsert(&id("1002"), &RecordBuilder::new("1002").build()).unwrap();

    let names: Vec<String> = std::fs::read_dir(temp.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["1002"]);
}
