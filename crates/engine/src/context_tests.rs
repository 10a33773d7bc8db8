// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use aqa_adapters::{FakeLogStore, FakeTracker, TrackerCall};
use aqa_core::RecordBuilder;

fn id(raw: &str) -> JobId {
    JobId::parse(raw).unwrap()
}

fn arcs(
    tracker: &FakeTracker,
    logs: &FakeLogStore,
) -> (Arc<dyn Tracker>, Arc<dyn LogStore>) {
    (Arc::new(tracker.clone()), Arc::new(logs.clone()))
}

fn seed_logs(logs: &FakeLogStore) {
    logs.put(
        "crawl-logs/tna-1002/crawl.log",
        "2026-08-01T10:00:00.000Z 200 1024 https://dept.gov/ - - text/html #001 -",
    );
    logs.put("crawl-logs/tna-1002/also-in-scope.txt", "https://dept.gov\n");
}

#[tokio::test]
async fn loads_record_log_and_scope() {
    let tracker = FakeTracker::new();
    tracker.set_records_for_job("1002", vec![RecordBuilder::new("1002").build()]);
    let logs = FakeLogStore::new();
    seed_logs(&logs);

    let (t, l) = arcs(&tracker, &logs);
    let ctx = JobContext::load(&id("1002"), &t, &l, "crawl-logs/tna-").await.unwrap();

    assert_eq!(ctx.record.id, "1002");
    assert!(ctx.crawl_log.contains("https://dept.gov/"));
    assert_eq!(ctx.scope, vec!["https://dept.gov", "http://dept.gov"]);
}

#[tokio::test]
async fn multiple_crawl_logs_are_combined() {
    let tracker = FakeTracker::new();
    tracker.set_records_for_job("1002", vec![RecordBuilder::new("1002").build()]);
    let logs = FakeLogStore::new();
    logs.put("crawl-logs/tna-1002/run-1/crawl.log", "first");
    logs.put("crawl-logs/tna-1002/run-2/crawl.log", "second");

    let (t, l) = arcs(&tracker, &logs);
    let ctx = JobContext::load(&id("1002"), &t, &l, "crawl-logs/tna-").await.unwrap();
    assert_eq!(ctx.crawl_log, "first\nsecond");
}

#[tokio::test]
async fn missing_record_is_context_fault() {
    let tracker = FakeTracker::new();
    let logs = FakeLogStore::new();
    seed_logs(&logs);

    let (t, l) = arcs(&tracker, &logs);
    let err = JobContext::load(&id("1002"), &t, &l, "crawl-logs/tna-").await.unwrap_err();
    assert!(err.is_context_fault());
}

#[tokio::test]
async fn missing_crawl_logs_are_context_fault() {
    let tracker = FakeTracker::new();
    tracker.set_records_for_job("1002", vec![RecordBuilder::new("1002").build()]);
    let logs = FakeLogStore::new();
    logs.put("crawl-logs/tna-1002/also-in-scope.txt", "https://dept.gov\n");

    let (t, l) = arcs(&tracker, &logs);
    let err = JobContext::load(&id("1002"), &t, &l, "crawl-logs/tna-").await.unwrap_err();
    assert!(matches!(err, EngineError::ContextLoad { .. }));
}

#[tokio::test]
async fn duplicate_records_fail_and_get_flagged() {
    let tracker = FakeTracker::new();
    tracker.set_records_for_job(
        "1002",
        vec![
            RecordBuilder::new("1002").key("WQA-1").build(),
            RecordBuilder::new("1002").key("WQA-2").build(),
        ],
    );
    let logs = FakeLogStore::new();
    seed_logs(&logs);

    let (t, l) = arcs(&tracker, &logs);
    let err = JobContext::load(&id("1002"), &t, &l, "crawl-logs/tna-").await.unwrap_err();
    assert!(err.is_context_fault());

    // Both records got a diagnostic comment and the duplicate label
    let calls = tracker.calls();
    assert!(calls.contains(&TrackerCall::Label { key: "WQA-1".into(), label: "duplicate".into() }));
    assert!(calls.contains(&TrackerCall::Label { key: "WQA-2".into(), label: "duplicate".into() }));
    assert!(tracker.comments_for("WQA-1")[0].contains("duplicate"));
}

#[tokio::test]
async fn already_flagged_duplicates_are_not_renotified() {
    let tracker = FakeTracker::new();
    tracker.set_records_for_job(
        "1002",
        vec![
            RecordBuilder::new("1002").key("WQA-1").build(),
            RecordBuilder::new("1002").key("WQA-2").label("duplicate").build(),
        ],
    );
    let logs = FakeLogStore::new();
    seed_logs(&logs);

    let (t, l) = arcs(&tracker, &logs);
    let _ = JobContext::load(&id("1002"), &t, &l, "crawl-logs/tna-").await.unwrap_err();
    assert!(tracker.comments_for("WQA-2").is_empty());
}
