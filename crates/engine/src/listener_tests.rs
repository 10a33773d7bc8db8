// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use aqa_adapters::FakeTracker;
use aqa_core::{FakeClock, RecordBuilder};
use tempfile::TempDir;

struct Fixture {
    temp: TempDir,
    tracker: FakeTracker,
    clock: FakeClock,
    listener: Listener<FakeClock>,
}

fn setup() -> Fixture {
    let temp = tempfile::tempdir().unwrap();
    let tracker = FakeTracker::new();
    let clock = FakeClock::new();
    clock.set_epoch_secs(10_000_000);
    let listener = Listener::new(
        Arc::new(tracker.clone()),
        QueueStore::open(temp.path().join("queue")).unwrap(),
        MarkerStore::open(temp.path().join("markers")).unwrap(),
        Workdir::new(temp.path().join("jobs")),
        AdmissionPolicy::default(),
        clock.clone(),
        Duration::from_secs(60),
        Duration::from_secs(5_256_000),
    );
    Fixture { temp, tracker, clock, listener }
}

impl Fixture {
    fn queue(&self) -> QueueStore {
        QueueStore::open(self.temp.path().join("queue")).unwrap()
    }

    fn id(&self, raw: &str) -> JobId {
        JobId::parse(raw).unwrap()
    }
}

#[tokio::test]
async fn admits_new_record_with_steps() {
    let mut fx = setup();
    fx.tracker
        .push_poll_batch(vec![RecordBuilder::new("1002").status("Ready For QA").build()]);

    fx.listener.cycle().await.unwrap();
    assert!(fx.queue().exists(&fx.id("1002")));
}

#[tokio::test]
async fn repoll_with_unchanged_updated_at_is_one_mutation() {
    let mut fx = setup();
    let queue = fx.queue();

    // Seed the queue with a marked snapshot carrying the same updated_at
    let seeded = RecordBuilder::new("1002")
        .status("Ready For QA")
        .updated_at("t1")
        .summary("seeded snapshot")
        .build();
    queue.upsert(&fx.id("1002"), &seeded).unwrap();

    // Polling the same updated_at must leave the entry untouched
    fx.tracker.push_poll_batch(vec![RecordBuilder::new("1002")
        .status("Ready For QA")
        .updated_at("t1")
        .build()]);
    fx.listener.cycle().await.unwrap();

    assert_eq!(queue.read(&fx.id("1002")).unwrap().summary, "seeded snapshot");
}

#[tokio::test]
async fn newer_update_refreshes_queue_entry() {
    let mut fx = setup();
    fx.tracker.push_poll_batch(vec![RecordBuilder::new("1002")
        .status("Ready For QA")
        .updated_at("t1")
        .build()]);
    fx.listener.cycle().await.unwrap();

    fx.tracker.push_poll_batch(vec![RecordBuilder::new("1002")
        .status("Ready For QA")
        .updated_at("t2")
        .build()]);
    fx.listener.cycle().await.unwrap();

    assert_eq!(fx.queue().read(&fx.id("1002")).unwrap().updated_at, "t2");
}

#[tokio::test]
async fn terminal_record_removes_entry_and_output() {
    let mut fx = setup();
    let queue = fx.queue();
    queue.upsert(&fx.id("1001"), &RecordBuilder::new("1001").build()).unwrap();
    let workdir = Workdir::new(fx.temp.path().join("jobs"));
    workdir.create_step_dir(&fx.id("1001"), "cla", "20260807").unwrap();
    let markers = MarkerStore::open(fx.temp.path().join("markers")).unwrap();
    markers.mark_complete(&fx.id("1001"), "cla").unwrap();

    fx.tracker.push_poll_batch(vec![RecordBuilder::new("1001").status("Done").build()]);
    fx.listener.cycle().await.unwrap();

    assert!(!queue.exists(&fx.id("1001")));
    assert!(!workdir.job_dir(&fx.id("1001")).exists());
    assert!(markers.completed(&fx.id("1001")).unwrap().is_empty());
}

#[tokio::test]
async fn record_without_steps_never_stays_queued() {
    let mut fx = setup();
    let queue = fx.queue();

    // Fresh record with no applicable steps: nothing queued
    fx.tracker.push_poll_batch(vec![RecordBuilder::new("1003").status("Open").build()]);
    fx.listener.cycle().await.unwrap();
    assert!(!queue.exists(&fx.id("1003")));

    // Previously queued record whose steps no longer apply: dequeued
    queue
        .upsert(&fx.id("1004"), &RecordBuilder::new("1004").status("Ready For QA").build())
        .unwrap();
    fx.tracker.push_poll_batch(vec![RecordBuilder::new("1004").status("Open").build()]);
    fx.listener.cycle().await.unwrap();
    assert!(!queue.exists(&fx.id("1004")));
}

#[tokio::test]
async fn non_numeric_record_is_ignored() {
    let mut fx = setup();
    fx.tracker
        .push_poll_batch(vec![RecordBuilder::new("social-links").status("Ready For QA").build()]);
    fx.listener.cycle().await.unwrap();
    assert!(fx.queue().list_pending().unwrap().is_empty());
}

#[tokio::test]
async fn failed_poll_is_survived_and_next_cycle_covers_gap() {
    let mut fx = setup();
    fx.tracker.fail_next_poll();
    assert!(fx.listener.cycle().await.is_err());

    // The loop swallows the error; the following cycle still admits
    fx.tracker
        .push_poll_batch(vec![RecordBuilder::new("1002").status("Ready For QA").build()]);
    fx.clock.advance(Duration::from_secs(60));
    fx.listener.cycle().await.unwrap();
    assert!(fx.queue().exists(&fx.id("1002")));
}

#[tokio::test]
async fn example_scenario_terminal_and_fresh_record() {
    let mut fx = setup();
    let queue = fx.queue();
    // 1001 was queued earlier; 1002 is new with steps [pdf-flash, diffex]
    queue.upsert(&fx.id("1001"), &RecordBuilder::new("1001").build()).unwrap();
    fx.tracker.push_poll_batch(vec![
        RecordBuilder::new("1001").status("Done").build(),
        RecordBuilder::new("1002")
            .status("Open")
            .label("run-pdf-flash")
            .attachment("diffex.csv", "https://tracker.example/att/9")
            .build(),
    ]);

    fx.listener.cycle().await.unwrap();

    assert!(!queue.exists(&fx.id("1001")));
    assert!(queue.exists(&fx.id("1002")));
    let pending = queue.list_pending().unwrap();
    assert_eq!(pending, vec![fx.id("1002")]);
}
