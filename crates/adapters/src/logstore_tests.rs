// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn fs_store_lists_by_prefix_and_fetches() {
    let temp = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(temp.path().join("crawl-logs/tna-1002")).unwrap();
    std::fs::write(temp.path().join("crawl-logs/tna-1002/crawl.log"), b"line1\n").unwrap();
    std::fs::write(temp.path().join("crawl-logs/tna-1002/also-in-scope.txt"), b"https://a.gov\n")
        .unwrap();
    std::fs::create_dir_all(temp.path().join("crawl-logs/tna-2000")).unwrap();
    std::fs::write(temp.path().join("crawl-logs/tna-2000/crawl.log"), b"other\n").unwrap();

    let store = FsLogStore::new(temp.path());
    let mut keys = store.list("crawl-logs/tna-1002").await.unwrap();
    keys.sort();
    assert_eq!(
        keys,
        vec!["crawl-logs/tna-1002/also-in-scope.txt", "crawl-logs/tna-1002/crawl.log"]
    );

    let bytes = store.fetch("crawl-logs/tna-1002/crawl.log").await.unwrap();
    assert_eq!(bytes, b"line1\n");
}

#[tokio::test]
async fn fs_store_missing_key_is_not_found() {
    let temp = tempfile::tempdir().unwrap();
    let store = FsLogStore::new(temp.path());
    assert!(matches!(
        store.fetch("nope").await,
        Err(LogStoreError::NotFound(_))
    ));
    // Listing an empty root is fine
    assert!(store.list("anything").await.unwrap().is_empty());
}

#[tokio::test]
async fn fake_store_round_trips() {
    let store = FakeLogStore::new();
    store.put("crawl-logs/tna-1/crawl.log", "hello");
    assert_eq!(store.list("crawl-logs/tna-1").await.unwrap().len(), 1);
    assert_eq!(store.fetch("crawl-logs/tna-1/crawl.log").await.unwrap(), b"hello");
}
