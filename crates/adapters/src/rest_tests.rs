// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn issue_json() -> Value {
    serde_json::json!({
        "key": "WQA-213",
        "fields": {
            "summary": "crawl 1002 — department site",
            "updated": "2026-08-01T10:00:00.000+0000",
            "status": { "name": "Ready For QA" },
            "labels": ["client-ref:1002", "run-pdf-flash"],
            "attachment": [
                {
                    "filename": "diffex.csv",
                    "content": "https://tracker.example/secure/att/9",
                    "created": "2026-07-30T09:00:00.000+0000"
                }
            ]
        }
    })
}

#[test]
fn maps_issue_fields_onto_record() {
    let record =
        record_from_issue(&issue_json(), "client-ref:", "https://tracker.example/").unwrap();

    assert_eq!(record.id, "1002");
    assert_eq!(record.key, "WQA-213");
    assert_eq!(record.updated_at, "2026-08-01T10:00:00.000+0000");
    assert_eq!(record.status, "Ready For QA");
    assert!(record.has_label("run-pdf-flash"));
    assert_eq!(record.attachments.len(), 1);
    assert_eq!(record.attachments[0].filename, "diffex.csv");
    assert_eq!(record.link, "https://tracker.example/browse/WQA-213");
}

#[test]
fn issue_without_id_label_is_skipped() {
    let mut issue = issue_json();
    issue["fields"]["labels"] = serde_json::json!(["run-pdf-flash"]);
    assert!(record_from_issue(&issue, "client-ref:", "https://tracker.example").is_none());
}

#[test]
fn missing_optional_fields_default() {
    let issue = serde_json::json!({
        "key": "WQA-7",
        "fields": { "labels": ["client-ref:77"] }
    });
    let record = record_from_issue(&issue, "client-ref:", "https://tracker.example").unwrap();
    assert_eq!(record.id, "77");
    assert_eq!(record.status, "");
    assert_eq!(record.updated_at, "");
    assert!(record.attachments.is_empty());
}
