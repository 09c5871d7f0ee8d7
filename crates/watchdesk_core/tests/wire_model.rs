use pretty_assertions::assert_eq;
use serde_json::json;
use watchdesk_core::{DocumentsResponse, Health, RecordId, WatchTimeline};

#[test]
fn documents_accept_numeric_and_text_ids() {
    let payload = json!({
        "documents": [
            { "id": 1, "title": "Example", "url": "https://example.com" },
            { "id": "2", "title": "Docs", "url": "https://docs.example.com",
              "latest_scan": { "id": 9, "changes": true, "change_level": "HIGH" } }
        ],
        "total_count": 2
    });

    let response: DocumentsResponse = serde_json::from_value(payload).unwrap();

    assert_eq!(response.documents.len(), 2);
    assert_eq!(response.documents[1].id, RecordId::Number(2));
    assert_eq!(Health::of(&response.documents[0]), Health::NoScan);
    assert_eq!(Health::of(&response.documents[1]), Health::Major);
}

#[test]
fn reconciled_timeline_mirrors_newest_history_entry() {
    let payload = json!({
        "document": {
            "id": 5,
            "title": "Example",
            "url": "https://example.com",
            "category": "news",
            "latest_scan": { "id": 1, "changes": false },
            "scan_history": [
                { "id": 3, "date": "2024-05-02T10:00:00Z", "changes": true,
                  "change_level": "minor", "additions": ["a"] },
                { "id": 1, "date": "2024-05-01T10:00:00Z", "changes": false }
            ]
        },
        "total_scans": 2
    });

    let timeline: WatchTimeline = serde_json::from_value(payload).unwrap();
    let timeline = timeline.reconciled();
    let latest = timeline.document.watch.latest_scan.as_ref().unwrap();

    assert_eq!(latest.id, RecordId::Number(3));
    assert!(latest.changes);
    assert_eq!(latest.scan_date, "2024-05-02T10:00:00Z");
    assert_eq!(timeline.document.category.as_deref(), Some("news"));
}
