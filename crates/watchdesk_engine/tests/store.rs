use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use watchdesk_core::WatchId;
use watchdesk_engine::{ClientSettings, FailureKind, ReqwestWatchStore, WatchStore};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn store_for(server: &MockServer) -> ReqwestWatchStore {
    ReqwestWatchStore::new(&ClientSettings {
        base_url: server.uri(),
        ..ClientSettings::default()
    })
    .expect("store")
}

fn document(id: serde_json::Value) -> serde_json::Value {
    json!({
        "id": id,
        "title": "Rust blog",
        "desc": "",
        "url": "https://blog.rust-lang.org",
        "status": "active",
        "created_date": "2024-03-01T10:00:00.123456",
        "latest_scan": null
    })
}

#[tokio::test]
async fn list_decodes_documents() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/documents/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "documents": [document(json!(1)), document(json!("two"))],
            "total_count": 2
        })))
        .mount(&server)
        .await;

    let watches = store_for(&server).list().await.expect("list ok");

    assert_eq!(watches.len(), 2);
    assert_eq!(watches[0].id, WatchId::from(1));
    assert_eq!(watches[1].id, WatchId::from("two"));
    assert_eq!(watches[0].latest_scan, None);
}

#[tokio::test]
async fn timeline_reads_history_and_reconciles_latest_scan() {
    let server = MockServer::start().await;
    let mut doc = document(json!(5));
    doc["category"] = json!("blog");
    doc["scan_count"] = json!(2);
    doc["latest_scan"] = json!({
        "id": 1,
        "changes": false,
        "scan_date": "2024-03-01T10:00:00Z"
    });
    doc["scan_history"] = json!([
        {
            "id": 2,
            "date": "2024-03-02T10:00:00Z",
            "changes": true,
            "change_level": "major",
            "change_summary": "New release post",
            "additions": ["Rust 1.77"],
            "deletions": [],
            "modifications": []
        },
        { "id": 1, "date": "2024-03-01T10:00:00Z", "changes": false }
    ]);
    Mock::given(method("GET"))
        .and(path("/documents/5/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "document": doc, "total_scans": 2 })),
        )
        .mount(&server)
        .await;

    let store = store_for(&server);
    let timeline = store
        .timeline(&WatchId::from(5))
        .await
        .expect("timeline ok")
        .expect("found");
    assert_eq!(timeline.document.scan_history.len(), 2);
    assert_eq!(timeline.document.category.as_deref(), Some("blog"));

    let watch = store.watch(&WatchId::from(5)).await.unwrap().unwrap();
    let latest = watch.latest_scan.expect("latest scan");
    assert_eq!(latest.id, WatchId::from(2));
    assert!(latest.changes);
}

#[tokio::test]
async fn missing_watch_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/documents/404/"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "Document not found"})))
        .mount(&server)
        .await;

    let result = store_for(&server).timeline(&WatchId::from(404)).await;
    assert_eq!(result, Ok(None));
}

#[tokio::test]
async fn create_posts_url_and_title() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/createDocumentAndScan/"))
        .and(body_json(json!({"url": "https://blog.rust-lang.org", "title": "blog.rust-lang.org"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "message": "Document created and scanned",
            "document": document(json!(9)),
            "scan": { "id": 30, "changes": false, "scan_date": "2024-03-01T10:00:00Z" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let created = store_for(&server)
        .create_and_scan("https://blog.rust-lang.org", "blog.rust-lang.org")
        .await
        .expect("create ok");

    assert_eq!(created.document.id, WatchId::from(9));
    assert_eq!(created.scan.map(|s| s.id), Some(WatchId::from(30)));
}

#[tokio::test]
async fn create_error_message_is_passed_through() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/createDocumentAndScan/"))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_json(json!({"error": "Failed to fetch URL: connection reset"})),
        )
        .mount(&server)
        .await;

    let err = store_for(&server)
        .create_and_scan("https://down.example.com", "down.example.com")
        .await
        .unwrap_err();

    assert_eq!(err.kind, FailureKind::HttpStatus(500));
    assert_eq!(err.to_string(), "Failed to fetch URL: connection reset");
}

#[tokio::test]
async fn delete_succeeds_only_on_2xx() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/documents/1/"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/documents/2/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let store = store_for(&server);
    assert_eq!(store.delete(&WatchId::from(1)).await, Ok(true));
    assert_eq!(store.delete(&WatchId::from(2)).await, Ok(false));
}

#[tokio::test]
async fn undecodable_list_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/documents/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
        .mount(&server)
        .await;

    let err = store_for(&server).list().await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Decode);
}

#[tokio::test]
async fn slow_store_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/documents/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_json(json!({"documents": [], "total_count": 0})),
        )
        .mount(&server)
        .await;

    let store = ReqwestWatchStore::new(&ClientSettings {
        base_url: server.uri(),
        request_timeout: Duration::from_millis(50),
        ..ClientSettings::default()
    })
    .unwrap();

    let err = store.list().await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
}

#[tokio::test]
async fn general_call_posts_empty_object() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/makeGeneralCall/"))
        .and(body_json(json!({})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    assert_eq!(store_for(&server).general_call().await, Ok(()));
}
