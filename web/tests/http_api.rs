//! HTTP tests against the full router and the in-memory store.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use badge_desk_core::{CheckinDesk, StoreError, UserId};
use badge_desk_testing::{InMemoryRegistrantStore, fixtures, test_clock};
use badge_desk_web::{AppState, CORRELATION_ID_HEADER, build_router};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

fn app(store: &InMemoryRegistrantStore) -> Router {
    let shared: Arc<dyn badge_desk_core::RegistrantStore> = Arc::new(store.clone());
    let desk = CheckinDesk::new(Arc::clone(&shared), Arc::new(test_clock()));
    build_router(AppState::new(desk, shared, "event_users", "ticket_id_index"))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 1 << 20).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn post(path: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(path: &str) -> Request<Body> {
    Request::builder().uri(path).body(Body::empty()).unwrap()
}

fn decode_pdf(body: &Value) -> lopdf::Document {
    let bytes = STANDARD
        .decode(body["pdfBase64"].as_str().expect("pdfBase64 should be a string"))
        .expect("pdfBase64 should be standard base64");
    lopdf::Document::load_mem(&bytes).expect("payload should be a PDF")
}

fn page_text(doc: &lopdf::Document) -> Vec<u8> {
    let page_id = *doc.get_pages().values().next().unwrap();
    doc.get_page_content(page_id).unwrap()
}

fn contains(haystack: &[u8], needle: &str) -> bool {
    haystack
        .windows(needle.len())
        .any(|window| window == needle.as_bytes())
}

#[tokio::test]
async fn health_reports_table_and_index() {
    let store = InMemoryRegistrantStore::new();
    let (status, body) = send(app(&store), get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
    assert_eq!(body["table"], "event_users");
    assert_eq!(body["index"], "ticket_id_index");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn ready_follows_store_reachability() {
    let store = InMemoryRegistrantStore::new();
    let (status, _) = send(app(&store), get("/ready")).await;
    assert_eq!(status, StatusCode::OK);

    store.fail_with(StoreError::Unavailable("connection refused".to_string()));
    let (status, body) = send(app(&store), get("/ready")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["message"].as_str().unwrap().contains("connection refused"));
}

#[tokio::test]
async fn checkin_scenario() {
    let store = InMemoryRegistrantStore::with_records([fixtures::ada()]);
    let (status, body) = send(app(&store), post("/checkin", &json!({ "ticketId": "T-001" }))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
    assert_eq!(body["ticketId"], "T-001");
    assert_eq!(body["userId"], "u1");
    assert_eq!(body["name"], "Ada Lovelace");
    assert_eq!(body["profession"], "Engineer");
    assert_eq!(body["checkedIn"], true);
    assert_eq!(body["checkedInAt"], "2024-01-01T10:00:00Z");
    assert_eq!(body["alreadyCheckedIn"], false);
    assert_eq!(body["contentType"], "application/pdf");

    let text = page_text(&decode_pdf(&body));
    assert!(contains(&text, "Ada Lovelace"));
    assert!(contains(&text, "CheckedInAt: 2024-01-01T10:00:00Z"));
}

#[tokio::test]
async fn second_checkin_is_already_checked_in() {
    let store = InMemoryRegistrantStore::with_records([fixtures::ada()]);
    let request = json!({ "ticketId": "T-001" });
    send(app(&store), post("/checkin", &request)).await;
    let (status, body) = send(app(&store), post("/checkin", &request)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["alreadyCheckedIn"], true);
    assert_eq!(body["checkedInAt"], "2024-01-01T10:00:00Z");
}

#[tokio::test]
async fn badge_preview_does_not_check_in() {
    let store = InMemoryRegistrantStore::with_records([fixtures::ada()]);
    let (status, body) = send(app(&store), post("/badge", &json!({ "ticketId": " T-001 " }))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ticketId"], "T-001");
    assert_eq!(body["checkedIn"], false);
    assert_eq!(body["checkedInAt"], "N/A");
    assert!(body.get("alreadyCheckedIn").is_none());
    assert!(!store.get(&UserId::new("u1")).unwrap().checked_in);
}

#[tokio::test]
async fn preview_reports_unknown_user_and_placeholders() {
    let store = InMemoryRegistrantStore::with_records([fixtures::without_user_id("T-009")]);
    let (status, body) = send(app(&store), post("/badge", &json!({ "ticketId": "T-009" }))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["userId"], "UNKNOWN");
    assert_eq!(body["name"], "UNKNOWN");
    assert_eq!(body["profession"], "N/A");
}

#[tokio::test]
async fn blank_or_missing_ticket_is_400() {
    let store = InMemoryRegistrantStore::with_records([fixtures::ada()]);
    for body in [json!({ "ticketId": "   " }), json!({}), json!({ "ticketId": null })] {
        let (status, response) = send(app(&store), post("/checkin", &body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(response["code"], "INVALID_INPUT");
    }
    assert_eq!(store.query_count(), 0);
}

#[tokio::test]
async fn malformed_json_is_400() {
    let store = InMemoryRegistrantStore::new();
    let request = Request::builder()
        .method("POST")
        .uri("/checkin")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(app(&store), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn unknown_ticket_is_404() {
    let store = InMemoryRegistrantStore::with_records([fixtures::ada()]);
    let (status, body) = send(app(&store), post("/checkin", &json!({ "ticketId": "unknown" }))).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "TICKET_NOT_FOUND");
}

#[tokio::test]
async fn permission_denied_is_403() {
    let store = InMemoryRegistrantStore::with_records([fixtures::ada()]);
    store.fail_writes_with(StoreError::PermissionDenied(
        "permission denied for table event_users".to_string(),
    ));
    let (status, body) = send(app(&store), post("/checkin", &json!({ "ticketId": "T-001" }))).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "PERMISSION_DENIED");
    assert!(
        body["message"]
            .as_str()
            .unwrap()
            .contains("permission denied for table event_users")
    );
}

#[tokio::test]
async fn duplicate_ticket_is_409() {
    let store = InMemoryRegistrantStore::with_records([
        fixtures::registrant("u1", "T-001"),
        fixtures::registrant("u2", "T-001"),
    ]);
    let (status, body) = send(app(&store), post("/badge", &json!({ "ticketId": "T-001" }))).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "AMBIGUOUS_TICKET");
}

#[tokio::test]
async fn missing_user_id_is_500() {
    let store = InMemoryRegistrantStore::with_records([fixtures::without_user_id("T-009")]);
    let (status, body) = send(app(&store), post("/checkin", &json!({ "ticketId": "T-009" }))).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "MISSING_USER_ID");
}

#[tokio::test]
async fn slow_store_is_503() {
    let store = InMemoryRegistrantStore::with_records([fixtures::ada()]);
    store.set_latency(Duration::from_secs(30));
    let shared: Arc<dyn badge_desk_core::RegistrantStore> = Arc::new(store.clone());
    let desk = CheckinDesk::new(Arc::clone(&shared), Arc::new(test_clock()))
        .with_store_timeout(Duration::from_millis(50));
    let app = build_router(AppState::new(desk, shared, "event_users", "ticket_id_index"));

    let (status, body) = send(app, post("/checkin", &json!({ "ticketId": "T-001" }))).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "STORE_TIMEOUT");
    assert!(!store.get(&UserId::new("u1")).unwrap().checked_in);
}

#[tokio::test]
async fn sample_pdf_has_placeholder_fields() {
    let store = InMemoryRegistrantStore::new();
    let (status, body) = send(app(&store), post("/pdf", &json!({ "id": "printer-test" }))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["contentType"], "application/pdf");
    let text = page_text(&decode_pdf(&body));
    assert!(contains(&text, "DUMMY NAME"));
    assert!(contains(&text, "Ticket: printer-test"));
}

#[tokio::test]
async fn responses_carry_correlation_id() {
    let store = InMemoryRegistrantStore::new();
    let response = app(&store).oneshot(get("/health")).await.unwrap();
    assert!(response.headers().contains_key(CORRELATION_ID_HEADER));
}

#[tokio::test]
async fn cors_preflight_is_allowed() {
    let store = InMemoryRegistrantStore::new();
    let request = Request::builder()
        .method("OPTIONS")
        .uri("/checkin")
        .header(header::ORIGIN, "https://desk.example.org")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();
    let response = app(&store).oneshot(request).await.unwrap();

    assert!(response.status().is_success());
    assert!(
        response
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN)
    );
}
