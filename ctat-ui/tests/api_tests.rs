//! Integration tests for ctat-ui API endpoints
//!
//! Tests cover:
//! - Health and page configuration endpoints
//! - Workbook upload (extension check, parse failures, session replacement)
//! - Navigation boundaries and the rendered conversation view
//! - Saving annotations (overwrite, empty selection, unknown id)
//! - Export download (headers, workbook contents, empty store)

use std::io::Cursor;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use calamine::{open_workbook_from_rs, Data, Reader, Xlsx};
use ctat_common::config::ServiceConfig;
use ctat_ui::{build_router, AppState};
use rust_xlsxwriter::Workbook;
use serde_json::{json, Value};
use tower::util::ServiceExt; // for `oneshot` method

/// Test helper: app with default config and no session
fn setup_app() -> Router {
    build_router(AppState::new(&ServiceConfig::default()))
}

/// Test helper: workbook from the reference scenario
///
/// Id 1 has two rows (feedback on the second), Id 2 has one.
fn scenario_workbook() -> Vec<u8> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    let header = ["Id", "llmGeneratedUserMessage", "botMessage", "Customer Feedback"];
    for (c, name) in header.iter().enumerate() {
        sheet.write_string(0, c as u16, *name).unwrap();
    }

    sheet.write_number(1, 0, 1.0).unwrap();
    sheet.write_string(1, 2, "hi").unwrap();

    sheet.write_number(2, 0, 1.0).unwrap();
    sheet.write_string(2, 1, "hello").unwrap();
    sheet.write_string(2, 3, "Positive").unwrap();

    sheet.write_number(3, 0, 2.0).unwrap();
    sheet.write_string(3, 2, "hey").unwrap();
    sheet.write_string(3, 3, "negative").unwrap();

    workbook.save_to_buffer().unwrap()
}

fn request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn upload_request(file_name: &str, bytes: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(format!("/api/workbook?filename={}", file_name))
        .body(Body::from(bytes))
        .unwrap()
}

async fn body_bytes(body: Body) -> Vec<u8> {
    axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body")
        .to_vec()
}

async fn extract_json(body: Body) -> Value {
    serde_json::from_slice(&body_bytes(body).await).expect("Should parse JSON")
}

/// Test helper: upload the scenario workbook and assert success
async fn load_scenario(app: &Router) -> Value {
    let response = app
        .clone()
        .oneshot(upload_request("scenario.xlsx", scenario_workbook()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    extract_json(response.into_body()).await
}

// =============================================================================
// Health / Config
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let response = setup_app().oneshot(request("GET", "/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "ctat-ui");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_page_config_lists_buckets_in_order() {
    let response = setup_app().oneshot(request("GET", "/api/config")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    let buckets = body["buckets"].as_array().unwrap();
    assert_eq!(buckets.len(), 11);
    assert_eq!(buckets[0], "Bot Response");
    assert_eq!(buckets[10], "Overall Observations");
    assert_eq!(body["status_display_ms"], 3000);
    assert_eq!(body["accepted_extension"], ".xlsx");
}

#[tokio::test]
async fn test_index_page_served() {
    let response = setup_app().oneshot(request("GET", "/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let html = String::from_utf8(body_bytes(response.into_body()).await).unwrap();
    assert!(html.contains("/static/app.js"));
}

// =============================================================================
// Upload
// =============================================================================

#[tokio::test]
async fn test_upload_returns_first_conversation() {
    let app = setup_app();
    let body = load_scenario(&app).await;

    assert_eq!(body["loaded_conversations"], 2);

    let view = &body["view"];
    assert_eq!(view["id"], "1");
    assert_eq!(view["feedback"], "Positive");
    assert_eq!(view["negative_feedback"], false);
    assert_eq!(view["progress"]["label"], "1/2 Conversations");
    assert_eq!(view["progress"]["percent"], 50.0);
    assert_eq!(view["annotation"], json!({}));

    let messages = view["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["speaker"], "bot");
    assert_eq!(messages[0]["text"], "hi");
    assert_eq!(messages[1]["speaker"], "customer");
    assert_eq!(messages[1]["text"], "hello");
}

#[tokio::test]
async fn test_upload_rejects_wrong_extension() {
    let response = setup_app()
        .oneshot(upload_request("scenario.csv", scenario_workbook()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"]["code"], "INVALID_FILE_TYPE");
    assert_eq!(body["error"]["severity"], "error");
}

#[tokio::test]
async fn test_upload_requires_file_name() {
    let response = setup_app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/workbook")
                .body(Body::from(scenario_workbook()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_failed_upload_keeps_existing_session() {
    let app = setup_app();
    load_scenario(&app).await;

    let response = app
        .clone()
        .oneshot(upload_request("broken.xlsx", b"definitely not a zip".to_vec()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"]["code"], "FILE_READ");

    let response = app.oneshot(request("GET", "/api/conversation")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let view = extract_json(response.into_body()).await;
    assert_eq!(view["id"], "1");
}

#[tokio::test]
async fn test_new_upload_resets_session() {
    let app = setup_app();
    load_scenario(&app).await;

    app.clone()
        .oneshot(request("POST", "/api/navigate/next"))
        .await
        .unwrap();
    let response = app
        .clone()
        .oneshot(json_request("PUT", "/api/annotations/2", json!({"selections": ["HVA"]})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = load_scenario(&app).await;
    assert_eq!(body["view"]["id"], "1");

    // Store was discarded with the old session
    let response = app.oneshot(request("GET", "/api/export")).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

// =============================================================================
// Navigation
// =============================================================================

#[tokio::test]
async fn test_conversation_before_upload_is_warning() {
    let response = setup_app()
        .oneshot(request("GET", "/api/conversation"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"]["code"], "NO_CONVERSATIONS");
    assert_eq!(body["error"]["severity"], "warning");
}

#[tokio::test]
async fn test_navigation_boundaries() {
    let app = setup_app();
    load_scenario(&app).await;

    let response = app
        .clone()
        .oneshot(request("POST", "/api/navigate/previous"))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["outcome"], "at_start");
    assert_eq!(body["view"]["id"], "1");

    let response = app
        .clone()
        .oneshot(request("POST", "/api/navigate/next"))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["outcome"], "changed");
    assert_eq!(body["view"]["id"], "2");
    assert_eq!(body["view"]["negative_feedback"], true);
    assert_eq!(body["view"]["feedback"], "negative");
    assert_eq!(body["view"]["progress"]["label"], "2/2 Conversations");

    let response = app
        .oneshot(request("POST", "/api/navigate/next"))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["outcome"], "at_end");
    assert_eq!(body["view"]["id"], "2");
}

// =============================================================================
// Saving
// =============================================================================

#[tokio::test]
async fn test_save_overwrites_and_reloads_on_navigation() {
    let app = setup_app();
    load_scenario(&app).await;

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/annotations/1",
            json!({
                "selections": ["HVA", "Other Queries"],
                "comments": {"HVA": "  greeting  ", "Other Queries": "misc"}
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["annotation"], json!({"HVA": "greeting", "Other Queries": "misc"}));

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/annotations/1",
            json!({"selections": ["HVA"], "comments": {"HVA": "greeting", "Bot Response": "dropped"}}),
        ))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["annotation"], json!({"HVA": "greeting"}));
    assert_eq!(body["annotated_conversations"], 1);

    // Away and back: the saved annotation is part of the view again
    app.clone()
        .oneshot(request("POST", "/api/navigate/next"))
        .await
        .unwrap();
    let response = app
        .oneshot(request("POST", "/api/navigate/previous"))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["view"]["annotation"], json!({"HVA": "greeting"}));
}

#[tokio::test]
async fn test_save_without_buckets_is_warning_and_keeps_annotation() {
    let app = setup_app();
    load_scenario(&app).await;

    app.clone()
        .oneshot(json_request(
            "PUT",
            "/api/annotations/1",
            json!({"selections": ["Customer Behavior"]}),
        ))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(json_request("PUT", "/api/annotations/1", json!({"selections": []})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"]["code"], "NO_BUCKET_SELECTED");
    assert_eq!(body["error"]["severity"], "warning");

    let response = app.oneshot(request("GET", "/api/conversation")).await.unwrap();
    let view = extract_json(response.into_body()).await;
    assert_eq!(view["annotation"], json!({"Customer Behavior": ""}));
}

#[tokio::test]
async fn test_save_unknown_conversation_is_rejected() {
    let app = setup_app();
    load_scenario(&app).await;

    let response = app
        .oneshot(json_request("PUT", "/api/annotations/99", json!({"selections": ["HVA"]})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"]["code"], "UNKNOWN_CONVERSATION");
}

// =============================================================================
// Export
// =============================================================================

#[tokio::test]
async fn test_export_without_annotations_is_warning() {
    let app = setup_app();
    load_scenario(&app).await;

    let response = app.oneshot(request("GET", "/api/export")).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"]["code"], "NOTHING_TO_EXPORT");
    assert_eq!(body["error"]["severity"], "warning");
}

#[tokio::test]
async fn test_export_download() {
    let app = setup_app();
    load_scenario(&app).await;

    app.clone()
        .oneshot(json_request(
            "PUT",
            "/api/annotations/1",
            json!({"selections": ["HVA"], "comments": {"HVA": "greeting"}}),
        ))
        .await
        .unwrap();

    let response = app.oneshot(request("GET", "/api/export")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let headers = response.headers();
    assert_eq!(headers["x-annotated-conversations"], "1");
    let disposition = headers[header::CONTENT_DISPOSITION].to_str().unwrap();
    assert!(disposition.starts_with("attachment; filename=\"annotated_conversations_"));
    assert!(disposition.ends_with(".xlsx\""));
    assert!(!disposition.contains(':'));

    let bytes = body_bytes(response.into_body()).await;
    let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes)).unwrap();
    let range = workbook.worksheet_range("Annotations").unwrap();
    let rows: Vec<&[Data]> = range.rows().collect();

    // Header plus the two rows of conversation 1
    assert_eq!(rows.len(), 3);
    let hva = 4 + 1;
    assert_eq!(rows[0][hva].to_string(), "HVA");
    assert_eq!(rows[1][hva].to_string(), "greeting");
    assert_eq!(rows[1][3].to_string(), "");
    assert_eq!(rows[2][hva].to_string(), "");
    assert_eq!(rows[2][3].to_string(), "Positive");
}

#[tokio::test]
async fn test_repeated_exports_follow_later_saves() {
    let app = setup_app();
    load_scenario(&app).await;

    app.clone()
        .oneshot(json_request("PUT", "/api/annotations/1", json!({"selections": ["HVA"]})))
        .await
        .unwrap();
    let response = app.clone().oneshot(request("GET", "/api/export")).await.unwrap();
    assert_eq!(response.headers()["x-annotated-conversations"], "1");

    // The session stays writable after an export
    let response = app
        .clone()
        .oneshot(json_request("PUT", "/api/annotations/2", json!({"selections": ["Other Queries"]})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(request("GET", "/api/export")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-annotated-conversations"], "2");

    let bytes = body_bytes(response.into_body()).await;
    let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes)).unwrap();
    let range = workbook.worksheet_range("Annotations").unwrap();
    let ids: Vec<Data> = range.rows().skip(1).map(|row| row[0].clone()).collect();
    assert_eq!(ids, vec![Data::Float(1.0), Data::Float(1.0), Data::Float(2.0)]);
}
