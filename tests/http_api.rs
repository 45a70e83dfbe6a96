//! Form API Tests
//!
//! Drives the full router (health + /api) in-process against the shipped
//! data directory.

use std::path::Path;
use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use formwizard::http_server::{HttpServer, HttpServerConfig};
use formwizard::schema::ValidationPolicy;
use formwizard::service::FormService;
use serde_json::{json, Value};
use tower::ServiceExt;

// =============================================================================
// Helper Functions
// =============================================================================

fn app() -> Router {
    let data_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("data");
    let service = FormService::load(&data_dir, ValidationPolicy::default()).unwrap();
    HttpServer::new(HttpServerConfig::default(), Arc::new(service)).router()
}

async fn send(request: Request<Body>) -> (StatusCode, Value) {
    let response = app().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

async fn get(uri: &str) -> (StatusCode, Value) {
    send(Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

async fn post_json(uri: &str, body: &str) -> (StatusCode, Value) {
    send(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

fn complete_submission() -> Value {
    json!({
        "name": "Alice Liddell",
        "email": "alice@example.com",
        "age": 30,
        "city": "2",
        "school": "201",
        "terms": true
    })
}

// =============================================================================
// Reference Data Endpoints
// =============================================================================

#[tokio::test]
async fn test_cities_lists_all_cities() {
    let (status, body) = get("/api/cities").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            { "id": "1", "name": "Springfield" },
            { "id": "2", "name": "Shelbyville" }
        ])
    );
}

#[tokio::test]
async fn test_schools_filtered_by_city() {
    let (status, body) = get("/api/schools?cityId=2").await;

    assert_eq!(status, StatusCode::OK);
    let schools = body.as_array().unwrap();
    assert_eq!(schools.len(), 2);
    for school in schools {
        assert_eq!(school["cityId"], "2");
    }
}

#[tokio::test]
async fn test_schools_without_city_id_rejected() {
    let (status, body) = get("/api/schools").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "cityId is required" }));
}

#[tokio::test]
async fn test_schools_with_empty_city_id_rejected() {
    let (status, body) = get("/api/schools?cityId=").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "cityId is required" }));
}

#[tokio::test]
async fn test_schools_for_unknown_city_is_empty() {
    let (status, body) = get("/api/schools?cityId=99").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

// =============================================================================
// Form Endpoint
// =============================================================================

#[tokio::test]
async fn test_form_returns_schema_in_step_order() {
    let (status, body) = get("/api/form").await;

    assert_eq!(status, StatusCode::OK);
    let titles: Vec<_> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|step| step["title"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(titles, ["Personal Information", "Education", "Confirmation"]);

    let school = &body[1]["fields"][1];
    assert_eq!(school["type"], "select");
    assert_eq!(school["customInputOption"], "My school is not listed");
}

// =============================================================================
// Submit Endpoint
// =============================================================================

#[tokio::test]
async fn test_submit_valid_form() {
    let (status, body) = post_json("/api/submit", &complete_submission().to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "success": true, "message": "Form validated successfully." })
    );
}

#[tokio::test]
async fn test_submit_invalid_form_reports_errors() {
    let mut submission = complete_submission();
    submission["email"] = json!("not-an-email");
    submission.as_object_mut().unwrap().remove("city");

    let (status, body) = post_json("/api/submit", &submission.to_string()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(
        body["errors"],
        json!({
            "city": "City is required.",
            "email": "Email is not a valid email address."
        })
    );
    assert!(body.get("message").is_none());
}

#[tokio::test]
async fn test_submit_ignores_unexpected_fields_by_default() {
    let mut submission = complete_submission();
    submission["favouriteColour"] = json!("green");

    let (status, body) = post_json("/api/submit", &submission.to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn test_submit_non_object_body_rejected() {
    let (status, body) = post_json("/api/submit", "[1, 2, 3]").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({ "error": "Invalid request body: expected a JSON object" })
    );
}

#[tokio::test]
async fn test_submit_unparsable_body_rejected() {
    let (status, body) = post_json("/api/submit", "{ not json").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Invalid request body"));
}

// =============================================================================
// Health Endpoint
// =============================================================================

#[tokio::test]
async fn test_health() {
    let (status, body) = get("/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
