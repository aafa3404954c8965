//! Endpoint tests driving the router in-process.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use deck_config::DeckConfig;
use deck_server::{AppState, Db, SESSION_HEADER, router};

fn app() -> Router {
    app_with(DeckConfig::default())
}

fn app_with(config: DeckConfig) -> Router {
    let state = AppState {
        db: Db::open_in_memory().expect("in-memory db"),
        config: Arc::new(config),
    };
    router(state)
}

fn request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(SESSION_HEADER, token);
    }
    match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, HeaderMap, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, headers, value)
}

async fn login(app: &Router) -> String {
    let (status, _, body) = send(
        app,
        request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({"email": "dev@example.com", "name": "Dev"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["data"]["sessionToken"].as_str().unwrap().to_string()
}

async fn create_task(app: &Router, token: &str, name: &str) -> Value {
    let (status, _, body) = send(
        app,
        request("POST", "/api/tasks", Some(token), Some(json!({"name": name}))),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"].clone()
}

#[tokio::test]
async fn health_is_public() {
    let app = app();
    let (status, _, _) = send(&app, request("GET", "/api/health", None, None)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn login_then_me_roundtrip() {
    let app = app();
    let token = login(&app).await;

    let (status, _, body) = send(&app, request("GET", "/api/users/me", Some(&token), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], "dev@example.com");
    assert_eq!(body["data"]["ssoType"], "dev");
    assert_eq!(body["metaData"]["responseCode"], 200);
}

#[tokio::test]
async fn me_without_token_is_a_problem() {
    let app = app();
    let (status, headers, body) =
        send(&app, request("GET", "/api/users/me", None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        headers.get(header::CONTENT_TYPE).unwrap(),
        "application/problem+json"
    );
    assert_eq!(body["title"], "Unauthorized");
    assert_eq!(body["status"], 401);
    assert_eq!(body["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn logout_revokes_the_session() {
    let app = app();
    let token = login(&app).await;

    let (status, _, _) = send(&app, request("POST", "/api/auth/logout", Some(&token), None)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _, _) = send(&app, request("GET", "/api/users/me", Some(&token), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_rejects_bad_email() {
    let app = app();
    let (status, _, body) = send(
        &app,
        request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({"email": "not-an-email", "name": "Dev"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["invalidParams"][0]["name"], "email");
}

#[tokio::test]
async fn create_returns_created_envelope() {
    let app = app();
    let token = login(&app).await;

    let (status, _, body) = send(
        &app,
        request(
            "POST",
            "/api/tasks",
            Some(&token),
            Some(json!({"name": "write docs", "priority": 3})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["name"], "write docs");
    assert_eq!(body["data"]["status"], "todo");
    assert_eq!(body["data"]["priority"], 3);
    assert_eq!(body["data"]["effort"], 1);
    assert_eq!(body["metaData"]["status"], "CREATED");
    assert_eq!(body["metaData"]["responseCode"], 201);
}

#[tokio::test]
async fn create_reports_every_invalid_field() {
    let app = app();
    let token = login(&app).await;

    let (status, _, body) = send(
        &app,
        request(
            "POST",
            "/api/tasks",
            Some(&token),
            Some(json!({"name": "", "priority": 9, "effort": 0})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let fields: Vec<&str> = body["invalidParams"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(fields, ["name", "priority", "effort"]);
}

#[tokio::test]
async fn update_is_partial_and_revalidated() {
    let app = app();
    let token = login(&app).await;
    let task = create_task(&app, &token, "stuck soon").await;
    let id = task["id"].as_str().unwrap();

    // Moving into blocked without a reason is rejected...
    let (status, _, body) = send(
        &app,
        request(
            "PUT",
            &format!("/api/tasks/{id}"),
            Some(&token),
            Some(json!({"status": "blocked"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["invalidParams"][0]["name"], "blockedReason");

    // ...and accepted with one; untouched fields survive.
    let (status, _, body) = send(
        &app,
        request(
            "PUT",
            &format!("/api/tasks/{id}"),
            Some(&token),
            Some(json!({"status": "blocked", "blockedReason": "waiting on review"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "blocked");
    assert_eq!(body["data"]["blockedReason"], "waiting on review");
    assert_eq!(body["data"]["name"], "stuck soon");
}

#[tokio::test]
async fn list_is_status_scoped_and_paginated() {
    let app = app();
    let token = login(&app).await;
    for i in 0..6 {
        create_task(&app, &token, &format!("todo {i}")).await;
    }
    let moved = create_task(&app, &token, "busy").await;
    let id = moved["id"].as_str().unwrap();
    let (status, _, _) = send(
        &app,
        request(
            "PUT",
            &format!("/api/tasks/{id}"),
            Some(&token),
            Some(json!({"status": "in_progress"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _, body) = send(
        &app,
        request("GET", "/api/tasks?status=todo&page=2&pageSize=5", Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    let pagination = &body["metaData"]["pagination"];
    assert_eq!(pagination["totalCount"], 6);
    assert_eq!(pagination["totalPages"], 2);
    assert_eq!(pagination["hasPrev"], true);
    assert_eq!(pagination["hasNext"], false);

    let (_, _, body) = send(
        &app,
        request("GET", "/api/tasks?status=in_progress", Some(&token), None),
    )
    .await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["name"], "busy");
}

#[tokio::test]
async fn unknown_status_value_is_a_validation_problem() {
    let app = app();
    let token = login(&app).await;
    let (status, _, body) = send(
        &app,
        request("GET", "/api/tasks?status=doing", Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["invalidParams"][0]["name"], "status");
}

#[tokio::test]
async fn delete_soft_deletes_and_hides_the_task() {
    let app = app();
    let token = login(&app).await;
    let task = create_task(&app, &token, "ephemeral").await;
    let id = task["id"].as_str().unwrap();

    let (status, _, _) = send(
        &app,
        request("DELETE", &format!("/api/tasks/{id}"), Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _, body) = send(
        &app,
        request("GET", &format!("/api/tasks/{id}"), Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");

    let (_, _, body) = send(
        &app,
        request("GET", "/api/tasks?status=todo", Some(&token), None),
    )
    .await;
    assert_eq!(body["metaData"]["pagination"]["totalCount"], 0);
}

#[tokio::test]
async fn weekly_limit_blocks_the_next_create() {
    let mut config = DeckConfig::default();
    config.rate_limit.weekly_task_limit = 2;
    let app = app_with(config);
    let token = login(&app).await;

    create_task(&app, &token, "one").await;
    create_task(&app, &token, "two").await;

    let (status, _, body) = send(
        &app,
        request("POST", "/api/tasks", Some(&token), Some(json!({"name": "three"}))),
    )
    .await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["code"], "RATE_LIMIT_EXCEEDED");
}

#[tokio::test]
async fn whitelisted_users_bypass_the_weekly_limit() {
    let mut config = DeckConfig::default();
    config.rate_limit.weekly_task_limit = 1;
    config.rate_limit.whitelist = vec!["dev@example.com".to_string()];
    let app = app_with(config);
    let token = login(&app).await;

    create_task(&app, &token, "one").await;
    create_task(&app, &token, "two").await;
}

#[tokio::test]
async fn deleting_does_not_refund_the_weekly_budget() {
    let mut config = DeckConfig::default();
    config.rate_limit.weekly_task_limit = 1;
    let app = app_with(config);
    let token = login(&app).await;

    let task = create_task(&app, &token, "only one").await;
    let id = task["id"].as_str().unwrap();
    let (status, _, _) = send(
        &app,
        request("DELETE", &format!("/api/tasks/{id}"), Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _, _) = send(
        &app,
        request("POST", "/api/tasks", Some(&token), Some(json!({"name": "again"}))),
    )
    .await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn correlation_headers_are_echoed() {
    let app = app();
    let req = Request::builder()
        .method("GET")
        .uri("/api/health")
        .header("x-request-id", "req-42")
        .header(
            "traceparent",
            "00-0af7651916cd43dd8448eb211c80319c-b7ad6b7169203331-01",
        )
        .body(Body::empty())
        .unwrap();
    let (status, headers, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers.get("x-request-id").unwrap(), "req-42");
    assert_eq!(
        headers.get("x-trace-id").unwrap(),
        "0af7651916cd43dd8448eb211c80319c"
    );
}

#[tokio::test]
async fn request_id_is_generated_when_absent() {
    let app = app();
    let (_, headers, _) = send(&app, request("GET", "/api/health", None, None)).await;
    let id = headers.get("x-request-id").unwrap().to_str().unwrap();
    assert!(uuid::Uuid::parse_str(id).is_ok());
}
