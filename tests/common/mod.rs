//! Shared helpers for HTTP-level integration tests.
//!
//! Every test gets a migrated throwaway SQLite database from `#[sqlx::test]`
//! and drives the real router with `tower::ServiceExt::oneshot`.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tower::ServiceExt;

use gongsu::db::users as db_users;
use gongsu::models::Role;
use gongsu::services::password::hash_password;
use gongsu::{build_router, AppState};

pub const JWT_SECRET: &str = "integration-test-secret";
pub const PASSWORD: &str = "password-123";

pub fn build_test_app(pool: SqlitePool) -> Router {
    build_router(AppState::new(pool, JWT_SECRET))
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str, token: &str) -> Response {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: &Router, uri: &str, token: Option<&str>, body: Value) -> Response {
    send(app, Method::POST, uri, token, Some(body)).await
}

pub async fn patch_json(app: &Router, uri: &str, token: &str, body: Value) -> Response {
    send(app, Method::PATCH, uri, Some(token), Some(body)).await
}

pub async fn delete(app: &Router, uri: &str, token: &str) -> Response {
    send(app, Method::DELETE, uri, Some(token), None).await
}

pub async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Assert the status and return the JSON body.
pub async fn expect_json(response: Response, status: StatusCode) -> Value {
    assert_eq!(response.status(), status);
    body_json(response).await
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// Insert a user with the given role and return its id.
///
/// Roles are promoted with a raw UPDATE because the API has no role endpoint.
pub async fn create_user(pool: &SqlitePool, email: &str, role: Role) -> String {
    let hash = hash_password(PASSWORD).unwrap();
    let id = uuid::Uuid::now_v7().to_string();
    db_users::create_user(pool, &id, email, &hash).await.unwrap();

    sqlx::query("UPDATE users SET role = ? WHERE id = ?")
        .bind(role)
        .bind(&id)
        .execute(pool)
        .await
        .unwrap();

    id
}

pub async fn login(app: &Router, email: &str) -> String {
    let response = post_json(
        app,
        "/api/v1/auth/login",
        None,
        json!({ "email": email, "password": PASSWORD }),
    )
    .await;
    let json = expect_json(response, StatusCode::OK).await;
    json["access_token"].as_str().unwrap().to_string()
}

/// Create an approved user and return `(user_id, access_token)`.
pub async fn sign_in_as(app: &Router, pool: &SqlitePool, email: &str, role: Role) -> (String, String) {
    let id = create_user(pool, email, role).await;
    let token = login(app, email).await;
    (id, token)
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

pub fn project_body(title: &str, status: &str, start_date: &str) -> Value {
    json!({
        "title": title,
        "status": status,
        "start_date": start_date,
        "completion_date": start_date,
        "planning": { "name": "김기획", "effort": 2 },
        "design": { "name": "이디자", "effort": "1.5" },
        "publishing": { "name": "박퍼블", "effort": 0 },
        "development": { "name": "최개발", "effort": 4 }
    })
}

pub async fn create_project(app: &Router, token: &str, body: Value) -> Value {
    let response = post_json(app, "/api/v1/projects", Some(token), body).await;
    expect_json(response, StatusCode::CREATED).await
}

pub async fn count_rows(pool: &SqlitePool, table: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .unwrap()
}
