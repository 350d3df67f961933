//! HTTP-level integration tests for comments: listing, posting, deletion
//! policy, and the realtime stream.

mod common;

use std::time::Duration;

use axum::http::StatusCode;
use common::{
    count_rows, create_project, delete, expect_json, get, post_json, project_body, sign_in_as,
};
use futures::StreamExt;
use gongsu::models::Role;
use serde_json::json;
use sqlx::SqlitePool;

async fn project_uri(app: &axum::Router, admin: &str) -> String {
    let project = create_project(app, admin, project_body("A", "진행", "2024-03-01")).await;
    format!("/api/v1/projects/{}", project["id"].as_str().unwrap())
}

// ---------------------------------------------------------------------------
// Posting and listing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn comments_are_listed_newest_first(pool: SqlitePool) {
    let app = common::build_test_app(pool.clone());
    let (_, admin) = sign_in_as(&app, &pool, "admin@example.com", Role::Admin).await;
    let (user_id, user) = sign_in_as(&app, &pool, "user@example.com", Role::User).await;
    let uri = project_uri(&app, &admin).await;

    let first = post_json(&app, &format!("{uri}/comments"), Some(&user), json!({ "content": "첫 댓글" })).await;
    let first = expect_json(first, StatusCode::CREATED).await;
    assert_eq!(first["user_id"], user_id);
    assert_eq!(first["user_email"], "user@example.com");

    let second = post_json(&app, &format!("{uri}/comments"), Some(&admin), json!({ "content": "  두번째 " })).await;
    let second = expect_json(second, StatusCode::CREATED).await;
    assert_eq!(second["content"], "두번째");

    let list = expect_json(get(&app, &format!("{uri}/comments"), &user).await, StatusCode::OK).await;
    let comments = list["comments"].as_array().unwrap();
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0]["id"], second["id"]);
    assert_eq!(comments[1]["id"], first["id"]);
}

#[sqlx::test(migrations = "./migrations")]
async fn blank_comment_is_rejected(pool: SqlitePool) {
    let app = common::build_test_app(pool.clone());
    let (_, admin) = sign_in_as(&app, &pool, "admin@example.com", Role::Admin).await;
    let uri = project_uri(&app, &admin).await;

    let response = post_json(&app, &format!("{uri}/comments"), Some(&admin), json!({ "content": "   " })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(count_rows(&pool, "comments").await, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn comment_on_missing_project_is_not_found(pool: SqlitePool) {
    let app = common::build_test_app(pool.clone());
    let (_, user) = sign_in_as(&app, &pool, "user@example.com", Role::User).await;

    let response = post_json(&app, "/api/v1/projects/nope/comments", Some(&user), json!({ "content": "hi" })).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Deletion policy
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn only_author_or_admin_can_delete(pool: SqlitePool) {
    let app = common::build_test_app(pool.clone());
    let (_, admin) = sign_in_as(&app, &pool, "admin@example.com", Role::Admin).await;
    let (_, author) = sign_in_as(&app, &pool, "author@example.com", Role::User).await;
    let (_, other) = sign_in_as(&app, &pool, "other@example.com", Role::User).await;
    let uri = project_uri(&app, &admin).await;

    let mut ids = Vec::new();
    for content in ["하나", "둘"] {
        let response = post_json(&app, &format!("{uri}/comments"), Some(&author), json!({ "content": content })).await;
        let comment = expect_json(response, StatusCode::CREATED).await;
        ids.push(comment["id"].as_str().unwrap().to_string());
    }

    let denied = delete(&app, &format!("{uri}/comments/{}", ids[0]), &other).await;
    let json = expect_json(denied, StatusCode::FORBIDDEN).await;
    assert_eq!(json["error"]["message"], "삭제 권한이 없습니다");
    assert_eq!(count_rows(&pool, "comments").await, 2);

    let by_author = delete(&app, &format!("{uri}/comments/{}", ids[0]), &author).await;
    assert_eq!(by_author.status(), StatusCode::NO_CONTENT);

    let by_admin = delete(&app, &format!("{uri}/comments/{}", ids[1]), &admin).await;
    assert_eq!(by_admin.status(), StatusCode::NO_CONTENT);
    assert_eq!(count_rows(&pool, "comments").await, 0);

    let again = delete(&app, &format!("{uri}/comments/{}", ids[1]), &admin).await;
    assert_eq!(again.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Realtime stream
// ---------------------------------------------------------------------------

async fn next_frame<S>(stream: &mut S) -> String
where
    S: futures::Stream<Item = Result<axum::body::Bytes, axum::Error>> + Unpin,
{
    loop {
        let chunk = tokio::time::timeout(Duration::from_secs(5), stream.next())
            .await
            .expect("stream should produce a frame")
            .expect("stream should stay open")
            .unwrap();
        let text = String::from_utf8(chunk.to_vec()).unwrap();
        // skip keep-alive comments
        if !text.starts_with(':') {
            return text;
        }
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn stream_sends_snapshot_then_live_events(pool: SqlitePool) {
    let app = common::build_test_app(pool.clone());
    let (_, admin) = sign_in_as(&app, &pool, "admin@example.com", Role::Admin).await;
    let (_, user) = sign_in_as(&app, &pool, "user@example.com", Role::User).await;
    let uri = project_uri(&app, &admin).await;

    post_json(&app, &format!("{uri}/comments"), Some(&user), json!({ "content": "기존" })).await;

    let response = get(&app, &format!("{uri}/comments/stream"), &user).await;
    assert_eq!(response.status(), StatusCode::OK);
    let mut frames = response.into_body().into_data_stream();

    let snapshot = next_frame(&mut frames).await;
    assert!(snapshot.contains("event: snapshot"), "{snapshot}");
    assert!(snapshot.contains("기존"), "{snapshot}");

    let posted = post_json(&app, &format!("{uri}/comments"), Some(&admin), json!({ "content": "새 댓글" })).await;
    let posted = expect_json(posted, StatusCode::CREATED).await;

    let added = next_frame(&mut frames).await;
    assert!(added.contains("event: comment_added"), "{added}");
    assert!(added.contains("새 댓글"), "{added}");

    let comment_id = posted["id"].as_str().unwrap();
    delete(&app, &format!("{uri}/comments/{comment_id}"), &admin).await;

    let deleted = next_frame(&mut frames).await;
    assert!(deleted.contains("event: comment_deleted"), "{deleted}");
    assert!(deleted.contains(comment_id), "{deleted}");
}

#[sqlx::test(migrations = "./migrations")]
async fn stream_for_missing_project_is_not_found(pool: SqlitePool) {
    let app = common::build_test_app(pool.clone());
    let (_, user) = sign_in_as(&app, &pool, "user@example.com", Role::User).await;

    let response = get(&app, "/api/v1/projects/nope/comments/stream", &user).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
