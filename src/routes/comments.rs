//! # 댓글 라우트 핸들러
//!
//! ## 엔드포인트
//! - `GET    /api/v1/projects/{id}/comments`              → 댓글 목록 (최신순)
//! - `POST   /api/v1/projects/{id}/comments`              → 댓글 작성
//! - `DELETE /api/v1/projects/{id}/comments/{comment_id}` → 댓글 삭제 (작성자 또는 관리자)
//! - `GET    /api/v1/projects/{id}/comments/stream`       → 실시간 댓글 (SSE)
//!
//! 작성/삭제가 성공하면 `CommentHub`로 이벤트를 보내 상세 화면을 보고 있는
//! 다른 사용자에게 바로 반영됩니다.

use std::time::Duration;

use crate::{
    db::{comments as db_comments, projects as db_projects},
    error::AppError,
    middleware::auth::AuthUser,
    models::*,
    routes::AppState,
    services::{
        comment_hub::CommentEvent,
        single_flight::comment_key,
    },
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use futures::{stream, Stream, StreamExt};
use serde_json::{json, Value};

pub async fn list_comments(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(project_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let comments = db_comments::list_comments(&state.pool, &project_id).await?;
    Ok(Json(json!({ "comments": comments })))
}

/// `POST /projects/{id}/comments` — 같은 사용자가 같은 프로젝트에 작성 중이면 409.
pub async fn add_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(project_id): Path<String>,
    Json(req): Json<CreateCommentRequest>,
) -> Result<(StatusCode, Json<Comment>), AppError> {
    let _guard = state
        .in_flight
        .try_acquire(comment_key(&auth.actor.user_id, &project_id))
        .ok_or_else(|| AppError::Conflict("이미 처리 중인 요청입니다".to_string()))?;

    let comment =
        db_comments::create_comment(&state.pool, &auth.actor, &project_id, &req.content).await?;
    tracing::info!(
        "Comment added: id={}, project={}, user={}",
        comment.id,
        project_id,
        auth.actor.user_id
    );

    state.comments.publish(CommentEvent::Added {
        comment: comment.clone(),
    });

    Ok((StatusCode::CREATED, Json(comment)))
}

pub async fn delete_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((project_id, comment_id)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    db_comments::delete_comment(&state.pool, &auth.actor, &project_id, &comment_id).await?;

    state.comments.publish(CommentEvent::Deleted {
        project_id,
        comment_id,
    });

    Ok(StatusCode::NO_CONTENT)
}

/// `GET /projects/{id}/comments/stream` — 실시간 댓글 구독
///
/// 첫 이벤트는 현재 댓글 목록 전체(`snapshot`)이고, 이후로는
/// `comment_added` / `comment_deleted` 이벤트가 이어집니다.
/// 목록을 읽기 전에 구독부터 해 두므로 그 사이에 달린 댓글도 놓치지 않습니다.
/// 클라이언트가 연결을 끊으면 스트림과 함께 구독도 해제됩니다.
pub async fn stream_comments(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(project_id): Path<String>,
) -> Result<Sse<impl Stream<Item = Result<Event, axum::Error>>>, AppError> {
    if db_projects::get_project(&state.pool, &project_id).await?.is_none() {
        return Err(AppError::NotFound);
    }

    let subscription = state.comments.subscribe(project_id.as_str());
    let snapshot = db_comments::list_comments(&state.pool, &project_id).await?;
    let initial = Event::default().event("snapshot").json_data(&snapshot);

    let updates = stream::unfold(subscription, |mut subscription| async move {
        let event = subscription.next().await?;
        let sse = Event::default().event(event.kind()).json_data(&event);
        Some((sse, subscription))
    });

    let stream = stream::once(async move { initial }).chain(updates);

    Ok(Sse::new(stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(15))))
}
