//! # 라우트 핸들러 모듈
//!
//! HTTP 요청을 처리하는 핸들러 함수들과 API 라우터를 모아둔 모듈입니다.
//!
//! 각 하위 모듈:
//! - `auth`: 인증 관련 (가입, 로그인, 토큰 갱신, 로그아웃, 비밀번호 변경)
//! - `comments`: 댓글 목록/작성/삭제, 실시간 댓글 스트림
//! - `health`: 서버 상태 확인 (헬스체크)
//! - `projects`: 프로젝트 목록/집계/등록/수정/삭제/복제

pub mod auth;
pub mod comments;
pub mod health;
pub mod projects;

// AppState는 projects 모듈에 정의되어 있습니다.
pub use projects::AppState;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

/// `/api/v1` 아래에 붙는 모든 API 라우트
///
/// 경로 파라미터는 axum 0.8 문법(`{id}`)을 씁니다.
pub fn api_routes() -> Router<AppState> {
    let auth_routes = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
        .route("/auth/password", put(auth::change_password));

    let project_routes = Router::new()
        .route("/projects", get(projects::list_projects).post(projects::create_project))
        .route("/projects/summary", get(projects::project_summary))
        .route(
            "/projects/{id}",
            get(projects::get_project)
                .patch(projects::update_project)
                .delete(projects::delete_project),
        )
        .route("/projects/{id}/duplicate", post(projects::duplicate_project))
        .route("/users/{owner_id}/projects", get(projects::list_owner_projects))
        .route("/users/{owner_id}/projects/{id}", get(projects::get_owner_project));

    let comment_routes = Router::new()
        .route(
            "/projects/{id}/comments",
            get(comments::list_comments).post(comments::add_comment),
        )
        .route("/projects/{id}/comments/stream", get(comments::stream_comments))
        .route(
            "/projects/{id}/comments/{comment_id}",
            delete(comments::delete_comment),
        );

    Router::new()
        .merge(auth_routes)
        .merge(project_routes)
        .merge(comment_routes)
        .route("/health", get(health::health_check))
}
