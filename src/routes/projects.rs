//! # 프로젝트 라우트 핸들러
//!
//! ## 엔드포인트
//! - `GET    /api/v1/projects`                      → 전체 프로젝트 목록 (필터 + 페이지)
//! - `GET    /api/v1/projects/summary`              → 필터된 목록의 월별 공수 집계
//! - `POST   /api/v1/projects`                      → 등록 (관리자)
//! - `GET    /api/v1/projects/{id}`                 → 상세
//! - `PATCH  /api/v1/projects/{id}`                 → 부분 수정 (관리자)
//! - `DELETE /api/v1/projects/{id}`                 → 삭제, 댓글 포함 (관리자)
//! - `POST   /api/v1/projects/{id}/duplicate`       → 복제 (관리자)
//! - `GET    /api/v1/users/{owner_id}/projects`     → 한 사용자의 프로젝트 목록
//! - `GET    /api/v1/users/{owner_id}/projects/{id}`→ 소유자 경로로 상세 조회
//!
//! 권한 검사는 `db::projects`의 변경 함수가 직접 수행하므로
//! 핸들러는 요청자(`AuthUser`)를 그대로 넘기기만 합니다.

use crate::{
    db::projects as db_projects,
    error::AppError,
    middleware::auth::AuthUser,
    models::*,
    services::{
        comment_hub::CommentHub,
        effort::{summarize, EffortSummary},
        filter::ProjectQuery,
        lifecycle,
        pagination::{paginate, PAGE_SIZE},
        single_flight::{project_update_key, InFlight},
    },
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};
use sqlx::SqlitePool;

/// 애플리케이션 공유 상태
///
/// 모든 요청 핸들러가 `State(state): State<AppState>`로 접근합니다.
/// 내부 값은 모두 `Arc` 기반이라 clone해도 같은 풀/허브를 가리킵니다.
#[derive(Clone)]
pub struct AppState {
    /// SQLite 연결 풀
    pub pool: SqlitePool,
    /// JWT 토큰 서명용 비밀키
    pub jwt_secret: String,
    /// 실시간 댓글 이벤트 허브
    pub comments: CommentHub,
    /// 처리 중인 댓글 작성/프로젝트 저장 요청
    pub in_flight: InFlight,
}

impl AppState {
    pub fn new(pool: SqlitePool, jwt_secret: impl Into<String>) -> Self {
        Self {
            pool,
            jwt_secret: jwt_secret.into(),
            comments: CommentHub::default(),
            in_flight: InFlight::new(),
        }
    }
}

/// 필터 → 정렬 → 페이지 나누기. 응답: `{ projects, page, total_pages, total }`
fn filtered_page(projects: Vec<Project>, query: &ProjectQuery) -> Result<Value, AppError> {
    let filter = query.to_filter()?;
    let today = Utc::now().date_naive();
    let page = paginate(filter.apply(projects, today), query.page()?, PAGE_SIZE);

    Ok(json!({
        "projects": page.items,
        "page": page.page,
        "total_pages": page.total_pages,
        "total": page.total,
    }))
}

pub async fn list_projects(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<ProjectQuery>,
) -> Result<Json<Value>, AppError> {
    let projects = db_projects::list_projects(&state.pool).await?;
    Ok(Json(filtered_page(projects, &query)?))
}

/// `GET /projects/summary` — 목록과 같은 필터를 적용한 뒤 공수를 월별로 집계합니다.
pub async fn project_summary(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<ProjectQuery>,
) -> Result<Json<EffortSummary>, AppError> {
    let filter = query.to_filter()?;
    let projects = db_projects::list_projects(&state.pool).await?;
    let filtered = filter.apply(projects, Utc::now().date_naive());
    Ok(Json(summarize(&filtered)))
}

pub async fn create_project(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateProjectRequest>,
) -> Result<(StatusCode, Json<Project>), AppError> {
    let draft = lifecycle::draft_from_create(&req)?;
    let project = db_projects::create_project(&state.pool, &auth.actor, &draft).await?;
    Ok((StatusCode::CREATED, Json(project)))
}

pub async fn get_project(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Project>, AppError> {
    let project = db_projects::get_project(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(project))
}

/// `PATCH /projects/{id}` — 같은 사용자가 같은 프로젝트를 저장 중이면 409.
pub async fn update_project(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateProjectRequest>,
) -> Result<Json<Project>, AppError> {
    let _guard = state
        .in_flight
        .try_acquire(project_update_key(&auth.actor.user_id, &id))
        .ok_or_else(|| AppError::Conflict("이미 처리 중인 요청입니다".to_string()))?;

    let project = db_projects::update_project(&state.pool, &auth.actor, &id, &req).await?;
    Ok(Json(project))
}

pub async fn delete_project(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let deleted = db_projects::delete_project(&state.pool, &auth.actor, &id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound)
    }
}

pub async fn duplicate_project(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<Project>), AppError> {
    let project = db_projects::duplicate_project(&state.pool, &auth.actor, &id).await?;
    Ok((StatusCode::CREATED, Json(project)))
}

pub async fn list_owner_projects(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(owner_id): Path<String>,
    Query(query): Query<ProjectQuery>,
) -> Result<Json<Value>, AppError> {
    let projects = db_projects::list_projects_by_owner(&state.pool, &owner_id).await?;
    Ok(Json(filtered_page(projects, &query)?))
}

pub async fn get_owner_project(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path((owner_id, id)): Path<(String, String)>,
) -> Result<Json<Project>, AppError> {
    let project = db_projects::get_owned_project(&state.pool, &owner_id, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(project))
}
