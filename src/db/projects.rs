//! # 프로젝트 데이터베이스 쿼리 모듈
//!
//! `projects` 테이블의 조회/등록/수정/삭제/복제 쿼리입니다.
//!
//! 변경 함수(`create_project`, `update_project`, `delete_project`, `duplicate_project`)는
//! 요청자(`Actor`)를 받아 DB에 쓰기 전에 관리자 권한부터 확인합니다.
//! 라우트를 거치지 않고 호출해도 권한 검사를 건너뛸 수 없습니다.

use crate::error::AppError;
use crate::models::*;
use crate::services::{access, lifecycle};
use sqlx::{Sqlite, SqlitePool};

const SELECT_COLUMNS: &str = r#"
    SELECT id, owner_id, title, status, description,
           request_date, start_date, end_date, completion_date,
           planning_name, planning_effort, design_name, design_effort,
           publishing_name, publishing_effort, development_name, development_effort,
           total_effort, classification, channel, service, category, deployment_type,
           progress, plan_link, design_link, created_at, updated_at
    FROM projects
"#;

/// 전체 프로젝트 (모든 소유자). 정렬과 필터는 `services::filter`에서 합니다.
pub async fn list_projects(pool: &SqlitePool) -> Result<Vec<Project>, AppError> {
    let rows = sqlx::query_as::<_, ProjectRow>(&format!("{SELECT_COLUMNS} ORDER BY created_at DESC"))
        .fetch_all(pool)
        .await?;

    Ok(rows.into_iter().map(Project::from).collect())
}

/// 한 사용자가 소유한 프로젝트 (마이페이지)
pub async fn list_projects_by_owner(
    pool: &SqlitePool,
    owner_id: &str,
) -> Result<Vec<Project>, AppError> {
    let rows = sqlx::query_as::<_, ProjectRow>(&format!(
        "{SELECT_COLUMNS} WHERE owner_id = ? ORDER BY created_at DESC"
    ))
    .bind(owner_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(Project::from).collect())
}

pub async fn get_project(pool: &SqlitePool, id: &str) -> Result<Option<Project>, AppError> {
    let row = sqlx::query_as::<_, ProjectRow>(&format!("{SELECT_COLUMNS} WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(Project::from))
}

/// 소유자 경로(`/users/{owner}/projects/{id}`)로 조회합니다. 소유자가 다르면 `None`.
pub async fn get_owned_project(
    pool: &SqlitePool,
    owner_id: &str,
    id: &str,
) -> Result<Option<Project>, AppError> {
    let row = sqlx::query_as::<_, ProjectRow>(&format!(
        "{SELECT_COLUMNS} WHERE owner_id = ? AND id = ?"
    ))
    .bind(owner_id)
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(Project::from))
}

async fn insert_draft<'e, E>(executor: E, id: &str, owner_id: &str, draft: &ProjectDraft) -> Result<(), AppError>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        r#"
        INSERT INTO projects (
            id, owner_id, title, status, description,
            request_date, start_date, end_date, completion_date,
            planning_name, planning_effort, design_name, design_effort,
            publishing_name, publishing_effort, development_name, development_effort,
            total_effort, classification, channel, service, category, deployment_type,
            progress, plan_link, design_link
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(id)
    .bind(owner_id)
    .bind(&draft.title)
    .bind(draft.status)
    .bind(&draft.description)
    .bind(draft.request_date)
    .bind(draft.start_date)
    .bind(draft.end_date)
    .bind(draft.completion_date)
    .bind(&draft.phases.planning.name)
    .bind(draft.phases.planning.effort)
    .bind(&draft.phases.design.name)
    .bind(draft.phases.design.effort)
    .bind(&draft.phases.publishing.name)
    .bind(draft.phases.publishing.effort)
    .bind(&draft.phases.development.name)
    .bind(draft.phases.development.effort)
    .bind(draft.total_effort)
    .bind(draft.classification)
    .bind(draft.channel)
    .bind(draft.service)
    .bind(draft.category)
    .bind(draft.deployment_type)
    .bind(draft.progress)
    .bind(&draft.link.plan_link)
    .bind(&draft.link.design_link)
    .execute(executor)
    .await?;

    Ok(())
}

/// 프로젝트를 등록합니다. 소유자는 요청한 관리자입니다.
pub async fn create_project(
    pool: &SqlitePool,
    actor: &Actor,
    draft: &ProjectDraft,
) -> Result<Project, AppError> {
    access::require_admin(actor)?;

    let id = uuid::Uuid::now_v7().to_string();
    insert_draft(pool, &id, &actor.user_id, draft).await?;
    tracing::info!("Project created: id={}, owner={}", id, actor.user_id);

    get_project(pool, &id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created project".to_string()))
}

/// 부분 수정 요청을 현재 값에 합쳐 한 번의 UPDATE로 기록합니다.
///
/// 총 공수는 합쳐진 단계 값으로 다시 계산되므로 저장된 값과 어긋나지 않습니다.
/// 동시에 들어온 수정은 차례로 적용되어 마지막 요청이 남습니다.
pub async fn update_project(
    pool: &SqlitePool,
    actor: &Actor,
    id: &str,
    patch: &UpdateProjectRequest,
) -> Result<Project, AppError> {
    access::require_admin(actor)?;

    let mut tx = pool.begin().await?;

    // 읽기보다 먼저 쓰기 잠금을 잡아야 다른 수정과 겹쳐도 SQLITE_BUSY 대신 대기합니다.
    let locked = sqlx::query("UPDATE projects SET updated_at = updated_at WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    if locked.rows_affected() == 0 {
        tx.rollback().await?;
        return Err(AppError::NotFound);
    }

    let current = sqlx::query_as::<_, ProjectRow>(&format!("{SELECT_COLUMNS} WHERE id = ?"))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .map(Project::from)
        .ok_or(AppError::NotFound)?;

    let mut draft = ProjectDraft::from(&current);
    lifecycle::apply_patch(&mut draft, patch)?;

    sqlx::query(
        r#"
        UPDATE projects SET
            title = ?, status = ?, description = ?,
            request_date = ?, start_date = ?, end_date = ?, completion_date = ?,
            planning_name = ?, planning_effort = ?, design_name = ?, design_effort = ?,
            publishing_name = ?, publishing_effort = ?, development_name = ?, development_effort = ?,
            total_effort = ?, classification = ?, channel = ?, service = ?, category = ?,
            deployment_type = ?, progress = ?, plan_link = ?, design_link = ?,
            updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ?
        "#,
    )
    .bind(&draft.title)
    .bind(draft.status)
    .bind(&draft.description)
    .bind(draft.request_date)
    .bind(draft.start_date)
    .bind(draft.end_date)
    .bind(draft.completion_date)
    .bind(&draft.phases.planning.name)
    .bind(draft.phases.planning.effort)
    .bind(&draft.phases.design.name)
    .bind(draft.phases.design.effort)
    .bind(&draft.phases.publishing.name)
    .bind(draft.phases.publishing.effort)
    .bind(&draft.phases.development.name)
    .bind(draft.phases.development.effort)
    .bind(draft.total_effort)
    .bind(draft.classification)
    .bind(draft.channel)
    .bind(draft.service)
    .bind(draft.category)
    .bind(draft.deployment_type)
    .bind(draft.progress)
    .bind(&draft.link.plan_link)
    .bind(&draft.link.design_link)
    .bind(id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    tracing::info!("Project updated: id={}", id);

    get_project(pool, id).await?.ok_or(AppError::NotFound)
}

/// 프로젝트와 그 댓글을 한 트랜잭션에서 삭제합니다. 없는 ID면 `false`.
pub async fn delete_project(pool: &SqlitePool, actor: &Actor, id: &str) -> Result<bool, AppError> {
    access::require_admin(actor)?;

    let mut tx = pool.begin().await?;

    let comments = sqlx::query("DELETE FROM comments WHERE project_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    let result = sqlx::query("DELETE FROM projects WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    if result.rows_affected() == 0 {
        tx.rollback().await?;
        return Ok(false);
    }

    tx.commit().await?;
    tracing::info!(
        "Project deleted: id={}, comments_removed={}",
        id,
        comments.rows_affected()
    );

    Ok(true)
}

/// 프로젝트를 복제합니다. 새 ID, 제목에 `(복사본)`, 상태는 대기이며
/// 복제본은 복제한 관리자의 프로젝트로 저장됩니다.
pub async fn duplicate_project(pool: &SqlitePool, actor: &Actor, id: &str) -> Result<Project, AppError> {
    access::require_admin(actor)?;

    let source = get_project(pool, id).await?.ok_or(AppError::NotFound)?;
    let draft = lifecycle::duplicate(&source);

    let new_id = uuid::Uuid::now_v7().to_string();
    insert_draft(pool, &new_id, &actor.user_id, &draft).await?;
    tracing::info!("Project duplicated: source={}, copy={}", id, new_id);

    get_project(pool, &new_id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve duplicated project".to_string()))
}
