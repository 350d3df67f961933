//! 댓글 쿼리. 작성은 승인된 사용자 누구나, 삭제는 작성자 본인 또는 관리자만 가능합니다.

use crate::error::AppError;
use crate::models::{Actor, Comment};
use crate::services::{access, lifecycle};
use sqlx::SqlitePool;

/// 최신 댓글이 먼저 오도록 정렬합니다.
pub async fn list_comments(pool: &SqlitePool, project_id: &str) -> Result<Vec<Comment>, AppError> {
    let comments = sqlx::query_as::<_, Comment>(
        r#"
        SELECT id, project_id, user_id, user_email, content, created_at
        FROM comments
        WHERE project_id = ?
        ORDER BY created_at DESC, id DESC
        "#,
    )
    .bind(project_id)
    .fetch_all(pool)
    .await?;

    Ok(comments)
}

pub async fn get_comment(
    pool: &SqlitePool,
    project_id: &str,
    comment_id: &str,
) -> Result<Option<Comment>, AppError> {
    let comment = sqlx::query_as::<_, Comment>(
        r#"
        SELECT id, project_id, user_id, user_email, content, created_at
        FROM comments
        WHERE project_id = ? AND id = ?
        "#,
    )
    .bind(project_id)
    .bind(comment_id)
    .fetch_optional(pool)
    .await?;

    Ok(comment)
}

/// 댓글을 작성합니다. 프로젝트가 없으면 `NotFound`.
pub async fn create_comment(
    pool: &SqlitePool,
    actor: &Actor,
    project_id: &str,
    content: &str,
) -> Result<Comment, AppError> {
    let content = lifecycle::validate_comment(content)?;

    let exists = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM projects WHERE id = ?")
        .bind(project_id)
        .fetch_one(pool)
        .await?;
    if exists == 0 {
        return Err(AppError::NotFound);
    }

    let id = uuid::Uuid::now_v7().to_string();
    sqlx::query(
        r#"
        INSERT INTO comments (id, project_id, user_id, user_email, content)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(project_id)
    .bind(&actor.user_id)
    .bind(&actor.email)
    .bind(&content)
    .execute(pool)
    .await?;

    get_comment(pool, project_id, &id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created comment".to_string()))
}

/// 삭제 권한을 확인한 뒤 댓글을 삭제합니다.
///
/// 댓글이 없으면 `NotFound`, 권한이 없으면 `Forbidden`이며 어느 경우에도 DB는 바뀌지 않습니다.
pub async fn delete_comment(
    pool: &SqlitePool,
    actor: &Actor,
    project_id: &str,
    comment_id: &str,
) -> Result<(), AppError> {
    let comment = get_comment(pool, project_id, comment_id)
        .await?
        .ok_or(AppError::NotFound)?;

    access::require_comment_delete(actor, &comment)?;

    sqlx::query("DELETE FROM comments WHERE id = ?")
        .bind(comment_id)
        .execute(pool)
        .await?;

    tracing::info!(
        "Comment deleted: id={}, project={}, by={}",
        comment_id,
        project_id,
        actor.user_id
    );

    Ok(())
}
