//! # 댓글 모델 정의
//!
//! 댓글은 프로젝트 아래에 속하며, 작성 후에는 수정할 수 없고 삭제만 가능합니다.

use serde::{Deserialize, Serialize};

/// 댓글 엔티티. DB의 `comments` 테이블 한 행에 대응합니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: String,
    /// 이 댓글이 속한 프로젝트 ID
    pub project_id: String,
    /// 작성자 ID (삭제 권한 판단에 사용)
    pub user_id: String,
    /// 작성자 이메일 (화면 표시용)
    pub user_email: String,
    pub content: String,
    pub created_at: String,
}

/// 댓글 작성 요청: `POST /api/v1/projects/:id/comments`의 요청 본문
#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub content: String,
}
