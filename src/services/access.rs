//! # 권한 정책
//!
//! 데이터 접근 계층의 변경 함수가 DB에 쓰기 전에 호출하는 검사 함수들입니다.
//!
//! | 작업 | 허용 |
//! |------|------|
//! | 프로젝트 등록 / 수정 / 삭제 / 복제 | 관리자 |
//! | 댓글 작성 | 승인된 모든 사용자 |
//! | 댓글 삭제 | 작성자 본인 또는 관리자 |

use crate::error::AppError;
use crate::models::{Actor, Comment};

pub fn require_admin(actor: &Actor) -> Result<(), AppError> {
    if actor.is_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden("관리자만 사용할 수 있는 기능입니다".to_string()))
    }
}

pub fn can_delete_comment(actor: &Actor, comment: &Comment) -> bool {
    actor.is_admin() || actor.user_id == comment.user_id
}

pub fn require_comment_delete(actor: &Actor, comment: &Comment) -> Result<(), AppError> {
    if can_delete_comment(actor, comment) {
        Ok(())
    } else {
        Err(AppError::Forbidden("삭제 권한이 없습니다".to_string()))
    }
}
