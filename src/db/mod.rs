//! # 데이터베이스 접근 계층 (Data Access Layer)
//!
//! 데이터베이스와 직접 상호작용하는 함수들을 모아둔 모듈입니다.
//! 라우트 핸들러(routes/)에서 이 모듈의 함수를 호출하여 DB 작업을 수행합니다.
//!
//! 각 하위 모듈:
//! - `comments`: 댓글 조회/작성/삭제 (삭제 권한 검사 포함)
//! - `projects`: 프로젝트 조회/등록/수정/삭제/복제 (관리자 권한 검사 포함)
//! - `users`: 사용자 인증 관련 쿼리

pub mod comments;
pub mod projects;
pub mod users;
