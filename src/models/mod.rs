//! # 데이터 모델 모듈
//!
//! 애플리케이션에서 사용하는 데이터 구조체(struct)들을 정의합니다.
//! - `comment`: 프로젝트 댓글
//! - `project`: 프로젝트 레코드, 작업 단계, 분류 값, 요청 본문
//! - `user`: 사용자, 역할(Role), 인증 요청/응답
//!
//! `pub use X::*;`로 재공개하여 `crate::models::Project`처럼 짧게 쓸 수 있습니다.

pub mod comment;
pub mod project;
pub mod user;

pub use comment::*;
pub use project::*;
pub use user::*;
