//! # 미들웨어 / 추출기
//!
//! - `auth`: Bearer 토큰 검증, 승인 사용자 추출, JWT 발급

pub mod auth;
