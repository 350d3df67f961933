//! # 비즈니스 로직 모듈
//!
//! HTTP/DB와 무관한 순수 로직을 모아둔 모듈입니다.
//! - `access`: 권한 정책 (관리자 전용 작업, 댓글 삭제 권한)
//! - `comment_hub`: 실시간 댓글 이벤트 broadcast
//! - `effort`: 공수 입력 변환, 총 공수 계산, 월별 집계
//! - `filter`: 목록 필터 (상태, 검색어, 날짜) 및 정렬
//! - `lifecycle`: 등록/수정/복제 요청 검증
//! - `pagination`: 페이지 나누기
//! - `password`: Argon2id 비밀번호 해싱
//! - `single_flight`: 중복 제출 방지

pub mod access;
pub mod comment_hub;
pub mod effort;
pub mod filter;
pub mod lifecycle;
pub mod pagination;
pub mod password;
pub mod single_flight;
