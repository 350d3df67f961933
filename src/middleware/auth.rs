//! # 인증 추출기와 토큰 유틸리티
//!
//! - `AuthUser`: `Authorization: Bearer <access token>` 헤더를 검증하고,
//!   DB에서 사용자를 다시 읽어 최신 역할을 담은 `Actor`를 만듭니다.
//!   승인 대기(`visitor`) 계정은 403으로 거부합니다.
//! - 액세스 토큰 15분, 리프레시 토큰 7일. 리프레시 토큰은 SHA-256 해시만 저장합니다.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sha2::{Digest, Sha256};

use crate::db::users as db_users;
use crate::models::{Actor, Role};
use crate::routes::AppState;

pub const ACCESS_TOKEN_MINUTES: i64 = 15;
pub const REFRESH_TOKEN_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // user id
    pub typ: TokenKind,
    /// 같은 초에 발급된 토큰끼리 해시가 겹치지 않도록 넣는 고유값
    pub jti: String,
    pub exp: i64,
    pub iat: i64,
}

/// 인증을 통과한 승인 사용자
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub actor: Actor,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(AuthError::MissingToken)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AuthError::InvalidToken)?;

        let claims = verify_token(token, &state.jwt_secret, TokenKind::Access)?;

        let user = db_users::find_by_id(&state.pool, &claims.sub)
            .await
            .map_err(|e| {
                tracing::error!("Failed to load user for token: {}", e);
                AuthError::Unavailable
            })?
            .ok_or(AuthError::InvalidToken)?;

        if user.role == Role::Visitor {
            return Err(AuthError::NotApproved);
        }

        Ok(AuthUser {
            actor: Actor::from(&user),
        })
    }
}

#[derive(Debug)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
    ExpiredToken,
    /// 가입은 했지만 아직 관리자 승인 전인 계정
    NotApproved,
    Unavailable,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AuthError::MissingToken => (
                StatusCode::UNAUTHORIZED,
                "missing_token",
                "로그인이 필요합니다",
            ),
            AuthError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "invalid_token",
                "유효하지 않은 인증 토큰입니다",
            ),
            AuthError::ExpiredToken => (
                StatusCode::UNAUTHORIZED,
                "expired_token",
                "인증 토큰이 만료되었습니다",
            ),
            AuthError::NotApproved => (
                StatusCode::FORBIDDEN,
                "not_approved",
                "관리자 승인 대기 중인 계정입니다",
            ),
            AuthError::Unavailable => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "database_error",
                "데이터 처리 중 오류가 발생했습니다",
            ),
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

fn create_token(
    user_id: &str,
    secret: &str,
    typ: TokenKind,
    ttl: Duration,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        typ,
        jti: uuid::Uuid::now_v7().to_string(),
        iat: now.timestamp(),
        exp: (now + ttl).timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

pub fn create_access_token(
    user_id: &str,
    secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    create_token(
        user_id,
        secret,
        TokenKind::Access,
        Duration::minutes(ACCESS_TOKEN_MINUTES),
    )
}

pub fn create_refresh_token(
    user_id: &str,
    secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    create_token(
        user_id,
        secret,
        TokenKind::Refresh,
        Duration::days(REFRESH_TOKEN_DAYS),
    )
}

/// 서명과 만료를 검증하고, 토큰 종류가 `expected`와 다르면 거부합니다.
pub fn verify_token(token: &str, secret: &str, expected: TokenKind) -> Result<Claims, AuthError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
        _ => AuthError::InvalidToken,
    })?;

    if token_data.claims.typ != expected {
        return Err(AuthError::InvalidToken);
    }

    Ok(token_data.claims)
}

pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}
