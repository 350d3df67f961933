//! # 인증 라우트 핸들러
//!
//! ## 엔드포인트
//! - `POST /api/v1/auth/register` → 가입 (승인 대기 계정 생성, 토큰 없음)
//! - `POST /api/v1/auth/login`    → 로그인 (승인된 계정만 토큰 발급)
//! - `POST /api/v1/auth/refresh`  → 리프레시 토큰 교체
//! - `POST /api/v1/auth/logout`   → 모든 리프레시 토큰 폐기
//! - `GET  /api/v1/auth/me`       → 내 정보
//! - `PUT  /api/v1/auth/password` → 비밀번호 변경 (현재 비밀번호 재확인)

use crate::{
    db::users as db_users,
    error::AppError,
    middleware::auth::{create_access_token, create_refresh_token, hash_token, verify_token, AuthUser, TokenKind, REFRESH_TOKEN_DAYS},
    models::user::*,
    routes::AppState,
    services::password::{hash_password, validate_password, verify_password},
};
use axum::{extract::State, http::StatusCode, Json};
use chrono::{Duration, Utc};
use serde_json::{json, Value};

const INVALID_CREDENTIALS: &str = "이메일 또는 비밀번호가 올바르지 않습니다";

fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.chars().any(char::is_whitespace)
}

/// 액세스/리프레시 토큰을 발급하고 리프레시 토큰 해시를 저장합니다.
async fn issue_tokens(state: &AppState, user: User) -> Result<AuthResponse, AppError> {
    let access_token = create_access_token(&user.id, &state.jwt_secret)
        .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))?;
    let refresh_token = create_refresh_token(&user.id, &state.jwt_secret)
        .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))?;

    let token_id = uuid::Uuid::now_v7().to_string();
    let token_hash = hash_token(&refresh_token);
    let expires_at = (Utc::now() + Duration::days(REFRESH_TOKEN_DAYS))
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string();

    db_users::store_refresh_token(&state.pool, &token_id, &user.id, &token_hash, &expires_at).await?;

    Ok(AuthResponse {
        user: user.into(),
        access_token,
        refresh_token,
    })
}

fn reject_unapproved(user: &User) -> Result<(), AppError> {
    if user.role == Role::Visitor {
        return Err(AppError::Forbidden("관리자 승인 대기 중인 계정입니다".to_string()));
    }
    Ok(())
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let email = req.email.trim();
    if !is_valid_email(email) {
        return Err(AppError::BadRequest("유효하지 않은 이메일 형식입니다".to_string()));
    }
    validate_password(&req.password)?;
    if req.password != req.password_confirm {
        return Err(AppError::BadRequest("비밀번호가 일치하지 않습니다".to_string()));
    }

    let password_hash = hash_password(&req.password)?;
    let user_id = uuid::Uuid::now_v7().to_string();
    let user = db_users::create_user(&state.pool, &user_id, email, &password_hash).await?;
    tracing::info!("User registered: id={}", user.id);

    Ok((StatusCode::CREATED, Json(user.into())))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let user = db_users::find_by_email(&state.pool, req.email.trim())
        .await?
        .ok_or(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

    if !verify_password(&req.password, &user.password_hash)? {
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }

    reject_unapproved(&user)?;

    Ok(Json(issue_tokens(&state, user).await?))
}

pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let claims = verify_token(&req.refresh_token, &state.jwt_secret, TokenKind::Refresh)
        .map_err(|_| AppError::Unauthorized("유효하지 않은 리프레시 토큰입니다".to_string()))?;

    let token_hash = hash_token(&req.refresh_token);
    let (user_id, expires_at) = db_users::find_refresh_token(&state.pool, &token_hash)
        .await?
        .ok_or(AppError::Unauthorized("만료되었거나 폐기된 리프레시 토큰입니다".to_string()))?;

    let expires = chrono::NaiveDateTime::parse_from_str(&expires_at, "%Y-%m-%dT%H:%M:%S%.3fZ")
        .map_err(|e| AppError::Internal(format!("Date parse error: {}", e)))?;
    if expires.and_utc() < Utc::now() || user_id != claims.sub {
        db_users::delete_refresh_token(&state.pool, &token_hash).await?;
        return Err(AppError::Unauthorized("만료되었거나 폐기된 리프레시 토큰입니다".to_string()));
    }

    let user = db_users::find_by_id(&state.pool, &user_id)
        .await?
        .ok_or(AppError::Unauthorized("사용자를 찾을 수 없습니다".to_string()))?;

    db_users::delete_refresh_token(&state.pool, &token_hash).await?;
    reject_unapproved(&user)?;

    Ok(Json(issue_tokens(&state, user).await?))
}

pub async fn logout(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Value>, AppError> {
    db_users::delete_user_refresh_tokens(&state.pool, &auth_user.actor.user_id).await?;

    Ok(Json(json!({ "message": "로그아웃되었습니다" })))
}

pub async fn me(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<UserResponse>, AppError> {
    let user = db_users::find_by_id(&state.pool, &auth_user.actor.user_id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(user.into()))
}

/// 비밀번호 변경. 성공하면 다른 기기의 리프레시 토큰도 모두 폐기됩니다.
pub async fn change_password(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<Json<Value>, AppError> {
    let user = db_users::find_by_id(&state.pool, &auth_user.actor.user_id)
        .await?
        .ok_or(AppError::NotFound)?;

    if !verify_password(&req.current_password, &user.password_hash)? {
        return Err(AppError::Unauthorized("현재 비밀번호가 올바르지 않습니다".to_string()));
    }
    validate_password(&req.new_password)?;
    if req.new_password != req.new_password_confirm {
        return Err(AppError::BadRequest("새 비밀번호가 일치하지 않습니다".to_string()));
    }

    let password_hash = hash_password(&req.new_password)?;
    db_users::update_password(&state.pool, &user.id, &password_hash).await?;
    db_users::delete_user_refresh_tokens(&state.pool, &user.id).await?;
    tracing::info!("Password changed: user={}", user.id);

    Ok(Json(json!({ "message": "비밀번호가 변경되었습니다" })))
}
