//! Argon2id 비밀번호 해싱/검증
//!
//! 해시는 PHC 문자열(`$argon2id$...`)로 저장하므로 솔트와 파라미터가 함께 들어 있습니다.

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand_core::OsRng;

use crate::error::AppError;

pub const MIN_PASSWORD_LEN: usize = 6;

pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;
    Ok(hash.to_string())
}

/// 일치하면 `Ok(true)`, 틀리면 `Ok(false)`. 저장된 해시가 깨져 있으면 에러.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(format!("Password hash parse error: {}", e)))?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AppError::Internal(format!("Password verify failed: {}", e))),
    }
}

/// 최소 길이(문자 수 기준) 검사
pub fn validate_password(password: &str) -> Result<(), AppError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::BadRequest(format!(
            "비밀번호는 {MIN_PASSWORD_LEN}자 이상이어야 합니다"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify() {
        let hash = hash_password("secret-123").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("secret-123", &hash).unwrap());
        assert!(!verify_password("secret-124", &hash).unwrap());
    }

    #[test]
    fn broken_hash_is_an_error() {
        assert!(verify_password("x", "not-a-phc-string").is_err());
    }

    #[test]
    fn minimum_length_counts_characters() {
        assert!(validate_password("12345").is_err());
        assert!(validate_password("123456").is_ok());
        assert!(validate_password("비밀번호여섯").is_ok());
    }
}
