//! JWT creation and verification.
//!
//! ```ignore
//! use vaultdesk_auth::{create_access_token, verify_token};
//! use vaultdesk_config::JwtConfig;
//!
//! let config = JwtConfig::from_env();
//! let token = create_access_token(admin.id, &admin.username, admin.role, &config)?;
//! let claims = verify_token(&token, &config)?;
//! ```

use anyhow::anyhow;
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use vaultdesk_config::JwtConfig;
use vaultdesk_core::{AdminRole, AppError};

use crate::claims::{Claims, RefreshTokenClaims};

fn now() -> usize {
    usize::try_from(Utc::now().timestamp()).unwrap_or_default()
}

fn expiry(now: usize, lifetime_secs: i64) -> usize {
    now + usize::try_from(lifetime_secs).unwrap_or_default()
}

/// Creates a short-lived access token.
///
/// # Errors
///
/// Returns an internal error if encoding fails.
pub fn create_access_token(
    admin_id: i64,
    username: &str,
    role: AdminRole,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    let iat = now();
    let claims = Claims {
        sub: admin_id.to_string(),
        username: username.to_string(),
        role,
        exp: expiry(iat, jwt_config.access_token_expiry),
        iat,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(|e| AppError::internal(anyhow!("Failed to create token: {e}")))
}

/// Verifies an access token and returns its claims.
///
/// # Errors
///
/// Returns an unauthorized error if the signature is invalid, the token has
/// expired or it is not an access token.
pub fn verify_token(token: &str, jwt_config: &JwtConfig) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::unauthorized(anyhow!("Invalid or expired token")))
}

/// Creates a long-lived refresh token.
pub fn create_refresh_token(admin_id: i64, jwt_config: &JwtConfig) -> Result<String, AppError> {
    let iat = now();
    let claims = RefreshTokenClaims {
        sub: admin_id.to_string(),
        exp: expiry(iat, jwt_config.refresh_token_expiry),
        iat,
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(|e| AppError::internal(anyhow!("Failed to create refresh token: {e}")))
}

pub fn verify_refresh_token(
    token: &str,
    jwt_config: &JwtConfig,
) -> Result<RefreshTokenClaims, AppError> {
    decode::<RefreshTokenClaims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::unauthorized(anyhow!("Invalid or expired refresh token")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_test_jwt_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-key-at-least-32-characters-long".to_string(),
            access_token_expiry: 3600,
            refresh_token_expiry: 604800,
        }
    }

    #[test]
    fn test_create_and_verify_access_token() {
        let config = get_test_jwt_config();
        let token = create_access_token(42, "ada", AdminRole::Auditor, &config).unwrap();

        let claims = verify_token(&token, &config).unwrap();
        assert_eq!(claims.admin_id(), Some(42));
        assert_eq!(claims.username, "ada");
        assert_eq!(claims.role, AdminRole::Auditor);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_verify_token_invalid() {
        let config = get_test_jwt_config();
        let err = verify_token("invalid-token", &config).unwrap_err();
        assert_eq!(err.status.as_u16(), 401);
    }

    #[test]
    fn test_verify_token_wrong_secret() {
        let config = get_test_jwt_config();
        let token = create_access_token(1, "root", AdminRole::SuperAdmin, &config).unwrap();

        let wrong_config = JwtConfig {
            secret: "different-secret-key-at-least-32-characters".to_string(),
            ..get_test_jwt_config()
        };
        assert!(verify_token(&token, &wrong_config).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let config = get_test_jwt_config();
        let claims = Claims {
            sub: "1".to_string(),
            username: "root".to_string(),
            role: AdminRole::SuperAdmin,
            exp: 1,
            iat: 0,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .unwrap();
        assert!(verify_token(&token, &config).is_err());
    }

    #[test]
    fn test_refresh_token_round_trip() {
        let config = get_test_jwt_config();
        let token = create_refresh_token(9, &config).unwrap();
        let claims = verify_refresh_token(&token, &config).unwrap();
        assert_eq!(claims.admin_id(), Some(9));
        assert!(!claims.jti.is_empty());
    }

    #[test]
    fn test_refresh_token_is_not_an_access_token() {
        let config = get_test_jwt_config();
        let refresh = create_refresh_token(9, &config).unwrap();
        assert!(verify_token(&refresh, &config).is_err());
    }

    #[test]
    fn test_refresh_tokens_are_unique() {
        let config = get_test_jwt_config();
        let first = create_refresh_token(9, &config).unwrap();
        let second = create_refresh_token(9, &config).unwrap();
        assert_ne!(first, second);
    }
}
