//! JWT claim structures.
//!
//! - [`Claims`]: access token claims carrying the admin's role
//! - [`RefreshTokenClaims`]: refresh token claims for token renewal

use serde::{Deserialize, Serialize};
use vaultdesk_core::AdminRole;

/// JWT claims for access tokens.
///
/// Permissions are not embedded: they derive from `role`, and the
/// authentication middleware re-reads the admin record so a role change or a
/// deletion takes effect before the token expires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Admin ID (subject claim)
    pub sub: String,
    pub username: String,
    pub role: AdminRole,
    /// Expiration (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
}

impl Claims {
    /// Admin ID parsed from `sub`.
    pub fn admin_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }
}

/// JWT claims for refresh tokens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefreshTokenClaims {
    pub sub: String,
    pub exp: usize,
    pub iat: usize,
    /// Unique token identifier, so two refresh tokens issued in the same
    /// second still differ.
    pub jti: String,
}

impl RefreshTokenClaims {
    pub fn admin_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_serialize() {
        let claims = Claims {
            sub: "42".to_string(),
            username: "ada".to_string(),
            role: AdminRole::Manager,
            exp: 1234567890,
            iat: 1234567800,
        };
        let serialized = serde_json::to_string(&claims).unwrap();
        assert!(serialized.contains(r#""sub":"42""#));
        assert!(serialized.contains(r#""role":"manager""#));
    }

    #[test]
    fn test_claims_admin_id() {
        let json = r#"{"sub":"7","username":"root","role":"super_admin","exp":9999999999,"iat":9999999900}"#;
        let claims: Claims = serde_json::from_str(json).unwrap();
        assert_eq!(claims.admin_id(), Some(7));
        assert_eq!(claims.role, AdminRole::SuperAdmin);
    }

    #[test]
    fn test_refresh_claims_reject_non_numeric_subject() {
        let claims = RefreshTokenClaims {
            sub: "not-a-number".to_string(),
            exp: 1,
            iat: 0,
            jti: "j".to_string(),
        };
        assert_eq!(claims.admin_id(), None);
    }
}
