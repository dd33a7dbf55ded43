//! # Vaultdesk Auth
//!
//! Authentication primitives for the Vaultdesk admin API:
//!
//! - [`claims`]: JWT claim structures for access and refresh tokens
//! - [`jwt`]: Token creation and verification
//! - [`password`]: bcrypt password hashing

pub mod claims;
pub mod jwt;
pub mod password;

pub use claims::{Claims, RefreshTokenClaims};
pub use jwt::{create_access_token, create_refresh_token, verify_refresh_token, verify_token};
pub use password::{hash_password, verify_password};
