//! Request guards.
//!
//! - [`auth`]: bearer token authentication and permission extractors
//!
//! ```ignore
//! use crate::middleware::auth::{CurrentAdmin, RequireLoanApprove};
//!
//! // Any authenticated admin
//! async fn me(admin: CurrentAdmin) -> impl IntoResponse { /* ... */ }
//!
//! // Only admins whose role grants `loan:approve`
//! async fn approve(RequireLoanApprove(admin): RequireLoanApprove) -> impl IntoResponse { /* ... */ }
//! ```

pub mod auth;
