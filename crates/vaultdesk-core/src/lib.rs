//! # Vaultdesk Core
//!
//! Foundational types shared by the Vaultdesk crates:
//!
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`response`]: Success and paginated response envelopes
//! - [`pagination`]: Page-based pagination parameters
//! - [`permissions`]: Permission string constants
//! - [`roles`]: Admin roles and their permission sets

pub mod errors;
pub mod pagination;
pub mod permissions;
pub mod response;
pub mod roles;

pub use errors::AppError;
pub use pagination::{PageParams, SortOrder};
pub use response::{ApiResponse, Items, PaginatedResponse};
pub use roles::AdminRole;
