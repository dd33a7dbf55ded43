//! Permission constants for the Vaultdesk admin API.
//!
//! ```ignore
//! use vaultdesk_core::permissions;
//!
//! if admin.role.has_permission(permissions::LOAN_APPROVE) {
//!     // approve
//! }
//! ```

// =============================================================================
// Admin management
// =============================================================================

pub const ADMIN_REGISTER: &str = "admin:register";
pub const ADMIN_VIEW_SELF: &str = "admin:view_self";
pub const ADMIN_UPDATE_SELF: &str = "admin:update_self";
pub const ADMIN_VIEW_ALL: &str = "admin:view_all";
pub const ADMIN_UPDATE_OTHER: &str = "admin:update_other";
pub const ADMIN_DELETE: &str = "admin:delete";

// =============================================================================
// Customers
// =============================================================================

pub const USER_VIEW_ALL: &str = "user:view_all";
pub const USER_UPDATE: &str = "user:update";
pub const USER_DELETE: &str = "user:delete";
/// Activate or deactivate a customer account.
pub const USER_APPROVE: &str = "user:approve";

// =============================================================================
// Money movement
// =============================================================================

pub const DEPOSIT_VIEW_ALL: &str = "deposit:view_all";
pub const DEPOSIT_MANAGE: &str = "deposit:manage";
pub const LOAN_VIEW_ALL: &str = "loan:view_all";
/// Approve or reject a loan.
pub const LOAN_APPROVE: &str = "loan:approve";
pub const CARD_VIEW_ALL: &str = "card:view_all";
/// Block, unblock or edit a card.
pub const CARD_MANAGE: &str = "card:manage";
pub const TRANSACTION_VIEW_ALL: &str = "transaction:view_all";
pub const TRANSACTIONS_EXPORT: &str = "transactions:export";

// =============================================================================
// Reporting
// =============================================================================

pub const ANALYTICS_VIEW: &str = "analytics:view";

/// Every permission known to the API.
pub const ALL: &[&str] = &[
    ADMIN_REGISTER,
    ADMIN_VIEW_SELF,
    ADMIN_UPDATE_SELF,
    ADMIN_VIEW_ALL,
    ADMIN_UPDATE_OTHER,
    ADMIN_DELETE,
    USER_VIEW_ALL,
    USER_UPDATE,
    USER_DELETE,
    USER_APPROVE,
    DEPOSIT_VIEW_ALL,
    DEPOSIT_MANAGE,
    LOAN_VIEW_ALL,
    LOAN_APPROVE,
    CARD_VIEW_ALL,
    CARD_MANAGE,
    TRANSACTION_VIEW_ALL,
    TRANSACTIONS_EXPORT,
    ANALYTICS_VIEW,
];
