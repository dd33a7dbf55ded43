use anyhow::anyhow;
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use vaultdesk_auth::verify_token;
use vaultdesk_core::{AdminRole, AppError, permissions};

use crate::modules::admins::model::Admin;
use crate::state::AppState;

/// The authenticated admin, resolved from the bearer token.
///
/// The role is read from the ledger rather than the token, so a role change
/// or a deleted account takes effect on the next request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentAdmin {
    pub id: i64,
    pub username: String,
    pub role: AdminRole,
}

impl CurrentAdmin {
    pub fn has_permission(&self, permission: &str) -> bool {
        self.role.has_permission(permission)
    }
}

impl From<&Admin> for CurrentAdmin {
    fn from(admin: &Admin) -> Self {
        Self {
            id: admin.id,
            username: admin.username.clone(),
            role: admin.role,
        }
    }
}

fn bearer_token(parts: &Parts) -> Result<&str, AppError> {
    let value = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::unauthorized(anyhow!("Missing authorization header")))?;

    value
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::unauthorized(anyhow!("Invalid authorization header format")))
}

impl FromRequestParts<AppState> for CurrentAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(admin) = parts.extensions.get::<CurrentAdmin>() {
            return Ok(admin.clone());
        }

        let claims = verify_token(bearer_token(parts)?, &state.jwt_config)?;
        let admin_id = claims
            .admin_id()
            .ok_or_else(|| AppError::unauthorized(anyhow!("Invalid admin ID in token")))?;

        let admin = state
            .ledger
            .read()
            .await
            .admins
            .get(&admin_id)
            .map(CurrentAdmin::from)
            .ok_or_else(|| AppError::unauthorized(anyhow!("Admin account no longer exists")))?;

        parts.extensions.insert(admin.clone());
        Ok(admin)
    }
}

/// Declares an extractor that authenticates the request and requires
/// `$permission` from the admin's role.
#[macro_export]
macro_rules! require_permission {
    ($name:ident, $permission:expr) => {
        #[derive(Debug, Clone)]
        pub struct $name(pub $crate::middleware::auth::CurrentAdmin);

        impl axum::extract::FromRequestParts<$crate::state::AppState> for $name {
            type Rejection = vaultdesk_core::AppError;

            async fn from_request_parts(
                parts: &mut axum::http::request::Parts,
                state: &$crate::state::AppState,
            ) -> Result<Self, Self::Rejection> {
                let admin =
                    $crate::middleware::auth::CurrentAdmin::from_request_parts(parts, state)
                        .await?;

                if !admin.has_permission($permission) {
                    return Err(vaultdesk_core::AppError::forbidden(anyhow::anyhow!(
                        "Access denied. Missing required permission: {}",
                        $permission
                    )));
                }

                Ok($name(admin))
            }
        }
    };
}

// Admins
require_permission!(RequireAdminRegister, permissions::ADMIN_REGISTER);
require_permission!(RequireAdminViewSelf, permissions::ADMIN_VIEW_SELF);
require_permission!(RequireAdminUpdateSelf, permissions::ADMIN_UPDATE_SELF);
require_permission!(RequireAdminViewAll, permissions::ADMIN_VIEW_ALL);
require_permission!(RequireAdminUpdateOther, permissions::ADMIN_UPDATE_OTHER);
require_permission!(RequireAdminDelete, permissions::ADMIN_DELETE);

// Customers
require_permission!(RequireUserViewAll, permissions::USER_VIEW_ALL);
require_permission!(RequireUserUpdate, permissions::USER_UPDATE);
require_permission!(RequireUserDelete, permissions::USER_DELETE);
require_permission!(RequireUserApprove, permissions::USER_APPROVE);

// Money movement
require_permission!(RequireDepositViewAll, permissions::DEPOSIT_VIEW_ALL);
require_permission!(RequireDepositManage, permissions::DEPOSIT_MANAGE);
require_permission!(RequireLoanViewAll, permissions::LOAN_VIEW_ALL);
require_permission!(RequireLoanApprove, permissions::LOAN_APPROVE);
require_permission!(RequireCardViewAll, permissions::CARD_VIEW_ALL);
require_permission!(RequireCardManage, permissions::CARD_MANAGE);
require_permission!(RequireTransactionViewAll, permissions::TRANSACTION_VIEW_ALL);
require_permission!(RequireTransactionsExport, permissions::TRANSACTIONS_EXPORT);

// Reporting
require_permission!(RequireAnalyticsView, permissions::ANALYTICS_VIEW);
