use anyhow::anyhow;
use chrono::Utc;
use tracing::{info, warn};

use vaultdesk_auth::{
    create_access_token, create_refresh_token, hash_password, verify_password,
    verify_refresh_token,
};
use vaultdesk_config::JwtConfig;
use vaultdesk_core::{AdminRole, AppError};
use vaultdesk_observability::track_admin_login;

use crate::ledger::Ledger;
use crate::modules::admins::model::{Admin, AdminProfile};
use crate::modules::auth::model::{LoginRequest, LoginResponse, RegisterAdminDto, TokenPair};

fn issue_tokens(admin: &Admin, jwt_config: &JwtConfig) -> Result<TokenPair, AppError> {
    Ok(TokenPair {
        access_token: create_access_token(admin.id, &admin.username, admin.role, jwt_config)?,
        refresh_token: create_refresh_token(admin.id, jwt_config)?,
        token_type: "bearer".to_string(),
        expires_in: jwt_config.access_token_expiry,
    })
}

pub struct AuthService;

impl AuthService {
    /// Creates the first super admin. Refused once any admin exists.
    pub async fn bootstrap_admin(
        ledger: &Ledger,
        dto: RegisterAdminDto,
        cost: u32,
    ) -> Result<AdminProfile, AppError> {
        if !ledger.read().await.admins.is_empty() {
            return Err(AppError::forbidden(anyhow!(
                "Bootstrap is only allowed when no admins exist"
            )));
        }

        let password_hash = hash_password(&dto.password, cost)?;

        let mut tables = ledger.write().await;
        // Re-checked under the write lock: two bootstraps may race.
        if !tables.admins.is_empty() {
            return Err(AppError::forbidden(anyhow!(
                "Bootstrap is only allowed when no admins exist"
            )));
        }

        let now = Utc::now();
        let admin = tables.insert_admin(Admin {
            id: 0,
            username: dto.username,
            email: dto.email,
            password_hash,
            role: AdminRole::SuperAdmin,
            created_at: now,
            updated_at: now,
        });
        info!(admin.id = admin.id, "Bootstrap admin created");
        Ok(AdminProfile::from(&admin))
    }

    pub async fn register_admin(
        ledger: &Ledger,
        dto: RegisterAdminDto,
        cost: u32,
    ) -> Result<AdminProfile, AppError> {
        if ledger
            .read()
            .await
            .admin_exists_with(&dto.username, &dto.email, None)
        {
            return Err(AppError::conflict(anyhow!(
                "An admin with this username or email already exists"
            )));
        }

        let password_hash = hash_password(&dto.password, cost)?;

        let mut tables = ledger.write().await;
        if tables.admin_exists_with(&dto.username, &dto.email, None) {
            return Err(AppError::conflict(anyhow!(
                "An admin with this username or email already exists"
            )));
        }

        let now = Utc::now();
        let admin = tables.insert_admin(Admin {
            id: 0,
            username: dto.username,
            email: dto.email,
            password_hash,
            role: dto.role.unwrap_or(AdminRole::Manager),
            created_at: now,
            updated_at: now,
        });
        Ok(AdminProfile::from(&admin))
    }

    pub async fn login(
        ledger: &Ledger,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<LoginResponse, AppError> {
        let admin = ledger.read().await.admin_by_username(&dto.username).cloned();

        let admin = match admin {
            Some(admin) if verify_password(&dto.password, &admin.password_hash) => admin,
            _ => {
                warn!(username = %dto.username, "Failed admin login");
                track_admin_login(false);
                return Err(AppError::unauthorized(anyhow!("Invalid username or password")));
            }
        };

        track_admin_login(true);
        Ok(LoginResponse {
            tokens: issue_tokens(&admin, jwt_config)?,
            admin: AdminProfile::from(&admin),
        })
    }

    pub async fn refresh(
        ledger: &Ledger,
        refresh_token: &str,
        jwt_config: &JwtConfig,
    ) -> Result<TokenPair, AppError> {
        let claims = verify_refresh_token(refresh_token, jwt_config)?;
        let admin_id = claims
            .admin_id()
            .ok_or_else(|| AppError::unauthorized(anyhow!("Invalid admin ID in token")))?;

        let admin = ledger
            .read()
            .await
            .admins
            .get(&admin_id)
            .cloned()
            .ok_or_else(|| AppError::unauthorized(anyhow!("Admin account no longer exists")))?;

        issue_tokens(&admin, jwt_config)
    }
}
