use anyhow::anyhow;
use chrono::Utc;

use vaultdesk_auth::{hash_password, verify_password};
use vaultdesk_core::{AppError, PaginatedResponse, SortOrder};

use crate::ledger::Ledger;
use crate::modules::admins::model::{
    Admin, AdminFilterParams, AdminProfile, AdminSortBy, ChangePasswordDto, UpdateAdminDto,
    UpdateProfileDto,
};

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn admin_not_found() -> AppError {
    AppError::not_found(anyhow!("Admin not found"))
}

pub struct AdminService;

impl AdminService {
    pub async fn get_profile(ledger: &Ledger, admin_id: i64) -> Result<AdminProfile, AppError> {
        ledger
            .read()
            .await
            .admins
            .get(&admin_id)
            .map(AdminProfile::from)
            .ok_or_else(admin_not_found)
    }

    pub async fn list_admins(
        ledger: &Ledger,
        filters: &AdminFilterParams,
    ) -> Result<PaginatedResponse<AdminProfile>, AppError> {
        let tables = ledger.read().await;
        let mut matched: Vec<&Admin> = tables
            .admins
            .values()
            .filter(|a| {
                filters
                    .username
                    .as_deref()
                    .is_none_or(|u| contains_ci(&a.username, u))
            })
            .filter(|a| filters.email.as_deref().is_none_or(|e| contains_ci(&a.email, e)))
            .filter(|a| filters.role.is_none_or(|r| a.role == r))
            .collect();

        let order = filters.order.unwrap_or(SortOrder::Asc);
        if let Some(sort_by) = filters.sort_by {
            matched.sort_by(|a, b| {
                let ordering = match sort_by {
                    AdminSortBy::Username => a.username.cmp(&b.username),
                    AdminSortBy::Email => a.email.cmp(&b.email),
                    AdminSortBy::Role => a.role.as_str().cmp(b.role.as_str()),
                    AdminSortBy::CreatedAt => a.created_at.cmp(&b.created_at),
                };
                order.apply(ordering.then(a.id.cmp(&b.id)))
            });
        } else if order == SortOrder::Desc {
            matched.reverse();
        }

        let page = filters.pagination();
        let profiles: Vec<AdminProfile> = matched.into_iter().map(AdminProfile::from).collect();
        Ok(PaginatedResponse::new(
            "Admins retrieved successfully",
            page.slice(&profiles),
            page.page(),
            page.per_page(),
            profiles.len() as i64,
        ))
    }

    pub async fn update_profile(
        ledger: &Ledger,
        admin_id: i64,
        dto: UpdateProfileDto,
    ) -> Result<AdminProfile, AppError> {
        Self::update_admin(
            ledger,
            admin_id,
            UpdateAdminDto {
                username: dto.username,
                email: dto.email,
                role: None,
            },
        )
        .await
    }

    pub async fn update_admin(
        ledger: &Ledger,
        admin_id: i64,
        dto: UpdateAdminDto,
    ) -> Result<AdminProfile, AppError> {
        let mut tables = ledger.write().await;
        let current = tables.admins.get(&admin_id).ok_or_else(admin_not_found)?;

        let username = dto.username.unwrap_or_else(|| current.username.clone());
        let email = dto.email.unwrap_or_else(|| current.email.clone());
        if tables.admin_exists_with(&username, &email, Some(admin_id)) {
            return Err(AppError::conflict(anyhow!(
                "An admin with this username or email already exists"
            )));
        }

        let admin = tables.admins.get_mut(&admin_id).ok_or_else(admin_not_found)?;
        admin.username = username;
        admin.email = email;
        if let Some(role) = dto.role {
            admin.role = role;
        }
        admin.updated_at = Utc::now();

        Ok(AdminProfile::from(&*admin))
    }

    pub async fn change_password(
        ledger: &Ledger,
        admin_id: i64,
        dto: ChangePasswordDto,
        cost: u32,
    ) -> Result<(), AppError> {
        let stored_hash = ledger
            .read()
            .await
            .admins
            .get(&admin_id)
            .map(|a| a.password_hash.clone())
            .ok_or_else(admin_not_found)?;

        if !verify_password(&dto.current_password, &stored_hash) {
            return Err(AppError::bad_request(anyhow!("Current password is incorrect")));
        }

        // Hash outside the write lock; bcrypt is slow by design.
        let new_hash = hash_password(&dto.new_password, cost)?;

        let mut tables = ledger.write().await;
        let admin = tables.admins.get_mut(&admin_id).ok_or_else(admin_not_found)?;
        admin.password_hash = new_hash;
        admin.updated_at = Utc::now();
        Ok(())
    }

    pub async fn delete_admin(ledger: &Ledger, admin_id: i64, actor_id: i64) -> Result<(), AppError> {
        if admin_id == actor_id {
            return Err(AppError::bad_request(anyhow!("You cannot delete your own account")));
        }

        ledger
            .write()
            .await
            .admins
            .remove(&admin_id)
            .map(|_| ())
            .ok_or_else(admin_not_found)
    }
}
