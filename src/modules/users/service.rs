use anyhow::anyhow;
use chrono::Utc;

use vaultdesk_core::{AppError, PaginatedResponse, SortOrder};

use crate::ledger::Ledger;
use crate::modules::users::model::{UpdateUserDto, User, UserFilterParams, UserSortBy};

fn user_not_found() -> AppError {
    AppError::not_found(anyhow!("User not found"))
}

pub struct UserService;

impl UserService {
    pub async fn list_users(
        ledger: &Ledger,
        filters: &UserFilterParams,
    ) -> Result<PaginatedResponse<User>, AppError> {
        let tables = ledger.read().await;
        let mut users: Vec<User> = tables
            .users
            .values()
            .filter(|u| filters.matches(u))
            .cloned()
            .collect();

        let order = filters.order.unwrap_or(SortOrder::Asc);
        if let Some(sort_by) = filters.sort_by {
            users.sort_by(|a, b| {
                let ordering = match sort_by {
                    UserSortBy::Username => a.username.cmp(&b.username),
                    UserSortBy::Email => a.email.cmp(&b.email),
                    UserSortBy::Balance => a.balance.total_cmp(&b.balance),
                    UserSortBy::CreatedAt => a.created_at.cmp(&b.created_at),
                };
                order.apply(ordering.then(a.id.cmp(&b.id)))
            });
        } else if order == SortOrder::Desc {
            users.reverse();
        }

        let page = filters.pagination();
        Ok(PaginatedResponse::new(
            "Users retrieved successfully",
            page.slice(&users),
            page.page(),
            page.per_page(),
            users.len() as i64,
        ))
    }

    pub async fn get_user(ledger: &Ledger, user_id: i64) -> Result<User, AppError> {
        ledger
            .read()
            .await
            .users
            .get(&user_id)
            .cloned()
            .ok_or_else(user_not_found)
    }

    pub async fn update_user(
        ledger: &Ledger,
        user_id: i64,
        dto: UpdateUserDto,
    ) -> Result<User, AppError> {
        let mut tables = ledger.write().await;

        if let Some(email) = dto.email.as_deref() {
            let taken = tables
                .users
                .values()
                .any(|u| u.id != user_id && u.email.eq_ignore_ascii_case(email));
            if taken {
                return Err(AppError::conflict(anyhow!("Email is already in use")));
            }
        }

        let user = tables.users.get_mut(&user_id).ok_or_else(user_not_found)?;
        if let Some(email) = dto.email {
            user.email = email;
        }
        if let Some(full_name) = dto.full_name {
            user.full_name = full_name;
        }
        if let Some(account_type) = dto.account_type {
            user.account_type = account_type;
        }
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    pub async fn delete_user(ledger: &Ledger, user_id: i64) -> Result<(), AppError> {
        ledger
            .write()
            .await
            .users
            .remove(&user_id)
            .map(|_| ())
            .ok_or_else(user_not_found)
    }

    /// Flips `is_active` and returns the updated user.
    pub async fn toggle_status(ledger: &Ledger, user_id: i64) -> Result<User, AppError> {
        let mut tables = ledger.write().await;
        let user = tables.users.get_mut(&user_id).ok_or_else(user_not_found)?;
        user.is_active = !user.is_active;
        user.updated_at = Utc::now();
        Ok(user.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    use crate::modules::users::model::AccountType;
    use crate::testing::fixtures;

    async fn seeded() -> Ledger {
        let ledger = Ledger::new();
        {
            let mut tables = ledger.write().await;
            for (name, balance) in [("ada", 500.0), ("bob", 20.0), ("cy", 1200.5)] {
                let mut user = fixtures::user(name);
                user.balance = balance;
                tables.insert_user(user);
            }
        }
        ledger
    }

    #[tokio::test]
    async fn test_list_sorted_by_balance_desc() {
        let ledger = seeded().await;
        let filters = UserFilterParams {
            sort_by: Some(UserSortBy::Balance),
            order: Some(SortOrder::Desc),
            ..Default::default()
        };
        let page = UserService::list_users(&ledger, &filters).await.unwrap();
        let names: Vec<_> = page.items().iter().map(|u| u.username.as_str()).collect();
        assert_eq!(names, ["cy", "ada", "bob"]);
    }

    #[tokio::test]
    async fn test_update_user_fields() {
        let ledger = seeded().await;
        let dto = UpdateUserDto {
            email: Some("ada@bank.test".to_string()),
            full_name: None,
            account_type: Some(AccountType::Current),
        };
        let user = UserService::update_user(&ledger, 1, dto).await.unwrap();
        assert_eq!(user.email, "ada@bank.test");
        assert_eq!(user.account_type, AccountType::Current);
    }

    #[tokio::test]
    async fn test_update_rejects_taken_email() {
        let ledger = seeded().await;
        let dto = UpdateUserDto {
            email: Some("bob@example.com".to_string()),
            full_name: None,
            account_type: None,
        };
        let err = UserService::update_user(&ledger, 1, dto).await.unwrap_err();
        assert_eq!(err.status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_toggle_status_flips() {
        let ledger = seeded().await;
        assert!(!UserService::toggle_status(&ledger, 2).await.unwrap().is_active);
        assert!(UserService::toggle_status(&ledger, 2).await.unwrap().is_active);
    }

    #[tokio::test]
    async fn test_delete_missing_user() {
        let ledger = seeded().await;
        UserService::delete_user(&ledger, 3).await.unwrap();
        let err = UserService::delete_user(&ledger, 3).await.unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }
}
