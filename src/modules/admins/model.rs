//! Admin accounts and their DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use vaultdesk_cache::{ParamValue, QueryParams, ToQueryParams};
use vaultdesk_core::pagination::deserialize_optional_i64;
use vaultdesk_core::{AdminRole, PageParams, SortOrder};

/// Stored admin record. Never serialized directly; see [`AdminProfile`].
#[derive(Debug, Clone, PartialEq)]
pub struct Admin {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: AdminRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminProfile {
    pub admin_id: i64,
    pub username: String,
    pub email: String,
    pub role: AdminRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Admin> for AdminProfile {
    fn from(admin: &Admin) -> Self {
        Self {
            admin_id: admin.id,
            username: admin.username.clone(),
            email: admin.email.clone(),
            role: admin.role,
            created_at: admin.created_at,
            updated_at: admin.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateProfileDto {
    #[validate(length(min = 3, max = 50, message = "username must be 3-50 characters"))]
    pub username: Option<String>,
    #[validate(email(message = "email must be a valid email address"))]
    pub email: Option<String>,
}

/// Update of another admin. Only admins with `admin:update_other` reach it,
/// so the role may change here.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateAdminDto {
    #[validate(length(min = 3, max = 50, message = "username must be 3-50 characters"))]
    pub username: Option<String>,
    #[validate(email(message = "email must be a valid email address"))]
    pub email: Option<String>,
    pub role: Option<AdminRole>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ChangePasswordDto {
    #[validate(length(min = 1, message = "current_password is required"))]
    pub current_password: String,
    #[validate(length(min = 8, message = "new_password must be at least 8 characters"))]
    pub new_password: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminSortBy {
    Username,
    Email,
    Role,
    CreatedAt,
}

impl AdminSortBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdminSortBy::Username => "username",
            AdminSortBy::Email => "email",
            AdminSortBy::Role => "role",
            AdminSortBy::CreatedAt => "created_at",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AdminFilterParams {
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub page: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub per_page: Option<i64>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub role: Option<AdminRole>,
    pub sort_by: Option<AdminSortBy>,
    pub order: Option<SortOrder>,
}

impl AdminFilterParams {
    pub fn pagination(&self) -> PageParams {
        PageParams {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

impl ToQueryParams for AdminFilterParams {
    fn to_query_params(&self) -> QueryParams {
        let page = self.pagination();
        QueryParams::new()
            .with("page", page.page())
            .with("per_page", page.per_page())
            .with("username", self.username.as_deref())
            .with("email", self.email.as_deref())
            .with("role", self.role.map(|r| ParamValue::enumeration(r.as_str())))
            .with("sort_by", self.sort_by.map(|s| ParamValue::enumeration(s.as_str())))
            .with("order", self.order.map(|o| ParamValue::enumeration(o.as_str())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_omits_password_hash() {
        let now = Utc::now();
        let admin = Admin {
            id: 3,
            username: "ops".to_string(),
            email: "ops@example.com".to_string(),
            password_hash: "$2b$04$secret".to_string(),
            role: AdminRole::Manager,
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_string(&AdminProfile::from(&admin)).unwrap();
        assert!(json.contains(r#""admin_id":3"#));
        assert!(!json.contains("secret"));
    }

    #[test]
    fn test_query_params_normalize_pagination() {
        let explicit = AdminFilterParams {
            page: Some(1),
            per_page: Some(10),
            ..Default::default()
        };
        assert_eq!(
            explicit.to_query_params(),
            AdminFilterParams::default().to_query_params()
        );
    }

    #[test]
    fn test_query_params_distinguish_filters() {
        let by_role = AdminFilterParams {
            role: Some(AdminRole::Auditor),
            ..Default::default()
        };
        assert_ne!(
            by_role.to_query_params(),
            AdminFilterParams::default().to_query_params()
        );
    }
}
