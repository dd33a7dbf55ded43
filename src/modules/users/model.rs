//! Customer accounts as seen by admins.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use vaultdesk_cache::{ParamValue, QueryParams, ToQueryParams};
use vaultdesk_core::pagination::deserialize_optional_i64;
use vaultdesk_core::{PageParams, SortOrder};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    Savings,
    Current,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Savings => "savings",
            AccountType::Current => "current",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "user_id")]
    pub id: i64,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub account_type: AccountType,
    pub balance: f64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateUserDto {
    #[validate(email(message = "email must be a valid email address"))]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 100, message = "full_name must be 1-100 characters"))]
    pub full_name: Option<String>,
    pub account_type: Option<AccountType>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserSortBy {
    Username,
    Email,
    Balance,
    CreatedAt,
}

impl UserSortBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserSortBy::Username => "username",
            UserSortBy::Email => "email",
            UserSortBy::Balance => "balance",
            UserSortBy::CreatedAt => "created_at",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct UserFilterParams {
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub page: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub per_page: Option<i64>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub isactive: Option<bool>,
    pub account_type: Option<AccountType>,
    pub balance_min: Option<f64>,
    pub balance_max: Option<f64>,
    pub sort_by: Option<UserSortBy>,
    pub order: Option<SortOrder>,
}

impl UserFilterParams {
    pub fn pagination(&self) -> PageParams {
        PageParams {
            page: self.page,
            per_page: self.per_page,
        }
    }

    pub fn matches(&self, user: &User) -> bool {
        let contains = |field: &str, needle: &Option<String>| {
            needle
                .as_deref()
                .is_none_or(|n| field.to_lowercase().contains(&n.to_lowercase()))
        };

        contains(&user.username, &self.username)
            && contains(&user.email, &self.email)
            && self.isactive.is_none_or(|active| user.is_active == active)
            && self.account_type.is_none_or(|t| user.account_type == t)
            && self.balance_min.is_none_or(|min| user.balance >= min)
            && self.balance_max.is_none_or(|max| user.balance <= max)
    }
}

impl ToQueryParams for UserFilterParams {
    fn to_query_params(&self) -> QueryParams {
        let page = self.pagination();
        QueryParams::new()
            .with("page", page.page())
            .with("per_page", page.per_page())
            .with("username", self.username.as_deref())
            .with("email", self.email.as_deref())
            .with("isactive", self.isactive)
            .with(
                "account_type",
                self.account_type.map(|t| ParamValue::enumeration(t.as_str())),
            )
            .with("balance_min", self.balance_min)
            .with("balance_max", self.balance_max)
            .with("sort_by", self.sort_by.map(|s| ParamValue::enumeration(s.as_str())))
            .with("order", self.order.map(|o| ParamValue::enumeration(o.as_str())))
    }
}
