use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use vaultdesk_cache::{ParamValue, QueryParams, ToQueryParams};
use vaultdesk_core::pagination::deserialize_optional_i64;
use vaultdesk_core::{PageParams, SortOrder};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepositStatus {
    Pending,
    Completed,
    Failed,
}

impl DepositStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DepositStatus::Pending => "pending",
            DepositStatus::Completed => "completed",
            DepositStatus::Failed => "failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deposit {
    #[serde(rename = "deposit_id")]
    pub id: i64,
    pub user_id: i64,
    /// Admin who recorded the deposit.
    pub admin_id: i64,
    pub amount: f64,
    pub reference_number: String,
    pub status: DepositStatus,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateDepositDto {
    #[validate(range(min = 0.01, message = "amount must be greater than zero"))]
    pub amount: f64,
    #[validate(length(max = 255, message = "description must be at most 255 characters"))]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepositSortBy {
    CreatedAt,
    Amount,
}

impl DepositSortBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            DepositSortBy::CreatedAt => "created_at",
            DepositSortBy::Amount => "amount",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DepositFilterParams {
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub page: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub per_page: Option<i64>,
    pub deposit_status: Option<DepositStatus>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub sort_by: Option<DepositSortBy>,
    pub order: Option<SortOrder>,
}

impl DepositFilterParams {
    pub fn pagination(&self) -> PageParams {
        PageParams {
            page: self.page,
            per_page: self.per_page,
        }
    }

    pub fn matches(&self, deposit: &Deposit) -> bool {
        let day = deposit.created_at.date_naive();
        self.deposit_status.is_none_or(|s| deposit.status == s)
            && self.start_date.is_none_or(|start| day >= start)
            && self.end_date.is_none_or(|end| day <= end)
    }
}

impl ToQueryParams for DepositFilterParams {
    fn to_query_params(&self) -> QueryParams {
        let page = self.pagination();
        QueryParams::new()
            .with("page", page.page())
            .with("per_page", page.per_page())
            .with(
                "deposit_status",
                self.deposit_status.map(|s| ParamValue::enumeration(s.as_str())),
            )
            .with("start_date", self.start_date)
            .with("end_date", self.end_date)
            .with("sort_by", self.sort_by.map(|s| ParamValue::enumeration(s.as_str())))
            .with("order", self.order.map(|o| ParamValue::enumeration(o.as_str())))
    }
}
