use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use vaultdesk_cache::{ParamValue, QueryParams, ToQueryParams};
use vaultdesk_core::pagination::deserialize_optional_i64;
use vaultdesk_core::{PageParams, SortOrder};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanStatus {
    Pending,
    Approved,
    Rejected,
    Repaid,
}

impl LoanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanStatus::Pending => "pending",
            LoanStatus::Approved => "approved",
            LoanStatus::Rejected => "rejected",
            LoanStatus::Repaid => "repaid",
        }
    }

    /// A rejected loan may be reconsidered; approved and repaid loans are final.
    pub fn can_approve(&self) -> bool {
        matches!(self, LoanStatus::Pending | LoanStatus::Rejected)
    }

    pub fn can_reject(&self) -> bool {
        matches!(self, LoanStatus::Pending)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    #[serde(rename = "loan_id")]
    pub id: i64,
    pub user_id: i64,
    pub loan_type_id: i64,
    pub loan_amount: f64,
    pub interest_rate: f64,
    pub monthly_installment: f64,
    pub due_date: NaiveDate,
    pub status: LoanStatus,
    /// Admin who approved or rejected the loan.
    pub decided_by: Option<i64>,
    pub decided_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanSortBy {
    CreatedAt,
    DueDate,
    LoanAmount,
    MonthlyInstallment,
}

impl LoanSortBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanSortBy::CreatedAt => "created_at",
            LoanSortBy::DueDate => "due_date",
            LoanSortBy::LoanAmount => "loan_amount",
            LoanSortBy::MonthlyInstallment => "monthly_installment",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LoanFilterParams {
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub page: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub per_page: Option<i64>,
    pub loan_status: Option<LoanStatus>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub user_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub loan_type_id: Option<i64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub sort_by: Option<LoanSortBy>,
    pub order: Option<SortOrder>,
}

impl LoanFilterParams {
    pub fn pagination(&self) -> PageParams {
        PageParams {
            page: self.page,
            per_page: self.per_page,
        }
    }

    pub fn sort_by(&self) -> LoanSortBy {
        self.sort_by.unwrap_or(LoanSortBy::CreatedAt)
    }

    pub fn order(&self) -> SortOrder {
        self.order.unwrap_or(SortOrder::Desc)
    }

    pub fn matches(&self, loan: &Loan) -> bool {
        let day = loan.created_at.date_naive();
        self.loan_status.is_none_or(|s| loan.status == s)
            && self.user_id.is_none_or(|id| loan.user_id == id)
            && self.loan_type_id.is_none_or(|id| loan.loan_type_id == id)
            && self.start_date.is_none_or(|start| day >= start)
            && self.end_date.is_none_or(|end| day <= end)
    }
}

impl ToQueryParams for LoanFilterParams {
    /// Sorting defaults are resolved first so that omitting them and passing
    /// them explicitly share one cache entry.
    fn to_query_params(&self) -> QueryParams {
        let page = self.pagination();
        QueryParams::new()
            .with("page", page.page())
            .with("per_page", page.per_page())
            .with(
                "loan_status",
                self.loan_status.map(|s| ParamValue::enumeration(s.as_str())),
            )
            .with("user_id", self.user_id)
            .with("loan_type_id", self.loan_type_id)
            .with("start_date", self.start_date)
            .with("end_date", self.end_date)
            .with("sort_by", ParamValue::enumeration(self.sort_by().as_str()))
            .with("order", ParamValue::enumeration(self.order().as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_transitions() {
        assert!(LoanStatus::Pending.can_approve());
        assert!(LoanStatus::Rejected.can_approve());
        assert!(!LoanStatus::Approved.can_approve());
        assert!(!LoanStatus::Repaid.can_approve());
        assert!(LoanStatus::Pending.can_reject());
        assert!(!LoanStatus::Rejected.can_reject());
    }

    #[test]
    fn test_default_sort_shares_key_with_explicit_sort() {
        let explicit = LoanFilterParams {
            sort_by: Some(LoanSortBy::CreatedAt),
            order: Some(SortOrder::Desc),
            ..Default::default()
        };
        assert_eq!(
            explicit.to_query_params(),
            LoanFilterParams::default().to_query_params()
        );
    }
}
