use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use vaultdesk_cache::{ParamValue, QueryParams, ToQueryParams};
use vaultdesk_core::pagination::deserialize_optional_i64;
use vaultdesk_core::{PageParams, SortOrder};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Deposit,
    Transfer,
    Withdrawal,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Deposit => "deposit",
            TransactionType::Transfer => "transfer",
            TransactionType::Withdrawal => "withdrawal",
        }
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "deposit" => Ok(TransactionType::Deposit),
            "transfer" => Ok(TransactionType::Transfer),
            "withdrawal" => Ok(TransactionType::Withdrawal),
            other => Err(format!("Invalid transaction type '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Failed,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "pending",
            TransactionStatus::Completed => "completed",
            TransactionStatus::Failed => "failed",
        }
    }
}

/// Stored transaction record.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: i64,
    pub user_id: i64,
    /// Counterparty of a transfer.
    pub receiver_id: Option<i64>,
    pub amount: f64,
    pub transaction_type: TransactionType,
    pub status: TransactionStatus,
    pub created_at: DateTime<Utc>,
}

/// Transaction with the usernames of both parties resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionView {
    pub transaction_id: i64,
    pub user_id: i64,
    pub username: Option<String>,
    pub receiver_id: Option<i64>,
    pub receiver_username: Option<String>,
    pub amount: f64,
    pub transaction_type: TransactionType,
    pub status: TransactionStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionSortBy {
    CreatedAt,
    Amount,
}

impl TransactionSortBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionSortBy::CreatedAt => "created_at",
            TransactionSortBy::Amount => "amount",
        }
    }
}

/// Filters shared by the listing and the CSV export.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TransactionFilterParams {
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub page: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub per_page: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub user_id: Option<i64>,
    pub transaction_type: Option<TransactionType>,
    pub transaction_status: Option<TransactionStatus>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub sort_by: Option<TransactionSortBy>,
    pub order: Option<SortOrder>,
}

impl TransactionFilterParams {
    pub fn pagination(&self) -> PageParams {
        PageParams {
            page: self.page,
            per_page: self.per_page,
        }
    }

    pub fn matches(&self, transaction: &Transaction) -> bool {
        let day = transaction.created_at.date_naive();
        self.user_id
            .is_none_or(|id| transaction.user_id == id || transaction.receiver_id == Some(id))
            && self
                .transaction_type
                .is_none_or(|t| transaction.transaction_type == t)
            && self.transaction_status.is_none_or(|s| transaction.status == s)
            && self.start_date.is_none_or(|start| day >= start)
            && self.end_date.is_none_or(|end| day <= end)
    }
}

impl ToQueryParams for TransactionFilterParams {
    fn to_query_params(&self) -> QueryParams {
        let page = self.pagination();
        QueryParams::new()
            .with("page", page.page())
            .with("per_page", page.per_page())
            .with("user_id", self.user_id)
            .with(
                "transaction_type",
                self.transaction_type.map(|t| ParamValue::enumeration(t.as_str())),
            )
            .with(
                "transaction_status",
                self.transaction_status
                    .map(|s| ParamValue::enumeration(s.as_str())),
            )
            .with("start_date", self.start_date)
            .with("end_date", self.end_date)
            .with("sort_by", self.sort_by.map(|s| ParamValue::enumeration(s.as_str())))
            .with("order", self.order.map(|o| ParamValue::enumeration(o.as_str())))
    }
}

/// Query of the detail route. The type stays a raw string so that an
/// unknown value is reported with the API's own error body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransactionDetailQuery {
    pub transaction_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_type_parse() {
        assert_eq!(
            "Transfer".parse::<TransactionType>(),
            Ok(TransactionType::Transfer)
        );
        assert!("refund".parse::<TransactionType>().is_err());
    }

    #[test]
    fn test_user_filter_matches_either_party() {
        let transfer = Transaction {
            id: 1,
            user_id: 1,
            receiver_id: Some(2),
            amount: 10.0,
            transaction_type: TransactionType::Transfer,
            status: TransactionStatus::Completed,
            created_at: Utc::now(),
        };
        let as_receiver = TransactionFilterParams {
            user_id: Some(2),
            ..Default::default()
        };
        assert!(as_receiver.matches(&transfer));

        let stranger = TransactionFilterParams {
            user_id: Some(3),
            ..Default::default()
        };
        assert!(!stranger.matches(&transfer));
    }
}
