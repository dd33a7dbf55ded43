use anyhow::anyhow;
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use vaultdesk_core::{AppError, PaginatedResponse, SortOrder};

use crate::ledger::Ledger;
use crate::modules::deposits::model::{
    CreateDepositDto, Deposit, DepositFilterParams, DepositSortBy, DepositStatus,
};
use crate::modules::transactions::model::{Transaction, TransactionStatus, TransactionType};

fn reference_number() -> String {
    let id = Uuid::new_v4().simple().to_string().to_uppercase();
    format!("DEP-{}", &id[..12])
}

pub struct DepositService;

impl DepositService {
    pub async fn list_user_deposits(
        ledger: &Ledger,
        user_id: i64,
        filters: &DepositFilterParams,
    ) -> Result<PaginatedResponse<Deposit>, AppError> {
        let tables = ledger.read().await;
        if !tables.users.contains_key(&user_id) {
            return Err(AppError::not_found(anyhow!("User not found")));
        }

        let mut deposits: Vec<Deposit> = tables
            .deposits
            .values()
            .filter(|d| d.user_id == user_id && filters.matches(d))
            .cloned()
            .collect();

        let sort_by = filters.sort_by.unwrap_or(DepositSortBy::CreatedAt);
        let order = filters.order.unwrap_or(SortOrder::Desc);
        deposits.sort_by(|a, b| {
            let ordering = match sort_by {
                DepositSortBy::CreatedAt => a.created_at.cmp(&b.created_at),
                DepositSortBy::Amount => a.amount.total_cmp(&b.amount),
            };
            order.apply(ordering.then(a.id.cmp(&b.id)))
        });

        let page = filters.pagination();
        Ok(PaginatedResponse::new(
            "Deposits retrieved successfully",
            page.slice(&deposits),
            page.page(),
            page.per_page(),
            deposits.len() as i64,
        ))
    }

    /// Records a completed deposit, credits the user's balance and logs the
    /// matching transaction, all under one write lock.
    pub async fn create_deposit(
        ledger: &Ledger,
        user_id: i64,
        admin_id: i64,
        dto: CreateDepositDto,
    ) -> Result<Deposit, AppError> {
        let mut tables = ledger.write().await;
        let user = tables
            .users
            .get_mut(&user_id)
            .ok_or_else(|| AppError::not_found(anyhow!("User not found")))?;
        if !user.is_active {
            return Err(AppError::bad_request(anyhow!(
                "Cannot deposit into an inactive account"
            )));
        }

        let now = Utc::now();
        user.balance += dto.amount;
        user.updated_at = now;

        let deposit = tables.insert_deposit(Deposit {
            id: 0,
            user_id,
            admin_id,
            amount: dto.amount,
            reference_number: reference_number(),
            status: DepositStatus::Completed,
            description: dto.description,
            created_at: now,
        });
        tables.insert_transaction(Transaction {
            id: 0,
            user_id,
            receiver_id: None,
            amount: dto.amount,
            transaction_type: TransactionType::Deposit,
            status: TransactionStatus::Completed,
            created_at: now,
        });

        info!(
            deposit.id = deposit.id,
            user.id = user_id,
            amount = deposit.amount,
            "Deposit recorded"
        );
        Ok(deposit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    use crate::testing::fixtures;

    #[test]
    fn test_reference_number_format() {
        let reference = reference_number();
        assert!(reference.starts_with("DEP-"));
        assert_eq!(reference.len(), 16);
    }

    #[tokio::test]
    async fn test_create_deposit_credits_balance_and_logs_transaction() {
        let ledger = Ledger::new();
        let user = ledger.write().await.insert_user(fixtures::user("ada"));

        let dto = CreateDepositDto {
            amount: 150.25,
            description: Some("Cash at branch".to_string()),
        };
        let deposit = DepositService::create_deposit(&ledger, user.id, 1, dto)
            .await
            .unwrap();

        let tables = ledger.read().await;
        assert_eq!(tables.users[&user.id].balance, user.balance + 150.25);
        assert_eq!(deposit.status, DepositStatus::Completed);
        let transaction = tables.transactions.values().next().unwrap();
        assert_eq!(transaction.transaction_type, TransactionType::Deposit);
        assert_eq!(transaction.amount, 150.25);
    }

    #[tokio::test]
    async fn test_deposit_into_inactive_account_fails() {
        let ledger = Ledger::new();
        let mut inactive = fixtures::user("ada");
        inactive.is_active = false;
        let user = ledger.write().await.insert_user(inactive);

        let dto = CreateDepositDto {
            amount: 10.0,
            description: None,
        };
        let err = DepositService::create_deposit(&ledger, user.id, 1, dto)
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_list_only_returns_the_users_deposits() {
        let ledger = Ledger::new();
        let (ada, bob) = {
            let mut tables = ledger.write().await;
            (
                tables.insert_user(fixtures::user("ada")),
                tables.insert_user(fixtures::user("bob")),
            )
        };
        for (user_id, amount) in [(ada.id, 10.0), (ada.id, 30.0), (bob.id, 99.0)] {
            let dto = CreateDepositDto {
                amount,
                description: None,
            };
            DepositService::create_deposit(&ledger, user_id, 1, dto)
                .await
                .unwrap();
        }

        let filters = DepositFilterParams {
            sort_by: Some(DepositSortBy::Amount),
            order: Some(SortOrder::Asc),
            ..Default::default()
        };
        let page = DepositService::list_user_deposits(&ledger, ada.id, &filters)
            .await
            .unwrap();
        let amounts: Vec<f64> = page.items().iter().map(|d| d.amount).collect();
        assert_eq!(amounts, [10.0, 30.0]);

        let err = DepositService::list_user_deposits(&ledger, 99, &filters)
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }
}
