use anyhow::anyhow;
use chrono::Utc;
use tracing::info;

use vaultdesk_core::{AppError, PaginatedResponse};

use crate::ledger::Ledger;
use crate::modules::loans::model::{Loan, LoanFilterParams, LoanSortBy, LoanStatus};

fn loan_not_found() -> AppError {
    AppError::not_found(anyhow!("Loan not found"))
}

pub struct LoanService;

impl LoanService {
    pub async fn list_loans(
        ledger: &Ledger,
        filters: &LoanFilterParams,
    ) -> Result<PaginatedResponse<Loan>, AppError> {
        let tables = ledger.read().await;
        let mut loans: Vec<Loan> = tables
            .loans
            .values()
            .filter(|l| filters.matches(l))
            .cloned()
            .collect();

        let sort_by = filters.sort_by();
        let order = filters.order();
        loans.sort_by(|a, b| {
            let ordering = match sort_by {
                LoanSortBy::CreatedAt => a.created_at.cmp(&b.created_at),
                LoanSortBy::DueDate => a.due_date.cmp(&b.due_date),
                LoanSortBy::LoanAmount => a.loan_amount.total_cmp(&b.loan_amount),
                LoanSortBy::MonthlyInstallment => {
                    a.monthly_installment.total_cmp(&b.monthly_installment)
                }
            };
            order.apply(ordering.then(a.id.cmp(&b.id)))
        });

        let page = filters.pagination();
        Ok(PaginatedResponse::new(
            "Loans retrieved successfully",
            page.slice(&loans),
            page.page(),
            page.per_page(),
            loans.len() as i64,
        ))
    }

    pub async fn get_loan(ledger: &Ledger, loan_id: i64) -> Result<Loan, AppError> {
        ledger
            .read()
            .await
            .loans
            .get(&loan_id)
            .cloned()
            .ok_or_else(loan_not_found)
    }

    /// Approves the loan and credits the borrower with the loan amount.
    pub async fn approve_loan(
        ledger: &Ledger,
        loan_id: i64,
        admin_id: i64,
    ) -> Result<Loan, AppError> {
        let mut tables = ledger.write().await;
        let loan = tables.loans.get(&loan_id).ok_or_else(loan_not_found)?;
        if !loan.status.can_approve() {
            return Err(AppError::bad_request(anyhow!(
                "Loan cannot be approved from status '{}'",
                loan.status.as_str()
            )));
        }
        let (user_id, amount) = (loan.user_id, loan.loan_amount);

        let now = Utc::now();
        let user = tables
            .users
            .get_mut(&user_id)
            .ok_or_else(|| AppError::not_found(anyhow!("Borrower not found")))?;
        user.balance += amount;
        user.updated_at = now;

        let loan = tables.loans.get_mut(&loan_id).ok_or_else(loan_not_found)?;
        loan.status = LoanStatus::Approved;
        loan.decided_by = Some(admin_id);
        loan.decided_at = Some(now);

        info!(loan.id = loan_id, user.id = user_id, amount, "Loan approved");
        Ok(loan.clone())
    }

    pub async fn reject_loan(
        ledger: &Ledger,
        loan_id: i64,
        admin_id: i64,
    ) -> Result<Loan, AppError> {
        let mut tables = ledger.write().await;
        let loan = tables.loans.get_mut(&loan_id).ok_or_else(loan_not_found)?;
        if !loan.status.can_reject() {
            return Err(AppError::bad_request(anyhow!(
                "Only pending loans can be rejected"
            )));
        }

        loan.status = LoanStatus::Rejected;
        loan.decided_by = Some(admin_id);
        loan.decided_at = Some(Utc::now());
        Ok(loan.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use vaultdesk_core::SortOrder;

    use crate::testing::fixtures;

    async fn ledger_with_loan(amount: f64) -> (Ledger, i64, i64) {
        let ledger = Ledger::new();
        let (user_id, loan_id) = {
            let mut tables = ledger.write().await;
            let user = tables.insert_user(fixtures::user("ada"));
            let loan = tables.insert_loan(fixtures::loan(user.id, amount));
            (user.id, loan.id)
        };
        (ledger, user_id, loan_id)
    }

    #[tokio::test]
    async fn test_approve_credits_borrower() {
        let (ledger, user_id, loan_id) = ledger_with_loan(1000.0).await;
        let before = ledger.read().await.users[&user_id].balance;

        let loan = LoanService::approve_loan(&ledger, loan_id, 7).await.unwrap();
        assert_eq!(loan.status, LoanStatus::Approved);
        assert_eq!(loan.decided_by, Some(7));
        assert_eq!(ledger.read().await.users[&user_id].balance, before + 1000.0);

        let err = LoanService::approve_loan(&ledger, loan_id, 7).await.unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_rejected_loan_can_be_approved_later() {
        let (ledger, _, loan_id) = ledger_with_loan(500.0).await;
        LoanService::reject_loan(&ledger, loan_id, 7).await.unwrap();

        let err = LoanService::reject_loan(&ledger, loan_id, 7).await.unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);

        let loan = LoanService::approve_loan(&ledger, loan_id, 8).await.unwrap();
        assert_eq!(loan.status, LoanStatus::Approved);
    }

    #[tokio::test]
    async fn test_list_defaults_to_newest_first() {
        let ledger = Ledger::new();
        {
            let mut tables = ledger.write().await;
            let user = tables.insert_user(fixtures::user("ada"));
            for (days_ago, amount) in [(3, 100.0), (1, 200.0), (2, 300.0)] {
                let mut loan = fixtures::loan(user.id, amount);
                loan.created_at = Utc::now() - chrono::Duration::days(days_ago);
                tables.insert_loan(loan);
            }
        }

        let page = LoanService::list_loans(&ledger, &LoanFilterParams::default())
            .await
            .unwrap();
        let amounts: Vec<f64> = page.items().iter().map(|l| l.loan_amount).collect();
        assert_eq!(amounts, [200.0, 300.0, 100.0]);

        let filters = LoanFilterParams {
            sort_by: Some(LoanSortBy::LoanAmount),
            order: Some(SortOrder::Asc),
            ..Default::default()
        };
        let page = LoanService::list_loans(&ledger, &filters).await.unwrap();
        let amounts: Vec<f64> = page.items().iter().map(|l| l.loan_amount).collect();
        assert_eq!(amounts, [100.0, 200.0, 300.0]);
    }

    #[tokio::test]
    async fn test_missing_loan() {
        let ledger = Ledger::new();
        let err = LoanService::get_loan(&ledger, 1).await.unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }
}
