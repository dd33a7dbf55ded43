use vaultdesk_core::AppError;

use crate::ledger::Ledger;
use crate::modules::analytics::model::{AnalyticsSummary, LoanBreakdown};
use crate::modules::cards::model::CardStatus;
use crate::modules::loans::model::LoanStatus;

pub struct AnalyticsService;

impl AnalyticsService {
    pub async fn summary(ledger: &Ledger) -> Result<AnalyticsSummary, AppError> {
        let tables = ledger.read().await;

        let mut loans = LoanBreakdown::default();
        for loan in tables.loans.values() {
            match loan.status {
                LoanStatus::Pending => loans.pending += 1,
                LoanStatus::Approved => {
                    loans.approved += 1;
                    loans.disbursed_amount += loan.loan_amount;
                }
                LoanStatus::Rejected => loans.rejected += 1,
                LoanStatus::Repaid => loans.repaid += 1,
            }
        }

        Ok(AnalyticsSummary {
            total_users: tables.users.len() as i64,
            active_users: tables.users.values().filter(|u| u.is_active).count() as i64,
            total_balance: tables.users.values().map(|u| u.balance).sum(),
            total_deposits: tables.deposits.len() as i64,
            total_deposit_amount: tables.deposits.values().map(|d| d.amount).sum(),
            loans,
            total_transactions: tables.transactions.len() as i64,
            total_cards: tables.cards.len() as i64,
            blocked_cards: tables
                .cards
                .values()
                .filter(|c| c.status == CardStatus::Blocked)
                .count() as i64,
        })
    }
}
