use serde::{Deserialize, Serialize};

/// Point-in-time totals across the bank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsSummary {
    pub total_users: i64,
    pub active_users: i64,
    pub total_balance: f64,
    pub total_deposits: i64,
    pub total_deposit_amount: f64,
    pub loans: LoanBreakdown,
    pub total_transactions: i64,
    pub total_cards: i64,
    pub blocked_cards: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoanBreakdown {
    pub pending: i64,
    pub approved: i64,
    pub rejected: i64,
    pub repaid: i64,
    /// Principal of every approved loan.
    pub disbursed_amount: f64,
}
