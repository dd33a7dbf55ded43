use std::fmt::Write as _;

use anyhow::anyhow;
use chrono::Utc;

use vaultdesk_core::{AppError, PaginatedResponse, SortOrder};

use crate::ledger::{Ledger, Tables};
use crate::modules::transactions::model::{
    Transaction, TransactionFilterParams, TransactionSortBy, TransactionType, TransactionView,
};

const CSV_HEADER: &str =
    "TransactionID,Username,Amount,Status,CreatedAt,TransactionType,ReceiverUsername";

/// Rendered CSV export.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvExport {
    pub filename: String,
    pub body: String,
}

fn view(tables: &Tables, transaction: &Transaction) -> TransactionView {
    TransactionView {
        transaction_id: transaction.id,
        user_id: transaction.user_id,
        username: tables.username_of(transaction.user_id).map(str::to_string),
        receiver_id: transaction.receiver_id,
        receiver_username: transaction
            .receiver_id
            .and_then(|id| tables.username_of(id))
            .map(str::to_string),
        amount: transaction.amount,
        transaction_type: transaction.transaction_type,
        status: transaction.status,
        created_at: transaction.created_at,
    }
}

fn filtered(tables: &Tables, filters: &TransactionFilterParams) -> Vec<TransactionView> {
    let mut matched: Vec<&Transaction> = tables
        .transactions
        .values()
        .filter(|t| filters.matches(t))
        .collect();

    let sort_by = filters.sort_by.unwrap_or(TransactionSortBy::CreatedAt);
    let order = filters.order.unwrap_or(SortOrder::Desc);
    matched.sort_by(|a, b| {
        let ordering = match sort_by {
            TransactionSortBy::CreatedAt => a.created_at.cmp(&b.created_at),
            TransactionSortBy::Amount => a.amount.total_cmp(&b.amount),
        };
        order.apply(ordering.then(a.id.cmp(&b.id)))
    });

    matched.into_iter().map(|t| view(tables, t)).collect()
}

/// Quotes a field when it contains a delimiter, a quote or a line break.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn render_csv(rows: &[TransactionView]) -> String {
    let mut out = String::with_capacity(64 * (rows.len() + 1));
    out.push_str(CSV_HEADER);
    out.push_str("\r\n");
    for row in rows {
        let _ = write!(
            out,
            "{},{},{:.2},{},{},{},{}\r\n",
            row.transaction_id,
            csv_field(row.username.as_deref().unwrap_or_default()),
            row.amount,
            row.status.as_str(),
            row.created_at.format("%Y-%m-%d %H:%M:%S"),
            row.transaction_type.as_str(),
            csv_field(row.receiver_username.as_deref().unwrap_or_default()),
        );
    }
    out
}

pub struct TransactionService;

impl TransactionService {
    pub async fn list_transactions(
        ledger: &Ledger,
        filters: &TransactionFilterParams,
    ) -> Result<PaginatedResponse<TransactionView>, AppError> {
        let tables = ledger.read().await;
        let views = filtered(&tables, filters);

        let page = filters.pagination();
        Ok(PaginatedResponse::new(
            "Transactions retrieved successfully",
            page.slice(&views),
            page.page(),
            page.per_page(),
            views.len() as i64,
        ))
    }

    /// Looks up one transaction, optionally requiring a given type.
    pub async fn get_transaction(
        ledger: &Ledger,
        transaction_id: i64,
        expected_type: Option<TransactionType>,
    ) -> Result<TransactionView, AppError> {
        let tables = ledger.read().await;
        tables
            .transactions
            .get(&transaction_id)
            .filter(|t| expected_type.is_none_or(|expected| t.transaction_type == expected))
            .map(|t| view(&tables, t))
            .ok_or_else(|| AppError::not_found(anyhow!("Transaction not found")))
    }

    /// Every transaction matching `filters`, pagination ignored, as CSV.
    pub async fn export_csv(
        ledger: &Ledger,
        filters: &TransactionFilterParams,
    ) -> Result<CsvExport, AppError> {
        let rows = filtered(&*ledger.read().await, filters);
        if rows.is_empty() {
            return Err(AppError::not_found(anyhow!("No transactions found for export")));
        }

        Ok(CsvExport {
            filename: format!(
                "transactions_export_{}.csv",
                Utc::now().format("%Y%m%d_%H%M%S")
            ),
            body: render_csv(&rows),
        })
    }
}
