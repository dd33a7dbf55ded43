use anyhow::anyhow;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
};
use tracing::{info, instrument};

use vaultdesk_cache::{ParamValue, QueryParams, ToQueryParams, TtlClass, namespaces};
use vaultdesk_core::{ApiResponse, AppError, PaginatedResponse};

use crate::middleware::auth::{RequireTransactionViewAll, RequireTransactionsExport};
use crate::modules::transactions::model::{
    TransactionDetailQuery, TransactionFilterParams, TransactionType, TransactionView,
};
use crate::modules::transactions::service::TransactionService;
use crate::state::AppState;

#[instrument(skip_all, fields(admin.id = admin.id))]
pub async fn list_transactions(
    State(state): State<AppState>,
    RequireTransactionViewAll(admin): RequireTransactionViewAll,
    Query(filters): Query<TransactionFilterParams>,
) -> Result<Json<PaginatedResponse<TransactionView>>, AppError> {
    let key = state.cache.derive_key(
        namespaces::transactions::LIST,
        Some(admin.id),
        &filters.to_query_params(),
    );

    let page = state
        .cache
        .read_through(&key, TtlClass::Short, || {
            TransactionService::list_transactions(&state.ledger, &filters)
        })
        .await?;

    Ok(Json(page))
}

#[instrument(skip_all, fields(admin.id = admin.id, transaction.id = id))]
pub async fn get_transaction(
    State(state): State<AppState>,
    RequireTransactionViewAll(admin): RequireTransactionViewAll,
    Path(id): Path<i64>,
    Query(query): Query<TransactionDetailQuery>,
) -> Result<Json<ApiResponse<TransactionView>>, AppError> {
    let expected_type = query
        .transaction_type
        .as_deref()
        .map(str::parse::<TransactionType>)
        .transpose()
        .map_err(|e| AppError::bad_request(anyhow!(e)))?;

    let params = QueryParams::new().with(
        "transaction_type",
        expected_type.map(|t| ParamValue::enumeration(t.as_str())),
    );
    let key = state
        .cache
        .derive_key(&namespaces::transactions::by_id(id), None, &params);

    let response = state
        .cache
        .read_through(&key, TtlClass::Medium, || async {
            let transaction =
                TransactionService::get_transaction(&state.ledger, id, expected_type).await?;
            Ok::<_, AppError>(ApiResponse::ok(
                "Transaction retrieved successfully",
                transaction,
            ))
        })
        .await?;

    Ok(Json(response))
}

/// Streams the filtered transactions as a CSV attachment. Never cached.
#[instrument(skip_all, fields(admin.id = admin.id))]
pub async fn export_transactions(
    State(state): State<AppState>,
    RequireTransactionsExport(admin): RequireTransactionsExport,
    Query(filters): Query<TransactionFilterParams>,
) -> Result<impl IntoResponse, AppError> {
    let export = TransactionService::export_csv(&state.ledger, &filters).await?;
    info!(filename = %export.filename, "Transactions exported");

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", export.filename),
            ),
        ],
        export.body,
    ))
}
