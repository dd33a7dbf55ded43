use axum::{Json, extract::State};
use tracing::instrument;

use vaultdesk_cache::{QueryParams, TtlClass, namespaces};
use vaultdesk_core::{ApiResponse, AppError};

use crate::middleware::auth::RequireAnalyticsView;
use crate::modules::analytics::model::AnalyticsSummary;
use crate::modules::analytics::service::AnalyticsService;
use crate::state::AppState;

#[instrument(skip_all, fields(admin.id = admin.id))]
pub async fn get_summary(
    State(state): State<AppState>,
    RequireAnalyticsView(admin): RequireAnalyticsView,
) -> Result<Json<ApiResponse<AnalyticsSummary>>, AppError> {
    let key = state
        .cache
        .derive_key(namespaces::analytics::SUMMARY, Some(admin.id), &QueryParams::new());

    let response = state
        .cache
        .read_through(&key, TtlClass::Short, || async {
            let summary = AnalyticsService::summary(&state.ledger).await?;
            Ok::<_, AppError>(ApiResponse::ok(
                "Analytics summary retrieved successfully",
                summary,
            ))
        })
        .await?;

    Ok(Json(response))
}
