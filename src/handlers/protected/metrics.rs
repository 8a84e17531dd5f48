// handlers/protected/metrics.rs - GET /meals/metrics

use axum::{extract::State, Extension};

use crate::app::AppState;
use crate::database::MealRepository;
use crate::error::ApiResult;
use crate::metrics::{MealHistory, MetricsSummary};
use crate::middleware::{ApiResponse, SessionUser};

/// GET /meals/metrics - Meal totals and the best on-diet streak
pub async fn metrics_get(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
) -> ApiResult<ApiResponse<MetricsSummary>> {
    let meals = state.store.list_meals_for_user(user.id).await?;
    let on_diet = state.store.count_meals_by_diet(user.id, true).await?;
    let off_diet = state.store.count_meals_by_diet(user.id, false).await?;

    let history = MealHistory::newest_first(meals);
    let summary = MetricsSummary::summarize(&history, on_diet, off_diet);

    tracing::debug!(
        "Metrics for user {}: {} meals, best streak {}",
        user.id,
        summary.total_meals,
        summary.best_on_diet_sequence
    );

    Ok(ApiResponse::success(summary))
}
