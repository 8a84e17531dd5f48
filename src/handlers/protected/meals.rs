// handlers/protected/meals.rs - /meals CRUD for the session user

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::Json,
    Extension,
};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::app::AppState;
use crate::database::models::Meal;
use crate::database::MealRepository;
use crate::error::{ApiError, ApiResult};
use crate::middleware::{ApiResponse, NoContent, SessionUser};
use crate::validation;

#[derive(Debug, Serialize)]
pub struct MealList {
    pub meals: Vec<Meal>,
}

#[derive(Debug, Serialize)]
pub struct MealItem {
    pub meal: Meal,
}

/// POST /meals - Record a meal for the session user
pub async fn meal_create(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let Json(body) = payload?;
    let fields = validation::parse_meal_fields(&body)?;

    let meal = Meal::new(user.id, fields);
    state.store.insert_meal(&meal).await?;

    tracing::debug!("User {} created meal {}", user.id, meal.id);
    Ok(StatusCode::CREATED)
}

/// GET /meals - All of the session user's meals, newest first
pub async fn meal_list(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
) -> ApiResult<ApiResponse<MealList>> {
    let meals = state.store.list_meals_for_user(user.id).await?;
    Ok(ApiResponse::success(MealList { meals }))
}

/// GET /meals/:meal_id
pub async fn meal_get(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    Path(meal_id): Path<String>,
) -> ApiResult<ApiResponse<MealItem>> {
    let meal = owned_meal(&state, &user, &meal_id).await?;
    Ok(ApiResponse::success(MealItem { meal }))
}

/// PUT /meals/:meal_id - Replace name, description, diet flag and date
pub async fn meal_update(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    Path(meal_id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<NoContent> {
    let Json(body) = payload?;
    let fields = validation::parse_meal_fields(&body)?;

    let meal = owned_meal(&state, &user, &meal_id).await?;
    state.store.update_meal(meal.id, &fields).await?;

    tracing::debug!("User {} updated meal {}", user.id, meal.id);
    Ok(NoContent)
}

/// DELETE /meals/:meal_id
pub async fn meal_delete(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    Path(meal_id): Path<String>,
) -> ApiResult<NoContent> {
    let meal = owned_meal(&state, &user, &meal_id).await?;

    if !state.store.delete_meal(meal.id, user.id).await? {
        // Deleted by a concurrent request between lookup and delete
        return Err(ApiError::not_found("Meal not found"));
    }

    tracing::debug!("User {} deleted meal {}", user.id, meal.id);
    Ok(NoContent)
}

/// Load a meal and check it belongs to the session user.
///
/// Ids that are not UUIDs cannot name a meal and are reported as missing.
async fn owned_meal(state: &AppState, user: &SessionUser, meal_id: &str) -> ApiResult<Meal> {
    let id = Uuid::parse_str(meal_id).map_err(|_| ApiError::not_found("Meal not found"))?;

    let meal = state
        .store
        .find_meal(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Meal not found"))?;

    if !meal.is_owned_by(user.id) {
        tracing::warn!("User {} attempted to access meal {} owned by {}", user.id, meal.id, meal.user_id);
        return Err(ApiError::unauthorized("Meal does not belong to the current user"));
    }

    Ok(meal)
}
