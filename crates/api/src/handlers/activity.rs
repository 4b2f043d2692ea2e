//! Handlers for the read-only `/activities` lookups.

use agrobot_db::repositories::ActivityRepo;
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;

use crate::error::AppResult;
use crate::query::CategoryFilter;
use crate::state::AppState;

/// GET /api/v1/activities?category_id=
pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<CategoryFilter>,
) -> AppResult<impl IntoResponse> {
    let activities = match filter.category_id {
        Some(category_id) => ActivityRepo::list_by_category(&state.pool, category_id).await?,
        None => ActivityRepo::list(&state.pool).await?,
    };
    Ok(Json(activities))
}

/// GET /api/v1/activities/categories
pub async fn list_categories(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    Ok(Json(ActivityRepo::list_categories(&state.pool).await?))
}
