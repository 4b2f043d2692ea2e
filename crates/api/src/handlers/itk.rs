//! Handlers for the `/itks` resource.

use agrobot_core::error::CoreError;
use agrobot_core::types::DbId;
use agrobot_db::models::itk::CreateItk;
use agrobot_db::repositories::ItkRepo;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::response::MessageResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Itk", id })
}

pub async fn list(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    Ok(Json(ItkRepo::list(&state.pool).await?))
}

pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let itk = ItkRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(itk))
}

pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateItk>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let itk = ItkRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(itk)))
}

/// DELETE /api/v1/itks/{id}
///
/// Also removes every configuration of the ITK.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !ItkRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }
    tracing::info!(itk_id = id, "Deleted ITK");
    Ok(MessageResponse::json("ITK deleted successfully"))
}
