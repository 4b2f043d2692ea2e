//! Handlers for the `/configurations` resource (scheduled tasks).

use agrobot_core::error::CoreError;
use agrobot_core::scheduling::{validate_window, validate_window_update};
use agrobot_core::types::DbId;
use agrobot_db::models::configuration::{CreateConfiguration, UpdateConfiguration};
use agrobot_db::repositories::{ConfigurationRepo, ItkRepo};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use crate::error::{AppError, AppResult};
use crate::response::MessageResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Configuration",
        id,
    })
}

async fn ensure_itk(state: &AppState, itk_id: DbId) -> AppResult<()> {
    ItkRepo::find_by_id(&state.pool, itk_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Itk",
            id: itk_id,
        }))?;
    Ok(())
}

/// GET /api/v1/configurations
pub async fn list(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    Ok(Json(ConfigurationRepo::list_summaries(&state.pool).await?))
}

/// GET /api/v1/configurations/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let detail = ConfigurationRepo::find_detail(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(detail))
}

/// POST /api/v1/configurations
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateConfiguration>,
) -> AppResult<impl IntoResponse> {
    validate_window(input.start_date, input.end_date)?;
    let configuration = ConfigurationRepo::create(&state.pool, &input).await?;
    tracing::info!(
        configuration_id = configuration.id,
        robot_id = configuration.robot_id,
        "Created configuration"
    );
    Ok((StatusCode::CREATED, Json(configuration)))
}

/// PUT /api/v1/configurations/{id}
///
/// A partial window is checked against the stored bounds.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateConfiguration>,
) -> AppResult<impl IntoResponse> {
    if input.is_empty() {
        return Err(AppError::BadRequest("No fields provided for update".into()));
    }
    let current = ConfigurationRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    validate_window_update(
        current.start_date,
        current.end_date,
        input.start_date,
        input.end_date,
    )?;
    ConfigurationRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(MessageResponse::json("Configuration updated successfully"))
}

/// DELETE /api/v1/configurations/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !ConfigurationRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }
    Ok(MessageResponse::json("Configuration deleted successfully"))
}

/// GET /api/v1/configurations/by-itk/{itk_id}
pub async fn list_by_itk(
    State(state): State<AppState>,
    Path(itk_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_itk(&state, itk_id).await?;
    Ok(Json(ConfigurationRepo::list_by_itk(&state.pool, itk_id).await?))
}

/// DELETE /api/v1/configurations/by-itk/{itk_id}
pub async fn delete_by_itk(
    State(state): State<AppState>,
    Path(itk_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_itk(&state, itk_id).await?;
    let removed = ConfigurationRepo::delete_by_itk(&state.pool, itk_id).await?;
    tracing::info!(itk_id, removed, "Deleted configurations of ITK");
    Ok(MessageResponse::json(format!(
        "Deleted {removed} configurations of ITK {itk_id}"
    )))
}
