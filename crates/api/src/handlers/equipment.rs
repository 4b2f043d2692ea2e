//! Handlers for the `/equipment` resource.

use agrobot_core::error::CoreError;
use agrobot_core::scheduling::validate_window;
use agrobot_core::types::DbId;
use agrobot_db::models::equipment::{CreateEquipment, UpdateEquipment};
use agrobot_db::repositories::EquipmentRepo;
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::files;
use crate::query::WindowParams;
use crate::response::MessageResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Equipment",
        id,
    })
}

pub async fn list(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    Ok(Json(EquipmentRepo::list(&state.pool).await?))
}

/// GET /api/v1/equipment/available?start=&end=
pub async fn available(
    State(state): State<AppState>,
    Query(params): Query<WindowParams>,
) -> AppResult<impl IntoResponse> {
    validate_window(params.start, params.end)?;
    let equipment = EquipmentRepo::list_available(&state.pool, params.start, params.end).await?;
    Ok(Json(equipment))
}

pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let equipment = EquipmentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(equipment))
}

pub async fn image(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let bytes = EquipmentRepo::find_image(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    let content_type = files::image_content_type(&bytes).unwrap_or("application/octet-stream");
    Ok(([(header::CONTENT_TYPE, content_type)], bytes))
}

pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateEquipment>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let image = files::load_image(
        &state.config.files_dir,
        input.image_path.as_deref(),
        state.config.max_upload_bytes,
    )
    .await?;
    let equipment = EquipmentRepo::create(&state.pool, &input, image.as_deref()).await?;
    Ok((StatusCode::CREATED, Json(equipment)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateEquipment>,
) -> AppResult<impl IntoResponse> {
    if input.is_empty() {
        return Err(AppError::BadRequest("No fields provided for update".into()));
    }
    input.validate()?;
    let image = files::load_image(
        &state.config.files_dir,
        input.image_path.as_deref(),
        state.config.max_upload_bytes,
    )
    .await?;
    EquipmentRepo::update(&state.pool, id, &input, image.as_deref())
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(MessageResponse::json("Equipment updated successfully"))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !EquipmentRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }
    Ok(MessageResponse::json("Equipment deleted successfully"))
}
