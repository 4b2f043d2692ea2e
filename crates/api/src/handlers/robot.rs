//! Handlers for the `/robots` resource.
//!
//! Pictures are referenced by `image_path`, a file already stored in the
//! files directory. The bytes are checked with `image::guess_format` before
//! being written to the row.

use agrobot_core::error::CoreError;
use agrobot_core::scheduling::validate_window;
use agrobot_core::types::DbId;
use agrobot_db::models::robot::{CreateRobot, UpdateRobot};
use agrobot_db::repositories::RobotRepo;
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
    AppError::Core(CoreError::NotFound { entity: "Robot", id })
}

/// GET /api/v1/robots
pub async fn list(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let robots = RobotRepo::list(&state.pool).await?;
    Ok(Json(robots))
}

/// GET /api/v1/robots/names
pub async fn list_names(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let names = RobotRepo::list_names(&state.pool).await?;
    Ok(Json(names))
}

/// GET /api/v1/robots/essentials
pub async fn list_essentials(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let robots = RobotRepo::list_essentials(&state.pool).await?;
    Ok(Json(robots))
}

/// GET /api/v1/robots/available?start=&end=
///
/// Robots with no configuration overlapping the window.
pub async fn available(
    State(state): State<AppState>,
    Query(params): Query<WindowParams>,
) -> AppResult<impl IntoResponse> {
    validate_window(params.start, params.end)?;
    let robots = RobotRepo::list_available(&state.pool, params.start, params.end).await?;
    Ok(Json(robots))
}

/// GET /api/v1/robots/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let robot = RobotRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(robot))
}

/// GET /api/v1/robots/{id}/image
pub async fn image(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let bytes = RobotRepo::find_image(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    let content_type = files::image_content_type(&bytes).unwrap_or("application/octet-stream");
    Ok(([(header::CONTENT_TYPE, content_type)], bytes))
}

/// POST /api/v1/robots
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateRobot>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let image = files::load_image(
        &state.config.files_dir,
        input.image_path.as_deref(),
        state.config.max_upload_bytes,
    )
    .await?;
    let robot = RobotRepo::create(&state.pool, &input, image.as_deref()).await?;
    tracing::info!(robot_id = robot.id, name = %robot.name, "Created robot");
    Ok((StatusCode::CREATED, Json(robot)))
}

/// PUT /api/v1/robots/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateRobot>,
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
    RobotRepo::update(&state.pool, id, &input, image.as_deref())
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(MessageResponse::json("Robot updated successfully"))
}

/// DELETE /api/v1/robots/{id}
///
/// Fails with 409 while trajectories or configurations still use the robot.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !RobotRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }
    tracing::info!(robot_id = id, "Deleted robot");
    Ok(MessageResponse::json("Robot deleted successfully"))
}
