//! Handlers for the `/trajectories` resource.
//!
//! Ingestion comes in two flavours. The discrete flow creates a reference
//! (`POST /trajectories`), loads points from a stored file
//! (`POST /trajectories/insert-points`) and resolves the plot afterwards
//! (`POST /trajectories/{id}/resolve-plot`). The upload flow
//! (`POST /trajectories/upload`) does all three in one transaction.

use agrobot_core::error::CoreError;
use agrobot_core::scheduling::validate_window;
use agrobot_core::trajectory_file::{validate_extension, TrajectoryFile};
use agrobot_core::types::DbId;
use agrobot_db::models::trajectory::{CreateTrajectory, PlotMatch, UpdateTrajectory};
use agrobot_db::repositories::{InsertPointsOutcome, PlotRepo, TrajectoryPointRepo, TrajectoryRepo};
use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::files;
use crate::query::PlotWindowParams;
use crate::response::MessageResponse;
use crate::state::AppState;

/// Body of `POST /trajectories/insert-points`.
#[derive(Debug, Deserialize)]
pub struct InsertPointsRequest {
    /// Target trajectory.
    pub id: DbId,
    /// Path of a `.traj` file inside the files directory.
    #[serde(rename = "filePath", alias = "file_path")]
    pub file_path: String,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn ensure_exists(state: &AppState, id: DbId) -> AppResult<()> {
    TrajectoryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Trajectory",
            id,
        }))?;
    Ok(())
}

fn no_containing_plot(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Containing plot for trajectory",
        id,
    })
}

fn multipart_error(e: axum::extract::multipart::MultipartError) -> AppError {
    AppError::BadRequest(e.to_string())
}

fn parse_id_field(field: &str, value: &str) -> AppResult<DbId> {
    value
        .trim()
        .parse()
        .map_err(|_| AppError::BadRequest(format!("'{field}' must be an integer id, got '{value}'")))
}

// ---------------------------------------------------------------------------
// Ingestion
// ---------------------------------------------------------------------------

/// POST /api/v1/trajectories
///
/// Create a trajectory reference with no points.
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateTrajectory>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let trajectory = TrajectoryRepo::create(&state.pool, &input).await?;
    tracing::info!(trajectory_id = trajectory.id, name = %trajectory.name, "Created trajectory");
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Trajectory inserted successfully",
            "trajectory": { "id": trajectory.id },
        })),
    ))
}

/// POST /api/v1/trajectories/insert-points
///
/// Parse a stored `.traj` file, reproject it and write its points as
/// `ord_id` 1..N. Any malformed value rejects the whole file before a
/// single row is written.
pub async fn insert_points(
    State(state): State<AppState>,
    Json(input): Json<InsertPointsRequest>,
) -> AppResult<impl IntoResponse> {
    validate_extension(&input.file_path)?;
    let bytes = files::read_stored(
        &state.config.files_dir,
        &input.file_path,
        state.config.max_upload_bytes,
    )
    .await?;
    let points = TrajectoryFile::parse(&bytes)?.to_geographic();

    match TrajectoryPointRepo::insert_all(&state.pool, input.id, &points).await? {
        InsertPointsOutcome::Inserted(count) => {
            tracing::info!(trajectory_id = input.id, count, "Loaded trajectory points");
            Ok((
                StatusCode::CREATED,
                Json(json!({
                    "message": "Trajectory points inserted successfully",
                    "count": count,
                })),
            ))
        }
        InsertPointsOutcome::TrajectoryNotFound => Err(AppError::Core(CoreError::NotFound {
            entity: "Trajectory",
            id: input.id,
        })),
        InsertPointsOutcome::AlreadyPopulated => Err(AppError::Core(CoreError::Conflict(
            format!("Trajectory {} already has points", input.id),
        ))),
    }
}

/// POST /api/v1/trajectories/upload
///
/// Multipart fields: `name`, `robot_id`, `activity_id`, `file`. The file
/// is parsed and reprojected first, then stored, then the trajectory, its
/// points and its plot are written in one transaction. On failure the
/// stored file is removed again.
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let mut name: Option<String> = None;
    let mut robot_id: Option<DbId> = None;
    let mut activity_id: Option<DbId> = None;
    let mut file_data: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let field_name = field.name().unwrap_or("").to_string();
        match field_name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or("").to_string();
                let data = field.bytes().await.map_err(multipart_error)?;
                file_data = Some((file_name, data.to_vec()));
            }
            "name" => name = Some(field.text().await.map_err(multipart_error)?),
            "robot_id" => {
                let text = field.text().await.map_err(multipart_error)?;
                robot_id = Some(parse_id_field("robot_id", &text)?);
            }
            "activity_id" => {
                let text = field.text().await.map_err(multipart_error)?;
                activity_id = Some(parse_id_field("activity_id", &text)?);
            }
            _ => {}
        }
    }

    let (file_name, data) =
        file_data.ok_or_else(|| AppError::BadRequest("No file uploaded".into()))?;
    let input = CreateTrajectory {
        name: name.ok_or_else(|| AppError::BadRequest("Missing required 'name' field".into()))?,
        robot_id: robot_id
            .ok_or_else(|| AppError::BadRequest("Missing required 'robot_id' field".into()))?,
        activity_id: activity_id
            .ok_or_else(|| AppError::BadRequest("Missing required 'activity_id' field".into()))?,
    };
    input.validate()?;
    validate_extension(&file_name)?;

    let points = TrajectoryFile::parse(&data)?.to_geographic();
    let stored = files::store_upload(&state.config.files_dir, &file_name, &data).await?;

    let uploaded = match TrajectoryRepo::create_with_points(&state.pool, &input, &points).await {
        Ok(uploaded) => uploaded,
        Err(e) => {
            files::remove_quietly(&stored).await;
            return Err(e.into());
        }
    };

    tracing::info!(
        trajectory_id = uploaded.trajectory.id,
        count = uploaded.point_count,
        plot_id = ?uploaded.plot.as_ref().map(|p| p.plot_id),
        "Uploaded trajectory"
    );
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Trajectory uploaded successfully",
            "trajectory": { "id": uploaded.trajectory.id },
            "count": uploaded.point_count,
            "plot_id": uploaded.trajectory.plot_id,
        })),
    ))
}

// ---------------------------------------------------------------------------
// Plot resolution
// ---------------------------------------------------------------------------

/// GET /api/v1/trajectories/plot/{id}
///
/// The plot containing the most points of the trajectory.
pub async fn containing_plot(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<PlotMatch>> {
    ensure_exists(&state, id).await?;
    let plot = TrajectoryRepo::find_containing_plot(&state.pool, id)
        .await?
        .ok_or_else(|| no_containing_plot(id))?;
    Ok(Json(plot))
}

/// POST /api/v1/trajectories/{id}/resolve-plot
///
/// Recompute the containing plot and store it on the trajectory.
pub async fn resolve_plot(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<PlotMatch>> {
    ensure_exists(&state, id).await?;
    let plot = TrajectoryRepo::assign_containing_plot(&state.pool, id)
        .await?
        .ok_or_else(|| no_containing_plot(id))?;
    tracing::info!(trajectory_id = id, plot_id = plot.plot_id, "Resolved trajectory plot");
    Ok(Json(plot))
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

/// GET /api/v1/trajectories
pub async fn list(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let trajectories = TrajectoryRepo::list_summaries(&state.pool).await?;
    Ok(Json(trajectories))
}

/// GET /api/v1/trajectories/{id}
///
/// Points of one trajectory with plot, robot and activity names.
pub async fn get_detailed(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_exists(&state, id).await?;
    let rows = TrajectoryPointRepo::list_detailed(&state.pool, id).await?;
    Ok(Json(rows))
}

/// GET /api/v1/trajectories/{id}/points
pub async fn points(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_exists(&state, id).await?;
    let rows = TrajectoryPointRepo::list_for_trajectory(&state.pool, id).await?;
    Ok(Json(rows))
}

/// GET /api/v1/trajectories/by-plot/{plot_id}
///
/// Every point lying inside the plot, whichever trajectory it belongs to.
pub async fn by_plot(
    State(state): State<AppState>,
    Path(plot_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    PlotRepo::find_by_id(&state.pool, plot_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Plot",
            id: plot_id,
        }))?;
    let rows = TrajectoryPointRepo::list_within_plot(&state.pool, plot_id).await?;
    Ok(Json(rows))
}

/// GET /api/v1/trajectories/points
pub async fn all_points(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let rows = TrajectoryPointRepo::list_all(&state.pool).await?;
    Ok(Json(rows))
}

/// GET /api/v1/trajectories/available?plot_id=&start=&end=
pub async fn available(
    State(state): State<AppState>,
    Query(params): Query<PlotWindowParams>,
) -> AppResult<impl IntoResponse> {
    validate_window(params.start, params.end)?;
    let rows =
        TrajectoryRepo::list_available(&state.pool, params.plot_id, params.start, params.end)
            .await?;
    Ok(Json(rows))
}

// ---------------------------------------------------------------------------
// Mutations
// ---------------------------------------------------------------------------

/// PUT /api/v1/trajectories/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTrajectory>,
) -> AppResult<impl IntoResponse> {
    if input.is_empty() {
        return Err(AppError::BadRequest("No fields provided for update".into()));
    }
    input.validate()?;
    TrajectoryRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Trajectory",
            id,
        }))?;
    Ok(MessageResponse::json("Trajectory updated successfully"))
}

/// DELETE /api/v1/trajectories/points/{id}
///
/// Remove the points of a trajectory, keeping the reference.
pub async fn delete_points(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_exists(&state, id).await?;
    let removed = TrajectoryPointRepo::delete_for_trajectory(&state.pool, id).await?;
    tracing::info!(trajectory_id = id, removed, "Deleted trajectory points");
    Ok(MessageResponse::json(format!(
        "Deleted {removed} points of trajectory {id}"
    )))
}

/// DELETE /api/v1/trajectories/ref/{id}
///
/// Remove a trajectory and its points.
pub async fn delete_ref(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !TrajectoryRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Trajectory",
            id,
        }));
    }
    tracing::info!(trajectory_id = id, "Deleted trajectory");
    Ok(MessageResponse::json("Trajectory deleted successfully"))
}
