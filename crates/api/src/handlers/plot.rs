//! Handlers for the `/plots` resource.

use agrobot_core::error::CoreError;
use agrobot_core::geometry::{parse_polygon, to_geojson};
use agrobot_core::types::DbId;
use agrobot_db::models::plot::CreatePlot;
use agrobot_db::repositories::PlotRepo;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

pub async fn list(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    Ok(Json(PlotRepo::list(&state.pool).await?))
}

pub async fn list_names(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    Ok(Json(PlotRepo::list_names(&state.pool).await?))
}

/// GET /api/v1/plots/{id}
///
/// The polygon is returned as a GeoJSON object.
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let plot = PlotRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Plot", id }))?;
    Ok(Json(plot))
}

/// POST /api/v1/plots
///
/// The polygon shape is checked before PostGIS sees it, and the stored
/// boundary is the parsed 2D polygon.
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreatePlot>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let boundary = parse_polygon(&input.geometry)?;
    let input = CreatePlot {
        geometry: to_geojson(&boundary),
        ..input
    };
    let plot = PlotRepo::create(&state.pool, &input).await?;
    tracing::info!(plot_id = plot.id, name = %plot.name, "Created plot");
    Ok((StatusCode::CREATED, Json(plot)))
}
