//! Route definitions for trajectories and their points.

use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::trajectory;
use crate::state::AppState;

/// Routes mounted at `/trajectories`.
///
/// Static segments take priority over `{id}`, so `/points` and
/// `/available` never reach the per-trajectory handlers.
///
/// ```text
/// GET    /                    -> list
/// POST   /                    -> create
/// POST   /insert-points       -> insert_points
/// POST   /upload              -> upload (multipart)
/// GET    /points              -> all_points
/// GET    /available           -> available
/// GET    /plot/{id}           -> containing_plot
/// GET    /by-plot/{plot_id}   -> by_plot
/// DELETE /points/{id}         -> delete_points
/// DELETE /ref/{id}            -> delete_ref
/// GET    /{id}                -> get_detailed
/// PUT    /{id}                -> update
/// GET    /{id}/points         -> points
/// POST   /{id}/resolve-plot   -> resolve_plot
/// ```
pub fn router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/", get(trajectory::list).post(trajectory::create))
        .route("/insert-points", post(trajectory::insert_points))
        .route(
            "/upload",
            post(trajectory::upload).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route("/points", get(trajectory::all_points))
        .route("/available", get(trajectory::available))
        .route("/plot/{id}", get(trajectory::containing_plot))
        .route("/by-plot/{plot_id}", get(trajectory::by_plot))
        .route("/points/{id}", delete(trajectory::delete_points))
        .route("/ref/{id}", delete(trajectory::delete_ref))
        .route("/{id}", get(trajectory::get_detailed).put(trajectory::update))
        .route("/{id}/points", get(trajectory::points))
        .route("/{id}/resolve-plot", post(trajectory::resolve_plot))
}
