//! Route definitions for robots.

use axum::routing::get;
use axum::Router;

use crate::handlers::robot;
use crate::state::AppState;

/// Routes mounted at `/robots`.
///
/// ```text
/// GET    /             -> list
/// POST   /             -> create
/// GET    /names        -> list_names
/// GET    /essentials   -> list_essentials
/// GET    /available    -> available
/// GET    /{id}         -> get_by_id
/// PUT    /{id}         -> update
/// DELETE /{id}         -> delete
/// GET    /{id}/image   -> image
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(robot::list).post(robot::create))
        .route("/names", get(robot::list_names))
        .route("/essentials", get(robot::list_essentials))
        .route("/available", get(robot::available))
        .route(
            "/{id}",
            get(robot::get_by_id).put(robot::update).delete(robot::delete),
        )
        .route("/{id}/image", get(robot::image))
}
