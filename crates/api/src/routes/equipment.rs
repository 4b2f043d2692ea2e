//! Route definitions for equipment.

use axum::routing::get;
use axum::Router;

use crate::handlers::equipment;
use crate::state::AppState;

/// Routes mounted at `/equipment`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(equipment::list).post(equipment::create))
        .route("/available", get(equipment::available))
        .route(
            "/{id}",
            get(equipment::get_by_id)
                .put(equipment::update)
                .delete(equipment::delete),
        )
        .route("/{id}/image", get(equipment::image))
}
