use axum::routing::get;
use axum::Router;

use crate::handlers::plot;
use crate::state::AppState;

/// Routes mounted at `/plots`.
///
/// ```text
/// GET  /        -> list
/// POST /        -> create
/// GET  /names   -> list_names
/// GET  /{id}    -> get_by_id
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(plot::list).post(plot::create))
        .route("/names", get(plot::list_names))
        .route("/{id}", get(plot::get_by_id))
}
