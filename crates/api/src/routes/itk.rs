use axum::routing::get;
use axum::Router;

use crate::handlers::itk;
use crate::state::AppState;

/// Routes mounted at `/itks`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(itk::list).post(itk::create))
        .route("/{id}", get(itk::get_by_id).delete(itk::delete))
}
