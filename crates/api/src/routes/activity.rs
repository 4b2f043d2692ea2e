use axum::routing::get;
use axum::Router;

use crate::handlers::activity;
use crate::state::AppState;

/// Routes mounted at `/activities`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(activity::list))
        .route("/categories", get(activity::list_categories))
}
