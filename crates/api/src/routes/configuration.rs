use axum::routing::get;
use axum::Router;

use crate::handlers::configuration;
use crate::state::AppState;

/// Routes mounted at `/configurations`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(configuration::list).post(configuration::create))
        .route(
            "/by-itk/{itk_id}",
            get(configuration::list_by_itk).delete(configuration::delete_by_itk),
        )
        .route(
            "/{id}",
            get(configuration::get_by_id)
                .put(configuration::update)
                .delete(configuration::delete),
        )
}
