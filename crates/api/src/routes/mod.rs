pub mod activity;
pub mod configuration;
pub mod equipment;
pub mod health;
pub mod itk;
pub mod plot;
pub mod robot;
pub mod trajectory;

use axum::Router;

use crate::config::ServerConfig;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /robots                                          list, create
/// /robots/names                                    (id, name) pairs
/// /robots/essentials                               card projection
/// /robots/available?start=&end=                    free over a window
/// /robots/{id}                                     get, update, delete
/// /robots/{id}/image                               picture bytes
///
/// /equipment                                       list, create
/// /equipment/available?start=&end=                 free over a window
/// /equipment/{id}                                  get, update, delete
/// /equipment/{id}/image                            picture bytes
///
/// /activities?category_id=                         list
/// /activities/categories                           list categories
///
/// /plots                                           list, create (GeoJSON)
/// /plots/names                                     (id, name) pairs
/// /plots/{id}                                      get
///
/// /trajectories                                    list, create reference
/// /trajectories/insert-points                      load points from a stored file
/// /trajectories/upload                             multipart, one transaction
/// /trajectories/points                             every point
/// /trajectories/available?plot_id=&start=&end=     free over a window
/// /trajectories/plot/{id}                          containing plot
/// /trajectories/by-plot/{plot_id}                  points inside a plot
/// /trajectories/points/{id}                        delete points
/// /trajectories/ref/{id}                           delete trajectory
/// /trajectories/{id}                               detailed points, update
/// /trajectories/{id}/points                        raw points
/// /trajectories/{id}/resolve-plot                  recompute and store plot
///
/// /configurations                                  list, create
/// /configurations/{id}                             get, update, delete
/// /configurations/by-itk/{itk_id}                  list ids, delete all
///
/// /itks                                            list, create
/// /itks/{id}                                       get, delete
/// ```
pub fn api_routes(config: &ServerConfig) -> Router<AppState> {
    Router::new()
        .nest("/robots", robot::router())
        .nest("/equipment", equipment::router())
        .nest("/activities", activity::router())
        .nest("/plots", plot::router())
        .nest("/trajectories", trajectory::router(config.max_upload_bytes))
        .nest("/configurations", configuration::router())
        .nest("/itks", itk::router())
}
