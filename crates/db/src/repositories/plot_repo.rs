//! Repository for the `plots` table.

use agrobot_core::types::DbId;
use sqlx::PgPool;

use crate::models::plot::{CreatePlot, Plot, PlotName};

const COLUMNS: &str = "id, name, ST_AsGeoJSON(geom)::jsonb AS geometry, created_at";

/// Provides access to plot polygons.
pub struct PlotRepo;

impl PlotRepo {
    /// Insert a plot from a GeoJSON polygon. Any Z ordinate is dropped
    /// before storage; PostGIS rejects anything that is not a `Polygon`.
    pub async fn create(pool: &PgPool, input: &CreatePlot) -> Result<Plot, sqlx::Error> {
        let query = format!(
            "INSERT INTO plots (name, geom) \
             VALUES ($1, ST_SetSRID(ST_Force2D(ST_GeomFromGeoJSON($2)), 4326)) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Plot>(&query)
            .bind(&input.name)
            .bind(input.geometry.to_string())
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Plot>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM plots WHERE id = $1");
        sqlx::query_as::<_, Plot>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<Plot>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM plots ORDER BY name, id");
        sqlx::query_as::<_, Plot>(&query).fetch_all(pool).await
    }

    pub async fn list_names(pool: &PgPool) -> Result<Vec<PlotName>, sqlx::Error> {
        sqlx::query_as::<_, PlotName>("SELECT id, name FROM plots ORDER BY name, id")
            .fetch_all(pool)
            .await
    }
}
