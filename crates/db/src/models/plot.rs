//! Plot (field region) models.
//!
//! Geometry crosses the API boundary as a GeoJSON `Polygon` object and is
//! stored as `geometry(Polygon, 4326)`.

use agrobot_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A plot with its polygon rendered as GeoJSON.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Plot {
    pub id: DbId,
    pub name: String,
    pub geometry: serde_json::Value,
    pub created_at: Timestamp,
}

/// `(id, name)` projection used by selection lists.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PlotName {
    pub id: DbId,
    pub name: String,
}

/// DTO for creating a plot from a GeoJSON polygon.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePlot {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub geometry: geojson::Geometry,
}
