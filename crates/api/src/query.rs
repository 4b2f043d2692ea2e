//! Shared query parameter types for API handlers.

use agrobot_core::types::{DbId, Timestamp};
use serde::Deserialize;

/// Booking window (`?start=&end=`), RFC 3339 timestamps.
#[derive(Debug, Deserialize)]
pub struct WindowParams {
    pub start: Timestamp,
    pub end: Timestamp,
}

/// Booking window restricted to one plot.
#[derive(Debug, Deserialize)]
pub struct PlotWindowParams {
    pub plot_id: DbId,
    pub start: Timestamp,
    pub end: Timestamp,
}

/// Optional `?category_id=` filter for activities.
#[derive(Debug, Deserialize)]
pub struct CategoryFilter {
    pub category_id: Option<DbId>,
}
