//! ITK (technical itinerary) models.

use agrobot_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// An ITK with the number of tasks that belong to it.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Itk {
    pub id: DbId,
    pub name: String,
    pub task_count: i64,
    pub created_at: Timestamp,
}

/// DTO for creating an ITK.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateItk {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
}
