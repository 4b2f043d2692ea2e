//! Robot entity model and DTOs.
//!
//! Robot pictures are stored as raw bytes in `robots.image` and are never
//! serialized into listings; rows only report whether one exists.

use agrobot_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `robots` table, without the image payload.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Robot {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub locomotion: Option<String>,
    pub weight_kg: Option<f64>,
    pub length_mm: Option<i32>,
    pub width_mm: Option<i32>,
    pub height_mm: Option<i32>,
    pub max_speed_mps: Option<f64>,
    pub autonomy: Option<String>,
    pub manipulation: Option<String>,
    pub on_board_sensors: Option<String>,
    pub has_image: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// `(id, name)` projection used by selection lists.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RobotName {
    pub id: DbId,
    pub name: String,
}

/// Card-sized projection of a robot.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RobotEssentials {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub max_speed_mps: Option<f64>,
    pub weight_kg: Option<f64>,
    pub has_image: bool,
}

/// DTO for creating a new robot.
///
/// `image_path` names a file previously stored in the files directory;
/// the API layer reads it and hands the bytes to the repository.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateRobot {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub description: Option<String>,
    pub locomotion: Option<String>,
    #[validate(range(min = 0.0))]
    pub weight_kg: Option<f64>,
    #[validate(range(min = 0))]
    pub length_mm: Option<i32>,
    #[validate(range(min = 0))]
    pub width_mm: Option<i32>,
    #[validate(range(min = 0))]
    pub height_mm: Option<i32>,
    #[validate(range(min = 0.0))]
    pub max_speed_mps: Option<f64>,
    pub autonomy: Option<String>,
    pub manipulation: Option<String>,
    pub on_board_sensors: Option<String>,
    #[serde(alias = "imagePath")]
    pub image_path: Option<String>,
}

/// DTO for updating a robot. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateRobot {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub locomotion: Option<String>,
    #[validate(range(min = 0.0))]
    pub weight_kg: Option<f64>,
    #[validate(range(min = 0))]
    pub length_mm: Option<i32>,
    #[validate(range(min = 0))]
    pub width_mm: Option<i32>,
    #[validate(range(min = 0))]
    pub height_mm: Option<i32>,
    #[validate(range(min = 0.0))]
    pub max_speed_mps: Option<f64>,
    pub autonomy: Option<String>,
    pub manipulation: Option<String>,
    pub on_board_sensors: Option<String>,
    #[serde(alias = "imagePath")]
    pub image_path: Option<String>,
}

impl UpdateRobot {
    /// Whether the patch carries no field at all.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.locomotion.is_none()
            && self.weight_kg.is_none()
            && self.length_mm.is_none()
            && self.width_mm.is_none()
            && self.height_mm.is_none()
            && self.max_speed_mps.is_none()
            && self.autonomy.is_none()
            && self.manipulation.is_none()
            && self.on_board_sensors.is_none()
            && self.image_path.is_none()
    }
}
