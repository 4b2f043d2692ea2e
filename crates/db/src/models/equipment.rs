//! Equipment entity model and DTOs.

use agrobot_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `equipment` table, without the image payload.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Equipment {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub has_image: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a piece of equipment.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateEquipment {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub description: Option<String>,
    #[serde(alias = "imagePath")]
    pub image_path: Option<String>,
}

/// DTO for updating equipment. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateEquipment {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(alias = "imagePath")]
    pub image_path: Option<String>,
}

impl UpdateEquipment {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.image_path.is_none()
    }
}
