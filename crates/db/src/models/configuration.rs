//! Configuration (task) models.
//!
//! A configuration books a robot for an activity over a time window,
//! optionally with equipment, a plot, a trajectory, and a parent ITK.

use agrobot_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::double_option;

/// A row from the `configurations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Configuration {
    pub id: DbId,
    pub robot_id: DbId,
    pub activity_id: DbId,
    pub equipment_id: Option<DbId>,
    pub plot_id: Option<DbId>,
    pub itk_id: Option<DbId>,
    pub trajectory_id: Option<DbId>,
    pub start_date: Timestamp,
    pub end_date: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Calendar listing row.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ConfigurationSummary {
    pub id: DbId,
    pub start_date: Timestamp,
    pub end_date: Timestamp,
    pub activity_id: DbId,
    pub activity_name: String,
    pub robot_id: DbId,
    pub robot_name: String,
    pub plot_id: Option<DbId>,
    pub plot_name: Option<String>,
}

/// Full task view with every referenced name.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ConfigurationDetail {
    pub task_id: DbId,
    pub robot_id: DbId,
    pub activity_id: DbId,
    pub equipment_id: Option<DbId>,
    pub start_date: Timestamp,
    pub end_date: Timestamp,
    pub itk_id: Option<DbId>,
    pub plot_id: Option<DbId>,
    pub trajectory_id: Option<DbId>,
    pub itk_name: Option<String>,
    pub plot_name: Option<String>,
    pub trajectory_name: Option<String>,
    pub robot_name: String,
    pub equipment_name: Option<String>,
    pub activity_name: String,
    pub activity_category_name: String,
    pub activity_category_id: DbId,
}

/// `configuration_id` row for ITK task lookups.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ItkTask {
    pub configuration_id: DbId,
}

/// DTO for creating a configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateConfiguration {
    pub robot_id: DbId,
    pub activity_id: DbId,
    pub equipment_id: Option<DbId>,
    pub plot_id: Option<DbId>,
    pub itk_id: Option<DbId>,
    pub trajectory_id: Option<DbId>,
    pub start_date: Timestamp,
    pub end_date: Timestamp,
}

/// DTO for updating a configuration. Unknown keys are rejected.
///
/// The optional references take `null` to unassign them.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateConfiguration {
    pub robot_id: Option<DbId>,
    pub activity_id: Option<DbId>,
    #[serde(default, deserialize_with = "double_option")]
    pub equipment_id: Option<Option<DbId>>,
    #[serde(default, deserialize_with = "double_option")]
    pub plot_id: Option<Option<DbId>>,
    #[serde(default, deserialize_with = "double_option")]
    pub itk_id: Option<Option<DbId>>,
    #[serde(default, deserialize_with = "double_option")]
    pub trajectory_id: Option<Option<DbId>>,
    pub start_date: Option<Timestamp>,
    pub end_date: Option<Timestamp>,
}

impl UpdateConfiguration {
    pub fn is_empty(&self) -> bool {
        self.robot_id.is_none()
            && self.activity_id.is_none()
            && self.equipment_id.is_none()
            && self.plot_id.is_none()
            && self.itk_id.is_none()
            && self.trajectory_id.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
    }
}
