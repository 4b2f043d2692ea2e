//! Trajectory and trajectory point models.
//!
//! A trajectory owns an ordered run of points keyed by `(trajectory_id,
//! ord_id)`. Point rows returned to clients use `id` for the owning
//! trajectory so that rows of several trajectories can be grouped by it.

use agrobot_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::double_option;

/// A row from the `trajectories` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Trajectory {
    pub id: DbId,
    pub name: String,
    pub robot_id: DbId,
    pub activity_id: DbId,
    pub plot_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Trajectory listing row with referenced names, no points.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TrajectorySummary {
    pub id: DbId,
    pub name: String,
    pub robot_name: Option<String>,
    pub activity_name: Option<String>,
    pub plot_name: Option<String>,
}

/// `(id, name)` of a trajectory free for booking.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AvailableTrajectory {
    pub id: DbId,
    pub name: String,
}

/// DTO for creating a trajectory reference before its points are loaded.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTrajectory {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub robot_id: DbId,
    pub activity_id: DbId,
}

/// DTO for updating trajectory metadata. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateTrajectory {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub robot_id: Option<DbId>,
    pub activity_id: Option<DbId>,
    /// `null` detaches the trajectory from its plot.
    #[serde(default, deserialize_with = "double_option")]
    pub plot_id: Option<Option<DbId>>,
}

impl UpdateTrajectory {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.robot_id.is_none()
            && self.activity_id.is_none()
            && self.plot_id.is_none()
    }
}

/// The plot holding the most points of a trajectory.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct PlotMatch {
    pub plot_id: DbId,
    pub plot_name: String,
}

/// One stored point.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TrajectoryPoint {
    /// Owning trajectory.
    pub id: DbId,
    /// WKT, e.g. `POINT(3.87 43.61)`.
    pub point: String,
    pub longitude: f64,
    pub latitude: f64,
    pub ord_id: i32,
    pub speed: f64,
    pub storage_timestamp: Timestamp,
}

/// A stored point joined with the names a map view displays.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TrajectoryPointDetail {
    /// Owning trajectory.
    pub id: DbId,
    pub point: String,
    pub longitude: f64,
    pub latitude: f64,
    pub ord_id: i32,
    pub speed: f64,
    pub plot_name: Option<String>,
    pub traj_name: String,
    pub robot_id: DbId,
    pub robot_name: String,
    pub activity_id: DbId,
    pub activity_name: String,
}
