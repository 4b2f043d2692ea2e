//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Operations that touch more
//! than one statement open their own transaction.

pub mod activity_repo;
pub mod configuration_repo;
pub mod equipment_repo;
pub mod itk_repo;
pub mod plot_repo;
pub mod robot_repo;
pub mod trajectory_point_repo;
pub mod trajectory_repo;

pub use activity_repo::ActivityRepo;
pub use configuration_repo::ConfigurationRepo;
pub use equipment_repo::EquipmentRepo;
pub use itk_repo::ItkRepo;
pub use plot_repo::PlotRepo;
pub use robot_repo::RobotRepo;
pub use trajectory_point_repo::{InsertPointsOutcome, TrajectoryPointRepo};
pub use trajectory_repo::{TrajectoryRepo, UploadedTrajectory};
