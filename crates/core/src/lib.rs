pub mod error;
pub mod geometry;
pub mod projection;
pub mod scheduling;
pub mod storage;
pub mod trajectory_file;
pub mod types;
