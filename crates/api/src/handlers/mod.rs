//! Request handlers, one submodule per resource.
//!
//! Handlers validate input, delegate to the corresponding repository in
//! `agrobot_db` and map errors via [`AppError`](crate::error::AppError).

pub mod activity;
pub mod configuration;
pub mod equipment;
pub mod itk;
pub mod plot;
pub mod robot;
pub mod trajectory;
