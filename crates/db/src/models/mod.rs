//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches
//!
//! Nullable references in update DTOs are `Option<Option<_>>`: an absent
//! key leaves the column alone, an explicit `null` clears it.

pub mod activity;
pub mod configuration;
pub mod equipment;
pub mod itk;
pub mod plot;
pub mod robot;
pub mod trajectory;

use serde::{Deserialize, Deserializer};

/// Keep an explicit JSON `null` distinct from an absent key.
///
/// Use with `#[serde(default, deserialize_with = "double_option")]`.
pub fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Some(Option::deserialize(deserializer)?))
}
