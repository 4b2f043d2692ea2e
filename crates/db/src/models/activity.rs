//! Activity lookup models. Both tables are seeded by migrations.

use agrobot_core::types::DbId;
use serde::Serialize;
use sqlx::FromRow;

/// A row from `activity_categories`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ActivityCategory {
    pub id: DbId,
    pub name: String,
}

/// An activity joined with its category name.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Activity {
    pub id: DbId,
    pub name: String,
    pub category_id: DbId,
    pub category_name: String,
}
