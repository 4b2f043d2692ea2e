//! Read-only access to the seeded activity lookup tables.

use sqlx::PgPool;
use agrobot_core::types::DbId;

use crate::models::activity::{Activity, ActivityCategory};

const ACTIVITY_SELECT: &str = "SELECT a.id, a.name, a.category_id, c.name AS category_name \
    FROM activities a JOIN activity_categories c ON c.id = a.category_id";

pub struct ActivityRepo;

impl ActivityRepo {
    pub async fn list_categories(pool: &PgPool) -> Result<Vec<ActivityCategory>, sqlx::Error> {
        sqlx::query_as::<_, ActivityCategory>(
            "SELECT id, name FROM activity_categories ORDER BY name",
        )
        .fetch_all(pool)
        .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<Activity>, sqlx::Error> {
        let query = format!("{ACTIVITY_SELECT} ORDER BY a.name");
        sqlx::query_as::<_, Activity>(&query).fetch_all(pool).await
    }

    pub async fn list_by_category(
        pool: &PgPool,
        category_id: DbId,
    ) -> Result<Vec<Activity>, sqlx::Error> {
        let query = format!("{ACTIVITY_SELECT} WHERE a.category_id = $1 ORDER BY a.name");
        sqlx::query_as::<_, Activity>(&query)
            .bind(category_id)
            .fetch_all(pool)
            .await
    }
}
