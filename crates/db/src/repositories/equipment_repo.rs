//! Repository for the `equipment` table.

use sqlx::PgPool;
use agrobot_core::types::{DbId, Timestamp};

use crate::models::equipment::{CreateEquipment, Equipment, UpdateEquipment};

const COLUMNS: &str =
    "id, name, description, (image IS NOT NULL) AS has_image, created_at, updated_at";

/// Provides CRUD operations for equipment.
pub struct EquipmentRepo;

impl EquipmentRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateEquipment,
        image: Option<&[u8]>,
    ) -> Result<Equipment, sqlx::Error> {
        let query = format!(
            "INSERT INTO equipment (name, description, image) VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Equipment>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(image)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Equipment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM equipment WHERE id = $1");
        sqlx::query_as::<_, Equipment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_image(pool: &PgPool, id: DbId) -> Result<Option<Vec<u8>>, sqlx::Error> {
        sqlx::query_scalar::<_, Vec<u8>>(
            "SELECT image FROM equipment WHERE id = $1 AND image IS NOT NULL",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<Equipment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM equipment ORDER BY name, id");
        sqlx::query_as::<_, Equipment>(&query).fetch_all(pool).await
    }

    /// List equipment not attached to any configuration overlapping `[start, end]`.
    pub async fn list_available(
        pool: &PgPool,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<Vec<Equipment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM equipment e \
             WHERE NOT EXISTS ( \
                SELECT 1 FROM configurations c \
                WHERE c.equipment_id = e.id AND c.start_date <= $2 AND c.end_date >= $1 \
             ) \
             ORDER BY name, id"
        );
        sqlx::query_as::<_, Equipment>(&query)
            .bind(start)
            .bind(end)
            .fetch_all(pool)
            .await
    }

    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateEquipment,
        image: Option<&[u8]>,
    ) -> Result<Option<Equipment>, sqlx::Error> {
        let query = format!(
            "UPDATE equipment SET \
                name = COALESCE($2, name), \
                description = COALESCE($3, description), \
                image = COALESCE($4, image), \
                updated_at = now() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Equipment>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(image)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM equipment WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
