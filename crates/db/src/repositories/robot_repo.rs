//! Repository for the `robots` table.

use sqlx::PgPool;
use agrobot_core::types::{DbId, Timestamp};

use crate::models::robot::{CreateRobot, Robot, RobotEssentials, RobotName, UpdateRobot};

/// Column list shared across queries. The image payload is never selected.
const COLUMNS: &str = "id, name, description, locomotion, weight_kg, length_mm, width_mm, \
    height_mm, max_speed_mps, autonomy, manipulation, on_board_sensors, \
    (image IS NOT NULL) AS has_image, created_at, updated_at";

/// Provides CRUD operations for robots.
pub struct RobotRepo;

impl RobotRepo {
    /// Insert a new robot, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateRobot,
        image: Option<&[u8]>,
    ) -> Result<Robot, sqlx::Error> {
        let query = format!(
            "INSERT INTO robots (name, description, locomotion, weight_kg, length_mm, width_mm, \
                height_mm, max_speed_mps, autonomy, manipulation, on_board_sensors, image) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Robot>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.locomotion)
            .bind(input.weight_kg)
            .bind(input.length_mm)
            .bind(input.width_mm)
            .bind(input.height_mm)
            .bind(input.max_speed_mps)
            .bind(&input.autonomy)
            .bind(&input.manipulation)
            .bind(&input.on_board_sensors)
            .bind(image)
            .fetch_one(pool)
            .await
    }

    /// Find a robot by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Robot>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM robots WHERE id = $1");
        sqlx::query_as::<_, Robot>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Fetch the stored picture of a robot, if it has one.
    pub async fn find_image(pool: &PgPool, id: DbId) -> Result<Option<Vec<u8>>, sqlx::Error> {
        sqlx::query_scalar::<_, Vec<u8>>(
            "SELECT image FROM robots WHERE id = $1 AND image IS NOT NULL",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// List all robots ordered by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<Robot>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM robots ORDER BY name, id");
        sqlx::query_as::<_, Robot>(&query).fetch_all(pool).await
    }

    /// List `(id, name)` pairs ordered by name.
    pub async fn list_names(pool: &PgPool) -> Result<Vec<RobotName>, sqlx::Error> {
        sqlx::query_as::<_, RobotName>("SELECT id, name FROM robots ORDER BY name, id")
            .fetch_all(pool)
            .await
    }

    /// List the card-sized projection of every robot.
    pub async fn list_essentials(pool: &PgPool) -> Result<Vec<RobotEssentials>, sqlx::Error> {
        sqlx::query_as::<_, RobotEssentials>(
            "SELECT id, name, description, max_speed_mps, weight_kg, \
                (image IS NOT NULL) AS has_image \
             FROM robots ORDER BY name, id",
        )
        .fetch_all(pool)
        .await
    }

    /// List robots with no configuration overlapping `[start, end]`.
    pub async fn list_available(
        pool: &PgPool,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<Vec<Robot>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM robots r \
             WHERE NOT EXISTS ( \
                SELECT 1 FROM configurations c \
                WHERE c.robot_id = r.id AND c.start_date <= $2 AND c.end_date >= $1 \
             ) \
             ORDER BY name, id"
        );
        sqlx::query_as::<_, Robot>(&query)
            .bind(start)
            .bind(end)
            .fetch_all(pool)
            .await
    }

    /// Update a robot. Only non-`None` fields are applied; `image` replaces
    /// the stored picture when given.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateRobot,
        image: Option<&[u8]>,
    ) -> Result<Option<Robot>, sqlx::Error> {
        let query = format!(
            "UPDATE robots SET \
                name = COALESCE($2, name), \
                description = COALESCE($3, description), \
                locomotion = COALESCE($4, locomotion), \
                weight_kg = COALESCE($5, weight_kg), \
                length_mm = COALESCE($6, length_mm), \
                width_mm = COALESCE($7, width_mm), \
                height_mm = COALESCE($8, height_mm), \
                max_speed_mps = COALESCE($9, max_speed_mps), \
                autonomy = COALESCE($10, autonomy), \
                manipulation = COALESCE($11, manipulation), \
                on_board_sensors = COALESCE($12, on_board_sensors), \
                image = COALESCE($13, image), \
                updated_at = now() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Robot>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.locomotion)
            .bind(input.weight_kg)
            .bind(input.length_mm)
            .bind(input.width_mm)
            .bind(input.height_mm)
            .bind(input.max_speed_mps)
            .bind(&input.autonomy)
            .bind(&input.manipulation)
            .bind(&input.on_board_sensors)
            .bind(image)
            .fetch_optional(pool)
            .await
    }

    /// Delete a robot. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM robots WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
