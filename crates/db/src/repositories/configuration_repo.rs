//! Repository for the `configurations` (tasks) table.

use agrobot_core::types::DbId;
use sqlx::PgPool;

use crate::models::configuration::{
    Configuration, ConfigurationDetail, ConfigurationSummary, CreateConfiguration, ItkTask,
    UpdateConfiguration,
};

const COLUMNS: &str = "id, robot_id, activity_id, equipment_id, plot_id, itk_id, trajectory_id, \
    start_date, end_date, created_at, updated_at";

/// Provides CRUD operations for configurations.
pub struct ConfigurationRepo;

impl ConfigurationRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateConfiguration,
    ) -> Result<Configuration, sqlx::Error> {
        let query = format!(
            "INSERT INTO configurations \
                (robot_id, activity_id, equipment_id, plot_id, itk_id, trajectory_id, \
                 start_date, end_date) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Configuration>(&query)
            .bind(input.robot_id)
            .bind(input.activity_id)
            .bind(input.equipment_id)
            .bind(input.plot_id)
            .bind(input.itk_id)
            .bind(input.trajectory_id)
            .bind(input.start_date)
            .bind(input.end_date)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Configuration>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM configurations WHERE id = $1");
        sqlx::query_as::<_, Configuration>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// A configuration with every referenced name resolved.
    pub async fn find_detail(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ConfigurationDetail>, sqlx::Error> {
        sqlx::query_as::<_, ConfigurationDetail>(
            "SELECT c.id AS task_id, c.robot_id, c.activity_id, c.equipment_id, \
                c.start_date, c.end_date, c.itk_id, c.plot_id, c.trajectory_id, \
                i.name AS itk_name, p.name AS plot_name, t.name AS trajectory_name, \
                r.name AS robot_name, e.name AS equipment_name, a.name AS activity_name, \
                cat.name AS activity_category_name, cat.id AS activity_category_id \
             FROM configurations c \
             JOIN robots r ON r.id = c.robot_id \
             JOIN activities a ON a.id = c.activity_id \
             JOIN activity_categories cat ON cat.id = a.category_id \
             LEFT JOIN equipment e ON e.id = c.equipment_id \
             LEFT JOIN plots p ON p.id = c.plot_id \
             LEFT JOIN itks i ON i.id = c.itk_id \
             LEFT JOIN trajectories t ON t.id = c.trajectory_id \
             WHERE c.id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Calendar listing ordered by start date.
    pub async fn list_summaries(pool: &PgPool) -> Result<Vec<ConfigurationSummary>, sqlx::Error> {
        sqlx::query_as::<_, ConfigurationSummary>(
            "SELECT c.id, c.start_date, c.end_date, \
                a.id AS activity_id, a.name AS activity_name, \
                r.id AS robot_id, r.name AS robot_name, \
                p.id AS plot_id, p.name AS plot_name \
             FROM configurations c \
             JOIN activities a ON a.id = c.activity_id \
             JOIN robots r ON r.id = c.robot_id \
             LEFT JOIN plots p ON p.id = c.plot_id \
             ORDER BY c.start_date, c.id",
        )
        .fetch_all(pool)
        .await
    }

    /// Ids of the configurations that belong to an ITK.
    pub async fn list_by_itk(pool: &PgPool, itk_id: DbId) -> Result<Vec<ItkTask>, sqlx::Error> {
        sqlx::query_as::<_, ItkTask>(
            "SELECT id AS configuration_id FROM configurations WHERE itk_id = $1 ORDER BY id",
        )
        .bind(itk_id)
        .fetch_all(pool)
        .await
    }

    /// Plain fields use `COALESCE`; the nullable references are written
    /// whenever the key was present, so `null` clears them.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateConfiguration,
    ) -> Result<Option<Configuration>, sqlx::Error> {
        let query = format!(
            "UPDATE configurations SET \
                robot_id = COALESCE($2, robot_id), \
                activity_id = COALESCE($3, activity_id), \
                equipment_id = CASE WHEN $4 THEN $5 ELSE equipment_id END, \
                plot_id = CASE WHEN $6 THEN $7 ELSE plot_id END, \
                itk_id = CASE WHEN $8 THEN $9 ELSE itk_id END, \
                trajectory_id = CASE WHEN $10 THEN $11 ELSE trajectory_id END, \
                start_date = COALESCE($12, start_date), \
                end_date = COALESCE($13, end_date), \
                updated_at = now() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Configuration>(&query)
            .bind(id)
            .bind(input.robot_id)
            .bind(input.activity_id)
            .bind(input.equipment_id.is_some())
            .bind(input.equipment_id.flatten())
            .bind(input.plot_id.is_some())
            .bind(input.plot_id.flatten())
            .bind(input.itk_id.is_some())
            .bind(input.itk_id.flatten())
            .bind(input.trajectory_id.is_some())
            .bind(input.trajectory_id.flatten())
            .bind(input.start_date)
            .bind(input.end_date)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM configurations WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete every configuration of an ITK. Returns the number removed.
    pub async fn delete_by_itk(pool: &PgPool, itk_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM configurations WHERE itk_id = $1")
            .bind(itk_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
