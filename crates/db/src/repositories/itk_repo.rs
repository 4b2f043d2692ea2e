//! Repository for the `itks` table.

use sqlx::PgPool;
use agrobot_core::types::DbId;

use crate::models::itk::{CreateItk, Itk};

const SELECT_WITH_COUNT: &str = "SELECT i.id, i.name, \
        (SELECT COUNT(*) FROM configurations c WHERE c.itk_id = i.id) AS task_count, \
        i.created_at \
     FROM itks i";

pub struct ItkRepo;

impl ItkRepo {
    pub async fn create(pool: &PgPool, input: &CreateItk) -> Result<Itk, sqlx::Error> {
        sqlx::query_as::<_, Itk>(
            "INSERT INTO itks (name) VALUES ($1) \
             RETURNING id, name, 0::BIGINT AS task_count, created_at",
        )
        .bind(&input.name)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Itk>, sqlx::Error> {
        let query = format!("{SELECT_WITH_COUNT} WHERE i.id = $1");
        sqlx::query_as::<_, Itk>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<Itk>, sqlx::Error> {
        let query = format!("{SELECT_WITH_COUNT} ORDER BY i.name, i.id");
        sqlx::query_as::<_, Itk>(&query).fetch_all(pool).await
    }

    /// Delete an ITK together with its configurations.
    ///
    /// Returns `false` (and changes nothing) if the ITK does not exist.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM configurations WHERE itk_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let removed = sqlx::query("DELETE FROM itks WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if removed == 0 {
            tx.rollback().await?;
            return Ok(false);
        }
        tx.commit().await?;
        Ok(true)
    }
}
