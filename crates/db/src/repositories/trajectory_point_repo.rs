//! Repository for the `trajectory_points` table.
//!
//! Every read orders by trajectory id, then `ord_id`; map views rely on
//! that order to draw connected segments.

use agrobot_core::projection::GeoPoint;
use agrobot_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::trajectory::{TrajectoryPoint, TrajectoryPointDetail};

/// Columns of a plain point row, `pt` being `trajectory_points`.
const POINT_COLUMNS: &str = "pt.trajectory_id AS id, ST_AsText(pt.point) AS point, \
    ST_X(pt.point) AS longitude, ST_Y(pt.point) AS latitude, \
    pt.ord_id, pt.speed, pt.storage_timestamp";

const ORDERING: &str = "ORDER BY pt.trajectory_id ASC, pt.ord_id ASC";

/// Result of loading points into a trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertPointsOutcome {
    /// All points were written; carries the row count.
    Inserted(u64),
    /// No trajectory with that id exists.
    TrajectoryNotFound,
    /// The trajectory already has points; nothing was written.
    AlreadyPopulated,
}

pub struct TrajectoryPointRepo;

impl TrajectoryPointRepo {
    /// Write `points` as `ord_id` 1..=N of trajectory `trajectory_id`.
    ///
    /// Runs in one transaction. The trajectory row is locked first so two
    /// concurrent loads cannot interleave their sequence numbers.
    pub async fn insert_all(
        pool: &PgPool,
        trajectory_id: DbId,
        points: &[GeoPoint],
    ) -> Result<InsertPointsOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let exists = sqlx::query_scalar::<_, DbId>(
            "SELECT id FROM trajectories WHERE id = $1 FOR UPDATE",
        )
        .bind(trajectory_id)
        .fetch_optional(&mut *tx)
        .await?;
        if exists.is_none() {
            return Ok(InsertPointsOutcome::TrajectoryNotFound);
        }

        let populated = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM trajectory_points WHERE trajectory_id = $1)",
        )
        .bind(trajectory_id)
        .fetch_one(&mut *tx)
        .await?;
        if populated {
            return Ok(InsertPointsOutcome::AlreadyPopulated);
        }

        let inserted = Self::insert_sequence(&mut *tx, trajectory_id, points).await?;
        tx.commit().await?;
        Ok(InsertPointsOutcome::Inserted(inserted))
    }

    /// Insert points one by one on an open connection, numbering from 1.
    ///
    /// The caller owns the transaction.
    pub(crate) async fn insert_sequence(
        conn: &mut PgConnection,
        trajectory_id: DbId,
        points: &[GeoPoint],
    ) -> Result<u64, sqlx::Error> {
        let mut inserted = 0;
        for (ord_id, p) in (1_i32..).zip(points) {
            sqlx::query(
                "INSERT INTO trajectory_points (trajectory_id, ord_id, point, speed) \
                 VALUES ($1, $2, ST_SetSRID(ST_MakePoint($3, $4), 4326), $5)",
            )
            .bind(trajectory_id)
            .bind(ord_id)
            .bind(p.longitude)
            .bind(p.latitude)
            .bind(p.speed)
            .execute(&mut *conn)
            .await?;
            inserted += 1;
        }
        tracing::debug!(trajectory_id, inserted, "Inserted trajectory points");
        Ok(inserted)
    }

    /// Raw points of one trajectory.
    pub async fn list_for_trajectory(
        pool: &PgPool,
        trajectory_id: DbId,
    ) -> Result<Vec<TrajectoryPoint>, sqlx::Error> {
        let query = format!(
            "SELECT {POINT_COLUMNS} FROM trajectory_points pt \
             WHERE pt.trajectory_id = $1 {ORDERING}"
        );
        sqlx::query_as::<_, TrajectoryPoint>(&query)
            .bind(trajectory_id)
            .fetch_all(pool)
            .await
    }

    /// Points of one trajectory with plot, trajectory, robot and activity names.
    ///
    /// A point lying in several plots reports the lowest plot id so each
    /// point still yields exactly one row.
    pub async fn list_detailed(
        pool: &PgPool,
        trajectory_id: DbId,
    ) -> Result<Vec<TrajectoryPointDetail>, sqlx::Error> {
        let query = format!(
            "SELECT pt.trajectory_id AS id, ST_AsText(pt.point) AS point, \
                ST_X(pt.point) AS longitude, ST_Y(pt.point) AS latitude, \
                pt.ord_id, pt.speed, \
                p.name AS plot_name, t.name AS traj_name, \
                r.id AS robot_id, r.name AS robot_name, \
                a.id AS activity_id, a.name AS activity_name \
             FROM trajectory_points pt \
             JOIN trajectories t ON t.id = pt.trajectory_id \
             JOIN robots r ON r.id = t.robot_id \
             JOIN activities a ON a.id = t.activity_id \
             LEFT JOIN LATERAL ( \
                SELECT name FROM plots WHERE ST_Within(pt.point, plots.geom) \
                ORDER BY plots.id LIMIT 1 \
             ) p ON true \
             WHERE pt.trajectory_id = $1 {ORDERING}"
        );
        sqlx::query_as::<_, TrajectoryPointDetail>(&query)
            .bind(trajectory_id)
            .fetch_all(pool)
            .await
    }

    /// Every point, of any trajectory, lying strictly inside a plot.
    pub async fn list_within_plot(
        pool: &PgPool,
        plot_id: DbId,
    ) -> Result<Vec<TrajectoryPoint>, sqlx::Error> {
        let query = format!(
            "SELECT {POINT_COLUMNS} FROM trajectory_points pt \
             JOIN plots p ON ST_Within(pt.point, p.geom) \
             WHERE p.id = $1 {ORDERING}"
        );
        sqlx::query_as::<_, TrajectoryPoint>(&query)
            .bind(plot_id)
            .fetch_all(pool)
            .await
    }

    /// Every stored point.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<TrajectoryPoint>, sqlx::Error> {
        let query = format!("SELECT {POINT_COLUMNS} FROM trajectory_points pt {ORDERING}");
        sqlx::query_as::<_, TrajectoryPoint>(&query)
            .fetch_all(pool)
            .await
    }

    /// Remove the points of a trajectory, keeping the trajectory itself.
    ///
    /// Returns the number of rows removed.
    pub async fn delete_for_trajectory(
        pool: &PgPool,
        trajectory_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM trajectory_points WHERE trajectory_id = $1")
            .bind(trajectory_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
