//! Repository for the `trajectories` table and plot resolution.

use agrobot_core::projection::GeoPoint;
use agrobot_core::types::{DbId, Timestamp};
use sqlx::{PgConnection, PgPool};

use crate::models::trajectory::{
    AvailableTrajectory, CreateTrajectory, PlotMatch, Trajectory, TrajectorySummary,
    UpdateTrajectory,
};
use crate::repositories::TrajectoryPointRepo;

const COLUMNS: &str = "id, name, robot_id, activity_id, plot_id, created_at, updated_at";

/// Plot holding the most points of trajectory `$1`, ties going to the
/// lowest plot id.
const BEST_PLOT_CTE: &str = "WITH best AS ( \
        SELECT p.id AS plot_id, p.name AS plot_name \
        FROM trajectory_points pt \
        JOIN plots p ON ST_Within(pt.point, p.geom) \
        WHERE pt.trajectory_id = $1 \
        GROUP BY p.id, p.name \
        ORDER BY COUNT(*) DESC, p.id ASC \
        LIMIT 1 \
    )";

/// A trajectory created together with its points.
#[derive(Debug, Clone)]
pub struct UploadedTrajectory {
    pub trajectory: Trajectory,
    pub point_count: u64,
    pub plot: Option<PlotMatch>,
}

/// Provides CRUD and spatial operations for trajectories.
pub struct TrajectoryRepo;

impl TrajectoryRepo {
    /// Insert a trajectory reference with no points yet.
    pub async fn create(pool: &PgPool, input: &CreateTrajectory) -> Result<Trajectory, sqlx::Error> {
        let query = format!(
            "INSERT INTO trajectories (name, robot_id, activity_id) VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Trajectory>(&query)
            .bind(&input.name)
            .bind(input.robot_id)
            .bind(input.activity_id)
            .fetch_one(pool)
            .await
    }

    /// Create a trajectory, load its points and assign its plot atomically.
    ///
    /// Nothing is visible to other sessions until every step succeeded.
    pub async fn create_with_points(
        pool: &PgPool,
        input: &CreateTrajectory,
        points: &[GeoPoint],
    ) -> Result<UploadedTrajectory, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO trajectories (name, robot_id, activity_id) VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        let mut trajectory = sqlx::query_as::<_, Trajectory>(&query)
            .bind(&input.name)
            .bind(input.robot_id)
            .bind(input.activity_id)
            .fetch_one(&mut *tx)
            .await?;

        let point_count =
            TrajectoryPointRepo::insert_sequence(&mut *tx, trajectory.id, points).await?;
        let plot = Self::assign_plot_on(&mut *tx, trajectory.id).await?;
        trajectory.plot_id = plot.as_ref().map(|p| p.plot_id);

        tx.commit().await?;
        Ok(UploadedTrajectory {
            trajectory,
            point_count,
            plot,
        })
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Trajectory>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM trajectories WHERE id = $1");
        sqlx::query_as::<_, Trajectory>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List every trajectory with robot, activity and plot names.
    pub async fn list_summaries(pool: &PgPool) -> Result<Vec<TrajectorySummary>, sqlx::Error> {
        sqlx::query_as::<_, TrajectorySummary>(
            "SELECT t.id, t.name, r.name AS robot_name, a.name AS activity_name, \
                p.name AS plot_name \
             FROM trajectories t \
             LEFT JOIN robots r ON r.id = t.robot_id \
             LEFT JOIN activities a ON a.id = t.activity_id \
             LEFT JOIN plots p ON p.id = t.plot_id \
             ORDER BY t.id",
        )
        .fetch_all(pool)
        .await
    }

    /// Trajectories on `plot_id` not used by a configuration overlapping
    /// `[start, end]`.
    pub async fn list_available(
        pool: &PgPool,
        plot_id: DbId,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<Vec<AvailableTrajectory>, sqlx::Error> {
        sqlx::query_as::<_, AvailableTrajectory>(
            "SELECT t.id, t.name FROM trajectories t \
             WHERE t.plot_id = $1 \
               AND NOT EXISTS ( \
                  SELECT 1 FROM configurations c \
                  WHERE c.trajectory_id = t.id AND c.start_date <= $3 AND c.end_date >= $2 \
               ) \
             ORDER BY t.id",
        )
        .bind(plot_id)
        .bind(start)
        .bind(end)
        .fetch_all(pool)
        .await
    }

    /// Update trajectory metadata. Only non-`None` fields are applied; an
    /// explicit `plot_id: null` clears the plot.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTrajectory,
    ) -> Result<Option<Trajectory>, sqlx::Error> {
        let query = format!(
            "UPDATE trajectories SET \
                name = COALESCE($2, name), \
                robot_id = COALESCE($3, robot_id), \
                activity_id = COALESCE($4, activity_id), \
                plot_id = CASE WHEN $5 THEN $6 ELSE plot_id END, \
                updated_at = now() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Trajectory>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.robot_id)
            .bind(input.activity_id)
            .bind(input.plot_id.is_some())
            .bind(input.plot_id.flatten())
            .fetch_optional(pool)
            .await
    }

    /// The plot containing the most points of a trajectory, without
    /// writing anything.
    pub async fn find_containing_plot(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<PlotMatch>, sqlx::Error> {
        let query = format!("{BEST_PLOT_CTE} SELECT plot_id, plot_name FROM best");
        sqlx::query_as::<_, PlotMatch>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Recompute the containing plot and write it onto the trajectory.
    ///
    /// Returns `None`, leaving `plot_id` untouched, when no point lies in
    /// any plot.
    pub async fn assign_containing_plot(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<PlotMatch>, sqlx::Error> {
        let mut conn = pool.acquire().await?;
        Self::assign_plot_on(&mut *conn, id).await
    }

    async fn assign_plot_on(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<PlotMatch>, sqlx::Error> {
        let query = format!(
            "{BEST_PLOT_CTE} \
             UPDATE trajectories t SET plot_id = best.plot_id, updated_at = now() \
             FROM best WHERE t.id = $1 \
             RETURNING best.plot_id, best.plot_name"
        );
        sqlx::query_as::<_, PlotMatch>(&query)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
    }

    /// Delete a trajectory and its points in one transaction.
    ///
    /// Returns `false` (and changes nothing) if the trajectory does not exist.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let points = sqlx::query("DELETE FROM trajectory_points WHERE trajectory_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        let removed = sqlx::query("DELETE FROM trajectories WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if removed == 0 {
            tx.rollback().await?;
            return Ok(false);
        }
        tx.commit().await?;
        tracing::debug!(trajectory_id = id, points, "Deleted trajectory");
        Ok(true)
    }
}
