//! Integration tests for trajectory point storage and plot resolution.
//!
//! Exercises the repository layer against a real PostGIS database:
//! - Contiguous `ord_id` sequences
//! - Ordering across several trajectories
//! - Containing-plot resolution and its tie-break
//! - Transaction rollback on failed writes

use agrobot_core::projection::GeoPoint;
use agrobot_db::models::plot::CreatePlot;
use agrobot_db::models::robot::CreateRobot;
use agrobot_db::models::trajectory::{CreateTrajectory, UpdateTrajectory};
use agrobot_db::repositories::{
    InsertPointsOutcome, PlotRepo, RobotRepo, TrajectoryPointRepo, TrajectoryRepo,
};
use assert_matches::assert_matches;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_robot(name: &str) -> CreateRobot {
    CreateRobot {
        name: name.to_string(),
        description: None,
        locomotion: None,
        weight_kg: None,
        length_mm: None,
        width_mm: None,
        height_mm: None,
        max_speed_mps: None,
        autonomy: None,
        manipulation: None,
        on_board_sensors: None,
        image_path: None,
    }
}

/// Square plot of half-width `half` degrees centred on `(lon, lat)`.
fn square_plot(name: &str, lon: f64, lat: f64, half: f64) -> CreatePlot {
    CreatePlot {
        name: name.to_string(),
        geometry: geojson::Geometry::new(geojson::Value::Polygon(vec![vec![
            vec![lon - half, lat - half],
            vec![lon + half, lat - half],
            vec![lon + half, lat + half],
            vec![lon - half, lat + half],
            vec![lon - half, lat - half],
        ]])),
    }
}

fn point(longitude: f64, latitude: f64, speed: f64) -> GeoPoint {
    GeoPoint {
        longitude,
        latitude,
        speed,
    }
}

/// Points marching east from `(lon, lat)` in 0.0001 degree steps.
fn track(lon: f64, lat: f64, n: usize) -> Vec<GeoPoint> {
    (0..n)
        .map(|i| point(lon + i as f64 * 0.0001, lat, i as f64 * 0.1))
        .collect()
}

async fn activity_id(pool: &PgPool) -> i64 {
    sqlx::query_scalar("SELECT id FROM activities ORDER BY id LIMIT 1")
        .fetch_one(pool)
        .await
        .unwrap()
}

async fn new_trajectory(pool: &PgPool, name: &str) -> i64 {
    let robot = RobotRepo::create(pool, &new_robot(&format!("robot-{name}")), None)
        .await
        .unwrap();
    let input = CreateTrajectory {
        name: name.to_string(),
        robot_id: robot.id,
        activity_id: activity_id(pool).await,
    };
    TrajectoryRepo::create(pool, &input).await.unwrap().id
}

async fn point_rows(pool: &PgPool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM trajectory_points")
        .fetch_one(pool)
        .await
        .unwrap()
}

// ---------------------------------------------------------------------------
// Point storage
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn inserted_points_are_numbered_from_one(pool: PgPool) {
    let id = new_trajectory(&pool, "run-a").await;
    let points = track(3.0, 45.0, 25);

    let outcome = TrajectoryPointRepo::insert_all(&pool, id, &points).await.unwrap();
    assert_eq!(outcome, InsertPointsOutcome::Inserted(25));

    let rows = TrajectoryPointRepo::list_for_trajectory(&pool, id).await.unwrap();
    assert_eq!(rows.len(), 25);
    for (i, row) in rows.iter().enumerate() {
        assert_eq!(row.ord_id, i as i32 + 1);
        assert_eq!(row.id, id);
        assert!((row.longitude - points[i].longitude).abs() < 1e-9);
        assert!((row.latitude - points[i].latitude).abs() < 1e-9);
        assert!((row.speed - points[i].speed).abs() < 1e-9);
    }
    assert!(rows[0].point.starts_with("POINT(3 45"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn second_load_is_refused(pool: PgPool) {
    let id = new_trajectory(&pool, "run-a").await;
    TrajectoryPointRepo::insert_all(&pool, id, &track(3.0, 45.0, 3))
        .await
        .unwrap();

    let again = TrajectoryPointRepo::insert_all(&pool, id, &track(3.0, 45.0, 3))
        .await
        .unwrap();
    assert_eq!(again, InsertPointsOutcome::AlreadyPopulated);
    assert_eq!(point_rows(&pool).await, 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn load_into_missing_trajectory_writes_nothing(pool: PgPool) {
    let outcome = TrajectoryPointRepo::insert_all(&pool, 999_999, &track(3.0, 45.0, 3))
        .await
        .unwrap();
    assert_eq!(outcome, InsertPointsOutcome::TrajectoryNotFound);
    assert_eq!(point_rows(&pool).await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn rows_are_grouped_by_trajectory_then_ordered(pool: PgPool) {
    let first = new_trajectory(&pool, "first").await;
    let second = new_trajectory(&pool, "second").await;
    // Load the later trajectory first so insertion order differs from id order.
    TrajectoryPointRepo::insert_all(&pool, second, &track(3.0, 45.0, 4))
        .await
        .unwrap();
    TrajectoryPointRepo::insert_all(&pool, first, &track(3.0, 45.0, 3))
        .await
        .unwrap();

    let rows = TrajectoryPointRepo::list_all(&pool).await.unwrap();
    let keys: Vec<(i64, i32)> = rows.iter().map(|r| (r.id, r.ord_id)).collect();
    assert_eq!(
        keys,
        vec![
            (first, 1),
            (first, 2),
            (first, 3),
            (second, 1),
            (second, 2),
            (second, 3),
            (second, 4),
        ]
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn points_within_plot_only_lists_inside_points(pool: PgPool) {
    let plot = PlotRepo::create(&pool, &square_plot("north field", 3.0, 45.0, 0.00025))
        .await
        .unwrap();
    let id = new_trajectory(&pool, "crossing").await;
    // Five points 0.0001 apart starting at the centre: the first three are inside.
    TrajectoryPointRepo::insert_all(&pool, id, &track(3.0, 45.0, 5))
        .await
        .unwrap();

    let rows = TrajectoryPointRepo::list_within_plot(&pool, plot.id).await.unwrap();
    assert_eq!(rows.iter().map(|r| r.ord_id).collect::<Vec<_>>(), vec![1, 2, 3]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn detailed_rows_carry_names(pool: PgPool) {
    PlotRepo::create(&pool, &square_plot("north field", 3.0, 45.0, 0.01))
        .await
        .unwrap();
    let id = new_trajectory(&pool, "detailed").await;
    TrajectoryPointRepo::insert_all(&pool, id, &track(3.0, 45.0, 2))
        .await
        .unwrap();

    let rows = TrajectoryPointRepo::list_detailed(&pool, id).await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].traj_name, "detailed");
    assert_eq!(rows[0].robot_name, "robot-detailed");
    assert_eq!(rows[0].plot_name.as_deref(), Some("north field"));
    assert_eq!(rows[1].ord_id, 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deleting_points_keeps_the_reference(pool: PgPool) {
    let id = new_trajectory(&pool, "run-a").await;
    TrajectoryPointRepo::insert_all(&pool, id, &track(3.0, 45.0, 6))
        .await
        .unwrap();

    let removed = TrajectoryPointRepo::delete_for_trajectory(&pool, id).await.unwrap();
    assert_eq!(removed, 6);
    assert!(TrajectoryRepo::find_by_id(&pool, id).await.unwrap().is_some());

    // Once empty, the trajectory accepts a fresh load.
    let outcome = TrajectoryPointRepo::insert_all(&pool, id, &track(3.0, 45.0, 2))
        .await
        .unwrap();
    assert_eq!(outcome, InsertPointsOutcome::Inserted(2));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deleting_trajectory_removes_points(pool: PgPool) {
    let id = new_trajectory(&pool, "run-a").await;
    TrajectoryPointRepo::insert_all(&pool, id, &track(3.0, 45.0, 4))
        .await
        .unwrap();

    assert!(TrajectoryRepo::delete(&pool, id).await.unwrap());
    assert!(TrajectoryRepo::find_by_id(&pool, id).await.unwrap().is_none());
    assert_eq!(point_rows(&pool).await, 0);
    assert!(!TrajectoryRepo::delete(&pool, id).await.unwrap());
}

// ---------------------------------------------------------------------------
// Plot resolution
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn resolves_the_only_containing_plot(pool: PgPool) {
    let field = PlotRepo::create(&pool, &square_plot("field", 3.0, 45.0, 0.01))
        .await
        .unwrap();
    PlotRepo::create(&pool, &square_plot("elsewhere", 4.0, 46.0, 0.01))
        .await
        .unwrap();
    let id = new_trajectory(&pool, "run-a").await;
    TrajectoryPointRepo::insert_all(&pool, id, &track(3.0, 45.0, 10))
        .await
        .unwrap();

    let found = TrajectoryRepo::find_containing_plot(&pool, id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.plot_id, field.id);
    assert_eq!(found.plot_name, "field");

    // Lookup alone does not write.
    let before = TrajectoryRepo::find_by_id(&pool, id).await.unwrap().unwrap();
    assert_eq!(before.plot_id, None);

    let assigned = TrajectoryRepo::assign_containing_plot(&pool, id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(assigned, found);
    let after = TrajectoryRepo::find_by_id(&pool, id).await.unwrap().unwrap();
    assert_eq!(after.plot_id, Some(field.id));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn majority_plot_wins(pool: PgPool) {
    // West plot holds ord 1-2, east plot holds ord 3-6.
    PlotRepo::create(&pool, &square_plot("west", 3.00005, 45.0, 0.00009))
        .await
        .unwrap();
    let east = PlotRepo::create(&pool, &square_plot("east", 3.00035, 45.0, 0.00019))
        .await
        .unwrap();
    let id = new_trajectory(&pool, "run-a").await;
    TrajectoryPointRepo::insert_all(&pool, id, &track(3.0, 45.0, 6))
        .await
        .unwrap();

    let found = TrajectoryRepo::find_containing_plot(&pool, id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.plot_id, east.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn ties_go_to_the_lowest_plot_id(pool: PgPool) {
    let first = PlotRepo::create(&pool, &square_plot("first", 3.0, 45.0, 0.01))
        .await
        .unwrap();
    PlotRepo::create(&pool, &square_plot("overlapping", 3.0, 45.0, 0.02))
        .await
        .unwrap();
    let id = new_trajectory(&pool, "run-a").await;
    TrajectoryPointRepo::insert_all(&pool, id, &track(3.0, 45.0, 3))
        .await
        .unwrap();

    let found = TrajectoryRepo::find_containing_plot(&pool, id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.plot_id, first.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn no_containing_plot_leaves_trajectory_untouched(pool: PgPool) {
    PlotRepo::create(&pool, &square_plot("far away", 10.0, 50.0, 0.01))
        .await
        .unwrap();
    let id = new_trajectory(&pool, "run-a").await;
    TrajectoryPointRepo::insert_all(&pool, id, &track(3.0, 45.0, 3))
        .await
        .unwrap();

    assert!(TrajectoryRepo::find_containing_plot(&pool, id).await.unwrap().is_none());
    assert!(TrajectoryRepo::assign_containing_plot(&pool, id).await.unwrap().is_none());
    let trajectory = TrajectoryRepo::find_by_id(&pool, id).await.unwrap().unwrap();
    assert_eq!(trajectory.plot_id, None);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn plot_can_be_set_and_cleared_by_update(pool: PgPool) {
    let field = PlotRepo::create(&pool, &square_plot("field", 3.0, 45.0, 0.01))
        .await
        .unwrap();
    let id = new_trajectory(&pool, "headland").await;

    let set = UpdateTrajectory {
        plot_id: Some(Some(field.id)),
        ..Default::default()
    };
    let updated = TrajectoryRepo::update(&pool, id, &set).await.unwrap().unwrap();
    assert_eq!(updated.plot_id, Some(field.id));

    let rename = UpdateTrajectory {
        name: Some("headland pass".to_string()),
        ..Default::default()
    };
    let updated = TrajectoryRepo::update(&pool, id, &rename).await.unwrap().unwrap();
    assert_eq!(updated.plot_id, Some(field.id));

    let clear: UpdateTrajectory = serde_json::from_str(r#"{"plot_id": null}"#).unwrap();
    assert!(!clear.is_empty());
    let updated = TrajectoryRepo::update(&pool, id, &clear).await.unwrap().unwrap();
    assert_eq!(updated.plot_id, None);
    assert_eq!(updated.name, "headland pass");
}

// ---------------------------------------------------------------------------
// Atomic upload
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_with_points_assigns_plot(pool: PgPool) {
    let field = PlotRepo::create(&pool, &square_plot("field", 3.0, 45.0, 0.01))
        .await
        .unwrap();
    let robot = RobotRepo::create(&pool, &new_robot("rover"), None).await.unwrap();
    let input = CreateTrajectory {
        name: "uploaded".to_string(),
        robot_id: robot.id,
        activity_id: activity_id(&pool).await,
    };

    let uploaded = TrajectoryRepo::create_with_points(&pool, &input, &track(3.0, 45.0, 8))
        .await
        .unwrap();
    assert_eq!(uploaded.point_count, 8);
    assert_eq!(uploaded.trajectory.plot_id, Some(field.id));
    assert_eq!(uploaded.plot.map(|p| p.plot_name).as_deref(), Some("field"));

    let stored = TrajectoryRepo::find_by_id(&pool, uploaded.trajectory.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.plot_id, Some(field.id));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn failed_point_insert_rolls_back_the_trajectory(pool: PgPool) {
    let robot = RobotRepo::create(&pool, &new_robot("rover"), None).await.unwrap();
    let input = CreateTrajectory {
        name: "broken".to_string(),
        robot_id: robot.id,
        activity_id: activity_id(&pool).await,
    };
    // A negative speed violates the column check on the third row.
    let mut points = track(3.0, 45.0, 4);
    points[2].speed = -1.0;

    let result = TrajectoryRepo::create_with_points(&pool, &input, &points).await;
    assert_matches!(result, Err(sqlx::Error::Database(_)));

    let trajectories: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM trajectories")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(trajectories, 0);
    assert_eq!(point_rows(&pool).await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_robot_is_a_foreign_key_violation(pool: PgPool) {
    let input = CreateTrajectory {
        name: "orphan".to_string(),
        robot_id: 999_999,
        activity_id: activity_id(&pool).await,
    };
    let result = TrajectoryRepo::create_with_points(&pool, &input, &track(3.0, 45.0, 2)).await;
    assert_matches!(
        result,
        Err(sqlx::Error::Database(e)) if e.code().as_deref() == Some("23503")
    );
    assert_eq!(point_rows(&pool).await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn plot_altitude_is_dropped_on_insert(pool: PgPool) {
    let input = CreatePlot {
        name: "terrace".to_string(),
        geometry: geojson::Geometry::new(geojson::Value::Polygon(vec![vec![
            vec![3.0, 45.0, 210.0],
            vec![3.01, 45.0, 212.0],
            vec![3.01, 45.01, 215.0],
            vec![3.0, 45.0, 210.0],
        ]])),
    };
    let plot = PlotRepo::create(&pool, &input).await.unwrap();

    let ring = plot.geometry["coordinates"][0].as_array().unwrap();
    assert_eq!(ring.len(), 4);
    assert!(ring.iter().all(|p| p.as_array().unwrap().len() == 2));
}
