//! Parsing and validation of robot trajectory files (`.traj`).
//!
//! A trajectory file is JSON:
//!
//! ```json
//! {
//!   "origin": { "coordinates": [lon, lat, alt] },
//!   "points": { "values": [[a, b, speed], [a, b], ...] }
//! }
//! ```
//!
//! `(a, b)` are metre offsets in the robot's local plane, written
//! northing-first. The whole file is rejected on the first malformed value;
//! nothing is ever partially accepted.

use serde::Deserialize;

use crate::error::CoreError;
use crate::projection::{reproject, GeoPoint, LocalPoint, Origin};

/// File extension required for uploaded trajectory logs.
pub const TRAJECTORY_EXTENSION: &str = "traj";

/// Upper bound on the number of points accepted in one file.
pub const MAX_POINTS_PER_TRAJECTORY: usize = 100_000;

#[derive(Debug, Deserialize)]
struct RawTrajectoryFile {
    origin: RawOrigin,
    points: RawPoints,
}

#[derive(Debug, Deserialize)]
struct RawOrigin {
    coordinates: Vec<f64>,
}

#[derive(Debug, Deserialize)]
struct RawPoints {
    values: Vec<Vec<Option<f64>>>,
}

/// A parsed, validated trajectory file.
#[derive(Debug, Clone)]
pub struct TrajectoryFile {
    pub origin: Origin,
    pub points: Vec<LocalPoint>,
}

impl TrajectoryFile {
    /// Parse and validate raw file contents.
    pub fn parse(bytes: &[u8]) -> Result<Self, CoreError> {
        let raw: RawTrajectoryFile = serde_json::from_slice(bytes)
            .map_err(|e| CoreError::Validation(format!("malformed trajectory file: {e}")))?;

        let origin = parse_origin(&raw.origin.coordinates)?;

        if raw.points.values.is_empty() {
            return Err(CoreError::Validation(
                "trajectory file contains no points".to_string(),
            ));
        }
        if raw.points.values.len() > MAX_POINTS_PER_TRAJECTORY {
            return Err(CoreError::Validation(format!(
                "trajectory file has {} points, the maximum is {MAX_POINTS_PER_TRAJECTORY}",
                raw.points.values.len()
            )));
        }

        let points = raw
            .points
            .values
            .iter()
            .enumerate()
            .map(|(index, values)| parse_point(index, values))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { origin, points })
    }

    /// Reproject every point to WGS84, in file order.
    pub fn to_geographic(&self) -> Vec<GeoPoint> {
        reproject(&self.origin, &self.points)
    }
}

fn parse_origin(coordinates: &[f64]) -> Result<Origin, CoreError> {
    match *coordinates {
        [lon, lat] => Origin::new(lon, lat, 0.0),
        [lon, lat, alt] => Origin::new(lon, lat, alt),
        _ => Err(CoreError::Validation(format!(
            "origin.coordinates must be [lon, lat, alt], got {} values",
            coordinates.len()
        ))),
    }
}

fn parse_point(index: usize, values: &[Option<f64>]) -> Result<LocalPoint, CoreError> {
    let (a, b, speed) = match *values {
        [a, b] => (a, b, None),
        [a, b, speed] => (a, b, speed),
        _ => {
            return Err(CoreError::Validation(format!(
                "point {index} must have 2 or 3 components, got {}",
                values.len()
            )))
        }
    };

    let (Some(a), Some(b)) = (a, b) else {
        return Err(CoreError::Validation(format!(
            "point {index} is missing a coordinate"
        )));
    };
    if !a.is_finite() || !b.is_finite() {
        return Err(CoreError::Validation(format!(
            "point {index} has a non-finite coordinate"
        )));
    }

    let speed = speed.unwrap_or(0.0);
    if !speed.is_finite() || speed < 0.0 {
        return Err(CoreError::Validation(format!(
            "point {index} has an invalid speed {speed}"
        )));
    }

    // Files are northing-first; the projection takes (easting, northing).
    Ok(LocalPoint {
        easting: b,
        northing: a,
        speed,
    })
}

/// Validate that an uploaded file name carries the `.traj` extension.
pub fn validate_extension(file_name: &str) -> Result<(), CoreError> {
    let ext = std::path::Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();
    if ext.eq_ignore_ascii_case(TRAJECTORY_EXTENSION) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Please upload a .{TRAJECTORY_EXTENSION} file, got '{file_name}'"
        )))
    }
}
