//! Local tangent-plane to WGS84 reprojection.
//!
//! Robots log their positions as metre offsets in an azimuthal-equidistant
//! plane centred on a surveyed origin. The ellipsoidal inverse of that
//! projection is the geodesic direct problem: walk `hypot(x, y)` metres
//! from the origin along azimuth `atan2(x, y)`.

use geo::{GeodesicDestination, Point};
use serde::Serialize;

use crate::error::CoreError;

/// Offsets shorter than this (metres) map onto the origin itself.
const ORIGIN_EPSILON_M: f64 = 1e-10;

/// Centre of a robot's local tangent plane.
///
/// Altitude is carried for completeness; the planar transform ignores it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Origin {
    pub longitude: f64,
    pub latitude: f64,
    pub altitude: f64,
}

impl Origin {
    /// Build a validated origin.
    ///
    /// Longitude must lie in `[-180, 180]` and latitude in `[-90, 90]`.
    /// A polar origin is valid; offsets then head away from the pole along
    /// the meridian picked by the azimuth.
    pub fn new(longitude: f64, latitude: f64, altitude: f64) -> Result<Self, CoreError> {
        if !longitude.is_finite() || !latitude.is_finite() || !altitude.is_finite() {
            return Err(CoreError::Validation(
                "origin coordinates must be finite numbers".to_string(),
            ));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(CoreError::Validation(format!(
                "origin longitude must be within [-180, 180], got {longitude}"
            )));
        }
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(CoreError::Validation(format!(
                "origin latitude must be within [-90, 90], got {latitude}"
            )));
        }
        Ok(Self {
            longitude,
            latitude,
            altitude,
        })
    }
}

/// A point in the local plane, already in projection axis order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalPoint {
    /// Metres east of the origin.
    pub easting: f64,
    /// Metres north of the origin.
    pub northing: f64,
    /// Speed recorded at this point (m/s).
    pub speed: f64,
}

/// A reprojected point in WGS84 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoPoint {
    pub longitude: f64,
    pub latitude: f64,
    pub speed: f64,
}

/// Azimuthal-equidistant projection on the WGS84 ellipsoid.
#[derive(Debug, Clone, Copy)]
pub struct AzimuthalEquidistant {
    center: Point<f64>,
}

impl AzimuthalEquidistant {
    pub fn centered_at(origin: &Origin) -> Self {
        Self {
            center: Point::new(origin.longitude, origin.latitude),
        }
    }

    /// Map local `(easting, northing)` metres to `(longitude, latitude)`.
    pub fn inverse(&self, easting: f64, northing: f64) -> (f64, f64) {
        let distance = easting.hypot(northing);
        if distance < ORIGIN_EPSILON_M {
            return (self.center.x(), self.center.y());
        }
        let azimuth = easting.atan2(northing).to_degrees();
        let destination = self.center.geodesic_destination(azimuth, distance);
        (destination.x(), destination.y())
    }
}

/// Reproject an ordered run of local points, preserving order and speed.
pub fn reproject(origin: &Origin, points: &[LocalPoint]) -> Vec<GeoPoint> {
    let projection = AzimuthalEquidistant::centered_at(origin);
    points
        .iter()
        .map(|p| {
            let (longitude, latitude) = projection.inverse(p.easting, p.northing);
            GeoPoint {
                longitude,
                latitude,
                speed: p.speed,
            }
        })
        .collect()
}
