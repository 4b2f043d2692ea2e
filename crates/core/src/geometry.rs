//! Shape checks for plot polygons received as GeoJSON.

use geo::Polygon;
use geojson::{Geometry, Position, Value};

use crate::error::CoreError;

/// Convert a GeoJSON `Polygon` geometry into a [`geo::Polygon`].
///
/// Every ring needs at least four positions and must be closed. Positions
/// are `[lon, lat]` WGS84 degrees; an altitude value is dropped, so the
/// result is always 2D.
pub fn parse_polygon(geometry: &Geometry) -> Result<Polygon<f64>, CoreError> {
    let Value::Polygon(rings) = &geometry.value else {
        return Err(CoreError::Validation(
            "geometry must be a GeoJSON Polygon".to_string(),
        ));
    };
    if rings.is_empty() {
        return Err(CoreError::Validation(
            "polygon coordinates must be a non-empty array".to_string(),
        ));
    }
    for (index, ring) in rings.iter().enumerate() {
        check_ring(index, ring)?;
    }

    Polygon::<f64>::try_from(geometry.value.clone())
        .map_err(|e| CoreError::Validation(format!("invalid polygon: {e}")))
}

/// Render a polygon back to a 2D GeoJSON geometry.
pub fn to_geojson(polygon: &Polygon<f64>) -> Geometry {
    Geometry::new(Value::from(polygon))
}

fn check_ring(index: usize, ring: &[Position]) -> Result<(), CoreError> {
    if ring.len() < 4 {
        return Err(CoreError::Validation(format!(
            "polygon ring {index} needs at least 4 positions, got {}",
            ring.len()
        )));
    }
    for position in ring {
        check_position(index, position)?;
    }
    if ring[0][..2] != ring[ring.len() - 1][..2] {
        return Err(CoreError::Validation(format!(
            "polygon ring {index} is not closed"
        )));
    }
    Ok(())
}

fn check_position(ring: usize, position: &[f64]) -> Result<(), CoreError> {
    let [x, y, ..] = *position else {
        return Err(CoreError::Validation(format!(
            "polygon ring {ring} has an invalid position"
        )));
    };
    if !(-180.0..=180.0).contains(&x) || !(-90.0..=90.0).contains(&y) {
        return Err(CoreError::Validation(format!(
            "polygon ring {ring} has a position outside WGS84 bounds: [{x}, {y}]"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn polygon(rings: Vec<Vec<Vec<f64>>>) -> Geometry {
        Geometry::new(Value::Polygon(rings))
    }

    fn square() -> Geometry {
        polygon(vec![vec![
            vec![3.0, 43.0],
            vec![3.01, 43.0],
            vec![3.01, 43.01],
            vec![3.0, 43.01],
            vec![3.0, 43.0],
        ]])
    }

    #[test]
    fn accepts_closed_square() {
        let polygon = parse_polygon(&square()).unwrap();
        assert_eq!(polygon.exterior().0.len(), 5);
        assert!(polygon.interiors().is_empty());
    }

    #[test]
    fn accepts_geojson_text() {
        let geometry: Geometry = serde_json::from_str(
            r#"{"type":"Polygon","coordinates":[[[0,0],[1,0],[1,1],[0,0]]]}"#,
        )
        .unwrap();
        assert_eq!(parse_polygon(&geometry).unwrap().exterior().0.len(), 4);
    }

    #[test]
    fn accepts_holes() {
        let geometry = polygon(vec![
            vec![
                vec![0.0, 0.0],
                vec![1.0, 0.0],
                vec![1.0, 1.0],
                vec![0.0, 1.0],
                vec![0.0, 0.0],
            ],
            vec![
                vec![0.2, 0.2],
                vec![0.4, 0.2],
                vec![0.4, 0.4],
                vec![0.2, 0.2],
            ],
        ]);
        assert_eq!(parse_polygon(&geometry).unwrap().interiors().len(), 1);
    }

    #[test]
    fn altitude_is_dropped() {
        let geometry = polygon(vec![vec![
            vec![3.0, 43.0, 120.0],
            vec![3.01, 43.0, 121.0],
            vec![3.01, 43.01, 122.0],
            vec![3.0, 43.0, 120.0],
        ]]);
        let parsed = parse_polygon(&geometry).unwrap();
        let Value::Polygon(rings) = to_geojson(&parsed).value else {
            panic!("expected a polygon");
        };
        assert!(rings[0].iter().all(|p| p.len() == 2));
        assert_eq!(rings[0][1], vec![3.01, 43.0]);
    }

    #[test]
    fn rejects_other_types() {
        let point = Geometry::new(Value::Point(vec![3.0, 43.0]));
        assert_matches!(parse_polygon(&point), Err(CoreError::Validation(_)));
    }

    #[test]
    fn rejects_open_or_short_rings() {
        let open = polygon(vec![vec![
            vec![0.0, 0.0],
            vec![1.0, 0.0],
            vec![1.0, 1.0],
            vec![0.0, 1.0],
        ]]);
        assert_matches!(parse_polygon(&open), Err(CoreError::Validation(msg)) if msg.contains("closed"));

        let short = polygon(vec![vec![vec![0.0, 0.0], vec![1.0, 0.0], vec![0.0, 0.0]]]);
        assert_matches!(parse_polygon(&short), Err(CoreError::Validation(_)));
        assert_matches!(parse_polygon(&polygon(vec![])), Err(CoreError::Validation(_)));
    }

    #[test]
    fn rejects_out_of_bounds_positions() {
        let geometry = polygon(vec![vec![
            vec![0.0, 0.0],
            vec![190.0, 0.0],
            vec![1.0, 1.0],
            vec![0.0, 0.0],
        ]]);
        assert_matches!(parse_polygon(&geometry), Err(CoreError::Validation(_)));
    }
}
