//! Projection of raw point records onto the grid.
//!
//! This is the bootstrap step: staged point records become the initial grid
//! table that the resolution-change engine then operates on. Identifiers are
//! deliberately not deduplicated here; consolidation happens through the
//! engine's aggregation path.

use hexnav_cell::{cell_from_latlng, Resolution};
use tracing::debug;

use crate::frame::{Column, GridFrame};
use crate::Result;

/// Default name of the value column produced by raster staging.
pub const BAND_COLUMN: &str = "band_var";

/// One raw point record from the staging seam.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplePoint {
    /// Longitude in degrees (WGS84).
    pub lon: f64,
    /// Latitude in degrees (WGS84).
    pub lat: f64,
    /// Band value carried by the point.
    pub value: f64,
}

impl SamplePoint {
    /// Create a point record.
    pub fn new(lon: f64, lat: f64, value: f64) -> Self {
        Self { lon, lat, value }
    }
}

/// Project points onto the grid at the given resolution.
///
/// Produces a frame with the identifier column and one additive value column.
/// Non-finite coordinates are an input error.
pub fn project_points(
    points: &[SamplePoint],
    res: Resolution,
    value_column: &str,
) -> Result<GridFrame> {
    let mut ids = Vec::with_capacity(points.len());
    let mut values = Vec::with_capacity(points.len());
    for point in points {
        ids.push(cell_from_latlng(point.lat, point.lon, res)?);
        values.push(point.value);
    }
    debug!(
        rows = ids.len(),
        resolution = u8::from(res),
        "projected points onto the grid"
    );
    GridFrame::new(ids).with_column(value_column, Column::Float(values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::ID_COLUMN;

    #[test]
    fn test_project_points_matches_direct_projection() {
        let points = vec![
            SamplePoint::new(-0.1, 51.5, 3.0),
            SamplePoint::new(2.35, 48.85, 4.0),
        ];
        let res = Resolution::try_from(10).unwrap();
        let frame = project_points(&points, res, BAND_COLUMN).unwrap();

        assert_eq!(frame.len(), 2);
        for (cell, point) in frame.ids().iter().zip(&points) {
            let expected = cell_from_latlng(point.lat, point.lon, res).unwrap();
            assert_eq!(*cell, expected);
        }
        let Column::Float(values) = frame.column(BAND_COLUMN).unwrap() else {
            panic!("expected float column");
        };
        assert_eq!(values, &vec![3.0, 4.0]);
        assert!(!frame.has_column(ID_COLUMN), "ids live outside named columns");
    }

    #[test]
    fn test_duplicate_cells_are_kept() {
        // Two points in the same cell stay two rows; aggregation is the
        // engine's job, not the bootstrap's.
        let points = vec![
            SamplePoint::new(0.0, 0.0, 1.0),
            SamplePoint::new(0.0001, 0.0001, 2.0),
        ];
        let res = Resolution::try_from(5).unwrap();
        let frame = project_points(&points, res, BAND_COLUMN).unwrap();
        assert_eq!(frame.len(), 2);
        assert_eq!(frame.ids()[0], frame.ids()[1]);
    }

    #[test]
    fn test_nonfinite_coordinate_is_an_error() {
        let points = vec![SamplePoint::new(f64::INFINITY, 0.0, 1.0)];
        let res = Resolution::try_from(8).unwrap();
        assert!(project_points(&points, res, BAND_COLUMN).is_err());
    }
}
