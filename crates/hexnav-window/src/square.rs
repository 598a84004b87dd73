//! Square bounding boxes of a physical side length on the sphere.

use std::f64::consts::PI;
use std::str::FromStr;

use crate::error::WindowError;

/// WGS84 equatorial radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// How the square's north-south extent relates to its physical size.
///
/// Raster grids come in two flavors: projected grids with equal physical
/// spacing in both axes (`Meters`) and arc grids with equal angular spacing
/// (`Arc`, north-south extent scaled like the east-west one).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SquareRef {
    /// Equal physical spacing in meters on both axes.
    Meters,
    /// Equal angular spacing on both axes.
    Arc,
}

impl FromStr for SquareRef {
    type Err = WindowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "m" => Ok(SquareRef::Meters),
            "arc" => Ok(SquareRef::Arc),
            other => Err(WindowError::UnknownReference(other.to_string())),
        }
    }
}

/// Geographic bounds of a square window, degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SquareBounds {
    /// Minimum latitude (south edge).
    pub min_lat: f64,
    /// Maximum latitude (north edge).
    pub max_lat: f64,
    /// Minimum longitude (west edge).
    pub min_lon: f64,
    /// Maximum longitude (east edge).
    pub max_lon: f64,
}

impl SquareBounds {
    /// Check if a coordinate is within the bounds.
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        lat >= self.min_lat && lat <= self.max_lat && lon >= self.min_lon && lon <= self.max_lon
    }
}

/// Bounds of a square of side `side_m` meters centered on `(lat, lon)`.
///
/// The east-west half-width compensates the latitude-dependent shrinkage of
/// a longitude degree; the north-south half-height depends on the reference
/// mode.
pub fn square_bounds(lat: f64, lon: f64, side_m: f64, reference: SquareRef) -> SquareBounds {
    let half = side_m / 2.0;
    let lat_rad = PI * lat / 180.0;

    let dphi = half / lat_rad.cos() / EARTH_RADIUS_M / PI * 180.0;
    let dtheta = match reference {
        SquareRef::Meters => half / EARTH_RADIUS_M / PI * 180.0,
        SquareRef::Arc => half / lat_rad.cos() / EARTH_RADIUS_M / PI * 180.0,
    };

    SquareBounds {
        min_lat: lat - dtheta,
        max_lat: lat + dtheta,
        min_lon: lon - dphi,
        max_lon: lon + dphi,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_reference_mode_parsing() {
        assert_eq!("m".parse::<SquareRef>().unwrap(), SquareRef::Meters);
        assert_eq!("arc".parse::<SquareRef>().unwrap(), SquareRef::Arc);
        assert!(matches!(
            "flat".parse::<SquareRef>(),
            Err(WindowError::UnknownReference(_))
        ));
    }

    #[test]
    fn test_square_is_symmetric_at_equator() {
        let bounds = square_bounds(0.0, 10.0, 10_000.0, SquareRef::Meters);
        let height = bounds.max_lat - bounds.min_lat;
        let width = bounds.max_lon - bounds.min_lon;
        assert_relative_eq!(height, width, max_relative = 1e-12);
        assert!(bounds.contains(0.0, 10.0));
        assert!(!bounds.contains(1.0, 10.0));
    }

    #[test]
    fn test_meter_square_widens_with_latitude() {
        let bounds = square_bounds(60.0, 0.0, 10_000.0, SquareRef::Meters);
        let height = bounds.max_lat - bounds.min_lat;
        let width = bounds.max_lon - bounds.min_lon;
        // cos(60 deg) = 0.5: the longitude extent doubles, latitude does not.
        assert_relative_eq!(width, height * 2.0, max_relative = 1e-9);
    }

    #[test]
    fn test_arc_square_scales_both_axes() {
        let bounds = square_bounds(60.0, 0.0, 10_000.0, SquareRef::Arc);
        let height = bounds.max_lat - bounds.min_lat;
        let width = bounds.max_lon - bounds.min_lon;
        assert_relative_eq!(width, height, max_relative = 1e-12);
    }
}
