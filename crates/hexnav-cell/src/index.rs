//! Pure wrappers around the index primitives consumed by the grid engines.

use h3o::{CellIndex, LatLng, Resolution};

use crate::Result;

/// Resolution of a cell as a plain integer.
pub fn resolution_of(cell: CellIndex) -> u8 {
    u8::from(cell.resolution())
}

/// Parent of a cell at the next-coarser resolution.
///
/// Returns `None` only for cells already at resolution 0. Callers changing
/// grid resolution are responsible for bounds checking before asking.
pub fn parent_of(cell: CellIndex) -> Option<CellIndex> {
    cell.resolution()
        .pred()
        .and_then(|res| cell.parent(res))
}

/// Children of a cell at the next-finer resolution.
///
/// Seven cells for hexagons, six for the pentagon cells. Empty only for cells
/// already at the finest resolution the index encodes.
pub fn children_of(cell: CellIndex) -> Vec<CellIndex> {
    match cell.resolution().succ() {
        Some(res) => cell.children(res).collect(),
        None => Vec::new(),
    }
}

/// Project a WGS84 coordinate onto the grid at the given resolution.
pub fn cell_from_latlng(lat: f64, lon: f64, res: Resolution) -> Result<CellIndex> {
    let coord = LatLng::new(lat, lon)?;
    Ok(coord.to_cell(res))
}

/// Centroid of a cell as `(lat, lon)` degrees.
pub fn center_of(cell: CellIndex) -> (f64, f64) {
    let ll = LatLng::from(cell);
    (ll.lat(), ll.lng())
}

/// Boundary vertices of a cell as `(lat, lon)` degrees, unclosed.
pub fn boundary_of(cell: CellIndex) -> Vec<(f64, f64)> {
    cell.boundary()
        .iter()
        .map(|v| (v.lat(), v.lng()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell_at(lat: f64, lon: f64, res: u8) -> CellIndex {
        let res = Resolution::try_from(res).unwrap();
        cell_from_latlng(lat, lon, res).unwrap()
    }

    #[test]
    fn test_resolution_of() {
        let cell = cell_at(51.51, 0.0, 10);
        assert_eq!(resolution_of(cell), 10);
    }

    #[test]
    fn test_parent_child_inverse() {
        let cell = cell_at(47.6, -122.3, 9);
        let children = children_of(cell);
        assert_eq!(children.len(), 7);
        for child in children {
            assert_eq!(resolution_of(child), 10);
            assert_eq!(parent_of(child), Some(cell));
        }
    }

    #[test]
    fn test_parent_is_stable() {
        // Parent is a pure function of the identifier, not of the path taken.
        let cell = cell_at(-33.86, 151.2, 11);
        assert_eq!(parent_of(cell), parent_of(cell));
    }

    #[test]
    fn test_projection_rejects_nonfinite() {
        let res = Resolution::try_from(8).unwrap();
        assert!(cell_from_latlng(f64::NAN, 0.0, res).is_err());
    }

    #[test]
    fn test_boundary_has_vertices() {
        let cell = cell_at(0.0, 0.0, 7);
        let ring = boundary_of(cell);
        assert!(ring.len() >= 5, "hexagon or pentagon boundary expected");
    }
}
