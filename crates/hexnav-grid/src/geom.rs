//! Cell boundary annotation for downstream visualization.
//!
//! Attaches a `geom` column of GeoJSON polygon strings. The resolution-change
//! engine drops this column on every call, so it must be re-attached after a
//! transform; boundaries are a pure function of the identifier.

use geojson::{GeoJson, Geometry, Value};
use hexnav_cell::{boundary_of, CellIndex};

use crate::frame::{Column, GridFrame, GEOM_COLUMN};
use crate::Result;

/// Attach the boundary polygon of every cell as a `geom` text column.
///
/// Replaces an existing `geom` column.
pub fn annotate_geometry(frame: &GridFrame) -> Result<GridFrame> {
    let mut work = frame.clone();
    work.drop_column(GEOM_COLUMN);
    let polygons = frame.ids().iter().map(|&cell| cell_polygon(cell)).collect();
    work.with_column(GEOM_COLUMN, Column::Text(polygons))
}

/// GeoJSON polygon string for one cell, ring closed, positions as `[lon, lat]`.
pub fn cell_polygon(cell: CellIndex) -> String {
    let mut ring: Vec<Vec<f64>> = boundary_of(cell)
        .into_iter()
        .map(|(lat, lon)| vec![lon, lat])
        .collect();
    if let Some(first) = ring.first().cloned() {
        ring.push(first);
    }
    GeoJson::Geometry(Geometry::new(Value::Polygon(vec![ring]))).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexnav_cell::{cell_from_latlng, Resolution};

    #[test]
    fn test_annotate_adds_geom_column() {
        let res = Resolution::try_from(8).unwrap();
        let ids = vec![
            cell_from_latlng(51.5, -0.1, res).unwrap(),
            cell_from_latlng(48.85, 2.35, res).unwrap(),
        ];
        let frame = GridFrame::new(ids);
        let annotated = annotate_geometry(&frame).unwrap();

        let Column::Text(polygons) = annotated.column(GEOM_COLUMN).unwrap() else {
            panic!("expected text column");
        };
        assert_eq!(polygons.len(), 2);
        assert!(polygons[0].contains("Polygon"));
    }

    #[test]
    fn test_ring_is_closed() {
        let res = Resolution::try_from(6).unwrap();
        let cell = cell_from_latlng(-33.9, 18.4, res).unwrap();
        let geojson: GeoJson = cell_polygon(cell).parse().unwrap();
        let GeoJson::Geometry(geometry) = geojson else {
            panic!("expected geometry");
        };
        let Value::Polygon(rings) = geometry.value else {
            panic!("expected polygon");
        };
        let ring = &rings[0];
        assert_eq!(ring.first(), ring.last());
        assert!(ring.len() >= 6);
    }

    #[test]
    fn test_annotate_replaces_existing_geom() {
        let res = Resolution::try_from(8).unwrap();
        let ids = vec![cell_from_latlng(0.0, 0.0, res).unwrap()];
        let frame = GridFrame::new(ids)
            .with_column(GEOM_COLUMN, Column::Text(vec!["stale".into()]))
            .unwrap();
        let annotated = annotate_geometry(&frame).unwrap();
        let Column::Text(polygons) = annotated.column(GEOM_COLUMN).unwrap() else {
            panic!("expected text column");
        };
        assert_ne!(polygons[0], "stale");
    }
}
