//! Columnar grid table keyed by cell identifier.
//!
//! A `GridFrame` is one row per cell occurrence: the `h3_id` identifier column
//! plus named value columns, all sharing the row count. Storage is a typed
//! `Vec` per column. Transforms never mutate a frame in place; they build and
//! return a new one.

use hexnav_cell::{CellIndex, Resolution};

use crate::error::GridError;
use crate::Result;

/// Name of the cell identifier column.
pub const ID_COLUMN: &str = "h3_id";

/// Name of the auxiliary column listing the children merged into each row
/// by an aggregation step.
pub const CHILD_CELLS_COLUMN: &str = "child_cells";

/// Name of the geometry annotation column dropped by resolution changes.
pub const GEOM_COLUMN: &str = "geom";

/// Column storage - typed vectors, one entry per row.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    /// Numeric values (additive variables and numeric context).
    Float(Vec<f64>),
    /// Textual context (labels, geometry annotations).
    Text(Vec<String>),
    /// Lists of cell identifiers (the `child_cells` column).
    Cells(Vec<Vec<CellIndex>>),
}

impl Column {
    /// Number of rows in the column.
    pub fn len(&self) -> usize {
        match self {
            Column::Float(v) => v.len(),
            Column::Text(v) => v.len(),
            Column::Cells(v) => v.len(),
        }
    }

    /// Check if the column has no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Rows gathered in permutation order.
    pub(crate) fn gathered(&self, order: &[usize]) -> Column {
        match self {
            Column::Float(v) => Column::Float(order.iter().map(|&r| v[r]).collect()),
            Column::Text(v) => Column::Text(order.iter().map(|&r| v[r].clone()).collect()),
            Column::Cells(v) => Column::Cells(order.iter().map(|&r| v[r].clone()).collect()),
        }
    }
}

/// A relational table of cell identifiers and named columns.
#[derive(Debug, Clone, PartialEq)]
pub struct GridFrame {
    /// The `h3_id` column.
    ids: Vec<CellIndex>,
    /// Named columns in insertion order, `h3_id` excluded.
    columns: Vec<(String, Column)>,
}

impl GridFrame {
    /// Create a frame with only the identifier column.
    pub fn new(ids: Vec<CellIndex>) -> Self {
        Self {
            ids,
            columns: Vec::new(),
        }
    }

    /// Add a column, consuming and returning the frame.
    ///
    /// Fails on a reserved or duplicate name and on a row-count mismatch.
    pub fn with_column(mut self, name: impl Into<String>, column: Column) -> Result<Self> {
        let name = name.into();
        if name == ID_COLUMN {
            return Err(GridError::ReservedColumn(name));
        }
        if self.columns.iter().any(|(existing, _)| *existing == name) {
            return Err(GridError::DuplicateColumn(name));
        }
        if column.len() != self.ids.len() {
            return Err(GridError::LengthMismatch {
                column: name,
                expected: self.ids.len(),
                actual: column.len(),
            });
        }
        self.columns.push((name, column));
        Ok(self)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Check if the frame has no rows.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// The identifier column.
    pub fn ids(&self) -> &[CellIndex] {
        &self.ids
    }

    /// Iterate over named columns in insertion order.
    pub fn columns(&self) -> impl Iterator<Item = (&str, &Column)> {
        self.columns.iter().map(|(name, col)| (name.as_str(), col))
    }

    /// Names of the non-identifier columns, in insertion order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, col)| col)
    }

    /// Check whether a column exists.
    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Remove a column, returning it if it was present.
    pub fn drop_column(&mut self, name: &str) -> Option<Column> {
        let pos = self.columns.iter().position(|(existing, _)| existing == name)?;
        Some(self.columns.remove(pos).1)
    }

    /// Resolution shared by every row.
    ///
    /// Fails on an empty table and on mixed-resolution rows; the engines call
    /// this before any transform work so those schema violations surface
    /// before anything is computed.
    pub fn resolution(&self) -> Result<Resolution> {
        let first = self.ids.first().ok_or(GridError::EmptyTable)?;
        let expected = first.resolution();
        for cell in &self.ids[1..] {
            let found = cell.resolution();
            if found != expected {
                return Err(GridError::MixedResolution {
                    expected: u8::from(expected),
                    found: u8::from(found),
                });
            }
        }
        Ok(expected)
    }

    /// A copy of the frame with rows ordered by identifier.
    ///
    /// Row order is not part of the transform contract; comparisons between
    /// substrates normalize through this.
    pub fn sorted_by_id(&self) -> GridFrame {
        let mut order: Vec<usize> = (0..self.len()).collect();
        order.sort_by_key(|&r| u64::from(self.ids[r]));
        GridFrame {
            ids: order.iter().map(|&r| self.ids[r]).collect(),
            columns: self
                .columns
                .iter()
                .map(|(name, col)| (name.clone(), col.gathered(&order)))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexnav_cell::cell_from_latlng;

    fn ids_at(res: u8, coords: &[(f64, f64)]) -> Vec<CellIndex> {
        let res = Resolution::try_from(res).unwrap();
        coords
            .iter()
            .map(|&(lat, lon)| cell_from_latlng(lat, lon, res).unwrap())
            .collect()
    }

    #[test]
    fn test_with_column_checks_length() {
        let frame = GridFrame::new(ids_at(8, &[(10.0, 20.0), (11.0, 21.0)]));
        let err = frame
            .with_column("band_var", Column::Float(vec![1.0]))
            .unwrap_err();
        assert!(matches!(err, GridError::LengthMismatch { .. }));
    }

    #[test]
    fn test_with_column_rejects_reserved_and_duplicate() {
        let frame = GridFrame::new(ids_at(8, &[(10.0, 20.0)]));
        let err = frame
            .clone()
            .with_column(ID_COLUMN, Column::Float(vec![1.0]))
            .unwrap_err();
        assert!(matches!(err, GridError::ReservedColumn(_)));

        let err = frame
            .with_column("a", Column::Float(vec![1.0]))
            .unwrap()
            .with_column("a", Column::Float(vec![2.0]))
            .unwrap_err();
        assert!(matches!(err, GridError::DuplicateColumn(_)));
    }

    #[test]
    fn test_resolution_empty_and_mixed() {
        let empty = GridFrame::new(Vec::new());
        assert!(matches!(empty.resolution(), Err(GridError::EmptyTable)));

        let mut ids = ids_at(8, &[(10.0, 20.0)]);
        ids.extend(ids_at(9, &[(10.0, 20.0)]));
        let mixed = GridFrame::new(ids);
        assert!(matches!(
            mixed.resolution(),
            Err(GridError::MixedResolution {
                expected: 8,
                found: 9
            })
        ));
    }

    #[test]
    fn test_drop_column() {
        let mut frame = GridFrame::new(ids_at(8, &[(10.0, 20.0)]))
            .with_column("geom", Column::Text(vec!["POLYGON".into()]))
            .unwrap();
        assert!(frame.drop_column("geom").is_some());
        assert!(frame.drop_column("geom").is_none());
        assert!(!frame.has_column("geom"));
    }

    #[test]
    fn test_sorted_by_id_keeps_rows_aligned() {
        let ids = ids_at(8, &[(45.0, 90.0), (-10.0, 3.0), (60.0, -120.0)]);
        let values: Vec<f64> = vec![1.0, 2.0, 3.0];
        let frame = GridFrame::new(ids.clone())
            .with_column("band_var", Column::Float(values.clone()))
            .unwrap();

        let sorted = frame.sorted_by_id();
        let Column::Float(sorted_values) = sorted.column("band_var").unwrap() else {
            panic!("expected float column");
        };
        for (cell, value) in sorted.ids().iter().zip(sorted_values) {
            let original = ids.iter().position(|c| c == cell).unwrap();
            assert_eq!(*value, values[original]);
        }
    }
}
