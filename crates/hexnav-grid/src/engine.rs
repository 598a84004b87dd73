//! The resolution-change engine.
//!
//! `ScaleEngine` is the substrate-agnostic contract: given a grid table and a
//! signed level count, produce the equivalent table at the shifted resolution.
//! Additive columns are divided by the child count on each refinement level
//! and summed on each aggregation level; contextual columns are broadcast,
//! respectively reduced to their first value per group. `MemoryEngine` is the
//! in-memory implementation; the query-backend implementation lives in its own
//! crate and must satisfy the same contract.

use std::collections::HashMap;

use hexnav_cell::{children_of, CellIndex, Resolution, ResolutionBounds, CHILD_NUM};
use tracing::debug;

use crate::classify::{classify_columns, ColumnRoles};
use crate::error::GridError;
use crate::frame::{Column, GridFrame, CHILD_CELLS_COLUMN, GEOM_COLUMN};
use crate::Result;

/// Substrate-agnostic resolution-change contract.
///
/// Implementations either fully succeed and return a new table or fail
/// without touching any externally visible state. Row order of the result is
/// not part of the contract.
pub trait ScaleEngine {
    /// The resolution range this engine enforces.
    fn bounds(&self) -> ResolutionBounds;

    /// Shift the table by `levels` resolutions.
    ///
    /// Positive refines, negative coarsens, zero is a validated no-op. The
    /// geometry annotation column is dropped in every case since boundaries
    /// are resolution-specific.
    fn change_resolution(&self, frame: &GridFrame, levels: i32) -> Result<GridFrame>;

    /// Bring the table to an absolute target resolution.
    fn set_resolution(&self, frame: &GridFrame, target: u8) -> Result<GridFrame> {
        let bounds = self.bounds();
        if !bounds.contains(i32::from(target)) {
            return Err(GridError::ResolutionOutOfRange {
                target: i32::from(target),
                lower: bounds.lower,
                upper: bounds.upper,
            });
        }
        let current = i32::from(u8::from(frame.resolution()?));
        self.change_resolution(frame, i32::from(target) - current)
    }
}

/// In-memory resolution-change engine.
#[derive(Debug, Clone, Copy)]
pub struct MemoryEngine {
    bounds: ResolutionBounds,
}

impl Default for MemoryEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryEngine {
    /// Engine with the default resolution range.
    pub fn new() -> Self {
        Self::with_bounds(ResolutionBounds::default())
    }

    /// Engine with an explicit resolution range.
    pub fn with_bounds(bounds: ResolutionBounds) -> Self {
        Self { bounds }
    }

    /// Validate the request and return `(current, target)` resolutions.
    ///
    /// Shared with the query-backend substrate so both reject the same inputs
    /// before doing any work.
    pub fn validate_request(
        bounds: ResolutionBounds,
        frame: &GridFrame,
        levels: i32,
    ) -> Result<(Resolution, i32)> {
        let current = frame.resolution()?;
        let target = i32::from(u8::from(current)) + levels;
        if !bounds.contains(target) {
            return Err(GridError::ResolutionOutOfRange {
                target,
                lower: bounds.lower,
                upper: bounds.upper,
            });
        }
        Ok((current, target))
    }

    /// One refinement level: each row becomes one row per child.
    fn refine_once(&self, frame: &GridFrame) -> Result<GridFrame> {
        let roles = classify_columns(frame.column_names());

        let mut new_ids = Vec::with_capacity(frame.len() * CHILD_NUM as usize);
        let mut fan_out = Vec::with_capacity(frame.len());
        for &cell in frame.ids() {
            let children = children_of(cell);
            fan_out.push(children.len());
            new_ids.extend(children);
        }

        let mut out = GridFrame::new(new_ids);
        for (name, column) in frame.columns() {
            let expanded = expand_column(name, column, &roles, &fan_out)?;
            out = out.with_column(name, expanded)?;
        }
        Ok(out)
    }

    /// One aggregation level: rows grouped under their parent cell.
    ///
    /// Groups appear in first-encounter order. Contextual columns keep the
    /// first value seen per group (lossy by design); a fresh `child_cells`
    /// column records the contributing identifiers, superseding any existing
    /// one.
    fn coarsen_once(&self, frame: &GridFrame) -> Result<GridFrame> {
        let roles = classify_columns(frame.column_names());
        let current = frame.resolution()?;
        let parent_res = current.pred().ok_or(GridError::ResolutionOutOfRange {
            target: i32::from(u8::from(current)) - 1,
            lower: self.bounds.lower,
            upper: self.bounds.upper,
        })?;

        let mut parents: Vec<CellIndex> = Vec::new();
        let mut slot_of: HashMap<CellIndex, usize> = HashMap::new();
        let mut members: Vec<Vec<usize>> = Vec::new();
        let mut child_lists: Vec<Vec<CellIndex>> = Vec::new();

        for (row, &cell) in frame.ids().iter().enumerate() {
            let parent = cell.parent(parent_res).ok_or(GridError::ResolutionOutOfRange {
                target: i32::from(u8::from(parent_res)),
                lower: self.bounds.lower,
                upper: self.bounds.upper,
            })?;
            let slot = *slot_of.entry(parent).or_insert_with(|| {
                parents.push(parent);
                members.push(Vec::new());
                child_lists.push(Vec::new());
                parents.len() - 1
            });
            members[slot].push(row);
            child_lists[slot].push(cell);
        }

        let mut out = GridFrame::new(parents);
        for (name, column) in frame.columns() {
            if name == CHILD_CELLS_COLUMN {
                continue;
            }
            let reduced = reduce_column(name, column, &roles, &members)?;
            out = out.with_column(name, reduced)?;
        }
        out.with_column(CHILD_CELLS_COLUMN, Column::Cells(child_lists))
    }
}

impl ScaleEngine for MemoryEngine {
    fn bounds(&self) -> ResolutionBounds {
        self.bounds
    }

    fn change_resolution(&self, frame: &GridFrame, levels: i32) -> Result<GridFrame> {
        let (current, target) = Self::validate_request(self.bounds, frame, levels)?;
        debug!(
            current = u8::from(current),
            target_resolution = target,
            levels,
            "changing grid resolution in memory"
        );

        let mut work = frame.clone();
        if work.drop_column(GEOM_COLUMN).is_some() {
            debug!("dropped geometry column; boundaries are resolution-specific");
        }

        for _ in 0..levels.unsigned_abs() {
            work = if levels > 0 {
                self.refine_once(&work)?
            } else {
                self.coarsen_once(&work)?
            };
        }
        Ok(work)
    }
}

/// Broadcast a column onto child rows, rescaling additive values.
fn expand_column(
    name: &str,
    column: &Column,
    roles: &ColumnRoles,
    fan_out: &[usize],
) -> Result<Column> {
    if roles.is_additive(name) {
        let Column::Float(values) = column else {
            return Err(GridError::NonNumericAdditive(name.to_string()));
        };
        let mut out = Vec::with_capacity(values.len() * CHILD_NUM as usize);
        for (value, &count) in values.iter().zip(fan_out) {
            let split = value / CHILD_NUM as f64;
            out.extend(std::iter::repeat(split).take(count));
        }
        return Ok(Column::Float(out));
    }
    Ok(match column {
        Column::Float(values) => Column::Float(repeat_rows(values, fan_out)),
        Column::Text(values) => Column::Text(repeat_rows(values, fan_out)),
        Column::Cells(values) => Column::Cells(repeat_rows(values, fan_out)),
    })
}

/// Reduce a column over groups: sum for additive, first value otherwise.
fn reduce_column(
    name: &str,
    column: &Column,
    roles: &ColumnRoles,
    members: &[Vec<usize>],
) -> Result<Column> {
    if roles.is_additive(name) {
        let Column::Float(values) = column else {
            return Err(GridError::NonNumericAdditive(name.to_string()));
        };
        return Ok(Column::Float(
            members
                .iter()
                .map(|rows| rows.iter().map(|&r| values[r]).sum())
                .collect(),
        ));
    }
    Ok(match column {
        Column::Float(values) => {
            Column::Float(members.iter().map(|rows| values[rows[0]]).collect())
        }
        Column::Text(values) => {
            Column::Text(members.iter().map(|rows| values[rows[0]].clone()).collect())
        }
        Column::Cells(values) => {
            Column::Cells(members.iter().map(|rows| values[rows[0]].clone()).collect())
        }
    })
}

fn repeat_rows<T: Clone>(values: &[T], fan_out: &[usize]) -> Vec<T> {
    let mut out = Vec::with_capacity(values.len() * CHILD_NUM as usize);
    for (value, &count) in values.iter().zip(fan_out) {
        out.extend(std::iter::repeat(value.clone()).take(count));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexnav_cell::cell_from_latlng;

    fn frame_at(res: u8, coords: &[(f64, f64)], values: &[f64]) -> GridFrame {
        let res = Resolution::try_from(res).unwrap();
        let ids = coords
            .iter()
            .map(|&(lat, lon)| cell_from_latlng(lat, lon, res).unwrap())
            .collect();
        GridFrame::new(ids)
            .with_column("band_var", Column::Float(values.to_vec()))
            .unwrap()
    }

    #[test]
    fn test_zero_levels_is_identity_with_geom_dropped() {
        let engine = MemoryEngine::new();
        let frame = frame_at(8, &[(10.0, 20.0)], &[3.0])
            .with_column(GEOM_COLUMN, Column::Text(vec!["poly".into()]))
            .unwrap();
        let out = engine.change_resolution(&frame, 0).unwrap();
        assert_eq!(out.len(), 1);
        assert!(!out.has_column(GEOM_COLUMN));
        assert_eq!(out.ids(), frame.ids());
    }

    #[test]
    fn test_refine_divides_additive_and_broadcasts_context() {
        let engine = MemoryEngine::new();
        let frame = frame_at(9, &[(48.85, 2.35)], &[7.0])
            .with_column("label", Column::Text(vec!["paris".into()]))
            .unwrap();
        let out = engine.change_resolution(&frame, 1).unwrap();

        assert_eq!(out.len(), 7);
        let Column::Float(values) = out.column("band_var").unwrap() else {
            panic!("expected float column");
        };
        assert!(values.iter().all(|&v| v == 1.0));
        let Column::Text(labels) = out.column("label").unwrap() else {
            panic!("expected text column");
        };
        assert!(labels.iter().all(|l| l == "paris"));
    }

    #[test]
    fn test_coarsen_sums_and_records_children() {
        let engine = MemoryEngine::new();
        let base = frame_at(9, &[(48.85, 2.35)], &[7.0]);
        let fine = engine.change_resolution(&base, 1).unwrap();
        let back = engine.change_resolution(&fine, -1).unwrap();

        assert_eq!(back.len(), 1);
        assert_eq!(back.ids(), base.ids());
        let Column::Float(values) = back.column("band_var").unwrap() else {
            panic!("expected float column");
        };
        assert!((values[0] - 7.0).abs() < 1e-9);
        let Column::Cells(children) = back.column(CHILD_CELLS_COLUMN).unwrap() else {
            panic!("expected cells column");
        };
        assert_eq!(children[0].len(), 7);
    }

    #[test]
    fn test_multi_level_coarsen_supersedes_child_cells() {
        let engine = MemoryEngine::new();
        let base = frame_at(10, &[(51.5, -0.12)], &[49.0]);
        let fine = engine.change_resolution(&base, 2).unwrap();
        assert_eq!(fine.len(), 49);

        let back = engine.change_resolution(&fine, -2).unwrap();
        assert_eq!(back.len(), 1);
        let Column::Cells(children) = back.column(CHILD_CELLS_COLUMN).unwrap() else {
            panic!("expected cells column");
        };
        // The recorded children are one level finer than the result, not the
        // original leaves: each step regroups.
        assert_eq!(children[0].len(), 7);
        assert_eq!(u8::from(children[0][0].resolution()), 11);
    }

    #[test]
    fn test_bounds_rejected_before_any_work() {
        let engine = MemoryEngine::new();
        let frame = frame_at(10, &[(10.0, 20.0)], &[1.0]);

        let err = engine.change_resolution(&frame, 4).unwrap_err();
        assert!(matches!(
            err,
            GridError::ResolutionOutOfRange {
                target: 14,
                lower: 3,
                upper: 13
            }
        ));

        // Target 3 is the inclusive lower limit.
        assert!(engine.change_resolution(&frame, -7).is_ok());
        let err = engine.change_resolution(&frame, -8).unwrap_err();
        assert!(matches!(err, GridError::ResolutionOutOfRange { target: 2, .. }));
    }

    #[test]
    fn test_set_resolution_validates_target_first() {
        let engine = MemoryEngine::new();
        let frame = frame_at(10, &[(10.0, 20.0)], &[1.0]);

        let out = engine.set_resolution(&frame, 8).unwrap();
        assert_eq!(u8::from(out.resolution().unwrap()), 8);

        let err = engine.set_resolution(&frame, 14).unwrap_err();
        assert!(matches!(err, GridError::ResolutionOutOfRange { target: 14, .. }));
        let err = engine.set_resolution(&frame, 2).unwrap_err();
        assert!(matches!(err, GridError::ResolutionOutOfRange { target: 2, .. }));
    }

    #[test]
    fn test_empty_frame_rejected() {
        let engine = MemoryEngine::new();
        let frame = GridFrame::new(Vec::new());
        assert!(matches!(
            engine.change_resolution(&frame, 1),
            Err(GridError::EmptyTable)
        ));
    }

    #[test]
    fn test_additive_text_column_rejected() {
        let engine = MemoryEngine::new();
        let res = Resolution::try_from(9).unwrap();
        let ids = vec![cell_from_latlng(1.0, 2.0, res).unwrap()];
        let frame = GridFrame::new(ids)
            .with_column("label_var", Column::Text(vec!["oops".into()]))
            .unwrap();
        assert!(matches!(
            engine.change_resolution(&frame, 1),
            Err(GridError::NonNumericAdditive(_))
        ));
    }
}
