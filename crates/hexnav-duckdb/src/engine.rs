//! DuckDB implementation of the resolution-change contract.
//!
//! The frame is staged as a table; for every level the parent/children
//! mapping of the distinct identifiers is computed through the cell index
//! wrapper and staged as a relation, and the level itself executes as one
//! declarative statement: `JOIN` + `unnest(children)` to refine, `JOIN` +
//! `GROUP BY parent` with `sum`/`first`/`list` to coarsen. The stepwise
//! composition is identical to the in-memory engine, so identifiers agree
//! exactly and additive values agree up to floating-point summation order.

use std::sync::atomic::{AtomicU64, Ordering};

use duckdb::types::Value;
use duckdb::Connection;
use hexnav_cell::{children_of, parent_of, CellIndex, ResolutionBounds, CHILD_NUM};
use hexnav_grid::{
    classify_columns, Column, GridError, GridFrame, MemoryEngine, ScaleEngine,
    CHILD_CELLS_COLUMN, GEOM_COLUMN, ID_COLUMN,
};
use tracing::debug;

/// Rows per `INSERT` statement when staging a frame.
const INSERT_BATCH: usize = 512;

/// Declarative-query engine over an in-memory DuckDB session.
///
/// The connection is opened once per engine and reused across calls; each
/// call stages its own uniquely named tables and drops them afterwards, so
/// a failed call leaves no visible state behind.
pub struct DuckdbEngine {
    conn: Connection,
    bounds: ResolutionBounds,
    run_id: AtomicU64,
}

/// Column layout of a staged table, identifier column excluded.
#[derive(Debug, Clone)]
struct ColSpec {
    name: String,
    kind: ColKind,
    additive: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColKind {
    Float,
    Text,
    Cells,
}

impl ColKind {
    fn sql_type(self) -> &'static str {
        match self {
            ColKind::Float => "DOUBLE",
            ColKind::Text => "VARCHAR",
            ColKind::Cells => "UBIGINT[]",
        }
    }
}

impl DuckdbEngine {
    /// Engine with the default resolution range.
    pub fn new() -> Result<Self, GridError> {
        Self::with_bounds(ResolutionBounds::default())
    }

    /// Engine with an explicit resolution range.
    pub fn with_bounds(bounds: ResolutionBounds) -> Result<Self, GridError> {
        let conn = Connection::open_in_memory().map_err(db_err)?;
        Ok(Self {
            conn,
            bounds,
            run_id: AtomicU64::new(0),
        })
    }

    fn execute_plan(&self, frame: &GridFrame, levels: i32, run: u64) -> Result<GridFrame, GridError> {
        let mut work = frame.clone();
        if work.drop_column(GEOM_COLUMN).is_some() {
            debug!("dropped geometry column; boundaries are resolution-specific");
        }

        let mut specs = specs_of(&work)?;
        self.stage_frame(&table_name(run, 0), &work, &specs)?;

        let steps = levels.unsigned_abs();
        for step in 0..steps {
            let src = table_name(run, step);
            let dst = table_name(run, step + 1);
            let map = map_name(run, step + 1);
            if levels > 0 {
                self.refine_step(&src, &dst, &map, &specs)?;
            } else {
                self.coarsen_step(&src, &dst, &map, &specs)?;
                specs = coarsened_specs(&specs);
            }
        }

        self.read_frame(&table_name(run, steps), &specs)
    }

    /// Stage a frame as `CREATE TABLE` + batched `INSERT`s.
    fn stage_frame(
        &self,
        table: &str,
        frame: &GridFrame,
        specs: &[ColSpec],
    ) -> Result<(), GridError> {
        let mut columns = format!("{} UBIGINT", quote_ident(ID_COLUMN));
        for spec in specs {
            columns.push_str(", ");
            columns.push_str(&quote_ident(&spec.name));
            columns.push(' ');
            columns.push_str(spec.kind.sql_type());
        }
        self.conn
            .execute_batch(&format!("CREATE OR REPLACE TABLE {table} ({columns});"))
            .map_err(db_err)?;

        let mut offset = 0;
        while offset < frame.len() {
            let end = (offset + INSERT_BATCH).min(frame.len());
            let mut sql = format!("INSERT INTO {table} VALUES ");
            for row in offset..end {
                if row > offset {
                    sql.push_str(", ");
                }
                sql.push('(');
                sql.push_str(&u64::from(frame.ids()[row]).to_string());
                for spec in specs {
                    sql.push_str(", ");
                    sql.push_str(&literal_at(frame, spec, row));
                }
                sql.push(')');
            }
            sql.push(';');
            self.conn.execute_batch(&sql).map_err(db_err)?;
            offset = end;
        }
        Ok(())
    }

    /// One refinement level as a join + unnest statement.
    fn refine_step(
        &self,
        src: &str,
        dst: &str,
        map: &str,
        specs: &[ColSpec],
    ) -> Result<(), GridError> {
        let ids = self.distinct_ids(src)?;
        self.conn
            .execute_batch(&format!(
                "CREATE OR REPLACE TABLE {map} ({} UBIGINT, children UBIGINT[]);",
                quote_ident(ID_COLUMN)
            ))
            .map_err(db_err)?;

        let mut offset = 0;
        while offset < ids.len() {
            let end = (offset + INSERT_BATCH).min(ids.len());
            let mut sql = format!("INSERT INTO {map} VALUES ");
            for (i, &cell) in ids[offset..end].iter().enumerate() {
                if i > 0 {
                    sql.push_str(", ");
                }
                let children: Vec<String> = children_of(cell)
                    .into_iter()
                    .map(|c| u64::from(c).to_string())
                    .collect();
                sql.push_str(&format!(
                    "({}, [{}])",
                    u64::from(cell),
                    children.join(", ")
                ));
            }
            sql.push(';');
            self.conn.execute_batch(&sql).map_err(db_err)?;
            offset = end;
        }

        let mut select = format!("unnest(m.children) AS {}", quote_ident(ID_COLUMN));
        for spec in specs {
            let q = quote_ident(&spec.name);
            if spec.additive {
                select.push_str(&format!(", g.{q} / {CHILD_NUM}.0 AS {q}"));
            } else {
                select.push_str(&format!(", g.{q} AS {q}"));
            }
        }
        self.conn
            .execute_batch(&format!(
                "CREATE OR REPLACE TABLE {dst} AS \
                 SELECT {select} FROM {src} g JOIN {map} m USING ({});",
                quote_ident(ID_COLUMN)
            ))
            .map_err(db_err)?;
        Ok(())
    }

    /// One aggregation level as a join + group-by statement.
    fn coarsen_step(
        &self,
        src: &str,
        dst: &str,
        map: &str,
        specs: &[ColSpec],
    ) -> Result<(), GridError> {
        let ids = self.distinct_ids(src)?;
        self.conn
            .execute_batch(&format!(
                "CREATE OR REPLACE TABLE {map} ({} UBIGINT, parent UBIGINT);",
                quote_ident(ID_COLUMN)
            ))
            .map_err(db_err)?;

        let mut offset = 0;
        while offset < ids.len() {
            let end = (offset + INSERT_BATCH).min(ids.len());
            let mut sql = format!("INSERT INTO {map} VALUES ");
            for (i, &cell) in ids[offset..end].iter().enumerate() {
                if i > 0 {
                    sql.push_str(", ");
                }
                let parent = parent_of(cell).ok_or(GridError::ResolutionOutOfRange {
                    target: -1,
                    lower: self.bounds.lower,
                    upper: self.bounds.upper,
                })?;
                sql.push_str(&format!("({}, {})", u64::from(cell), u64::from(parent)));
            }
            sql.push(';');
            self.conn.execute_batch(&sql).map_err(db_err)?;
            offset = end;
        }

        let id = quote_ident(ID_COLUMN);
        let mut select = format!("m.parent AS {id}");
        for spec in specs {
            if spec.name == CHILD_CELLS_COLUMN {
                continue;
            }
            let q = quote_ident(&spec.name);
            if spec.additive {
                select.push_str(&format!(", sum(g.{q}) AS {q}"));
            } else {
                select.push_str(&format!(", first(g.{q}) AS {q}"));
            }
        }
        select.push_str(&format!(
            ", list(g.{id}) AS {}",
            quote_ident(CHILD_CELLS_COLUMN)
        ));

        self.conn
            .execute_batch(&format!(
                "CREATE OR REPLACE TABLE {dst} AS \
                 SELECT {select} FROM {src} g JOIN {map} m USING ({id}) \
                 GROUP BY m.parent;"
            ))
            .map_err(db_err)?;
        Ok(())
    }

    fn distinct_ids(&self, table: &str) -> Result<Vec<CellIndex>, GridError> {
        let sql = format!("SELECT DISTINCT {} FROM {table};", quote_ident(ID_COLUMN));
        let mut stmt = self.conn.prepare(&sql).map_err(db_err)?;
        let mut rows = stmt.query([]).map_err(db_err)?;
        let mut ids = Vec::new();
        while let Some(row) = rows.next().map_err(db_err)? {
            let raw: u64 = row.get(0).map_err(db_err)?;
            ids.push(CellIndex::try_from(raw).map_err(|e| GridError::Cell(e.into()))?);
        }
        Ok(ids)
    }

    /// Read a staged table back into a frame.
    fn read_frame(&self, table: &str, specs: &[ColSpec]) -> Result<GridFrame, GridError> {
        let mut select = quote_ident(ID_COLUMN);
        for spec in specs {
            select.push_str(", ");
            select.push_str(&quote_ident(&spec.name));
        }
        let sql = format!("SELECT {select} FROM {table};");
        let mut stmt = self.conn.prepare(&sql).map_err(db_err)?;
        let mut rows = stmt.query([]).map_err(db_err)?;

        let mut ids = Vec::new();
        let mut builders: Vec<Column> = specs
            .iter()
            .map(|spec| match spec.kind {
                ColKind::Float => Column::Float(Vec::new()),
                ColKind::Text => Column::Text(Vec::new()),
                ColKind::Cells => Column::Cells(Vec::new()),
            })
            .collect();

        while let Some(row) = rows.next().map_err(db_err)? {
            let raw: u64 = row.get(0).map_err(db_err)?;
            ids.push(CellIndex::try_from(raw).map_err(|e| GridError::Cell(e.into()))?);
            for (slot, builder) in builders.iter_mut().enumerate() {
                let idx = slot + 1;
                match builder {
                    Column::Float(values) => {
                        values.push(row.get::<_, f64>(idx).map_err(db_err)?);
                    }
                    Column::Text(values) => {
                        values.push(row.get::<_, String>(idx).map_err(db_err)?);
                    }
                    Column::Cells(values) => {
                        let value: Value = row.get(idx).map_err(db_err)?;
                        values.push(cells_from_value(value)?);
                    }
                }
            }
        }

        let mut frame = GridFrame::new(ids);
        for (spec, builder) in specs.iter().zip(builders) {
            frame = frame.with_column(spec.name.clone(), builder)?;
        }
        Ok(frame)
    }

    /// Best-effort removal of a run's staging tables.
    fn cleanup(&self, run: u64, steps: u32) {
        for step in 0..=steps {
            let _ = self
                .conn
                .execute_batch(&format!("DROP TABLE IF EXISTS {};", table_name(run, step)));
            let _ = self
                .conn
                .execute_batch(&format!("DROP TABLE IF EXISTS {};", map_name(run, step)));
        }
    }
}

impl ScaleEngine for DuckdbEngine {
    fn bounds(&self) -> ResolutionBounds {
        self.bounds
    }

    fn change_resolution(&self, frame: &GridFrame, levels: i32) -> Result<GridFrame, GridError> {
        let (current, target) = MemoryEngine::validate_request(self.bounds, frame, levels)?;
        debug!(
            current = u8::from(current),
            target_resolution = target,
            levels,
            "changing grid resolution through the query backend"
        );

        let run = self.run_id.fetch_add(1, Ordering::Relaxed);
        let result = self.execute_plan(frame, levels, run);
        self.cleanup(run, levels.unsigned_abs());
        result
    }
}

fn table_name(run: u64, step: u32) -> String {
    format!("grid_scale_{run}_{step}")
}

fn map_name(run: u64, step: u32) -> String {
    format!("cell_map_{run}_{step}")
}

/// Column layout of a frame, with additive roles resolved.
fn specs_of(frame: &GridFrame) -> Result<Vec<ColSpec>, GridError> {
    let roles = classify_columns(frame.column_names());
    frame
        .columns()
        .map(|(name, column)| {
            let additive = roles.is_additive(name);
            let kind = match column {
                Column::Float(_) => ColKind::Float,
                Column::Text(_) => ColKind::Text,
                Column::Cells(_) => ColKind::Cells,
            };
            if additive && kind != ColKind::Float {
                return Err(GridError::NonNumericAdditive(name.to_string()));
            }
            Ok(ColSpec {
                name: name.to_string(),
                kind,
                additive,
            })
        })
        .collect()
}

/// Layout after an aggregation step: `child_cells` superseded and moved last.
fn coarsened_specs(specs: &[ColSpec]) -> Vec<ColSpec> {
    let mut out: Vec<ColSpec> = specs
        .iter()
        .filter(|spec| spec.name != CHILD_CELLS_COLUMN)
        .cloned()
        .collect();
    out.push(ColSpec {
        name: CHILD_CELLS_COLUMN.to_string(),
        kind: ColKind::Cells,
        additive: false,
    });
    out
}

/// SQL literal for one cell of the frame.
fn literal_at(frame: &GridFrame, spec: &ColSpec, row: usize) -> String {
    match frame.column(&spec.name) {
        Some(Column::Float(values)) => float_literal(values[row]),
        Some(Column::Text(values)) => text_literal(&values[row]),
        Some(Column::Cells(values)) => {
            let items: Vec<String> = values[row]
                .iter()
                .map(|&c| u64::from(c).to_string())
                .collect();
            format!("[{}]", items.join(", "))
        }
        None => "NULL".to_string(),
    }
}

fn float_literal(value: f64) -> String {
    if value.is_nan() {
        "'NaN'".to_string()
    } else if value == f64::INFINITY {
        "'Infinity'".to_string()
    } else if value == f64::NEG_INFINITY {
        "'-Infinity'".to_string()
    } else {
        format!("{value:?}")
    }
}

fn text_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn cells_from_value(value: Value) -> Result<Vec<CellIndex>, GridError> {
    let items = match value {
        Value::List(items) => items,
        other => {
            return Err(GridError::Backend(format!(
                "expected a list of cell identifiers, got {other:?}"
            )))
        }
    };
    items
        .into_iter()
        .map(|item| {
            let raw = match item {
                Value::UBigInt(v) => v,
                Value::BigInt(v) => v as u64,
                other => {
                    return Err(GridError::Backend(format!(
                        "expected an unsigned cell identifier, got {other:?}"
                    )))
                }
            };
            CellIndex::try_from(raw).map_err(|e| GridError::Cell(e.into()))
        })
        .collect()
}

fn db_err(err: duckdb::Error) -> GridError {
    GridError::Backend(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literals() {
        assert_eq!(float_literal(5.0), "5.0");
        assert_eq!(float_literal(f64::NAN), "'NaN'");
        assert_eq!(text_literal("it's"), "'it''s'");
        assert_eq!(quote_ident("band_var"), "\"band_var\"");
    }

    #[test]
    fn test_coarsened_specs_moves_child_cells_last() {
        let specs = vec![
            ColSpec {
                name: CHILD_CELLS_COLUMN.to_string(),
                kind: ColKind::Cells,
                additive: false,
            },
            ColSpec {
                name: "band_var".to_string(),
                kind: ColKind::Float,
                additive: true,
            },
        ];
        let out = coarsened_specs(&specs);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].name, "band_var");
        assert_eq!(out[1].name, CHILD_CELLS_COLUMN);
    }
}
