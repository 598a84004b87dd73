//! Staging grid tables as Parquet files.
//!
//! Identifiers travel in their canonical hex text form; `child_cells` lists
//! are space-joined hex tokens. Additive and numeric contextual columns stay
//! doubles, textual context stays text. Schema compatibility across
//! resolution changes is the caller's concern; this module only guarantees a
//! faithful round trip of one table.

use std::path::Path;

use hexnav_cell::{CellError, CellIndex};
use hexnav_grid::{Column, GridFrame, CHILD_CELLS_COLUMN, ID_COLUMN};
use parquet::file::reader::{FileReader, SerializedFileReader};
use parquet::record::Field;
use tracing::debug;

use crate::codec::{double_field, numeric_field, utf8_field, utf8_values, write_table, StagedColumn};
use crate::error::IngestError;
use crate::Result;

/// Write a grid table as a staged Parquet file.
pub fn write_frame(path: impl AsRef<Path>, frame: &GridFrame) -> Result<()> {
    let mut fields = vec![utf8_field(ID_COLUMN)?];
    let mut columns = vec![StagedColumn::Strings(utf8_values(
        frame.ids().iter().map(|cell| cell.to_string()),
    ))];

    for (name, column) in frame.columns() {
        match column {
            Column::Float(values) => {
                fields.push(double_field(name)?);
                columns.push(StagedColumn::Doubles(values.clone()));
            }
            Column::Text(values) => {
                fields.push(utf8_field(name)?);
                columns.push(StagedColumn::Strings(utf8_values(values.iter().cloned())));
            }
            Column::Cells(values) => {
                fields.push(utf8_field(name)?);
                columns.push(StagedColumn::Strings(utf8_values(
                    values.iter().map(|cells| join_cells(cells)),
                )));
            }
        }
    }

    write_table(path.as_ref(), fields, columns)?;
    debug!(rows = frame.len(), path = %path.as_ref().display(), "staged grid table");
    Ok(())
}

/// Read a staged grid table back into a frame.
///
/// A file without the `h3_id` column is a schema error.
pub fn read_frame(path: impl AsRef<Path>) -> Result<GridFrame> {
    let file = std::fs::File::open(path.as_ref())?;
    let reader = SerializedFileReader::new(file)?;

    let names: Vec<String> = reader
        .metadata()
        .file_metadata()
        .schema_descr()
        .columns()
        .iter()
        .map(|c| c.name().to_string())
        .collect();
    if !names.iter().any(|name| name == ID_COLUMN) {
        return Err(IngestError::MissingIdColumn(ID_COLUMN));
    }

    let mut ids: Vec<CellIndex> = Vec::new();
    let mut columns: Vec<(String, Column)> = Vec::new();

    for row in reader.get_row_iter(None)? {
        let row = row?;
        for (name, field) in row.get_column_iter() {
            if name == ID_COLUMN {
                let Field::Str(token) = field else {
                    return Err(IngestError::UnsupportedColumn {
                        column: ID_COLUMN.to_string(),
                        found: format!("{field:?}"),
                    });
                };
                ids.push(parse_cell(token)?);
                continue;
            }

            let slot = match columns.iter().position(|(existing, _)| existing == name) {
                Some(slot) => slot,
                None => {
                    let empty = match field {
                        Field::Str(_) if name == CHILD_CELLS_COLUMN => {
                            Column::Cells(Vec::new())
                        }
                        Field::Str(_) => Column::Text(Vec::new()),
                        other if numeric_field(other).is_some() => Column::Float(Vec::new()),
                        other => {
                            return Err(IngestError::UnsupportedColumn {
                                column: name.clone(),
                                found: format!("{other:?}"),
                            })
                        }
                    };
                    columns.push((name.clone(), empty));
                    columns.len() - 1
                }
            };

            match (&mut columns[slot].1, field) {
                (Column::Cells(values), Field::Str(token)) => {
                    values.push(parse_cell_list(token)?);
                }
                (Column::Text(values), Field::Str(token)) => {
                    values.push(token.clone());
                }
                (Column::Float(values), other) => match numeric_field(other) {
                    Some(value) => values.push(value),
                    None => {
                        return Err(IngestError::UnsupportedColumn {
                            column: name.clone(),
                            found: format!("{other:?}"),
                        })
                    }
                },
                (_, other) => {
                    return Err(IngestError::UnsupportedColumn {
                        column: name.clone(),
                        found: format!("{other:?}"),
                    })
                }
            }
        }
    }

    let mut frame = GridFrame::new(ids);
    for (name, column) in columns {
        frame = frame.with_column(name, column)?;
    }
    debug!(rows = frame.len(), path = %path.as_ref().display(), "read staged grid table");
    Ok(frame)
}

fn join_cells(cells: &[CellIndex]) -> String {
    cells
        .iter()
        .map(|cell| cell.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

fn parse_cell(token: &str) -> Result<CellIndex> {
    token
        .parse::<CellIndex>()
        .map_err(|e| IngestError::Cell(CellError::from(e)))
}

fn parse_cell_list(token: &str) -> Result<Vec<CellIndex>> {
    token.split_whitespace().map(parse_cell).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexnav_cell::{cell_from_latlng, Resolution};

    #[test]
    fn test_cell_list_round_trip() {
        let res = Resolution::try_from(9).unwrap();
        let cells = vec![
            cell_from_latlng(10.0, 20.0, res).unwrap(),
            cell_from_latlng(11.0, 21.0, res).unwrap(),
        ];
        let joined = join_cells(&cells);
        assert_eq!(parse_cell_list(&joined).unwrap(), cells);
        assert!(parse_cell_list("").unwrap().is_empty());
    }
}
