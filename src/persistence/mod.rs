//! Row-oriented CSV persistence for grids.
//!
//! One line per grid row, comma-separated vitality values. `f32`'s
//! shortest round-trip formatting is used when writing, so a
//! save-then-load reproduces the grid exactly.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use thiserror::Error;

use crate::domain::{Cell, Grid, Topology};

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("row {row}, column {column}: invalid cell value {value:?}")]
    BadCell { row: usize, column: usize, value: String },

    #[error("row {row} has {found} columns, expected {expected}")]
    RaggedRow { row: usize, expected: usize, found: usize },

    #[error("save file is {found_width}x{found_height}, expected {expected_width}x{expected_height}")]
    DimensionMismatch {
        expected_width: usize,
        expected_height: usize,
        found_width: usize,
        found_height: usize,
    },
}

/// Write the grid to `path`, one CSV line per grid row
pub fn save(grid: &Grid, path: &Path) -> Result<(), PersistError> {
    let mut writer = BufWriter::new(fs::File::create(path)?);
    let (width, _) = grid.dimensions();
    for row in grid.cells().chunks(width) {
        let mut first = true;
        for cell in row {
            if !first {
                write!(writer, ",")?;
            }
            write!(writer, "{}", cell.vitality())?;
            first = false;
        }
        writeln!(writer)?;
    }
    writer.flush()?;
    Ok(())
}

/// Read a grid from `path` and validate it against the expected
/// dimensions. The grid is built fully before being returned, so a
/// failing load never leaves partial state behind.
pub fn load(
    path: &Path,
    expected: (usize, usize),
    topology: Topology,
) -> Result<Grid, PersistError> {
    let text = fs::read_to_string(path)?;
    let (expected_width, expected_height) = expected;

    let mut rows: Vec<Vec<f32>> = Vec::new();
    for (y, line) in text.lines().enumerate() {
        if line.is_empty() {
            continue;
        }
        let mut row = Vec::new();
        for (x, field) in line.split(',').enumerate() {
            let value: f32 = field.trim().parse().map_err(|_| PersistError::BadCell {
                row: y,
                column: x,
                value: field.to_string(),
            })?;
            if !(0.0..=1.0).contains(&value) {
                return Err(PersistError::BadCell {
                    row: y,
                    column: x,
                    value: field.to_string(),
                });
            }
            row.push(value);
        }
        if row.len() != rows.first().map_or(row.len(), Vec::len) {
            return Err(PersistError::RaggedRow {
                row: y,
                expected: rows[0].len(),
                found: row.len(),
            });
        }
        rows.push(row);
    }

    let found_width = rows.first().map_or(0, Vec::len);
    let found_height = rows.len();
    if (found_width, found_height) != (expected_width, expected_height) {
        return Err(PersistError::DimensionMismatch {
            expected_width,
            expected_height,
            found_width,
            found_height,
        });
    }

    let mut grid = Grid::new(found_width, found_height, topology);
    for (y, row) in rows.iter().enumerate() {
        for (x, &vitality) in row.iter().enumerate() {
            grid.set(x, y, Cell::with_vitality(vitality));
        }
    }
    Ok(grid)
}
