//! Plain-text scene layouts.
//!
//! One line per grid row, one character per column:
//!
//! | char        | cell                         |
//! |-------------|------------------------------|
//! | `#`         | solid                        |
//! | `~`         | full fluid                   |
//! | `.` or ` `  | empty fluid                  |
//! | `0`..=`9`   | fluid filled to `digit / 9`  |
//!
//! The grid is as wide as the longest line. Shorter lines are padded with empty cells and
//! trailing blank lines are dropped.

use std::path::Path;

use seep_cells::{CellGrid, CellKind};
use thiserror::Error;

fn cell_for(c: char) -> Option<(CellKind, f64)> {
    match c {
        '#' => Some((CellKind::Solid, 0.0)),
        '~' => Some((CellKind::Fluid, 1.0)),
        '.' | ' ' => Some((CellKind::Fluid, 0.0)),
        '0'..='9' => c.to_digit(10).map(|d| (CellKind::Fluid, d as f64 / 9.0)),
        _ => None,
    }
}

pub fn parse_layout(text: &str) -> Result<CellGrid, LayoutError> {
    let mut lines: Vec<&str> = text.lines().map(|l| l.trim_end_matches('\r')).collect();
    while lines.last().is_some_and(|l| l.trim().is_empty()) {
        lines.pop();
    }

    let columns = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    if columns == 0 {
        return Err(LayoutError::Empty);
    }

    let mut grid = CellGrid::new(lines.len(), columns);
    let mut padded = 0;

    for (row, line) in lines.iter().enumerate() {
        let mut width = 0;

        for (column, c) in line.chars().enumerate() {
            let (kind, fill) = cell_for(c).ok_or(LayoutError::UnknownCell {
                line: row + 1,
                column: column + 1,
                found: c,
            })?;

            grid.edit(row, column, kind, fill)?;
            width += 1;
        }

        if width < columns {
            padded += 1;
        }
    }

    if padded > 0 {
        log::warn!("{padded} layout lines were shorter than {columns} cells and have been padded with empty cells");
    }

    Ok(grid)
}

pub fn load_layout<P: AsRef<Path>>(path: P) -> Result<CellGrid, LayoutError> {
    let text = std::fs::read_to_string(path.as_ref())?;
    let grid = parse_layout(&text)?;

    log::info!("loaded {}x{} layout from {}", grid.rows(), grid.columns(), path.as_ref().display());

    Ok(grid)
}

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("layout has no cells")]
    Empty,
    #[error("unknown cell {found:?} at line {line}, column {column}")]
    UnknownCell { line: usize, column: usize, found: char },
    #[error(transparent)]
    Grid(#[from] seep_cells::GridError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_cell_kind() {
        let grid = parse_layout("~.9\n# 0\n").unwrap();

        assert_eq!((grid.rows(), grid.columns()), (2, 3));
        assert_eq!(grid.get(0, 0).unwrap().fill, 1.0);
        assert_eq!(grid.get(0, 1).unwrap().fill, 0.0);
        assert_eq!(grid.get(0, 2).unwrap().fill, 1.0);
        assert!(grid.get(1, 0).unwrap().is_solid());
        assert!(grid.get(1, 1).unwrap().is_fluid());
        assert_eq!(grid.get(1, 2).unwrap().fill, 0.0);
    }

    #[test]
    fn digits_scale_to_ninths() {
        let grid = parse_layout("3").unwrap();
        assert!((grid.get(0, 0).unwrap().fill - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn short_lines_are_padded() {
        let grid = parse_layout("#\n###\n\n\n").unwrap();

        assert_eq!((grid.rows(), grid.columns()), (2, 3));
        assert!(grid.get(0, 2).unwrap().is_fluid());
        assert!(grid.get(1, 2).unwrap().is_solid());
    }

    #[test]
    fn rejects_unknown_cells() {
        match parse_layout("..\n.x") {
            Err(LayoutError::UnknownCell { line, column, found }) => {
                assert_eq!((line, column, found), (2, 2, 'x'));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn rejects_empty_layouts() {
        assert!(matches!(parse_layout("\n\n"), Err(LayoutError::Empty)));
        assert!(matches!(parse_layout(""), Err(LayoutError::Empty)));
    }
}
