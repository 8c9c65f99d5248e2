use glam::{IVec2, UVec2};
use ndarray::Array2;
use smallvec::SmallVec;
use thiserror::Error;

use crate::cell::{Cell, CellKind};

/// Offsets of the eight surrounding cells as `(column, row)` pairs, in row-major order.
pub(crate) const MOORE_OFFSETS: [IVec2; 8] = [
    IVec2::new(-1, -1),
    IVec2::new(0, -1),
    IVec2::new(1, -1),
    IVec2::new(-1, 0),
    IVec2::new(1, 0),
    IVec2::new(-1, 1),
    IVec2::new(0, 1),
    IVec2::new(1, 1),
];

/// A fixed-size grid of cells. Row `0` is the top of the grid.
#[derive(Debug, Clone)]
pub struct CellGrid {
    /// Cells indexed by `(row, column)`.
    pub(crate) cells: Array2<Cell>,
}

impl CellGrid {
    /// Creates a grid of empty fluid cells.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn new(rows: usize, columns: usize) -> Self {
        assert!(rows > 0 && columns > 0, "grid dimensions must be positive, got {rows}x{columns}");

        Self {
            cells: Array2::from_shape_fn((rows, columns), |(row, column)| Cell::empty(row, column)),
        }
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.cells.nrows()
    }

    #[inline]
    pub fn columns(&self) -> usize {
        self.cells.ncols()
    }

    /// Size of the grid in cells, `x` being columns and `y` rows.
    #[inline]
    pub fn size(&self) -> UVec2 {
        UVec2::new(self.columns() as u32, self.rows() as u32)
    }

    #[inline]
    pub fn contains(&self, row: usize, column: usize) -> bool {
        row < self.rows() && column < self.columns()
    }

    #[inline]
    pub fn get(&self, row: usize, column: usize) -> Option<&Cell> {
        self.cells.get((row, column))
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, row: usize, column: usize) -> Option<&mut Cell> {
        self.cells.get_mut((row, column))
    }

    /// Iterates over every cell, top row first.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// Copy of the fill levels, indexed by `(row, column)`.
    pub fn fill_levels(&self) -> Array2<f64> {
        self.cells.map(|c| c.fill)
    }

    pub fn total_fill(&self) -> f64 {
        self.cells.iter().filter(|c| c.is_fluid()).map(|c| c.fill).sum()
    }

    /// Coordinates of the cell at `offset` (`x` columns, `y` rows) from `(row, column)`, if it lies
    /// within the grid.
    #[inline]
    pub fn offset(&self, row: usize, column: usize, offset: IVec2) -> Option<(usize, usize)> {
        let r = row.checked_add_signed(offset.y as isize)?;
        let c = column.checked_add_signed(offset.x as isize)?;

        self.contains(r, c).then_some((r, c))
    }

    /// In-bounds coordinates of the eight cells surrounding `(row, column)`, in row-major order.
    pub fn neighbors(&self, row: usize, column: usize) -> SmallVec<[(usize, usize); 8]> {
        MOORE_OFFSETS
            .iter()
            .filter_map(|&o| self.offset(row, column, o))
            .collect()
    }

    /// Sets the kind of a cell. Fluid cells take `fill`, clamped into `[0, 1]`, and keep their
    /// velocities. Solid cells hold no fluid and have zero velocity.
    pub fn edit(&mut self, row: usize, column: usize, kind: CellKind, fill: f64) -> Result<(), GridError> {
        let (rows, columns) = (self.rows(), self.columns());
        let cell = self.get_mut(row, column).ok_or(GridError::OutOfBounds { row, column, rows, columns })?;

        cell.kind = kind;
        cell.fill = match kind {
            CellKind::Fluid if fill.is_nan() => 0.0,
            CellKind::Fluid => fill.clamp(0.0, 1.0),
            CellKind::Solid => 0.0,
        };
        if kind == CellKind::Solid {
            cell.velocity_x = 0.0;
            cell.velocity_y = 0.0;
        }

        Ok(())
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum GridError {
    #[error("cell ({row}, {column}) is outside the {rows}x{columns} grid")]
    OutOfBounds {
        row: usize,
        column: usize,
        rows: usize,
        columns: usize,
    },
}
