use glam::UVec2;

use crate::{
    cell::CellKind,
    grid::{CellGrid, GridError},
    shape::Shape,
};

/// Pointer-driven editor writing cell kinds and fill levels between steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Brush {
    /// Kind painted when not erasing.
    kind: CellKind,
    /// When set, painting clears cells back to empty fluid.
    erase: bool,
    /// Edge length of a cell on screen, in pixels.
    cell_size: u32,
}

impl Default for Brush {
    fn default() -> Self {
        Self::new(10)
    }
}

impl Brush {
    /// # Panics
    ///
    /// Panics if `cell_size` is zero.
    pub fn new(cell_size: u32) -> Self {
        assert!(cell_size > 0, "cell size must be positive");

        Self {
            kind: CellKind::Solid,
            erase: false,
            cell_size,
        }
    }

    pub fn with_kind(mut self, kind: CellKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn kind(&self) -> CellKind {
        self.kind
    }

    pub fn is_erasing(&self) -> bool {
        self.erase
    }

    pub fn toggle_kind(&mut self) {
        self.kind = self.kind.toggled();
    }

    pub fn toggle_erase(&mut self) {
        self.erase = !self.erase;
    }

    /// Cell under a pixel position, as `x` column and `y` row. Not bounds-checked.
    #[inline]
    pub fn cell_at(&self, pixel: UVec2) -> UVec2 {
        pixel / self.cell_size
    }

    /// Applies the brush to one cell. Fluid is painted full; solids and erased cells hold nothing.
    pub fn paint(&self, grid: &mut CellGrid, row: usize, column: usize) -> Result<(), GridError> {
        if self.erase {
            return grid.edit(row, column, CellKind::Fluid, 0.0);
        }

        let fill = match self.kind {
            CellKind::Fluid => 1.0,
            CellKind::Solid => 0.0,
        };

        grid.edit(row, column, self.kind, fill)
    }

    /// Paints the cell under the pointer. Returns whether a cell was painted; positions off the
    /// grid are ignored.
    pub fn stroke(&self, grid: &mut CellGrid, pixel: UVec2) -> bool {
        let cell = self.cell_at(pixel);

        self.paint(grid, cell.y as usize, cell.x as usize).is_ok()
    }

    /// Paints every cell whose center lies inside `shape`, returning how many were painted.
    pub fn paint_shape<S: Shape + ?Sized>(&self, grid: &mut CellGrid, shape: &S) -> usize {
        let mut painted = 0;

        for row in 0..grid.rows() {
            for column in 0..grid.columns() {
                if shape.covers(row, column) && self.paint(grid, row, column).is_ok() {
                    painted += 1;
                }
            }
        }

        painted
    }
}
