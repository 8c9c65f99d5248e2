use glam::DVec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CellKind {
    #[default]
    Fluid,
    Solid,
}

impl CellKind {
    /// Returns the other kind. Used by the brush to flip between painting modes.
    pub fn toggled(self) -> CellKind {
        match self {
            CellKind::Fluid => CellKind::Solid,
            CellKind::Solid => CellKind::Fluid,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub kind: CellKind,
    /// Fraction of the cell occupied by fluid, nominally in `[0, 1]`.
    pub fill: f64,
    /// Decaying memory of downward flow into this cell.
    pub velocity_y: f64,
    /// Decaying memory of sideways flow into this cell. Positive is rightward.
    pub velocity_x: f64,
    row: usize,
    column: usize,
}

impl Cell {
    pub(crate) fn empty(row: usize, column: usize) -> Cell {
        Cell {
            kind: CellKind::Fluid,
            fill: 0.0,
            velocity_y: 0.0,
            velocity_x: 0.0,
            row,
            column,
        }
    }

    #[inline]
    pub fn row(&self) -> usize {
        self.row
    }

    #[inline]
    pub fn column(&self) -> usize {
        self.column
    }

    #[inline]
    pub fn is_fluid(&self) -> bool {
        self.kind == CellKind::Fluid
    }

    #[inline]
    pub fn is_solid(&self) -> bool {
        self.kind == CellKind::Solid
    }

    /// Velocity as a vector, `x` rightward and `y` downward.
    #[inline]
    pub fn velocity(&self) -> DVec2 {
        DVec2::new(self.velocity_x, self.velocity_y)
    }
}
