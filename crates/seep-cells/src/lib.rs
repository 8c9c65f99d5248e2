pub mod cell;
pub mod edit;
pub mod grid;
pub mod params;
pub mod scene;
pub mod shape;
mod step;

pub use cell::{Cell, CellKind};
pub use grid::{CellGrid, GridError};
pub use params::{FlowParams, ParamsError};

pub trait Fluid {
    type Params;

    /// Advances the fluid by one discrete time step.
    fn step(&mut self, params: &Self::Params);

    /// Total amount of fluid held by the fluid's cells.
    fn total_fill(&self) -> f64;
}
