use std::io::Write;

use encode::{EncodingError, FluidFrameEncoder};
use glam::UVec2;
use seep_cells::{CellGrid, CellKind};

pub mod as_bytes;
pub mod decode;
pub mod encode;
pub mod layout;

/// Byte tag of each cell kind in a recorded frame.
pub(crate) const FLUID_TAG: u8 = 0;
pub(crate) const SOLID_TAG: u8 = 1;

pub trait EncodeFluid {
    /// Size in cells, `x` being columns and `y` rows.
    fn shape(&self) -> UVec2;

    fn encode_state<W: Write>(&self, encoder: &mut FluidFrameEncoder<W>) -> Result<(), EncodingError>;
}

impl EncodeFluid for CellGrid {
    fn shape(&self) -> UVec2 {
        self.size()
    }

    fn encode_state<W: Write>(&self, encoder: &mut FluidFrameEncoder<W>) -> Result<(), EncodingError> {
        let n = self.rows() * self.columns();

        encoder.encode_section(n, self.cells().map(|c| match c.kind {
            CellKind::Fluid => FLUID_TAG,
            CellKind::Solid => SOLID_TAG,
        }))?;
        encoder.encode_section(n, self.cells().map(|c| c.fill))?;
        encoder.encode_section(n, self.cells().map(|c| c.velocity()))?;

        Ok(())
    }
}
