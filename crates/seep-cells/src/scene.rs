use super::Fluid;

pub struct Scene<F: Fluid> {
    /// The fluid for this scene.
    fluid: F,
    /// The parameters for this scene's fluid.
    params: F::Params,
    /// Number of steps taken so far.
    frame: u64,
}

impl<F: Fluid> Scene<F> {
    #[inline(always)]
    pub fn new(fluid: F, params: F::Params) -> Self {
        Self {
            fluid,
            params,
            frame: 0,
        }
    }

    #[inline(always)]
    pub fn fluid(&self) -> &F {
        &self.fluid
    }

    /// Edit access to the fluid. Edits land before the next call to [`Scene::step`].
    #[inline(always)]
    pub fn fluid_mut(&mut self) -> &mut F {
        &mut self.fluid
    }

    #[inline(always)]
    pub fn params(&self) -> &F::Params {
        &self.params
    }

    #[inline(always)]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn step(&mut self) {
        self.fluid.step(&self.params);
        self.frame += 1;

        log::debug!("frame {}: total fill {:.4}", self.frame, self.fluid.total_fill());
    }
}

#[cfg(test)]
mod tests {
    use crate::{CellGrid, CellKind, FlowParams};

    use super::*;

    #[test]
    fn scene_counts_frames() {
        let mut grid = CellGrid::new(4, 1);
        grid.edit(0, 0, CellKind::Fluid, 1.0).unwrap();

        let mut scene = Scene::new(grid, FlowParams::default());
        for _ in 0..3 {
            scene.step();
        }

        assert_eq!(scene.frame(), 3);
        assert!((scene.fluid().total_fill() - 1.0).abs() < 1e-9);
        assert!(scene.fluid().get(3, 0).unwrap().fill > 0.0);
    }
}
