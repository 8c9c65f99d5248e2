use glam::IVec2;

use crate::{grid::CellGrid, params::FlowParams, Fluid};

/// Left then right, as `(column, row)` offsets.
const SIDE_OFFSETS: [IVec2; 2] = [IVec2::NEG_X, IVec2::X];

impl CellGrid {
    #[inline]
    fn fill(&self, at: (usize, usize)) -> f64 {
        self.cells[at].fill
    }

    /// Moves `amount` of fluid from one cell to another.
    #[inline]
    fn transfer(&mut self, from: (usize, usize), to: (usize, usize), amount: f64) {
        self.cells[from].fill -= amount;
        self.cells[to].fill += amount;
    }

    /// Accepting neighbor of a transfer: in bounds and not solid.
    #[inline]
    fn fluid_at(&self, at: (usize, usize)) -> bool {
        self.cells[at].is_fluid()
    }

    fn fall(&mut self, src: (usize, usize), params: &FlowParams) -> usize {
        let Some(below) = self.offset(src.0, src.1, IVec2::Y) else {
            return 0;
        };

        if !self.fluid_at(below) || self.fill(below) >= 1.0 {
            return 0;
        }

        let flow = f64::min(self.fill(src), 1.0 - self.fill(below)).min(params.vertical_cap());
        if flow <= params.min_flow {
            return 0;
        }

        let flow = flow.min(self.fill(src));
        self.transfer(src, below, flow);
        self.cells[below].velocity_y += flow;

        1
    }

    fn spread(&mut self, src: (usize, usize), params: &FlowParams) -> usize {
        let mut transfers = 0;

        for offset in SIDE_OFFSETS {
            let Some(side) = self.offset(src.0, src.1, offset) else {
                continue;
            };

            let fill = self.fill(src);
            let side_fill = self.fill(side);
            if !self.fluid_at(side) || side_fill >= fill {
                continue;
            }

            let flow = ((fill - side_fill) * params.flow_rate)
                .min(fill)
                .min(1.0 - side_fill)
                * params.horizontal_flow_multiplier;

            if flow > params.min_flow {
                self.transfer(src, side, flow);
                self.cells[side].velocity_x += flow * offset.x as f64;
                transfers += 1;
            }
        }

        transfers
    }

    fn diffuse(&mut self, src: (usize, usize), params: &FlowParams) -> usize {
        // Below half full this goes negative and every candidate flow falls under `min_flow`.
        let pressure = f64::min(self.fill(src) - 0.5, params.max_pressure);
        let mut transfers = 0;

        for dst in self.neighbors(src.0, src.1) {
            let fill = self.fill(src);
            let dst_fill = self.fill(dst);
            if !self.fluid_at(dst) || dst_fill >= fill {
                continue;
            }

            let flow = (pressure * params.flow_rate)
                .min(fill)
                .min(1.0 - dst_fill);

            if flow > params.min_flow {
                self.transfer(src, dst, flow);
                transfers += 1;
            }
        }

        transfers
    }

    fn damp(&mut self, at: (usize, usize), damping: f64) {
        let cell = &mut self.cells[at];
        cell.velocity_y *= damping;
        cell.velocity_x *= damping;
    }
}

impl Fluid for CellGrid {
    type Params = FlowParams;

    /// Runs a single in-place pass over the grid, bottom row first and left to right within a row.
    /// Each cell sees the transfers already made by cells visited before it.
    fn step(&mut self, params: &Self::Params) {
        let mut transfers = 0;

        for row in (0..self.rows()).rev() {
            for column in 0..self.columns() {
                let src = (row, column);
                let cell = &self.cells[src];
                if !cell.is_fluid() || cell.fill <= 0.0 {
                    continue;
                }

                transfers += self.fall(src, params);
                transfers += self.spread(src, params);
                transfers += self.diffuse(src, params);
                self.damp(src, params.damping);
            }
        }

        log::trace!("grid step moved fluid {transfers} times");
    }

    fn total_fill(&self) -> f64 {
        CellGrid::total_fill(self)
    }
}

#[cfg(test)]
mod tests {
    use crate::cell::CellKind;

    use super::*;

    const EPS: f64 = 1e-9;

    fn grid_from(rows: &[&[f64]]) -> CellGrid {
        let mut grid = CellGrid::new(rows.len(), rows[0].len());
        for (r, row) in rows.iter().enumerate() {
            for (c, &fill) in row.iter().enumerate() {
                if fill < 0.0 {
                    grid.edit(r, c, CellKind::Solid, 0.0).unwrap();
                } else {
                    grid.edit(r, c, CellKind::Fluid, fill).unwrap();
                }
            }
        }
        grid
    }

    fn fill(grid: &CellGrid, row: usize, column: usize) -> f64 {
        grid.get(row, column).unwrap().fill
    }

    #[test]
    fn column_drop_falls_then_diffuses() {
        let mut grid = grid_from(&[&[1.0], &[0.0], &[0.0]]);
        grid.step(&FlowParams::default());

        // 0.165 falls, then pressure (0.835 - 0.5) * 0.08 = 0.0268 diffuses into the same cell.
        assert!((fill(&grid, 0, 0) - 0.8082).abs() < EPS);
        assert!((fill(&grid, 1, 0) - 0.1918).abs() < EPS);
        assert_eq!(fill(&grid, 2, 0), 0.0);
        assert!((grid.get(1, 0).unwrap().velocity_y - 0.165).abs() < EPS);
    }

    #[test]
    fn spreading_favors_the_left() {
        let mut grid = grid_from(&[&[0.0, 1.0, 0.0]]);
        grid.step(&FlowParams::default());

        assert!((fill(&grid, 0, 0) - 0.08050432).abs() < EPS);
        assert!((fill(&grid, 0, 1) - 0.84129536).abs() < EPS);
        assert!((fill(&grid, 0, 2) - 0.07820032).abs() < EPS);

        // The left cell was visited before it received anything, so it is not damped.
        assert!((grid.get(0, 0).unwrap().velocity_x + 0.048).abs() < EPS);
        assert!((grid.get(0, 2).unwrap().velocity_x - 0.045696 * 0.9).abs() < EPS);
    }

    #[test]
    fn small_flows_are_discarded() {
        // (0.2 - 0) * 0.08 * 0.6 = 0.0096, under the threshold; pressure is negative.
        let mut grid = grid_from(&[&[0.2, 0.0]]);
        let before = grid.clone();
        grid.step(&FlowParams::default());

        assert_eq!(grid.fill_levels(), before.fill_levels());
        assert_eq!(grid.get(0, 1).unwrap().velocity_x, 0.0);
    }

    #[test]
    fn flow_at_threshold_is_discarded() {
        let defaults = FlowParams::default();
        let params = FlowParams {
            min_flow: defaults.flow_rate * defaults.horizontal_flow_multiplier,
            ..defaults
        };
        let mut grid = grid_from(&[&[0.0, 1.0]]);
        grid.step(&params);

        // Spreading computes exactly the threshold; pressure diffusion (0.04) stays under it.
        assert_eq!(fill(&grid, 0, 0), 0.0);
        assert_eq!(fill(&grid, 0, 1), 1.0);
    }

    #[test]
    fn nearly_full_destination_takes_only_its_headroom() {
        let mut grid = grid_from(&[&[1.0], &[0.99]]);
        grid.step(&FlowParams::default());

        let received = fill(&grid, 1, 0) - 0.99;
        assert!(received <= 0.01 + EPS);
        assert!(fill(&grid, 1, 0) <= 1.0 + EPS);
        assert!((fill(&grid, 0, 0) + fill(&grid, 1, 0) - 1.99).abs() < EPS);
    }

    #[test]
    fn isolated_cell_only_damps() {
        let mut grid = grid_from(&[
            &[-1.0, -1.0, -1.0],
            &[-1.0, 0.5, -1.0],
            &[-1.0, -1.0, -1.0],
        ]);
        {
            let cell = grid.get_mut(1, 1).unwrap();
            cell.velocity_x = -0.4;
            cell.velocity_y = 0.3;
        }

        grid.step(&FlowParams::default());

        let cell = grid.get(1, 1).unwrap();
        assert_eq!(cell.fill, 0.5);
        assert!((cell.velocity_x + 0.36).abs() < EPS);
        assert!((cell.velocity_y - 0.27).abs() < EPS);
    }

    #[test]
    fn empty_cells_keep_their_velocity() {
        let mut grid = CellGrid::new(1, 1);
        grid.get_mut(0, 0).unwrap().velocity_y = 1.0;
        grid.step(&FlowParams::default());

        assert_eq!(grid.get(0, 0).unwrap().velocity_y, 1.0);
    }

    #[test]
    fn solids_block_everything() {
        let mut grid = grid_from(&[&[1.0, -1.0, 0.0], &[-1.0, -1.0, 0.0]]);
        grid.step(&FlowParams::default());

        assert_eq!(fill(&grid, 0, 0), 1.0);
        assert_eq!(fill(&grid, 0, 2), 0.0);
        assert_eq!(fill(&grid, 1, 2), 0.0);
        for r in 0..2 {
            for c in 0..2 {
                let cell = grid.get(r, c).unwrap();
                if cell.is_solid() {
                    assert_eq!((cell.fill, cell.velocity_x, cell.velocity_y), (0.0, 0.0, 0.0));
                }
            }
        }
    }
}
