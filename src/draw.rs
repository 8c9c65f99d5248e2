use std::path::PathBuf;

use anyhow::{anyhow, Context};
use glam::UVec2;
use image::{Rgb, RgbImage};
use seep_cells::{CellGrid, CellKind};

const SOLID: Rgb<u8> = Rgb([0xff, 0xff, 0xff]);
const EMPTY: Rgb<u8> = Rgb([0x00, 0x00, 0x00]);
const GRID_LINE: Rgb<u8> = Rgb([0x1f, 0x1f, 0x1f]);
const LINE_WIDTH: u32 = 2;

/// Writes one PNG per drawn frame into a directory.
pub struct DrawState {
    path: PathBuf,
    cell_size: u32,
    frame: u64,
    num_frames: u64,
}

impl DrawState {
    /// Fails when a `rows × columns` grid drawn at `cell_size` does not fit in an image.
    pub fn new(
        path: PathBuf,
        cell_size: u32,
        num_frames: u64,
        rows: usize,
        columns: usize,
    ) -> anyhow::Result<DrawState> {
        image_size(rows, columns, cell_size)?;
        std::fs::create_dir_all(&path)
            .with_context(|| format!("failed to create {}", path.display()))?;

        Ok(DrawState {
            path,
            cell_size,
            frame: 0,
            num_frames,
        })
    }

    pub fn draw_next(&mut self, grid: &CellGrid) -> anyhow::Result<()> {
        let digits = self.num_frames.saturating_sub(1).checked_ilog10().unwrap_or(0) as usize + 1;
        let path = self.path.join(format!("{:0digits$}.png", self.frame));

        render(grid, self.cell_size)?
            .save(&path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        self.frame += 1;

        Ok(())
    }
}

fn fill_rect(image: &mut RgbImage, x: u32, y: u32, w: u32, h: u32, color: Rgb<u8>) {
    let x1 = (x + w).min(image.width());
    let y1 = (y + h).min(image.height());

    for py in y..y1 {
        for px in x..x1 {
            image.put_pixel(px, py, color);
        }
    }
}

/// Pixel dimensions of a `rows × columns` grid drawn at `cell_size`.
fn image_size(rows: usize, columns: usize, cell_size: u32) -> anyhow::Result<UVec2> {
    let side = |cells: usize| {
        u32::try_from(cells).ok().and_then(|cells| cells.checked_mul(cell_size))
    };

    match (side(columns), side(rows)) {
        (Some(x), Some(y)) => Ok(UVec2::new(x, y)),
        _ => Err(anyhow!("a {rows}x{columns} grid at {cell_size}px per cell is too large to draw")),
    }
}

/// Draws every cell as a `cell_size` square. Water rises from the bottom of its cell in
/// proportion to the fill level and gets brighter as it fills. Grid lines are left out
/// when cells are too small to hold them.
pub fn render(grid: &CellGrid, cell_size: u32) -> anyhow::Result<RgbImage> {
    let size = image_size(grid.rows(), grid.columns(), cell_size)?;
    let mut image = RgbImage::from_pixel(size.x, size.y, EMPTY);

    for cell in grid.cells() {
        let x = cell.column() as u32 * cell_size;
        let y = cell.row() as u32 * cell_size;

        match cell.kind {
            CellKind::Solid => fill_rect(&mut image, x, y, cell_size, cell_size, SOLID),
            CellKind::Fluid if cell.fill > 0.0 => {
                let fill = cell.fill.clamp(0.0, 1.0);
                let water = (fill * cell_size as f64) as u32;
                let blue = (200.0 + 55.0 * fill) as u8;

                fill_rect(&mut image, x, y + cell_size - water, cell_size, water, Rgb([0, 0, blue]));
            }
            CellKind::Fluid => {}
        }
    }

    if cell_size > 2 * LINE_WIDTH {
        for column in 0..grid.columns() as u32 {
            fill_rect(&mut image, column * cell_size, 0, LINE_WIDTH, size.y, GRID_LINE);
        }
        for row in 0..grid.rows() as u32 {
            fill_rect(&mut image, 0, row * cell_size, size.x, LINE_WIDTH, GRID_LINE);
        }
    }

    Ok(image)
}
