use std::path::PathBuf;

use anyhow::{bail, Context};
use glam::Vec2;
use indicatif::{ProgressBar, ProgressIterator, ProgressStyle};
use seep_cells::{
    edit::Brush,
    scene::Scene,
    shape::{Circle, Rect, ShapeSet},
    CellGrid, CellKind, FlowParams,
};
use seep_io::{decode::FrameDecoder, encode::FrameEncoder, layout::load_layout};

use crate::{config::RunConfig, draw::DrawState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Preset {
    /// A ball of water dropped into an open-topped basin.
    Basin,
    /// A column of water held against the left wall, spilling across the floor.
    DamBreak,
}

impl Preset {
    pub fn build(self, rows: usize, columns: usize) -> CellGrid {
        let mut grid = CellGrid::new(rows, columns);
        let walls = Brush::new(1);
        let water = Brush::new(1).with_kind(CellKind::Fluid);
        let (r, c) = (rows as f32, columns as f32);

        match self {
            Preset::Basin => {
                let basin = ShapeSet::new()
                    .with(Rect::cells(rows - 1, 0, rows, columns))
                    .with(Rect::cells(rows / 3, 0, rows, 1))
                    .with(Rect::cells(rows / 3, columns - 1, rows, columns));
                walls.paint_shape(&mut grid, &basin);
                water.paint_shape(&mut grid, &Circle::new(Vec2::new(c * 0.4, r * 0.25), r.min(c) * 0.15));
            }
            Preset::DamBreak => {
                let room = ShapeSet::new()
                    .with(Rect::cells(rows - 1, 0, rows, columns))
                    .with(Rect::cells(0, 0, rows, 1))
                    .with(Rect::cells(0, columns - 1, rows, columns));
                walls.paint_shape(&mut grid, &room);
                water.paint_shape(&mut grid, &Rect::cells(rows / 3, 1, rows - 1, (columns / 4).max(2)));
            }
        }

        grid
    }
}

/// Where the initial grid comes from.
pub enum Source {
    Layout(PathBuf),
    Preset(Preset),
}

pub struct RunOptions {
    pub source: Source,
    pub flow: FlowParams,
    pub run: RunConfig,
    /// Cells refilled before every step, as `(row, column)`.
    pub pour: Vec<(usize, usize)>,
    pub record: Option<PathBuf>,
    pub png: Option<PathBuf>,
}

pub fn run(options: RunOptions) -> anyhow::Result<()> {
    let RunOptions { source, flow, run: config, pour, record, png } = options;

    let grid = match source {
        Source::Layout(path) => load_layout(&path)
            .with_context(|| format!("failed to load layout {}", path.display()))?,
        Source::Preset(preset) => preset.build(config.rows, config.columns),
    };

    if let Some(&(row, column)) = pour.iter().find(|&&(r, c)| !grid.contains(r, c)) {
        bail!("pour cell ({row}, {column}) is outside the {}x{} grid", grid.rows(), grid.columns());
    }

    log::info!("running {} frames on a {}x{} grid", config.frames, grid.rows(), grid.columns());

    flow.validate().context("invalid flow parameters")?;

    let initial = grid.total_fill();
    let mut scene = Scene::new(grid, flow);
    let faucet = Brush::default().with_kind(CellKind::Fluid);

    let mut encoder = match record {
        Some(path) => {
            let mut encoder = FrameEncoder::new(path.clone(), config.frames, config.fps)
                .with_context(|| format!("failed to start recording in {}", path.display()))?;
            encoder.encode_metadata(&scene)?;
            log::info!("recording frames to {}", path.display());
            Some(encoder)
        }
        None => None,
    };

    let mut draw = match png {
        Some(path) => {
            log::info!("drawing frames to {}", path.display());
            let grid = scene.fluid();
            Some(DrawState::new(path, config.cell_size, config.frames, grid.rows(), grid.columns())?)
        }
        None => None,
    };

    let bar_template = "Running Simulation {spinner:.green} [{elapsed}] [{bar:50.white/white}] {pos}/{len} ({eta})";
    let style = ProgressStyle::with_template(bar_template)?
        .progress_chars("=> ").tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");
    let progress = ProgressBar::new(config.frames).with_style(style);

    for _frame in (0..config.frames).progress_with(progress) {
        for &(row, column) in &pour {
            faucet.paint(scene.fluid_mut(), row, column)?;
        }

        scene.step();

        if let Some(encoder) = encoder.as_mut() {
            encoder.encode_frame(&scene)?;
        }
        if let Some(draw) = draw.as_mut() {
            draw.draw_next(scene.fluid())?;
        }
    }

    log::info!(
        "finished after {} frames, total fill {:.4} (started at {:.4})",
        scene.frame(),
        scene.fluid().total_fill(),
        initial,
    );

    Ok(())
}

pub fn inspect(path: PathBuf) -> anyhow::Result<()> {
    let mut decoder = FrameDecoder::new(path.clone());
    let meta = decoder
        .decode_metadata()
        .with_context(|| format!("failed to read recording {}", path.display()))?;

    println!(
        "{}x{} grid, {} frames at {} fps",
        meta.rows, meta.columns, meta.num_frames, meta.fps,
    );
    println!("{:>8} {:>12} {:>10} {:>10}", "frame", "total fill", "max fill", "max speed");

    let mut frame = 0;
    while let Some(data) = decoder.decode_frame()? {
        println!(
            "{:>8} {:>12.4} {:>10.4} {:>10.4}",
            frame,
            data.total_fill(),
            data.max_fill(),
            data.max_speed(),
        );
        frame += 1;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_hold_water_inside_walls() {
        for preset in [Preset::Basin, Preset::DamBreak] {
            let grid = preset.build(30, 40);

            assert!(grid.total_fill() > 1.0, "{preset:?} has no water");
            assert!(grid.cells().filter(|c| c.row() == 29).all(|c| c.is_solid()));
        }
    }

    #[test]
    fn run_records_and_draws() {
        let dir = tempfile::tempdir().unwrap();
        let options = RunOptions {
            source: Source::Preset(Preset::DamBreak),
            flow: FlowParams::default(),
            run: RunConfig { frames: 4, fps: 10, cell_size: 4, rows: 12, columns: 16 },
            pour: vec![(1, 8)],
            record: Some(dir.path().join("frames")),
            png: Some(dir.path().join("png")),
        };

        run(options).unwrap();

        assert!(dir.path().join("frames/_meta").exists());
        assert!(dir.path().join("frames/3.dat").exists());
        assert!(dir.path().join("png/3.png").exists());
        inspect(dir.path().join("frames")).unwrap();
    }

    #[test]
    fn pour_outside_the_grid_is_rejected() {
        let options = RunOptions {
            source: Source::Preset(Preset::Basin),
            flow: FlowParams::default(),
            run: RunConfig { frames: 1, rows: 10, columns: 10, ..RunConfig::default() },
            pour: vec![(10, 0)],
            record: None,
            png: None,
        };

        assert!(run(options).is_err());
    }

    #[test]
    fn invalid_flow_parameters_are_rejected() {
        let options = RunOptions {
            source: Source::Preset(Preset::Basin),
            flow: FlowParams { min_flow: -1.0, ..FlowParams::default() },
            run: RunConfig { frames: 1, rows: 10, columns: 10, ..RunConfig::default() },
            pour: vec![],
            record: None,
            png: None,
        };

        assert!(run(options).is_err());
    }
}
