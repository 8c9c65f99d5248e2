use std::path::PathBuf;

use anyhow::bail;
use clap::{Args, Parser, Subcommand};
use config::Config;
use run::{Preset, RunOptions, Source};

mod config;
mod draw;
mod run;

#[derive(Parser)]
#[command(version, about = "Cellular-automaton water on a 2D grid")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a simulation headless.
    Run(RunArgs),
    /// Summarize a recording made with `run --record`.
    Inspect {
        /// Recording directory.
        dir: PathBuf,
    },
}

#[derive(Args)]
struct RunArgs {
    /// Text layout to start from (`#` solid, `~` water, `.` empty, `0`-`9` partial).
    #[arg(long, conflicts_with = "preset")]
    layout: Option<PathBuf>,
    /// Built-in scene, used when no layout is given.
    #[arg(long, value_enum, default_value_t = Preset::Basin)]
    preset: Preset,
    /// TOML file with `[flow]` and `[run]` tables.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    frames: Option<u64>,
    #[arg(long)]
    fps: Option<u32>,
    /// Grid rows for presets.
    #[arg(long)]
    rows: Option<usize>,
    /// Grid columns for presets.
    #[arg(long)]
    columns: Option<usize>,
    /// Pixels per cell in drawn frames.
    #[arg(long)]
    cell_size: Option<u32>,
    /// Refill a cell with water before every step, as ROW,COL. Repeatable.
    #[arg(long, value_parser = parse_cell)]
    pour: Vec<(usize, usize)>,
    /// Record frames into this (new) directory.
    #[arg(long)]
    record: Option<PathBuf>,
    /// Draw frames as PNG images into this directory.
    #[arg(long)]
    png: Option<PathBuf>,
}

fn parse_cell(s: &str) -> Result<(usize, usize), String> {
    let (row, column) = s.split_once(',').ok_or_else(|| format!("expected ROW,COL, got `{s}`"))?;
    let row = row.trim().parse().map_err(|e| format!("bad row `{row}`: {e}"))?;
    let column = column.trim().parse().map_err(|e| format!("bad column `{column}`: {e}"))?;

    Ok((row, column))
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    match Cli::parse().command {
        Command::Run(args) => {
            let mut config = match &args.config {
                Some(path) => Config::load(path)?,
                None => Config::default(),
            };

            let run = &mut config.run;
            run.frames = args.frames.unwrap_or(run.frames);
            run.fps = args.fps.unwrap_or(run.fps);
            run.rows = args.rows.unwrap_or(run.rows);
            run.columns = args.columns.unwrap_or(run.columns);
            run.cell_size = args.cell_size.unwrap_or(run.cell_size);

            if run.rows == 0 || run.columns == 0 || run.cell_size == 0 {
                bail!("rows, columns and cell size must be positive");
            }

            let source = match args.layout {
                Some(path) => Source::Layout(path),
                None => Source::Preset(args.preset),
            };

            run::run(RunOptions {
                source,
                flow: config.flow,
                run: config.run,
                pour: args.pour,
                record: args.record,
                png: args.png,
            })
        }
        Command::Inspect { dir } => run::inspect(dir),
    }
}
