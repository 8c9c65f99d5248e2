use std::path::Path;

use anyhow::Context;
use seep_cells::FlowParams;
use serde::Deserialize;

/// Contents of a `--config` TOML file. Every key is optional.
///
/// ```toml
/// [flow]
/// gravity = 0.15
/// flow_rate = 0.08
///
/// [run]
/// frames = 600
/// cell_size = 10
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub flow: FlowParams,
    pub run: RunConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    pub frames: u64,
    pub fps: u32,
    /// Edge length of a rendered cell, in pixels.
    pub cell_size: u32,
    /// Grid size used by presets.
    pub rows: usize,
    pub columns: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            frames: 600,
            fps: 60,
            cell_size: 10,
            rows: 80,
            columns: 120,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Config> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;

        let config: Config = toml::from_str(&text)
            .with_context(|| format!("invalid config {}", path.display()))?;
        config
            .flow
            .validate()
            .with_context(|| format!("invalid [flow] values in {}", path.display()))?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let config: Config = toml::from_str("[flow]\ngravity = 0.3\n\n[run]\nframes = 10\n").unwrap();

        assert_eq!(config.flow.gravity, 0.3);
        assert_eq!(config.flow.damping, FlowParams::default().damping);
        assert_eq!(config.run.frames, 10);
        assert_eq!(config.run.cell_size, 10);
    }

    #[test]
    fn unknown_tables_are_rejected() {
        assert!(toml::from_str::<Config>("[physics]\ngravity = 1.0\n").is_err());
    }

    #[test]
    fn load_reads_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seep.toml");
        std::fs::write(&path, "[run]\nfps = 30\n").unwrap();

        assert_eq!(Config::load(&path).unwrap().run.fps, 30);
        assert!(Config::load(&dir.path().join("missing.toml")).is_err());
    }

    #[test]
    fn load_rejects_negative_min_flow() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seep.toml");
        std::fs::write(&path, "[flow]\nmin_flow = -1.0\n").unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(format!("{err:#}").contains("min_flow"));
    }

    #[test]
    fn load_rejects_nan_flow_rate() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seep.toml");
        std::fs::write(&path, "[flow]\nflow_rate = nan\n").unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(format!("{err:#}").contains("flow_rate"));
    }
}
