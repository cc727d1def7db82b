//! Viewer settings, optionally loaded from a YAML file.
//!
//! ```yaml
//! sim:
//!   initial_capacity: 128
//!   gravity_enabled: true
//!   angle_mode: legacy     # or atan2
//! fps: 60
//! window_width: 960
//! window_height: 640
//! size_tier: 2
//! force_line_scale: 1.0
//! scatter_count: 50
//! ```

use std::{fs::File, io::BufReader, path::Path};

use anyhow::{Context, Result, ensure};
use serde::Deserialize;
use sim_core::Config;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub sim: Config,
    /// Simulation steps per second while running.
    pub fps: u32,
    pub window_width: f32,
    pub window_height: f32,
    /// Size tier selected at startup.
    pub size_tier: u32,
    /// Screen length of a force line per unit of force.
    pub force_line_scale: f32,
    /// Bodies created by one use of the scatter tool.
    pub scatter_count: usize,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            sim: Config::default(),
            fps: 60,
            window_width: 960.0,
            window_height: 640.0,
            size_tier: 2,
            force_line_scale: 1.0,
            scatter_count: 50,
        }
    }
}

impl ViewConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let cfg: ViewConfig = serde_yaml::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("failed to open config {}", path.display()))?;
        let cfg: ViewConfig = serde_yaml::from_reader(BufReader::new(file))
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<()> {
        self.sim.validate()?;
        ensure!(self.fps > 0, "fps must be > 0");
        sim_core::SizeTier::new(self.size_tier)?;
        Ok(())
    }

    /// Seconds between two simulation steps.
    pub fn step_interval(&self) -> f64 {
        1.0 / self.fps as f64
    }
}
