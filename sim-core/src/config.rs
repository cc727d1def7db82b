use serde::Deserialize;

use crate::error::{Error, Result};

/// How the direction of a pairwise force is derived from `(dx, dy)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AngleMode {
    /// `atan(dy / dx)` with vertical special cases, forced to `π` whenever
    /// `dx < 0` (the sign of `dy` is discarded in that half-plane).
    #[default]
    Legacy,
    /// Standard two-argument arctangent. Changes simulated trajectories.
    Atan2,
}

/// Simulation parameters.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Side length of the scratch matrix allocated at startup.
    pub initial_capacity: usize,
    /// Whether net forces are computed and applied to velocities.
    pub gravity_enabled: bool,
    pub angle_mode: AngleMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            initial_capacity: 128,
            gravity_enabled: true,
            angle_mode: AngleMode::Legacy,
        }
    }
}

impl Config {
    /// ### Errors
    /// [`Error::InvalidConfig`] if the initial capacity is zero (doubling
    /// could never grow it).
    pub fn validate(&self) -> Result<()> {
        if self.initial_capacity == 0 {
            return Err(Error::InvalidConfig(
                "initial_capacity must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = Config::default();
        assert_eq!(cfg.initial_capacity, 128);
        assert!(cfg.gravity_enabled);
        assert_eq!(cfg.angle_mode, AngleMode::Legacy);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let cfg = Config {
            initial_capacity: 0,
            ..Config::default()
        };
        assert!(matches!(cfg.validate(), Err(Error::InvalidConfig(_))));
    }
}
