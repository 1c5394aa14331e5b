use std::f64::consts::TAU;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::UniverseError;
use crate::quadtree::DEFAULT_MAX_LEAVES;
use crate::sensor::SensorParams;

/// Static configuration for a universe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UniverseConfig {
    /// Side length of the square world in world units.
    pub world_size: f64,
    /// Number of robots created at startup.
    pub population: usize,
    /// Angular pixels per robot sensor.
    pub pixel_count: usize,
    /// Sensor field of view in degrees.
    pub fov_degrees: f64,
    /// Sensor range in world units.
    pub range: f64,
    /// Per-node capacity of the index (raised to the built-in floor if lower).
    pub max_leaves: usize,
    /// Ticks to run before the driver reports `Finished`; 0 runs forever.
    pub updates_max: u64,
    /// Seed for scattering the initial population.
    pub seed: u64,
    /// Ticks between throughput reports in the log; 0 disables them.
    pub report_period: u64,
}

impl Default for UniverseConfig {
    fn default() -> Self {
        Self {
            world_size: 1.0,
            population: 100,
            pixel_count: 8,
            fov_degrees: 270.0,
            range: 0.1,
            max_leaves: DEFAULT_MAX_LEAVES,
            updates_max: 0,
            seed: 0,
            report_period: 10,
        }
    }
}

impl UniverseConfig {
    /// Parse a TOML document; missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, UniverseError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file.
    pub fn load(path: &Path) -> Result<Self, UniverseError> {
        let text = std::fs::read_to_string(path).map_err(|source| UniverseError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), UniverseError> {
        if !(self.world_size.is_finite() && self.world_size > 0.0) {
            return Err(UniverseError::InvalidConfig("world_size must be positive"));
        }
        if self.pixel_count == 0 {
            return Err(UniverseError::InvalidConfig("pixel_count must be non-zero"));
        }
        let fov = self.fov_degrees.to_radians();
        if !(fov > 0.0 && fov <= TAU) {
            return Err(UniverseError::InvalidConfig("fov_degrees must be in (0, 360]"));
        }
        if !(self.range.is_finite() && self.range > 0.0) {
            return Err(UniverseError::InvalidConfig("range must be positive"));
        }
        if self.population > u32::MAX as usize {
            return Err(UniverseError::InvalidConfig("population exceeds robot id space"));
        }
        Ok(())
    }

    pub fn sensor_params(&self) -> SensorParams {
        SensorParams {
            pixel_count: self.pixel_count,
            fov: self.fov_degrees.to_radians(),
            range: self.range,
        }
    }
}
