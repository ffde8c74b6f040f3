use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Result, WaveError};
use crate::grid::Grid;
use crate::operators::Method;
use crate::simulation::{Simulation, SimulationParams};
use crate::source::Source;

/// Run configuration, read once before the simulation starts.
///
/// Every field defaults to the classic comparison setup: 2024 points over
/// 1250 m, sound in air, 3500 steps at a stability ratio of 0.2, a 60 Hz
/// pulse injected at index 1249.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub nx: usize,                // number of grid points
    pub length: f64,              // physical length of the domain
    pub nt: usize,                // number of time steps
    pub velocity: f64,            // wave speed
    pub eps: f64,                 // stability ratio c·dt/dx
    pub source_index: usize,      // grid index of the source
    pub frequency: f64,           // source centre frequency
    pub snapshot_interval: usize, // steps between snapshots
    pub methods: Vec<Method>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            nx: 2024,
            length: 1250.,
            nt: 3500,
            velocity: 343.,
            eps: 0.2,
            source_index: 1249,
            frequency: 60.,
            snapshot_interval: 50,
            methods: Method::ALL.to_vec(),
        }
    }
}

impl Config {
    /// Load and validate a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate TOML text. Missing keys take their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }

    /// Validate all configuration parameters.
    pub fn validate(&self) -> Result<()> {
        if self.methods.is_empty() {
            return Err(WaveError::NoMethods);
        }
        let min = self
            .methods
            .iter()
            .map(|m| m.min_points())
            .max()
            .unwrap_or(2);
        if self.nx < min {
            return Err(WaveError::GridTooSmall { nx: self.nx, min });
        }
        if self.methods.contains(&Method::Spectral) && self.nx % 2 != 0 {
            return Err(WaveError::OddGridLength(self.nx));
        }
        if self.length <= 0. || !self.length.is_finite() {
            return Err(WaveError::invalid("length", self.length, "must be positive and finite"));
        }
        if self.velocity <= 0. || !self.velocity.is_finite() {
            return Err(WaveError::invalid("velocity", self.velocity, "must be positive and finite"));
        }
        if self.frequency <= 0. || !self.frequency.is_finite() {
            return Err(WaveError::invalid("frequency", self.frequency, "must be positive and finite"));
        }
        if !(self.eps > 0. && self.eps < 1.) {
            return Err(WaveError::invalid("eps", self.eps, "must lie strictly between 0 and 1"));
        }
        if self.nt == 0 {
            return Err(WaveError::invalid("nt", 0., "must be at least 1"));
        }
        if self.snapshot_interval == 0 {
            return Err(WaveError::invalid("snapshot_interval", 0., "must be at least 1"));
        }
        if self.source_index >= self.nx {
            return Err(WaveError::SourceOutOfBounds {
                index: self.source_index,
                nx: self.nx,
            });
        }
        for (i, m) in self.methods.iter().enumerate() {
            if self.methods[..i].contains(m) {
                return Err(WaveError::config(format!("method {} listed twice", m)));
            }
        }

        for m in &self.methods {
            if self.eps > m.stability_limit() {
                warn!(
                    method = %m,
                    eps = self.eps,
                    limit = m.stability_limit(),
                    "eps is above the stability limit of this method"
                );
            }
        }
        Ok(())
    }

    pub fn grid(&self) -> Result<Grid> {
        Grid::new(self.nx, self.length)
    }

    pub fn params(&self, grid: &Grid) -> SimulationParams {
        SimulationParams::from_stability_ratio(
            grid,
            self.velocity,
            self.eps,
            self.nt,
            self.snapshot_interval,
        )
    }

    /// Grid, time axis and pulse source assembled into a ready simulation.
    pub fn build_simulation(&self) -> Result<Simulation> {
        self.validate()?;
        let grid = self.grid()?;
        let params = self.params(&grid);
        let source = Source::gaussian_pulse(&grid, self.source_index, self.frequency, params.dt, params.nt)?;
        Simulation::new(grid, params, source, &self.methods)
    }
}
