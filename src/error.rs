//! Error types for simulation setup.
//!
//! Stepping is infallible once a `Simulation` exists; everything that can go
//! wrong is a misconfiguration and is reported by the constructors.

use thiserror::Error;

/// Result type for setup operations.
pub type Result<T> = std::result::Result<T, WaveError>;

/// Errors raised while building grids, sources, propagators or configs.
#[derive(Error, Debug)]
pub enum WaveError {
    /// Two arrays that must share the grid length do not.
    #[error("length mismatch for {what}: expected {expected}, got {actual}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// The spectral operator needs an even number of grid points.
    #[error("spectral operator requires an even grid length, got {0}")]
    OddGridLength(usize),

    /// Not enough points for the requested stencil.
    #[error("grid of {nx} points is too small (need at least {min})")]
    GridTooSmall { nx: usize, min: usize },

    /// A scalar parameter is outside its admissible range.
    #[error("invalid {name} = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// Source index outside the grid.
    #[error("source index {index} is outside the grid (nx = {nx})")]
    SourceOutOfBounds { index: usize, nx: usize },

    /// A simulation was requested with no discretization.
    #[error("at least one discretization method must be selected")]
    NoMethods,

    /// Semantic configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("failed to write TOML config: {0}")]
    TomlWrite(#[from] toml::ser::Error),
}

impl WaveError {
    pub(crate) fn length(what: &'static str, expected: usize, actual: usize) -> Self {
        Self::LengthMismatch {
            what,
            expected,
            actual,
        }
    }

    pub(crate) fn invalid(name: &'static str, value: f64, reason: &'static str) -> Self {
        Self::InvalidParameter {
            name,
            value,
            reason,
        }
    }

    /// Create a config error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
