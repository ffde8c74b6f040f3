use ndarray::Array1;

use crate::error::{Result, WaveError};

/// Uniform 1D grid over `[0, length]`, both end points included.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    nx: usize,   // number of points
    length: f64, // physical extent
    dx: f64,     // spacing
}

impl Grid {
    /// `dx = length/(nx - 1)`: for 2024 points over 1250 that is 0.6179,
    /// not the 0.6182 of `length/(nx - 2)`.
    pub fn new(nx: usize, length: f64) -> Result<Self> {
        if nx < 2 {
            return Err(WaveError::GridTooSmall { nx, min: 2 });
        }
        if length <= 0.0 || !length.is_finite() {
            return Err(WaveError::invalid("length", length, "must be positive and finite"));
        }
        let dx = length / (nx - 1) as f64;
        Ok(Grid { nx, length, dx })
    }

    pub fn len(&self) -> usize {
        self.nx
    }

    /// Always false; `Grid::new` needs at least two points.
    pub fn is_empty(&self) -> bool {
        self.nx == 0
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn dx(&self) -> f64 {
        self.dx
    }

    /// Physical coordinate of grid index `i`.
    pub fn x(&self, i: usize) -> f64 {
        self.dx * i as f64
    }

    pub fn coordinates(&self) -> Array1<f64> {
        Array1::from_shape_fn(self.nx, |i| self.x(i))
    }

    pub fn zeros(&self) -> Array1<f64> {
        Array1::zeros(self.nx)
    }

    /// Checks that an array belongs to this grid.
    pub(crate) fn check_len(&self, what: &'static str, len: usize) -> Result<()> {
        if len != self.nx {
            return Err(WaveError::length(what, self.nx, len));
        }
        Ok(())
    }
}
