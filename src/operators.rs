//! Second-derivative operators: Fourier pseudospectral, 3-point and 5-point stencils.
//!
//! All operators map a sampled field `f` to an approximation of `∂²f/∂x²`,
//! written into a caller-provided buffer of the same length. The stencils
//! only write the points that have enough neighbours; the remaining entries
//! keep whatever value the buffer held before.

use std::f64::consts::PI;
use std::fmt;
use std::sync::Arc;

use ndarray::{s, Array1, ArrayView1, ArrayViewMut1, Zip};
use num_complex::Complex64;
use rustfft::{Fft, FftPlanner};
use serde::{Deserialize, Serialize};

use crate::error::{Result, WaveError};
use crate::grid::Grid;

/// Spatial discretization of the second derivative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    Spectral,
    ThreePoint,
    FivePoint,
}

impl Method {
    pub const ALL: [Method; 3] = [Method::Spectral, Method::ThreePoint, Method::FivePoint];

    /// Largest stability ratio `c·dt/dx` for which leapfrog stepping with
    /// this operator stays bounded.
    ///
    /// Leapfrog is stable while `eps² · max(symbol) ≤ 4`, where the symbol
    /// maxima are `π²` (spectral), `4` (3-point) and `16/3` (5-point).
    pub fn stability_limit(self) -> f64 {
        match self {
            Method::Spectral => 2. / PI,
            Method::ThreePoint => 1.,
            Method::FivePoint => 3f64.sqrt() / 2.,
        }
    }

    /// Smallest grid the operator is defined on.
    pub fn min_points(self) -> usize {
        match self {
            Method::Spectral => 2,
            Method::ThreePoint => 3,
            Method::FivePoint => 5,
        }
    }

    /// Builds the operator for `grid`.
    pub fn operator(self, grid: &Grid) -> Result<Box<dyn SecondDerivative + Send>> {
        let nx = grid.len();
        if nx < self.min_points() {
            return Err(WaveError::GridTooSmall {
                nx,
                min: self.min_points(),
            });
        }
        Ok(match self {
            Method::Spectral => Box::new(SpectralOperator::new(nx, grid.dx())?),
            Method::ThreePoint => Box::new(ThreePointStencil::new(grid.dx())),
            Method::FivePoint => Box::new(FivePointStencil::new(grid.dx())),
        })
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Method::Spectral => "spectral",
            Method::ThreePoint => "3-point",
            Method::FivePoint => "5-point",
        };
        f.write_str(name)
    }
}

/// A spatial second-derivative operator.
///
/// Implementations may keep scratch buffers (hence `&mut self`), but the
/// output depends only on `f`.
pub trait SecondDerivative {
    fn method(&self) -> Method;

    /// Writes the second derivative of `f` into `d2f`.
    ///
    /// Panics if the lengths differ.
    fn apply(&mut self, f: ArrayView1<'_, f64>, d2f: ArrayViewMut1<'_, f64>);
}

/// Wavenumber axis in FFT order for `n` samples spaced `dx` apart.
///
/// The first half runs `0, dk, …, k_max - dk` with `k_max = π/dx` and
/// `dk = k_max/(n/2)`; the second half is the first half shifted down by
/// `k_max`, i.e. `-k_max, …, -dk`.
pub fn wavenumbers(n: usize, dx: f64) -> Result<Array1<f64>> {
    if n % 2 != 0 {
        return Err(WaveError::OddGridLength(n));
    }
    let half = n / 2;
    let k_max = PI / dx;
    let dk = k_max / half as f64;
    let mut k = Array1::zeros(n);
    for i in 0..half {
        k[i] = i as f64 * dk;
        k[half + i] = k[i] - k_max;
    }
    Ok(k)
}

/// Fourier pseudospectral second derivative with cached FFT plans.
///
/// Assumes `f` is periodic over the grid.
pub struct SpectralOperator {
    multiplier: Array1<f64>, // (ik)² = -k²
    forward: Arc<dyn Fft<f64>>,
    inverse: Arc<dyn Fft<f64>>,
    buffer: Vec<Complex64>,
    scratch: Vec<Complex64>,
}

impl SpectralOperator {
    pub fn new(n: usize, dx: f64) -> Result<Self> {
        let k = wavenumbers(n, dx)?;
        let multiplier = k.mapv(|k| -k * k);

        let mut planner = FftPlanner::new();
        let forward = planner.plan_fft_forward(n);
        let inverse = planner.plan_fft_inverse(n);
        let scratch_len = forward
            .get_inplace_scratch_len()
            .max(inverse.get_inplace_scratch_len());

        Ok(SpectralOperator {
            multiplier,
            forward,
            inverse,
            buffer: vec![Complex64::new(0., 0.); n],
            scratch: vec![Complex64::new(0., 0.); scratch_len],
        })
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

impl SecondDerivative for SpectralOperator {
    fn method(&self) -> Method {
        Method::Spectral
    }

    fn apply(&mut self, f: ArrayView1<'_, f64>, mut d2f: ArrayViewMut1<'_, f64>) {
        let n = self.buffer.len();
        assert_eq!(f.len(), n);
        assert_eq!(d2f.len(), n);

        for (b, &x) in self.buffer.iter_mut().zip(f.iter()) {
            *b = Complex64::new(x, 0.);
        }
        self.forward
            .process_with_scratch(&mut self.buffer, &mut self.scratch);
        for (b, &m) in self.buffer.iter_mut().zip(self.multiplier.iter()) {
            *b *= m;
        }
        self.inverse
            .process_with_scratch(&mut self.buffer, &mut self.scratch);

        // rustfft does not normalize the inverse transform
        let norm = 1. / n as f64;
        for (d, b) in d2f.iter_mut().zip(self.buffer.iter()) {
            *d = b.re * norm;
        }
    }
}

/// Second derivative of `f` by the Fourier method, planning the transforms on
/// every call. Use [`SpectralOperator`] inside time loops.
pub fn fourier_second_derivative(f: ArrayView1<'_, f64>, dx: f64) -> Result<Array1<f64>> {
    let mut op = SpectralOperator::new(f.len(), dx)?;
    let mut d2f = Array1::zeros(f.len());
    op.apply(f, d2f.view_mut());
    Ok(d2f)
}

/// 3-point central difference, written to `d2f[1..n-1]`.
///
/// `d2f[i] = (f[i+1] - 2f[i] + f[i-1]) / dx²`
pub fn fd3_second_derivative(f: ArrayView1<'_, f64>, mut d2f: ArrayViewMut1<'_, f64>, dx: f64) {
    let n = f.len();
    assert_eq!(d2f.len(), n);
    if n < 3 {
        return;
    }
    let dx2 = dx * dx;
    Zip::from(d2f.slice_mut(s![1..n - 1]))
        .and(f.windows(3))
        .for_each(|d, w| *d = (w[2] - 2. * w[1] + w[0]) / dx2);
}

/// 5-point central difference, written to `d2f[2..n-2]`.
///
/// `d2f[i] = (-f[i+2] + 16f[i+1] - 30f[i] + 16f[i-1] - f[i-2]) / (12 dx²)`
pub fn fd5_second_derivative(f: ArrayView1<'_, f64>, mut d2f: ArrayViewMut1<'_, f64>, dx: f64) {
    let n = f.len();
    assert_eq!(d2f.len(), n);
    if n < 5 {
        return;
    }
    let denom = 12. * dx * dx;
    Zip::from(d2f.slice_mut(s![2..n - 2]))
        .and(f.windows(5))
        .for_each(|d, w| {
            *d = (-w[4] + 16. * w[3] - 30. * w[2] + 16. * w[1] - w[0]) / denom
        });
}

#[derive(Debug, Clone, Copy)]
pub struct ThreePointStencil {
    dx: f64,
}

impl ThreePointStencil {
    pub fn new(dx: f64) -> Self {
        ThreePointStencil { dx }
    }
}

impl SecondDerivative for ThreePointStencil {
    fn method(&self) -> Method {
        Method::ThreePoint
    }

    fn apply(&mut self, f: ArrayView1<'_, f64>, d2f: ArrayViewMut1<'_, f64>) {
        fd3_second_derivative(f, d2f, self.dx);
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FivePointStencil {
    dx: f64,
}

impl FivePointStencil {
    pub fn new(dx: f64) -> Self {
        FivePointStencil { dx }
    }
}

impl SecondDerivative for FivePointStencil {
    fn method(&self) -> Method {
        Method::FivePoint
    }

    fn apply(&mut self, f: ArrayView1<'_, f64>, d2f: ArrayViewMut1<'_, f64>) {
        fd5_second_derivative(f, d2f, self.dx);
    }
}
