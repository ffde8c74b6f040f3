//! Source terms: a band-limited pulse in time and a narrow Gaussian in space.
//!
//! The forcing added at step `k` is `profile · series[k] · dt²`.

use ndarray::{Array1, ArrayView1};

use crate::error::{Result, WaveError};
use crate::grid::Grid;

/// First-derivative-of-Gaussian pulse sampled every `dt`.
///
/// The samples are `(1/a)·d/dt exp(-(a·t)²)`, an odd pulse. Returns `floor(2·period/dt)` samples centred on `t = period`, with
/// `w_k = -2a·t_k·exp(-(a·t_k)²)`, `t_k = ((k+1) - period/dt)·dt` and
/// `a = 4/period`.
pub fn gaussian_derivative_pulse(dt: f64, period: f64) -> Array1<f64> {
    let n = (2. * period / dt) as usize;
    let t0 = period / dt;
    let a = 4. / period;
    Array1::from_shape_fn(n, |k| {
        let t = ((k + 1) as f64 - t0) * dt;
        -2. * a * t * (-(a * t).powi(2)).exp()
    })
}

/// Per-step forcing amplitudes: the first difference of `pulse`, zero-padded
/// (or truncated) to exactly `nt` entries.
pub fn source_series(pulse: ArrayView1<'_, f64>, nt: usize) -> Array1<f64> {
    let mut series = Array1::zeros(nt);
    for (k, s) in series
        .iter_mut()
        .enumerate()
        .take(pulse.len().saturating_sub(1))
    {
        *s = pulse[k + 1] - pulse[k];
    }
    series
}

/// Gaussian weighting `exp(-(x - x_s)²/width²)` around grid point `index`,
/// normalized so its peak is 1.
pub fn spatial_profile(grid: &Grid, index: usize, width: f64) -> Result<Array1<f64>> {
    if index >= grid.len() {
        return Err(WaveError::SourceOutOfBounds {
            index,
            nx: grid.len(),
        });
    }
    if width <= 0. || !width.is_finite() {
        return Err(WaveError::invalid("width", width, "must be positive and finite"));
    }
    let x0 = grid.x(index);
    let profile = grid
        .coordinates()
        .mapv(|x| (-(x - x0).powi(2) / (width * width)).exp());
    let peak = profile.iter().cloned().fold(0., f64::max);
    Ok(profile / peak)
}

/// Read-only source data shared by every discretization.
#[derive(Debug, Clone, PartialEq)]
pub struct Source {
    series: Array1<f64>,
    profile: Array1<f64>,
}

impl Source {
    /// Pairs a time series with a spatial profile.
    ///
    /// The profile must match the grid and the series must cover `nt` steps;
    /// nothing is padded or truncated here.
    pub fn new(grid: &Grid, nt: usize, series: Array1<f64>, profile: Array1<f64>) -> Result<Self> {
        grid.check_len("source profile", profile.len())?;
        if series.len() < nt {
            return Err(WaveError::length("source series", nt, series.len()));
        }
        Ok(Source { series, profile })
    }

    /// Differenced [`gaussian_derivative_pulse`] of centre frequency
    /// `frequency`, injected around `index` with a width of one grid spacing.
    pub fn gaussian_pulse(grid: &Grid, index: usize, frequency: f64, dt: f64, nt: usize) -> Result<Self> {
        if frequency <= 0. || !frequency.is_finite() {
            return Err(WaveError::invalid("frequency", frequency, "must be positive and finite"));
        }
        if dt <= 0. || !dt.is_finite() {
            return Err(WaveError::invalid("dt", dt, "must be positive and finite"));
        }
        let pulse = gaussian_derivative_pulse(dt, 1. / frequency);
        let series = source_series(pulse.view(), nt);
        let profile = spatial_profile(grid, index, grid.dx())?;
        Source::new(grid, nt, series, profile)
    }

    /// A source that never injects anything.
    pub fn silent(grid: &Grid, nt: usize) -> Self {
        Source {
            series: Array1::zeros(nt),
            profile: grid.zeros(),
        }
    }

    /// Forcing amplitude for `step`; zero past the end of the series.
    pub fn amplitude(&self, step: usize) -> f64 {
        self.series.get(step).copied().unwrap_or(0.)
    }

    pub fn series(&self) -> ArrayView1<'_, f64> {
        self.series.view()
    }

    pub fn profile(&self) -> ArrayView1<'_, f64> {
        self.profile.view()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pulse_is_odd_about_its_centre() {
        let dt = 1. / 512.;
        let period = 1. / 16.;
        let w = gaussian_derivative_pulse(dt, period);
        assert_eq!(w.len(), 64);
        // t_k = (k + 1 - 32)·dt, so sample 30 is t = -dt and sample 32 is t = +dt
        assert!(w[31].abs() < 1e-12);
        assert!((w[30] + w[32]).abs() < 1e-12);
        assert!(w[30] > 0.);
    }

    #[test]
    fn pulse_is_the_first_derivative_of_a_gaussian() {
        let dt = 1. / 512.;
        let period = 1. / 16.;
        let a = 4. / period;
        let gauss = |t: f64| (-(a * t).powi(2)).exp();
        let w = gaussian_derivative_pulse(dt, period);
        let h = 1e-7;
        for (k, &v) in w.iter().enumerate() {
            let t = ((k + 1) as f64 - period / dt) * dt;
            let derivative = (gauss(t + h) - gauss(t - h)) / (2. * h);
            assert!((v - derivative / a).abs() < 1e-6, "sample {}: {} vs {}", k, v, derivative / a);
        }
        // a maximum and a minimum, not the three extrema of a second derivative
        let extrema = (1..w.len() - 1)
            .filter(|&k| (w[k] - w[k - 1]) * (w[k + 1] - w[k]) < 0.)
            .count();
        assert_eq!(extrema, 2);
    }

    #[test]
    fn series_is_differenced_and_padded() {
        let pulse = Array1::from(vec![0., 1., 3., 6.]);
        let s = source_series(pulse.view(), 6);
        assert_eq!(s.to_vec(), vec![1., 2., 3., 0., 0., 0.]);

        let s = source_series(pulse.view(), 2);
        assert_eq!(s.to_vec(), vec![1., 2.]);

        let s = source_series(Array1::<f64>::zeros(0).view(), 3);
        assert_eq!(s.to_vec(), vec![0., 0., 0.]);
    }

    #[test]
    fn profile_peaks_at_the_source() {
        let grid = Grid::new(101, 100.).unwrap();
        let g = spatial_profile(&grid, 40, grid.dx()).unwrap();
        assert_eq!(g[40], 1.);
        assert!((g[41] - (-1f64).exp()).abs() < 1e-12);
        assert!((g[39] - g[41]).abs() < 1e-12);
        assert!(g[60] < 1e-100);
    }

    #[test]
    fn profile_rejects_bad_input() {
        let grid = Grid::new(10, 9.).unwrap();
        assert!(matches!(
            spatial_profile(&grid, 10, 1.),
            Err(WaveError::SourceOutOfBounds { index: 10, nx: 10 })
        ));
        assert!(spatial_profile(&grid, 3, 0.).is_err());
    }

    #[test]
    fn source_checks_lengths() {
        let grid = Grid::new(10, 9.).unwrap();
        let err = Source::new(&grid, 5, Array1::zeros(5), Array1::zeros(9)).unwrap_err();
        assert!(matches!(
            err,
            WaveError::LengthMismatch { expected: 10, actual: 9, .. }
        ));
        let err = Source::new(&grid, 5, Array1::zeros(4), Array1::zeros(10)).unwrap_err();
        assert!(matches!(
            err,
            WaveError::LengthMismatch { expected: 5, actual: 4, .. }
        ));
        assert!(Source::new(&grid, 5, Array1::zeros(8), Array1::zeros(10)).is_ok());
    }

    #[test]
    fn pulse_source_is_padded_to_nt() {
        let grid = Grid::new(2024, 1250.).unwrap();
        let dt = 0.2 * grid.dx() / 343.;
        let src = Source::gaussian_pulse(&grid, 1249, 60., dt, 3500).unwrap();
        assert_eq!(src.series().len(), 3500);
        let pulse_len = gaussian_derivative_pulse(dt, 1. / 60.).len();
        assert!(pulse_len < 3500);
        assert!(src.series().iter().skip(pulse_len).all(|&v| v == 0.));
        assert_eq!(src.amplitude(10_000), 0.);
        assert_eq!(src.profile()[1249], 1.);
    }
}
