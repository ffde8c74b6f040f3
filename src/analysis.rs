//! Reference solutions and diagnostics for judging the discretizations.
//!
//! Both references are exact for the unbounded homogeneous line, so they are
//! only meaningful until the wavefield reaches the pinned boundaries.

use ndarray::{Array1, ArrayView1};

use crate::grid::Grid;
use crate::source::Source;

/// d'Alembert solution `½[g(x − ct) + g(x + ct)]` of the initial-value
/// problem `p(x, 0) = g(x)`, `p_t(x, 0) = 0`.
pub fn dalembert<G>(grid: &Grid, g: G, velocity: f64, time: f64) -> Array1<f64>
where
    G: Fn(f64) -> f64,
{
    let shift = velocity * time;
    grid.coordinates()
        .mapv(|x| 0.5 * (g(x - shift) + g(x + shift)))
}

/// Exact field after `steps` steps of the forced problem
/// `p_tt = c² p_xx + profile(x)·f(t)`, starting from rest.
///
/// The leapfrog update injects `series[k]·dt` of momentum at `t = k·dt`, so the
/// time integral of the forcing is `F(s) = dt·Σ_{k·dt < s} series[k]`. The
/// 1D Green's function `H(t − |x|/c)/(2c)` then gives
/// `p(x, T) = Σ_j profile[j]·dx·F(T − |x − x_j|/c) / (2c)`.
/// `F` is evaluated by linear interpolation through the midpoints of its
/// steps.
pub fn green_reference(grid: &Grid, source: &Source, velocity: f64, dt: f64, steps: usize) -> Array1<f64> {
    let series = source.series();
    let steps = steps.min(series.len());

    // cumulative[m] = F((m + ½)·dt)
    let mut cumulative = Vec::with_capacity(steps);
    let mut acc = 0.;
    for &s in series.iter().take(steps) {
        acc += s * dt;
        cumulative.push(acc);
    }
    let integral = |s: f64| -> f64 {
        let u = s / dt - 0.5; // knot m sits at u = m
        if u <= -1. || cumulative.is_empty() {
            return 0.;
        }
        let last = cumulative.len() - 1;
        if u >= last as f64 {
            return cumulative[last];
        }
        let m = u.floor();
        let frac = u - m;
        let lo = if m < 0. { 0. } else { cumulative[m as usize] };
        let hi = cumulative[(m + 1.) as usize];
        lo + frac * (hi - lo)
    };

    let profile = source.profile();
    let support: Vec<(f64, f64)> = profile
        .iter()
        .enumerate()
        .filter(|(_, g)| g.abs() > 1e-14)
        .map(|(j, &g)| (grid.x(j), g * grid.dx()))
        .collect();

    let time = steps as f64 * dt;
    grid.coordinates().mapv(|x| {
        let sum: f64 = support
            .iter()
            .map(|&(xj, w)| w * integral(time - (x - xj).abs() / velocity))
            .sum();
        sum / (2. * velocity)
    })
}

/// `‖a − b‖₂ / ‖b‖₂`, or the absolute norm when `b` vanishes.
pub fn relative_misfit(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> f64 {
    assert_eq!(a.len(), b.len());
    let diff: f64 = a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum();
    let norm: f64 = b.iter().map(|y| y * y).sum();
    if norm == 0. {
        diff.sqrt()
    } else {
        (diff / norm).sqrt()
    }
}

/// Largest magnitude in `field`; infinite if any entry is NaN.
pub fn max_abs(field: ArrayView1<'_, f64>) -> f64 {
    field.iter().fold(0., |m: f64, &v| {
        if v.is_nan() {
            f64::INFINITY
        } else {
            m.max(v.abs())
        }
    })
}

/// True when every entry is finite and no larger than `limit` in magnitude.
pub fn is_bounded(field: ArrayView1<'_, f64>, limit: f64) -> bool {
    field.iter().all(|v| v.is_finite() && v.abs() <= limit)
}
