//! Pseudospectral and finite difference methods for the 1D acoustic wave equation
//! with pressure-free (zero Dirichlet) boundary data.
//!
//! The same explicit leapfrog scheme is driven by three interchangeable
//! second-derivative operators: a Fourier pseudospectral one and 3-point and
//! 5-point central stencils. Running them side by side on one grid shows the
//! numerical dispersion of the stencils against the spectral reference.
//!
//! ```no_run
//! use psfd_wave::{Grid, Method, Simulation, SimulationParams, Source};
//!
//! let grid = Grid::new(2024, 1250.).unwrap();
//! let params = SimulationParams::from_stability_ratio(&grid, 343., 0.2, 3500, 50);
//! let source = Source::gaussian_pulse(&grid, 1249, 60., params.dt, params.nt).unwrap();
//! let mut sim = Simulation::new(grid, params, source, &Method::ALL).unwrap();
//! sim.run_with(|snap| println!("t = {:.4}", snap.time));
//! ```

pub mod analysis;
pub mod config;
pub mod error;
pub mod grid;
pub mod operators;
pub mod simulation;
pub mod source;
pub mod stepper;

pub use config::Config;
pub use error::{Result, WaveError};
pub use grid::Grid;
pub use operators::{Method, SecondDerivative};
pub use simulation::{Observer, RecordedSnapshot, Simulation, SimulationParams, Snapshot,
                     SnapshotRecorder};
pub use source::Source;
pub use stepper::{FieldHistory, Propagator};

/// Performs one leapfrog step of the wave equation `p_tt = c² p_xx`, without
/// source or boundary treatment.
///
/// The discretization is the standard central 2nd order difference in time;
/// the spatial part comes in precomputed as `d2p`.
///
/// - `previous`: value at step `n - 1`
/// - `current`: value at step `n`
/// - `d2p`: second spatial derivative of `current`
/// - `next`: computed value at step `n + 1`
/// - `c2dt2`: c²·τ², where c is the velocity and τ the time step
pub fn leapfrog_step(previous: &[f64], current: &[f64], d2p: &[f64], next: &mut [f64], c2dt2: f64) {
    let n = current.len();
    assert_eq!(previous.len(), n);
    assert_eq!(d2p.len(), n);
    assert_eq!(next.len(), n);

    for (((w, &v), &u), &d) in next.iter_mut().zip(current).zip(previous).zip(d2p) {
        *w = 2. * v - u + c2dt2 * d;
    }
}
