//! Driver: steps every discretization through `nt` steps and hands periodic
//! read-only snapshots to an observer.

use ndarray::ArrayView1;
#[cfg(feature = "rayon")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{Result, WaveError};
use crate::grid::Grid;
use crate::operators::Method;
use crate::source::Source;
use crate::stepper::Propagator;

/// Time axis and medium.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationParams {
    pub velocity: f64,            // homogeneous wave speed
    pub dt: f64,                  // time step
    pub nt: usize,                // number of steps
    pub snapshot_interval: usize, // steps between snapshots
}

impl SimulationParams {
    /// `dt = eps·dx/c`.
    ///
    /// `eps` is not checked here; leapfrog blows up once it exceeds
    /// [`Method::stability_limit`].
    pub fn from_stability_ratio(
        grid: &Grid,
        velocity: f64,
        eps: f64,
        nt: usize,
        snapshot_interval: usize,
    ) -> Self {
        SimulationParams {
            velocity,
            dt: eps * grid.dx() / velocity,
            nt,
            snapshot_interval,
        }
    }

    /// `c·dt/dx`.
    pub fn stability_ratio(&self, grid: &Grid) -> f64 {
        self.velocity * self.dt / grid.dx()
    }

    pub fn total_time(&self) -> f64 {
        self.nt as f64 * self.dt
    }

    fn validate(&self) -> Result<()> {
        if self.velocity <= 0. || !self.velocity.is_finite() {
            return Err(WaveError::invalid("velocity", self.velocity, "must be positive and finite"));
        }
        if self.dt <= 0. || !self.dt.is_finite() {
            return Err(WaveError::invalid("dt", self.dt, "must be positive and finite"));
        }
        if self.snapshot_interval == 0 {
            return Err(WaveError::invalid("snapshot_interval", 0., "must be at least 1"));
        }
        Ok(())
    }
}

/// Read-only view of every discretization's current field.
#[derive(Debug, Clone)]
pub struct Snapshot<'a> {
    pub step: usize,
    pub time: f64,
    pub fields: Vec<(Method, ArrayView1<'a, f64>)>,
}

impl<'a> Snapshot<'a> {
    pub fn field(&self, method: Method) -> Option<ArrayView1<'a, f64>> {
        self.fields
            .iter()
            .find(|(m, _)| *m == method)
            .map(|(_, f)| f.clone())
    }
}

/// Consumer of periodic snapshots.
pub trait Observer {
    fn observe(&mut self, snapshot: &Snapshot<'_>);
}

impl<F> Observer for F
where
    F: FnMut(&Snapshot<'_>),
{
    fn observe(&mut self, snapshot: &Snapshot<'_>) {
        self(snapshot)
    }
}

/// Owned copy of one discretization's field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedField {
    pub method: Method,
    pub values: Vec<f64>,
}

/// Owned copy of a [`Snapshot`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedSnapshot {
    pub step: usize,
    pub time: f64,
    pub fields: Vec<RecordedField>,
}

impl RecordedSnapshot {
    pub fn field(&self, method: Method) -> Option<&[f64]> {
        self.fields
            .iter()
            .find(|f| f.method == method)
            .map(|f| &f.values[..])
    }
}

impl From<&Snapshot<'_>> for RecordedSnapshot {
    fn from(snapshot: &Snapshot<'_>) -> Self {
        RecordedSnapshot {
            step: snapshot.step,
            time: snapshot.time,
            fields: snapshot
                .fields
                .iter()
                .map(|(method, f)| RecordedField {
                    method: *method,
                    values: f.to_vec(),
                })
                .collect(),
        }
    }
}

/// Observer that keeps every snapshot it sees.
#[derive(Debug, Clone, Default)]
pub struct SnapshotRecorder {
    pub snapshots: Vec<RecordedSnapshot>,
}

impl SnapshotRecorder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Observer for SnapshotRecorder {
    fn observe(&mut self, snapshot: &Snapshot<'_>) {
        self.snapshots.push(RecordedSnapshot::from(snapshot));
    }
}

/// All selected discretizations advancing on one grid with one source.
pub struct Simulation {
    grid: Grid,
    params: SimulationParams,
    source: Source,
    propagators: Vec<Propagator>,
    current_step: usize,
}

impl Simulation {
    /// Validates the setup and allocates an independent propagator for each
    /// method. Fails on empty or duplicated `methods`, on source arrays that
    /// do not match the grid or cover fewer than `nt` steps, and on grids the
    /// operators cannot handle (odd length for the spectral method).
    pub fn new(grid: Grid, params: SimulationParams, source: Source, methods: &[Method]) -> Result<Self> {
        params.validate()?;
        if methods.is_empty() {
            return Err(WaveError::NoMethods);
        }
        for (i, m) in methods.iter().enumerate() {
            if methods[..i].contains(m) {
                return Err(WaveError::config(format!("method {} selected twice", m)));
            }
        }
        grid.check_len("source profile", source.profile().len())?;
        if source.series().len() < params.nt {
            return Err(WaveError::length("source series", params.nt, source.series().len()));
        }

        let eps = params.stability_ratio(&grid);
        let propagators = methods
            .iter()
            .map(|&m| {
                if eps > m.stability_limit() {
                    warn!(
                        method = %m,
                        eps,
                        limit = m.stability_limit(),
                        "stability ratio exceeds the leapfrog limit; expect unbounded growth"
                    );
                }
                Propagator::new(m, &grid)
            })
            .collect::<Result<Vec<_>>>()?;

        info!(
            nx = grid.len(),
            dx = grid.dx(),
            dt = params.dt,
            nt = params.nt,
            eps,
            methods = ?methods,
            "simulation ready"
        );

        Ok(Simulation {
            grid,
            params,
            source,
            propagators,
            current_step: 0,
        })
    }

    /// Sets the same `(previous, current)` initial pair for every method.
    /// Each propagator gets its own copy. Only allowed before the first step.
    pub fn set_initial_state(
        &mut self,
        previous: ArrayView1<'_, f64>,
        current: ArrayView1<'_, f64>,
    ) -> Result<()> {
        if self.current_step > 0 {
            return Err(WaveError::config("initial state must be set before the first step"));
        }
        for p in &mut self.propagators {
            p.set_initial_state(previous, current)?;
        }
        Ok(())
    }

    /// Advances every discretization by one step. Does nothing once
    /// `nt` steps have been taken.
    pub fn step(&mut self) {
        if self.is_finished() {
            return;
        }
        let amplitude = self.source.amplitude(self.current_step);
        let profile = self.source.profile();
        let (velocity, dt) = (self.params.velocity, self.params.dt);

        #[cfg(feature = "rayon")]
        self.propagators
            .par_iter_mut()
            .for_each(|p| p.step(velocity, dt, amplitude, profile));

        #[cfg(not(feature = "rayon"))]
        self.propagators
            .iter_mut()
            .for_each(|p| p.step(velocity, dt, amplitude, profile));

        self.current_step += 1;
    }

    /// Runs the remaining steps, calling `observer` with the initial state
    /// (when starting from step 0), every `snapshot_interval` steps and after
    /// the final step.
    pub fn run<O: Observer + ?Sized>(&mut self, observer: &mut O) {
        if self.current_step == 0 {
            self.emit(observer);
        }
        while !self.is_finished() {
            self.step();
            if self.current_step % self.params.snapshot_interval == 0 || self.is_finished() {
                self.emit(observer);
            }
        }
        info!(
            steps = self.current_step,
            time = self.current_time(),
            "simulation complete"
        );
    }

    /// [`run`](Self::run) with a closure.
    pub fn run_with<F>(&mut self, mut observer: F)
    where
        F: FnMut(&Snapshot<'_>),
    {
        self.run(&mut observer);
    }

    /// Runs to completion and returns the recorded snapshots.
    pub fn run_recorded(&mut self) -> Vec<RecordedSnapshot> {
        let mut recorder = SnapshotRecorder::new();
        self.run(&mut recorder);
        recorder.snapshots
    }

    fn emit<O: Observer + ?Sized>(&self, observer: &mut O) {
        let snapshot = self.snapshot();
        debug!(step = snapshot.step, time = snapshot.time, "snapshot");
        observer.observe(&snapshot);
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            step: self.current_step,
            time: self.current_time(),
            fields: self
                .propagators
                .iter()
                .map(|p| (p.method(), p.current()))
                .collect(),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.current_step >= self.params.nt
    }

    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn current_time(&self) -> f64 {
        self.current_step as f64 * self.params.dt
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    pub fn methods(&self) -> Vec<Method> {
        self.propagators.iter().map(|p| p.method()).collect()
    }

    pub fn propagator(&self, method: Method) -> Option<&Propagator> {
        self.propagators.iter().find(|p| p.method() == method)
    }
}
