//! Per-discretization leapfrog state.
//!
//! Each [`Propagator`] owns its own three-level field history and derivative
//! buffer; nothing is shared between discretizations except read-only
//! source data passed into [`Propagator::step`].

use std::mem;

use ndarray::{ArrayView1, ArrayViewMut1};

use crate::error::{Result, WaveError};
use crate::grid::Grid;
use crate::leapfrog_step;
use crate::operators::{Method, SecondDerivative};

/// Fields at steps `n - 1`, `n` and `n + 1`.
///
/// The three buffers are allocated independently; `next` is scratch space
/// between steps.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldHistory {
    previous: Vec<f64>,
    current: Vec<f64>,
    next: Vec<f64>,
}

impl FieldHistory {
    pub fn zeros(nx: usize) -> Self {
        FieldHistory {
            previous: vec![0.; nx],
            current: vec![0.; nx],
            next: vec![0.; nx],
        }
    }

    pub fn len(&self) -> usize {
        self.current.len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    /// `previous ← current`, `current ← next`. The old `previous` buffer
    /// becomes the new scratch `next`.
    pub fn rotate(&mut self) {
        mem::swap(&mut self.previous, &mut self.current);
        mem::swap(&mut self.current, &mut self.next);
    }

    /// Pins both end points of `current` to zero.
    pub fn enforce_boundaries(&mut self) {
        if let Some(first) = self.current.first_mut() {
            *first = 0.;
        }
        if let Some(last) = self.current.last_mut() {
            *last = 0.;
        }
    }

    pub fn previous(&self) -> ArrayView1<'_, f64> {
        ArrayView1::from(&self.previous[..])
    }

    pub fn current(&self) -> ArrayView1<'_, f64> {
        ArrayView1::from(&self.current[..])
    }
}

/// Leapfrog time stepper for one spatial discretization.
pub struct Propagator {
    method: Method,
    operator: Box<dyn SecondDerivative + Send>,
    history: FieldHistory,
    // edge entries are never written by the stencils and keep their initial zero
    d2p: Vec<f64>,
    steps: usize,
}

impl Propagator {
    /// Zero initial state on `grid`.
    pub fn new(method: Method, grid: &Grid) -> Result<Self> {
        let operator = method.operator(grid)?;
        Ok(Propagator {
            method,
            operator,
            history: FieldHistory::zeros(grid.len()),
            d2p: vec![0.; grid.len()],
            steps: 0,
        })
    }

    /// Replaces the initial `(previous, current)` pair. Both are copied.
    pub fn with_initial_state(
        mut self,
        previous: ArrayView1<'_, f64>,
        current: ArrayView1<'_, f64>,
    ) -> Result<Self> {
        self.set_initial_state(previous, current)?;
        Ok(self)
    }

    pub(crate) fn set_initial_state(
        &mut self,
        previous: ArrayView1<'_, f64>,
        current: ArrayView1<'_, f64>,
    ) -> Result<()> {
        let nx = self.history.len();
        if previous.len() != nx {
            return Err(WaveError::length("previous field", nx, previous.len()));
        }
        if current.len() != nx {
            return Err(WaveError::length("current field", nx, current.len()));
        }
        self.history.previous = previous.to_vec();
        self.history.current = current.to_vec();
        Ok(())
    }

    /// Advances one step:
    ///
    /// 1. `d2p = D²(current)`
    /// 2. `next = 2·current − previous + c²dt²·d2p`
    /// 3. `next += profile · amplitude · dt²`
    /// 4. `previous ← current`, `current ← next`
    /// 5. `current[0] = current[n−1] = 0`
    ///
    /// Panics if `profile` does not match the grid.
    pub fn step(&mut self, velocity: f64, dt: f64, amplitude: f64, profile: ArrayView1<'_, f64>) {
        let FieldHistory {
            previous,
            current,
            next,
        } = &mut self.history;
        assert_eq!(profile.len(), current.len());

        self.operator.apply(
            ArrayView1::from(&current[..]),
            ArrayViewMut1::from(&mut self.d2p[..]),
        );

        let c2dt2 = velocity * velocity * dt * dt;
        leapfrog_step(previous, current, &self.d2p, next, c2dt2);

        let scale = amplitude * dt * dt;
        for (n, &g) in next.iter_mut().zip(profile.iter()) {
            *n += g * scale;
        }

        self.history.rotate();
        self.history.enforce_boundaries();
        self.steps += 1;
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn history(&self) -> &FieldHistory {
        &self.history
    }

    pub fn current(&self) -> ArrayView1<'_, f64> {
        self.history.current()
    }

    pub fn steps_taken(&self) -> usize {
        self.steps
    }
}
