//! Trajectory solving
//!
//! The scheduler only relies on the [`TrajectorySolver`] contract: one initial
//! state in, one trajectory or one failure out. [`PendulumSolver`] is the
//! built-in implementation for the driven pendulum.

mod pendulum;
mod tableau;

pub use pendulum::PendulumSolver;
pub use tableau::Tableau;

use thiserror::Error;
use tracing::debug;

use crate::constants::solver::{CHUNK_SIZE, MIN_TRAJECTORY_POINTS};
use crate::initial::InitialState;
use crate::params::ParameterSet;

/// Why a single trajectory was dropped
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolveError {
    #[error("step size underflow at t = {t}")]
    StepSizeUnderflow { t: f64 },

    #[error("state became non-finite at t = {t}")]
    NonFinite { t: f64 },

    #[error("step budget of {limit} exhausted")]
    TooManySteps { limit: usize },

    #[error("only {got} points, at least {min} required")]
    TooFewPoints { got: usize, min: usize },

    #[error("malformed trajectory: {0}")]
    Malformed(String),
}

/// Produces one trajectory per initial state
pub trait TrajectorySolver {
    fn solve(&self, initial: InitialState, params: &ParameterSet) -> Result<Trajectory, SolveError>;
}

impl<S: TrajectorySolver + ?Sized> TrajectorySolver for &S {
    fn solve(&self, initial: InitialState, params: &ParameterSet) -> Result<Trajectory, SolveError> {
        (**self).solve(initial, params)
    }
}

impl<S: TrajectorySolver + ?Sized> TrajectorySolver for Box<S> {
    fn solve(&self, initial: InitialState, params: &ParameterSet) -> Result<Trajectory, SolveError> {
        (**self).solve(initial, params)
    }
}

/// One solved trajectory
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    time: Vec<f64>,
    position: Vec<f64>,
    velocity: Vec<f64>,
    initial: InitialState,
}

impl Trajectory {
    /// Build a trajectory, checking that the series line up
    pub fn new(
        time: Vec<f64>,
        position: Vec<f64>,
        velocity: Vec<f64>,
        initial: InitialState,
    ) -> Result<Self, SolveError> {
        if time.len() != position.len() || time.len() != velocity.len() {
            return Err(SolveError::Malformed(format!(
                "series lengths differ: t={}, x={}, v={}",
                time.len(),
                position.len(),
                velocity.len()
            )));
        }
        if time.windows(2).any(|w| w[1] <= w[0]) {
            return Err(SolveError::Malformed("time points not ascending".to_string()));
        }
        Ok(Self {
            time,
            position,
            velocity,
            initial,
        })
    }

    pub fn time(&self) -> &[f64] {
        &self.time
    }

    pub fn position(&self) -> &[f64] {
        &self.position
    }

    pub fn velocity(&self) -> &[f64] {
        &self.velocity
    }

    pub fn initial(&self) -> InitialState {
        self.initial
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    pub fn final_position(&self) -> Option<f64> {
        self.position.last().copied()
    }
}

/// Success/failure tally of one batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub attempted: usize,
    pub succeeded: usize,
}

impl BatchReport {
    pub fn failed(&self) -> usize {
        self.attempted - self.succeeded
    }
}

/// Every successfully solved trajectory for one parameter set
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrajectoryBatch {
    trajectories: Vec<Trajectory>,
    report: BatchReport,
}

impl TrajectoryBatch {
    pub fn new(trajectories: Vec<Trajectory>, report: BatchReport) -> Self {
        Self {
            trajectories,
            report,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn trajectories(&self) -> &[Trajectory] {
        &self.trajectories
    }

    pub fn report(&self) -> BatchReport {
        self.report
    }

    pub fn len(&self) -> usize {
        self.trajectories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trajectories.is_empty()
    }

    /// Mean sample count per trajectory
    pub fn average_points(&self) -> f64 {
        if self.trajectories.is_empty() {
            return 0.0;
        }
        let total: usize = self.trajectories.iter().map(Trajectory::len).sum();
        total as f64 / self.trajectories.len() as f64
    }

    /// Peak-to-peak spread of final positions
    pub fn final_position_spread(&self) -> f64 {
        let finals = self.trajectories.iter().filter_map(Trajectory::final_position);
        let (min, max) = finals.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), x| {
            (lo.min(x), hi.max(x))
        });
        if min.is_finite() && max.is_finite() {
            max - min
        } else {
            0.0
        }
    }
}

/// Solve every initial state, dropping failures
pub fn solve_batch<S: TrajectorySolver + ?Sized>(
    solver: &S,
    initial: &[InitialState],
    params: &ParameterSet,
) -> TrajectoryBatch {
    let chunk = CHUNK_SIZE.min(initial.len()).max(1);
    solve_batch_chunked(solver, initial, params, chunk)
}

/// [`solve_batch`] with an explicit chunk size
///
/// Chunking only groups work; the output is the same for any `chunk_size`.
pub fn solve_batch_chunked<S: TrajectorySolver + ?Sized>(
    solver: &S,
    initial: &[InitialState],
    params: &ParameterSet,
    chunk_size: usize,
) -> TrajectoryBatch {
    profiling::scope!("solve_batch");

    let mut trajectories = Vec::with_capacity(initial.len());
    let mut report = BatchReport {
        attempted: initial.len(),
        succeeded: 0,
    };

    for (chunk_index, chunk) in initial.chunks(chunk_size.max(1)).enumerate() {
        profiling::scope!("solve_chunk");

        let results: Vec<Result<Trajectory, SolveError>> = chunk
            .iter()
            .map(|&state| solver.solve(state, params).and_then(check_quality))
            .collect();

        for (offset, result) in results.into_iter().enumerate() {
            match result {
                Ok(trajectory) => {
                    report.succeeded += 1;
                    trajectories.push(trajectory);
                }
                Err(e) => {
                    let index = chunk_index * chunk_size.max(1) + offset;
                    debug!(index, error = %e, "dropping trajectory");
                }
            }
        }
    }

    TrajectoryBatch::new(trajectories, report)
}

fn check_quality(trajectory: Trajectory) -> Result<Trajectory, SolveError> {
    if trajectory.len() < MIN_TRAJECTORY_POINTS {
        return Err(SolveError::TooFewPoints {
            got: trajectory.len(),
            min: MIN_TRAJECTORY_POINTS,
        });
    }
    Ok(trajectory)
}
