//! Adaptive integrator for the driven pendulum `x'' = -sin(x) + ε cos(t)`

use super::tableau::Tableau;
use super::{SolveError, Trajectory, TrajectorySolver};
use crate::constants::solver::{MAX_FACTOR, MAX_STEPS, MIN_FACTOR, SAFETY};
use crate::initial::{InitialState, linspace};
use crate::params::ParameterSet;

type State = [f64; 2];

/// Driven pendulum solved with an embedded Runge-Kutta pair
///
/// The method and tolerances come from the parameter set's quality level.
/// Steps are clipped so the integrator lands exactly on every output time.
#[derive(Debug, Clone)]
pub struct PendulumSolver {
    max_steps: usize,
}

impl Default for PendulumSolver {
    fn default() -> Self {
        Self {
            max_steps: MAX_STEPS,
        }
    }
}

impl PendulumSolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit the attempted steps per trajectory
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }
}

impl TrajectorySolver for PendulumSolver {
    fn solve(&self, initial: InitialState, params: &ParameterSet) -> Result<Trajectory, SolveError> {
        let config = params.quality.config();
        let tableau = Tableau::for_method(config.method);
        let epsilon = params.driving_amplitude;
        let rhs = |t: f64, y: State| -> State { [y[1], -y[0].sin() + epsilon * t.cos()] };

        let samples = linspace(0.0, params.time_horizon, params.sample_count());
        let max_step = params.time_horizon / config.max_step_divisor;

        let mut position = Vec::with_capacity(samples.len());
        let mut velocity = Vec::with_capacity(samples.len());
        let mut y: State = [initial.0, initial.1];
        let mut t = 0.0_f64;
        let mut h = max_step;
        let mut steps = 0usize;

        position.push(y[0]);
        velocity.push(y[1]);

        for &target in &samples[1..] {
            while t < target {
                if steps >= self.max_steps {
                    return Err(SolveError::TooManySteps {
                        limit: self.max_steps,
                    });
                }
                steps += 1;

                let remaining = target - t;
                let last = h >= remaining;
                let step = if last { remaining } else { h };

                let (y_new, err) = rk_step(tableau, &rhs, t, y, step);
                let norm = error_norm(&y, &y_new, &err, config.rtol, config.atol);

                if !norm.is_finite() || !y_new.iter().all(|v| v.is_finite()) {
                    return Err(SolveError::NonFinite { t });
                }

                if norm <= 1.0 {
                    t = if last { target } else { t + step };
                    y = y_new;
                }

                let factor = if norm == 0.0 {
                    MAX_FACTOR
                } else {
                    (SAFETY * norm.powf(-1.0 / (tableau.error_order as f64 + 1.0)))
                        .clamp(MIN_FACTOR, MAX_FACTOR)
                };
                // A clipped final step says nothing about the natural step size
                if !(last && norm <= 1.0) {
                    h = (step * factor).min(max_step);
                }

                if h <= f64::EPSILON * t.abs().max(1.0) {
                    return Err(SolveError::StepSizeUnderflow { t });
                }
            }
            position.push(y[0]);
            velocity.push(y[1]);
        }

        Trajectory::new(samples, position, velocity, initial)
    }
}

/// One explicit step; returns the new state and the embedded error estimate
fn rk_step<F>(tableau: &Tableau, rhs: &F, t: f64, y: State, h: f64) -> (State, State)
where
    F: Fn(f64, State) -> State,
{
    let mut k: Vec<State> = Vec::with_capacity(tableau.stages());

    for (i, row) in tableau.a.iter().enumerate() {
        let mut yi = y;
        for (a, kj) in row.iter().zip(&k) {
            yi[0] += h * a * kj[0];
            yi[1] += h * a * kj[1];
        }
        k.push(rhs(t + tableau.c[i] * h, yi));
    }

    let mut y_new = y;
    let mut err = [0.0; 2];
    for ((b, e), ki) in tableau.b.iter().zip(tableau.e).zip(&k) {
        y_new[0] += h * b * ki[0];
        y_new[1] += h * b * ki[1];
        err[0] += h * e * ki[0];
        err[1] += h * e * ki[1];
    }

    (y_new, err)
}

/// RMS of the error scaled by the mixed tolerance
fn error_norm(y: &State, y_new: &State, err: &State, rtol: f64, atol: f64) -> f64 {
    let sum: f64 = (0..2)
        .map(|i| {
            let scale = atol + rtol * y[i].abs().max(y_new[i].abs());
            (err[i] / scale).powi(2)
        })
        .sum();
    (sum / 2.0).sqrt()
}
