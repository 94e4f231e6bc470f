//! Simulation parameters and the quality table

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::params::{MAX_COUNT, MAX_HORIZON};
use crate::constants::solver::ABSOLUTE_TOLERANCE;
use crate::error::{Result, SimError};

/// Computation quality level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quality {
    Fast,
    Balanced,
    High,
}

impl Default for Quality {
    fn default() -> Self {
        Quality::Balanced
    }
}

impl Quality {
    pub const ALL: [Quality; 3] = [Quality::Fast, Quality::Balanced, Quality::High];

    /// Solver configuration for this quality level
    pub fn config(self) -> QualityConfig {
        match self {
            Quality::Fast => QualityConfig {
                rtol: 1e-6,
                atol: ABSOLUTE_TOLERANCE,
                points_per_unit: 20,
                method: MethodTag::BogackiShampine23,
                max_step_divisor: 100.0,
            },
            Quality::Balanced => QualityConfig {
                rtol: 1e-7,
                atol: ABSOLUTE_TOLERANCE,
                points_per_unit: 30,
                method: MethodTag::DormandPrince54,
                max_step_divisor: 100.0,
            },
            Quality::High => QualityConfig {
                rtol: 1e-8,
                atol: ABSOLUTE_TOLERANCE,
                points_per_unit: 50,
                method: MethodTag::DormandPrince54,
                max_step_divisor: 200.0,
            },
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Quality::Fast => "Fast",
            Quality::Balanced => "Balanced",
            Quality::High => "High",
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Embedded Runge-Kutta pair used by the integrator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MethodTag {
    /// Bogacki-Shampine 3(2)
    BogackiShampine23,
    /// Dormand-Prince 5(4)
    DormandPrince54,
}

/// Solver settings derived from a [`Quality`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualityConfig {
    /// Relative tolerance
    pub rtol: f64,
    /// Absolute tolerance
    pub atol: f64,
    /// Output samples per unit of simulated time
    pub points_per_unit: usize,
    pub method: MethodTag,
    /// Largest step is `time_horizon / max_step_divisor`
    pub max_step_divisor: f64,
}

/// Everything that determines a simulation's output
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterSet {
    /// Number of trajectories
    pub count: usize,
    /// Driving amplitude ε
    pub driving_amplitude: f64,
    /// Simulated time span [0, horizon]
    pub time_horizon: f64,
    pub quality: Quality,
}

impl ParameterSet {
    pub fn new(count: usize, driving_amplitude: f64, time_horizon: f64, quality: Quality) -> Self {
        Self {
            count,
            driving_amplitude,
            time_horizon,
            quality,
        }
    }

    /// Reject sets the solver cannot run
    pub fn validate(&self) -> Result<()> {
        if self.count < 1 {
            return Err(SimError::InvalidParameters(format!(
                "trajectory count must be at least 1 (got {})",
                self.count
            )));
        }
        if self.count > MAX_COUNT {
            return Err(SimError::InvalidParameters(format!(
                "trajectory count must be at most {MAX_COUNT} (got {})",
                self.count
            )));
        }
        if !self.driving_amplitude.is_finite() {
            return Err(SimError::InvalidParameters(format!(
                "driving amplitude must be finite (got {})",
                self.driving_amplitude
            )));
        }
        if !self.time_horizon.is_finite() || self.time_horizon <= 0.0 {
            return Err(SimError::InvalidParameters(format!(
                "time horizon must be a positive number (got {})",
                self.time_horizon
            )));
        }
        if self.time_horizon > MAX_HORIZON {
            return Err(SimError::InvalidParameters(format!(
                "time horizon must be at most {MAX_HORIZON} (got {})",
                self.time_horizon
            )));
        }
        Ok(())
    }

    /// Number of output samples along each trajectory
    pub fn sample_count(&self) -> usize {
        use crate::constants::solver::MIN_OUTPUT_POINTS;

        let per_unit = self.quality.config().points_per_unit as f64;
        ((self.time_horizon * per_unit).floor() as usize).max(MIN_OUTPUT_POINTS)
    }
}

impl Default for ParameterSet {
    fn default() -> Self {
        use crate::constants::params::*;

        Self {
            count: DEFAULT_COUNT,
            driving_amplitude: DEFAULT_AMPLITUDE,
            time_horizon: DEFAULT_HORIZON,
            quality: Quality::default(),
        }
    }
}
