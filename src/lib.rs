//! Parameterized-computation cache for a driven-pendulum phase-space explorer
//!
//! Batches of pendulum trajectories are expensive to solve, so every result
//! is keyed by a fingerprint of the parameters that produced it and kept for
//! a bounded time. Parameter changes go through a debounced scheduler that
//! decides between reuse, deferral and recomputation.

pub mod config;
pub mod constants;
pub mod error;
pub mod fingerprint;
pub mod initial;
pub mod params;
pub mod perf;
pub mod portrait;
pub mod scheduler;
pub mod session;
pub mod solver;

pub use config::Settings;
pub use error::{Result, SimError};
pub use fingerprint::{Fingerprint, fingerprint};
pub use params::{ParameterSet, Quality};
pub use perf::{BackgroundWorker, CacheTtls, ResultCache, WorkerRequest, WorkerResult};
pub use portrait::{PhasePortrait, PortraitStyle};
pub use scheduler::{Emission, Mode, Phase, RecomputeScheduler, Request, SchedulerState, Status};
pub use session::Session;
pub use solver::{PendulumSolver, Trajectory, TrajectoryBatch, TrajectorySolver};
