//! Application-wide constants and default values
//!
//! This module centralizes all magic numbers and default values used throughout
//! the cache, the scheduler and the front-end.

/// Result cache time-to-live defaults
pub mod cache {
    use std::time::Duration;

    /// Solved trajectory batches
    pub const TRAJECTORY_TTL: Duration = Duration::from_secs(30 * 60);

    /// Rendered phase portraits (cheap to rebuild from a live batch)
    pub const PORTRAIT_TTL: Duration = Duration::from_secs(10 * 60);

    /// Generated initial conditions, keyed by count
    pub const INITIAL_CONDITIONS_TTL: Duration = Duration::from_secs(60 * 60);
}

/// Recompute scheduler defaults
pub mod scheduler {
    use std::time::Duration;

    /// Minimum time between two automatic recomputations
    pub const MIN_RECOMPUTE_INTERVAL: Duration = Duration::from_millis(500);

    /// Slack added to a pending deadline so the gate sees the interval as elapsed
    pub const DEADLINE_SLACK: Duration = Duration::from_millis(1);
}

/// Numerical integration constants
pub mod solver {
    /// Fewest samples a trajectory may have and still be kept
    pub const MIN_TRAJECTORY_POINTS: usize = 11;

    /// Lower bound on output samples regardless of quality
    pub const MIN_OUTPUT_POINTS: usize = 50;

    /// Initial conditions handed to the solver per chunk
    pub const CHUNK_SIZE: usize = 10;

    /// Absolute tolerance shared by every quality level
    pub const ABSOLUTE_TOLERANCE: f64 = 1e-6;

    /// Hard cap on attempted steps for one trajectory
    pub const MAX_STEPS: usize = 2_000_000;

    /// Step size controller safety factor
    pub const SAFETY: f64 = 0.9;

    /// Step size controller shrink/grow limits
    pub const MIN_FACTOR: f64 = 0.2;
    pub const MAX_FACTOR: f64 = 10.0;
}

/// Initial-condition generator constants
pub mod initial {
    /// Largest count that still uses the systematic lattice
    pub const LATTICE_MAX_COUNT: usize = 20;

    /// The lone starting state used when a single trajectory is requested
    pub const SINGLE_STATE: (f64, f64) = (0.1, 0.1);

    /// Lattice velocity half-range
    pub const LATTICE_VELOCITY_SPAN: f64 = 2.0;

    /// Spiral velocity amplitude
    pub const SPIRAL_VELOCITY_AMPLITUDE: f64 = 3.0;
}

/// Parameter ranges offered by the sidebar; counts and horizons above the
/// maxima are rejected by validation
pub mod params {
    pub const DEFAULT_COUNT: usize = 8;
    pub const MAX_COUNT: usize = 5000;

    pub const DEFAULT_AMPLITUDE: f64 = 0.5;
    pub const MAX_AMPLITUDE: f64 = 2.0;
    pub const AMPLITUDE_STEP: f64 = 0.1;

    pub const DEFAULT_HORIZON: f64 = 15.0;
    pub const MIN_HORIZON: f64 = 5.0;
    pub const MAX_HORIZON: f64 = 50.0;
    pub const HORIZON_STEP: f64 = 2.5;

    /// Decimal places kept when fingerprinting
    pub const AMPLITUDE_DECIMALS: usize = 2;
    pub const HORIZON_DECIMALS: usize = 1;
}

/// Plotting and visualization defaults
pub mod plot {
    /// Trajectories drawn in one phase portrait
    pub const MAX_DISPLAYED_TRAJECTORIES: usize = 30;

    /// Curves longer than this are stride-downsampled
    pub const MAX_CURVE_POINTS: usize = 1000;

    /// Viridis ramp window used for curve colors
    pub const COLOR_RAMP_START: f64 = 0.1;
    pub const COLOR_RAMP_END: f64 = 0.9;

    pub const DEFAULT_LINE_WIDTH: f32 = 1.0;
    pub const MIN_LINE_WIDTH: f32 = 0.5;
    pub const MAX_LINE_WIDTH: f32 = 2.5;

    pub const DEFAULT_ALPHA: f32 = 0.7;
    pub const MIN_ALPHA: f32 = 0.3;
    pub const MAX_ALPHA: f32 = 1.0;

    /// Start marker radius
    pub const MARKER_RADIUS: f32 = 2.5;
}

/// UI layout defaults
pub mod layout {
    /// Left panel (parameters) default width
    pub const SIDEBAR_WIDTH: f32 = 260.0;

    /// Bottom panel (metrics) default height
    pub const METRICS_PANEL_HEIGHT: f32 = 90.0;
}

/// Configuration file paths
pub mod config {
    /// Configuration file name
    pub const CONFIG_FILE: &str = "pendulum-cache.json";
}
