//! Error types for pendulum-cache
//!
//! Structured error handling using thiserror. Cache misses are ordinary
//! control flow and never show up here.

use thiserror::Error;

use crate::solver::SolveError;

/// Main error type for cache, scheduler and settings operations
#[derive(Error, Debug)]
pub enum SimError {
    /// Parameter set rejected before fingerprinting
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    /// A single trajectory could not be solved
    #[error("Solver failure: {0}")]
    Solve(#[from] SolveError),

    /// Every trajectory of a batch failed
    #[error("All {attempted} trajectories failed to solve")]
    EmptyBatch { attempted: usize },

    /// File I/O error
    #[error("Failed to access file: {0}")]
    FileIo(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration file error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The background worker thread has exited
    #[error("Background worker disconnected")]
    WorkerDisconnected,
}

/// Result type alias for pendulum-cache operations
pub type Result<T> = std::result::Result<T, SimError>;

/// UI-friendly error message formatting
impl SimError {
    /// Get a user-friendly error message suitable for displaying in UI
    pub fn user_message(&self) -> String {
        match self {
            SimError::InvalidParameters(msg) => format!("Invalid input: {}", msg),
            SimError::Solve(e) => format!("Trajectory failed: {}", e),
            SimError::EmptyBatch { attempted } => {
                format!("None of the {} trajectories could be solved", attempted)
            }
            SimError::FileIo(e) => format!("File error: {}", e),
            SimError::Json(e) => format!("JSON error: {}", e),
            SimError::Config(msg) => format!("Config error: {}", msg),
            SimError::WorkerDisconnected => "Computation worker stopped".to_string(),
        }
    }

    /// Get a short title for the error (for toast notifications)
    pub fn title(&self) -> &'static str {
        match self {
            SimError::InvalidParameters(_) => "Invalid Parameters",
            SimError::Solve(_) => "Solver Error",
            SimError::EmptyBatch { .. } => "No Trajectories",
            SimError::FileIo(_) => "File Error",
            SimError::Json(_) => "JSON Error",
            SimError::Config(_) => "Configuration Error",
            SimError::WorkerDisconnected => "Worker Error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = SimError::EmptyBatch { attempted: 8 };
        assert_eq!(
            err.user_message(),
            "None of the 8 trajectories could be solved"
        );
        assert_eq!(err.title(), "No Trajectories");

        let err = SimError::InvalidParameters("count must be at least 1".to_string());
        assert_eq!(err.user_message(), "Invalid input: count must be at least 1");
    }

    #[test]
    fn test_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let sim_err: SimError = io_err.into();
        assert!(matches!(sim_err, SimError::FileIo(_)));

        let solve_err: SimError = SolveError::TooFewPoints { got: 3, min: 11 }.into();
        assert!(matches!(solve_err, SimError::Solve(_)));
    }
}
