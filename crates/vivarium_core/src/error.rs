//! Error types for the simulation engine.

use thiserror::Error;

/// Fatal simulation errors. Out-of-range gene indices are deliberately not
/// represented here: sparse genome addressing makes them a normal
/// steady-state case, handled as "contributes nothing" at evaluation time.
#[derive(Error, Debug)]
pub enum SimError {
    /// An operation was invoked before `start`.
    #[error("simulation has not been started")]
    NotStarted,

    /// The sensor vector handed to a brain had the wrong arity. This is a
    /// programming defect; the tick is aborted rather than truncating.
    #[error("sensor vector arity mismatch: expected {expected}, got {got}")]
    SensorArityMismatch { expected: usize, got: usize },
}

/// Result type alias for simulation operations.
pub type Result<T> = std::result::Result<T, SimError>;
