use thiserror::Error;

/// Errors raised by chain construction and kinematic queries.
///
/// Copy + static messages for cheap propagation in hot paths.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum KinematicsError {
    /// An angle vector's length does not match the chain's joint count.
    #[error("Joint vector length mismatch: expected {expected}, got {got}")]
    JointCountMismatch { expected: usize, got: usize },

    /// A link length supplied at chain construction is unusable.
    #[error("Link {index} has invalid length {length} (must be finite and > 0)")]
    InvalidLinkLength { index: usize, length: f64 },

    /// A solver configuration field is out of range.
    #[error("Invalid solver configuration: {0}")]
    InvalidSolverConfig(&'static str),
}
