//! Error types for srs-core.

use thiserror::Error;

/// Result type alias using SchedulingError.
pub type Result<T> = std::result::Result<T, SchedulingError>;

/// Errors surfaced at the boundary of the scheduling core.
///
/// Both variants indicate caller bugs rather than recoverable runtime
/// conditions: grading itself is total and never fails.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchedulingError {
    #[error("invalid rating value {0}, expected 1-4")]
    InvalidRating(u8),

    #[error("{action} is not allowed while session is {phase}")]
    InvalidTransition {
        action: &'static str,
        phase: &'static str,
    },
}
