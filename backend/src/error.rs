//! Error types for settings and submission validation.
//!
//! The aggregation functions themselves never fail on validated input; these
//! errors are raised at the boundary, before a board or a contribution is
//! accepted.

use thiserror::Error;

use crate::models::BoardKind;

/// Result type for boundary validation.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors raised while validating settings, submissions and configuration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// Grid settings violate a structural invariant
    #[error("Invalid grid settings: {0}")]
    InvalidSettings(String),

    /// The declared time zone is not a known IANA zone
    #[error("Unknown time zone: {0}")]
    UnknownTimezone(String),

    /// Poll ballot rejected (unknown option, too many selections, ...)
    #[error("Invalid ballot: {0}")]
    InvalidBallot(String),

    /// Contribution payload rejected
    #[error("Invalid contribution: {0}")]
    InvalidContribution(String),

    /// Submission rejected by the rate limiter
    #[error("Rate limited: retry in {retry_after_secs}s")]
    RateLimited { retry_after_secs: i64 },

    /// Operation addressed to a board of another tool type
    #[error("Board kind mismatch: expected {expected}, found {found}")]
    KindMismatch { expected: BoardKind, found: BoardKind },

    /// Configuration file or environment override could not be applied
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl EngineError {
    /// Whether the caller can retry the same request later.
    pub fn is_retryable(&self) -> bool {
        matches!(self, EngineError::RateLimited { .. })
    }
}
