//! Error types for repository operations.
//!
//! Every error carries an [`ErrorContext`] naming the operation and the board
//! it touched, so a rejected submission can be traced without extra logging.

use std::fmt;

use crate::error::EngineError;

/// Result type for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Structured context for repository errors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorContext {
    /// The operation being performed (e.g., "submit_availability", "load_snapshot")
    pub operation: Option<String>,
    /// The entity type involved (e.g., "board", "item", "option")
    pub entity: Option<String>,
    pub entity_id: Option<String>,
    pub details: Option<String>,
    /// Whether the same request may succeed later
    pub retryable: bool,
}

impl ErrorContext {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: Some(operation.into()),
            ..Default::default()
        }
    }

    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    pub fn with_entity_id(mut self, id: impl ToString) -> Self {
        self.entity_id = Some(id.to_string());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn retryable(mut self) -> Self {
        self.retryable = true;
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(ref op) = self.operation {
            parts.push(format!("operation={}", op));
        }
        if let Some(ref entity) = self.entity {
            parts.push(format!("entity={}", entity));
        }
        if let Some(ref id) = self.entity_id {
            parts.push(format!("id={}", id));
        }
        if let Some(ref details) = self.details {
            parts.push(format!("details={}", details));
        }
        if self.retryable {
            parts.push("retryable=true".to_string());
        }
        write!(f, "[{}]", parts.join(", "))
    }
}

/// Error type for repository operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RepositoryError {
    /// Storage backend unavailable.
    #[error("Connection error: {message} {context}")]
    ConnectionError {
        message: String,
        context: ErrorContext,
    },

    /// Requested board, item or option was not found.
    #[error("Not found: {message} {context}")]
    NotFound {
        message: String,
        context: ErrorContext,
    },

    /// Settings or a submission failed validation.
    #[error("Data validation error: {message} {context}")]
    ValidationError {
        message: String,
        context: ErrorContext,
    },

    /// Submission rejected by the rate limiter.
    #[error("Rate limited: retry in {retry_after_secs}s {context}")]
    RateLimited {
        retry_after_secs: i64,
        context: ErrorContext,
    },

    /// Configuration or initialization error.
    #[error("Configuration error: {message} {context}")]
    ConfigurationError {
        message: String,
        context: ErrorContext,
    },

    /// Internal/unexpected errors.
    #[error("Internal error: {message} {context}")]
    InternalError {
        message: String,
        context: ErrorContext,
    },
}

impl RepositoryError {
    pub fn connection(message: impl Into<String>) -> Self {
        Self::ConnectionError {
            message: message.into(),
            context: ErrorContext::default().retryable(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    pub fn not_found_with_context(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::NotFound {
            message: message.into(),
            context,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    pub fn validation_with_context(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::ValidationError {
            message: message.into(),
            context,
        }
    }

    pub fn rate_limited(retry_after_secs: i64) -> Self {
        Self::RateLimited {
            retry_after_secs,
            context: ErrorContext::default().retryable(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::ConfigurationError {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    /// Check if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        self.context().retryable
    }

    /// Get the error context.
    pub fn context(&self) -> &ErrorContext {
        match self {
            Self::ConnectionError { context, .. }
            | Self::NotFound { context, .. }
            | Self::ValidationError { context, .. }
            | Self::RateLimited { context, .. }
            | Self::ConfigurationError { context, .. }
            | Self::InternalError { context, .. } => context,
        }
    }

    fn context_mut(&mut self) -> &mut ErrorContext {
        match self {
            Self::ConnectionError { context, .. }
            | Self::NotFound { context, .. }
            | Self::ValidationError { context, .. }
            | Self::RateLimited { context, .. }
            | Self::ConfigurationError { context, .. }
            | Self::InternalError { context, .. } => context,
        }
    }

    /// Add or update the operation in the error context.
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.context_mut().operation = Some(operation.into());
        self
    }

    /// Record the board an error relates to, unless a more specific entity
    /// is already set.
    pub fn for_board(mut self, board_id: impl ToString) -> Self {
        let context = self.context_mut();
        if context.entity.is_none() {
            context.entity = Some("board".to_string());
            context.entity_id = Some(board_id.to_string());
        }
        self
    }
}

impl From<EngineError> for RepositoryError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::RateLimited { retry_after_secs } => {
                RepositoryError::rate_limited(retry_after_secs)
            }
            EngineError::Configuration(message) => RepositoryError::configuration(message),
            other => RepositoryError::validation(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_display() {
        let context = ErrorContext::new("cast_poll_ballot")
            .with_entity("board")
            .with_entity_id(42)
            .with_details("option 7");
        assert_eq!(
            context.to_string(),
            "[operation=cast_poll_ballot, entity=board, id=42, details=option 7]"
        );
    }

    #[test]
    fn test_from_engine_error() {
        let err: RepositoryError = EngineError::InvalidBallot("unknown option 3".into()).into();
        assert!(matches!(err, RepositoryError::ValidationError { .. }));
        assert!(!err.is_retryable());

        let err: RepositoryError = EngineError::RateLimited {
            retry_after_secs: 30,
        }
        .into();
        assert!(matches!(
            err,
            RepositoryError::RateLimited {
                retry_after_secs: 30,
                ..
            }
        ));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_with_operation_and_board() {
        let err = RepositoryError::not_found("Board 9 not found")
            .with_operation("get_board")
            .for_board(9);
        let context = err.context();
        assert_eq!(context.operation.as_deref(), Some("get_board"));
        assert_eq!(context.entity_id.as_deref(), Some("9"));
        assert!(err.to_string().starts_with("Not found: Board 9 not found"));
    }
}
