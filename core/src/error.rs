use crate::models::TaskStatus;
use thiserror::Error;

/// Result type alias for task operations
pub type Result<T> = std::result::Result<T, TaskError>;

/// Error taxonomy for the task tracker.
///
/// Covers every failure mode the domain and repository layers can report.
/// Each variant maps to an HTTP status code through [`TaskError::status_code`]
/// so the transport layer never has to pattern-match variants itself.
///
/// # Examples
///
/// ```rust
/// use tracker_core::error::TaskError;
/// use tracker_core::models::TaskStatus;
///
/// let not_found = TaskError::NotFound(42);
/// assert!(not_found.is_not_found());
/// assert_eq!(not_found.status_code(), 404);
///
/// let bad_move = TaskError::invalid_transition(TaskStatus::Open, TaskStatus::Done);
/// assert_eq!(bad_move.status_code(), 422);
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    /// Task not found by id
    #[error("task {0} not found")]
    NotFound(i64),

    /// Invalid lifecycle transition attempted
    #[error("invalid status transition from {0} to {1}")]
    InvalidStatusTransition(TaskStatus, TaskStatus),

    /// Validation error with details
    #[error("validation error: {0}")]
    Validation(String),

    /// Database operation error
    #[error("database error: {0}")]
    Database(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Internal error that should never surface in normal operation
    #[error("internal error: {0}")]
    Internal(String),
}

impl TaskError {
    /// Create a validation error for an empty required field
    pub fn empty_field(field: &str) -> Self {
        Self::Validation(format!("field '{field}' cannot be empty"))
    }

    /// Create a status transition error
    pub fn invalid_transition(from: TaskStatus, to: TaskStatus) -> Self {
        Self::InvalidStatusTransition(from, to)
    }

    /// Check if this error indicates a missing task
    pub fn is_not_found(&self) -> bool {
        matches!(self, TaskError::NotFound(_))
    }

    /// Check if this error indicates a validation problem
    pub fn is_validation(&self) -> bool {
        matches!(self, TaskError::Validation(_))
    }

    /// Check if this error indicates a storage problem
    pub fn is_database(&self) -> bool {
        matches!(self, TaskError::Database(_))
    }

    /// HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            TaskError::NotFound(_) => 404,
            TaskError::Validation(_) => 400,
            TaskError::InvalidStatusTransition(_, _) => 422,
            TaskError::Database(_) => 500,
            TaskError::Configuration(_) => 500,
            TaskError::Internal(_) => 500,
        }
    }
}
