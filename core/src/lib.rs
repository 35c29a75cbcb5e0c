//! Tracker Core Library
//!
//! Foundational domain models, business rules, and trait interfaces for the
//! task tracker. Every other crate in the workspace depends on the types
//! defined here; this crate itself performs no I/O.
//!
//! # Architecture
//!
//! - [`models`] - Core domain models (Task, TaskStatus, DTOs, filters)
//! - [`error`] - Error types and result handling
//! - [`repository`] - Repository trait for data persistence
//! - [`service`] - Operation surface the transport layer dispatches to
//! - [`validation`] - Field validation rules
//!
//! # Example
//!
//! ```rust
//! use tracker_core::{models::NewTask, validation::TaskValidator};
//!
//! let new_task = NewTask::new("Design the schema", "Tables, indexes, migrations");
//! TaskValidator::validate_new_task(&new_task).unwrap();
//! ```

pub mod error;
pub mod models;
pub mod repository;
pub mod service;
pub mod validation;

// Re-export commonly used types at the crate root for convenience
pub use error::{Result, TaskError};
pub use models::{NewTask, Task, TaskFilter, TaskStatus, UpdateTask};
pub use repository::{RepositoryStats, TaskRepository};
pub use service::{
    AssignParams, CreateTaskParams, HealthStatus, ListTasksParams, SetStatusParams, TaskService,
};
pub use validation::TaskValidator;

/// Current version of the core crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[allow(clippy::const_is_empty)]
    fn test_crate_constants() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_re_exports() {
        let status = TaskStatus::Open;
        assert_eq!(format!("{status}"), "Open");

        let error = TaskError::NotFound(1);
        assert!(error.is_not_found());
    }
}
