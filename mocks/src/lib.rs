//! Test support for the task tracker workspace
//!
//! - [`repository`] - in-memory `TaskRepository` with error injection and
//!   call-history tracking
//! - [`builders`] - fluent builders for domain values
//! - [`fixtures`] - pre-built test data

pub mod builders;
pub mod fixtures;
pub mod repository;

pub use builders::{NewTaskBuilder, TaskBuilder, TaskFilterBuilder, UpdateTaskBuilder};
pub use repository::MockTaskRepository;
