//! SQLite persistence for the task tracker
//!
//! Implements [`tracker_core::repository::TaskRepository`] on top of sqlx
//! with connection pooling, embedded migrations, and error mapping into the
//! domain taxonomy.
//!
//! # Usage
//!
//! ```rust,no_run
//! use tracker_database::SqliteTaskRepository;
//! use tracker_core::repository::TaskRepository;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let repo = SqliteTaskRepository::connect(":memory:").await?;
//! repo.migrate().await?;
//! repo.health_check().await?;
//! # Ok(())
//! # }
//! ```

mod common;
mod sqlite;

pub use sqlite::{PoolSettings, SqliteTaskRepository};

// Re-export commonly used types from tracker-core for convenience
pub use tracker_core::{
    error::{Result, TaskError},
    models::{NewTask, Task, TaskFilter, TaskStatus, UpdateTask},
    repository::{RepositoryStats, TaskRepository},
};
