use crate::{
    error::Result,
    models::{NewTask, Task, TaskFilter, TaskStatus, UpdateTask},
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Operation surface the transport layer dispatches to.
///
/// Every inbound request maps to exactly one method here. Keeping the trait
/// in the core crate lets transports and tests share one contract without
/// depending on a concrete repository.
#[async_trait]
pub trait TaskService: Send + Sync {
    /// Create a new task
    async fn create_task(&self, params: CreateTaskParams) -> Result<Task>;

    /// Apply a partial update to a task
    async fn update_task(&self, id: i64, updates: UpdateTask) -> Result<Task>;

    /// Move a task to a new lifecycle state
    async fn set_task_status(&self, id: i64, status: TaskStatus) -> Result<Task>;

    /// Fetch a task by id
    async fn get_task(&self, id: i64) -> Result<Option<Task>>;

    /// List tasks matching the query parameters
    async fn list_tasks(&self, params: ListTasksParams) -> Result<Vec<Task>>;

    /// Assign or unassign a task
    async fn assign_task(&self, id: i64, assignee: Option<String>) -> Result<Task>;

    /// Archive a finished task
    async fn archive_task(&self, id: i64) -> Result<Task>;

    /// Delete a task permanently
    async fn delete_task(&self, id: i64) -> Result<()>;

    /// Service health probe
    async fn health(&self) -> Result<HealthStatus>;

    /// Repository statistics
    async fn stats(&self) -> Result<crate::repository::RepositoryStats>;
}

/// Request payload for creating a task.
///
/// Identical in shape to the domain DTO, so the alias keeps one source of
/// truth for serialization.
pub type CreateTaskParams = NewTask;

/// Query parameters accepted by the task listing operation.
///
/// Datetime bounds arrive as RFC 3339 strings and are parsed into the
/// typed [`TaskFilter`] before they reach the repository.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ListTasksParams {
    pub assignee: Option<String>,
    pub status: Option<TaskStatus>,
    pub due_before: Option<String>,
    pub created_after: Option<String>,
    pub created_before: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl ListTasksParams {
    /// Convert query parameters to the repository filter.
    pub fn to_filter(&self) -> Result<TaskFilter> {
        use chrono::{DateTime, Utc};

        let parse = |field: &str, s: &str| -> Result<DateTime<Utc>> {
            DateTime::parse_from_rfc3339(s)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| {
                    crate::error::TaskError::Validation(format!(
                        "invalid datetime in '{field}': {e}"
                    ))
                })
        };

        let due_before = match &self.due_before {
            Some(s) => Some(parse("due_before", s)?),
            None => None,
        };
        let created_after = match &self.created_after {
            Some(s) => Some(parse("created_after", s)?),
            None => None,
        };
        let created_before = match &self.created_before {
            Some(s) => Some(parse("created_before", s)?),
            None => None,
        };

        Ok(TaskFilter {
            assignee: self.assignee.clone(),
            status: self.status,
            due_before,
            created_after,
            created_before,
            limit: self.limit,
            offset: self.offset,
        })
    }
}

/// Request body for the status transition operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetStatusParams {
    pub status: TaskStatus,
}

/// Request body for the assignment operation; `None` unassigns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignParams {
    pub assignee: Option<String>,
}

/// Health document returned to monitoring clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub database: bool,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub version: String,
}

impl Default for HealthStatus {
    fn default() -> Self {
        Self {
            status: "unknown".to_string(),
            database: false,
            timestamp: chrono::Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
