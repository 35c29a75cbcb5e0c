use crate::{
    error::Result,
    models::{NewTask, Task, TaskFilter, TaskStatus, UpdateTask},
};
use async_trait::async_trait;

/// Repository trait for task persistence and retrieval.
///
/// One concrete implementation exists per storage backend; the transport
/// layer only ever sees this trait. Implementations must be thread-safe and
/// support concurrent access.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Create a new task in the `Open` state.
    ///
    /// # Returns
    /// * `Ok(Task)` - The created task with assigned id and timestamps
    /// * `Err(TaskError::Database)` - If the storage operation fails
    async fn create(&self, task: NewTask) -> Result<Task>;

    /// Apply a partial update to an existing task.
    ///
    /// Only `Some` fields of `updates` are written. An empty update returns
    /// the task unchanged.
    ///
    /// # Returns
    /// * `Ok(Task)` - The updated task with a fresh `updated_at`
    /// * `Err(TaskError::NotFound)` - If the task doesn't exist
    /// * `Err(TaskError::Database)` - If the storage operation fails
    async fn update(&self, id: i64, updates: UpdateTask) -> Result<Task>;

    /// Move a task to a new lifecycle state.
    ///
    /// Sets `completed_at` when entering `Done` and clears it on reopen.
    ///
    /// # Returns
    /// * `Ok(Task)` - The updated task
    /// * `Err(TaskError::NotFound)` - If the task doesn't exist
    /// * `Err(TaskError::InvalidStatusTransition)` - If the transition is not allowed
    /// * `Err(TaskError::Database)` - If the storage operation fails
    async fn set_status(&self, id: i64, status: TaskStatus) -> Result<Task>;

    /// Get a task by id.
    ///
    /// # Returns
    /// * `Ok(Some(Task))` - The task if found
    /// * `Ok(None)` - If no task exists with that id
    /// * `Err(TaskError::Database)` - If the storage operation fails
    async fn get(&self, id: i64) -> Result<Option<Task>>;

    /// List tasks matching the given filter, newest first.
    ///
    /// # Returns
    /// * `Ok(Vec<Task>)` - The matching tasks, possibly empty
    /// * `Err(TaskError::Database)` - If the storage operation fails
    async fn list(&self, filter: TaskFilter) -> Result<Vec<Task>>;

    /// Assign the task to someone, or unassign it with `None`.
    ///
    /// # Returns
    /// * `Ok(Task)` - The updated task
    /// * `Err(TaskError::NotFound)` - If the task doesn't exist
    /// * `Err(TaskError::Database)` - If the storage operation fails
    async fn assign(&self, id: i64, assignee: Option<&str>) -> Result<Task>;

    /// Archive a finished task.
    ///
    /// # Returns
    /// * `Ok(Task)` - The archived task
    /// * `Err(TaskError::NotFound)` - If the task doesn't exist
    /// * `Err(TaskError::InvalidStatusTransition)` - If the task is not `Done`
    /// * `Err(TaskError::Database)` - If the storage operation fails
    async fn archive(&self, id: i64) -> Result<Task>;

    /// Delete a task permanently.
    ///
    /// # Returns
    /// * `Ok(())` - The task existed and is gone
    /// * `Err(TaskError::NotFound)` - If the task doesn't exist
    /// * `Err(TaskError::Database)` - If the storage operation fails
    async fn delete(&self, id: i64) -> Result<()>;

    /// Storage health probe for monitoring.
    ///
    /// # Returns
    /// * `Ok(())` - Repository is reachable
    /// * `Err(TaskError::Database)` - Repository is unhealthy
    async fn health_check(&self) -> Result<()>;

    /// Aggregate repository statistics for monitoring.
    async fn stats(&self) -> Result<RepositoryStats>;
}

/// Repository statistics for monitoring and dashboards
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize)]
pub struct RepositoryStats {
    /// Total number of tasks in the repository
    pub total_tasks: u64,
    /// Number of tasks per lifecycle state
    pub tasks_by_status: std::collections::HashMap<TaskStatus, u64>,
    /// Number of unarchived tasks past their deadline
    pub overdue_tasks: u64,
    /// Most recent creation timestamp
    pub latest_created: Option<chrono::DateTime<chrono::Utc>>,
    /// Most recent completion timestamp
    pub latest_completed: Option<chrono::DateTime<chrono::Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_stats_default() {
        let stats = RepositoryStats::default();
        assert_eq!(stats.total_tasks, 0);
        assert_eq!(stats.overdue_tasks, 0);
        assert!(stats.tasks_by_status.is_empty());
        assert!(stats.latest_created.is_none());
        assert!(stats.latest_completed.is_none());
    }

    #[test]
    fn test_repository_stats_serialize_status_keys() {
        let mut stats = RepositoryStats::default();
        stats.total_tasks = 3;
        stats.tasks_by_status.insert(TaskStatus::Open, 2);
        stats.tasks_by_status.insert(TaskStatus::Done, 1);

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["total_tasks"], 3);
        assert_eq!(json["tasks_by_status"]["Open"], 2);
        assert_eq!(json["tasks_by_status"]["Done"], 1);
    }
}
