//! Task service implementation
//!
//! Bridges the transport layer and the repository: validates inbound data,
//! then delegates to whatever [`TaskRepository`] it was constructed with.

use async_trait::async_trait;
use std::sync::Arc;
use tracker_core::{
    error::Result,
    models::{Task, TaskStatus, UpdateTask},
    repository::RepositoryStats,
    service::{CreateTaskParams, HealthStatus, ListTasksParams, TaskService},
    TaskRepository, TaskValidator,
};

/// Service implementation generic over the storage backend
#[derive(Clone)]
pub struct TaskHandler<R> {
    repository: Arc<R>,
}

impl<R> TaskHandler<R> {
    /// Create a handler over an already-initialized repository.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Clone of the repository Arc, for composing further handlers.
    pub fn repository(&self) -> Arc<R> {
        self.repository.clone()
    }
}

#[async_trait]
impl<R: TaskRepository> TaskService for TaskHandler<R> {
    async fn create_task(&self, params: CreateTaskParams) -> Result<Task> {
        TaskValidator::validate_new_task(&params)?;
        self.repository.create(params).await
    }

    async fn update_task(&self, id: i64, updates: UpdateTask) -> Result<Task> {
        TaskValidator::validate_update(&updates)?;
        self.repository.update(id, updates).await
    }

    async fn set_task_status(&self, id: i64, status: TaskStatus) -> Result<Task> {
        self.repository.set_status(id, status).await
    }

    async fn get_task(&self, id: i64) -> Result<Option<Task>> {
        self.repository.get(id).await
    }

    async fn list_tasks(&self, params: ListTasksParams) -> Result<Vec<Task>> {
        let filter = params.to_filter()?;
        self.repository.list(filter).await
    }

    async fn assign_task(&self, id: i64, assignee: Option<String>) -> Result<Task> {
        if let Some(ref name) = assignee {
            TaskValidator::validate_assignee(name)?;
        }
        self.repository.assign(id, assignee.as_deref()).await
    }

    async fn archive_task(&self, id: i64) -> Result<Task> {
        self.repository.archive(id).await
    }

    async fn delete_task(&self, id: i64) -> Result<()> {
        self.repository.delete(id).await
    }

    async fn health(&self) -> Result<HealthStatus> {
        self.repository.health_check().await?;

        Ok(HealthStatus {
            status: "healthy".to_string(),
            database: true,
            timestamp: chrono::Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        })
    }

    async fn stats(&self) -> Result<RepositoryStats> {
        self.repository.stats().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mocks::MockTaskRepository;
    use tracker_core::models::NewTask;
    use tracker_core::TaskError;

    fn handler() -> TaskHandler<MockTaskRepository> {
        TaskHandler::new(Arc::new(MockTaskRepository::new()))
    }

    #[tokio::test]
    async fn test_create_validates_before_repository() {
        let handler = handler();

        let err = handler
            .create_task(NewTask::new("", "no title"))
            .await
            .unwrap_err();
        assert!(err.is_validation());

        // Nothing reached the repository
        assert!(handler.repository().call_history().is_empty());
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let handler = handler();

        let created = handler
            .create_task(NewTask::new("Write docs", "The README is empty"))
            .await
            .unwrap();
        assert_eq!(created.status, TaskStatus::Open);

        let fetched = handler.get_task(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.title, "Write docs");
    }

    #[tokio::test]
    async fn test_assign_validates_name() {
        let handler = handler();
        let task = handler
            .create_task(NewTask::new("Assignable", ""))
            .await
            .unwrap();

        let err = handler
            .assign_task(task.id, Some("not a name!".to_string()))
            .await
            .unwrap_err();
        assert!(err.is_validation());

        // Unassigning never needs validation
        assert!(handler.assign_task(task.id, None).await.is_ok());
    }

    #[tokio::test]
    async fn test_health_reflects_repository_failure() {
        let handler = handler();
        assert_eq!(handler.health().await.unwrap().status, "healthy");

        handler
            .repository()
            .inject_error(TaskError::Database("gone".into()));
        assert!(handler.health().await.is_err());
    }

    #[tokio::test]
    async fn test_list_over_prepopulated_repository() {
        let repository = Arc::new(MockTaskRepository::with_tasks(mocks::fixtures::test_tasks(6)));
        let handler = TaskHandler::new(repository);

        let all = handler
            .list_tasks(ListTasksParams::default())
            .await
            .unwrap();
        assert_eq!(all.len(), 6);

        let open_only = handler
            .list_tasks(ListTasksParams {
                status: Some(TaskStatus::Open),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(!open_only.is_empty());
        assert!(open_only.iter().all(|t| t.status == TaskStatus::Open));
    }

    #[tokio::test]
    async fn test_list_rejects_bad_datetime() {
        let handler = handler();
        let params = ListTasksParams {
            created_after: Some("not-a-date".to_string()),
            ..Default::default()
        };
        assert!(handler.list_tasks(params).await.unwrap_err().is_validation());
    }
}
