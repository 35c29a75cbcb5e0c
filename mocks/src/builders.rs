//! Builder pattern implementations for test data construction

use chrono::{DateTime, Utc};
use tracker_core::{NewTask, Task, TaskFilter, TaskStatus, UpdateTask};

/// Fluent builder for Task instances in tests
pub struct TaskBuilder {
    task: Task,
}

impl Default for TaskBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskBuilder {
    /// Create a builder with sensible defaults
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            task: Task {
                id: 1,
                title: "Test task".to_string(),
                description: "A test task".to_string(),
                status: TaskStatus::Open,
                assignee: None,
                due_at: None,
                created_at: now,
                updated_at: now,
                completed_at: None,
            },
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.task.id = id;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.task.title = title.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.task.description = description.into();
        self
    }

    /// Set the status, keeping `completed_at` consistent with it
    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.task.status = status;
        if matches!(status, TaskStatus::Done | TaskStatus::Archived)
            && self.task.completed_at.is_none()
        {
            self.task.completed_at = Some(Utc::now());
        }
        self
    }

    pub fn with_assignee(mut self, assignee: impl Into<String>) -> Self {
        self.task.assignee = Some(assignee.into());
        self
    }

    pub fn with_due_at(mut self, due_at: DateTime<Utc>) -> Self {
        self.task.due_at = Some(due_at);
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.task.created_at = created_at;
        self
    }

    pub fn build(self) -> Task {
        self.task
    }
}

/// Fluent builder for NewTask payloads in tests
pub struct NewTaskBuilder {
    new_task: NewTask,
}

impl Default for NewTaskBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl NewTaskBuilder {
    pub fn new() -> Self {
        Self {
            new_task: NewTask::new("New test task", "A new test task"),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.new_task.title = title.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.new_task.description = description.into();
        self
    }

    pub fn with_assignee(mut self, assignee: impl Into<String>) -> Self {
        self.new_task.assignee = Some(assignee.into());
        self
    }

    pub fn with_due_at(mut self, due_at: DateTime<Utc>) -> Self {
        self.new_task.due_at = Some(due_at);
        self
    }

    pub fn build(self) -> NewTask {
        self.new_task
    }
}

/// Fluent builder for UpdateTask payloads in tests
#[derive(Default)]
pub struct UpdateTaskBuilder {
    update_task: UpdateTask,
}

impl UpdateTaskBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.update_task.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.update_task.description = Some(description.into());
        self
    }

    pub fn with_due_at(mut self, due_at: DateTime<Utc>) -> Self {
        self.update_task.due_at = Some(due_at);
        self
    }

    pub fn build(self) -> UpdateTask {
        self.update_task
    }
}

/// Fluent builder for TaskFilter values in tests
#[derive(Default)]
pub struct TaskFilterBuilder {
    filter: TaskFilter,
}

impl TaskFilterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_assignee(mut self, assignee: impl Into<String>) -> Self {
        self.filter.assignee = Some(assignee.into());
        self
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.filter.status = Some(status);
        self
    }

    pub fn with_created_after(mut self, created_after: DateTime<Utc>) -> Self {
        self.filter.created_after = Some(created_after);
        self
    }

    pub fn with_created_before(mut self, created_before: DateTime<Utc>) -> Self {
        self.filter.created_before = Some(created_before);
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.filter.limit = Some(limit);
        self
    }

    pub fn build(self) -> TaskFilter {
        self.filter
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_builder_defaults() {
        let task = TaskBuilder::new().build();
        assert_eq!(task.id, 1);
        assert_eq!(task.status, TaskStatus::Open);
        assert!(task.completed_at.is_none());
    }

    #[test]
    fn test_task_builder_done_sets_completed_at() {
        let task = TaskBuilder::new().with_status(TaskStatus::Done).build();
        assert!(task.completed_at.is_some());
    }

    #[test]
    fn test_filter_builder() {
        let filter = TaskFilterBuilder::new()
            .with_assignee("mira")
            .with_status(TaskStatus::Open)
            .with_limit(5)
            .build();
        assert_eq!(filter.assignee, Some("mira".to_string()));
        assert_eq!(filter.status, Some(TaskStatus::Open));
        assert_eq!(filter.limit, Some(5));
    }
}
