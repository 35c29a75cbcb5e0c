//! Standard test fixtures for consistent testing

use crate::builders::TaskBuilder;
use chrono::Utc;
use tracker_core::{NewTask, Task, TaskStatus, UpdateTask};

/// A basic task with sensible defaults
pub fn test_task() -> Task {
    TaskBuilder::new().build()
}

/// A task in a specific lifecycle state
pub fn test_task_in(status: TaskStatus) -> Task {
    TaskBuilder::new().with_status(status).build()
}

/// A task assigned to someone
pub fn test_task_for(assignee: &str) -> Task {
    TaskBuilder::new().with_assignee(assignee).build()
}

/// Multiple unique tasks distributed across states and assignees
pub fn test_tasks(count: usize) -> Vec<Task> {
    (1..=count)
        .map(|i| {
            let status = match i % 4 {
                0 => TaskStatus::Open,
                1 => TaskStatus::InProgress,
                2 => TaskStatus::Blocked,
                _ => TaskStatus::Done,
            };

            TaskBuilder::new()
                .with_id(i as i64)
                .with_title(format!("Test task {i}"))
                .with_description(format!("Task number {i} for bulk testing"))
                .with_assignee(format!("user-{}", i % 3 + 1))
                .with_status(status)
                .build()
        })
        .collect()
}

/// One task in each possible lifecycle state
pub fn tasks_in_all_states() -> Vec<Task> {
    [
        TaskStatus::Open,
        TaskStatus::InProgress,
        TaskStatus::Blocked,
        TaskStatus::Done,
        TaskStatus::Archived,
    ]
    .into_iter()
    .enumerate()
    .map(|(i, status)| {
        TaskBuilder::new()
            .with_id(i as i64 + 1)
            .with_title(format!("{status} task"))
            .with_status(status)
            .build()
    })
    .collect()
}

/// A standard creation payload
pub fn new_task() -> NewTask {
    NewTask {
        title: "New test task".to_string(),
        description: "A new task for testing creation".to_string(),
        assignee: Some("test-user".to_string()),
        due_at: None,
    }
}

/// A creation payload due in the past
pub fn overdue_new_task() -> NewTask {
    NewTask {
        title: "Overdue task".to_string(),
        description: String::new(),
        assignee: None,
        due_at: Some(Utc::now() - chrono::Duration::days(1)),
    }
}

/// A standard update payload touching every updatable field
pub fn update_task() -> UpdateTask {
    UpdateTask {
        title: Some("Updated task title".to_string()),
        description: Some("Updated task description".to_string()),
        due_at: Some(Utc::now() + chrono::Duration::days(7)),
    }
}
