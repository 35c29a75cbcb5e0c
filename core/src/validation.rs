use crate::{
    error::{Result, TaskError},
    models::{NewTask, Task, TaskStatus, UpdateTask},
};

/// Validation rules for task fields.
///
/// The repository layer assumes its inputs already passed through here, so
/// every write path in the service layer must validate first.
pub struct TaskValidator;

impl TaskValidator {
    /// Validate a task title.
    ///
    /// Titles must be 1-200 characters after trimming.
    pub fn validate_title(title: &str) -> Result<()> {
        let trimmed = title.trim();

        if trimmed.is_empty() {
            return Err(TaskError::empty_field("title"));
        }

        if trimmed.chars().count() > 200 {
            return Err(TaskError::Validation(
                "title must be at most 200 characters long".to_string(),
            ));
        }

        Ok(())
    }

    /// Validate a task description.
    ///
    /// Descriptions may be empty but are capped at 2000 characters.
    pub fn validate_description(description: &str) -> Result<()> {
        if description.chars().count() > 2000 {
            return Err(TaskError::Validation(
                "description must be at most 2000 characters long".to_string(),
            ));
        }

        Ok(())
    }

    /// Validate an assignee name.
    ///
    /// Assignee names must:
    /// - Be 1-50 characters long
    /// - Contain only letters, numbers, hyphens, and underscores
    /// - Start and end with a letter or number
    pub fn validate_assignee(name: &str) -> Result<()> {
        if name.is_empty() {
            return Err(TaskError::empty_field("assignee"));
        }

        if name.chars().count() > 50 {
            return Err(TaskError::Validation(
                "assignee must be at most 50 characters long".to_string(),
            ));
        }

        let first = name.chars().next().unwrap();
        let last = name.chars().last().unwrap();

        if !first.is_alphanumeric() || !last.is_alphanumeric() {
            return Err(TaskError::Validation(
                "assignee must start and end with a letter or number".to_string(),
            ));
        }

        if !name.chars().all(|c| c.is_alphanumeric() || c == '-' || c == '_') {
            return Err(TaskError::Validation(
                "assignee can only contain letters, numbers, hyphens, and underscores"
                    .to_string(),
            ));
        }

        Ok(())
    }

    /// Validate a complete NewTask payload.
    pub fn validate_new_task(task: &NewTask) -> Result<()> {
        Self::validate_title(&task.title)?;
        Self::validate_description(&task.description)?;
        if let Some(ref assignee) = task.assignee {
            Self::validate_assignee(assignee)?;
        }
        Ok(())
    }

    /// Validate a partial update payload.
    pub fn validate_update(updates: &UpdateTask) -> Result<()> {
        if let Some(ref title) = updates.title {
            Self::validate_title(title)?;
        }
        if let Some(ref description) = updates.description {
            Self::validate_description(description)?;
        }
        Ok(())
    }

    /// Check a lifecycle transition against the state machine.
    pub fn validate_transition(task: &Task, next: TaskStatus) -> Result<()> {
        if task.can_transition_to(next) {
            Ok(())
        } else {
            Err(TaskError::invalid_transition(task.status, next))
        }
    }
}
