use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A tracked unit of work.
///
/// Tasks are created in the [`TaskStatus::Open`] state and move through a
/// validated lifecycle until they are archived. All timestamps are UTC and
/// maintained by the repository layer: `created_at` is set once on insert,
/// `updated_at` is touched by every mutation, and `completed_at` records the
/// most recent transition into [`TaskStatus::Done`].
///
/// # Examples
///
/// ```rust
/// use tracker_core::models::{Task, TaskStatus};
/// use chrono::Utc;
///
/// let task = Task {
///     id: 42,
///     title: "Write release notes".to_string(),
///     description: "Summarize the changes since 0.3".to_string(),
///     status: TaskStatus::Open,
///     assignee: Some("mira".to_string()),
///     due_at: None,
///     created_at: Utc::now(),
///     updated_at: Utc::now(),
///     completed_at: None,
/// };
///
/// assert!(task.can_transition_to(TaskStatus::InProgress));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    /// Auto-increment primary key
    pub id: i64,
    /// Short task summary
    pub title: String,
    /// Free-form details, may be empty
    pub description: String,
    /// Current lifecycle state
    pub status: TaskStatus,
    /// Person the task is assigned to, if anyone
    pub assignee: Option<String>,
    /// Optional deadline
    pub due_at: Option<DateTime<Utc>>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
    /// When the task last entered `Done`, cleared on reopen
    pub completed_at: Option<DateTime<Utc>>,
}

/// Task lifecycle states.
///
/// The typical flow is Open → InProgress → Done → Archived, with Blocked as
/// a temporary detour from InProgress and a reopen path out of Done.
///
/// # State transitions
///
/// - `Open` → `InProgress`
/// - `InProgress` → `Blocked`, `Done`
/// - `Blocked` → `InProgress`
/// - `Done` → `InProgress` (reopen), `Archived`
/// - `Archived` → (no transitions allowed)
#[derive(Debug, Clone, Copy, Hash, Serialize, Deserialize, PartialEq, Eq)]
pub enum TaskStatus {
    /// Newly created, nobody has started work yet
    Open,
    /// Actively being worked on
    InProgress,
    /// Work cannot proceed until something external is resolved
    Blocked,
    /// Work is finished
    Done,
    /// Retired from the active list; terminal
    Archived,
}

impl Task {
    /// Check whether the task may move to `next` from its current state.
    ///
    /// Same-state transitions are always rejected so that callers cannot
    /// use `set_status` as a no-op touch.
    pub fn can_transition_to(&self, next: TaskStatus) -> bool {
        use TaskStatus::*;

        match (self.status, next) {
            (current, next) if current == next => false,
            (Open, InProgress) => true,
            (InProgress, Blocked | Done) => true,
            (Blocked, InProgress) => true,
            // Reopening a finished task is allowed until it is archived
            (Done, InProgress | Archived) => true,
            (Archived, _) => false,
            _ => false,
        }
    }

    /// Whether the task counts as overdue at `now`.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        match (self.due_at, self.status) {
            (Some(due), TaskStatus::Open | TaskStatus::InProgress | TaskStatus::Blocked) => {
                due < now
            }
            _ => false,
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskStatus::Open => write!(f, "Open"),
            TaskStatus::InProgress => write!(f, "InProgress"),
            TaskStatus::Blocked => write!(f, "Blocked"),
            TaskStatus::Done => write!(f, "Done"),
            TaskStatus::Archived => write!(f, "Archived"),
        }
    }
}

/// Data transfer object for creating new tasks
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewTask {
    /// Short task summary
    pub title: String,
    /// Free-form details
    #[serde(default)]
    pub description: String,
    /// Person the task starts out assigned to
    pub assignee: Option<String>,
    /// Optional deadline
    pub due_at: Option<DateTime<Utc>>,
}

impl NewTask {
    /// Create an unassigned task with no deadline.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            assignee: None,
            due_at: None,
        }
    }
}

/// Data transfer object for partial task updates.
///
/// Only fields that are `Some` are written; everything else keeps its
/// current value. Status and assignee changes go through their dedicated
/// operations so the state machine and assignment rules stay in one place.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct UpdateTask {
    /// New task title
    pub title: Option<String>,
    /// New task description
    pub description: Option<String>,
    /// New deadline
    pub due_at: Option<DateTime<Utc>>,
}

impl UpdateTask {
    /// True when no field would be written.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.due_at.is_none()
    }
}

/// Filter criteria for querying tasks.
///
/// All fields are optional; when several are set they combine with AND.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TaskFilter {
    /// Only tasks assigned to this person
    pub assignee: Option<String>,

    /// Only tasks in this state
    pub status: Option<TaskStatus>,

    /// Only tasks due strictly before this instant
    pub due_before: Option<DateTime<Utc>>,

    /// Only tasks created on or after this instant
    pub created_after: Option<DateTime<Utc>>,

    /// Only tasks created on or before this instant
    pub created_before: Option<DateTime<Utc>>,

    /// Maximum number of tasks to return
    pub limit: Option<u32>,

    /// Number of tasks to skip, for pagination
    pub offset: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task_in(status: TaskStatus) -> Task {
        Task {
            id: 1,
            title: "Test task".to_string(),
            description: "Test description".to_string(),
            status,
            assignee: Some("tester".to_string()),
            due_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            completed_at: None,
        }
    }

    #[test]
    fn test_valid_status_transitions() {
        let task = task_in(TaskStatus::Open);
        assert!(task.can_transition_to(TaskStatus::InProgress));
        assert!(!task.can_transition_to(TaskStatus::Blocked));
        assert!(!task.can_transition_to(TaskStatus::Done));
        assert!(!task.can_transition_to(TaskStatus::Archived));

        let task = task_in(TaskStatus::InProgress);
        assert!(task.can_transition_to(TaskStatus::Blocked));
        assert!(task.can_transition_to(TaskStatus::Done));
        assert!(!task.can_transition_to(TaskStatus::Open));
        assert!(!task.can_transition_to(TaskStatus::Archived));

        let task = task_in(TaskStatus::Blocked);
        assert!(task.can_transition_to(TaskStatus::InProgress));
        assert!(!task.can_transition_to(TaskStatus::Open));
        assert!(!task.can_transition_to(TaskStatus::Done));
        assert!(!task.can_transition_to(TaskStatus::Archived));

        let task = task_in(TaskStatus::Done);
        assert!(task.can_transition_to(TaskStatus::InProgress));
        assert!(task.can_transition_to(TaskStatus::Archived));
        assert!(!task.can_transition_to(TaskStatus::Open));
        assert!(!task.can_transition_to(TaskStatus::Blocked));
    }

    #[test]
    fn test_archived_is_terminal() {
        let task = task_in(TaskStatus::Archived);
        assert!(!task.can_transition_to(TaskStatus::Open));
        assert!(!task.can_transition_to(TaskStatus::InProgress));
        assert!(!task.can_transition_to(TaskStatus::Blocked));
        assert!(!task.can_transition_to(TaskStatus::Done));
    }

    #[test]
    fn test_no_same_status_transition() {
        let task = task_in(TaskStatus::InProgress);
        assert!(!task.can_transition_to(TaskStatus::InProgress));
    }

    #[test]
    fn test_overdue() {
        let now = Utc::now();
        let mut task = task_in(TaskStatus::Open);
        assert!(!task.is_overdue(now));

        task.due_at = Some(now - chrono::Duration::hours(1));
        assert!(task.is_overdue(now));

        // Finished and archived tasks are never overdue
        task.status = TaskStatus::Done;
        assert!(!task.is_overdue(now));
        task.status = TaskStatus::Archived;
        assert!(!task.is_overdue(now));

        task.status = TaskStatus::Blocked;
        assert!(task.is_overdue(now));
    }

    #[test]
    fn test_update_is_empty() {
        assert!(UpdateTask::default().is_empty());
        let update = UpdateTask {
            title: Some("New title".to_string()),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }
}
