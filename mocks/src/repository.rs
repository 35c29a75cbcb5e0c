//! Mock implementation of the TaskRepository trait
//!
//! Thread-safe in-memory repository with error injection and call-history
//! tracking, so tests can verify both behavior and interaction order.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::{
    atomic::{AtomicI64, Ordering},
    Arc,
};
use tracker_core::{
    repository::RepositoryStats, NewTask, Result, Task, TaskError, TaskFilter, TaskRepository,
    TaskStatus, UpdateTask,
};

/// In-memory TaskRepository for testing.
///
/// Mirrors the semantics of the SQLite implementation (state machine,
/// timestamp maintenance, newest-first listing) closely enough that handler
/// tests written against the mock hold against the real backend.
pub struct MockTaskRepository {
    tasks: Arc<Mutex<HashMap<i64, Task>>>,
    next_id: Arc<AtomicI64>,
    error_injection: Arc<Mutex<Option<TaskError>>>,
    call_history: Arc<Mutex<Vec<String>>>,
}

impl Default for MockTaskRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTaskRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        Self {
            tasks: Arc::new(Mutex::new(HashMap::new())),
            next_id: Arc::new(AtomicI64::new(1)),
            error_injection: Arc::new(Mutex::new(None)),
            call_history: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a mock repository pre-populated with tasks
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        let mut task_map = HashMap::new();
        let mut max_id = 0;

        for task in tasks {
            max_id = max_id.max(task.id);
            task_map.insert(task.id, task);
        }

        Self {
            tasks: Arc::new(Mutex::new(task_map)),
            next_id: Arc::new(AtomicI64::new(max_id + 1)),
            error_injection: Arc::new(Mutex::new(None)),
            call_history: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Make the next operation fail with `error`
    pub fn inject_error(&self, error: TaskError) {
        *self.error_injection.lock() = Some(error);
    }

    /// Clear a pending injected error
    pub fn clear_error(&self) {
        *self.error_injection.lock() = None;
    }

    /// History of repository calls, in order
    pub fn call_history(&self) -> Vec<String> {
        self.call_history.lock().clone()
    }

    /// Clear the call history
    pub fn clear_history(&self) {
        self.call_history.lock().clear();
    }

    /// Assert a method was called at least once
    pub fn assert_called(&self, method: &str) {
        let history = self.call_history.lock();
        assert!(
            history.iter().any(|call| call.starts_with(method)),
            "method '{}' was not called; call history: {:?}",
            method,
            *history
        );
    }

    fn check_error_injection(&self) -> Result<()> {
        if let Some(error) = self.error_injection.lock().take() {
            return Err(error);
        }
        Ok(())
    }

    fn record_call(&self, call: String) {
        self.call_history.lock().push(call);
    }
}

#[async_trait]
impl TaskRepository for MockTaskRepository {
    async fn create(&self, task: NewTask) -> Result<Task> {
        self.record_call(format!("create(title={})", task.title));
        self.check_error_injection()?;

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let now = Utc::now();

        let new_task = Task {
            id,
            title: task.title.trim().to_string(),
            description: task.description,
            status: TaskStatus::Open,
            assignee: task.assignee,
            due_at: task.due_at,
            created_at: now,
            updated_at: now,
            completed_at: None,
        };

        self.tasks.lock().insert(id, new_task.clone());
        Ok(new_task)
    }

    async fn update(&self, id: i64, updates: UpdateTask) -> Result<Task> {
        self.record_call(format!("update(id={id})"));
        self.check_error_injection()?;

        let mut tasks = self.tasks.lock();
        let task = tasks.get_mut(&id).ok_or(TaskError::NotFound(id))?;

        if let Some(title) = updates.title {
            task.title = title.trim().to_string();
        }
        if let Some(description) = updates.description {
            task.description = description;
        }
        if let Some(due_at) = updates.due_at {
            task.due_at = Some(due_at);
        }
        task.updated_at = Utc::now();

        Ok(task.clone())
    }

    async fn set_status(&self, id: i64, status: TaskStatus) -> Result<Task> {
        self.record_call(format!("set_status(id={id}, status={status})"));
        self.check_error_injection()?;

        let mut tasks = self.tasks.lock();
        let task = tasks.get_mut(&id).ok_or(TaskError::NotFound(id))?;

        if !task.can_transition_to(status) {
            return Err(TaskError::invalid_transition(task.status, status));
        }

        task.status = status;
        task.completed_at = match status {
            TaskStatus::Done => Some(Utc::now()),
            TaskStatus::Archived => task.completed_at,
            _ => None,
        };
        task.updated_at = Utc::now();

        Ok(task.clone())
    }

    async fn get(&self, id: i64) -> Result<Option<Task>> {
        self.record_call(format!("get(id={id})"));
        self.check_error_injection()?;

        Ok(self.tasks.lock().get(&id).cloned())
    }

    async fn list(&self, filter: TaskFilter) -> Result<Vec<Task>> {
        self.record_call("list".to_string());
        self.check_error_injection()?;

        let tasks = self.tasks.lock();
        let mut result: Vec<Task> = tasks
            .values()
            .filter(|task| {
                if let Some(ref assignee) = filter.assignee {
                    if task.assignee.as_deref() != Some(assignee.as_str()) {
                        return false;
                    }
                }
                if let Some(status) = filter.status {
                    if task.status != status {
                        return false;
                    }
                }
                if let Some(due_before) = filter.due_before {
                    match task.due_at {
                        Some(due) if due < due_before => {}
                        _ => return false,
                    }
                }
                if let Some(created_after) = filter.created_after {
                    if task.created_at < created_after {
                        return false;
                    }
                }
                if let Some(created_before) = filter.created_before {
                    if task.created_at > created_before {
                        return false;
                    }
                }
                true
            })
            .cloned()
            .collect();

        // Newest first, id as a tiebreaker like the SQL backend
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        if let Some(offset) = filter.offset {
            if offset as usize >= result.len() {
                return Ok(Vec::new());
            }
            result.drain(..offset as usize);
        }

        if let Some(limit) = filter.limit {
            result.truncate(limit as usize);
        }

        Ok(result)
    }

    async fn assign(&self, id: i64, assignee: Option<&str>) -> Result<Task> {
        self.record_call(format!("assign(id={id}, assignee={assignee:?})"));
        self.check_error_injection()?;

        let mut tasks = self.tasks.lock();
        let task = tasks.get_mut(&id).ok_or(TaskError::NotFound(id))?;

        task.assignee = assignee.map(str::to_string);
        task.updated_at = Utc::now();

        Ok(task.clone())
    }

    async fn archive(&self, id: i64) -> Result<Task> {
        self.record_call(format!("archive(id={id})"));
        self.check_error_injection()?;

        let mut tasks = self.tasks.lock();
        let task = tasks.get_mut(&id).ok_or(TaskError::NotFound(id))?;

        if !task.can_transition_to(TaskStatus::Archived) {
            return Err(TaskError::invalid_transition(
                task.status,
                TaskStatus::Archived,
            ));
        }

        task.status = TaskStatus::Archived;
        task.updated_at = Utc::now();

        Ok(task.clone())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        self.record_call(format!("delete(id={id})"));
        self.check_error_injection()?;

        match self.tasks.lock().remove(&id) {
            Some(_) => Ok(()),
            None => Err(TaskError::NotFound(id)),
        }
    }

    async fn health_check(&self) -> Result<()> {
        self.record_call("health_check".to_string());
        self.check_error_injection()?;

        Ok(())
    }

    async fn stats(&self) -> Result<RepositoryStats> {
        self.record_call("stats".to_string());
        self.check_error_injection()?;

        let tasks = self.tasks.lock();
        let now = Utc::now();
        let mut stats = RepositoryStats {
            total_tasks: tasks.len() as u64,
            ..Default::default()
        };

        for task in tasks.values() {
            *stats.tasks_by_status.entry(task.status).or_insert(0) += 1;
            if task.is_overdue(now) {
                stats.overdue_tasks += 1;
            }
        }

        stats.latest_created = tasks.values().map(|t| t.created_at).max();
        stats.latest_completed = tasks.values().filter_map(|t| t.completed_at).max();

        Ok(stats)
    }
}
