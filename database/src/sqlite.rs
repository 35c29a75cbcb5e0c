use crate::common::{
    build_filter_query, row_to_task, sqlx_error_to_task_error, status_to_string, TASK_COLUMNS,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{migrate::MigrateDatabase, sqlite::SqlitePoolOptions, Row, Sqlite, SqlitePool};
use std::collections::HashMap;
use std::time::Duration;
use tracker_core::{
    error::{Result, TaskError},
    models::{NewTask, Task, TaskFilter, TaskStatus, UpdateTask},
    repository::{RepositoryStats, TaskRepository},
};

/// SQLite implementation of the TaskRepository trait.
///
/// Backed by a sqlx connection pool with WAL journaling for file databases.
/// The pool is cheap to clone; all clones share the same connections.
#[derive(Debug, Clone)]
pub struct SqliteTaskRepository {
    pool: SqlitePool,
}

/// Pool settings the bootstrapper derives from configuration
#[derive(Debug, Clone)]
pub struct PoolSettings {
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 5,
            acquire_timeout: Duration::from_secs(30),
        }
    }
}

impl SqliteTaskRepository {
    /// Connect with default pool settings.
    ///
    /// Accepts `sqlite://` URLs, bare file paths, and `:memory:`.
    ///
    /// # Examples
    /// ```rust,no_run
    /// use tracker_database::SqliteTaskRepository;
    ///
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let repo = SqliteTaskRepository::connect(":memory:").await?;
    /// repo.migrate().await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn connect(database_url: &str) -> Result<Self> {
        Self::connect_with(database_url, PoolSettings::default()).await
    }

    /// Connect with explicit pool settings.
    pub async fn connect_with(database_url: &str, settings: PoolSettings) -> Result<Self> {
        let in_memory = database_url.contains(":memory:");

        let db_url = if in_memory || database_url.starts_with("sqlite://") {
            database_url.to_string()
        } else {
            format!("sqlite://{database_url}")
        };

        if !in_memory && !Sqlite::database_exists(&db_url).await.unwrap_or(false) {
            Sqlite::create_database(&db_url).await.map_err(|e| {
                TaskError::Database(format!("failed to create database: {e}"))
            })?;
            tracing::info!(url = %db_url, "created database");
        }

        let connect_options = if in_memory {
            sqlx::sqlite::SqliteConnectOptions::new()
                .filename(":memory:")
                .create_if_missing(true)
                .journal_mode(sqlx::sqlite::SqliteJournalMode::Memory)
                .busy_timeout(Duration::from_secs(5))
                .foreign_keys(true)
        } else {
            sqlx::sqlite::SqliteConnectOptions::new()
                .filename(db_url.trim_start_matches("sqlite://"))
                .create_if_missing(true)
                .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
                .busy_timeout(Duration::from_secs(5))
                .foreign_keys(true)
        };

        // An in-memory database exists per connection, so the pool must stay
        // at one connection for every handle to see the migrated schema.
        let max_connections = if in_memory { 1 } else { settings.max_connections };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(settings.acquire_timeout)
            .connect_with(connect_options)
            .await
            .map_err(sqlx_error_to_task_error)?;

        Ok(Self { pool })
    }

    /// Apply all pending migrations.
    ///
    /// Must be called once after connecting, before the repository serves
    /// any traffic.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations/sqlite")
            .run(&self.pool)
            .await
            .map_err(|e| TaskError::Database(format!("migration failed: {e}")))?;

        tracing::info!("database migrations completed");
        Ok(())
    }

    /// Close the pool, waiting for checked-out connections to be returned.
    ///
    /// Part of explicit context teardown on shutdown.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Direct pool access for tests that need raw SQL.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn fetch_required(&self, id: i64) -> Result<Task> {
        self.get(id).await?.ok_or(TaskError::NotFound(id))
    }
}

#[async_trait]
impl TaskRepository for SqliteTaskRepository {
    async fn create(&self, task: NewTask) -> Result<Task> {
        let now = Utc::now();

        let row = sqlx::query(&format!(
            "INSERT INTO tasks (title, description, status, assignee, due_at, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING {TASK_COLUMNS}"
        ))
        .bind(task.title.trim())
        .bind(&task.description)
        .bind(status_to_string(TaskStatus::Open))
        .bind(&task.assignee)
        .bind(task.due_at)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(sqlx_error_to_task_error)?;

        row_to_task(&row)
    }

    async fn update(&self, id: i64, updates: UpdateTask) -> Result<Task> {
        let existing = self.fetch_required(id).await?;

        if updates.is_empty() {
            return Ok(existing);
        }

        let mut query_builder: sqlx::QueryBuilder<sqlx::Sqlite> =
            sqlx::QueryBuilder::new("UPDATE tasks SET updated_at = ");
        query_builder.push_bind(Utc::now());

        if let Some(ref title) = updates.title {
            query_builder.push(", title = ");
            query_builder.push_bind(title.trim().to_string());
        }

        if let Some(ref description) = updates.description {
            query_builder.push(", description = ");
            query_builder.push_bind(description.clone());
        }

        if let Some(due_at) = updates.due_at {
            query_builder.push(", due_at = ");
            query_builder.push_bind(due_at);
        }

        query_builder.push(" WHERE id = ");
        query_builder.push_bind(id);
        query_builder.push(format!(" RETURNING {TASK_COLUMNS}"));

        let row = query_builder
            .build()
            .fetch_one(&self.pool)
            .await
            .map_err(sqlx_error_to_task_error)?;

        row_to_task(&row)
    }

    async fn set_status(&self, id: i64, status: TaskStatus) -> Result<Task> {
        let current = self.fetch_required(id).await?;

        if !current.can_transition_to(status) {
            return Err(TaskError::invalid_transition(current.status, status));
        }

        let completed_at = match status {
            TaskStatus::Done => Some(Utc::now()),
            // Reopening clears the completion mark; archiving keeps it
            TaskStatus::Archived => current.completed_at,
            _ => None,
        };

        let row = sqlx::query(&format!(
            "UPDATE tasks SET status = ?, completed_at = ?, updated_at = ? \
             WHERE id = ? RETURNING {TASK_COLUMNS}"
        ))
        .bind(status_to_string(status))
        .bind(completed_at)
        .bind(Utc::now())
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(sqlx_error_to_task_error)?;

        row_to_task(&row)
    }

    async fn get(&self, id: i64) -> Result<Option<Task>> {
        let result = sqlx::query(&format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(sqlx_error_to_task_error)?;

        match result {
            Some(row) => Ok(Some(row_to_task(&row)?)),
            None => Ok(None),
        }
    }

    async fn list(&self, filter: TaskFilter) -> Result<Vec<Task>> {
        let mut query_builder = build_filter_query(&filter);
        let rows = query_builder
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(sqlx_error_to_task_error)?;

        let mut tasks = Vec::with_capacity(rows.len());
        for row in rows {
            tasks.push(row_to_task(&row)?);
        }

        Ok(tasks)
    }

    async fn assign(&self, id: i64, assignee: Option<&str>) -> Result<Task> {
        self.fetch_required(id).await?;

        let row = sqlx::query(&format!(
            "UPDATE tasks SET assignee = ?, updated_at = ? WHERE id = ? RETURNING {TASK_COLUMNS}"
        ))
        .bind(assignee)
        .bind(Utc::now())
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(sqlx_error_to_task_error)?;

        row_to_task(&row)
    }

    async fn archive(&self, id: i64) -> Result<Task> {
        self.set_status(id, TaskStatus::Archived).await
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(sqlx_error_to_task_error)?;

        if result.rows_affected() == 0 {
            return Err(TaskError::NotFound(id));
        }

        Ok(())
    }

    async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map_err(sqlx_error_to_task_error)?;

        Ok(())
    }

    async fn stats(&self) -> Result<RepositoryStats> {
        let now = Utc::now();

        // The four aggregates are independent, so run them concurrently
        let (total_result, status_results, overdue_result, timestamp_result) = tokio::join!(
            sqlx::query("SELECT COUNT(*) as total FROM tasks").fetch_one(&self.pool),
            sqlx::query("SELECT status, COUNT(*) as count FROM tasks GROUP BY status")
                .fetch_all(&self.pool),
            sqlx::query(
                "SELECT COUNT(*) as overdue FROM tasks \
                 WHERE due_at IS NOT NULL AND due_at < ? \
                 AND status IN ('Open', 'InProgress', 'Blocked')"
            )
            .bind(now)
            .fetch_one(&self.pool),
            sqlx::query(
                "SELECT MAX(created_at) as latest_created, MAX(completed_at) as latest_completed \
                 FROM tasks"
            )
            .fetch_one(&self.pool)
        );

        let total_result = total_result.map_err(sqlx_error_to_task_error)?;
        let status_results = status_results.map_err(sqlx_error_to_task_error)?;
        let overdue_result = overdue_result.map_err(sqlx_error_to_task_error)?;
        let timestamp_result = timestamp_result.map_err(sqlx_error_to_task_error)?;

        let total_tasks: i64 = total_result.get("total");
        let overdue_tasks: i64 = overdue_result.get("overdue");

        let mut tasks_by_status = HashMap::new();
        for row in status_results {
            let status_str: String = row.get("status");
            let status = crate::common::string_to_status(&status_str)?;
            let count: i64 = row.get("count");
            tasks_by_status.insert(status, count as u64);
        }

        let latest_created: Option<DateTime<Utc>> = timestamp_result.get("latest_created");
        let latest_completed: Option<DateTime<Utc>> = timestamp_result.get("latest_completed");

        Ok(RepositoryStats {
            total_tasks: total_tasks as u64,
            tasks_by_status,
            overdue_tasks: overdue_tasks as u64,
            latest_created,
            latest_completed,
        })
    }
}
