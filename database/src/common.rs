use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqliteRow, Row};
use tracker_core::{
    error::{Result, TaskError},
    models::{Task, TaskFilter, TaskStatus},
};

/// Convert TaskStatus enum to string for database storage
pub fn status_to_string(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Open => "Open",
        TaskStatus::InProgress => "InProgress",
        TaskStatus::Blocked => "Blocked",
        TaskStatus::Done => "Done",
        TaskStatus::Archived => "Archived",
    }
}

/// Convert string from database to TaskStatus enum
pub fn string_to_status(s: &str) -> Result<TaskStatus> {
    match s {
        "Open" => Ok(TaskStatus::Open),
        "InProgress" => Ok(TaskStatus::InProgress),
        "Blocked" => Ok(TaskStatus::Blocked),
        "Done" => Ok(TaskStatus::Done),
        "Archived" => Ok(TaskStatus::Archived),
        _ => Err(TaskError::Database(format!(
            "invalid task status in database: {s}"
        ))),
    }
}

/// Convert a SQLite row to the Task model
pub fn row_to_task(row: &SqliteRow) -> Result<Task> {
    let status_str: String = row.get("status");
    let status = string_to_status(&status_str)?;

    let created_at: DateTime<Utc> = row.get("created_at");
    let updated_at: DateTime<Utc> = row.get("updated_at");
    let due_at: Option<DateTime<Utc>> = row.get("due_at");
    let completed_at: Option<DateTime<Utc>> = row.get("completed_at");

    Ok(Task {
        id: row.get("id"),
        title: row.get("title"),
        description: row.get("description"),
        status,
        assignee: row.get("assignee"),
        due_at,
        created_at,
        updated_at,
        completed_at,
    })
}

/// Convert a SQLx error to the domain error type
pub fn sqlx_error_to_task_error(err: sqlx::Error) -> TaskError {
    match &err {
        sqlx::Error::Database(db_err) => {
            TaskError::Database(format!("database constraint error: {}", db_err.message()))
        }
        sqlx::Error::RowNotFound => {
            // Lookups use fetch_optional; reaching this means a write raced a delete
            TaskError::Database("unexpected RowNotFound error".to_string())
        }
        sqlx::Error::PoolTimedOut => TaskError::Database("connection pool timeout".to_string()),
        sqlx::Error::Io(io_err) => TaskError::Database(format!("database I/O error: {io_err}")),
        _ => TaskError::Database(format!("database operation failed: {err}")),
    }
}

/// Column list every task query selects, kept in one place so RETURNING
/// clauses and SELECTs cannot drift apart.
pub const TASK_COLUMNS: &str =
    "id, title, description, status, assignee, due_at, created_at, updated_at, completed_at";

/// Build the filtered SELECT for task listing with proper type binding
pub fn build_filter_query(filter: &TaskFilter) -> sqlx::QueryBuilder<'static, sqlx::Sqlite> {
    let mut query_builder: sqlx::QueryBuilder<sqlx::Sqlite> =
        sqlx::QueryBuilder::new(format!("SELECT {TASK_COLUMNS} FROM tasks"));

    let mut has_conditions = false;

    if let Some(ref assignee) = filter.assignee {
        query_builder.push(" WHERE assignee = ");
        query_builder.push_bind(assignee.clone());
        has_conditions = true;
    }

    if let Some(status) = filter.status {
        if has_conditions {
            query_builder.push(" AND ");
        } else {
            query_builder.push(" WHERE ");
            has_conditions = true;
        }
        query_builder.push("status = ");
        query_builder.push_bind(status_to_string(status));
    }

    if let Some(due_before) = filter.due_before {
        if has_conditions {
            query_builder.push(" AND ");
        } else {
            query_builder.push(" WHERE ");
            has_conditions = true;
        }
        query_builder.push("due_at < ");
        query_builder.push_bind(due_before);
    }

    if let Some(created_after) = filter.created_after {
        if has_conditions {
            query_builder.push(" AND ");
        } else {
            query_builder.push(" WHERE ");
            has_conditions = true;
        }
        query_builder.push("created_at >= ");
        query_builder.push_bind(created_after);
    }

    if let Some(created_before) = filter.created_before {
        if has_conditions {
            query_builder.push(" AND ");
        } else {
            query_builder.push(" WHERE ");
        }
        query_builder.push("created_at <= ");
        query_builder.push_bind(created_before);
    }

    query_builder.push(" ORDER BY created_at DESC, id DESC");

    if let Some(limit) = filter.limit {
        query_builder.push(" LIMIT ");
        query_builder.push_bind(limit);
    }

    if let Some(offset) = filter.offset {
        query_builder.push(" OFFSET ");
        query_builder.push_bind(offset);
    }

    query_builder
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sqlx::Execute;

    #[test]
    fn test_status_conversions() {
        assert_eq!(status_to_string(TaskStatus::Open), "Open");
        assert_eq!(status_to_string(TaskStatus::InProgress), "InProgress");
        assert_eq!(status_to_string(TaskStatus::Blocked), "Blocked");
        assert_eq!(status_to_string(TaskStatus::Done), "Done");
        assert_eq!(status_to_string(TaskStatus::Archived), "Archived");

        assert_eq!(string_to_status("Open").unwrap(), TaskStatus::Open);
        assert_eq!(
            string_to_status("InProgress").unwrap(),
            TaskStatus::InProgress
        );
        assert_eq!(string_to_status("Blocked").unwrap(), TaskStatus::Blocked);
        assert_eq!(string_to_status("Done").unwrap(), TaskStatus::Done);
        assert_eq!(string_to_status("Archived").unwrap(), TaskStatus::Archived);

        assert!(string_to_status("Invalid").is_err());
        assert!(string_to_status("").is_err());
    }

    #[test]
    fn test_empty_filter_query() {
        let mut query_builder = build_filter_query(&TaskFilter::default());
        let query = query_builder.build();
        let sql = query.sql();

        assert!(sql.starts_with("SELECT"));
        assert!(!sql.contains("WHERE"));
        assert!(sql.contains("ORDER BY created_at DESC"));
        assert!(!sql.contains("LIMIT"));
    }

    #[test]
    fn test_full_filter_query() {
        let filter = TaskFilter {
            assignee: Some("mira".to_string()),
            status: Some(TaskStatus::InProgress),
            due_before: Some(Utc::now()),
            created_after: Some(Utc::now()),
            created_before: Some(Utc::now()),
            limit: Some(10),
            offset: Some(5),
        };

        let mut query_builder = build_filter_query(&filter);
        let query = query_builder.build();
        let sql = query.sql();

        assert!(sql.contains("WHERE assignee = "));
        assert!(sql.contains("AND status = "));
        assert!(sql.contains("AND due_at < "));
        assert!(sql.contains("AND created_at >= "));
        assert!(sql.contains("AND created_at <= "));
        assert!(sql.contains("ORDER BY created_at DESC"));
        assert!(sql.contains("LIMIT "));
        assert!(sql.contains("OFFSET "));
    }

    #[test]
    fn test_single_condition_gets_where_not_and() {
        let filter = TaskFilter {
            status: Some(TaskStatus::Open),
            ..Default::default()
        };

        let mut query_builder = build_filter_query(&filter);
        let query = query_builder.build();
        let sql = query.sql();

        assert!(sql.contains("WHERE status = "));
        assert!(!sql.contains("AND"));
    }
}
