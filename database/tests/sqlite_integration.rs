//! Integration tests for the SQLite repository.
//!
//! Every test runs against its own in-memory database (or a tempfile for
//! the persistence tests), fully migrated.

use chrono::{Duration, Utc};
use tempfile::TempDir;
use tracker_core::models::{NewTask, TaskFilter, TaskStatus, UpdateTask};
use tracker_core::repository::TaskRepository;
use tracker_database::SqliteTaskRepository;

async fn memory_repo() -> SqliteTaskRepository {
    let repo = SqliteTaskRepository::connect(":memory:")
        .await
        .expect("failed to create in-memory repository");
    repo.migrate().await.expect("failed to run migrations");
    repo
}

fn new_task(title: &str) -> NewTask {
    NewTask {
        title: title.to_string(),
        description: format!("Description for {title}"),
        assignee: None,
        due_at: None,
    }
}

#[tokio::test]
async fn test_create_task() {
    let repo = memory_repo().await;

    let created = repo
        .create(NewTask {
            title: "  Fix login timeout  ".to_string(),
            description: "Session expires too early".to_string(),
            assignee: Some("mira".to_string()),
            due_at: None,
        })
        .await
        .unwrap();

    assert!(created.id > 0);
    // Titles are stored trimmed
    assert_eq!(created.title, "Fix login timeout");
    assert_eq!(created.description, "Session expires too early");
    assert_eq!(created.status, TaskStatus::Open);
    assert_eq!(created.assignee, Some("mira".to_string()));
    assert_eq!(created.created_at, created.updated_at);
    assert!(created.completed_at.is_none());
}

#[tokio::test]
async fn test_get_returns_none_for_missing_task() {
    let repo = memory_repo().await;
    assert!(repo.get(9999).await.unwrap().is_none());
}

#[tokio::test]
async fn test_get_roundtrip() {
    let repo = memory_repo().await;
    let due = Utc::now() + Duration::days(7);

    let created = repo
        .create(NewTask {
            title: "Plan sprint".to_string(),
            description: String::new(),
            assignee: None,
            due_at: Some(due),
        })
        .await
        .unwrap();

    let fetched = repo.get(created.id).await.unwrap().unwrap();
    assert_eq!(fetched, created);
    assert!(fetched.due_at.is_some());
}

#[tokio::test]
async fn test_update_partial_fields() {
    let repo = memory_repo().await;
    let created = repo.create(new_task("Original")).await.unwrap();

    let updated = repo
        .update(
            created.id,
            UpdateTask {
                title: Some("Renamed".to_string()),
                description: None,
                due_at: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.title, "Renamed");
    // Unspecified fields keep their value
    assert_eq!(updated.description, created.description);
    assert!(updated.updated_at >= created.updated_at);
}

#[tokio::test]
async fn test_empty_update_is_a_no_op() {
    let repo = memory_repo().await;
    let created = repo.create(new_task("Untouched")).await.unwrap();

    let result = repo.update(created.id, UpdateTask::default()).await.unwrap();
    assert_eq!(result, created);
}

#[tokio::test]
async fn test_update_missing_task() {
    let repo = memory_repo().await;
    let err = repo
        .update(
            42,
            UpdateTask {
                title: Some("Ghost".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_status_lifecycle() {
    let repo = memory_repo().await;
    let task = repo.create(new_task("Lifecycle")).await.unwrap();

    let task = repo.set_status(task.id, TaskStatus::InProgress).await.unwrap();
    assert_eq!(task.status, TaskStatus::InProgress);
    assert!(task.completed_at.is_none());

    let task = repo.set_status(task.id, TaskStatus::Blocked).await.unwrap();
    assert_eq!(task.status, TaskStatus::Blocked);

    let task = repo.set_status(task.id, TaskStatus::InProgress).await.unwrap();
    let task = repo.set_status(task.id, TaskStatus::Done).await.unwrap();
    assert_eq!(task.status, TaskStatus::Done);
    assert!(task.completed_at.is_some());

    // Reopen clears the completion mark
    let task = repo.set_status(task.id, TaskStatus::InProgress).await.unwrap();
    assert!(task.completed_at.is_none());

    // Finish again and archive; completed_at survives archiving
    let task = repo.set_status(task.id, TaskStatus::Done).await.unwrap();
    let completed_at = task.completed_at;
    let task = repo.set_status(task.id, TaskStatus::Archived).await.unwrap();
    assert_eq!(task.status, TaskStatus::Archived);
    assert_eq!(task.completed_at, completed_at);
}

#[tokio::test]
async fn test_invalid_transition_rejected() {
    let repo = memory_repo().await;
    let task = repo.create(new_task("Stubborn")).await.unwrap();

    let err = repo.set_status(task.id, TaskStatus::Done).await.unwrap_err();
    assert_eq!(err.status_code(), 422);

    // Same-state transition is also rejected
    let err = repo.set_status(task.id, TaskStatus::Open).await.unwrap_err();
    assert_eq!(err.status_code(), 422);

    // The failed attempts left the task untouched
    let unchanged = repo.get(task.id).await.unwrap().unwrap();
    assert_eq!(unchanged.status, TaskStatus::Open);
}

#[tokio::test]
async fn test_set_status_missing_task() {
    let repo = memory_repo().await;
    let err = repo.set_status(7, TaskStatus::InProgress).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_assign_and_unassign() {
    let repo = memory_repo().await;
    let task = repo.create(new_task("Handover")).await.unwrap();

    let task = repo.assign(task.id, Some("mira")).await.unwrap();
    assert_eq!(task.assignee, Some("mira".to_string()));

    let task = repo.assign(task.id, Some("jonas")).await.unwrap();
    assert_eq!(task.assignee, Some("jonas".to_string()));

    let task = repo.assign(task.id, None).await.unwrap();
    assert_eq!(task.assignee, None);
}

#[tokio::test]
async fn test_assign_missing_task() {
    let repo = memory_repo().await;
    let err = repo.assign(1, Some("mira")).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_archive_requires_done() {
    let repo = memory_repo().await;
    let task = repo.create(new_task("Early archive")).await.unwrap();

    let err = repo.archive(task.id).await.unwrap_err();
    assert_eq!(err.status_code(), 422);

    repo.set_status(task.id, TaskStatus::InProgress).await.unwrap();
    repo.set_status(task.id, TaskStatus::Done).await.unwrap();

    let archived = repo.archive(task.id).await.unwrap();
    assert_eq!(archived.status, TaskStatus::Archived);
}

#[tokio::test]
async fn test_delete() {
    let repo = memory_repo().await;
    let task = repo.create(new_task("Disposable")).await.unwrap();

    repo.delete(task.id).await.unwrap();
    assert!(repo.get(task.id).await.unwrap().is_none());

    let err = repo.delete(task.id).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_list_filters() {
    let repo = memory_repo().await;

    let a = repo
        .create(NewTask {
            title: "Task A".to_string(),
            description: String::new(),
            assignee: Some("mira".to_string()),
            due_at: None,
        })
        .await
        .unwrap();
    let b = repo
        .create(NewTask {
            title: "Task B".to_string(),
            description: String::new(),
            assignee: Some("jonas".to_string()),
            due_at: None,
        })
        .await
        .unwrap();
    repo.set_status(b.id, TaskStatus::InProgress).await.unwrap();

    // No filter returns everything
    let all = repo.list(TaskFilter::default()).await.unwrap();
    assert_eq!(all.len(), 2);

    // By assignee
    let miras = repo
        .list(TaskFilter {
            assignee: Some("mira".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(miras.len(), 1);
    assert_eq!(miras[0].id, a.id);

    // By status
    let in_progress = repo
        .list(TaskFilter {
            status: Some(TaskStatus::InProgress),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(in_progress.len(), 1);
    assert_eq!(in_progress[0].id, b.id);

    // Combined filters use AND
    let none = repo
        .list(TaskFilter {
            assignee: Some("mira".to_string()),
            status: Some(TaskStatus::InProgress),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn test_list_date_bounds_and_pagination() {
    let repo = memory_repo().await;

    for i in 0..5 {
        repo.create(new_task(&format!("Task {i}"))).await.unwrap();
    }

    let future = Utc::now() + Duration::hours(1);
    let past = Utc::now() - Duration::hours(1);

    let recent = repo
        .list(TaskFilter {
            created_after: Some(past),
            created_before: Some(future),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(recent.len(), 5);

    let nothing = repo
        .list(TaskFilter {
            created_after: Some(future),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(nothing.is_empty());

    // Newest first, paginated
    let page = repo
        .list(TaskFilter {
            limit: Some(2),
            offset: Some(1),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(page.len(), 2);
    assert_eq!(page[0].title, "Task 3");
    assert_eq!(page[1].title, "Task 2");
}

#[tokio::test]
async fn test_list_due_before() {
    let repo = memory_repo().await;
    let soon = Utc::now() + Duration::hours(1);
    let later = Utc::now() + Duration::days(30);

    repo.create(NewTask {
        title: "Urgent".to_string(),
        description: String::new(),
        assignee: None,
        due_at: Some(soon),
    })
    .await
    .unwrap();
    repo.create(NewTask {
        title: "Eventually".to_string(),
        description: String::new(),
        assignee: None,
        due_at: Some(later),
    })
    .await
    .unwrap();
    repo.create(new_task("No deadline")).await.unwrap();

    let urgent = repo
        .list(TaskFilter {
            due_before: Some(Utc::now() + Duration::days(1)),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(urgent.len(), 1);
    assert_eq!(urgent[0].title, "Urgent");
}

#[tokio::test]
async fn test_stats() {
    let repo = memory_repo().await;

    let stats = repo.stats().await.unwrap();
    assert_eq!(stats.total_tasks, 0);
    assert!(stats.latest_created.is_none());

    let overdue = repo
        .create(NewTask {
            title: "Late".to_string(),
            description: String::new(),
            assignee: None,
            due_at: Some(Utc::now() - Duration::days(1)),
        })
        .await
        .unwrap();
    let done = repo.create(new_task("Finished")).await.unwrap();
    repo.set_status(done.id, TaskStatus::InProgress).await.unwrap();
    repo.set_status(done.id, TaskStatus::Done).await.unwrap();

    let stats = repo.stats().await.unwrap();
    assert_eq!(stats.total_tasks, 2);
    assert_eq!(stats.overdue_tasks, 1);
    assert_eq!(stats.tasks_by_status.get(&TaskStatus::Open), Some(&1));
    assert_eq!(stats.tasks_by_status.get(&TaskStatus::Done), Some(&1));
    assert!(stats.latest_created.is_some());
    assert!(stats.latest_completed.is_some());

    // A completed overdue task stops counting as overdue
    repo.set_status(overdue.id, TaskStatus::InProgress).await.unwrap();
    repo.set_status(overdue.id, TaskStatus::Done).await.unwrap();
    let stats = repo.stats().await.unwrap();
    assert_eq!(stats.overdue_tasks, 0);
}

#[tokio::test]
async fn test_health_check() {
    let repo = memory_repo().await;
    assert!(repo.health_check().await.is_ok());
}

#[tokio::test]
async fn test_file_database_persists_across_connections() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("tracker.db");
    let database_url = format!("sqlite://{}", db_path.display());

    let id = {
        let repo = SqliteTaskRepository::connect(&database_url).await.unwrap();
        repo.migrate().await.unwrap();
        let task = repo.create(new_task("Durable")).await.unwrap();
        repo.close().await;
        task.id
    };

    assert!(db_path.exists());

    let repo = SqliteTaskRepository::connect(&database_url).await.unwrap();
    repo.migrate().await.unwrap();
    let task = repo.get(id).await.unwrap().unwrap();
    assert_eq!(task.title, "Durable");
}

#[tokio::test]
async fn test_bare_path_gets_sqlite_scheme() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("bare.db");

    let repo = SqliteTaskRepository::connect(&db_path.display().to_string())
        .await
        .unwrap();
    repo.migrate().await.unwrap();
    assert!(repo.health_check().await.is_ok());
    assert!(db_path.exists());
}

#[tokio::test]
async fn test_concurrent_creates() {
    let repo = memory_repo().await;

    let futures = (0..10).map(|i| {
        let repo = repo.clone();
        async move { repo.create(new_task(&format!("Concurrent {i}"))).await }
    });

    let results = futures_util::future::join_all(futures).await;
    for result in results {
        assert!(result.is_ok());
    }

    let all = repo.list(TaskFilter::default()).await.unwrap();
    assert_eq!(all.len(), 10);
}
