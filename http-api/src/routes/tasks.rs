use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use std::sync::Arc;
use tracker_core::{
    models::{Task, UpdateTask},
    service::{AssignParams, CreateTaskParams, ListTasksParams, SetStatusParams},
    TaskError, TaskRepository, TaskService,
};

use crate::{error::ApiError, server::AppState};

/// Task CRUD and lifecycle endpoints
pub fn routes<R: TaskRepository + 'static>() -> Router<Arc<AppState<R>>> {
    Router::new()
        .route("/tasks", post(create_task::<R>).get(list_tasks::<R>))
        .route(
            "/tasks/:id",
            get(get_task::<R>)
                .patch(update_task::<R>)
                .delete(delete_task::<R>),
        )
        .route("/tasks/:id/status", put(set_status::<R>))
        .route("/tasks/:id/assignee", put(assign_task::<R>))
        .route("/tasks/:id/archive", post(archive_task::<R>))
}

async fn create_task<R: TaskRepository + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Json(params): Json<CreateTaskParams>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let task = state.handler.create_task(params).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

async fn list_tasks<R: TaskRepository + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Query(params): Query<ListTasksParams>,
) -> Result<Json<Vec<Task>>, ApiError> {
    let tasks = state.handler.list_tasks(params).await?;
    Ok(Json(tasks))
}

async fn get_task<R: TaskRepository + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Path(id): Path<i64>,
) -> Result<Json<Task>, ApiError> {
    let task = state
        .handler
        .get_task(id)
        .await?
        .ok_or(TaskError::NotFound(id))?;
    Ok(Json(task))
}

async fn update_task<R: TaskRepository + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Path(id): Path<i64>,
    Json(updates): Json<UpdateTask>,
) -> Result<Json<Task>, ApiError> {
    let task = state.handler.update_task(id, updates).await?;
    Ok(Json(task))
}

async fn delete_task<R: TaskRepository + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.handler.delete_task(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn set_status<R: TaskRepository + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Path(id): Path<i64>,
    Json(params): Json<SetStatusParams>,
) -> Result<Json<Task>, ApiError> {
    let task = state.handler.set_task_status(id, params.status).await?;
    Ok(Json(task))
}

async fn assign_task<R: TaskRepository + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Path(id): Path<i64>,
    Json(params): Json<AssignParams>,
) -> Result<Json<Task>, ApiError> {
    let task = state.handler.assign_task(id, params.assignee).await?;
    Ok(Json(task))
}

async fn archive_task<R: TaskRepository + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Path(id): Path<i64>,
) -> Result<Json<Task>, ApiError> {
    let task = state.handler.archive_task(id).await?;
    Ok(Json(task))
}
