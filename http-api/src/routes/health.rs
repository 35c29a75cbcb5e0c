use axum::{extract::State, routing::get, Json, Router};
use std::sync::Arc;
use tracker_core::{
    repository::RepositoryStats, service::HealthStatus, TaskRepository, TaskService,
};

use crate::{error::ApiError, server::AppState};

/// Monitoring endpoints
pub fn routes<R: TaskRepository + 'static>() -> Router<Arc<AppState<R>>> {
    Router::new()
        .route("/health", get(health::<R>))
        .route("/stats", get(stats::<R>))
}

async fn health<R: TaskRepository + 'static>(
    State(state): State<Arc<AppState<R>>>,
) -> Result<Json<HealthStatus>, ApiError> {
    let health = state.handler.health().await?;
    Ok(Json(health))
}

async fn stats<R: TaskRepository + 'static>(
    State(state): State<Arc<AppState<R>>>,
) -> Result<Json<RepositoryStats>, ApiError> {
    let stats = state.handler.stats().await?;
    Ok(Json(stats))
}
