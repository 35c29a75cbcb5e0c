//! HTTP transport for the task tracker
//!
//! REST surface over any [`tracker_core::TaskRepository`]:
//!
//! - `GET  /health`, `GET /stats` - monitoring
//! - `POST /tasks`, `GET /tasks` - create and filtered listing
//! - `GET/PATCH/DELETE /tasks/:id` - single-task operations
//! - `PUT  /tasks/:id/status` - validated lifecycle transitions
//! - `PUT  /tasks/:id/assignee` - assignment
//! - `POST /tasks/:id/archive` - archival
//!
//! Route groups are registered from an explicit list in
//! [`server::HttpServer::router`]; nothing is discovered by convention.

pub mod error;
pub mod handler;
pub mod request_log;
pub mod routes;
pub mod server;

pub use error::ApiError;
pub use handler::TaskHandler;
pub use server::{AppState, BoundServer, HttpServer, ServerError};
