//! HTTP error mapping
//!
//! Converts the domain error taxonomy into wire responses. The JSON body
//! shape is `{"error": {"code": <status>, "message": "..."}}` for every
//! failure, so clients only ever parse one error schema.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracker_core::TaskError;

/// Wire-level error returned by every handler
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Task(#[from] TaskError),

    #[error("malformed request: {0}")]
    BadRequest(String),
}

impl ApiError {
    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            // The domain taxonomy already knows its HTTP mapping
            ApiError::Task(err) => StatusCode::from_u16(err.status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        // 5xx details stay in the logs; clients get a generic message
        let message = if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
            "internal server error".to_string()
        } else {
            self.to_string()
        };

        let body = Json(json!({
            "error": {
                "code": status.as_u16(),
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracker_core::models::TaskStatus;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::Task(TaskError::NotFound(1)).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Task(TaskError::Validation("bad".into())).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Task(TaskError::invalid_transition(
                TaskStatus::Open,
                TaskStatus::Done
            ))
            .status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::Task(TaskError::Database("down".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::BadRequest("nonsense".into()).status(),
            StatusCode::BAD_REQUEST
        );
    }
}
