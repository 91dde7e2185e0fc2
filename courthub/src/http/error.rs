use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::errors::{HubError, ValidationError};

/// Error returned by every handler; renders `{"message": ...}` with the
/// status matching the failure kind.
#[derive(Debug)]
pub struct ApiError(pub HubError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            HubError::NotFound { .. } => StatusCode::NOT_FOUND,
            HubError::Validation(_) | HubError::Conflict { .. } => StatusCode::BAD_REQUEST,
            HubError::Forbidden { .. } => StatusCode::FORBIDDEN,
            HubError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            HubError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl<E> From<E> for ApiError
where
    E: Into<HubError>,
{
    fn from(err: E) -> Self {
        ApiError(err.into())
    }
}

impl From<JsonRejection> for HubError {
    fn from(rejection: JsonRejection) -> Self {
        HubError::Validation(ValidationError::single("body", "validation.body", rejection.body_text()))
    }
}

impl From<QueryRejection> for HubError {
    fn from(rejection: QueryRejection) -> Self {
        HubError::Validation(ValidationError::single("query", "validation.query", rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self.0 {
            HubError::Validation(err) => json!({
                "message": err.summary(),
                "issues": err.issues,
            }),
            HubError::Store(err) => {
                log::error!("request failed: {err}");
                json!({ "message": err.to_string() })
            }
            other => json!({ "message": other.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
