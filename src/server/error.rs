//! API error responses
//!
//! `PlannerError` and extractor rejections become a status code plus a
//! `{"error": "..."}` body.

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use crate::errors::PlannerError;

/// Error returned by API handlers, rendered as `{"error": message}`
#[derive(Debug)]
pub struct ApiError(pub PlannerError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            PlannerError::NotFound(_) => StatusCode::NOT_FOUND,
            PlannerError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            PlannerError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            PlannerError::Store(_) | PlannerError::Http(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<PlannerError> for ApiError {
    fn from(error: PlannerError) -> Self {
        Self(error)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(PlannerError::InvalidInput(rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self(PlannerError::InvalidInput(rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self(PlannerError::InvalidInput(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(%status, "request failed: {}", self.0);
        }

        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}
