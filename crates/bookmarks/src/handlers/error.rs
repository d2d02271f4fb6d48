use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use bookmarks_core::bookmark::{BookmarkError, ServiceError};
use bookmarks_core::storage::{
    repository_error_to_status_code, service_error_to_status_code, RepositoryError,
};

/// Problem details body returned for every error response.
#[derive(Debug, Serialize)]
pub struct ProblemDetails {
    pub title: String,
    pub detail: String,
    pub status: u16,
}

impl ProblemDetails {
    pub fn new(status: StatusCode, title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            detail: detail.into(),
            status: status.as_u16(),
        }
    }
}

impl IntoResponse for ProblemDetails {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (
            status,
            [(header::CONTENT_TYPE, "application/problem+json")],
            Json(self),
        )
            .into_response()
    }
}

/// Short summary shown as the problem title for a status.
fn title_for(status: StatusCode) -> &'static str {
    match status {
        StatusCode::BAD_REQUEST => "Invalid bookmark",
        StatusCode::NOT_FOUND => "Bookmark not found",
        StatusCode::CONFLICT => "Bookmark already exists",
        StatusCode::PRECONDITION_FAILED => "ETag precondition failed",
        StatusCode::SERVICE_UNAVAILABLE => "Store unavailable",
        _ => "Internal server error",
    }
}

#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    fn status_code(&self) -> StatusCode {
        let code = if let Some(service_error) = self.0.downcast_ref::<ServiceError>() {
            service_error_to_status_code(service_error)
        } else if let Some(repo_error) = self.0.downcast_ref::<RepositoryError>() {
            repository_error_to_status_code(repo_error)
        } else if self.0.downcast_ref::<BookmarkError>().is_some() {
            400
        } else {
            500
        };
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(status = %status, error = ?self.0, "Request failed");
        } else {
            tracing::warn!(status = %status, error = %self.0, "API error");
        }

        ProblemDetails::new(status, title_for(status), self.0.to_string()).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
