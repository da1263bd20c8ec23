//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use zonehub_domain::error::{NotFoundError, OrganiserError};

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps [`OrganiserError`] to an HTTP response with appropriate status code.
#[derive(Debug)]
pub struct ApiError(OrganiserError);

impl From<OrganiserError> for ApiError {
    fn from(err: OrganiserError) -> Self {
        Self(err)
    }
}

impl From<NotFoundError> for ApiError {
    fn from(err: NotFoundError) -> Self {
        Self(err.into())
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match &self.0 {
            OrganiserError::NotFound(_) => StatusCode::NOT_FOUND,
            OrganiserError::SameZone
            | OrganiserError::CircularReference
            | OrganiserError::MustHaveSameParent => StatusCode::BAD_REQUEST,
            OrganiserError::OrphanZone | OrganiserError::HasDevices => StatusCode::CONFLICT,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::debug!(error = %self.0, status = %status, "request rejected");
        (
            status,
            Json(ErrorBody {
                error: self.0.to_string(),
            }),
        )
            .into_response()
    }
}
