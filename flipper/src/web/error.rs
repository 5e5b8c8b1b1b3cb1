use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use flipper_api_types::result::JsonError;
use thiserror::Error;
use tracing::error;

use crate::error::ServiceError;

#[derive(Debug, Error)]
pub(crate) enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("Route not found")]
    RouteNotFound,
    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl ApiError {
    fn as_status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::RouteNotFound => StatusCode::NOT_FOUND,
            ApiError::Service(e) => match e {
                ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
                ServiceError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
                ServiceError::Unavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
                // client errors from the wiki are passed along, anything else is on us
                ServiceError::Upstream {
                    status: Some(status @ 400..=499),
                    ..
                } => StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY),
                ServiceError::Upstream { .. } => StatusCode::BAD_GATEWAY,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.as_status_code();
        error!(status = status.as_u16(), "error {self}");
        (
            status,
            Json(JsonError {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
