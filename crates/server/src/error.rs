//! HTTP error mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Errors returned by lookup handlers.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// The request arguments could not be parsed.
    #[error("{0}")]
    BadRequest(String),

    /// The registry rejected the lookup.
    #[error(transparent)]
    Registry(#[from] registry::Error),
}

impl ServerError {
    /// Map to an HTTP status code.
    fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Registry(e) => match e {
                registry::Error::ServiceNotFound(_) => StatusCode::NOT_FOUND,
                registry::Error::InvalidRange { .. } => StatusCode::BAD_REQUEST,
                registry::Error::Ring(corelib::Error::NotEnoughMembers { .. }) => {
                    StatusCode::BAD_REQUEST
                }
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        (self.status_code(), self.to_string()).into_response()
    }
}
