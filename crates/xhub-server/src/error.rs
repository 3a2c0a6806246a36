use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;
use thiserror::Error;
use xhub_resources::ResourceError;
use xhub_types::PathError;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid request body: {0}")]
    BadRequest(String),

    #[error("invalid path: {0}")]
    InvalidPath(#[from] PathError),

    #[error(transparent)]
    Resource(#[from] ResourceError),

    #[error("store error: {0}")]
    Store(#[from] xhub_store::StoreError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) | Self::InvalidPath(_) => StatusCode::BAD_REQUEST,
            Self::Resource(err) if err.is_client_error() => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();
        if status.is_server_error() {
            tracing::error!(error = %message, "request failed");
        } else {
            tracing::debug!(error = %message, "request rejected");
        }
        (status, Json(ErrorBody { error: &message })).into_response()
    }
}

pub type ServerResult<T> = Result<T, ServerError>;
