use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use thiserror::Error;

use crate::handlers::response::json_response;

/// A request that could not be served normally.
///
/// Converts into the JSON error response sent to the client. Validation
/// problems use an `error` key; outcomes the client should simply display
/// (nothing found, save rejected) use a `message` key.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("No route found for {0}")]
    RouteNotFound(String),

    #[error("Method Not Allowed")]
    MethodNotAllowed,

    /// The remote catalog failed or timed out.
    #[error("{0}")]
    Unavailable(String),

    /// Anything unexpected. The detail is logged, not sent.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) | Self::RouteNotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Unavailable(_) | Self::Internal(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl From<ApiError> for Response<Bytes> {
    fn from(err: ApiError) -> Self {
        let status = err.status();
        let body = match &err {
            ApiError::NotFound(msg) | ApiError::Conflict(msg) => {
                serde_json::json!({ "message": msg })
            }
            ApiError::Internal(detail) => {
                log::error!("Unexpected error while handling request: {detail}");
                serde_json::json!({ "error": "Internal server error." })
            }
            other => serde_json::json!({ "error": other.to_string() }),
        };
        json_response(status, &body)
    }
}

/// Errors that stop the server from starting or running.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("{0}")]
    Settings(#[from] tcg_shelf_lib::SettingsError),

    #[error("Failed to open collection database: {0}")]
    Database(#[from] tcg_shelf_db::SchemaError),

    #[error("Failed to set up catalog client: {0}")]
    Catalog(#[from] tcg_shelf_fetcher::FetchError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
