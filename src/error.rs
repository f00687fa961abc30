use actix_web::{error, http::StatusCode, HttpRequest, HttpResponse};
use thiserror::Error;

use crate::models::RequestError;
use crate::services::FormsApiError;

/// Body of every 500 response
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";

/// Errors surfaced by the HTTP handlers
///
/// Bodies are a bare JSON string. Bad requests echo a description of what was
/// wrong; every other failure collapses to [`INTERNAL_ERROR_MESSAGE`].
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("upstream request failed: {0}")]
    Upstream(#[from] FormsApiError),

    #[error("request deadline of {0}s exceeded")]
    DeadlineExceeded(u64),
}

impl From<RequestError> for ApiError {
    fn from(e: RequestError) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

impl error::ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream(_) | ApiError::DeadlineExceeded(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            ApiError::BadRequest(msg) => msg.as_str(),
            _ => INTERNAL_ERROR_MESSAGE,
        };
        HttpResponse::build(self.status_code()).json(message)
    }
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("Query payload error on {}: {}", req.path(), err);
    ApiError::BadRequest(format!("Invalid query: {}", err)).into()
}
