use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use service::errors::ServiceError;
use tracing::error;

/// JSON error body: `{"message": ..., "errors"?: [...]}`.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub message: String,
    pub errors: Option<Vec<String>>,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<&'a [String]>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, message: impl Into<String>, errors: Option<Vec<String>>) -> Self {
        Self { status, message: message.into(), errors }
    }

    pub fn bad_request(message: impl Into<String>, detail: String) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message, Some(vec![detail]))
    }

    pub fn not_found(entity: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, format!("{entity} not found"), None)
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody { message: &self.message, errors: self.errors.as_deref() };
        (self.status, Json(body)).into_response()
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(problems) => Self::new(StatusCode::BAD_REQUEST, "Validation failed", Some(problems)),
            ServiceError::NotFound(msg) => Self::new(StatusCode::NOT_FOUND, msg, None),
            ServiceError::Conflict(msg) => Self::new(StatusCode::CONFLICT, msg, None),
            ServiceError::Unauthorized => Self::new(StatusCode::UNAUTHORIZED, "Invalid credentials", None),
            ServiceError::Forbidden => Self::new(StatusCode::FORBIDDEN, "Admin access required", None),
            ServiceError::Db(_) | ServiceError::Hash(_) | ServiceError::Token(_) => {
                error!(error = %e, "request failed");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error", None)
            }
        }
    }
}

impl From<JsonRejection> for JsonApiError {
    fn from(r: JsonRejection) -> Self { Self::bad_request("Invalid request body", r.body_text()) }
}

impl From<PathRejection> for JsonApiError {
    fn from(r: PathRejection) -> Self { Self::bad_request("Invalid path parameter", r.body_text()) }
}

impl From<QueryRejection> for JsonApiError {
    fn from(r: QueryRejection) -> Self { Self::bad_request("Invalid query string", r.body_text()) }
}
