use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use models::errors::ModelError;
use models::inquiry::FieldErrors;
use serde_json::json;
use service::ServiceError;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("invalid input")]
    InvalidInput(FieldErrors),
    #[error("{0} not found")]
    NotFound(String),
    #[error("{0}")]
    Unavailable(String),
    #[error("{0}")]
    Upstream(String),
    #[error("{0}")]
    Internal(String),
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(msg) | ServiceError::Model(ModelError::Validation(msg)) => Self::BadRequest(msg),
            ServiceError::NotReady => Self::Unavailable("store is not ready".into()),
            ServiceError::Suggestion(msg) => Self::Upstream(msg),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::InvalidInput(errors) => {
                (StatusCode::BAD_REQUEST, Json(json!({"message": "Invalid input", "errors": errors}))).into_response()
            }
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, Json(json!({"error": msg}))).into_response(),
            ApiError::NotFound(what) => {
                (StatusCode::NOT_FOUND, Json(json!({"error": format!("{what} not found")}))).into_response()
            }
            ApiError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, Json(json!({"error": msg}))).into_response(),
            ApiError::Upstream(msg) => (StatusCode::BAD_GATEWAY, Json(json!({"error": msg}))).into_response(),
            ApiError::Internal(msg) => {
                error!(error = %msg, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"error": msg}))).into_response()
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("service setup failed: {0}")]
    Service(#[from] ServiceError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_errors_map_to_statuses() {
        let cases = [
            (ServiceError::Validation("Name is required".into()), StatusCode::BAD_REQUEST),
            (ServiceError::Model(ModelError::required("Alt text")), StatusCode::BAD_REQUEST),
            (ServiceError::NotReady, StatusCode::SERVICE_UNAVAILABLE),
            (ServiceError::Suggestion("timeout".into()), StatusCode::BAD_GATEWAY),
            (ServiceError::Persistence("slot x: disk full".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).into_response().status(), status);
        }
    }

    #[test]
    fn validation_message_is_unprefixed() {
        match ApiError::from(ServiceError::Model(ModelError::required("Alt text"))) {
            ApiError::BadRequest(msg) => assert_eq!(msg, "Alt text is required"),
            other => panic!("unexpected {other:?}"),
        }
    }
}
