use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::GraphError;

/// Error body shared by every endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
    #[serde(default)]
    pub fields: Vec<FieldError>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// An [`ApiError`] together with the status it is sent with.
#[derive(Debug)]
pub struct ApiFailure {
    pub status: StatusCode,
    pub body: ApiError,
}

impl ApiFailure {
    pub fn validation(fields: Vec<FieldError>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", "Request validation failed", fields)
    }

    fn new(status: StatusCode, code: &str, message: impl Into<String>, fields: Vec<FieldError>) -> Self {
        Self {
            status,
            body: ApiError {
                code: code.to_string(),
                message: message.into(),
                fields,
            },
        }
    }
}

impl From<JsonRejection> for ApiFailure {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", rejection.body_text(), Vec::new())
    }
}

impl From<GraphError> for ApiFailure {
    fn from(err: GraphError) -> Self {
        match err {
            GraphError::Timeout(_) => {
                Self::new(StatusCode::GATEWAY_TIMEOUT, "TIMEOUT", err.to_string(), Vec::new())
            }
            other => {
                log::error!("Graph query failed: {}", other);
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "STORE_ERROR", other.to_string(), Vec::new())
            }
        }
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiFailure::from(GraphError::Timeout(5)).status, StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(ApiFailure::from(GraphError::Timeout(5)).body.code, "TIMEOUT");

        let store = ApiFailure::from(GraphError::Store("down".into()));
        assert_eq!(store.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(store.body.code, "STORE_ERROR");

        let config = ApiFailure::from(GraphError::Config("bad".into()));
        assert_eq!(config.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_validation_body() {
        let failure = ApiFailure::validation(vec![FieldError::new("from", "must not be blank")]);
        let json = serde_json::to_value(&failure.body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "code": "VALIDATION_ERROR",
                "message": "Request validation failed",
                "fields": [{"field": "from", "message": "must not be blank"}]
            })
        );
    }
}
