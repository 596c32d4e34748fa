//! Error types and error handling for the application
//!
//! Every failure raised by the handlers, the service or the store is an
//! [`AppError`]. Its `IntoResponse` impl is the one place where failures are
//! turned into HTTP responses with the body `{ message, details? }`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Message used whenever a product ID does not resolve
pub const PRODUCT_NOT_FOUND: &str = "Produto não encontrado";

/// A single field-level validation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    /// Name of the offending field
    pub field: String,
    /// Human-readable description of the problem
    pub message: String,
}

impl FieldViolation {
    /// Create a violation for `field`
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Application-level error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Request payload failed validation
    #[error("Dados inválidos")]
    InvalidInput(Vec<FieldViolation>),

    /// Request body could not be parsed as JSON
    #[error("{0}")]
    InvalidBody(String),

    /// Another product already uses the requested name
    #[error("{0}")]
    DuplicateName(String),

    /// Product with the given ID was not found
    #[error("Produto não encontrado")]
    NotFound,

    /// Error occurred while writing the product document
    #[error("Persistence error: {0}")]
    Persistence(#[from] crate::state::PersistenceError),

    /// Internal server error (catch-all for unexpected errors)
    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// HTTP status associated with this error
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            AppError::DuplicateName(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// JSON body returned for every failed request
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Human-readable message
    pub message: String,
    /// Field-level violations, present only for validation failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldViolation>>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let body = match self {
            AppError::InvalidInput(details) => ErrorBody {
                message: "Dados inválidos".to_string(),
                details: Some(details),
            },
            AppError::Persistence(_) | AppError::Internal(_) => ErrorBody {
                message: "Erro interno".to_string(),
                details: None,
            },
            other => ErrorBody {
                message: other.to_string(),
                details: None,
            },
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::{json, Value};

    async fn body_json(error: AppError) -> (StatusCode, Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_invalid_input_includes_details() {
        let (status, body) = body_json(AppError::InvalidInput(vec![FieldViolation::new(
            "name",
            "name é obrigatório",
        )]))
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({
                "message": "Dados inválidos",
                "details": [{ "field": "name", "message": "name é obrigatório" }]
            })
        );
    }

    #[tokio::test]
    async fn test_not_found_has_no_details() {
        let (status, body) = body_json(AppError::NotFound).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "message": PRODUCT_NOT_FOUND }));
    }

    #[tokio::test]
    async fn test_internal_error_hides_cause() {
        let (status, body) = body_json(AppError::Internal(anyhow::anyhow!("disk on fire"))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "message": "Erro interno" }));
    }
}
