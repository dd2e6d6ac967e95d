use std::collections::BTreeMap;

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use crate::models::trip::TripStatus;

/// Field name → user-facing message, in stable order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn into_result(self) -> Result<(), AppError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(self))
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
    #[error("not found")]
    NotFound,
    #[error("stop not found on this trip")]
    StopNotFound,
    #[error("document {0} not found on this trip")]
    DocumentNotFound(String),
    #[error("select a stop before submitting")]
    SelectionRequired,
    #[error("trip is {0}, only active trips accept this change")]
    TripNotActive(TripStatus),
    #[error("trip is completed and read-only")]
    TripReadOnly,
    #[error("validation failed")]
    Validation(FieldErrors),
    #[error("{message}")]
    Auth { message: String },
    #[error("{0}")]
    Network(String),
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Config(_) | AppError::Io(_) | AppError::Json(_) | AppError::Other(_) => {
                "internal"
            }
            AppError::NotFound => "not_found",
            AppError::StopNotFound => "stop_not_found",
            AppError::DocumentNotFound(_) => "document_not_found",
            AppError::SelectionRequired => "selection_required",
            AppError::TripNotActive(_) => "trip_not_active",
            AppError::TripReadOnly => "trip_read_only",
            AppError::Validation(_) => "validation",
            AppError::Auth { .. } => "auth",
            AppError::Network(_) => "network",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Config(_) | AppError::Io(_) | AppError::Json(_) | AppError::Other(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::NotFound | AppError::StopNotFound | AppError::DocumentNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            AppError::SelectionRequired | AppError::Validation(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::TripNotActive(_) | AppError::TripReadOnly => StatusCode::CONFLICT,
            AppError::Auth { .. } => StatusCode::UNAUTHORIZED,
            AppError::Network(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Network and backend auth failures may succeed on a plain retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::Network(_) | AppError::Auth { .. })
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(FieldErrors::single("body", rejection.body_text()))
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Validation(FieldErrors::single("path", rejection.body_text()))
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation(FieldErrors::single("query", rejection.body_text()))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        // Internal details stay in the log.
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "request failed");
            "something went wrong".to_string()
        } else {
            self.to_string()
        };
        let body = match &self {
            AppError::Validation(fields) => json!({
                "error": self.code(),
                "message": message,
                "fields": fields,
            }),
            _ => json!({ "error": self.code(), "message": message }),
        };

        (status, Json(body)).into_response()
    }
}
