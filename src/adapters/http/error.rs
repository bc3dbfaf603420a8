//! API error type shared by the HTTP handlers.
//!
//! Maps workflow and collaborator errors to status codes and the
//! `ErrorResponse` body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::application::IntakeError;
use crate::domain::foundation::ErrorCode;
use crate::ports::{AnalysisError, MessengerError, StorageError};

/// Error body returned by every endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorResponse {
    /// Stable machine-readable code, e.g. `NOT_A_PDF`.
    pub error_code: String,
    /// Human-readable message for the submitter.
    pub message: String,
    /// Internal detail, only outside production or with verbose errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Error returned by HTTP handlers.
#[derive(Debug, Clone)]
pub struct ApiError {
    status: StatusCode,
    code: ErrorCode,
    message: String,
    details: Option<String>,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            status: status_for(code),
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationFailed, message)
    }

    pub fn file_not_found() -> Self {
        Self::new(ErrorCode::ApplicationNotFound, "Файл не найден")
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Drops the internal detail unless `expose` is set.
    pub fn redact(mut self, expose: bool) -> Self {
        if !expose {
            self.details = None;
        }
        self
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn body(&self) -> ErrorResponse {
        ErrorResponse {
            error_code: self.code.to_string(),
            message: self.message.clone(),
            details: self.details.clone(),
        }
    }
}

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::ValidationFailed => StatusCode::BAD_REQUEST,
        ErrorCode::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
        ErrorCode::UnsupportedFormat => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        ErrorCode::NotAPdf | ErrorCode::CorruptDocument | ErrorCode::EmptyExtraction => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        ErrorCode::NotConfigured => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::UpstreamAnalysisFailed | ErrorCode::MessengerFailed => StatusCode::BAD_GATEWAY,
        ErrorCode::ApplicationNotFound => StatusCode::NOT_FOUND,
        ErrorCode::AlreadyDecided => StatusCode::CONFLICT,
        ErrorCode::StorageFailed | ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<IntakeError> for ApiError {
    fn from(err: IntakeError) -> Self {
        let timed_out = matches!(
            err,
            IntakeError::Analysis(AnalysisError::Timeout { .. })
                | IntakeError::Delivery(MessengerError::Timeout)
        );
        let api = Self::new(err.code(), err.user_message()).with_details(err.to_string());
        if timed_out {
            api.with_status(StatusCode::GATEWAY_TIMEOUT)
        } else {
            api
        }
    }
}

impl From<MessengerError> for ApiError {
    fn from(err: MessengerError) -> Self {
        let message = match &err {
            MessengerError::NotConfigured(_) => "Telegram бот не настроен",
            _ => "Ошибка при обращении к Telegram",
        };
        Self::new(err.code(), message).with_details(err.to_string())
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(_) | StorageError::InvalidKey(_) => Self::file_not_found(),
            StorageError::Io(e) => {
                Self::new(ErrorCode::StorageFailed, "Ошибка чтения файла").with_details(e)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body())).into_response()
    }
}
