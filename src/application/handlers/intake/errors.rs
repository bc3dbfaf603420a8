//! Intake workflow errors.

use thiserror::Error;

use crate::domain::document::ExtractionError;
use crate::domain::foundation::{ErrorCode, ValidationError};
use crate::ports::{AnalysisError, MessengerError, RegistryError};

/// Failures that reject an intake or routing request.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IntakeError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// The approval request could not be delivered to the approval chat.
    #[error("approval request delivery failed: {0}")]
    Delivery(#[from] MessengerError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl IntakeError {
    pub fn code(&self) -> ErrorCode {
        match self {
            IntakeError::Validation(_) => ErrorCode::ValidationFailed,
            IntakeError::Extraction(e) => e.code(),
            IntakeError::Analysis(e) => e.code(),
            IntakeError::Registry(e) => e.code(),
            IntakeError::Delivery(e) => e.code(),
            IntakeError::Internal(_) => ErrorCode::InternalError,
        }
    }

    /// Human-readable reason for the submitter.
    pub fn user_message(&self) -> String {
        match self {
            IntakeError::Validation(e) => format!("Некорректные данные заявки: {}", e),
            IntakeError::Extraction(e) => e.user_message().to_string(),
            IntakeError::Analysis(AnalysisError::NotConfigured) => {
                "Сервис анализа документов не настроен".to_string()
            }
            IntakeError::Analysis(_) => "Ошибка при анализе документа".to_string(),
            IntakeError::Delivery(MessengerError::NotConfigured(_)) => {
                "Telegram бот не настроен".to_string()
            }
            IntakeError::Delivery(_) => "Не удалось отправить заявку на согласование".to_string(),
            IntakeError::Registry(_) | IntakeError::Internal(_) => {
                "Внутренняя ошибка сервера".to_string()
            }
        }
    }
}
