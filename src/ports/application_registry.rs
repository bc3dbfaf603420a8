//! Application Registry Port - the only owner of application state.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::approval::{Application, Decision, MessageRef, NewApplication};
use crate::domain::foundation::{ApplicationToken, ErrorCode, ShortId, Timestamp, ValidationError};

/// Port for storing applications and correlating callbacks.
///
/// # Contract
///
/// Implementations must:
/// - Generate a fresh token and a unique short id on `create`
/// - Resolve short ids by exact match only, treating entries past the
///   retention window as absent
/// - Serialize `transition` per token so the first decision wins
/// - Never drop applications in `purge_expired`; only short-id entries go
#[async_trait]
pub trait ApplicationRegistry: Send + Sync {
    /// Stores a new pending application.
    async fn create(&self, input: NewApplication) -> Result<Application, RegistryError>;

    async fn get(&self, token: &ApplicationToken) -> Result<Application, RegistryError>;

    /// Resolves a callback short id to its token.
    async fn lookup(&self, short_id: &ShortId) -> Result<ApplicationToken, RegistryError>;

    /// Inserts a reconstructed shell unless a record already exists.
    ///
    /// Returns whichever record is stored afterwards.
    async fn restore(&self, application: Application) -> Result<Application, RegistryError>;

    /// Applies a decision. A second decision gets `AlreadyDecided`.
    async fn transition(
        &self,
        token: &ApplicationToken,
        decision: Decision,
    ) -> Result<Application, RegistryError>;

    async fn attach_request_message(
        &self,
        token: &ApplicationToken,
        message: MessageRef,
    ) -> Result<(), RegistryError>;

    /// Removes a pending application and its short id.
    ///
    /// Used when its approval request never reached the chat. Decided
    /// applications are kept; the call then returns `AlreadyDecided`.
    async fn discard(&self, token: &ApplicationToken) -> Result<(), RegistryError>;

    /// Drops short-id entries older than the retention window.
    ///
    /// Returns the number of entries removed.
    async fn purge_expired(&self, now: Timestamp) -> usize;
}

/// Registry failures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegistryError {
    #[error("application not found: {0}")]
    NotFound(ApplicationToken),

    /// The short id is unknown or expired.
    #[error("no application for short id {0}")]
    UnknownShortId(String),

    #[error("could not allocate a unique short id after {attempts} attempts")]
    IdentifierSpaceExhausted { attempts: u32 },

    /// The application was decided earlier; carries the winning record.
    #[error("application already decided")]
    AlreadyDecided(Box<Application>),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl RegistryError {
    pub fn code(&self) -> ErrorCode {
        match self {
            RegistryError::NotFound(_) | RegistryError::UnknownShortId(_) => {
                ErrorCode::ApplicationNotFound
            }
            RegistryError::IdentifierSpaceExhausted { .. } => ErrorCode::InternalError,
            RegistryError::AlreadyDecided(_) => ErrorCode::AlreadyDecided,
            RegistryError::Validation(_) => ErrorCode::ValidationFailed,
        }
    }
}
