//! DecisionCallbackHandler - button presses on the approval card.

use std::sync::Arc;

use crate::domain::approval::{
    Application, CallbackAction, CallbackPayload, Decision, DecisionAction, MessageRef,
    ReconstructedFields,
};
use crate::domain::foundation::{ApplicationToken, ShortId, Timestamp};
use crate::domain::notification::{
    already_decided_ack, compose_decision, decision_ack, DecisionNotice, MALFORMED_ACK, STALE_ACK,
    UNKNOWN_ACTION_ACK,
};
use crate::ports::{ApplicationRegistry, ChatMessenger, ChatTarget, RegistryError};

/// The card the button was pressed on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackMessage {
    pub message_ref: MessageRef,
    /// Plain rendered text, used to rebuild a lost application.
    pub text: Option<String>,
}

/// A decoded callback query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionCallbackCommand {
    pub callback_id: String,
    pub data: Option<String>,
    /// Display name of the person who pressed the button.
    pub actor: String,
    pub message: Option<CallbackMessage>,
}

/// What happened to the callback. Every outcome has been acknowledged.
#[derive(Debug, Clone, PartialEq)]
pub enum CallbackOutcome {
    Decided(Box<Application>),
    /// A decision existed already; nothing changed.
    AlreadyDecided(Box<Application>),
    /// The short id is unknown or expired.
    Stale,
    Unrecognized(String),
    Malformed,
}

pub struct DecisionCallbackHandler {
    registry: Arc<dyn ApplicationRegistry>,
    messenger: Arc<dyn ChatMessenger>,
}

impl DecisionCallbackHandler {
    pub fn new(registry: Arc<dyn ApplicationRegistry>, messenger: Arc<dyn ChatMessenger>) -> Self {
        Self {
            registry,
            messenger,
        }
    }

    pub async fn handle(&self, cmd: DecisionCallbackCommand) -> CallbackOutcome {
        let (outcome, ack) = self.resolve(&cmd).await;

        if let Err(e) = self.messenger.answer_callback(&cmd.callback_id, &ack).await {
            tracing::warn!(error = %e, callback_id = %cmd.callback_id, "Callback acknowledgment failed");
        }

        outcome
    }

    async fn resolve(&self, cmd: &DecisionCallbackCommand) -> (CallbackOutcome, String) {
        let Some(payload) = cmd.data.as_deref().and_then(CallbackPayload::parse) else {
            tracing::warn!(data = ?cmd.data, "Malformed callback data");
            return (CallbackOutcome::Malformed, MALFORMED_ACK.to_string());
        };

        let action = match payload.action {
            CallbackAction::Decide(action) => action,
            CallbackAction::Unknown(raw) => {
                tracing::warn!(action = %raw, "Unknown callback action");
                return (CallbackOutcome::Unrecognized(raw), UNKNOWN_ACTION_ACK.to_string());
            }
        };

        let stale = || (CallbackOutcome::Stale, STALE_ACK.to_string());

        let Ok(short_id) = ShortId::parse(&payload.short_id) else {
            return stale();
        };
        let token = match self.registry.lookup(&short_id).await {
            Ok(token) => token,
            Err(e) => {
                tracing::info!(short_id = %short_id, reason = %e, "Callback for stale short id");
                return stale();
            }
        };

        if let Err(e) = self.load_or_reconstruct(&token, &short_id, cmd.message.as_ref()).await {
            tracing::error!(error = %e, token = %token, "Application could not be loaded");
            return stale();
        }

        self.decide(&token, action, cmd).await
    }

    async fn decide(
        &self,
        token: &ApplicationToken,
        action: DecisionAction,
        cmd: &DecisionCallbackCommand,
    ) -> (CallbackOutcome, String) {
        let decision = Decision::new(action, cmd.actor.clone(), Timestamp::now());

        match self.registry.transition(token, decision).await {
            Ok(application) => {
                tracing::info!(
                    token = %token,
                    status = %application.status(),
                    decided_by = %cmd.actor,
                    "Application decided"
                );
                let ack = decision_ack(application.category(), application.status());
                self.announce(&application, cmd.message.as_ref().map(|m| m.message_ref))
                    .await;
                (CallbackOutcome::Decided(Box::new(application)), ack)
            }
            Err(RegistryError::AlreadyDecided(application)) => {
                tracing::info!(token = %token, status = %application.status(), "Duplicate decision ignored");
                let ack = already_decided_ack(application.status(), application.decided_by());
                (CallbackOutcome::AlreadyDecided(application), ack)
            }
            Err(e) => {
                tracing::error!(error = %e, token = %token, "Decision could not be applied");
                (CallbackOutcome::Stale, STALE_ACK.to_string())
            }
        }
    }

    /// Returns the stored application, rebuilding it from the card text when
    /// the record is gone.
    async fn load_or_reconstruct(
        &self,
        token: &ApplicationToken,
        short_id: &ShortId,
        message: Option<&CallbackMessage>,
    ) -> Result<Application, RegistryError> {
        match self.registry.get(token).await {
            Err(RegistryError::NotFound(_)) => {
                let text = message.and_then(|m| m.text.as_deref()).unwrap_or_default();
                let fields = ReconstructedFields::parse(text);
                tracing::warn!(
                    token = %token,
                    company = %fields.company_name,
                    "Application record missing, reconstructing from message text"
                );
                let shell = Application::reconstructed(
                    token.clone(),
                    short_id.clone(),
                    fields,
                    message.map(|m| m.message_ref),
                    Timestamp::now(),
                );
                self.registry.restore(shell).await
            }
            other => other,
        }
    }

    /// Replaces the request card and broadcasts the decision. Failures are
    /// logged only.
    async fn announce(&self, application: &Application, pressed_on: Option<MessageRef>) {
        let Some(notice) = DecisionNotice::from_application(application) else {
            return;
        };
        let message = compose_decision(&notice);

        if let Some(card) = application.request_message().or(pressed_on) {
            if let Err(e) = self.messenger.edit_message(card, &message).await {
                tracing::warn!(error = %e, token = %application.token(), "Approval card not updated");
            }
        }

        if let Err(e) = self
            .messenger
            .send_message(ChatTarget::BroadcastChannel, &message)
            .await
        {
            tracing::warn!(error = %e, token = %application.token(), "Decision broadcast failed");
        }
    }
}
