//! RouteVerdictHandler - applies the auto-approval policy to a verdict.

use std::sync::Arc;

use serde::Serialize;

use super::IntakeError;
use crate::domain::approval::{
    Application, ApprovalStatus, AutoApprovalPolicy, NewApplication, Routing, AI_ACTOR,
};
use crate::domain::document::DocumentCategory;
use crate::domain::foundation::Timestamp;
use crate::domain::notification::{compose_approval_request, compose_decision, DecisionNotice};
use crate::domain::verdict::AnalysisVerdict;
use crate::ports::{ApplicationRegistry, ChatMessenger, ChatTarget};

/// Command to route a verdict produced by the analysis service.
#[derive(Debug, Clone)]
pub struct RouteVerdictCommand {
    pub company_name: String,
    pub responsible: String,
    pub filename: String,
    pub analysis: AnalysisVerdict,
    pub comment: Option<String>,
    pub download_url: Option<String>,
}

/// Where the verdict went.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "routing", rename_all = "snake_case")]
pub enum RoutingOutcome {
    /// Approved without a human. No application exists.
    AutoApproved {
        category: DocumentCategory,
        decided_at: Timestamp,
        broadcast_delivered: bool,
    },
    /// Waiting in the approval chat.
    ApprovalRequested {
        category: DocumentCategory,
        #[serde(skip)]
        application: Box<Application>,
    },
}

impl RoutingOutcome {
    pub fn routing(&self) -> Routing {
        match self {
            RoutingOutcome::AutoApproved { .. } => Routing::AutoApprove,
            RoutingOutcome::ApprovalRequested { .. } => Routing::ManualApproval,
        }
    }

    pub fn application(&self) -> Option<&Application> {
        match self {
            RoutingOutcome::ApprovalRequested { application, .. } => Some(application),
            RoutingOutcome::AutoApproved { .. } => None,
        }
    }
}

pub struct RouteVerdictHandler {
    registry: Arc<dyn ApplicationRegistry>,
    messenger: Arc<dyn ChatMessenger>,
    policy: AutoApprovalPolicy,
}

impl RouteVerdictHandler {
    pub fn new(registry: Arc<dyn ApplicationRegistry>, messenger: Arc<dyn ChatMessenger>) -> Self {
        Self {
            registry,
            messenger,
            policy: AutoApprovalPolicy,
        }
    }

    pub async fn handle(&self, cmd: RouteVerdictCommand) -> Result<RoutingOutcome, IntakeError> {
        let input = NewApplication {
            company_name: cmd.company_name,
            responsible: cmd.responsible,
            filename: cmd.filename,
            analysis: cmd.analysis,
            comment: cmd.comment,
            download_url: cmd.download_url,
        }
        .validate()?;

        let category = DocumentCategory::classify(&input.analysis, &input.filename);
        let routing = self.policy.evaluate(category, input.analysis.normalized_status());

        match routing {
            Routing::AutoApprove => Ok(self.auto_approve(category, &input).await),
            Routing::ManualApproval => self.request_approval(category, input).await,
        }
    }

    /// Broadcasts the unattended approval. Delivery failure is logged only.
    async fn auto_approve(&self, category: DocumentCategory, input: &NewApplication) -> RoutingOutcome {
        let decided_at = Timestamp::now();
        let notice = DecisionNotice {
            company_name: &input.company_name,
            responsible: &input.responsible,
            filename: &input.filename,
            analysis: &input.analysis,
            comment: input.comment.as_deref(),
            download_url: input.download_url.as_deref(),
            outcome: ApprovalStatus::Approved,
            decided_by: AI_ACTOR,
            decided_at,
            automatic: true,
        };
        let message = compose_decision(&notice);

        let broadcast_delivered = match self
            .messenger
            .send_message(ChatTarget::BroadcastChannel, &message)
            .await
        {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(error = %e, filename = %input.filename, "Auto-approval broadcast failed");
                false
            }
        };

        tracing::info!(
            category = %category,
            company = %input.company_name,
            filename = %input.filename,
            "Document auto-approved"
        );

        RoutingOutcome::AutoApproved {
            category,
            decided_at,
            broadcast_delivered,
        }
    }

    async fn request_approval(
        &self,
        category: DocumentCategory,
        input: NewApplication,
    ) -> Result<RoutingOutcome, IntakeError> {
        self.messenger.ensure_configured(ChatTarget::ApprovalChat)?;

        let application = self.registry.create(input).await?;
        let message = compose_approval_request(&application);

        let message_ref = match self
            .messenger
            .send_message(ChatTarget::ApprovalChat, &message)
            .await
        {
            Ok(message_ref) => message_ref,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    token = %application.token(),
                    "Approval request could not be delivered"
                );
                // Nobody can press buttons on a card that was never sent.
                if let Err(discard) = self.registry.discard(application.token()).await {
                    tracing::warn!(error = %discard, token = %application.token(), "Undelivered application not discarded");
                }
                return Err(IntakeError::Delivery(e));
            }
        };

        self.registry
            .attach_request_message(application.token(), message_ref)
            .await?;
        let application = self.registry.get(application.token()).await?;

        tracing::info!(
            token = %application.token(),
            short_id = %application.short_id(),
            category = %category,
            "Approval requested"
        );

        Ok(RoutingOutcome::ApprovalRequested {
            category,
            application: Box::new(application),
        })
    }
}
