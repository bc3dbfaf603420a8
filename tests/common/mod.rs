//! Port doubles shared by the integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;

use nda_approval::adapters::extraction::CompositeTextExtractor;
use nda_approval::adapters::registry::InMemoryApplicationRegistry;
use nda_approval::adapters::storage::LocalArtifactStorage;
use nda_approval::application::{
    AnalyzeDocumentHandler, DecisionCallbackHandler, IntakeDocumentHandler, RouteVerdictHandler,
};
use nda_approval::domain::approval::MessageRef;
use nda_approval::domain::notification::ComposedMessage;
use nda_approval::domain::verdict::AnalysisVerdict;
use nda_approval::ports::{
    AnalysisError, AnalysisRequest, AnalysisService, BotDiagnostics, ChatMessenger, ChatTarget,
    MessengerError,
};

// =============================================================================
// Test Infrastructure
// =============================================================================

/// Messenger that records sends, edits and acknowledgments.
#[derive(Default)]
pub struct MockMessenger {
    pub sent: Mutex<Vec<(ChatTarget, ComposedMessage)>>,
    pub edits: Mutex<Vec<(MessageRef, ComposedMessage)>>,
    pub answers: Mutex<Vec<(String, String)>>,
    next_id: AtomicI64,
}

impl MockMessenger {
    pub fn sent_to(&self, target: ChatTarget) -> Vec<ComposedMessage> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|(t, _)| *t == target)
            .map(|(_, m)| m.clone())
            .collect()
    }

    pub fn answers(&self) -> Vec<String> {
        self.answers
            .lock()
            .unwrap()
            .iter()
            .map(|(_, text)| text.clone())
            .collect()
    }
}

#[async_trait]
impl ChatMessenger for MockMessenger {
    async fn send_message(
        &self,
        target: ChatTarget,
        message: &ComposedMessage,
    ) -> Result<MessageRef, MessengerError> {
        self.sent.lock().unwrap().push((target, message.clone()));
        Ok(MessageRef {
            chat_id: -100,
            message_id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
        })
    }

    async fn edit_message(
        &self,
        message_ref: MessageRef,
        message: &ComposedMessage,
    ) -> Result<(), MessengerError> {
        self.edits.lock().unwrap().push((message_ref, message.clone()));
        Ok(())
    }

    async fn answer_callback(&self, callback_id: &str, text: &str) -> Result<(), MessengerError> {
        self.answers
            .lock()
            .unwrap()
            .push((callback_id.to_string(), text.to_string()));
        Ok(())
    }

    async fn diagnostics(&self) -> Result<BotDiagnostics, MessengerError> {
        Ok(BotDiagnostics {
            bot: json!({"username": "mock_bot"}),
            webhook: json!({}),
            chat_id: Some("-100".to_string()),
            channel_id: Some("-200".to_string()),
        })
    }
}

/// Analysis service that always answers with one verdict.
pub struct MockAnalysis {
    verdict: AnalysisVerdict,
    pub requests: Mutex<Vec<AnalysisRequest>>,
}

impl MockAnalysis {
    pub fn new(verdict: AnalysisVerdict) -> Self {
        Self {
            verdict,
            requests: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl AnalysisService for MockAnalysis {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisVerdict, AnalysisError> {
        self.requests.lock().unwrap().push(request.clone());
        Ok(self.verdict.clone())
    }
}

/// Fully wired workflow over in-memory and temp-dir adapters.
pub struct Workflow {
    pub intake: Arc<IntakeDocumentHandler>,
    pub router: Arc<RouteVerdictHandler>,
    pub callbacks: Arc<DecisionCallbackHandler>,
    pub storage: Arc<LocalArtifactStorage>,
    pub registry: Arc<InMemoryApplicationRegistry>,
    pub messenger: Arc<MockMessenger>,
    pub analysis: Arc<MockAnalysis>,
    pub dir: tempfile::TempDir,
}

impl Workflow {
    pub fn new(verdict: AnalysisVerdict) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let storage = Arc::new(
            LocalArtifactStorage::new(dir.path())
                .with_public_base_url(Some("https://nda.example.com".to_string())),
        );
        let registry = Arc::new(InMemoryApplicationRegistry::default());
        let messenger = Arc::new(MockMessenger::default());
        let analysis = Arc::new(MockAnalysis::new(verdict));

        let analyzer = Arc::new(AnalyzeDocumentHandler::new(
            Arc::new(CompositeTextExtractor::default()),
            analysis.clone(),
        ));
        let router = Arc::new(RouteVerdictHandler::new(registry.clone(), messenger.clone()));
        let intake = Arc::new(IntakeDocumentHandler::new(
            storage.clone(),
            analyzer,
            router.clone(),
        ));
        let callbacks = Arc::new(DecisionCallbackHandler::new(
            registry.clone(),
            messenger.clone(),
        ));

        Self {
            intake,
            router,
            callbacks,
            storage,
            registry,
            messenger,
            analysis,
            dir,
        }
    }
}
