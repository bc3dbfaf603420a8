//! Hand-written port doubles shared by handler tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::json;

use crate::domain::approval::MessageRef;
use crate::domain::notification::ComposedMessage;
use crate::domain::verdict::AnalysisVerdict;
use crate::ports::{
    AnalysisError, AnalysisRequest, AnalysisService, BotDiagnostics, ChatMessenger, ChatTarget,
    MessengerError,
};

/// Messenger that records every call.
#[derive(Default)]
pub struct RecordingMessenger {
    sent: Mutex<Vec<(ChatTarget, ComposedMessage)>>,
    edits: Mutex<Vec<(MessageRef, ComposedMessage)>>,
    answers: Mutex<Vec<(String, String)>>,
    next_message_id: AtomicI64,
    fail_broadcast: bool,
    fail_requests: bool,
    unconfigured: bool,
}

impl RecordingMessenger {
    pub fn failing_broadcast() -> Self {
        Self {
            fail_broadcast: true,
            ..Self::default()
        }
    }

    pub fn failing_requests() -> Self {
        Self {
            fail_requests: true,
            ..Self::default()
        }
    }

    /// Reports every target as not configured.
    pub fn unconfigured() -> Self {
        Self {
            unconfigured: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<(ChatTarget, ComposedMessage)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn edits(&self) -> Vec<(MessageRef, ComposedMessage)> {
        self.edits.lock().unwrap().clone()
    }

    pub fn answers(&self) -> Vec<(String, String)> {
        self.answers.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatMessenger for RecordingMessenger {
    fn ensure_configured(&self, _target: ChatTarget) -> Result<(), MessengerError> {
        if self.unconfigured {
            return Err(MessengerError::NotConfigured("bot token is not set".to_string()));
        }
        Ok(())
    }

    async fn send_message(
        &self,
        target: ChatTarget,
        message: &ComposedMessage,
    ) -> Result<MessageRef, MessengerError> {
        let fail = match target {
            ChatTarget::BroadcastChannel => self.fail_broadcast,
            ChatTarget::ApprovalChat => self.fail_requests,
        };
        if fail {
            return Err(MessengerError::Api {
                error_code: Some(400),
                description: "Bad Request: chat not found".to_string(),
            });
        }
        self.sent.lock().unwrap().push((target, message.clone()));
        Ok(MessageRef {
            chat_id: -1001,
            message_id: self.next_message_id.fetch_add(1, Ordering::SeqCst) + 1,
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
            bot: json!({"username": "test_bot"}),
            webhook: json!({"url": ""}),
            chat_id: Some("-1001".to_string()),
            channel_id: None,
        })
    }
}

/// Analysis service that replays scripted answers and records requests.
///
/// The last scripted answer repeats once the script runs out.
pub struct ScriptedAnalysis {
    script: Mutex<VecDeque<Result<AnalysisVerdict, AnalysisError>>>,
    last: Mutex<Option<Result<AnalysisVerdict, AnalysisError>>>,
    requests: Mutex<Vec<AnalysisRequest>>,
}

impl ScriptedAnalysis {
    pub fn new(script: Vec<Result<AnalysisVerdict, AnalysisError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            last: Mutex::new(None),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn returning(verdict: AnalysisVerdict) -> Self {
        Self::new(vec![Ok(verdict)])
    }

    pub fn failing(error: AnalysisError) -> Self {
        Self::new(vec![Err(error)])
    }

    pub fn requests(&self) -> Vec<AnalysisRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl AnalysisService for ScriptedAnalysis {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisVerdict, AnalysisError> {
        self.requests.lock().unwrap().push(request.clone());
        let next = self.script.lock().unwrap().pop_front();
        let mut last = self.last.lock().unwrap();
        if let Some(answer) = next {
            *last = Some(answer);
        }
        last.clone().unwrap_or(Err(AnalysisError::NotConfigured))
    }
}
