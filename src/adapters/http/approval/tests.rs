use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use secrecy::Secret;
use serde_json::{json, Value};
use tower::ServiceExt;

use super::{approval_router, ApprovalAppState, SECRET_TOKEN_HEADER};
use crate::adapters::extraction::CompositeTextExtractor;
use crate::adapters::registry::InMemoryApplicationRegistry;
use crate::adapters::storage::LocalArtifactStorage;
use crate::application::handlers::test_support::{RecordingMessenger, ScriptedAnalysis};
use crate::application::{
    AnalyzeDocumentHandler, DecisionCallbackHandler, IntakeDocumentHandler, RouteVerdictCommand,
    RouteVerdictHandler,
};
use crate::domain::approval::ApprovalStatus;
use crate::domain::verdict::AnalysisVerdict;
use crate::ports::{ApplicationRegistry, ArtifactStorage, ChatTarget};

const BOUNDARY: &str = "X-NDA-BOUNDARY";

struct TestApp {
    state: ApprovalAppState,
    registry: Arc<InMemoryApplicationRegistry>,
    messenger: Arc<RecordingMessenger>,
    storage: Arc<LocalArtifactStorage>,
    _dir: tempfile::TempDir,
}

impl TestApp {
    fn new(verdict: AnalysisVerdict) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let storage = Arc::new(
            LocalArtifactStorage::new(dir.path())
                .with_public_base_url(Some("https://nda.example.com".to_string())),
        );
        let registry = Arc::new(InMemoryApplicationRegistry::default());
        let messenger = Arc::new(RecordingMessenger::default());

        let analyzer = Arc::new(AnalyzeDocumentHandler::new(
            Arc::new(CompositeTextExtractor::default()),
            Arc::new(ScriptedAnalysis::returning(verdict)),
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

        let state = ApprovalAppState {
            intake,
            router,
            callbacks,
            storage: storage.clone(),
            messenger: messenger.clone(),
            webhook_secret: None,
            expose_error_details: false,
            max_upload_bytes: 1024 * 1024,
        };

        Self {
            state,
            registry,
            messenger,
            storage,
            _dir: dir,
        }
    }

    fn with_webhook_secret(mut self, secret: &str) -> Self {
        self.state.webhook_secret = Some(Secret::new(secret.to_string()));
        self
    }

    fn app(&self) -> Router {
        approval_router(self.state.clone())
    }
}

fn multipart_body(parts: &[(&str, Option<(&str, &str)>, &str)]) -> String {
    let mut body = String::new();
    for (name, file, value) in parts {
        body.push_str(&format!("--{}\r\n", BOUNDARY));
        match file {
            Some((filename, mime)) => body.push_str(&format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                name, filename, mime
            )),
            None => body.push_str(&format!(
                "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
                name
            )),
        }
        body.push_str(value);
        body.push_str("\r\n");
    }
    body.push_str(&format!("--{}--\r\n", BOUNDARY));
    body
}

fn upload_request(body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/analyze-nda")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

fn json_request(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn read_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

const CONTRACT_TEXT: &str = "Договор поставки оборудования между сторонами";

#[tokio::test]
async fn health_returns_ok() {
    let t = TestApp::new(AnalysisVerdict::new("approve"));
    let response = t
        .app()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await, json!({"status": "ok"}));
}

#[tokio::test]
async fn uploaded_contract_is_sent_for_approval() {
    let t = TestApp::new(AnalysisVerdict::new("approve").with_document_type("contract"));
    let body = multipart_body(&[
        ("file", Some(("supply.txt", "text/plain")), CONTRACT_TEXT),
        ("responsible", None, "Ivanova"),
        ("companyName", None, "Acme LLC"),
        ("comment", None, "Срочно"),
    ]);

    let response = t.app().oneshot(upload_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = read_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["documentCategory"], "contract");
    assert_eq!(json["approval"]["routing"], "manual_approval");
    assert_eq!(json["approval"]["status"], "pending_approval");
    assert!(json["approval"]["shortId"].is_string());
    assert_eq!(json["extraction"]["method"], "plain_text");
    assert!(json["file"]["downloadUrl"]
        .as_str()
        .unwrap()
        .starts_with("https://nda.example.com/api/download/"));

    assert_eq!(t.registry.application_count().await, 1);
    assert_eq!(t.messenger.sent()[0].0, ChatTarget::ApprovalChat);
}

#[tokio::test]
async fn legacy_inn_field_is_accepted_and_nda_auto_approved() {
    let t = TestApp::new(AnalysisVerdict::new("approve").with_document_type("nda"));
    let body = multipart_body(&[
        ("file", Some(("nda.txt", "text/plain")), "Соглашение о неразглашении информации"),
        ("inn", None, "Ivanova"),
        ("companyName", None, "Acme LLC"),
    ]);

    let response = t.app().oneshot(upload_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = read_json(response).await;
    assert_eq!(json["approval"]["routing"], "auto_approve");
    assert_eq!(json["approval"]["decidedBy"], "AI");
    assert_eq!(t.registry.application_count().await, 0);
    assert_eq!(t.messenger.sent()[0].0, ChatTarget::BroadcastChannel);
}

#[tokio::test]
async fn upload_without_file_is_a_validation_error() {
    let t = TestApp::new(AnalysisVerdict::new("approve"));
    let body = multipart_body(&[
        ("responsible", None, "Ivanova"),
        ("companyName", None, "Acme LLC"),
    ]);

    let response = t.app().oneshot(upload_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = read_json(response).await;
    assert_eq!(json["error_code"], "VALIDATION_FAILED");
    assert_eq!(json["message"], "Файл не загружен");
}

#[tokio::test]
async fn short_text_is_unprocessable_without_details() {
    let t = TestApp::new(AnalysisVerdict::new("approve"));
    let body = multipart_body(&[
        ("file", Some(("a.txt", "text/plain")), "short"),
        ("responsible", None, "Ivanova"),
        ("companyName", None, "Acme LLC"),
    ]);

    let response = t.app().oneshot(upload_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = read_json(response).await;
    assert_eq!(json["error_code"], "EMPTY_EXTRACTION");
    assert!(json.get("details").is_none());
}

#[tokio::test]
async fn oversized_upload_is_rejected() {
    let mut t = TestApp::new(AnalysisVerdict::new("approve"));
    t.state.max_upload_bytes = 16;
    let body = multipart_body(&[
        ("file", Some(("big.txt", "text/plain")), CONTRACT_TEXT),
        ("responsible", None, "Ivanova"),
        ("companyName", None, "Acme LLC"),
    ]);

    let response = t.app().oneshot(upload_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(read_json(response).await["error_code"], "PAYLOAD_TOO_LARGE");
}

#[tokio::test]
async fn malformed_verdict_in_approval_request_falls_back_to_manual_review() {
    let t = TestApp::new(AnalysisVerdict::new("approve"));
    let request = json_request(
        "/api/send-approval-request",
        json!({
            "responsible": "Ivanova",
            "companyName": "Acme LLC",
            "analysis": "not an object",
            "filename": "nda.pdf"
        }),
    );

    let response = t.app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = read_json(response).await;
    assert_eq!(json["approval"]["routing"], "manual_approval");
    assert_eq!(t.registry.application_count().await, 1);
}

#[tokio::test]
async fn approval_request_without_company_is_rejected() {
    let t = TestApp::new(AnalysisVerdict::new("approve"));
    let request = json_request(
        "/api/send-approval-request",
        json!({
            "responsible": "Ivanova",
            "analysis": {"status": "approve", "documentType": "nda"},
            "filename": "nda.pdf"
        }),
    );

    let response = t.app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(t.messenger.sent().is_empty());
}

async fn pending_application(t: &TestApp) -> crate::domain::approval::Application {
    let outcome = t
        .state
        .router
        .handle(RouteVerdictCommand {
            company_name: "Acme LLC".to_string(),
            responsible: "Ivanova".to_string(),
            filename: "supply.pdf".to_string(),
            analysis: AnalysisVerdict::new("approve").with_document_type("contract"),
            comment: None,
            download_url: None,
        })
        .await
        .unwrap();
    outcome.application().unwrap().clone()
}

fn callback_update(data: &str) -> Value {
    json!({
        "update_id": 7,
        "callback_query": {
            "id": "cb-1",
            "from": {"id": 42, "first_name": "Petr", "last_name": "Sidorov"},
            "message": {"message_id": 1, "chat": {"id": -1001}, "text": "Заявка"},
            "data": data
        }
    })
}

#[tokio::test]
async fn approve_button_press_decides_the_application() {
    let t = TestApp::new(AnalysisVerdict::new("approve"));
    let app = pending_application(&t).await;

    let request = json_request(
        "/api/telegram-webhook",
        callback_update(&format!("approve_{}", app.short_id())),
    );
    let response = t.app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await, json!({"ok": true}));

    let decided = t.registry.get(app.token()).await.unwrap();
    assert_eq!(decided.status(), ApprovalStatus::Approved);
    assert_eq!(decided.decided_by(), Some("Petr Sidorov"));
    assert_eq!(t.messenger.answers()[0].0, "cb-1");
}

#[tokio::test]
async fn unparseable_update_is_still_acknowledged() {
    let t = TestApp::new(AnalysisVerdict::new("approve"));
    let request = Request::builder()
        .method("POST")
        .uri("/api/telegram-webhook")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{ not json"))
        .unwrap();

    let response = t.app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await, json!({"ok": true}));
    assert!(t.messenger.answers().is_empty());
}

#[tokio::test]
async fn webhook_secret_is_enforced_when_configured() {
    let t = TestApp::new(AnalysisVerdict::new("approve")).with_webhook_secret("s3cret");
    let app = pending_application(&t).await;
    let update = callback_update(&format!("reject_{}", app.short_id()));

    let mut wrong = json_request("/api/telegram-webhook", update.clone());
    wrong
        .headers_mut()
        .insert(SECRET_TOKEN_HEADER, "guess".parse().unwrap());
    let response = t.app().oneshot(wrong).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        t.registry.get(app.token()).await.unwrap().status(),
        ApprovalStatus::PendingApproval
    );

    let mut right = json_request("/api/telegram-webhook", update);
    right
        .headers_mut()
        .insert(SECRET_TOKEN_HEADER, "s3cret".parse().unwrap());
    let response = t.app().oneshot(right).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        t.registry.get(app.token()).await.unwrap().status(),
        ApprovalStatus::Rejected
    );
}

#[tokio::test]
async fn stored_upload_can_be_downloaded() {
    let t = TestApp::new(AnalysisVerdict::new("approve"));
    let stored = t.storage.store("nda.pdf", b"%PDF-1.4 body").await.unwrap();

    let response = t
        .app()
        .oneshot(
            Request::builder()
                .uri(format!("/api/download/{}", stored.key))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"%PDF-1.4 body");
}

#[tokio::test]
async fn missing_download_is_not_found() {
    let t = TestApp::new(AnalysisVerdict::new("approve"));
    let response = t
        .app()
        .oneshot(
            Request::builder()
                .uri("/api/download/missing.pdf")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(read_json(response).await["message"], "Файл не найден");
}

#[tokio::test]
async fn diagnostics_report_the_bot() {
    let t = TestApp::new(AnalysisVerdict::new("approve"));
    let response = t
        .app()
        .oneshot(
            Request::builder()
                .uri("/api/test-telegram")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = read_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["bot"]["username"], "test_bot");
    assert_eq!(json["chatId"], "-1001");
}
