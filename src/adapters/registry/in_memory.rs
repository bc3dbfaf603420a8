//! In-Memory Application Registry Adapter
//!
//! Holds every application for the lifetime of the process, plus the
//! short-id index used to correlate button presses. Each application sits
//! behind its own mutex so decisions on one token are serialized while
//! other tokens proceed in parallel.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};

use crate::domain::approval::{Application, ApprovalError, Decision, MessageRef, NewApplication};
use crate::domain::foundation::{ApplicationToken, ShortId, StateMachine, Timestamp};
use crate::ports::{ApplicationRegistry, RegistryError};

/// Attempts made to find an unused short id before giving up.
pub const MAX_SHORT_ID_ATTEMPTS: u32 = 8;

type ShortIdSource = Arc<dyn Fn() -> ShortId + Send + Sync>;

#[derive(Debug, Clone)]
struct ShortIdEntry {
    token: ApplicationToken,
    created_at: Timestamp,
}

/// In-memory registry with per-application locking
#[derive(Clone)]
pub struct InMemoryApplicationRegistry {
    applications: Arc<RwLock<HashMap<ApplicationToken, Arc<Mutex<Application>>>>>,
    short_ids: Arc<RwLock<HashMap<ShortId, ShortIdEntry>>>,
    retention: chrono::Duration,
    short_id_source: ShortIdSource,
}

impl InMemoryApplicationRegistry {
    /// Create a registry whose short ids stay routable for `retention`
    pub fn new(retention: Duration) -> Self {
        Self {
            applications: Arc::new(RwLock::new(HashMap::new())),
            short_ids: Arc::new(RwLock::new(HashMap::new())),
            retention: chrono::Duration::from_std(retention)
                .unwrap_or_else(|_| chrono::Duration::days(365 * 100)),
            short_id_source: Arc::new(ShortId::generate),
        }
    }

    /// Replace the short id generator (used to exercise collisions)
    pub fn with_short_id_source<F>(mut self, source: F) -> Self
    where
        F: Fn() -> ShortId + Send + Sync + 'static,
    {
        self.short_id_source = Arc::new(source);
        self
    }

    /// Get the number of stored applications
    pub async fn application_count(&self) -> usize {
        self.applications.read().await.len()
    }

    /// Get the number of short ids still indexed (expired or not)
    pub async fn short_id_count(&self) -> usize {
        self.short_ids.read().await.len()
    }

    fn is_expired(&self, entry: &ShortIdEntry, now: Timestamp) -> bool {
        now.duration_since(&entry.created_at) >= self.retention
    }

    async fn slot(&self, token: &ApplicationToken) -> Result<Arc<Mutex<Application>>, RegistryError> {
        self.applications
            .read()
            .await
            .get(token)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound(token.clone()))
    }
}

impl Default for InMemoryApplicationRegistry {
    fn default() -> Self {
        Self::new(Duration::from_secs(24 * 3600))
    }
}

impl std::fmt::Debug for InMemoryApplicationRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryApplicationRegistry")
            .field("retention", &self.retention)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ApplicationRegistry for InMemoryApplicationRegistry {
    async fn create(&self, input: NewApplication) -> Result<Application, RegistryError> {
        let input = input.validate()?;
        let now = Timestamp::now();

        // Held until the application is inserted so a resolvable short id
        // always has a record behind it.
        let mut short_ids = self.short_ids.write().await;

        let mut short_id = None;
        for _ in 0..MAX_SHORT_ID_ATTEMPTS {
            let candidate = (self.short_id_source)();
            if !short_ids.contains_key(&candidate) {
                short_id = Some(candidate);
                break;
            }
            tracing::debug!(short_id = %candidate, "Short id collision, retrying");
        }
        let short_id = short_id.ok_or(RegistryError::IdentifierSpaceExhausted {
            attempts: MAX_SHORT_ID_ATTEMPTS,
        })?;

        let token = ApplicationToken::generate();
        let application = Application::create(token.clone(), short_id.clone(), input, now);

        self.applications
            .write()
            .await
            .insert(token.clone(), Arc::new(Mutex::new(application.clone())));
        short_ids.insert(short_id, ShortIdEntry { token, created_at: now });

        Ok(application)
    }

    async fn get(&self, token: &ApplicationToken) -> Result<Application, RegistryError> {
        let slot = self.slot(token).await?;
        let application = slot.lock().await.clone();
        Ok(application)
    }

    async fn lookup(&self, short_id: &ShortId) -> Result<ApplicationToken, RegistryError> {
        let short_ids = self.short_ids.read().await;
        match short_ids.get(short_id) {
            Some(entry) if !self.is_expired(entry, Timestamp::now()) => Ok(entry.token.clone()),
            _ => Err(RegistryError::UnknownShortId(short_id.to_string())),
        }
    }

    async fn restore(&self, application: Application) -> Result<Application, RegistryError> {
        let mut applications = self.applications.write().await;
        if let Some(existing) = applications.get(application.token()).cloned() {
            drop(applications);
            let current = existing.lock().await.clone();
            return Ok(current);
        }
        applications.insert(
            application.token().clone(),
            Arc::new(Mutex::new(application.clone())),
        );
        Ok(application)
    }

    async fn transition(
        &self,
        token: &ApplicationToken,
        decision: Decision,
    ) -> Result<Application, RegistryError> {
        let slot = self.slot(token).await?;
        let mut application = slot.lock().await;

        match application.decide(decision) {
            Ok(()) => Ok(application.clone()),
            Err(ApprovalError::AlreadyDecided { .. }) => {
                Err(RegistryError::AlreadyDecided(Box::new(application.clone())))
            }
            Err(ApprovalError::InvalidTransition(e)) | Err(ApprovalError::Validation(e)) => {
                Err(RegistryError::Validation(e))
            }
        }
    }

    async fn attach_request_message(
        &self,
        token: &ApplicationToken,
        message: MessageRef,
    ) -> Result<(), RegistryError> {
        let slot = self.slot(token).await?;
        slot.lock().await.attach_request_message(message);
        Ok(())
    }

    async fn discard(&self, token: &ApplicationToken) -> Result<(), RegistryError> {
        // Same lock order as `create`.
        let mut short_ids = self.short_ids.write().await;
        let mut applications = self.applications.write().await;

        let slot = applications
            .get(token)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound(token.clone()))?;
        let application = slot.lock().await.clone();
        if application.status().is_terminal() {
            return Err(RegistryError::AlreadyDecided(Box::new(application)));
        }

        applications.remove(token);
        short_ids.retain(|_, entry| &entry.token != token);
        Ok(())
    }

    async fn purge_expired(&self, now: Timestamp) -> usize {
        let mut short_ids = self.short_ids.write().await;
        let before = short_ids.len();
        short_ids.retain(|_, entry| !self.is_expired(entry, now));
        before - short_ids.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::approval::{ApprovalStatus, DecisionAction, ReconstructedFields};
    use crate::domain::verdict::AnalysisVerdict;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn input() -> NewApplication {
        NewApplication {
            company_name: "Acme LLC".to_string(),
            responsible: "Ivanova".to_string(),
            filename: "contract.pdf".to_string(),
            analysis: AnalysisVerdict::new("approve").with_document_type("contract"),
            comment: None,
            download_url: None,
        }
    }

    fn decision(action: DecisionAction, actor: &str) -> Decision {
        Decision::new(action, actor, Timestamp::now())
    }

    #[tokio::test]
    async fn created_application_resolves_by_token_and_short_id() {
        let registry = InMemoryApplicationRegistry::default();
        let app = registry.create(input()).await.unwrap();

        assert_eq!(app.status(), ApprovalStatus::PendingApproval);
        assert_eq!(registry.get(app.token()).await.unwrap(), app);
        assert_eq!(&registry.lookup(app.short_id()).await.unwrap(), app.token());
    }

    #[tokio::test]
    async fn create_rejects_missing_fields() {
        let registry = InMemoryApplicationRegistry::default();
        let mut bad = input();
        bad.company_name = String::new();

        assert!(matches!(registry.create(bad).await, Err(RegistryError::Validation(_))));
        assert_eq!(registry.application_count().await, 0);
    }

    #[tokio::test]
    async fn lookup_is_exact_match_only() {
        let registry = InMemoryApplicationRegistry::default()
            .with_short_id_source(|| ShortId::parse("aaaabbbb").unwrap());
        registry.create(input()).await.unwrap();

        let prefix_like = ShortId::parse("aaaabbbc").unwrap();
        assert!(matches!(
            registry.lookup(&prefix_like).await,
            Err(RegistryError::UnknownShortId(_))
        ));
    }

    #[tokio::test]
    async fn expired_short_id_stops_resolving_but_token_still_works() {
        let registry = InMemoryApplicationRegistry::new(Duration::from_millis(30));
        let app = registry.create(input()).await.unwrap();
        tokio::time::sleep(Duration::from_millis(60)).await;

        assert!(matches!(
            registry.lookup(app.short_id()).await,
            Err(RegistryError::UnknownShortId(_))
        ));
        assert_eq!(registry.get(app.token()).await.unwrap().token(), app.token());
    }

    #[tokio::test]
    async fn purge_drops_only_expired_index_entries() {
        let registry = InMemoryApplicationRegistry::new(Duration::from_secs(3600));
        let app = registry.create(input()).await.unwrap();

        assert_eq!(registry.purge_expired(Timestamp::now()).await, 0);
        assert_eq!(registry.purge_expired(Timestamp::now().plus_hours(2)).await, 1);

        assert_eq!(registry.short_id_count().await, 0);
        assert_eq!(registry.application_count().await, 1);
        assert!(registry.get(app.token()).await.is_ok());
    }

    #[tokio::test]
    async fn colliding_short_ids_are_retried() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let registry = InMemoryApplicationRegistry::default().with_short_id_source(move || {
            // The second call repeats the first id; the third is fresh.
            let n = counter.fetch_add(1, Ordering::SeqCst);
            let id = if n < 2 { "00000001" } else { "00000002" };
            ShortId::parse(id).unwrap()
        });

        let first = registry.create(input()).await.unwrap();
        let second = registry.create(input()).await.unwrap();

        assert_eq!(first.short_id().as_str(), "00000001");
        assert_eq!(second.short_id().as_str(), "00000002");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn exhausted_identifier_space_is_an_error() {
        let registry = InMemoryApplicationRegistry::default()
            .with_short_id_source(|| ShortId::parse("deadbeef").unwrap());
        registry.create(input()).await.unwrap();

        assert!(matches!(
            registry.create(input()).await,
            Err(RegistryError::IdentifierSpaceExhausted { attempts: MAX_SHORT_ID_ATTEMPTS })
        ));
        assert_eq!(registry.application_count().await, 1);
    }

    #[tokio::test]
    async fn first_decision_wins() {
        let registry = InMemoryApplicationRegistry::default();
        let app = registry.create(input()).await.unwrap();

        let decided = registry
            .transition(app.token(), decision(DecisionAction::Approve, "alice"))
            .await
            .unwrap();
        assert_eq!(decided.status(), ApprovalStatus::Approved);

        let err = registry
            .transition(app.token(), decision(DecisionAction::Reject, "bob"))
            .await
            .unwrap_err();
        match err {
            RegistryError::AlreadyDecided(winner) => {
                assert_eq!(winner.status(), ApprovalStatus::Approved);
                assert_eq!(winner.decided_by(), Some("alice"));
            }
            other => panic!("expected AlreadyDecided, got {other:?}"),
        }

        let stored = registry.get(app.token()).await.unwrap();
        assert_eq!(stored.decided_by(), Some("alice"));
        assert_eq!(stored.decided_at(), decided.decided_at());
    }

    #[tokio::test]
    async fn racing_decisions_accept_exactly_one() {
        let registry = InMemoryApplicationRegistry::default();
        let app = registry.create(input()).await.unwrap();

        let mut handles = Vec::new();
        for i in 0..16 {
            let registry = registry.clone();
            let token = app.token().clone();
            let action = if i % 2 == 0 { DecisionAction::Approve } else { DecisionAction::Reject };
            handles.push(tokio::spawn(async move {
                registry.transition(&token, decision(action, &format!("user{i}"))).await
            }));
        }

        let mut wins = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                wins += 1;
            }
        }
        assert_eq!(wins, 1);
    }

    #[tokio::test]
    async fn discard_removes_pending_application_and_short_id() {
        let registry = InMemoryApplicationRegistry::default();
        let kept = registry.create(input()).await.unwrap();
        let dropped = registry.create(input()).await.unwrap();

        registry.discard(dropped.token()).await.unwrap();

        assert_eq!(registry.application_count().await, 1);
        assert_eq!(registry.short_id_count().await, 1);
        assert!(matches!(
            registry.lookup(dropped.short_id()).await,
            Err(RegistryError::UnknownShortId(_))
        ));
        assert_eq!(&registry.lookup(kept.short_id()).await.unwrap(), kept.token());
    }

    #[tokio::test]
    async fn discard_keeps_decided_application() {
        let registry = InMemoryApplicationRegistry::default();
        let app = registry.create(input()).await.unwrap();
        registry
            .transition(app.token(), decision(DecisionAction::Approve, "alice"))
            .await
            .unwrap();

        assert!(matches!(
            registry.discard(app.token()).await,
            Err(RegistryError::AlreadyDecided(_))
        ));
        assert_eq!(registry.application_count().await, 1);
    }

    #[tokio::test]
    async fn transition_on_unknown_token_is_not_found() {
        let registry = InMemoryApplicationRegistry::default();
        let token = ApplicationToken::generate();
        assert!(matches!(
            registry.transition(&token, decision(DecisionAction::Approve, "a")).await,
            Err(RegistryError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn restore_does_not_overwrite_existing_record() {
        let registry = InMemoryApplicationRegistry::default();
        let app = registry.create(input()).await.unwrap();

        let shell = Application::reconstructed(
            app.token().clone(),
            app.short_id().clone(),
            ReconstructedFields::parse("Компания: Other"),
            None,
            Timestamp::now(),
        );
        let kept = registry.restore(shell).await.unwrap();
        assert_eq!(kept.company_name(), "Acme LLC");
        assert!(!kept.is_reconstructed());
    }

    #[tokio::test]
    async fn restore_inserts_missing_record() {
        let registry = InMemoryApplicationRegistry::default();
        let token = ApplicationToken::generate();
        let shell = Application::reconstructed(
            token.clone(),
            ShortId::generate(),
            ReconstructedFields::parse("Компания: Acme LLC"),
            None,
            Timestamp::now(),
        );

        registry.restore(shell).await.unwrap();
        let stored = registry.get(&token).await.unwrap();
        assert!(stored.is_reconstructed());
        assert_eq!(stored.company_name(), "Acme LLC");
    }

    #[tokio::test]
    async fn attach_request_message_is_visible_on_get() {
        let registry = InMemoryApplicationRegistry::default();
        let app = registry.create(input()).await.unwrap();
        let message = MessageRef { chat_id: -100, message_id: 42 };

        registry.attach_request_message(app.token(), message).await.unwrap();
        assert_eq!(registry.get(app.token()).await.unwrap().request_message(), Some(message));
    }
}
