use std::sync::Arc;

use crate::chat::ChatSession;
use crate::config::Config;
use crate::dispatcher::Dispatcher;
use crate::error::{DeepSiloError, Result};
use crate::history::HistoryLog;
use crate::models::{ChatTurn, HistoryEntry};
use crate::modes::ResearchMode;
use crate::session::{Page, Session};
use crate::storage::{FileStore, KvStore, keys};
use crate::transport::{GeminiTransport, Transport};

/// Top-level facade wiring configuration, transport, dispatcher, history
/// and the session state machine.
///
/// This is the single place where query failures are converted into a
/// user-visible error string and a state transition; nothing below it
/// touches session or history.
pub struct DeepSilo {
    config: Config,
    store: Arc<dyn KvStore>,
    history: HistoryLog,
    transport: Option<Arc<dyn Transport>>,
    dispatcher: Option<Dispatcher>,
    session: Session,
}

impl DeepSilo {
    pub async fn new(config: Config) -> Result<Self> {
        let store = Arc::new(FileStore::open(config.app.data_path.clone()).await?);
        Self::with_store(config, store).await
    }

    /// Construct over an injected store; used by tests and embedders.
    pub async fn with_store(config: Config, store: Arc<dyn KvStore>) -> Result<Self> {
        let mut credential = store.get(keys::API_KEY).await?;
        if credential.is_none()
            && let Some(seed) = config.gemini.api_key.clone()
        {
            store.set(keys::API_KEY, &seed).await?;
            credential = Some(seed);
        }

        let history = HistoryLog::with_limit(store.clone(), config.history.limit);
        let session = Session::new(credential.is_some());

        let mut service = Self {
            config,
            store,
            history,
            transport: None,
            dispatcher: None,
            session,
        };
        if let Some(key) = credential {
            service.connect(&key);
        }
        Ok(service)
    }

    fn connect(&mut self, api_key: &str) {
        let transport: Arc<dyn Transport> = Arc::new(
            GeminiTransport::new(api_key).with_base_url(self.config.gemini.base_url.clone()),
        );
        self.install_transport(transport);
    }

    /// Swap in a transport implementation. Exposed so tests and embedders
    /// can run the full session flow without the real service.
    pub fn install_transport(&mut self, transport: Arc<dyn Transport>) {
        self.dispatcher = Some(Dispatcher::new(
            transport.clone(),
            self.config.gemini.model.clone(),
        ));
        self.transport = Some(transport);
        self.session.credential_saved();
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn select_mode(&mut self, mode: ResearchMode) {
        self.session.select_mode(mode);
    }

    pub fn navigate(&mut self, page: Page) {
        self.session.navigate(page);
    }

    pub fn back_to_modes(&mut self) {
        self.session.back_to_modes();
    }

    pub fn reset(&mut self) {
        self.session.reset();
    }

    /// Persist a credential entered at the gate and connect with it.
    pub async fn save_credential(&mut self, api_key: &str) -> Result<()> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Ok(());
        }
        self.store.set(keys::API_KEY, api_key).await?;
        self.connect(api_key);
        Ok(())
    }

    /// Run one structured query for the active mode.
    ///
    /// The submit guard rejects blank queries without a network call.
    /// On success the session moves to `Results`, a fresh chat is attached
    /// and a history entry is persisted; on failure the error is recorded
    /// and the session returns to `Searching` (or the credential gate when
    /// the key was rejected, in which case the stored key is discarded).
    pub async fn run_query(&mut self, query: &str) {
        let Some(mode) = self.session.mode() else {
            return;
        };
        if !self.session.submit(query) {
            return;
        }
        let Some(dispatcher) = self.dispatcher.as_ref() else {
            self.session
                .failure(&DeepSiloError::Auth("no credential configured".to_string()));
            return;
        };

        match dispatcher.run_query(mode, query).await {
            Ok(result) => {
                let chat = self.new_chat(mode, query.trim());
                if let Some(entry) = self.session.success(result, chat)
                    && let Err(e) = self.history.append(entry).await
                {
                    tracing::warn!(error = %e, "failed to persist history entry");
                }
            }
            Err(e) => {
                if e.is_auth() {
                    self.discard_credential().await;
                }
                self.session.failure(&e);
            }
        }
    }

    /// Forward one follow-up chat turn. Chat failures are contained in the
    /// adapter; this never errors and never changes the screen.
    pub async fn send_chat(&mut self, text: &str) -> Option<&ChatTurn> {
        self.session.chat_mut()?.send_turn(text).await
    }

    pub async fn history_entries(&self) -> Result<Vec<HistoryEntry>> {
        self.history.entries().await
    }

    pub async fn clear_history(&self) -> Result<()> {
        self.history.clear().await
    }

    /// Load a stored history entry straight into the results screen, with a
    /// fresh chat and no service call.
    pub async fn restore(&mut self, index: usize) -> Result<bool> {
        if self.transport.is_none() {
            return Ok(false);
        }
        let entries = self.history.entries().await?;
        let Some(entry) = entries.get(index) else {
            return Ok(false);
        };
        let chat = self.new_chat(entry.mode, &entry.query);
        self.session.restore(entry, chat);
        Ok(true)
    }

    fn new_chat(&self, mode: ResearchMode, topic: &str) -> ChatSession {
        let transport = self
            .transport
            .clone()
            .unwrap_or_else(|| Arc::new(GeminiTransport::new(String::new())));
        let model = self.config.gemini.chat_model.clone();
        // The agent mode pairs its results with the search-grounded
        // assistant; every other mode chats from general knowledge.
        if mode == ResearchMode::DeepAgent {
            ChatSession::with_search(transport, model, topic)
        } else {
            ChatSession::new(transport, model, topic)
        }
    }

    async fn discard_credential(&mut self) {
        if let Err(e) = self.store.remove(keys::API_KEY).await {
            tracing::warn!(error = %e, "failed to discard stored credential");
        }
        self.transport = None;
        self.dispatcher = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DeepSiloError;
    use crate::models::ModeResult;
    use crate::protocol::{GenerateContentRequest, GenerateContentResponse};
    use crate::session::Screen;
    use crate::storage::MemoryStore;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct MockTransport {
        responses: Mutex<Vec<Result<GenerateContentResponse>>>,
        calls: AtomicUsize,
    }

    impl MockTransport {
        fn new(responses: Vec<Result<GenerateContentResponse>>) -> Self {
            MockTransport {
                responses: Mutex::new(responses),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn generate(
            &self,
            _model: &str,
            _req: &GenerateContentRequest,
        ) -> Result<GenerateContentResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.responses
                .lock()
                .expect("Mock transport mutex should not be poisoned")
                .pop()
                .unwrap_or_else(|| {
                    Err(DeepSiloError::Api {
                        status: 500,
                        message: "No more mock responses".to_string(),
                    })
                })
        }
    }

    fn chef_reply() -> Result<GenerateContentResponse> {
        let payload = serde_json::json!({
            "recipeName": "Chicken and Rice Bowl",
            "description": "Comforting and quick.",
            "prepTime": "15 minutes",
            "cookTime": "30 minutes",
            "difficulty": "Easy",
            "ingredients": [{"name": "chicken", "quantity": "500 g"}],
            "instructions": ["Cook the rice."],
            "sources": []
        });
        Ok(serde_json::from_value(serde_json::json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": payload.to_string()}]}
            }]
        }))
        .expect("mock reply should deserialize"))
    }

    async fn service_with(
        transport: Arc<MockTransport>,
        store: Arc<MemoryStore>,
    ) -> DeepSilo {
        let mut service = DeepSilo::with_store(Config::default(), store)
            .await
            .expect("service should construct");
        service.install_transport(transport);
        service
    }

    #[tokio::test]
    async fn successful_query_reaches_results_and_persists_history() {
        let transport = Arc::new(MockTransport::new(vec![chef_reply()]));
        let store = Arc::new(MemoryStore::new());
        let mut service = service_with(transport, store).await;

        service.select_mode(ResearchMode::DeepChef);
        service.run_query("chicken and rice").await;

        assert_eq!(service.session().screen(), Screen::Results);
        match service.session().result() {
            Some(ModeResult::Chef(data)) => {
                assert_eq!(data.recipe_name, "Chicken and Rice Bowl");
            }
            other => panic!("expected chef result, got {other:?}"),
        }

        let entries = service.history_entries().await.expect("entries");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].query, "chicken and rice");
        assert_eq!(entries[0].mode, ResearchMode::DeepChef);
    }

    #[tokio::test]
    async fn blank_query_issues_no_call_and_keeps_state() {
        let transport = Arc::new(MockTransport::new(vec![chef_reply()]));
        let store = Arc::new(MemoryStore::new());
        let mut service = service_with(transport.clone(), store).await;

        service.select_mode(ResearchMode::DeepResearch);
        service.run_query("   ").await;

        assert_eq!(service.session().screen(), Screen::Searching);
        assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
        assert!(service.history_entries().await.expect("entries").is_empty());
    }

    #[tokio::test]
    async fn incomplete_response_surfaces_error_and_returns_to_searching() {
        let missing_itinerary = serde_json::json!({
            "destination": "Kyoto",
            "tripSummary": "Temples and food.",
            "packingList": [],
            "budgetBreakdown": [],
            "sources": []
        });
        let reply = Ok(serde_json::from_value(serde_json::json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": missing_itinerary.to_string()}]}
            }]
        }))
        .expect("mock reply should deserialize"));

        let transport = Arc::new(MockTransport::new(vec![reply]));
        let store = Arc::new(MemoryStore::new());
        let mut service = service_with(transport, store).await;

        service.select_mode(ResearchMode::DeepTrip);
        service.run_query("5 days in Kyoto").await;

        assert_eq!(service.session().screen(), Screen::Searching);
        assert!(
            service
                .session()
                .error()
                .expect("error should be recorded")
                .contains("itinerary")
        );
        assert!(service.history_entries().await.expect("entries").is_empty());
        // Mode and query stay put for a retry.
        assert_eq!(service.session().mode(), Some(ResearchMode::DeepTrip));
        assert_eq!(service.session().query(), Some("5 days in Kyoto"));
    }

    #[tokio::test]
    async fn auth_failure_discards_the_stored_credential() {
        let transport = Arc::new(MockTransport::new(vec![Err(DeepSiloError::Auth(
            "API key not valid".to_string(),
        ))]));
        let store = Arc::new(MemoryStore::with_entry(keys::API_KEY, "bad-key"));
        let mut service = service_with(transport, store.clone()).await;

        service.select_mode(ResearchMode::DeepResearch);
        service.run_query("anything").await;

        assert_eq!(service.session().screen(), Screen::CredentialEntry);
        assert!(store.get(keys::API_KEY).await.expect("get").is_none());
    }

    #[tokio::test]
    async fn credential_gate_opens_after_saving_a_key() {
        let store = Arc::new(MemoryStore::new());
        let mut service = DeepSilo::with_store(Config::default(), store.clone())
            .await
            .expect("service should construct");

        assert_eq!(service.session().screen(), Screen::CredentialEntry);

        service.save_credential("fresh-key").await.expect("save");

        assert_eq!(service.session().screen(), Screen::ModeSelection);
        assert_eq!(
            store.get(keys::API_KEY).await.expect("get").as_deref(),
            Some("fresh-key")
        );
    }

    #[tokio::test]
    async fn config_key_seeds_the_store_and_skips_the_gate() {
        let store = Arc::new(MemoryStore::new());
        let mut config = Config::default();
        config.gemini.api_key = Some("seeded-key".to_string());

        let service = DeepSilo::with_store(config, store.clone())
            .await
            .expect("service should construct");

        assert_eq!(service.session().screen(), Screen::ModeSelection);
        assert_eq!(
            store.get(keys::API_KEY).await.expect("get").as_deref(),
            Some("seeded-key")
        );
    }

    #[tokio::test]
    async fn restore_reaches_results_without_a_service_call() {
        let transport = Arc::new(MockTransport::new(vec![chef_reply()]));
        let store = Arc::new(MemoryStore::new());
        let mut service = service_with(transport.clone(), store).await;

        service.select_mode(ResearchMode::DeepChef);
        service.run_query("chicken and rice").await;
        service.reset();
        let calls_after_query = transport.calls.load(Ordering::SeqCst);

        let restored = service.restore(0).await.expect("restore");

        assert!(restored);
        assert_eq!(service.session().screen(), Screen::Results);
        assert_eq!(service.session().query(), Some("chicken and rice"));
        assert_eq!(transport.calls.load(Ordering::SeqCst), calls_after_query);
    }

    #[tokio::test]
    async fn restore_with_a_bad_index_is_a_no_op() {
        let transport = Arc::new(MockTransport::new(vec![]));
        let store = Arc::new(MemoryStore::new());
        let mut service = service_with(transport, store).await;

        let restored = service.restore(7).await.expect("restore");

        assert!(!restored);
        assert_eq!(service.session().screen(), Screen::ModeSelection);
    }

    #[tokio::test]
    async fn chat_is_attached_after_success_and_fallback_contains_failures() {
        let transport = Arc::new(MockTransport::new(vec![chef_reply()]));
        let store = Arc::new(MemoryStore::new());
        let mut service = service_with(transport, store).await;

        service.select_mode(ResearchMode::DeepChef);
        service.run_query("chicken and rice").await;

        // The mock has no replies left, so the chat call fails and is
        // absorbed by the adapter's fallback turn.
        let turn = service
            .send_chat("can I use brown rice?")
            .await
            .expect("turn appended");
        assert_eq!(turn.text, "Sorry, I encountered an error. Please try again.");
        assert_eq!(service.session().screen(), Screen::Results);
    }
}
