use crate::chat::ChatSession;
use crate::error::DeepSiloError;
use crate::models::{HistoryEntry, ModeResult};
use crate::modes::ResearchMode;

/// Core screens of the query flow. `CredentialEntry` gates everything else
/// until a service credential is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    CredentialEntry,
    ModeSelection,
    Searching,
    Loading,
    Results,
}

/// Auxiliary navigation, orthogonal to the query flow. Switching pages never
/// clears in-flight session fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    History,
    Settings,
}

/// The transient session aggregate: active screen, mode, query, result,
/// error and the chat attached to the current result.
///
/// Lives for the whole process; fields are reassigned, never torn down.
/// All transitions are guarded: an invalid event leaves the session
/// untouched.
pub struct Session {
    screen: Screen,
    page: Page,
    mode: Option<ResearchMode>,
    query: Option<String>,
    result: Option<ModeResult>,
    error: Option<String>,
    chat: Option<ChatSession>,
}

impl Session {
    pub fn new(credential_present: bool) -> Self {
        let screen = if credential_present {
            Screen::ModeSelection
        } else {
            Screen::CredentialEntry
        };
        Self {
            screen,
            page: Page::Home,
            mode: None,
            query: None,
            result: None,
            error: None,
            chat: None,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn page(&self) -> Page {
        self.page
    }

    pub fn mode(&self) -> Option<ResearchMode> {
        self.mode
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn result(&self) -> Option<&ModeResult> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn chat(&self) -> Option<&ChatSession> {
        self.chat.as_ref()
    }

    pub fn chat_mut(&mut self) -> Option<&mut ChatSession> {
        self.chat.as_mut()
    }

    /// A stored credential became available; leave the gate.
    pub fn credential_saved(&mut self) {
        if self.screen == Screen::CredentialEntry {
            self.screen = Screen::ModeSelection;
        }
    }

    pub fn select_mode(&mut self, mode: ResearchMode) {
        if self.screen != Screen::ModeSelection {
            return;
        }
        tracing::debug!(mode = mode.id(), "mode selected");
        self.mode = Some(mode);
        self.error = None;
        self.screen = Screen::Searching;
    }

    /// Record the query and enter `Loading`. Returns false (and changes
    /// nothing) when the query is blank or no mode is active.
    pub fn submit(&mut self, query: &str) -> bool {
        let query = query.trim();
        if self.screen != Screen::Searching || query.is_empty() || self.mode.is_none() {
            return false;
        }
        self.query = Some(query.to_string());
        self.error = None;
        self.screen = Screen::Loading;
        true
    }

    /// Store a completed result and enter `Results`. The returned history
    /// entry is the caller's to persist; the dispatcher itself never touches
    /// history.
    pub fn success(&mut self, result: ModeResult, chat: ChatSession) -> Option<HistoryEntry> {
        if self.screen != Screen::Loading {
            return None;
        }
        let query = self.query.clone().unwrap_or_default();
        let entry = HistoryEntry::new(query, result.clone());
        self.result = Some(result);
        self.chat = Some(chat);
        self.error = None;
        self.screen = Screen::Results;
        Some(entry)
    }

    /// Record a failure and return to `Searching` with mode and query
    /// retained so the user can retry. An auth failure instead routes back
    /// to the credential gate (the caller discards the stored key).
    pub fn failure(&mut self, error: &DeepSiloError) {
        if self.screen != Screen::Loading {
            return;
        }
        tracing::error!(error = %error, "query failed");
        self.error = Some(error.to_string());
        self.screen = if error.is_auth() {
            Screen::CredentialEntry
        } else {
            Screen::Searching
        };
    }

    /// Leave the results screen and start over.
    pub fn reset(&mut self) {
        if self.screen != Screen::Results {
            return;
        }
        self.mode = None;
        self.query = None;
        self.result = None;
        self.error = None;
        self.chat = None;
        self.screen = Screen::ModeSelection;
    }

    /// Back out of query entry to the mode catalog.
    pub fn back_to_modes(&mut self) {
        if self.screen != Screen::Searching {
            return;
        }
        self.mode = None;
        self.error = None;
        self.screen = Screen::ModeSelection;
    }

    /// Load a past entry straight into `Results`, bypassing `Loading` and
    /// the external service entirely.
    pub fn restore(&mut self, entry: &HistoryEntry, chat: ChatSession) {
        if self.screen == Screen::CredentialEntry {
            return;
        }
        self.mode = Some(entry.mode);
        self.query = Some(entry.query.clone());
        self.result = Some(entry.result.clone());
        self.chat = Some(chat);
        self.error = None;
        self.page = Page::Home;
        self.screen = Screen::Results;
    }

    pub fn navigate(&mut self, page: Page) {
        self.page = page;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::models::{ChefData, Ingredient};
    use crate::protocol::{GenerateContentRequest, GenerateContentResponse};
    use crate::transport::Transport;
    use async_trait::async_trait;
    use std::sync::Arc;

    struct NoopTransport;

    #[async_trait]
    impl Transport for NoopTransport {
        async fn generate(
            &self,
            _model: &str,
            _req: &GenerateContentRequest,
        ) -> Result<GenerateContentResponse> {
            panic!("session tests must not hit the transport");
        }
    }

    fn chat() -> ChatSession {
        ChatSession::new(Arc::new(NoopTransport), "test-model".to_string(), "topic")
    }

    fn chef_result() -> ModeResult {
        ModeResult::Chef(ChefData {
            recipe_name: "Chicken and Rice Bowl".to_string(),
            description: "d".to_string(),
            prep_time: "15 minutes".to_string(),
            cook_time: "30 minutes".to_string(),
            difficulty: "Easy".to_string(),
            ingredients: vec![Ingredient {
                name: "chicken".to_string(),
                quantity: "500 g".to_string(),
            }],
            instructions: vec!["cook".to_string()],
            sources: vec![],
        })
    }

    #[test]
    fn starts_at_credential_entry_without_a_key() {
        let session = Session::new(false);
        assert_eq!(session.screen(), Screen::CredentialEntry);
    }

    #[test]
    fn starts_at_mode_selection_with_a_key() {
        let session = Session::new(true);
        assert_eq!(session.screen(), Screen::ModeSelection);
    }

    #[test]
    fn credential_saved_leaves_the_gate() {
        let mut session = Session::new(false);
        session.credential_saved();
        assert_eq!(session.screen(), Screen::ModeSelection);
    }

    #[test]
    fn happy_path_reaches_results_and_builds_a_history_entry() {
        let mut session = Session::new(true);

        session.select_mode(ResearchMode::DeepChef);
        assert_eq!(session.screen(), Screen::Searching);
        assert_eq!(session.mode(), Some(ResearchMode::DeepChef));

        assert!(session.submit("chicken and rice"));
        assert_eq!(session.screen(), Screen::Loading);

        let entry = session
            .success(chef_result(), chat())
            .expect("success from Loading yields an entry");
        assert_eq!(session.screen(), Screen::Results);
        assert_eq!(entry.query, "chicken and rice");
        assert_eq!(entry.mode, ResearchMode::DeepChef);
        assert_eq!(session.result(), Some(&chef_result()));
        assert!(session.chat().is_some());
        assert!(session.error().is_none());
    }

    #[test]
    fn whitespace_query_does_not_transition() {
        let mut session = Session::new(true);
        session.select_mode(ResearchMode::DeepResearch);

        assert!(!session.submit("   "));
        assert_eq!(session.screen(), Screen::Searching);
        assert!(session.query().is_none());
    }

    #[test]
    fn submit_requires_an_active_mode() {
        let mut session = Session::new(true);
        assert!(!session.submit("a perfectly good query"));
        assert_eq!(session.screen(), Screen::ModeSelection);
    }

    #[test]
    fn failure_returns_to_searching_and_keeps_mode_and_query() {
        let mut session = Session::new(true);
        session.select_mode(ResearchMode::DeepTrip);
        session.submit("5 days in Kyoto");

        session.failure(&DeepSiloError::IncompleteResponse {
            mode: "deep_trip",
            missing: vec!["itinerary".to_string()],
        });

        assert_eq!(session.screen(), Screen::Searching);
        assert!(session.error().expect("error is recorded").contains("itinerary"));
        assert_eq!(session.mode(), Some(ResearchMode::DeepTrip));
        assert_eq!(session.query(), Some("5 days in Kyoto"));
    }

    #[test]
    fn auth_failure_routes_back_to_credential_entry() {
        let mut session = Session::new(true);
        session.select_mode(ResearchMode::DeepResearch);
        session.submit("anything");

        session.failure(&DeepSiloError::Auth("key rejected".to_string()));

        assert_eq!(session.screen(), Screen::CredentialEntry);
    }

    #[test]
    fn reset_clears_everything_back_to_mode_selection() {
        let mut session = Session::new(true);
        session.select_mode(ResearchMode::DeepChef);
        session.submit("chicken");
        session.success(chef_result(), chat());

        session.reset();

        assert_eq!(session.screen(), Screen::ModeSelection);
        assert!(session.mode().is_none());
        assert!(session.query().is_none());
        assert!(session.result().is_none());
        assert!(session.error().is_none());
        assert!(session.chat().is_none());
    }

    #[test]
    fn restore_jumps_straight_to_results() {
        let mut session = Session::new(true);
        let entry = HistoryEntry::new("old query".to_string(), chef_result());

        session.restore(&entry, chat());

        assert_eq!(session.screen(), Screen::Results);
        assert_eq!(session.mode(), Some(ResearchMode::DeepChef));
        assert_eq!(session.query(), Some("old query"));
        assert_eq!(session.result(), Some(&entry.result));
    }

    #[test]
    fn restore_is_blocked_behind_the_credential_gate() {
        let mut session = Session::new(false);
        let entry = HistoryEntry::new("old query".to_string(), chef_result());

        session.restore(&entry, chat());

        assert_eq!(session.screen(), Screen::CredentialEntry);
        assert!(session.result().is_none());
    }

    #[test]
    fn navigation_does_not_clear_in_flight_fields() {
        let mut session = Session::new(true);
        session.select_mode(ResearchMode::DeepStudy);
        session.submit("linear algebra");

        session.navigate(Page::History);
        assert_eq!(session.page(), Page::History);
        assert_eq!(session.screen(), Screen::Loading);
        assert_eq!(session.query(), Some("linear algebra"));

        session.navigate(Page::Home);
        assert_eq!(session.page(), Page::Home);
        assert_eq!(session.screen(), Screen::Loading);
    }

    #[test]
    fn success_outside_loading_is_ignored() {
        let mut session = Session::new(true);
        assert!(session.success(chef_result(), chat()).is_none());
        assert_eq!(session.screen(), Screen::ModeSelection);
        assert!(session.result().is_none());
    }

    #[test]
    fn back_to_modes_clears_the_selected_mode() {
        let mut session = Session::new(true);
        session.select_mode(ResearchMode::DeepGame);

        session.back_to_modes();

        assert_eq!(session.screen(), Screen::ModeSelection);
        assert!(session.mode().is_none());
    }
}
