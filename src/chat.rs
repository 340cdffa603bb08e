use std::sync::Arc;

use crate::error::Result;
use crate::models::{ChatTurn, Role};
use crate::protocol::{Content, GenerateContentRequest, GenerateContentResponse};
use crate::transport::Transport;

/// Fixed assistant reply substituted when a chat call fails. Chat failures
/// stay inside the adapter; the session controller never sees them.
const FALLBACK_TEXT: &str = "Sorry, I encountered an error. Please try again.";

/// The follow-up conversation attached to one result.
///
/// A session is created fresh whenever the active result changes. Turns are
/// appended strictly in call order and prior history is never reordered or
/// dropped.
pub struct ChatSession {
    tx: Arc<dyn Transport>,
    model: String,
    topic: String,
    grounded: bool,
    transcript: Vec<ChatTurn>,
}

impl ChatSession {
    /// Plain conversational chat about `topic`.
    pub fn new(tx: Arc<dyn Transport>, model: String, topic: impl Into<String>) -> Self {
        let topic = topic.into();
        let greeting = format!("I'm ready to answer your follow-up questions about {topic}.");
        Self {
            tx,
            model,
            topic,
            grounded: false,
            transcript: vec![ChatTurn::assistant(greeting)],
        }
    }

    /// Search-grounded chat: replies carry `{uri, title}` citations.
    pub fn with_search(tx: Arc<dyn Transport>, model: String, topic: impl Into<String>) -> Self {
        let topic = topic.into();
        let greeting = format!(
            "I'm ready to answer your questions about \"{topic}\". I'll use Google Search to \
             find the most up-to-date information."
        );
        Self {
            tx,
            model,
            topic,
            grounded: true,
            transcript: vec![ChatTurn::assistant(greeting)],
        }
    }

    pub fn transcript(&self) -> &[ChatTurn] {
        &self.transcript
    }

    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    /// Send one user turn and append the assistant's reply.
    ///
    /// Empty input (after trimming) is rejected locally: no call is made and
    /// the transcript is unchanged. Otherwise exactly one user turn and one
    /// assistant turn are appended; a service failure yields the fixed
    /// fallback turn instead of an error.
    pub async fn send_turn(&mut self, text: &str) -> Option<&ChatTurn> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        self.transcript.push(ChatTurn::user(text));

        let turn = match self.request_reply().await {
            Ok(turn) => turn,
            Err(e) => {
                tracing::warn!(error = %e, "chat turn failed, substituting fallback reply");
                ChatTurn::assistant(FALLBACK_TEXT)
            }
        };
        self.transcript.push(turn);
        self.transcript.last()
    }

    async fn request_reply(&self) -> Result<ChatTurn> {
        tracing::info!(grounded = self.grounded, "sending chat turn");

        let contents: Vec<Content> = self.transcript.iter().map(Content::from).collect();
        let mut request =
            GenerateContentRequest::new(contents).with_system_instruction(format!(
                "You are a helpful research assistant. The user has just completed deep \
                 research on the topic: \"{}\". Your role is to answer follow-up questions \
                 concisely and accurately based on general knowledge related to this topic.",
                self.topic
            ));
        if self.grounded {
            request = request.with_search_grounding();
        }

        let response: GenerateContentResponse = self.tx.generate(&self.model, &request).await?;
        let text = response
            .text()
            .ok_or(crate::error::DeepSiloError::EmptyCandidates)?;

        if self.grounded {
            Ok(ChatTurn::assistant_with_citations(text, response.citations()))
        } else {
            Ok(ChatTurn::assistant(text))
        }
    }

    /// The latest assistant turn, if the last exchange produced one.
    pub fn last_assistant(&self) -> Option<&ChatTurn> {
        self.transcript
            .iter()
            .rev()
            .find(|turn| turn.role == Role::Assistant)
    }
}
