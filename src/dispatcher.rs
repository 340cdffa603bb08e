use std::sync::Arc;

use crate::error::{DeepSiloError, Result};
use crate::models::ModeResult;
use crate::modes::ResearchMode;
use crate::protocol::{Content, GenerateContentRequest};
use crate::transport::Transport;

/// Issues one schema-constrained query per call and validates the reply.
///
/// Validation is uniform across modes: every top-level field the mode's
/// schema marks required must be present and non-null before the payload is
/// deserialized. Failures never mutate session or history; callers decide
/// what to do with them.
pub struct Dispatcher {
    tx: Arc<dyn Transport>,
    model: String,
}

impl Dispatcher {
    pub fn new(tx: Arc<dyn Transport>, model: String) -> Self {
        Self { tx, model }
    }

    pub async fn run_query(&self, mode: ResearchMode, query: &str) -> Result<ModeResult> {
        let query = query.trim();
        if query.is_empty() {
            return Err(DeepSiloError::EmptyQuery);
        }

        tracing::info!(mode = mode.id(), "running structured query");

        let schema = mode.response_schema();
        let request = GenerateContentRequest::new(vec![Content::user(mode.prompt(query))])
            .with_response_schema(schema.to_value());

        let response = self.tx.generate(&self.model, &request).await?;
        let text = response.text().ok_or(DeepSiloError::EmptyCandidates)?;

        let value: serde_json::Value =
            serde_json::from_str(text.trim()).map_err(DeepSiloError::MalformedResponse)?;

        let missing: Vec<String> = schema
            .top_level_required()
            .into_iter()
            .filter(|field| value.get(field).is_none_or(serde_json::Value::is_null))
            .map(|field| field.to_string())
            .collect();
        if !missing.is_empty() {
            tracing::warn!(
                mode = mode.id(),
                missing = ?missing,
                "response missing required fields"
            );
            return Err(DeepSiloError::IncompleteResponse {
                mode: mode.id(),
                missing,
            });
        }

        ModeResult::from_value(mode, value)
    }
}
