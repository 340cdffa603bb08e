use async_trait::async_trait;
use reqwest::Client;

use crate::error::{DeepSiloError, Result};
use crate::protocol::{GenerateContentRequest, GenerateContentResponse};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// One request/response exchange with the generative language service.
///
/// Deliberately has no retry, backoff or caching behavior: every query and
/// chat turn is a single interactive call, issued at most once.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn generate(
        &self,
        model: &str,
        req: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse>;
}

pub struct GeminiTransport {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiTransport {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Override the endpoint, e.g. for a proxy.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl Transport for GeminiTransport {
    async fn generate(
        &self,
        model: &str,
        req: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, model, self.api_key
        );

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(req)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            if status == reqwest::StatusCode::UNAUTHORIZED
                || status == reqwest::StatusCode::FORBIDDEN
            {
                return Err(DeepSiloError::Auth(message));
            }
            return Err(DeepSiloError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_construction_uses_model_and_key() {
        let transport =
            GeminiTransport::new("my_api_key_123").with_base_url("https://test.api.com/v1beta");

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            transport.base_url, "gemini-2.5-flash", transport.api_key
        );
        assert_eq!(
            url,
            "https://test.api.com/v1beta/models/gemini-2.5-flash:generateContent?key=my_api_key_123"
        );
    }

    #[test]
    fn default_base_url_points_at_the_service() {
        let transport = GeminiTransport::new("k");
        assert_eq!(
            transport.base_url,
            "https://generativelanguage.googleapis.com/v1beta"
        );
    }
}
