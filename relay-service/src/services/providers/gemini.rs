//! Gemini chat provider.
//!
//! Forwards a conversation history to Google's generate-content endpoint and
//! hands the JSON body back untouched. The one real transformation in the
//! relay happens here: the inbound `chatHistory` field becomes `contents`.

use super::{ChatProvider, ProviderError};
use crate::config::GeminiConfig;
use crate::models::ChatTurn;
use crate::services::metrics::record_provider_call;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

pub struct GeminiClient {
    config: GeminiConfig,
    client: Client,
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: &'a [ChatTurn],
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .map_err(|e| {
                ProviderError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { config, client })
    }

    /// Build the API URL for the configured model; the key travels as a query
    /// parameter per the Gemini REST contract.
    fn api_url(&self, method: &str) -> String {
        format!(
            "{}/models/{}:{}?key={}",
            self.config.api_base, self.config.model, method, self.config.api_key
        )
    }
}

#[async_trait]
impl ChatProvider for GeminiClient {
    async fn generate(&self, history: &[ChatTurn]) -> Result<Value, ProviderError> {
        // Missing key is a configuration fault; refuse before any outbound call.
        if self.config.api_key.is_empty() {
            return Err(ProviderError::NotConfigured(
                "Gemini API key not configured".to_string(),
            ));
        }

        let request = GenerateContentRequest { contents: history };
        let url = self.api_url("generateContent");

        tracing::debug!(
            model = %self.config.model,
            turns = history.len(),
            "Sending request to Gemini API"
        );

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                record_provider_call("gemini", "network_error");
                ProviderError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            record_provider_call("gemini", "upstream_error");
            let text = response.text().await.unwrap_or_default();
            // Relay the error body as-is; fall back to the raw text when the
            // upstream answers with something that is not JSON.
            let body = serde_json::from_str(&text).unwrap_or(Value::String(text));
            return Err(ProviderError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        record_provider_call("gemini", "ok");
        response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("Failed to parse response: {}", e)))
    }
}
