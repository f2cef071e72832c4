//! OpenRouter chat completions transport
//!
//! Works with any OpenAI-compatible endpoint; point `base_url` elsewhere
//! for local or self-hosted servers.

use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};

use super::logging::{LogEntry, log_llm_interaction};
use super::{ChatResponse, OutboundRequest, Transport};
use crate::error::{Error, Result};

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// HTTP transport posting to `<base_url>/chat/completions`
pub struct OpenRouterTransport {
    client: reqwest::Client,
    base_url: String,
}

impl OpenRouterTransport {
    /// Default timeout for LLM API requests (5 minutes)
    const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

    /// Create a transport for the default OpenRouter endpoint
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create a transport for a custom OpenAI-compatible endpoint
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Self::DEFAULT_TIMEOUT)
            .connect_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| Error::transport(None, format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl Transport for OpenRouterTransport {
    async fn send(&self, request: &OutboundRequest) -> Result<ChatResponse> {
        let endpoint = self.endpoint();
        debug!(
            endpoint = %endpoint,
            model = %request.body.model,
            message_count = request.body.messages.len(),
            tool_count = request.body.tools.len(),
            "Sending chat completion request"
        );

        let response = self
            .client
            .post(&endpoint)
            .bearer_auth(&request.api_key)
            .json(&request.body)
            .send()
            .await
            .map_err(|e| {
                let message = e.to_string();
                log_llm_interaction(LogEntry {
                    request: Some(&request.body),
                    error: Some(&message),
                    ..Default::default()
                });
                Error::transport(None, message)
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::transport(Some(status.as_u16()), e.to_string()))?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "Chat completion request failed");
            log_llm_interaction(LogEntry {
                request: Some(&request.body),
                raw_response: Some(&body),
                status: Some(status.as_u16()),
                error: Some("non-success status"),
                ..Default::default()
            });
            let reason = status.canonical_reason().unwrap_or("request failed");
            let message = if body.is_empty() {
                reason.to_string()
            } else {
                format!("{}: {}", reason, body)
            };
            return Err(Error::transport(Some(status.as_u16()), message));
        }

        let parsed: ChatResponse = serde_json::from_str(&body).map_err(|e| {
            let message = format!("Malformed response body: {}", e);
            log_llm_interaction(LogEntry {
                request: Some(&request.body),
                raw_response: Some(&body),
                status: Some(status.as_u16()),
                error: Some(&message),
                ..Default::default()
            });
            Error::transport(Some(status.as_u16()), message)
        })?;

        log_llm_interaction(LogEntry {
            request: Some(&request.body),
            response: Some(&parsed),
            status: Some(status.as_u16()),
            ..Default::default()
        });

        Ok(parsed)
    }
}
