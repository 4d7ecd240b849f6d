//! Chat-completion gateway

use super::types::{ChatMessage, ChatRequest, ChatResponse, ResponseFormatSpec};
use super::{ApiKey, classify_status, classify_transport, endpoint_url};
use crate::config::FileLlmConfig;
use async_trait::async_trait;
use gnsearch_application::{CompletionError, LlmGateway};
use gnsearch_domain::{CompletionRequest, ResponseFormat};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// [`LlmGateway`] over an OpenAI-compatible `/chat/completions` endpoint
#[derive(Debug, Clone)]
pub struct OpenAiGateway {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<ApiKey>,
    temperature: f32,
    max_tokens: Option<u32>,
}

impl OpenAiGateway {
    pub fn new(config: &FileLlmConfig) -> Result<Self, CompletionError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| CompletionError::ConnectionError(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.endpoint.clone(),
            model: config.model.clone(),
            api_key: ApiKey::new(config.api_key.as_deref()),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    /// System prompt, with the allowed answers spelled out for choice calls
    fn system_prompt(request: &CompletionRequest) -> String {
        match &request.format {
            ResponseFormat::Choice(options) if !options.is_empty() => format!(
                "{}\n\nRespond with exactly one of: {}.",
                request.system,
                options.join(", ")
            ),
            _ => request.system.clone(),
        }
    }
}

#[async_trait]
impl LlmGateway for OpenAiGateway {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        let system = Self::system_prompt(request);
        let mut messages = Vec::with_capacity(2);
        if !system.is_empty() {
            messages.push(ChatMessage {
                role: "system",
                content: &system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: &request.user,
        });

        let body = ChatRequest {
            model: &self.model,
            messages,
            temperature: self.temperature,
            max_tokens: request.max_tokens.or(self.max_tokens),
            response_format: matches!(request.format, ResponseFormat::Json)
                .then(ResponseFormatSpec::json_object),
        };

        let started = Instant::now();
        let mut builder = self
            .http
            .post(endpoint_url(&self.base_url, "chat/completions"))
            .json(&body);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key.as_str());
        }

        let response = builder.send().await.map_err(|e| classify_transport(&e))?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let error = classify_status(status, &text);
            warn!(purpose = %request.purpose, error = %error, "Completion request failed");
            return Err(error);
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| CompletionError::InvalidResponse(e.to_string()))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| CompletionError::InvalidResponse("no choices in response".into()))?;

        debug!(
            purpose = %request.purpose,
            model = %self.model,
            bytes = content.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Completion received"
        );

        Ok(content)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
