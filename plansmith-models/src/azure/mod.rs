//! Azure OpenAI chat-completions provider.
//!
//! Azure serves OpenAI models behind deployment-scoped URLs with `api-key`
//! header authentication and an `api-version` query parameter.
//!
//! ## Environment Variables
//!
//! - `PLANSMITH_CHAT_ENDPOINT` - resource endpoint, e.g. `https://my-resource.openai.azure.com`
//! - `PLANSMITH_CHAT_API_KEY` - API key
//! - `PLANSMITH_CHAT_API_VERSION` - optional, defaults to [`AzureChatModel::DEFAULT_API_VERSION`]

pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::Client;
use serde_json::json;
use tracing::debug;

use plansmith_core::{
    ConversationHistory, FinishReason, ModelRequest, ModelRequestPart, ModelResponse,
    ModelResponsePart, ModelSettings, RequestUsage, TextPart, ToolCallPart,
};

use crate::error::ModelError;
use crate::model::{ChatModel, RequestParameters, ToolChoice};
use self::types::*;

/// Azure OpenAI chat model client.
#[derive(Debug, Clone)]
pub struct AzureChatModel {
    deployment: String,
    endpoint: String,
    api_version: String,
    api_key: String,
    client: Client,
    default_timeout: Duration,
}

impl AzureChatModel {
    /// Default API version.
    pub const DEFAULT_API_VERSION: &'static str = "2024-10-21";

    /// Create a new Azure chat model.
    pub fn new(
        deployment: impl Into<String>,
        endpoint: impl Into<String>,
        api_version: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            deployment: deployment.into(),
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            api_version: api_version.into(),
            api_key: api_key.into(),
            client: Client::new(),
            default_timeout: Duration::from_secs(120),
        }
    }

    /// Create from environment variables.
    pub fn from_env(deployment: impl Into<String>) -> Result<Self, ModelError> {
        let endpoint = std::env::var("PLANSMITH_CHAT_ENDPOINT")
            .map_err(|_| ModelError::configuration("PLANSMITH_CHAT_ENDPOINT not set"))?;
        let api_key = std::env::var("PLANSMITH_CHAT_API_KEY")
            .map_err(|_| ModelError::configuration("PLANSMITH_CHAT_API_KEY not set"))?;
        let api_version = std::env::var("PLANSMITH_CHAT_API_VERSION")
            .unwrap_or_else(|_| Self::DEFAULT_API_VERSION.to_string());

        Ok(Self::new(deployment, endpoint, api_version, api_key))
    }

    /// Set the default timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    /// Set a custom HTTP client.
    #[must_use]
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions",
            self.endpoint, self.deployment
        )
    }

    /// Flatten the history into provider-format messages.
    fn convert_history(&self, history: &ConversationHistory) -> Vec<WireMessage> {
        history
            .iter()
            .flat_map(|req| self.convert_request(req))
            .collect()
    }

    fn convert_request(&self, req: &ModelRequest) -> Vec<WireMessage> {
        let mut messages = Vec::new();
        for part in &req.parts {
            match part {
                ModelRequestPart::SystemPrompt(sys) => {
                    messages.push(WireMessage::text("system", &sys.content));
                }
                ModelRequestPart::UserPrompt(user) => {
                    messages.push(WireMessage::text("user", &user.content));
                }
                ModelRequestPart::ToolReturn(ret) => {
                    messages.push(WireMessage::tool(&ret.content, ret.tool_call_id.clone()));
                }
                ModelRequestPart::RetryPrompt(retry) => {
                    messages.push(WireMessage::text("user", &retry.content));
                }
                ModelRequestPart::AssistantEcho(echo) => {
                    messages.push(self.convert_echo(&echo.response));
                }
            }
        }
        messages
    }

    /// Rebuild an assistant message from a recorded response so the
    /// provider sees proper role alternation around tool results.
    fn convert_echo(&self, response: &ModelResponse) -> WireMessage {
        let mut text = String::new();
        let mut tool_calls = Vec::new();

        for part in &response.parts {
            match part {
                ModelResponsePart::Text(t) => text.push_str(&t.content),
                ModelResponsePart::ToolCall(tc) => {
                    tool_calls.push(WireToolCall {
                        id: tc.tool_call_id.clone().unwrap_or_default(),
                        call_type: "function".to_string(),
                        function: WireFunctionCall {
                            name: tc.tool_name.clone(),
                            arguments: tc.args.to_string(),
                        },
                    });
                }
            }
        }

        WireMessage {
            role: "assistant".to_string(),
            // Providers reject null content alongside tool_calls; send "".
            content: Some(text),
            tool_calls: if tool_calls.is_empty() {
                None
            } else {
                Some(tool_calls)
            },
            tool_call_id: None,
        }
    }

    fn convert_tool_choice(choice: &ToolChoice) -> Option<serde_json::Value> {
        match choice {
            ToolChoice::Auto => Some(json!("auto")),
            ToolChoice::Required => Some(json!("required")),
            ToolChoice::None => Some(json!("none")),
        }
    }

    fn build_request(
        &self,
        history: &ConversationHistory,
        settings: &ModelSettings,
        params: &RequestParameters,
    ) -> ChatCompletionRequest {
        let tools = if params.capabilities.is_empty() {
            None
        } else {
            Some(
                params
                    .capabilities
                    .iter()
                    .map(|c| c.to_openai_function())
                    .collect(),
            )
        };

        ChatCompletionRequest {
            messages: self.convert_history(history),
            temperature: settings.temperature,
            top_p: settings.top_p,
            max_tokens: settings.max_tokens,
            stop: settings.stop.clone(),
            seed: settings.seed,
            tool_choice: tools
                .as_ref()
                .and_then(|_| Self::convert_tool_choice(&params.tool_choice)),
            tools,
        }
    }

    fn parse_response(&self, resp: ChatCompletionResponse) -> Result<ModelResponse, ModelError> {
        let choice = resp
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ModelError::invalid_response("no choices in response"))?;

        let mut parts = Vec::new();

        if let Some(content) = choice.message.content {
            if !content.is_empty() {
                parts.push(ModelResponsePart::Text(TextPart::new(content)));
            }
        }

        if let Some(tool_calls) = choice.message.tool_calls {
            for tc in tool_calls {
                let args: serde_json::Value = serde_json::from_str(&tc.function.arguments)
                    .unwrap_or_else(|_| json!({}));
                parts.push(ModelResponsePart::ToolCall(
                    ToolCallPart::new(tc.function.name, args).with_tool_call_id(tc.id),
                ));
            }
        }

        let finish_reason = choice.finish_reason.map(|r| match r.as_str() {
            "length" => FinishReason::Length,
            "content_filter" => FinishReason::ContentFilter,
            "tool_calls" => FinishReason::ToolCall,
            _ => FinishReason::Stop,
        });

        let usage = resp.usage.map(|u| RequestUsage {
            request_tokens: Some(u.prompt_tokens),
            response_tokens: Some(u.completion_tokens),
            total_tokens: Some(u.total_tokens),
        });

        let mut response = ModelResponse::with_parts(parts);
        response.model_name = resp.model;
        response.finish_reason = finish_reason;
        response.usage = usage;
        Ok(response)
    }

    fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
        headers
            .get("retry-after")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse::<u64>().ok())
            .map(Duration::from_secs)
    }

    fn handle_error_response(&self, status: u16, body: &str, headers: &HeaderMap) -> ModelError {
        if status == 429 {
            return ModelError::rate_limited(Self::parse_retry_after(headers));
        }

        if let Ok(err) = serde_json::from_str::<ApiErrorBody>(body) {
            if status == 401 || status == 403 {
                return ModelError::auth(err.error.message);
            }
            return ModelError::Api {
                message: err.error.message,
                code: err.error.code,
            };
        }

        ModelError::http(status, body)
    }
}

#[async_trait]
impl ChatModel for AzureChatModel {
    fn name(&self) -> &str {
        &self.deployment
    }

    fn provider(&self) -> &str {
        "azure"
    }

    async fn request(
        &self,
        history: &ConversationHistory,
        settings: &ModelSettings,
        params: &RequestParameters,
    ) -> Result<ModelResponse, ModelError> {
        let body = self.build_request(history, settings, params);
        let timeout = settings.timeout.unwrap_or(self.default_timeout);

        debug!(
            deployment = %self.deployment,
            messages = body.messages.len(),
            capabilities = params.capabilities.len(),
            "submitting chat completion"
        );

        let response = self
            .client
            .post(self.completions_url())
            .query(&[("api-version", self.api_version.as_str())])
            .header("api-key", &self.api_key)
            .timeout(timeout)
            .json(&body)
            .send()
            .await?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let headers = response.headers().clone();
            let body = response.text().await.unwrap_or_default();
            return Err(self.handle_error_response(status, &body, &headers));
        }

        let resp: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ModelError::invalid_response(e.to_string()))?;

        self.parse_response(resp)
    }
}
