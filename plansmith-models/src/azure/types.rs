//! Wire types for the Azure OpenAI chat-completions API.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Request body for a chat completion.
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    /// Conversation messages in provider format.
    pub messages: Vec<WireMessage>,
    /// Sampling temperature.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Top-p sampling.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    /// Maximum tokens to generate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u64>,
    /// Stop sequences.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<Vec<String>>,
    /// Random seed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Function-format capability catalog.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<JsonValue>>,
    /// Tool choice strategy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<JsonValue>,
}

/// One provider-format message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireMessage {
    /// Message role: system, user, assistant, or tool.
    pub role: String,
    /// Text content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Tool calls (assistant messages only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<WireToolCall>>,
    /// Id of the call a tool message answers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl WireMessage {
    /// Create a message with a role and text content.
    pub fn text(role: &str, content: impl Into<String>) -> Self {
        Self {
            role: role.to_string(),
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    /// Create a tool-result message.
    pub fn tool(content: impl Into<String>, tool_call_id: Option<String>) -> Self {
        Self {
            role: "tool".to_string(),
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id,
        }
    }
}

/// A tool call in provider format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireToolCall {
    /// Provider-assigned call id.
    pub id: String,
    /// Always "function".
    #[serde(rename = "type")]
    pub call_type: String,
    /// The invoked function.
    pub function: WireFunctionCall,
}

/// The function half of a tool call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireFunctionCall {
    /// Function name.
    pub name: String,
    /// JSON-encoded arguments.
    pub arguments: String,
}

/// Response body for a chat completion.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    /// Response id.
    pub id: Option<String>,
    /// Model that produced the response.
    pub model: Option<String>,
    /// Completion choices; the first is used.
    pub choices: Vec<ChatChoice>,
    /// Token usage.
    pub usage: Option<WireUsage>,
}

/// One completion choice.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    /// The generated message.
    pub message: ChoiceMessage,
    /// Why generation stopped.
    pub finish_reason: Option<String>,
}

/// The message inside a choice.
#[derive(Debug, Clone, Deserialize)]
pub struct ChoiceMessage {
    /// Text content.
    pub content: Option<String>,
    /// Requested tool calls.
    pub tool_calls: Option<Vec<WireToolCall>>,
}

/// Token usage in provider format.
#[derive(Debug, Clone, Deserialize)]
pub struct WireUsage {
    /// Prompt tokens.
    pub prompt_tokens: u64,
    /// Completion tokens.
    pub completion_tokens: u64,
    /// Total tokens.
    pub total_tokens: u64,
}

/// Provider error envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    /// The error detail.
    pub error: ApiErrorDetail,
}

/// Provider error detail.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorDetail {
    /// Human-readable message.
    pub message: String,
    /// Provider error code.
    pub code: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_skips_unset_fields() {
        let req = ChatCompletionRequest {
            messages: vec![WireMessage::text("user", "hi")],
            temperature: None,
            top_p: None,
            max_tokens: Some(100),
            stop: None,
            seed: None,
            tools: None,
            tool_choice: None,
        };

        let json = serde_json::to_value(&req).unwrap();
        assert!(json.get("temperature").is_none());
        assert_eq!(json["max_tokens"], 100);
        assert_eq!(json["messages"][0]["role"], "user");
    }

    #[test]
    fn test_parse_tool_call_response() {
        let body = r#"{
            "id": "cmpl-1",
            "model": "gpt-4o",
            "choices": [{
                "message": {
                    "content": null,
                    "tool_calls": [{
                        "id": "call_abc",
                        "type": "function",
                        "function": {"name": "search_plan_docs", "arguments": "{\"plan_name\": \"Northwind\"}"}
                    }]
                },
                "finish_reason": "tool_calls"
            }],
            "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
        }"#;

        let resp: ChatCompletionResponse = serde_json::from_str(body).unwrap();
        let calls = resp.choices[0].message.tool_calls.as_ref().unwrap();
        assert_eq!(calls[0].function.name, "search_plan_docs");
        assert_eq!(resp.usage.as_ref().unwrap().total_tokens, 15);
    }

    #[test]
    fn test_parse_error_body() {
        let body = r#"{"error": {"message": "bad key", "code": "invalid_api_key"}}"#;
        let err: ApiErrorBody = serde_json::from_str(body).unwrap();
        assert_eq!(err.error.code.as_deref(), Some("invalid_api_key"));
    }
}
