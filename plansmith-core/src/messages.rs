//! Message types exchanged with the model-hosting service.
//!
//! A [`ModelRequest`] bundles the parts sent *to* the model on one
//! submission; a [`ModelResponse`] holds what came *back*. The orchestrator
//! resubmits the full ordered history each round, so prior assistant
//! responses are carried inside requests as [`AssistantEcho`] parts to keep
//! the provider's user/assistant alternation intact.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::usage::RequestUsage;

// ============================================================================
// Request parts
// ============================================================================

/// A system prompt sent to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemPromptPart {
    /// Prompt text.
    pub content: String,
}

impl SystemPromptPart {
    /// Create a new system prompt part.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

/// A user message sent to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPromptPart {
    /// Message text.
    pub content: String,
}

impl UserPromptPart {
    /// Create a new user prompt part.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

/// The result of a capability invocation, fed back as a tool message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolReturnPart {
    /// Name of the capability that produced this result.
    pub tool_name: String,
    /// Result text.
    pub content: String,
    /// Provider-assigned id of the call this result answers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl ToolReturnPart {
    /// Create a new tool return part.
    pub fn new(tool_name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            content: content.into(),
            tool_call_id: None,
        }
    }

    /// Attach the tool call id this result answers.
    #[must_use]
    pub fn with_tool_call_id(mut self, id: impl Into<String>) -> Self {
        self.tool_call_id = Some(id.into());
        self
    }
}

/// A corrective prompt asking the model to try again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryPromptPart {
    /// Explanation of what was wrong.
    pub content: String,
    /// Capability the retry relates to, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_name: Option<String>,
}

impl RetryPromptPart {
    /// Create a new retry prompt part.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            tool_name: None,
        }
    }

    /// Attach the capability name this retry relates to.
    #[must_use]
    pub fn with_tool_name(mut self, name: impl Into<String>) -> Self {
        self.tool_name = Some(name.into());
        self
    }
}

/// A prior assistant response replayed into the request stream.
///
/// Providers require strict role alternation; when the orchestrator appends
/// tool results it first echoes the assistant response that requested them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistantEcho {
    /// The response being replayed.
    pub response: Box<ModelResponse>,
}

impl AssistantEcho {
    /// Wrap a response for replay.
    pub fn new(response: ModelResponse) -> Self {
        Self {
            response: Box::new(response),
        }
    }
}

/// One part of a request to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "part_kind", rename_all = "kebab-case")]
pub enum ModelRequestPart {
    /// System prompt.
    SystemPrompt(SystemPromptPart),
    /// User message.
    UserPrompt(UserPromptPart),
    /// Capability result.
    ToolReturn(ToolReturnPart),
    /// Corrective retry prompt.
    RetryPrompt(RetryPromptPart),
    /// Replayed assistant response.
    AssistantEcho(AssistantEcho),
}

/// A bundle of parts submitted to the model in one message.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ModelRequest {
    /// The request parts, in order.
    pub parts: Vec<ModelRequestPart>,
}

impl ModelRequest {
    /// Create a new empty request.
    #[must_use]
    pub fn new() -> Self {
        Self { parts: Vec::new() }
    }

    /// Create a request from parts.
    #[must_use]
    pub fn with_parts(parts: Vec<ModelRequestPart>) -> Self {
        Self { parts }
    }

    /// Create a request holding a single user message.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::with_parts(vec![ModelRequestPart::UserPrompt(UserPromptPart::new(
            content,
        ))])
    }

    /// Create a request holding a single system prompt.
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self::with_parts(vec![ModelRequestPart::SystemPrompt(SystemPromptPart::new(
            content,
        ))])
    }

    /// Append a part.
    pub fn add_part(&mut self, part: ModelRequestPart) {
        self.parts.push(part);
    }

    /// Append a tool return.
    pub fn add_tool_return(&mut self, part: ToolReturnPart) {
        self.parts.push(ModelRequestPart::ToolReturn(part));
    }

    /// Iterate over the user prompts in this request.
    pub fn user_prompts(&self) -> impl Iterator<Item = &UserPromptPart> {
        self.parts.iter().filter_map(|p| match p {
            ModelRequestPart::UserPrompt(u) => Some(u),
            _ => None,
        })
    }

    /// Iterate over the tool returns in this request.
    pub fn tool_returns(&self) -> impl Iterator<Item = &ToolReturnPart> {
        self.parts.iter().filter_map(|p| match p {
            ModelRequestPart::ToolReturn(t) => Some(t),
            _ => None,
        })
    }

    /// Whether this request carries no parts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

// ============================================================================
// Response parts
// ============================================================================

/// Plain text produced by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextPart {
    /// Text content.
    pub content: String,
}

impl TextPart {
    /// Create a new text part.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

/// A capability invocation requested by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallPart {
    /// Name of the capability to invoke.
    pub tool_name: String,
    /// Arguments as a JSON object.
    pub args: JsonValue,
    /// Provider-assigned call id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl ToolCallPart {
    /// Create a new tool call part.
    pub fn new(tool_name: impl Into<String>, args: JsonValue) -> Self {
        Self {
            tool_name: tool_name.into(),
            args,
            tool_call_id: None,
        }
    }

    /// Attach the provider-assigned call id.
    #[must_use]
    pub fn with_tool_call_id(mut self, id: impl Into<String>) -> Self {
        self.tool_call_id = Some(id.into());
        self
    }
}

/// One part of a model response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "part_kind", rename_all = "kebab-case")]
pub enum ModelResponsePart {
    /// Text content.
    Text(TextPart),
    /// Requested capability invocation.
    ToolCall(ToolCallPart),
}

/// Why the model stopped generating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// Natural stop.
    Stop,
    /// Stopped to request capability invocations.
    ToolCall,
    /// Token limit reached.
    Length,
    /// Content filter triggered.
    ContentFilter,
}

/// A complete response from the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelResponse {
    /// The response parts, in order.
    pub parts: Vec<ModelResponsePart>,
    /// Name of the model that produced the response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
    /// When the response was received.
    pub timestamp: DateTime<Utc>,
    /// Why the model stopped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<FinishReason>,
    /// Token usage for the request that produced this response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<RequestUsage>,
}

impl Default for ModelResponse {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelResponse {
    /// Create a new empty response.
    #[must_use]
    pub fn new() -> Self {
        Self {
            parts: Vec::new(),
            model_name: None,
            timestamp: Utc::now(),
            finish_reason: None,
            usage: None,
        }
    }

    /// Create a response from parts.
    #[must_use]
    pub fn with_parts(parts: Vec<ModelResponsePart>) -> Self {
        Self {
            parts,
            ..Self::new()
        }
    }

    /// Create a plain text response that stops the turn.
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self::with_parts(vec![ModelResponsePart::Text(TextPart::new(content))])
            .with_finish_reason(FinishReason::Stop)
    }

    /// Create a response requesting a single capability invocation.
    #[must_use]
    pub fn tool_call(tool_name: impl Into<String>, args: JsonValue) -> Self {
        Self::with_parts(vec![ModelResponsePart::ToolCall(ToolCallPart::new(
            tool_name, args,
        ))])
        .with_finish_reason(FinishReason::ToolCall)
    }

    /// Set the model name.
    #[must_use]
    pub fn with_model_name(mut self, name: impl Into<String>) -> Self {
        self.model_name = Some(name.into());
        self
    }

    /// Set the finish reason.
    #[must_use]
    pub fn with_finish_reason(mut self, reason: FinishReason) -> Self {
        self.finish_reason = Some(reason);
        self
    }

    /// Set the usage.
    #[must_use]
    pub fn with_usage(mut self, usage: RequestUsage) -> Self {
        self.usage = Some(usage);
        self
    }

    /// Concatenated text content of all text parts.
    #[must_use]
    pub fn text_content(&self) -> String {
        self.parts
            .iter()
            .filter_map(|p| match p {
                ModelResponsePart::Text(t) => Some(t.content.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Iterate over requested capability invocations, in order.
    pub fn tool_calls(&self) -> impl Iterator<Item = &ToolCallPart> {
        self.parts.iter().filter_map(|p| match p {
            ModelResponsePart::ToolCall(t) => Some(t),
            _ => None,
        })
    }

    /// Whether this response requests any capability invocations.
    #[must_use]
    pub fn has_tool_calls(&self) -> bool {
        self.tool_calls().next().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_builders() {
        let req = ModelRequest::user("hello");
        assert_eq!(req.user_prompts().count(), 1);
        assert!(req.tool_returns().next().is_none());

        let req = ModelRequest::system("be brief");
        assert_eq!(req.parts.len(), 1);
        assert!(matches!(req.parts[0], ModelRequestPart::SystemPrompt(_)));
    }

    #[test]
    fn test_tool_return_ordering_preserved() {
        let mut req = ModelRequest::new();
        req.add_tool_return(ToolReturnPart::new("search_plan_docs", "first"));
        req.add_tool_return(ToolReturnPart::new("write_report", "second"));
        req.add_tool_return(ToolReturnPart::new("validate_report", "third"));

        let contents: Vec<_> = req.tool_returns().map(|t| t.content.as_str()).collect();
        assert_eq!(contents, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_response_text_content() {
        let resp = ModelResponse::with_parts(vec![
            ModelResponsePart::Text(TextPart::new("hello ")),
            ModelResponsePart::Text(TextPart::new("world")),
        ]);
        assert_eq!(resp.text_content(), "hello world");
        assert!(!resp.has_tool_calls());
    }

    #[test]
    fn test_response_tool_calls() {
        let resp = ModelResponse::tool_call("search_plan_docs", json!({"plan_name": "Northwind"}));
        assert!(resp.has_tool_calls());
        assert_eq!(resp.finish_reason, Some(FinishReason::ToolCall));

        let calls: Vec<_> = resp.tool_calls().collect();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].tool_name, "search_plan_docs");
        assert_eq!(calls[0].args["plan_name"], "Northwind");
    }

    #[test]
    fn test_serde_roundtrip() {
        let mut req = ModelRequest::user("hi");
        req.add_tool_return(
            ToolReturnPart::new("write_report", "a report").with_tool_call_id("call_1"),
        );

        let json = serde_json::to_string(&req).unwrap();
        let parsed: ModelRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(req, parsed);
    }

    #[test]
    fn test_assistant_echo_roundtrip() {
        let resp = ModelResponse::tool_call("validate_report", json!({"report": "..."}));
        let mut req = ModelRequest::new();
        req.add_part(ModelRequestPart::AssistantEcho(AssistantEcho::new(
            resp.clone(),
        )));

        let json = serde_json::to_string(&req).unwrap();
        let parsed: ModelRequest = serde_json::from_str(&json).unwrap();
        match &parsed.parts[0] {
            ModelRequestPart::AssistantEcho(echo) => assert_eq!(*echo.response, resp),
            other => panic!("expected assistant echo, got {other:?}"),
        }
    }
}
