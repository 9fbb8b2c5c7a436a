//! Wire types for the hosted agent service.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Request body for creating an ephemeral agent.
#[derive(Debug, Clone, Serialize)]
pub struct CreateAgentRequest {
    /// Model deployment the agent runs on.
    pub model: String,
    /// Agent display name.
    pub name: String,
    /// System instructions.
    pub instructions: String,
    /// Attached tool definitions.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<JsonValue>,
    /// Resources backing the attached tools.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_resources: Option<JsonValue>,
}

/// A created agent.
#[derive(Debug, Clone, Deserialize)]
pub struct AgentObject {
    /// Agent id.
    pub id: String,
}

/// A created thread.
#[derive(Debug, Clone, Deserialize)]
pub struct ThreadObject {
    /// Thread id.
    pub id: String,
}

/// Request body for posting a message to a thread.
#[derive(Debug, Clone, Serialize)]
pub struct CreateMessageRequest {
    /// Message role; always "user" here.
    pub role: String,
    /// Message text.
    pub content: String,
}

/// A posted message (response shape).
#[derive(Debug, Clone, Deserialize)]
pub struct MessageObject {
    /// Message id.
    pub id: String,
}

/// Request body for starting a run.
#[derive(Debug, Clone, Serialize)]
pub struct CreateRunRequest {
    /// Agent to run.
    pub assistant_id: String,
}

/// A run and its status.
#[derive(Debug, Clone, Deserialize)]
pub struct RunObject {
    /// Run id.
    pub id: String,
    /// Current status: queued, in_progress, completed, failed, cancelled, expired.
    pub status: String,
    /// Error detail for failed runs.
    pub last_error: Option<RunError>,
}

/// Error detail on a failed run.
#[derive(Debug, Clone, Deserialize)]
pub struct RunError {
    /// Error code.
    pub code: Option<String>,
    /// Error message.
    pub message: Option<String>,
}

/// Message list response.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageList {
    /// Messages, newest first when requested with descending order.
    pub data: Vec<ThreadMessage>,
}

/// One message in a thread.
#[derive(Debug, Clone, Deserialize)]
pub struct ThreadMessage {
    /// Message role.
    pub role: String,
    /// Content blocks.
    pub content: Vec<ContentBlock>,
}

impl ThreadMessage {
    /// Concatenated text of all text blocks.
    #[must_use]
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|block| block.text.as_ref().map(|t| t.value.as_str()))
            .collect()
    }
}

/// One content block of a thread message.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentBlock {
    /// Block type; "text" blocks carry a text payload.
    #[serde(rename = "type")]
    pub block_type: String,
    /// Text payload.
    pub text: Option<TextBlock>,
}

/// Text payload of a content block.
#[derive(Debug, Clone, Deserialize)]
pub struct TextBlock {
    /// The text value.
    pub value: String,
}
