//! # plansmith-core
//!
//! Core types shared across the plansmith workspace.
//!
//! This crate provides the foundational vocabulary for talking to a hosted
//! chat model and for keeping a per-session conversation:
//!
//! - **Messages**: request/response bundles with typed parts
//! - **History**: the append-only [`ConversationHistory`] owned by a session
//! - **Settings**: [`ModelSettings`] generation options
//! - **Usage**: token accounting across a turn
//! - **Identifiers**: run and tool-call id generation
//!
//! ## Example
//!
//! ```rust
//! use plansmith_core::{ConversationHistory, ModelSettings, ModelResponse};
//!
//! let mut history = ConversationHistory::new();
//! history.push_system("You are a report-writing orchestrator.");
//! history.push_user("Northwind Standard");
//!
//! let settings = ModelSettings::new().temperature(0.2).max_tokens(2000);
//!
//! let response = ModelResponse::text("{\"report_generated\": false, \"content\": \"...\"}");
//! assert!(!response.has_tool_calls());
//! assert_eq!(history.len(), 2);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod history;
pub mod identifier;
pub mod messages;
pub mod settings;
pub mod usage;

// Re-exports for convenience
pub use history::ConversationHistory;
pub use identifier::{generate_run_id, generate_tool_call_id, now_utc};
pub use messages::{
    AssistantEcho, FinishReason, ModelRequest, ModelRequestPart, ModelResponse,
    ModelResponsePart, RetryPromptPart, SystemPromptPart, TextPart, ToolCallPart,
    ToolReturnPart, UserPromptPart,
};
pub use settings::ModelSettings;
pub use usage::{RequestUsage, RunUsage};

/// Prelude module for common imports.
///
/// ```rust
/// use plansmith_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::history::ConversationHistory;
    pub use crate::identifier::{generate_run_id, generate_tool_call_id, now_utc};
    pub use crate::messages::{
        FinishReason, ModelRequest, ModelRequestPart, ModelResponse, ModelResponsePart,
        RetryPromptPart, SystemPromptPart, TextPart, ToolCallPart, ToolReturnPart,
        UserPromptPart,
    };
    pub use crate::settings::ModelSettings;
    pub use crate::usage::{RequestUsage, RunUsage};
}
