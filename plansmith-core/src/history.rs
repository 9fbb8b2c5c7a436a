//! The append-only conversation history.
//!
//! One [`ConversationHistory`] lives for the duration of an interactive
//! session. Only the orchestrator mutates it, one turn at a time, and
//! nothing is ever removed: every resubmission to the model carries the
//! full ordered history so the model sees consistent context.

use serde::{Deserialize, Serialize};

use crate::messages::{ModelRequest, ModelRequestPart};

/// Ordered, append-only sequence of request bundles for one session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationHistory {
    messages: Vec<ModelRequest>,
}

impl ConversationHistory {
    /// Create a new empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a request bundle.
    pub fn push(&mut self, request: ModelRequest) {
        self.messages.push(request);
    }

    /// Append a bundle holding a single system prompt.
    pub fn push_system(&mut self, content: impl Into<String>) {
        self.push(ModelRequest::system(content));
    }

    /// Append a bundle holding a single user message.
    pub fn push_user(&mut self, content: impl Into<String>) {
        self.push(ModelRequest::user(content));
    }

    /// The messages, in append order.
    #[must_use]
    pub fn messages(&self) -> &[ModelRequest] {
        &self.messages
    }

    /// Number of request bundles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the history is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Iterate over the request bundles in order.
    pub fn iter(&self) -> impl Iterator<Item = &ModelRequest> {
        self.messages.iter()
    }

    /// Iterate over all parts across all bundles, in order.
    pub fn parts(&self) -> impl Iterator<Item = &ModelRequestPart> {
        self.messages.iter().flat_map(|m| m.parts.iter())
    }
}

impl Extend<ModelRequest> for ConversationHistory {
    fn extend<T: IntoIterator<Item = ModelRequest>>(&mut self, iter: T) {
        self.messages.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::ToolReturnPart;

    #[test]
    fn test_push_order() {
        let mut history = ConversationHistory::new();
        history.push_system("instructions");
        history.push_user("Northwind Standard");

        let mut returns = ModelRequest::new();
        returns.add_tool_return(ToolReturnPart::new("search_plan_docs", "plan text"));
        history.push(returns);

        assert_eq!(history.len(), 3);
        let kinds: Vec<_> = history
            .parts()
            .map(|p| match p {
                ModelRequestPart::SystemPrompt(_) => "system",
                ModelRequestPart::UserPrompt(_) => "user",
                ModelRequestPart::ToolReturn(_) => "tool",
                ModelRequestPart::RetryPrompt(_) => "retry",
                ModelRequestPart::AssistantEcho(_) => "echo",
            })
            .collect();
        assert_eq!(kinds, vec!["system", "user", "tool"]);
    }

    #[test]
    fn test_empty() {
        let history = ConversationHistory::new();
        assert!(history.is_empty());
        assert_eq!(history.len(), 0);
    }
}
