//! Token and call accounting for a turn.

use serde::{Deserialize, Serialize};

/// Token usage reported for a single model request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestUsage {
    /// Tokens in the request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_tokens: Option<u64>,
    /// Tokens in the response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_tokens: Option<u64>,
    /// Total tokens.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_tokens: Option<u64>,
}

impl RequestUsage {
    /// Create usage with request/response token counts.
    #[must_use]
    pub fn with_tokens(request_tokens: u64, response_tokens: u64) -> Self {
        Self {
            request_tokens: Some(request_tokens),
            response_tokens: Some(response_tokens),
            total_tokens: Some(request_tokens + response_tokens),
        }
    }
}

/// Accumulated usage across one orchestrator turn.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunUsage {
    /// Number of model requests made.
    pub requests: u32,
    /// Number of capability invocations dispatched.
    pub capability_calls: u32,
    /// Accumulated request tokens.
    pub request_tokens: u64,
    /// Accumulated response tokens.
    pub response_tokens: u64,
    /// Accumulated total tokens.
    pub total_tokens: u64,
}

impl RunUsage {
    /// Create new empty usage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one model request's usage.
    pub fn add_request(&mut self, usage: &RequestUsage) {
        self.requests += 1;
        self.request_tokens += usage.request_tokens.unwrap_or(0);
        self.response_tokens += usage.response_tokens.unwrap_or(0);
        self.total_tokens += usage.total_tokens.unwrap_or(0);
    }

    /// Record a capability invocation.
    pub fn record_capability_call(&mut self) {
        self.capability_calls += 1;
    }
}
