//! Capability invocation errors.

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while invoking a capability.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The capability ran but failed.
    #[error("Capability execution failed: {message}")]
    ExecutionFailed {
        /// Error message.
        message: String,
        /// Whether the failure is transient.
        retryable: bool,
    },

    /// The model supplied arguments that do not match the schema.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// No capability with the requested name is registered.
    ///
    /// The orchestrator treats this as a fatal configuration error.
    #[error("Unknown capability: {0}")]
    NotFound(String),

    /// The invocation exceeded its deadline.
    #[error("Capability timed out after {0:?}")]
    Timeout(Duration),

    /// Argument (de)serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Other errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ToolError {
    /// Create a non-retryable execution failure.
    #[must_use]
    pub fn execution_failed(msg: impl Into<String>) -> Self {
        Self::ExecutionFailed {
            message: msg.into(),
            retryable: false,
        }
    }

    /// Create a retryable execution failure.
    #[must_use]
    pub fn retryable(msg: impl Into<String>) -> Self {
        Self::ExecutionFailed {
            message: msg.into(),
            retryable: true,
        }
    }

    /// Create an invalid-arguments error.
    #[must_use]
    pub fn invalid_args(msg: impl Into<String>) -> Self {
        Self::InvalidArguments(msg.into())
    }

    /// Create an unknown-capability error.
    #[must_use]
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound(name.into())
    }

    /// Check if this error is transient.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::ExecutionFailed { retryable, .. } => *retryable,
            Self::Timeout(_) => true,
            Self::InvalidArguments(_)
            | Self::NotFound(_)
            | Self::Json(_)
            | Self::Other(_) => false,
        }
    }

    /// Whether this is an unknown-capability error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
