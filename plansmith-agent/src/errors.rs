//! Orchestrator error types.

use plansmith_models::ModelError;
use plansmith_output::OutputParseError;
use thiserror::Error;

/// Errors that can end a turn without a structured answer.
///
/// Capability failures are deliberately absent: a failed sub-capability is
/// reported back to the model as its result text so the model can reason
/// about it, and the turn still completes.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// The remote model call failed after retries.
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    /// The model requested a capability that is not registered.
    ///
    /// The catalog and the registry are built from the same descriptors,
    /// so this indicates broken configuration and aborts the turn.
    #[error("Model requested unknown capability '{0}'")]
    UnknownCapability(String),

    /// The final answer was not a well-formed structured answer.
    #[error("Protocol violation in final answer: {0}")]
    Protocol(#[source] OutputParseError),

    /// The model kept requesting capabilities past the round cap.
    #[error("Capability round cap exceeded after {rounds} rounds")]
    CapabilityRoundsExceeded {
        /// The configured cap.
        rounds: u32,
    },

    /// The user input was empty.
    #[error("User input is empty")]
    EmptyInput,
}

impl OrchestratorError {
    /// Whether this error indicates a protocol violation.
    #[must_use]
    pub fn is_protocol_violation(&self) -> bool {
        matches!(self, Self::Protocol(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = OrchestratorError::UnknownCapability("summon_dragons".into());
        assert!(err.to_string().contains("summon_dragons"));

        let err = OrchestratorError::CapabilityRoundsExceeded { rounds: 8 };
        assert!(err.to_string().contains('8'));
    }

    #[test]
    fn test_protocol_flag() {
        let parse_err = plansmith_output::TurnAnswer::parse_strict("not json").unwrap_err();
        assert!(OrchestratorError::Protocol(parse_err).is_protocol_violation());
        assert!(!OrchestratorError::EmptyInput.is_protocol_violation());
    }
}
