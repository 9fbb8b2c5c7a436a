//! The orchestrator type.

use std::sync::Arc;

use plansmith_core::ModelSettings;
use plansmith_models::ChatModel;
use plansmith_retries::ExponentialBackoff;
use plansmith_tools::{CapabilityDescriptor, CapabilityRegistry};

use crate::builder::OrchestratorBuilder;

/// Default system instructions for the orchestrating model.
///
/// The model's role is to delegate: search, then write, then validate, and
/// only emit a report the validation capability passed. The final answer
/// contract is a single JSON object so the calling code can gate artifact
/// creation on it.
pub const DEFAULT_INSTRUCTIONS: &str = "\
You are an agent designed to create detailed reports about health plans. The user \
will provide the name of a health plan and you will create a detailed report about \
it. Do not write the report yourself: you are an orchestrator, and each capability \
available to you is an agent that accomplishes a specific task. Use search_plan_docs \
to gather information about the plan, write_report to produce the report, and \
validate_report to check that the report meets requirements.

Validating the report is critical. If validate_report returns 'Fail', you must not \
output the report; inform the user that the report could not be generated instead.

Respond with a single JSON object and nothing else - no surrounding text, comments, \
or blank lines. Use double quotes for all keys and string values and lowercase \
booleans (true/false). The object has exactly two attributes:

- report_generated: boolean; true if a validated report was produced, false otherwise.
- content: string; the report itself when report_generated is true, otherwise a \
message explaining that the report could not be generated.

Example: {\"report_generated\": false, \"content\": \"The report for the Northwind \
Standard health plan could not be generated as it did not meet the required \
validation standards.\"}";

/// The orchestrator.
///
/// Holds the injected model handle, the capability registry, and the turn
/// policy (settings, round cap, transport retry). Construct with
/// [`Orchestrator::builder`].
pub struct Orchestrator {
    pub(crate) model: Arc<dyn ChatModel>,
    pub(crate) instructions: String,
    pub(crate) registry: CapabilityRegistry,
    pub(crate) settings: ModelSettings,
    pub(crate) max_capability_rounds: u32,
    pub(crate) retry: ExponentialBackoff,
    /// Descriptors are fixed for the session; cache them Arc'd so every
    /// round of every turn reuses the same allocation.
    pub(crate) catalog: Arc<Vec<CapabilityDescriptor>>,
}

impl Orchestrator {
    /// Create a builder.
    #[must_use]
    pub fn builder() -> OrchestratorBuilder {
        OrchestratorBuilder::new()
    }

    /// The injected model.
    #[must_use]
    pub fn model(&self) -> &dyn ChatModel {
        self.model.as_ref()
    }

    /// The system instructions.
    #[must_use]
    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    /// The capability round cap.
    #[must_use]
    pub fn max_capability_rounds(&self) -> u32 {
        self.max_capability_rounds
    }

    /// The capability catalog sent with every request.
    #[must_use]
    pub fn catalog(&self) -> &[CapabilityDescriptor] {
        &self.catalog
    }
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("model", &self.model.identifier())
            .field("capabilities", &self.registry.names())
            .field("max_capability_rounds", &self.max_capability_rounds)
            .finish()
    }
}
