//! The report-writing capability.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use tracing::info;

use plansmith_models::{AgentSpec, RunOutcome, SessionClient};
use plansmith_tools::{
    CapabilityDescriptor, CapabilityHandler, CapabilityOutput, SchemaBuilder, ToolError,
};

const INSTRUCTIONS: &str =
    "You are a helpful agent that is an expert at writing detailed reports about health plans.";

/// Writes a detailed report about one plan from previously gathered
/// information. Same single-shot, guaranteed-teardown pattern as search,
/// with no extra tool attached.
#[derive(Debug, Clone)]
pub struct ReportCapability {
    sessions: Arc<SessionClient>,
    model: String,
}

#[derive(Debug, Deserialize)]
struct ReportArgs {
    plan_name: String,
    plan_info: String,
}

impl ReportCapability {
    /// Registered capability name.
    pub const NAME: &'static str = "write_report";

    /// Create a new report capability.
    pub fn new(sessions: Arc<SessionClient>, model: impl Into<String>) -> Self {
        Self {
            sessions,
            model: model.into(),
        }
    }

    /// The descriptor advertised to the orchestrating model.
    #[must_use]
    pub fn descriptor() -> CapabilityDescriptor {
        CapabilityDescriptor::new(
            Self::NAME,
            "An agent that writes detailed reports about health plans.",
        )
        .with_parameters(
            SchemaBuilder::new()
                .string("plan_name", "The name of the health plan to report on.", true)
                .string(
                    "plan_info",
                    "The information about the plan to include in the report.",
                    true,
                )
                .build(),
        )
    }

    /// Write a report about `plan_name` from `plan_info`.
    pub async fn write_report(&self, plan_name: &str, plan_info: &str) -> Result<String, ToolError> {
        info!(plan_name, "invoking report agent");

        let spec = AgentSpec::new(&self.model, "report-agent", INSTRUCTIONS);
        let message = format!(
            "Write a detailed report about the {plan_name} plan. Make sure to include \
             information about coverage exclusions. Here is the relevant information \
             for the plan: {plan_info}."
        );

        let result = self
            .sessions
            .run_scoped(&spec, &message)
            .await
            .map_err(|e| ToolError::execution_failed(e.to_string()))?;

        Ok(match result.outcome {
            RunOutcome::Completed => result
                .reply
                .unwrap_or_else(|| "[report agent returned no reply]".to_string()),
            RunOutcome::Failed { error } => format!("[report failed: {error}]"),
        })
    }
}

#[async_trait]
impl CapabilityHandler for ReportCapability {
    async fn invoke(&self, args: JsonValue) -> Result<CapabilityOutput, ToolError> {
        let args: ReportArgs = serde_json::from_value(args)
            .map_err(|e| ToolError::invalid_args(format!("write_report: {e}")))?;
        Ok(self
            .write_report(&args.plan_name, &args.plan_info)
            .await?
            .into())
    }
}
