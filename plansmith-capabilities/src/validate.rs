//! The report-validation capability.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use tracing::info;

use plansmith_models::{AgentSpec, RunOutcome, SessionClient};
use plansmith_output::Verdict;
use plansmith_tools::{
    CapabilityDescriptor, CapabilityHandler, CapabilityOutput, SchemaBuilder, ToolError,
};

const INSTRUCTIONS: &str = "You are a helpful agent that is an expert at validating that \
     reports meet requirements. Return 'Pass' if the report meets requirements or 'Fail' \
     if it does not meet requirements. You must only return 'Pass' or 'Fail'.";

/// Checks that a generated report meets requirements.
///
/// The remote agent is instructed to answer with exactly `Pass` or `Fail`;
/// the reply is normalized defensively and anything unrecognizable counts
/// as `Fail`. The capability result fed back to the orchestrator is always
/// the canonical token.
#[derive(Debug, Clone)]
pub struct ValidationCapability {
    sessions: Arc<SessionClient>,
    model: String,
}

#[derive(Debug, Deserialize)]
struct ValidateArgs {
    report: String,
}

impl ValidationCapability {
    /// Registered capability name.
    pub const NAME: &'static str = "validate_report";

    /// Create a new validation capability.
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
            "An agent that runs validation checks to ensure the generated report meets \
             requirements. It will return 'Pass' if the report meets requirements or \
             'Fail' if it does not meet requirements.",
        )
        .with_parameters(
            SchemaBuilder::new()
                .string("report", "The generated report to validate.", true)
                .build(),
        )
    }

    /// Validate `report` and return the normalized verdict.
    ///
    /// A failed remote run counts as [`Verdict::Fail`]: an unvalidated
    /// report must never pass the gate.
    pub async fn validate(&self, report: &str) -> Result<Verdict, ToolError> {
        info!("invoking validation agent");

        let spec = AgentSpec::new(&self.model, "validation-agent", INSTRUCTIONS);
        let message = format!(
            "Validate that the generated report includes information about coverage \
             exclusions. Here is the generated report: {report}"
        );

        let result = self
            .sessions
            .run_scoped(&spec, &message)
            .await
            .map_err(|e| ToolError::execution_failed(e.to_string()))?;

        Ok(match result.outcome {
            RunOutcome::Completed => Verdict::normalize(result.reply.as_deref().unwrap_or("")),
            RunOutcome::Failed { .. } => Verdict::Fail,
        })
    }
}

#[async_trait]
impl CapabilityHandler for ValidationCapability {
    async fn invoke(&self, args: JsonValue) -> Result<CapabilityOutput, ToolError> {
        let args: ValidateArgs = serde_json::from_value(args)
            .map_err(|e| ToolError::invalid_args(format!("validate_report: {e}")))?;
        let verdict = self.validate(&args.report).await?;
        Ok(verdict.as_str().into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mount_run_with_reply(server: &MockServer, reply: &str) {
        Mock::given(method("POST"))
            .and(path("/assistants"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "asst_1"})))
            .mount(server)
            .await;
        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"deleted": true})))
            .expect(1)
            .mount(server)
            .await;
        Mock::given(method("POST"))
            .and(path("/threads"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "thread_1"})))
            .mount(server)
            .await;
        Mock::given(method("POST"))
            .and(path("/threads/thread_1/messages"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "msg_1"})))
            .mount(server)
            .await;
        Mock::given(method("POST"))
            .and(path("/threads/thread_1/runs"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "run_1", "status": "completed", "last_error": null
            })))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/threads/thread_1/messages"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{"role": "assistant", "content": [
                    {"type": "text", "text": {"value": reply}}
                ]}]
            })))
            .mount(server)
            .await;
    }

    fn capability_for(server: &MockServer) -> ValidationCapability {
        let sessions = Arc::new(
            SessionClient::new(server.uri(), "v", "k")
                .with_poll_interval(std::time::Duration::from_millis(5)),
        );
        ValidationCapability::new(sessions, "gpt-4o")
    }

    #[tokio::test]
    async fn test_pass_reply_normalized() {
        let server = MockServer::start().await;
        mount_run_with_reply(&server, "pass.").await;

        let out = capability_for(&server)
            .invoke(json!({"report": "Report with exclusions."}))
            .await
            .unwrap();
        assert_eq!(out.content, "Pass");
    }

    #[tokio::test]
    async fn test_rambling_reply_fails_closed() {
        let server = MockServer::start().await;
        mount_run_with_reply(&server, "The report looks great overall!").await;

        let verdict = capability_for(&server)
            .validate("Report text")
            .await
            .unwrap();
        assert_eq!(verdict, Verdict::Fail);
    }

    #[test]
    fn test_descriptor_shape() {
        let d = ValidationCapability::descriptor();
        assert_eq!(d.name, "validate_report");
        assert!(d.parameters.is_required("report"));
    }
}
