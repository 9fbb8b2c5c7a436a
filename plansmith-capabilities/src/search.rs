//! The document-search capability.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use tracing::info;

use plansmith_models::{AgentSpec, RemoteTool, RunOutcome, SessionClient};
use plansmith_tools::{
    CapabilityDescriptor, CapabilityHandler, CapabilityOutput, SchemaBuilder, ToolError,
};

const INSTRUCTIONS: &str =
    "You are a helpful agent that is an expert at searching health plan documents.";

/// Searches the plan-document index for information about one plan.
///
/// Opens an isolated remote session scoped to the single query, with the
/// document-search tool attached; the session is torn down before the call
/// returns.
#[derive(Debug, Clone)]
pub struct SearchCapability {
    sessions: Arc<SessionClient>,
    model: String,
    connection_id: String,
    index_name: String,
}

#[derive(Debug, Deserialize)]
struct SearchArgs {
    plan_name: String,
}

impl SearchCapability {
    /// Registered capability name.
    pub const NAME: &'static str = "search_plan_docs";

    /// Create a new search capability.
    pub fn new(
        sessions: Arc<SessionClient>,
        model: impl Into<String>,
        connection_id: impl Into<String>,
        index_name: impl Into<String>,
    ) -> Self {
        Self {
            sessions,
            model: model.into(),
            connection_id: connection_id.into(),
            index_name: index_name.into(),
        }
    }

    /// The descriptor advertised to the orchestrating model.
    #[must_use]
    pub fn descriptor() -> CapabilityDescriptor {
        CapabilityDescriptor::new(Self::NAME, "An agent that searches health plan documents.")
            .with_parameters(
                SchemaBuilder::new()
                    .string("plan_name", "The name of the health plan to search for.", true)
                    .build(),
            )
    }

    /// Search for information about `plan_name`.
    ///
    /// A failed remote run yields a deterministic error-tagged string, not
    /// an error; resource cleanup happens either way.
    pub async fn search(&self, plan_name: &str) -> Result<String, ToolError> {
        info!(plan_name, "invoking search agent");

        let spec = AgentSpec::new(&self.model, "search-agent", INSTRUCTIONS).with_tool(
            RemoteTool::DocumentSearch {
                connection_id: self.connection_id.clone(),
                index_name: self.index_name.clone(),
            },
        );

        let result = self
            .sessions
            .run_scoped(&spec, &format!("Tell me about the {plan_name} plan."))
            .await
            .map_err(|e| ToolError::execution_failed(e.to_string()))?;

        Ok(match result.outcome {
            RunOutcome::Completed => result
                .reply
                .unwrap_or_else(|| "[search completed but returned no reply]".to_string()),
            RunOutcome::Failed { error } => format!("[search failed: {error}]"),
        })
    }
}

#[async_trait]
impl CapabilityHandler for SearchCapability {
    async fn invoke(&self, args: JsonValue) -> Result<CapabilityOutput, ToolError> {
        let args: SearchArgs = serde_json::from_value(args)
            .map_err(|e| ToolError::invalid_args(format!("search_plan_docs: {e}")))?;
        Ok(self.search(&args.plan_name).await?.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn capability_for(server: &MockServer) -> SearchCapability {
        let sessions = Arc::new(
            SessionClient::new(server.uri(), "v", "k")
                .with_poll_interval(std::time::Duration::from_millis(5)),
        );
        SearchCapability::new(sessions, "gpt-4o", "conn_1", "healthplan-index")
    }

    #[test]
    fn test_descriptor_shape() {
        let d = SearchCapability::descriptor();
        assert_eq!(d.name, "search_plan_docs");
        assert!(d.parameters.is_required("plan_name"));
    }

    #[tokio::test]
    async fn test_invalid_args_rejected() {
        let server = MockServer::start().await;
        let capability = capability_for(&server);

        let err = capability
            .invoke(json!({"plan": "wrong key"}))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
        // No remote call was attempted.
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_run_folds_into_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/assistants"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "asst_1"})))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"deleted": true})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/threads"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "thread_1"})))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/threads/thread_1/messages"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "msg_1"})))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/threads/thread_1/runs"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "run_1",
                "status": "failed",
                "last_error": {"code": "server_error", "message": "index unavailable"}
            })))
            .mount(&server)
            .await;

        let capability = capability_for(&server);
        let out = capability
            .invoke(json!({"plan_name": "Northwind Standard"}))
            .await
            .unwrap();

        assert!(out.content.contains("[search failed:"));
        assert!(out.content.contains("index unavailable"));
    }

    #[tokio::test]
    async fn test_prompt_references_plan_name() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/assistants"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "asst_1"})))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"deleted": true})))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/threads"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "thread_1"})))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/threads/thread_1/messages"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "msg_1"})))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/threads/thread_1/runs"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "run_1", "status": "completed", "last_error": null
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/threads/thread_1/messages"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{"role": "assistant", "content": [
                    {"type": "text", "text": {"value": "Northwind Standard covers..."}}
                ]}]
            })))
            .mount(&server)
            .await;

        let capability = capability_for(&server);
        let out = capability.search("Northwind Standard").await.unwrap();
        assert_eq!(out, "Northwind Standard covers...");

        let requests = server.received_requests().await.unwrap();
        let message_req = requests
            .iter()
            .find(|r| r.url.path() == "/threads/thread_1/messages" && r.method.as_str() == "POST")
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&message_req.body).unwrap();
        assert_eq!(body["content"], "Tell me about the Northwind Standard plan.");
    }
}
