//! Client for the hosted agent service.
//!
//! Sub-capabilities use a single-shot pattern: create an ephemeral agent,
//! open a thread, post one message, run to completion, read the last
//! assistant reply, and delete the agent. Agents are never reused across
//! calls; [`SessionClient::run_scoped`] guarantees the delete happens on
//! every path, success or failure.
//!
//! ## Environment Variables
//!
//! - `PLANSMITH_AGENTS_ENDPOINT` - agent service endpoint
//! - `PLANSMITH_AGENTS_API_KEY` - API key
//! - `PLANSMITH_AGENTS_API_VERSION` - optional API version

pub mod types;

use std::time::Duration;

use reqwest::Client;
use serde_json::{json, Value as JsonValue};
use tokio::time::{sleep, Instant};
use tracing::{debug, warn};

use crate::error::ModelError;
use self::types::*;

/// Specification for an ephemeral remote agent.
#[derive(Debug, Clone)]
pub struct AgentSpec {
    /// Model deployment the agent runs on.
    pub model: String,
    /// Agent display name.
    pub name: String,
    /// System instructions.
    pub instructions: String,
    /// Tools attached to the agent.
    pub tools: Vec<RemoteTool>,
}

impl AgentSpec {
    /// Create a new spec with no tools.
    pub fn new(
        model: impl Into<String>,
        name: impl Into<String>,
        instructions: impl Into<String>,
    ) -> Self {
        Self {
            model: model.into(),
            name: name.into(),
            instructions: instructions.into(),
            tools: Vec::new(),
        }
    }

    /// Attach a tool.
    #[must_use]
    pub fn with_tool(mut self, tool: RemoteTool) -> Self {
        self.tools.push(tool);
        self
    }
}

/// A tool hosted by the agent service itself.
#[derive(Debug, Clone)]
pub enum RemoteTool {
    /// Search over an indexed document collection.
    DocumentSearch {
        /// Connection id of the search resource.
        connection_id: String,
        /// Name of the index to query.
        index_name: String,
    },
}

impl RemoteTool {
    fn definition(&self) -> JsonValue {
        match self {
            Self::DocumentSearch { .. } => json!({"type": "azure_ai_search"}),
        }
    }

    fn resources(&self) -> Option<JsonValue> {
        match self {
            Self::DocumentSearch {
                connection_id,
                index_name,
            } => Some(json!({
                "azure_ai_search": {
                    "indexes": [{
                        "index_connection_id": connection_id,
                        "index_name": index_name,
                    }]
                }
            })),
        }
    }
}

/// Handle to a live remote agent.
#[derive(Debug, Clone)]
pub struct RemoteAgent {
    /// Agent id.
    pub id: String,
}

/// Terminal outcome of a remote run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The run finished successfully.
    Completed,
    /// The run reported a terminal failure.
    Failed {
        /// The service's failure description.
        error: String,
    },
}

impl RunOutcome {
    /// Whether the run completed successfully.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

/// Result of a scoped single-shot run.
#[derive(Debug, Clone)]
pub struct ScopedRunResult {
    /// How the run ended.
    pub outcome: RunOutcome,
    /// The last assistant reply, if any was produced.
    pub reply: Option<String>,
}

/// REST client for the hosted agent service.
#[derive(Debug, Clone)]
pub struct SessionClient {
    endpoint: String,
    api_version: String,
    api_key: String,
    client: Client,
    poll_interval: Duration,
    run_deadline: Duration,
}

impl SessionClient {
    /// Default API version.
    pub const DEFAULT_API_VERSION: &'static str = "2024-12-01-preview";

    /// Create a new session client.
    pub fn new(
        endpoint: impl Into<String>,
        api_version: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            api_version: api_version.into(),
            api_key: api_key.into(),
            client: Client::new(),
            poll_interval: Duration::from_millis(800),
            run_deadline: Duration::from_secs(120),
        }
    }

    /// Create from environment variables.
    pub fn from_env() -> Result<Self, ModelError> {
        let endpoint = std::env::var("PLANSMITH_AGENTS_ENDPOINT")
            .map_err(|_| ModelError::configuration("PLANSMITH_AGENTS_ENDPOINT not set"))?;
        let api_key = std::env::var("PLANSMITH_AGENTS_API_KEY")
            .map_err(|_| ModelError::configuration("PLANSMITH_AGENTS_API_KEY not set"))?;
        let api_version = std::env::var("PLANSMITH_AGENTS_API_VERSION")
            .unwrap_or_else(|_| Self::DEFAULT_API_VERSION.to_string());

        Ok(Self::new(endpoint, api_version, api_key))
    }

    /// Set the run polling interval.
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Set the overall deadline for one remote run.
    #[must_use]
    pub fn with_run_deadline(mut self, deadline: Duration) -> Self {
        self.run_deadline = deadline;
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.endpoint, path)
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ModelError>
    where
        B: serde::Serialize + ?Sized,
        T: serde::de::DeserializeOwned,
    {
        let response = self
            .client
            .post(self.url(path))
            .query(&[("api-version", self.api_version.as_str())])
            .header("api-key", &self.api_key)
            .json(body)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn get<T>(&self, path: &str, extra_query: &[(&str, &str)]) -> Result<T, ModelError>
    where
        T: serde::de::DeserializeOwned,
    {
        let response = self
            .client
            .get(self.url(path))
            .query(&[("api-version", self.api_version.as_str())])
            .query(extra_query)
            .header("api-key", &self.api_key)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn decode<T>(response: reqwest::Response) -> Result<T, ModelError>
    where
        T: serde::de::DeserializeOwned,
    {
        let status = response.status().as_u16();
        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(match status {
                401 | 403 => ModelError::auth(body),
                429 => ModelError::rate_limited(None),
                _ => ModelError::http(status, body),
            });
        }
        response
            .json()
            .await
            .map_err(|e| ModelError::invalid_response(e.to_string()))
    }

    /// Create an ephemeral agent.
    pub async fn create_agent(&self, spec: &AgentSpec) -> Result<RemoteAgent, ModelError> {
        let tools: Vec<JsonValue> = spec.tools.iter().map(RemoteTool::definition).collect();
        let tool_resources = spec.tools.iter().find_map(RemoteTool::resources);

        let agent: AgentObject = self
            .post(
                "/assistants",
                &CreateAgentRequest {
                    model: spec.model.clone(),
                    name: spec.name.clone(),
                    instructions: spec.instructions.clone(),
                    tools,
                    tool_resources,
                },
            )
            .await?;

        debug!(agent_id = %agent.id, name = %spec.name, "created remote agent");
        Ok(RemoteAgent { id: agent.id })
    }

    /// Delete an agent.
    pub async fn delete_agent(&self, agent: &RemoteAgent) -> Result<(), ModelError> {
        let response = self
            .client
            .delete(self.url(&format!("/assistants/{}", agent.id)))
            .query(&[("api-version", self.api_version.as_str())])
            .header("api-key", &self.api_key)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ModelError::http(status, body));
        }
        debug!(agent_id = %agent.id, "deleted remote agent");
        Ok(())
    }

    /// Create a conversation thread.
    pub async fn create_thread(&self) -> Result<String, ModelError> {
        let thread: ThreadObject = self.post("/threads", &json!({})).await?;
        Ok(thread.id)
    }

    /// Post a user message to a thread.
    pub async fn post_message(&self, thread_id: &str, content: &str) -> Result<(), ModelError> {
        let _: MessageObject = self
            .post(
                &format!("/threads/{thread_id}/messages"),
                &CreateMessageRequest {
                    role: "user".to_string(),
                    content: content.to_string(),
                },
            )
            .await?;
        Ok(())
    }

    /// Start a run and poll until it reaches a terminal state.
    ///
    /// Polling is bounded by the client's run deadline; exceeding it is a
    /// [`ModelError::Timeout`].
    pub async fn run_to_completion(
        &self,
        thread_id: &str,
        agent: &RemoteAgent,
    ) -> Result<RunOutcome, ModelError> {
        let run: RunObject = self
            .post(
                &format!("/threads/{thread_id}/runs"),
                &CreateRunRequest {
                    assistant_id: agent.id.clone(),
                },
            )
            .await?;

        let started = Instant::now();
        let mut status = run.status;
        let mut last_error = run.last_error;

        loop {
            match status.as_str() {
                "completed" => return Ok(RunOutcome::Completed),
                "failed" | "cancelled" | "expired" => {
                    let error = last_error
                        .and_then(|e| e.message)
                        .unwrap_or_else(|| format!("run ended with status '{status}'"));
                    return Ok(RunOutcome::Failed { error });
                }
                _ => {}
            }

            if started.elapsed() >= self.run_deadline {
                return Err(ModelError::Timeout(self.run_deadline));
            }
            sleep(self.poll_interval).await;

            let polled: RunObject = self
                .get(&format!("/threads/{thread_id}/runs/{}", run.id), &[])
                .await?;
            status = polled.status;
            last_error = polled.last_error;
        }
    }

    /// Fetch the most recent assistant message in a thread.
    pub async fn last_assistant_message(
        &self,
        thread_id: &str,
    ) -> Result<Option<String>, ModelError> {
        let list: MessageList = self
            .get(
                &format!("/threads/{thread_id}/messages"),
                &[("order", "desc"), ("limit", "20")],
            )
            .await?;

        Ok(list
            .data
            .iter()
            .find(|m| m.role == "assistant")
            .map(ThreadMessage::text))
    }

    /// Run a closure against an ephemeral agent, deleting it afterwards.
    ///
    /// The delete happens whether the closure succeeds or fails. A delete
    /// failure after a successful closure is logged, not surfaced: the
    /// result is already in hand and the service expires orphans itself.
    pub async fn with_agent<F, Fut, T>(&self, spec: &AgentSpec, f: F) -> Result<T, ModelError>
    where
        F: FnOnce(RemoteAgent) -> Fut,
        Fut: std::future::Future<Output = Result<T, ModelError>>,
    {
        let agent = self.create_agent(spec).await?;
        let result = f(agent.clone()).await;

        if let Err(delete_err) = self.delete_agent(&agent).await {
            warn!(agent_id = %agent.id, error = %delete_err, "failed to delete remote agent");
        }

        result
    }

    /// The full single-shot pattern: agent, thread, one message, run,
    /// last reply, unconditional teardown.
    pub async fn run_scoped(
        &self,
        spec: &AgentSpec,
        user_message: &str,
    ) -> Result<ScopedRunResult, ModelError> {
        self.with_agent(spec, |agent| async move {
            let thread_id = self.create_thread().await?;
            self.post_message(&thread_id, user_message).await?;

            let outcome = self.run_to_completion(&thread_id, &agent).await?;
            let reply = match &outcome {
                RunOutcome::Completed => self.last_assistant_message(&thread_id).await?,
                RunOutcome::Failed { .. } => None,
            };

            Ok(ScopedRunResult { outcome, reply })
        })
        .await
    }
}
