//! Per-turn execution.
//!
//! One call to [`Orchestrator::process_turn`] runs the whole state machine
//! for a user turn: submit history, dispatch any capability invocations the
//! model requests, resubmit, and finally parse the structured answer.

use std::sync::Arc;

use tracing::{debug, info, warn};

use plansmith_core::{
    generate_run_id, AssistantEcho, ConversationHistory, ModelRequest, ModelRequestPart,
    ModelResponse, RunUsage, ToolCallPart, ToolReturnPart,
};
use plansmith_models::RequestParameters;
use plansmith_output::TurnAnswer;
use plansmith_retries::with_retry;

use crate::errors::OrchestratorError;
use crate::orchestrator::Orchestrator;

/// Result of one completed turn.
#[derive(Debug, Clone)]
pub struct TurnResult {
    /// The parsed structured answer.
    pub answer: TurnAnswer,
    /// Every model response observed during the turn, in order.
    pub responses: Vec<ModelResponse>,
    /// Usage accumulated across the turn.
    pub usage: RunUsage,
    /// Unique id of this turn.
    pub run_id: String,
}

impl Orchestrator {
    /// Process one user turn.
    ///
    /// Appends the user message to `history`, then loops: submit the full
    /// ordered history plus the capability catalog; if the model requests
    /// invocations, dispatch them sequentially in the order returned and
    /// append each result to history before resubmitting. The loop ends
    /// when the model answers with text, which must parse strictly as a
    /// [`TurnAnswer`], or when the round cap is hit.
    ///
    /// A failed capability does not end the turn: its failure text becomes
    /// the capability result and the model decides what to do with it. An
    /// unknown capability name does end the turn; the catalog and registry
    /// are built from the same descriptors, so a name mismatch is broken
    /// configuration, not something to paper over.
    ///
    /// # Errors
    ///
    /// See [`OrchestratorError`] for the failure taxonomy.
    pub async fn process_turn(
        &self,
        history: &mut ConversationHistory,
        user_input: &str,
    ) -> Result<TurnResult, OrchestratorError> {
        let input = user_input.trim();
        if input.is_empty() {
            return Err(OrchestratorError::EmptyInput);
        }

        let run_id = generate_run_id();
        info!(run_id = %run_id, "starting turn");

        if history.is_empty() {
            history.push_system(&self.instructions);
        }
        history.push_user(input);

        let params = RequestParameters::new().with_capabilities_arc(Arc::clone(&self.catalog));
        let mut usage = RunUsage::new();
        let mut responses: Vec<ModelResponse> = Vec::new();
        let mut rounds: u32 = 0;

        loop {
            let submitted: &ConversationHistory = history;
            let response = with_retry(&self.retry, || {
                self.model.request(submitted, &self.settings, &params)
            })
            .await?;

            if let Some(u) = &response.usage {
                usage.add_request(u);
            }
            responses.push(response.clone());

            let calls: Vec<ToolCallPart> = response.tool_calls().cloned().collect();

            if calls.is_empty() {
                let text = response.text_content();
                history.push(echo_bundle(response));

                let answer =
                    TurnAnswer::parse_strict(&text).map_err(OrchestratorError::Protocol)?;
                info!(
                    run_id = %run_id,
                    report_generated = answer.report_generated,
                    rounds,
                    "turn complete"
                );
                return Ok(TurnResult {
                    answer,
                    responses,
                    usage,
                    run_id,
                });
            }

            rounds += 1;
            if rounds > self.max_capability_rounds {
                warn!(run_id = %run_id, rounds, "capability round cap exceeded");
                return Err(OrchestratorError::CapabilityRoundsExceeded {
                    rounds: self.max_capability_rounds,
                });
            }

            // Echo the assistant response into the history first so the
            // tool results that follow answer a visible assistant message.
            history.push(echo_bundle(response));

            // Sequential dispatch in the order the model returned the
            // calls; later calls may depend on earlier results.
            let mut returns = ModelRequest::new();
            for call in calls {
                usage.record_capability_call();
                debug!(capability = %call.tool_name, "dispatching capability");

                let content = match self.registry.call(&call.tool_name, call.args.clone()).await {
                    Ok(out) => out.content,
                    Err(e) if e.is_not_found() => {
                        return Err(OrchestratorError::UnknownCapability(call.tool_name));
                    }
                    Err(e) => {
                        warn!(capability = %call.tool_name, error = %e, "capability failed");
                        format!("[capability '{}' failed: {e}]", call.tool_name)
                    }
                };

                let mut part = ToolReturnPart::new(&call.tool_name, content);
                if let Some(id) = call.tool_call_id {
                    part = part.with_tool_call_id(id);
                }
                returns.add_tool_return(part);
            }
            history.push(returns);
        }
    }
}

fn echo_bundle(response: ModelResponse) -> ModelRequest {
    ModelRequest::with_parts(vec![ModelRequestPart::AssistantEcho(AssistantEcho::new(
        response,
    ))])
}
