//! Interactive plan-report session.
//!
//! Reads plan names from stdin one line at a time, runs each through the
//! orchestrator, and writes the report artifact only when the structured
//! answer says one was generated.
//!
//! Run with:
//! ```bash
//! PLANSMITH_CHAT_ENDPOINT=... PLANSMITH_CHAT_API_KEY=... \
//! PLANSMITH_AGENTS_ENDPOINT=... PLANSMITH_AGENTS_API_KEY=... \
//! PLANSMITH_SEARCH_CONNECTION_ID=... cargo run -p plansmith-cli
//! ```

mod artifact;
mod config;

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use plansmith_agent::{Orchestrator, OrchestratorError};
use plansmith_capabilities::{standard_registry, CapabilityConfig};
use plansmith_core::ConversationHistory;
use plansmith_models::{AzureChatModel, SessionClient};
use plansmith_output::TurnAnswer;

use config::Config;

const PROMPT: &str = "Please give me the name of a health insurance policy and I will \
     generate a report for you. Type 'exit' to end the conversation: ";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;

    let model = Arc::new(AzureChatModel::new(
        &config.chat_deployment,
        &config.chat_endpoint,
        &config.chat_api_version,
        &config.chat_api_key,
    ));
    let sessions = Arc::new(SessionClient::new(
        &config.agents_endpoint,
        &config.agents_api_version,
        &config.agents_api_key,
    ));
    let registry = standard_registry(
        sessions,
        &CapabilityConfig {
            model: config.chat_deployment.clone(),
            search_connection_id: config.search_connection_id.clone(),
            search_index: config.search_index.clone(),
        },
    );

    let orchestrator = Orchestrator::builder()
        .model(model)
        .registry(registry)
        .build()?;

    info!(model = %orchestrator.model().identifier(), "orchestrator ready");
    run_session(&orchestrator, &config.output_dir).await
}

async fn run_session(orchestrator: &Orchestrator, output_dir: &Path) -> Result<()> {
    let mut history = ConversationHistory::new();
    let stdin = io::stdin();

    loop {
        print!("{PROMPT}");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            // EOF ends the session like an explicit exit.
            break;
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if input.eq_ignore_ascii_case("exit") {
            break;
        }

        match orchestrator.process_turn(&mut history, input).await {
            Ok(result) => match handle_answer(input, &result.answer, output_dir) {
                Ok(Some(path)) => {
                    println!(
                        "The report for {input} has been generated. Please check {} for the report.",
                        path.display()
                    );
                }
                Ok(None) => println!("{}", result.answer.content),
                Err(err) => eprintln!("Failed to save the report: {err:#}"),
            },
            Err(err @ OrchestratorError::Protocol(_)) => {
                eprintln!("The model returned an answer that could not be parsed: {err}");
            }
            Err(err) => {
                eprintln!("The turn could not be completed: {err}");
            }
        }
    }

    println!("Goodbye.");
    Ok(())
}

/// Act on a structured answer: persist the artifact when a report was
/// generated, otherwise do nothing. No artifact is ever written on an
/// error path.
fn handle_answer(
    plan_name: &str,
    answer: &TurnAnswer,
    output_dir: &Path,
) -> Result<Option<PathBuf>> {
    if !answer.report_generated {
        return Ok(None);
    }
    artifact::write_report(output_dir, plan_name, &answer.content).map(Some)
}
