//! Environment-based configuration.
//!
//! Endpoints, credentials, and deployment names are injected through the
//! process environment before the session starts. Missing required
//! variables fail at startup with a clear message rather than mid-turn.

use std::path::PathBuf;

use anyhow::{anyhow, Result};

use plansmith_models::{AzureChatModel, SessionClient};

/// Resolved session configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Chat endpoint for the orchestrating model.
    pub chat_endpoint: String,
    /// Chat API key.
    pub chat_api_key: String,
    /// Chat API version.
    pub chat_api_version: String,
    /// Chat deployment name.
    pub chat_deployment: String,
    /// Agent service endpoint.
    pub agents_endpoint: String,
    /// Agent service API key.
    pub agents_api_key: String,
    /// Agent service API version.
    pub agents_api_version: String,
    /// Connection id of the document-search resource.
    pub search_connection_id: String,
    /// Name of the plan-document index.
    pub search_index: String,
    /// Directory report artifacts are written into.
    pub output_dir: PathBuf,
}

fn required(name: &'static str) -> Result<String> {
    std::env::var(name).map_err(|_| anyhow!("{name} is not set"))
}

fn optional(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

impl Config {
    /// Load configuration from the environment.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            chat_endpoint: required("PLANSMITH_CHAT_ENDPOINT")?,
            chat_api_key: required("PLANSMITH_CHAT_API_KEY")?,
            chat_api_version: optional(
                "PLANSMITH_CHAT_API_VERSION",
                AzureChatModel::DEFAULT_API_VERSION,
            ),
            chat_deployment: optional("PLANSMITH_CHAT_DEPLOYMENT", "gpt-4o"),
            agents_endpoint: required("PLANSMITH_AGENTS_ENDPOINT")?,
            agents_api_key: required("PLANSMITH_AGENTS_API_KEY")?,
            agents_api_version: optional(
                "PLANSMITH_AGENTS_API_VERSION",
                SessionClient::DEFAULT_API_VERSION,
            ),
            search_connection_id: required("PLANSMITH_SEARCH_CONNECTION_ID")?,
            search_index: optional("PLANSMITH_SEARCH_INDEX", "healthplan-index"),
            output_dir: PathBuf::from(optional("PLANSMITH_OUTPUT_DIR", ".")),
        })
    }
}
