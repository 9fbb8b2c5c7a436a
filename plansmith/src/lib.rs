//! # plansmith
//!
//! A small multi-agent report pipeline: an orchestrating chat model
//! decides, via function calling, when to invoke three sub-capabilities
//! (document search, report writing, validation) and gates its final
//! answer on the validation verdict.
//!
//! This crate is the facade over the workspace:
//!
//! - [`core`]: messages, conversation history, settings, usage
//! - [`tools`]: capability descriptors, registry, handler contract
//! - [`retries`]: bounded retry with backoff for transient failures
//! - [`output`]: strict structured-answer parsing, verdict normalization
//! - [`models`]: the chat-model boundary, Azure provider, agent sessions
//! - [`capabilities`]: the search / report / validation invokers
//! - [`agent`]: the orchestrator and its per-turn loop
//!
//! ## Example
//!
//! ```rust,no_run
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! use std::sync::Arc;
//! use plansmith::prelude::*;
//!
//! let model = Arc::new(AzureChatModel::from_env("gpt-4o")?);
//! let sessions = Arc::new(SessionClient::from_env()?);
//! let registry = plansmith::capabilities::standard_registry(
//!     sessions,
//!     &CapabilityConfig {
//!         model: "gpt-4o".into(),
//!         search_connection_id: "conn".into(),
//!         search_index: "healthplan-index".into(),
//!     },
//! );
//!
//! let orchestrator = Orchestrator::builder()
//!     .model(model)
//!     .registry(registry)
//!     .build()?;
//!
//! let mut history = ConversationHistory::new();
//! let result = orchestrator
//!     .process_turn(&mut history, "Northwind Standard")
//!     .await?;
//!
//! if result.answer.report_generated {
//!     println!("{}", result.answer.content);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub use plansmith_agent as agent;
pub use plansmith_capabilities as capabilities;
pub use plansmith_core as core;
pub use plansmith_models as models;
pub use plansmith_output as output;
pub use plansmith_retries as retries;
pub use plansmith_tools as tools;

/// Prelude with the types most consumers need.
pub mod prelude {
    pub use plansmith_agent::{Orchestrator, OrchestratorBuilder, OrchestratorError, TurnResult};
    pub use plansmith_capabilities::{
        CapabilityConfig, ReportCapability, SearchCapability, ValidationCapability,
    };
    pub use plansmith_core::{
        ConversationHistory, ModelRequest, ModelResponse, ModelSettings, RunUsage,
    };
    pub use plansmith_models::{
        AzureChatModel, ChatModel, FunctionModel, MockModel, ModelError, SessionClient,
    };
    pub use plansmith_output::{OutputParseError, TurnAnswer, Verdict};
    pub use plansmith_retries::ExponentialBackoff;
    pub use plansmith_tools::{
        CapabilityDescriptor, CapabilityHandler, CapabilityRegistry, ToolError,
    };
}
