//! # plansmith-agent
//!
//! The orchestrator: one injected chat model, one capability registry, and
//! a per-turn loop that lets the model decide which capabilities to invoke
//! before it emits its structured final answer.
//!
//! One turn is the state machine
//!
//! ```text
//! AwaitingModel -> (ToolCallRequested -> CapabilityDispatch -> AwaitingModel)* -> FinalAnswer
//! ```
//!
//! bounded by a capability-round cap so a model that never stops asking for
//! tools cannot loop forever. The final answer must parse strictly as a
//! [`plansmith_output::TurnAnswer`]; anything else is a protocol violation.
//!
//! ## Example
//!
//! ```rust,no_run
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! use std::sync::Arc;
//! use plansmith_agent::Orchestrator;
//! use plansmith_core::ConversationHistory;
//! use plansmith_models::AzureChatModel;
//! use plansmith_tools::CapabilityRegistry;
//!
//! let model = Arc::new(AzureChatModel::from_env("gpt-4o")?);
//! let orchestrator = Orchestrator::builder()
//!     .model(model)
//!     .registry(CapabilityRegistry::new())
//!     .build()?;
//!
//! let mut history = ConversationHistory::new();
//! let result = orchestrator.process_turn(&mut history, "Northwind Standard").await?;
//! println!("{}", result.answer.content);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod builder;
pub mod errors;
pub mod orchestrator;
pub mod turn;

pub use builder::{BuildError, OrchestratorBuilder};
pub use errors::OrchestratorError;
pub use orchestrator::{Orchestrator, DEFAULT_INSTRUCTIONS};
pub use turn::TurnResult;
