//! # plansmith-capabilities
//!
//! The three sub-capabilities the orchestrating model can invoke:
//!
//! - [`SearchCapability`] - searches indexed plan documents
//! - [`ReportCapability`] - writes a detailed plan report
//! - [`ValidationCapability`] - checks a report against requirements
//!
//! Each wraps one single-shot run against the hosted agent service: an
//! ephemeral agent is created, receives one message, runs to completion,
//! and is deleted again before the call returns, success or failure. A
//! failed remote run is folded into the returned text rather than raised,
//! so the orchestrating model can see what happened and decide how to
//! proceed.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod report;
pub mod search;
pub mod validate;

use std::sync::Arc;

use plansmith_models::SessionClient;
use plansmith_tools::CapabilityRegistry;

pub use report::ReportCapability;
pub use search::SearchCapability;
pub use validate::ValidationCapability;

/// Configuration shared by the standard capabilities.
#[derive(Debug, Clone)]
pub struct CapabilityConfig {
    /// Model deployment the sub-agents run on.
    pub model: String,
    /// Connection id of the search resource.
    pub search_connection_id: String,
    /// Name of the plan-document index.
    pub search_index: String,
}

/// Build the standard registry with all three capabilities.
#[must_use]
pub fn standard_registry(sessions: Arc<SessionClient>, config: &CapabilityConfig) -> CapabilityRegistry {
    let mut registry = CapabilityRegistry::new();
    registry.register(
        SearchCapability::descriptor(),
        Arc::new(SearchCapability::new(
            Arc::clone(&sessions),
            &config.model,
            &config.search_connection_id,
            &config.search_index,
        )),
    );
    registry.register(
        ReportCapability::descriptor(),
        Arc::new(ReportCapability::new(Arc::clone(&sessions), &config.model)),
    );
    registry.register(
        ValidationCapability::descriptor(),
        Arc::new(ValidationCapability::new(sessions, &config.model)),
    );
    registry
}
