//! # plansmith-tools
//!
//! Capability descriptors, the capability registry, and the handler
//! contract used by the orchestrator.
//!
//! A *capability* is a named, described function the orchestrating model may
//! choose to invoke. The catalog of [`CapabilityDescriptor`]s is sent to the
//! model with every request; when the model asks for one by name, the
//! orchestrator resolves it through the [`CapabilityRegistry`] by exact-name
//! lookup and runs its [`CapabilityHandler`].
//!
//! ## Example
//!
//! ```rust
//! use plansmith_tools::{CapabilityDescriptor, CapabilityRegistry, SchemaBuilder, from_fn};
//!
//! let descriptor = CapabilityDescriptor::new("echo", "Echo the given text")
//!     .with_parameters(SchemaBuilder::new().string("text", "Text to echo", true).build());
//!
//! let mut registry = CapabilityRegistry::new();
//! registry.register(
//!     descriptor,
//!     from_fn(|args| async move {
//!         let text = args["text"].as_str().unwrap_or_default().to_string();
//!         Ok(text.into())
//!     }),
//! );
//!
//! assert!(registry.contains("echo"));
//! assert_eq!(registry.descriptors().len(), 1);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod descriptor;
pub mod errors;
pub mod registry;
pub mod schema;

// Re-exports for convenience
pub use descriptor::CapabilityDescriptor;
pub use errors::ToolError;
pub use registry::{from_fn, CapabilityHandler, CapabilityOutput, CapabilityRegistry};
pub use schema::{ObjectJsonSchema, SchemaBuilder};

/// Prelude for common imports.
pub mod prelude {
    pub use crate::descriptor::CapabilityDescriptor;
    pub use crate::errors::ToolError;
    pub use crate::registry::{from_fn, CapabilityHandler, CapabilityOutput, CapabilityRegistry};
    pub use crate::schema::{ObjectJsonSchema, SchemaBuilder};
}
