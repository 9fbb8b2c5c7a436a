//! # plansmith-output
//!
//! Strict parsing of the orchestrator's structured answer and defensive
//! normalization of the validation verdict.
//!
//! The orchestrating model is instructed to emit exactly one JSON object as
//! its final answer. Anything else (surrounding prose, Python-cased
//! booleans, missing or extra keys) is a protocol violation and is
//! rejected outright rather than repaired. Repairing malformed output
//! propagates corrupted state; rejecting it surfaces the bug.
//!
//! ## Example
//!
//! ```rust
//! use plansmith_output::TurnAnswer;
//!
//! let answer = TurnAnswer::parse_strict(
//!     r###"{"report_generated": true, "content": "## Northwind Standard\n..."}"###,
//! ).unwrap();
//! assert!(answer.report_generated);
//!
//! // Trailing prose is rejected, not stripped.
//! assert!(TurnAnswer::parse_strict(
//!     r#"{"report_generated": true, "content": "x"} Hope this helps!"#,
//! ).is_err());
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod answer;
pub mod verdict;

pub use answer::{OutputParseError, TurnAnswer};
pub use verdict::Verdict;
