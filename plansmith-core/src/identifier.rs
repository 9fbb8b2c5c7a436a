//! Identifier and timestamp helpers.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Generate a unique id for one orchestrator turn.
#[must_use]
pub fn generate_run_id() -> String {
    format!("run_{}", Uuid::new_v4().simple())
}

/// Generate a unique id for a capability invocation.
#[must_use]
pub fn generate_tool_call_id() -> String {
    format!("call_{}", Uuid::new_v4().simple())
}

/// Current UTC time.
#[must_use]
pub fn now_utc() -> DateTime<Utc> {
    Utc::now()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_ids_unique() {
        assert_ne!(generate_run_id(), generate_run_id());
        assert!(generate_run_id().starts_with("run_"));
    }

    #[test]
    fn test_tool_call_id_prefix() {
        assert!(generate_tool_call_id().starts_with("call_"));
    }
}
