//! The orchestrator's final structured answer.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a final answer failed strict parsing.
#[derive(Debug, Error)]
pub enum OutputParseError {
    /// The final text was empty.
    #[error("Final answer is empty")]
    Empty,

    /// The text is not a single well-formed JSON object.
    ///
    /// Covers syntax errors, non-JSON booleans such as `True`, and any
    /// prose before or after the object.
    #[error("Final answer is not a single JSON object: {0}")]
    Malformed(#[source] serde_json::Error),

    /// The JSON parsed but does not match the answer schema
    /// (missing keys, unknown keys, wrong types).
    #[error("Final answer does not match the expected schema: {0}")]
    Schema(#[source] serde_json::Error),

    /// `report_generated` was true but `content` was empty.
    #[error("Answer claims a report was generated but carries no content")]
    EmptyReport,
}

/// The orchestrator's final output for one turn.
///
/// Invariant: when `report_generated` is true, `content` holds the
/// deliverable; when false, it holds a user-facing explanation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TurnAnswer {
    /// Whether a validated report was produced.
    pub report_generated: bool,
    /// The report text, or an explanation of why there is none.
    pub content: String,
}

impl TurnAnswer {
    /// Create an answer carrying a generated report.
    #[must_use]
    pub fn report(content: impl Into<String>) -> Self {
        Self {
            report_generated: true,
            content: content.into(),
        }
    }

    /// Create an answer explaining why no report was produced.
    #[must_use]
    pub fn explanation(content: impl Into<String>) -> Self {
        Self {
            report_generated: false,
            content: content.into(),
        }
    }

    /// Parse the model's final text strictly.
    ///
    /// The whole (whitespace-trimmed) text must be exactly one JSON object
    /// matching the answer schema. Nothing is stripped or repaired:
    /// markdown fences, explanatory prose, `True`/`False` casing, unknown
    /// keys, and trailing content all fail.
    ///
    /// # Errors
    ///
    /// Returns [`OutputParseError`] describing the violation.
    pub fn parse_strict(text: &str) -> Result<Self, OutputParseError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(OutputParseError::Empty);
        }

        // Establish well-formedness first so schema errors are reported
        // separately from syntax errors. serde_json rejects trailing
        // content, which catches prose after the object.
        let value: serde_json::Value =
            serde_json::from_str(trimmed).map_err(OutputParseError::Malformed)?;

        let answer: Self = serde_json::from_value(value).map_err(OutputParseError::Schema)?;

        if answer.report_generated && answer.content.trim().is_empty() {
            return Err(OutputParseError::EmptyReport);
        }

        Ok(answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_valid_report() {
        let answer = TurnAnswer::parse_strict(
            r##"{"report_generated": true, "content": "# Northwind Standard\nExclusions: ..."}"##,
        )
        .unwrap();
        assert!(answer.report_generated);
        assert!(answer.content.contains("Exclusions"));
    }

    #[test]
    fn test_parse_valid_explanation() {
        let answer = TurnAnswer::parse_strict(
            r#"{"report_generated": false, "content": "The report did not meet validation standards."}"#,
        )
        .unwrap();
        assert_eq!(
            answer,
            TurnAnswer::explanation("The report did not meet validation standards.")
        );
    }

    #[test]
    fn test_surrounding_whitespace_ok() {
        let answer =
            TurnAnswer::parse_strict("\n  {\"report_generated\": false, \"content\": \"x\"}\n")
                .unwrap();
        assert!(!answer.report_generated);
    }

    #[test]
    fn test_empty_is_rejected() {
        assert!(matches!(
            TurnAnswer::parse_strict("   "),
            Err(OutputParseError::Empty)
        ));
    }

    #[test]
    fn test_python_booleans_rejected() {
        // The original behavior patched True -> true before parsing;
        // strict parsing rejects it instead.
        let err = TurnAnswer::parse_strict(r#"{"report_generated": True, "content": "x"}"#)
            .unwrap_err();
        assert!(matches!(err, OutputParseError::Malformed(_)));
    }

    #[test]
    fn test_trailing_prose_rejected() {
        let err = TurnAnswer::parse_strict(
            r#"{"report_generated": true, "content": "x"} Let me know if you need anything else."#,
        )
        .unwrap_err();
        assert!(matches!(err, OutputParseError::Malformed(_)));
    }

    #[test]
    fn test_leading_prose_rejected() {
        let err = TurnAnswer::parse_strict(
            r#"Here is the answer: {"report_generated": true, "content": "x"}"#,
        )
        .unwrap_err();
        assert!(matches!(err, OutputParseError::Malformed(_)));
    }

    #[test]
    fn test_markdown_fence_rejected() {
        let err = TurnAnswer::parse_strict(
            "```json\n{\"report_generated\": true, \"content\": \"x\"}\n```",
        )
        .unwrap_err();
        assert!(matches!(err, OutputParseError::Malformed(_)));
    }

    #[test]
    fn test_missing_key_rejected() {
        let err = TurnAnswer::parse_strict(r#"{"report_generated": true}"#).unwrap_err();
        assert!(matches!(err, OutputParseError::Schema(_)));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = TurnAnswer::parse_strict(
            r#"{"report_generated": false, "content": "x", "extra": 1}"#,
        )
        .unwrap_err();
        assert!(matches!(err, OutputParseError::Schema(_)));
    }

    #[test]
    fn test_generated_with_empty_content_rejected() {
        let err = TurnAnswer::parse_strict(r#"{"report_generated": true, "content": "  "}"#)
            .unwrap_err();
        assert!(matches!(err, OutputParseError::EmptyReport));
    }

    #[test]
    fn test_serde_roundtrip() {
        let answer = TurnAnswer::report("body");
        let json = serde_json::to_string(&answer).unwrap();
        assert_eq!(TurnAnswer::parse_strict(&json).unwrap(), answer);
    }
}
