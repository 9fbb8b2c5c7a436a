//! Validation verdict normalization.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Outcome of a validation check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// The report meets requirements.
    Pass,
    /// The report does not meet requirements.
    Fail,
}

impl Verdict {
    /// Normalize a validation reply into a verdict.
    ///
    /// The validation agent is instructed to answer with exactly `Pass` or
    /// `Fail`, but models drift: casing varies, punctuation and quotes
    /// creep in. Normalization accepts those variations of the two tokens
    /// and nothing else; any reply that is not recognizably one of them
    /// fails closed to [`Verdict::Fail`].
    #[must_use]
    pub fn normalize(reply: &str) -> Self {
        let token = reply
            .trim()
            .trim_matches(|c: char| matches!(c, '"' | '\'' | '`' | '.' | '!' | ' ' | '\n'));

        if token.eq_ignore_ascii_case("pass") {
            Self::Pass
        } else if token.eq_ignore_ascii_case("fail") {
            Self::Fail
        } else {
            warn!(reply, "unrecognized validation reply, failing closed");
            Self::Fail
        }
    }

    /// The canonical token for this verdict.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pass => "Pass",
            Self::Fail => "Fail",
        }
    }

    /// Whether the verdict is a pass.
    #[must_use]
    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
