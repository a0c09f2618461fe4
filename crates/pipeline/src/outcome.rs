//! Per-query result record and guardrail mode.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Whether a query runs through the guardrails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuardrailMode {
    Enabled,
    #[default]
    Disabled,
}

impl GuardrailMode {
    /// Modes in the order the UI offers them.
    pub const OPTIONS: [GuardrailMode; 2] = [Self::Disabled, Self::Enabled];

    /// Parse from a form value or label.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "enabled" | "on" | "true" | "with guardrails" => Some(Self::Enabled),
            "disabled" | "off" | "false" | "without guardrails" => Some(Self::Disabled),
            _ => None,
        }
    }

    pub fn from_flag(enabled: bool) -> Self {
        if enabled {
            Self::Enabled
        } else {
            Self::Disabled
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Enabled => "enabled",
            Self::Disabled => "disabled",
        }
    }

    /// Label shown in the UI.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Enabled => "With guardrails",
            Self::Disabled => "Without guardrails",
        }
    }

    pub fn is_enabled(&self) -> bool {
        *self == Self::Enabled
    }
}

impl std::fmt::Display for GuardrailMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wall-clock time spent in each stage, in milliseconds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageTimings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_guardrails_ms: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub workflow_ms: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_guardrails_ms: Option<u64>,
}

pub(crate) fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Everything one query produced.
///
/// Starts with every flag false and every message empty; the pipeline
/// fills fields in stage order and stops at the first failing stage.
/// `final_result` is non-empty only when the answer may be shown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryOutcome {
    pub input_safe: bool,
    pub input_message: String,
    pub workflow_success: bool,
    pub workflow_result: String,
    pub output_safe: bool,
    pub output_message: String,
    pub final_result: String,

    #[serde(default)]
    pub timings: StageTimings,
}

impl QueryOutcome {
    /// Whether there is an answer to display and keep in the history.
    pub fn has_answer(&self) -> bool {
        !self.final_result.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parsing() {
        assert_eq!(GuardrailMode::parse("enabled"), Some(GuardrailMode::Enabled));
        assert_eq!(GuardrailMode::parse("With guardrails"), Some(GuardrailMode::Enabled));
        assert_eq!(GuardrailMode::parse(" OFF "), Some(GuardrailMode::Disabled));
        assert_eq!(GuardrailMode::parse("maybe"), None);
        assert_eq!(GuardrailMode::default(), GuardrailMode::Disabled);
        assert_eq!(GuardrailMode::OPTIONS[0], GuardrailMode::Disabled);
    }

    #[test]
    fn test_fresh_outcome_is_empty() {
        let outcome = QueryOutcome::default();
        assert!(!outcome.input_safe);
        assert!(!outcome.workflow_success);
        assert!(!outcome.output_safe);
        assert!(!outcome.has_answer());
    }
}
