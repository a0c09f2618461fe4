//! Verdict lines shown for a processed query.

use railguard_pipeline::{GuardrailMode, QueryOutcome};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Success,
    Warning,
    Error,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: Level,
    pub text: String,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            level: Level::Success,
            text: text.into(),
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            level: Level::Warning,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: Level::Error,
            text: text.into(),
        }
    }
}

/// Build the verdict lines for an outcome, in stage order.
///
/// Stops at the first failing stage; pass lines for the guardrail checks
/// only appear when guardrails were enabled.
pub fn notices(outcome: &QueryOutcome, mode: GuardrailMode) -> Vec<Notice> {
    let mut lines = Vec::new();

    if !outcome.input_safe {
        lines.push(Notice::error(format!("Input Blocked: {}", outcome.input_message)));
        return lines;
    }
    if mode.is_enabled() {
        lines.push(Notice::success("Input passed safety checks"));
    }

    if !outcome.workflow_success {
        lines.push(Notice::error(format!("Workflow Error: {}", outcome.workflow_result)));
        return lines;
    }
    lines.push(Notice::success("Workflow completed successfully"));

    if mode.is_enabled() {
        if outcome.output_safe {
            lines.push(Notice::success("Output passed safety checks"));
        } else {
            lines.push(Notice::warning(format!(
                "Output Blocked: {}",
                outcome.output_message
            )));
        }
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn passed() -> QueryOutcome {
        QueryOutcome {
            input_safe: true,
            input_message: "Input passed guardrails".to_string(),
            workflow_success: true,
            workflow_result: "answer".to_string(),
            output_safe: true,
            output_message: "Output passed guardrails".to_string(),
            final_result: "answer".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_enabled_pass_lists_every_stage() {
        let texts: Vec<String> = notices(&passed(), GuardrailMode::Enabled)
            .into_iter()
            .map(|n| n.text)
            .collect();
        assert_eq!(
            texts,
            vec![
                "Input passed safety checks",
                "Workflow completed successfully",
                "Output passed safety checks",
            ]
        );
    }

    #[test]
    fn test_disabled_only_reports_workflow() {
        let lines = notices(&passed(), GuardrailMode::Disabled);
        assert_eq!(lines, vec![Notice::success("Workflow completed successfully")]);
    }

    #[test]
    fn test_input_block_stops_report() {
        let outcome = QueryOutcome {
            input_message: "I'm sorry, I can't respond to that.".to_string(),
            ..Default::default()
        };
        let lines = notices(&outcome, GuardrailMode::Enabled);
        assert_eq!(
            lines,
            vec![Notice::error("Input Blocked: I'm sorry, I can't respond to that.")]
        );
    }

    #[test]
    fn test_workflow_error_and_output_block() {
        let failed = QueryOutcome {
            input_safe: true,
            workflow_result: "Error: timeout".to_string(),
            ..Default::default()
        };
        let lines = notices(&failed, GuardrailMode::Disabled);
        assert_eq!(lines, vec![Notice::error("Workflow Error: Error: timeout")]);

        let blocked = QueryOutcome {
            output_safe: false,
            output_message: "I cannot share that".to_string(),
            final_result: String::new(),
            ..passed()
        };
        let lines = notices(&blocked, GuardrailMode::Enabled);
        assert_eq!(lines.last(), Some(&Notice::warning("Output Blocked: I cannot share that")));
        assert_eq!(lines.last().map(|n| n.level.as_str()), Some("warning"));
    }
}
