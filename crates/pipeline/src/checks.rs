//! Input and output guardrail checks.
//!
//! A check sends the conversation to the guardrail engine and decides from
//! the answer whether the engine refused. Engines refuse in prose, so the
//! decision is a phrase match over the answer text.

use crate::outcome::millis;
use railguard_core::{AppError, AppResult};
use railguard_rails::{ChatMessage, Guardrails, RailsOutput};
use std::time::Instant;

/// Phrases that mark a refusal of the user input.
pub const INPUT_REFUSAL_PHRASES: [&str; 5] =
    ["i'm sorry", "i can't", "i cannot", "please ask", "i can only"];

/// Phrases that mark a refusal of the workflow answer.
pub const OUTPUT_REFUSAL_PHRASES: [&str; 4] =
    ["i can only", "please ask questions", "i'm sorry", "i cannot"];

pub const INPUT_PASSED: &str = "Input passed guardrails";
pub const OUTPUT_PASSED: &str = "Output passed guardrails";

/// Result of one check: whether it passed and the message to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckVerdict {
    pub safe: bool,
    pub message: String,
    pub elapsed_ms: u64,
}

/// Decide whether a rails answer is a refusal.
///
/// Returns the refusal text when it is; `None` lets the content through.
/// An answer whose content is `null` is an error, so the caller blocks.
pub fn refusal_in(output: &RailsOutput, phrases: &[&str]) -> AppResult<Option<String>> {
    let content = match output {
        RailsOutput::Conversation { messages } => match messages.last() {
            Some(last) => last.content.as_deref(),
            None => return Ok(None),
        },
        RailsOutput::Message { content, .. } => content.as_deref(),
        RailsOutput::Stopped {
            is_stop: true,
            return_value,
        } => return Ok(Some(return_value.clone())),
        RailsOutput::Stopped { .. } | RailsOutput::Unrecognized(_) => return Ok(None),
    };

    let content = content
        .ok_or_else(|| AppError::Guardrails("Rails answer has no content".to_string()))?;
    Ok(contains_any(content, phrases).then(|| content.to_string()))
}

fn contains_any(content: &str, phrases: &[&str]) -> bool {
    let lowered = content.to_lowercase();
    phrases.iter().any(|phrase| lowered.contains(phrase))
}

/// Run the input rails over the user message.
pub async fn check_input_guardrails(rails: &dyn Guardrails, user_input: &str) -> CheckVerdict {
    let started = Instant::now();
    let result = rails.generate(&[ChatMessage::user(user_input)]).await;
    let elapsed_ms = millis(started.elapsed());
    tracing::info!(elapsed_ms, "Input guardrail execution finished");

    let (safe, message) = match result.and_then(|output| refusal_in(&output, &INPUT_REFUSAL_PHRASES)) {
        Ok(Some(refusal)) => (false, refusal),
        Ok(None) => (true, INPUT_PASSED.to_string()),
        Err(e) => (false, format!("Error checking input: {}", e)),
    };

    CheckVerdict {
        safe,
        message,
        elapsed_ms,
    }
}

/// Run the output rails over the workflow answer to the user message.
pub async fn check_output_guardrails(
    rails: &dyn Guardrails,
    user_input: &str,
    workflow_result: &str,
) -> CheckVerdict {
    let started = Instant::now();
    let result = rails
        .generate(&[
            ChatMessage::user(user_input),
            ChatMessage::assistant(workflow_result),
        ])
        .await;
    let elapsed_ms = millis(started.elapsed());
    tracing::info!(elapsed_ms, "Output guardrail execution finished");

    let (safe, message) = match result.and_then(|output| refusal_in(&output, &OUTPUT_REFUSAL_PHRASES)) {
        Ok(Some(refusal)) => (false, refusal),
        Ok(None) => (true, OUTPUT_PASSED.to_string()),
        Err(e) => (false, format!("Error checking output: {}", e)),
    };

    CheckVerdict {
        safe,
        message,
        elapsed_ms,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use railguard_rails::RailsMessage;
    use serde_json::json;

    /// Rails that answer every call with a fixed output.
    struct FixedRails(AppResult<RailsOutput>);

    #[async_trait::async_trait]
    impl Guardrails for FixedRails {
        fn backend_name(&self) -> &str {
            "fixed"
        }

        async fn generate(&self, _messages: &[ChatMessage]) -> AppResult<RailsOutput> {
            match &self.0 {
                Ok(output) => Ok(output.clone()),
                Err(e) => Err(AppError::Guardrails(e.to_string())),
            }
        }
    }

    fn replying(text: &str) -> FixedRails {
        FixedRails(Ok(RailsOutput::reply(text)))
    }

    #[tokio::test]
    async fn test_input_blocked_by_each_phrase() {
        for text in [
            "I'm sorry, I can't respond to that.",
            "I CAN'T help",
            "I cannot do that",
            "Please ask something else",
            "I can only talk about monitoring",
        ] {
            let verdict = check_input_guardrails(&replying(text), "q").await;
            assert!(!verdict.safe, "{} should block", text);
            assert_eq!(verdict.message, text);
        }
    }

    #[tokio::test]
    async fn test_input_passes_normal_answer() {
        let verdict = check_input_guardrails(&replying("Sure, here you go"), "q").await;
        assert!(verdict.safe);
        assert_eq!(verdict.message, INPUT_PASSED);
    }

    #[tokio::test]
    async fn test_input_uses_last_message_only() {
        let rails = FixedRails(Ok(RailsOutput::Conversation {
            messages: vec![
                RailsMessage {
                    role: Some("assistant".to_string()),
                    content: Some("I'm sorry".to_string()),
                },
                RailsMessage {
                    role: Some("assistant".to_string()),
                    content: Some("All good".to_string()),
                },
            ],
        }));
        assert!(check_input_guardrails(&rails, "q").await.safe);
    }

    #[tokio::test]
    async fn test_input_shapes() {
        let empty = FixedRails(Ok(RailsOutput::Conversation { messages: vec![] }));
        assert!(check_input_guardrails(&empty, "q").await.safe);

        let message = FixedRails(Ok(RailsOutput::Message {
            role: None,
            content: Some("i can only discuss observability".to_string()),
        }));
        assert!(!check_input_guardrails(&message, "q").await.safe);

        let stopped = FixedRails(Ok(RailsOutput::Stopped {
            is_stop: true,
            return_value: "Blocked by rail".to_string(),
        }));
        let verdict = check_input_guardrails(&stopped, "q").await;
        assert!(!verdict.safe);
        assert_eq!(verdict.message, "Blocked by rail");

        let not_stopped = FixedRails(Ok(RailsOutput::Stopped {
            is_stop: false,
            return_value: "I'm sorry".to_string(),
        }));
        assert!(check_input_guardrails(&not_stopped, "q").await.safe);

        let unknown = FixedRails(Ok(RailsOutput::Unrecognized(json!({"status": "?"}))));
        assert!(check_input_guardrails(&unknown, "q").await.safe);
    }

    fn decoded(value: serde_json::Value) -> FixedRails {
        FixedRails(Ok(serde_json::from_value(value).unwrap()))
    }

    #[tokio::test]
    async fn test_null_stop_value_blocks() {
        let rails = decoded(json!({"is_stop": true, "return_value": null}));
        assert!(matches!(rails.0, Ok(RailsOutput::Stopped { is_stop: true, .. })));

        assert!(!check_input_guardrails(&rails, "q").await.safe);
        assert!(!check_output_guardrails(&rails, "q", "a").await.safe);
    }

    #[tokio::test]
    async fn test_null_content_blocks() {
        for rails in [
            decoded(json!({"messages": [{"role": "assistant", "content": null}]})),
            decoded(json!({"role": "assistant", "content": null})),
        ] {
            let verdict = check_input_guardrails(&rails, "q").await;
            assert!(!verdict.safe);
            assert!(verdict.message.starts_with("Error checking input: "));
            assert!(verdict.message.contains("no content"));

            let verdict = check_output_guardrails(&rails, "q", "a").await;
            assert!(!verdict.safe);
            assert!(verdict.message.starts_with("Error checking output: "));
        }
    }

    #[tokio::test]
    async fn test_engine_error_blocks() {
        let rails = FixedRails(Err(AppError::Guardrails("connection refused".to_string())));

        let verdict = check_input_guardrails(&rails, "q").await;
        assert!(!verdict.safe);
        assert!(verdict.message.starts_with("Error checking input: "));
        assert!(verdict.message.contains("connection refused"));

        let verdict = check_output_guardrails(&rails, "q", "a").await;
        assert!(!verdict.safe);
        assert!(verdict.message.starts_with("Error checking output: "));
    }

    #[tokio::test]
    async fn test_output_phrase_set_differs_from_input() {
        // "i can't" blocks input but not output
        let verdict = check_output_guardrails(&replying("I can't be sure, but yes"), "q", "a").await;
        assert!(verdict.safe);
        assert_eq!(verdict.message, OUTPUT_PASSED);

        let verdict =
            check_output_guardrails(&replying("Please ask questions about Dynatrace"), "q", "a").await;
        assert!(!verdict.safe);

        // "please ask" alone is not an output refusal
        let verdict = check_output_guardrails(&replying("please ask your admin"), "q", "a").await;
        assert!(verdict.safe);
    }
}
