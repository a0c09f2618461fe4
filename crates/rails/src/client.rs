//! Guardrail engine abstraction and message/response types.
//!
//! A guardrail engine receives the conversation so far and answers with a
//! generation. Engines answer in several shapes; [`RailsOutput`] captures
//! all of them so callers can classify the answer without caring which
//! engine produced it.

use railguard_core::AppResult;
use serde::{Deserialize, Deserializer, Serialize};

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One message of the conversation sent to the rails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    /// A message typed by the user.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// A message produced by the assistant (the workflow answer).
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Request body for a guardrails chat completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RailsRequest {
    /// Rails configuration to apply on the server
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_id: Option<String>,

    pub messages: Vec<ChatMessage>,
}

impl RailsRequest {
    pub fn new(config_id: Option<String>, messages: &[ChatMessage]) -> Self {
        Self {
            config_id,
            messages: messages.to_vec(),
        }
    }
}

/// A message inside a conversation-shaped rails answer.
///
/// Engines are loose about roles here, so the role is kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RailsMessage {
    #[serde(default)]
    pub role: Option<String>,

    /// Engines may send `null` here; that is kept apart from an empty answer
    #[serde(default)]
    pub content: Option<String>,
}

/// The shapes a guardrail engine may answer with.
///
/// Variant order matters for decoding: the first shape that fits wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RailsOutput {
    /// Generation with a list of messages; the last one is the answer
    Conversation { messages: Vec<RailsMessage> },

    /// Processing was stopped by a rail
    Stopped {
        is_stop: bool,
        #[serde(default, deserialize_with = "null_as_empty")]
        return_value: String,
    },

    /// A single message object
    Message {
        #[serde(default)]
        role: Option<String>,
        #[serde(deserialize_with = "nullable")]
        content: Option<String>,
    },

    /// Anything else
    Unrecognized(serde_json::Value),
}

impl RailsOutput {
    /// Conversation holding a single assistant message.
    pub fn reply(content: impl Into<String>) -> Self {
        Self::Conversation {
            messages: vec![RailsMessage {
                role: Some("assistant".to_string()),
                content: Some(content.into()),
            }],
        }
    }
}

/// Required field that may be `null`.
fn nullable<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Option::<String>::deserialize(deserializer)
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(nullable(deserializer)?.unwrap_or_default())
}

/// Trait for guardrail engines.
///
/// This trait abstracts the engine (remote guardrails server, in-process
/// heuristics) behind a single generation call.
#[async_trait::async_trait]
pub trait Guardrails: Send + Sync {
    /// Get the backend name (e.g., "nemo", "local").
    fn backend_name(&self) -> &str;

    /// Run the rails over a conversation.
    ///
    /// A conversation ending in a user message exercises the input rails,
    /// one ending in an assistant message the output rails.
    async fn generate(&self, messages: &[ChatMessage]) -> AppResult<RailsOutput>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(value: serde_json::Value) -> RailsOutput {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_request_serialization() {
        let request = RailsRequest::new(
            Some("guardrails_config".to_string()),
            &[ChatMessage::user("hi"), ChatMessage::assistant("hello")],
        );
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "config_id": "guardrails_config",
                "messages": [
                    {"role": "user", "content": "hi"},
                    {"role": "assistant", "content": "hello"}
                ]
            })
        );
    }

    #[test]
    fn test_decode_conversation() {
        let output = decode(json!({
            "messages": [{"role": "assistant", "content": "I'm sorry, I can't respond to that."}]
        }));
        match output {
            RailsOutput::Conversation { messages } => {
                assert_eq!(messages.len(), 1);
                assert!(messages[0]
                    .content
                    .as_deref()
                    .is_some_and(|c| c.starts_with("I'm sorry")));
            }
            other => panic!("unexpected shape: {:?}", other),
        }
    }

    #[test]
    fn test_decode_stop_and_message() {
        assert_eq!(
            decode(json!({"is_stop": true, "return_value": "blocked"})),
            RailsOutput::Stopped {
                is_stop: true,
                return_value: "blocked".to_string()
            }
        );
        assert_eq!(
            decode(json!({"role": "assistant", "content": "fine"})),
            RailsOutput::Message {
                role: Some("assistant".to_string()),
                content: Some("fine".to_string())
            }
        );
    }

    #[test]
    fn test_decode_null_fields() {
        assert_eq!(
            decode(json!({"is_stop": true, "return_value": null})),
            RailsOutput::Stopped {
                is_stop: true,
                return_value: String::new()
            }
        );
        assert_eq!(
            decode(json!({"messages": [{"role": "assistant", "content": null}]})),
            RailsOutput::Conversation {
                messages: vec![RailsMessage {
                    role: Some("assistant".to_string()),
                    content: None
                }]
            }
        );
        assert_eq!(
            decode(json!({"role": "assistant", "content": null})),
            RailsOutput::Message {
                role: Some("assistant".to_string()),
                content: None
            }
        );
    }

    #[test]
    fn test_decode_unrecognized() {
        assert!(matches!(
            decode(json!({"status": "ok"})),
            RailsOutput::Unrecognized(_)
        ));
        assert!(matches!(decode(json!("plain")), RailsOutput::Unrecognized(_)));
    }
}
