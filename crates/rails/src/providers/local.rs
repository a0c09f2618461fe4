//! In-process guardrails.
//!
//! Runs the heuristic rail actions directly instead of calling a guardrails
//! server. Blocked conversations are answered with the action's refusal
//! text, so callers classify local and remote answers the same way.

use crate::actions::{ActionContext, RailAction};
use crate::client::{ChatMessage, Guardrails, RailsOutput, Role};
use railguard_core::{AppError, AppResult};

/// Guardrails backed by the local rail actions.
#[derive(Debug, Clone)]
pub struct LocalRails {
    input_actions: Vec<RailAction>,
    output_actions: Vec<RailAction>,
}

impl LocalRails {
    pub fn new(input_actions: Vec<RailAction>, output_actions: Vec<RailAction>) -> Self {
        Self {
            input_actions,
            output_actions,
        }
    }

    /// Build from registered action names, rejecting unknown ones.
    pub fn from_names(input: &[String], output: &[String]) -> AppResult<Self> {
        Ok(Self::new(parse_actions(input)?, parse_actions(output)?))
    }

    pub fn input_actions(&self) -> &[RailAction] {
        &self.input_actions
    }

    pub fn output_actions(&self) -> &[RailAction] {
        &self.output_actions
    }

    fn first_triggered(actions: &[RailAction], context: &ActionContext) -> Option<RailAction> {
        actions.iter().copied().find(|action| action.run(context))
    }
}

fn parse_actions(names: &[String]) -> AppResult<Vec<RailAction>> {
    names
        .iter()
        .map(|name| {
            RailAction::parse(name).ok_or_else(|| {
                AppError::Config(format!(
                    "Unknown rail action: {}. Supported: {}",
                    name,
                    RailAction::ALL
                        .iter()
                        .map(|a| a.name())
                        .collect::<Vec<_>>()
                        .join(", ")
                ))
            })
        })
        .collect()
}

#[async_trait::async_trait]
impl Guardrails for LocalRails {
    fn backend_name(&self) -> &str {
        "local"
    }

    async fn generate(&self, messages: &[ChatMessage]) -> AppResult<RailsOutput> {
        let last = messages
            .last()
            .ok_or_else(|| AppError::Guardrails("No messages to check".to_string()))?;

        match last.role {
            Role::User => {
                let context = ActionContext::for_user(last.content.as_str());
                if let Some(action) = Self::first_triggered(&self.input_actions, &context) {
                    tracing::info!("Input rail {} triggered", action.name());
                    return Ok(RailsOutput::reply(action.refusal()));
                }
                Ok(RailsOutput::reply("OK"))
            }
            Role::Assistant => {
                let user = messages
                    .iter()
                    .rev()
                    .find(|m| m.role == Role::User)
                    .map(|m| m.content.clone())
                    .unwrap_or_default();
                let context = ActionContext::for_exchange(user, last.content.as_str());
                if let Some(action) = Self::first_triggered(&self.output_actions, &context) {
                    tracing::info!("Output rail {} triggered", action.name());
                    return Ok(RailsOutput::reply(action.refusal()));
                }
                Ok(RailsOutput::reply(last.content.clone()))
            }
        }
    }
}
