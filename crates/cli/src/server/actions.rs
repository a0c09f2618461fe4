//! Actions endpoint, so an external guardrails engine can call the rail
//! actions over HTTP.

use axum::{http::StatusCode, Json};
use railguard_rails::{ActionContext, RailAction};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct ActionRunRequest {
    pub action_name: String,
    #[serde(default)]
    pub action_parameters: ActionParameters,
}

#[derive(Debug, Default, Deserialize)]
pub struct ActionParameters {
    #[serde(default)]
    pub context: ActionContext,
}

#[derive(Debug, Serialize)]
pub struct ActionRunResponse {
    pub status: &'static str,
    pub result: Option<bool>,
}

pub async fn run_action(
    Json(request): Json<ActionRunRequest>,
) -> (StatusCode, Json<ActionRunResponse>) {
    let Some(action) = RailAction::parse(&request.action_name) else {
        tracing::warn!("Unknown rail action: {}", request.action_name);
        return (
            StatusCode::NOT_FOUND,
            Json(ActionRunResponse {
                status: "failed",
                result: None,
            }),
        );
    };

    let result = action.run(&request.action_parameters.context);
    tracing::debug!(action = action.name(), result, "Rail action evaluated");

    (
        StatusCode::OK,
        Json(ActionRunResponse {
            status: "success",
            result: Some(result),
        }),
    )
}

pub async fn list_actions() -> Json<Vec<&'static str>> {
    Json(RailAction::ALL.iter().map(|action| action.name()).collect())
}
