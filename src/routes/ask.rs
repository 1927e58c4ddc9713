use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use tracing::warn;

use crate::{
    error::AppError,
    message::{PromptReply, PromptRequest, StatusReply},
    state::SharedState,
};

pub async fn status_handler() -> Json<StatusReply> {
    Json(StatusReply {
        status: "running".to_string(),
    })
}

pub async fn ask_handler(
    State(state): State<SharedState>,
    payload: Result<Json<PromptRequest>, JsonRejection>,
) -> Result<Json<PromptReply>, AppError> {
    let Json(payload) = payload?;

    let response = state.ollama.chat(&payload.prompt).await.map_err(|err| {
        warn!(error = %err, "upstream chat call failed");
        err
    })?;

    Ok(Json(PromptReply { response }))
}
