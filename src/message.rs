// src/message.rs
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize)]
pub struct PromptRequest {
    pub prompt: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct PromptReply {
    pub response: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct StatusReply {
    pub status: String,
}

/// Body of every error response.
#[derive(Debug, Deserialize, Serialize)]
pub struct ErrorDetail {
    pub detail: String,
}
