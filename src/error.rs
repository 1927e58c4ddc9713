// src/error.rs
use std::error::Error as _;

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::message::ErrorDetail;

/// Longest upstream error body echoed back to the caller.
const MAX_BODY_EXCERPT: usize = 512;

/// Failure anywhere between sending the chat request and reading the reply text.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("upstream request timed out: {}", error_chain(.0))]
    Timeout(#[source] reqwest::Error),
    #[error("could not connect to upstream: {}", error_chain(.0))]
    Connect(#[source] reqwest::Error),
    #[error("upstream request failed: {}", error_chain(.0))]
    Transport(#[source] reqwest::Error),
    #[error("upstream returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("upstream returned invalid JSON: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("upstream response has no message.content")]
    MissingContent,
    #[error("OLLAMA_API_KEY is not a valid header value")]
    InvalidApiKey,
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            UpstreamError::Timeout(err)
        } else if err.is_connect() {
            UpstreamError::Connect(err)
        } else {
            UpstreamError::Transport(err)
        }
    }
}

impl UpstreamError {
    pub fn status(status: reqwest::StatusCode, body: &str) -> Self {
        let body = body.trim();
        let body = match body.char_indices().nth(MAX_BODY_EXCERPT) {
            Some((cut, _)) => format!("{}...", &body[..cut]),
            None => body.to_string(),
        };
        UpstreamError::Status { status, body }
    }
}

// reqwest hides the interesting part (refused, dns, ...) in the source chain.
fn error_chain(err: &reqwest::Error) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        out.push_str(": ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}

fn rejection_text(rejection: &JsonRejection) -> String {
    rejection.body_text()
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{}", rejection_text(.0))]
    Validation(#[from] JsonRejection),
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorDetail {
            detail: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
