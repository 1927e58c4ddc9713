// src/state.rs
use std::sync::Arc;

use crate::config::RelayConfig;
use crate::error::UpstreamError;
use crate::services::ollama::OllamaClient;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub ollama: OllamaClient,
}

impl AppState {
    pub fn new(config: RelayConfig) -> Result<Self, UpstreamError> {
        Ok(Self {
            ollama: OllamaClient::new(config)?,
        })
    }

    pub fn shared(config: RelayConfig) -> Result<SharedState, UpstreamError> {
        Self::new(config).map(Arc::new)
    }
}
