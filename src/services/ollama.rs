// src/services/ollama.rs
use std::sync::Arc;

use reqwest::{
    Client,
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT},
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{Profile, RelayConfig};
use crate::error::UpstreamError;

const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub stream: bool,
}

// Only the part of the reply we read; everything else upstream sends is ignored.
#[derive(Debug, Deserialize)]
struct ChatReply {
    message: Option<ReplyMessage>,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

/// Client for the upstream `/api/chat` endpoint. Cheap to clone.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    http: Client,
    config: Arc<RelayConfig>,
}

impl OllamaClient {
    pub fn new(config: RelayConfig) -> Result<Self, UpstreamError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .default_headers(profile_headers(&config)?)
            .build()?;

        Ok(Self {
            http,
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    /// Sends a single user message and returns the model's reply text.
    pub async fn chat(&self, prompt: &str) -> Result<String, UpstreamError> {
        let body = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            stream: false,
        };

        let res = self
            .http
            .post(self.config.chat_url())
            .json(&body)
            .send()
            .await?;

        let status = res.status();
        let text = res.text().await?;
        debug!(%status, bytes = text.len(), "upstream replied");

        if !status.is_success() {
            return Err(UpstreamError::status(status, &text));
        }

        let reply: ChatReply = serde_json::from_str(&text)?;
        reply
            .message
            .and_then(|m| m.content)
            .ok_or(UpstreamError::MissingContent)
    }
}

fn profile_headers(config: &RelayConfig) -> Result<HeaderMap, UpstreamError> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    match config.profile {
        Profile::Local => {
            headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
        }
        Profile::Remote => {
            let key = config.api_key.as_deref().unwrap_or_default();
            let mut value = HeaderValue::from_str(&format!("Bearer {}", key))
                .map_err(|_| UpstreamError::InvalidApiKey)?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }
    }

    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_profile_sends_browser_headers_without_auth() {
        let headers = profile_headers(&RelayConfig::local("http://localhost:11434")).unwrap();
        assert_eq!(headers[USER_AGENT], BROWSER_USER_AGENT);
        assert_eq!(headers[ACCEPT], "application/json");
        assert!(headers.get(AUTHORIZATION).is_none());
    }

    #[test]
    fn remote_profile_sends_bearer_token() {
        let headers =
            profile_headers(&RelayConfig::remote("https://ollama.com", "abc123")).unwrap();
        assert_eq!(headers[AUTHORIZATION], "Bearer abc123");
        assert!(headers[AUTHORIZATION].is_sensitive());
        assert!(headers.get(USER_AGENT).is_none());
    }

    #[test]
    fn api_key_with_newline_is_rejected() {
        let err = profile_headers(&RelayConfig::remote("https://ollama.com", "bad\nkey"))
            .unwrap_err();
        assert!(matches!(err, UpstreamError::InvalidApiKey));
    }

    #[test]
    fn chat_request_shape() {
        let body = ChatRequest {
            model: "llama3.2:3b".to_string(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: "Hello".to_string(),
            }],
            stream: false,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "model": "llama3.2:3b",
                "messages": [{"role": "user", "content": "Hello"}],
                "stream": false
            })
        );
    }
}
