// src/config.rs
use std::{fmt, net::SocketAddr, str::FromStr, time::Duration};

use thiserror::Error;

pub const DEFAULT_LOCAL_URL: &str = "http://localhost:11434";
pub const DEFAULT_REMOTE_URL: &str = "https://ollama.com";
pub const DEFAULT_MODEL: &str = "llama3.2:3b";
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8000";
pub const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown OLLAMA_PROFILE '{0}', expected 'local' or 'remote'")]
    UnknownProfile(String),
    #[error("OLLAMA_API_KEY must be set when OLLAMA_PROFILE is 'remote'")]
    MissingApiKey,
    #[error("invalid RELAY_ADDR '{value}': {source}")]
    InvalidListenAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
}

/// How the relay reaches the upstream chat API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Profile {
    /// Unauthenticated server, usually on the same host.
    #[default]
    Local,
    /// Hosted service behind a bearer token.
    Remote,
}

impl Profile {
    pub fn default_url(self) -> &'static str {
        match self {
            Profile::Local => DEFAULT_LOCAL_URL,
            Profile::Remote => DEFAULT_REMOTE_URL,
        }
    }
}

impl FromStr for Profile {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(Profile::Local),
            "remote" => Ok(Profile::Remote),
            _ => Err(ConfigError::UnknownProfile(s.to_string())),
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Profile::Local => f.write_str("local"),
            Profile::Remote => f.write_str("remote"),
        }
    }
}

#[derive(Clone)]
pub struct RelayConfig {
    pub profile: Profile,
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub listen_addr: SocketAddr,
    pub timeout: Duration,
}

// Keeps the api key out of logs.
impl fmt::Debug for RelayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelayConfig")
            .field("profile", &self.profile)
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("listen_addr", &self.listen_addr)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl RelayConfig {
    /// Config for a local server at `base_url` with every other value defaulted.
    pub fn local(base_url: impl Into<String>) -> Self {
        Self {
            profile: Profile::Local,
            base_url: normalize_url(base_url.into()),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8000)),
            timeout: UPSTREAM_TIMEOUT,
        }
    }

    /// Config for a hosted service at `base_url` authenticated with `api_key`.
    pub fn remote(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            profile: Profile::Remote,
            api_key: Some(api_key.into()),
            ..Self::local(base_url)
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let profile = match get("OLLAMA_PROFILE") {
            Some(raw) => raw.parse::<Profile>()?,
            None => Profile::default(),
        };

        let api_key = get("OLLAMA_API_KEY");
        if profile == Profile::Remote && api_key.is_none() {
            return Err(ConfigError::MissingApiKey);
        }

        let base_url = normalize_url(
            get("OLLAMA_URL").unwrap_or_else(|| profile.default_url().to_string()),
        );
        let model = get("OLLAMA_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let raw_addr = get("RELAY_ADDR").unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string());
        let listen_addr = raw_addr
            .trim()
            .parse::<SocketAddr>()
            .map_err(|source| ConfigError::InvalidListenAddr {
                value: raw_addr.clone(),
                source,
            })?;

        Ok(Self {
            profile,
            base_url,
            model,
            api_key,
            listen_addr,
            timeout: UPSTREAM_TIMEOUT,
        })
    }

    pub fn chat_url(&self) -> String {
        format!("{}/api/chat", self.base_url)
    }
}

fn normalize_url(url: String) -> String {
    url.trim().trim_end_matches('/').to_string()
}
