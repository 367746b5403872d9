//! Runtime configuration, read from the environment at startup.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_AGENT_BASE_URL: &str = "http://localhost:8096";
pub const DEFAULT_AGENT_ENDPOINT: &str = "/ask/stream";
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";
pub const DEFAULT_ENVIRONMENT: &str = "development";

/// Non-streaming answer endpoint on the agent.
pub const AGENT_ASK_PATH: &str = "/ask";
/// Liveness endpoint on the agent.
pub const AGENT_HEALTH_PATH: &str = "/health";

/// Upper bounds for each kind of upstream call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentTimeouts {
    /// Time allowed for the streaming endpoint to answer with headers.
    #[serde(with = "millis")]
    pub stream_connect: Duration,
    /// Time allowed for a complete `/ask` round trip.
    #[serde(with = "millis")]
    pub ask: Duration,
    /// Time allowed for a `/health` check.
    #[serde(with = "millis")]
    pub health: Duration,
}

impl Default for AgentTimeouts {
    fn default() -> Self {
        Self {
            stream_connect: Duration::from_secs(30),
            ask: Duration::from_secs(15),
            health: Duration::from_secs(5),
        }
    }
}

/// Top-level Tech Explorer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplorerConfig {
    /// HTTP server port.
    pub port: u16,
    /// Base URL of the external AI agent, without trailing slash.
    pub agent_base_url: String,
    /// Path of the agent's streaming endpoint, always starting with `/`.
    pub agent_endpoint: String,
    /// Browser origin allowed to call the API.
    pub cors_origin: String,
    /// Free-form deployment label, only reported in logs.
    pub environment: String,
    pub timeouts: AgentTimeouts,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            agent_base_url: DEFAULT_AGENT_BASE_URL.into(),
            agent_endpoint: DEFAULT_AGENT_ENDPOINT.into(),
            cors_origin: DEFAULT_CORS_ORIGIN.into(),
            environment: DEFAULT_ENVIRONMENT.into(),
            timeouts: AgentTimeouts::default(),
        }
    }
}

impl ExplorerConfig {
    /// Create configuration from the process environment (and `.env`, if present).
    pub fn from_env() -> Result<Self> {
        match dotenvy::dotenv() {
            Ok(path) => debug!("Loaded environment from {}", path.display()),
            Err(e) if e.not_found() => {}
            Err(e) => return Err(Error::Config(format!("Failed to read .env: {}", e))),
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match non_empty("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| Error::Config(format!("PORT must be a port number, got {:?}", raw)))?,
            None => defaults.port,
        };

        let agent_base_url = non_empty("AI_AGENT_BASE_URL")
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .unwrap_or(defaults.agent_base_url);

        let agent_endpoint = non_empty("AI_AGENT_ENDPOINT")
            .map(|path| {
                let path = path.trim();
                if path.starts_with('/') {
                    path.to_string()
                } else {
                    format!("/{}", path)
                }
            })
            .unwrap_or(defaults.agent_endpoint);

        Ok(Self {
            port,
            agent_base_url,
            agent_endpoint,
            cors_origin: non_empty("CORS_ORIGIN").unwrap_or(defaults.cors_origin),
            environment: non_empty("APP_ENV").unwrap_or(defaults.environment),
            timeouts: defaults.timeouts,
        })
    }

    /// Whether an agent base URL is set at all.
    pub fn agent_configured(&self) -> bool {
        !self.agent_base_url.is_empty()
    }

    pub fn stream_url(&self) -> String {
        format!("{}{}", self.agent_base_url, self.agent_endpoint)
    }

    pub fn ask_url(&self) -> String {
        format!("{}{}", self.agent_base_url, AGENT_ASK_PATH)
    }

    pub fn health_url(&self) -> String {
        format!("{}{}", self.agent_base_url, AGENT_HEALTH_PATH)
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}
