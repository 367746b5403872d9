//! HTTP client for the external AI agent.
//!
//! One attempt per call, no retries. Connection failures, timeouts and non-2xx
//! answers all map to [`Error::UpstreamUnavailable`].

use std::pin::Pin;
use std::time::Duration;

use bytes::Bytes;
use futures::Stream;
use reqwest::header::ACCEPT;
use reqwest::Client;
use techexplorer_core::{AgentTimeouts, Error, ExplorerConfig, Result};
use tracing::debug;

use crate::types::AgentQuestion;

/// Raw body stream of the agent's SSE response.
pub type ByteStream = Pin<Box<dyn Stream<Item = reqwest::Result<Bytes>> + Send>>;

#[derive(Debug, Clone)]
pub struct AgentClient {
    http: Client,
    stream_url: String,
    ask_url: String,
    health_url: String,
    timeouts: AgentTimeouts,
}

fn unavailable(e: impl std::fmt::Display) -> Error {
    Error::UpstreamUnavailable(e.to_string())
}

impl AgentClient {
    pub fn new(config: &ExplorerConfig) -> Result<Self> {
        let http = Client::builder()
            .build()
            .map_err(|e| Error::Internal(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self::with_client(http, config))
    }

    /// Build on top of an existing `reqwest` client.
    pub fn with_client(http: Client, config: &ExplorerConfig) -> Self {
        Self {
            http,
            stream_url: config.stream_url(),
            ask_url: config.ask_url(),
            health_url: config.health_url(),
            timeouts: config.timeouts,
        }
    }

    pub fn stream_url(&self) -> &str {
        &self.stream_url
    }

    /// Open the agent's event stream.
    ///
    /// The connect timeout only bounds the wait for response headers; the body
    /// may stream for as long as the agent keeps sending.
    pub async fn open_stream(&self, question: &AgentQuestion) -> Result<ByteStream> {
        debug!("Streaming from {}", self.stream_url);

        let send = self
            .http
            .post(&self.stream_url)
            .header(ACCEPT, "text/event-stream")
            .json(question)
            .send();

        let response = tokio::time::timeout(self.timeouts.stream_connect, send)
            .await
            .map_err(|_| unavailable(timeout_message(self.timeouts.stream_connect)))?
            .map_err(unavailable)?;

        if !response.status().is_success() {
            return Err(unavailable(format!("API error {}", response.status())));
        }

        Ok(Box::pin(response.bytes_stream()))
    }

    /// Ask the agent's non-streaming endpoint and return its answer text.
    pub async fn ask(&self, question: &AgentQuestion) -> Result<String> {
        debug!("Asking {}", self.ask_url);

        let response = self
            .http
            .post(&self.ask_url)
            .json(question)
            .timeout(self.timeouts.ask)
            .send()
            .await
            .map_err(unavailable)?;

        if !response.status().is_success() {
            return Err(unavailable(format!("API error {}", response.status())));
        }

        let body = response.text().await.map_err(unavailable)?;
        Ok(answer_text(&body))
    }

    /// Query the agent's health endpoint. A non-JSON body comes back as a string.
    pub async fn health(&self) -> Result<serde_json::Value> {
        let response = self
            .http
            .get(&self.health_url)
            .timeout(self.timeouts.health)
            .send()
            .await
            .map_err(unavailable)?
            .error_for_status()
            .map_err(unavailable)?;

        let body = response.text().await.map_err(unavailable)?;
        Ok(serde_json::from_str(&body).unwrap_or(serde_json::Value::String(body)))
    }
}

fn timeout_message(limit: Duration) -> String {
    format!("timeout of {}ms exceeded", limit.as_millis())
}

/// `answer`, else `response`, else the body itself.
pub fn answer_text(body: &str) -> String {
    let parsed = serde_json::from_str::<serde_json::Value>(body).ok();
    let field = |key: &str| {
        parsed
            .as_ref()
            .and_then(|v| v.get(key))
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
    };

    field("answer")
        .or_else(|| field("response"))
        .or_else(|| parsed.as_ref().and_then(|v| v.as_str()).map(|s| s.to_string()))
        .unwrap_or_else(|| body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio_stream::StreamExt;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> AgentClient {
        let config = ExplorerConfig {
            agent_base_url: server.uri(),
            timeouts: AgentTimeouts {
                stream_connect: Duration::from_millis(500),
                ask: Duration::from_millis(500),
                health: Duration::from_millis(500),
            },
            ..ExplorerConfig::default()
        };
        AgentClient::new(&config).unwrap()
    }

    fn question(stream: bool) -> AgentQuestion {
        AgentQuestion {
            question: "containers?".into(),
            context: json!({}),
            stream: stream.then_some(true),
        }
    }

    #[test]
    fn test_answer_text_precedence() {
        assert_eq!(answer_text(r#"{"answer":"a","response":"r"}"#), "a");
        assert_eq!(answer_text(r#"{"answer":"","response":"r"}"#), "r");
        assert_eq!(answer_text(r#""just a string""#), "just a string");
        assert_eq!(answer_text("plain text"), "plain text");
        assert_eq!(answer_text(r#"{"other":1}"#), r#"{"other":1}"#);
    }

    #[tokio::test]
    async fn test_open_stream_sends_question_and_reads_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/ask/stream"))
            .and(header("accept", "text/event-stream"))
            .and(body_json(json!({"question": "containers?", "context": {}, "stream": true})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw("data: {\"content\":\"hi\"}\n\n", "text/event-stream"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let mut stream = client_for(&server).open_stream(&question(true)).await.unwrap();
        let mut body = Vec::new();
        while let Some(chunk) = stream.next().await {
            body.extend_from_slice(&chunk.unwrap());
        }
        assert_eq!(body, b"data: {\"content\":\"hi\"}\n\n");
    }

    #[tokio::test]
    async fn test_open_stream_non_success_is_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let err = client_for(&server).open_stream(&question(true)).await.err().unwrap();
        assert!(err.is_upstream_unavailable());
    }

    #[tokio::test]
    async fn test_open_stream_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
            .mount(&server)
            .await;

        let err = client_for(&server).open_stream(&question(true)).await.err().unwrap();
        assert!(err.is_upstream_unavailable());
        assert!(err.to_string().contains("timeout"));
    }

    #[tokio::test]
    async fn test_ask_returns_answer_field() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/ask"))
            .and(body_json(json!({"question": "containers?", "context": {}})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"answer": "Use ECS"})))
            .mount(&server)
            .await;

        let answer = client_for(&server).ask(&question(false)).await.unwrap();
        assert_eq!(answer, "Use ECS");
    }

    #[tokio::test]
    async fn test_ask_unreachable() {
        let config = ExplorerConfig {
            agent_base_url: "http://127.0.0.1:1".into(),
            ..ExplorerConfig::default()
        };
        let err = AgentClient::new(&config)
            .unwrap()
            .ask(&question(false))
            .await
            .unwrap_err();
        assert!(err.is_upstream_unavailable());
    }

    #[tokio::test]
    async fn test_health_check() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
            .mount(&server)
            .await;

        let health = client_for(&server).health().await.unwrap();
        assert_eq!(health, json!({"status": "ok"}));
    }

    #[tokio::test]
    async fn test_health_check_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        assert!(client_for(&server).health().await.is_err());
    }
}
