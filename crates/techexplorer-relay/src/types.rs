//! Wire types for the chat API and the upstream agent.

use serde::{Deserialize, Serialize};
use techexplorer_core::{Error, Result};
use techexplorer_discovery::{ExtractedContext, Recommendation};

/// Error text returned when a request has no usable message.
pub const MESSAGE_REQUIRED: &str = "Message is required";

/// Error text sent in-band when the agent fails mid-stream.
pub const STREAM_ERROR_MESSAGE: &str = "Stream error occurred";

/// Literal marking the end of an SSE stream, both upstream and towards callers.
pub const DONE_SENTINEL: &str = "[DONE]";

/// Incoming chat request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
    /// Tags from earlier turns, passed through to the agent untouched.
    #[serde(default)]
    pub context: Option<serde_json::Value>,
}

impl ChatRequest {
    /// The message, or a validation error when it is absent or empty.
    pub fn message(&self) -> Result<&str> {
        match self.message.as_deref() {
            Some(m) if !m.is_empty() => Ok(m),
            _ => Err(Error::Validation(MESSAGE_REQUIRED.into())),
        }
    }

    fn context_or_empty(&self) -> serde_json::Value {
        match &self.context {
            Some(ctx) if !ctx.is_null() => ctx.clone(),
            _ => serde_json::json!({}),
        }
    }
}

/// Request body sent to the agent.
#[derive(Debug, Clone, Serialize)]
pub struct AgentQuestion {
    pub question: String,
    pub context: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
}

impl AgentQuestion {
    /// Body for the agent's streaming endpoint. Fails validation like [`ChatRequest::message`].
    pub fn streaming(req: &ChatRequest) -> Result<Self> {
        Ok(Self {
            question: req.message()?.to_string(),
            context: req.context_or_empty(),
            stream: Some(true),
        })
    }

    /// Body for the agent's `/ask` endpoint.
    pub fn direct(req: &ChatRequest) -> Result<Self> {
        Ok(Self {
            question: req.message()?.to_string(),
            context: req.context_or_empty(),
            stream: None,
        })
    }
}

/// One parsed `data:` line from the agent's stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpstreamEvent {
    /// Text extracted from a structured record.
    Content(String),
    /// The `[DONE]` sentinel.
    Done,
    /// Payload that was not a usable record; carried as trimmed raw text.
    Malformed(String),
}

/// Event sent to the caller over SSE.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum RelayEvent {
    Content(String),
    Context(ExtractedContext),
    Error(String),
    /// Terminal marker, written as the bare `[DONE]` literal.
    #[serde(skip)]
    Done,
}

impl RelayEvent {
    /// Payload for the SSE `data:` field.
    pub fn sse_data(&self) -> String {
        match self {
            RelayEvent::Done => DONE_SENTINEL.to_string(),
            event => serde_json::to_string(event).unwrap_or_else(|_| {
                format!(r#"{{"type":"error","data":"{}"}}"#, STREAM_ERROR_MESSAGE)
            }),
        }
    }

    /// Inverse of [`RelayEvent::sse_data`].
    pub fn from_sse_data(data: &str) -> Option<Self> {
        if data.trim() == DONE_SENTINEL {
            return Some(RelayEvent::Done);
        }
        serde_json::from_str(data).ok()
    }

    pub fn is_done(&self) -> bool {
        matches!(self, RelayEvent::Done)
    }
}

/// Non-streaming chat response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub message: String,
    pub context: ExtractedContext,
    pub next_step: u8,
    pub recommendations: Vec<Recommendation>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_message_validation() {
        let missing: ChatRequest = serde_json::from_value(json!({})).unwrap();
        assert!(matches!(missing.message(), Err(Error::Validation(_))));

        let null: ChatRequest = serde_json::from_value(json!({"message": null})).unwrap();
        assert!(null.message().is_err());

        let empty: ChatRequest = serde_json::from_value(json!({"message": ""})).unwrap();
        let err = empty.message().unwrap_err();
        assert_eq!(err.to_string(), MESSAGE_REQUIRED);

        let ok: ChatRequest = serde_json::from_value(json!({"message": "hi"})).unwrap();
        assert_eq!(ok.message().unwrap(), "hi");
    }

    #[test]
    fn test_agent_question_bodies() {
        let req: ChatRequest = serde_json::from_value(json!({
            "message": "containers",
            "context": {"sector": "ICG"},
        }))
        .unwrap();

        let streaming = serde_json::to_value(AgentQuestion::streaming(&req).unwrap()).unwrap();
        assert_eq!(
            streaming,
            json!({"question": "containers", "context": {"sector": "ICG"}, "stream": true})
        );

        let bare = ChatRequest {
            message: Some("hi".into()),
            context: None,
        };
        let direct = serde_json::to_value(AgentQuestion::direct(&bare).unwrap()).unwrap();
        assert_eq!(direct, json!({"question": "hi", "context": {}}));
    }

    #[test]
    fn test_relay_event_frames() {
        assert_eq!(
            RelayEvent::Content("Hello".into()).sse_data(),
            r#"{"type":"content","data":"Hello"}"#
        );
        assert_eq!(
            RelayEvent::Error(STREAM_ERROR_MESSAGE.into()).sse_data(),
            r#"{"type":"error","data":"Stream error occurred"}"#
        );
        assert_eq!(RelayEvent::Done.sse_data(), "[DONE]");

        let ctx = techexplorer_discovery::extract("urgent migration");
        let frame: serde_json::Value =
            serde_json::from_str(&RelayEvent::Context(ctx).sse_data()).unwrap();
        assert_eq!(
            frame,
            json!({"type": "context", "data": {"useCase": "Platform Migration", "priority": "Critical"}})
        );
    }

    #[test]
    fn test_from_sse_data() {
        assert_eq!(RelayEvent::from_sse_data("[DONE]"), Some(RelayEvent::Done));
        assert_eq!(
            RelayEvent::from_sse_data(r#"{"type":"content","data":"x"}"#),
            Some(RelayEvent::Content("x".into()))
        );
        assert_eq!(RelayEvent::from_sse_data("garbage"), None);
    }
}
