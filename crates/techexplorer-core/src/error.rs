//! Error types for Tech Explorer.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Request rejected before any side effect.
    #[error("{0}")]
    Validation(String),

    /// Upstream agent could not be reached, timed out, or answered non-2xx.
    #[error("AI agent unavailable: {0}")]
    UpstreamUnavailable(String),

    /// Upstream failed after its stream had started.
    #[error("AI agent stream fault: {0}")]
    UpstreamStream(String),

    #[error("Malformed upstream frame: {0}")]
    MalformedFrame(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// True for failures that send a request down the local fallback path.
    pub fn is_upstream_unavailable(&self) -> bool {
        matches!(self, Error::UpstreamUnavailable(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
