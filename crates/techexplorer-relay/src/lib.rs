//! Relay between chat callers and the external AI agent.
//!
//! The agent answers over server-sent events. Its frames are decoded,
//! re-framed into the caller's event schema and forwarded one by one; when
//! the agent cannot be reached the local catalog answers instead.

pub mod client;
pub mod decoder;
pub mod relay;
pub mod types;

pub use client::AgentClient;
pub use relay::{relay_chat, relay_upstream, RelaySession, RelayState, Termination};
pub use types::*;
