//! Per-request relay state machine.
//!
//! A [`RelaySession`] owns everything one streaming request needs: the text
//! accumulated from the agent, the line decoder, and its lifecycle state.
//! Each kind of upstream signal has one entry point (`on_chunk`,
//! `on_upstream_end`, `on_upstream_error`, `fallback`) and every entry point
//! returns the caller-facing events it produced. All four terminal paths go
//! through [`RelaySession::close`], which emits the `Done` marker exactly once.
//!
//! ```text
//! Init -> HeadersSent -> Forwarding -> ContextEmitted -> Closed
//!                     |             \-> Errored -------> Closed
//!                     \-> (fallback) ------------------> Closed
//! ```

use std::fmt::Display;
use std::pin::Pin;

use futures::Stream;
use tokio_stream::StreamExt;
use tracing::{debug, error, warn};
use techexplorer_core::Error;
use uuid::Uuid;

use crate::client::AgentClient;
use crate::decoder::{parse_line, LineDecoder};
use crate::types::{AgentQuestion, RelayEvent, UpstreamEvent, STREAM_ERROR_MESSAGE};

/// Boxed stream of caller-facing events.
pub type RelayStream = Pin<Box<dyn Stream<Item = RelayEvent> + Send>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayState {
    Init,
    HeadersSent,
    Forwarding,
    ContextEmitted,
    Errored,
    Closed,
}

/// Which path ended the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Agent sent `[DONE]`; a context frame preceded the marker.
    Sentinel,
    /// Agent closed its stream without a sentinel.
    NaturalEnd,
    /// Agent stream failed mid-transfer.
    StreamFault,
    /// Agent unavailable; the local catalog answered.
    Fallback,
}

pub struct RelaySession {
    id: Uuid,
    state: RelayState,
    accumulated: String,
    decoder: LineDecoder,
    termination: Option<Termination>,
}

impl Default for RelaySession {
    fn default() -> Self {
        Self::new()
    }
}

impl RelaySession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            state: RelayState::Init,
            accumulated: String::new(),
            decoder: LineDecoder::new(),
            termination: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> RelayState {
        self.state
    }

    pub fn termination(&self) -> Option<Termination> {
        self.termination
    }

    /// Text collected from content frames so far.
    pub fn accumulated(&self) -> &str {
        &self.accumulated
    }

    pub fn is_closed(&self) -> bool {
        self.state == RelayState::Closed
    }

    /// Mark the caller-facing stream as committed. Only valid from `Init`.
    pub fn commit_headers(&mut self) {
        if self.state == RelayState::Init {
            self.state = RelayState::HeadersSent;
        }
    }

    /// Feed one chunk of upstream bytes.
    ///
    /// A line that outgrows the decoder limit faults the session the same way
    /// a broken upstream body does.
    pub fn on_chunk(&mut self, chunk: &[u8]) -> Vec<RelayEvent> {
        let mut out = Vec::new();
        if self.is_closed() {
            return out;
        }
        self.state = RelayState::Forwarding;

        let mut lines = Vec::new();
        let overflow = self.decoder.push(chunk, &mut lines).err();
        for line in lines {
            self.on_line(&line, &mut out);
            if self.is_closed() {
                // Anything after the sentinel is discarded.
                return out;
            }
        }
        if let Some(err) = overflow {
            self.fault(&err, &mut out);
        }
        out
    }

    /// The upstream stream ended on its own.
    pub fn on_upstream_end(&mut self) -> Vec<RelayEvent> {
        let mut out = Vec::new();
        if self.is_closed() {
            return out;
        }
        if let Some(line) = self.decoder.finish() {
            self.on_line(&line, &mut out);
        }
        if !self.is_closed() {
            debug!(session = %self.id, "Agent stream ended without sentinel");
            self.close(Termination::NaturalEnd, &mut out);
        }
        out
    }

    /// The upstream stream failed after it had started.
    pub fn on_upstream_error(&mut self, err: &Error) -> Vec<RelayEvent> {
        let mut out = Vec::new();
        if !self.is_closed() {
            self.fault(err, &mut out);
        }
        out
    }

    /// Answer locally because the agent could not be reached.
    pub fn fallback(&mut self, answer: &str) -> Vec<RelayEvent> {
        let mut out = Vec::new();
        if self.is_closed() {
            return out;
        }
        out.push(RelayEvent::Content(answer.to_string()));
        self.close(Termination::Fallback, &mut out);
        out
    }

    fn on_line(&mut self, line: &str, out: &mut Vec<RelayEvent>) {
        let Some(event) = parse_line(line) else {
            return;
        };
        match event {
            UpstreamEvent::Content(text) => {
                self.accumulated.push_str(&text);
                out.push(RelayEvent::Content(text));
            }
            UpstreamEvent::Malformed(raw) => {
                debug!(
                    session = %self.id,
                    "{}; forwarding as content",
                    Error::MalformedFrame(raw.clone())
                );
                out.push(RelayEvent::Content(raw));
            }
            UpstreamEvent::Done => {
                let context = techexplorer_discovery::extract(&self.accumulated);
                out.push(RelayEvent::Context(context));
                self.state = RelayState::ContextEmitted;
                self.close(Termination::Sentinel, out);
            }
        }
    }

    /// The caller only ever sees the generic message; the detail is logged.
    fn fault(&mut self, err: &Error, out: &mut Vec<RelayEvent>) {
        error!(session = %self.id, "{}", err);
        self.state = RelayState::Errored;
        out.push(RelayEvent::Error(STREAM_ERROR_MESSAGE.into()));
        self.close(Termination::StreamFault, out);
    }

    fn close(&mut self, how: Termination, out: &mut Vec<RelayEvent>) {
        debug_assert!(self.termination.is_none(), "relay session closed twice");
        self.termination = Some(how);
        self.state = RelayState::Closed;
        out.push(RelayEvent::Done);
        debug!(session = %self.id, ?how, "Relay session closed");
    }
}

impl Drop for RelaySession {
    fn drop(&mut self) {
        if self.state != RelayState::Init && !self.is_closed() {
            debug!(session = %self.id, "Caller disconnected before stream completed");
        }
    }
}

/// Forward an already-open upstream byte stream through `session`.
///
/// The returned stream ends right after the `Done` marker. Dropping it (the
/// caller went away) drops `upstream` with it, which stops the read loop.
pub fn relay_upstream<S, B, E>(mut session: RelaySession, upstream: S) -> RelayStream
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: Display + Send + 'static,
{
    Box::pin(async_stream::stream! {
        session.commit_headers();
        tokio::pin!(upstream);

        while let Some(chunk) = upstream.next().await {
            let events = match chunk {
                Ok(bytes) => session.on_chunk(bytes.as_ref()),
                Err(e) => session.on_upstream_error(&Error::UpstreamStream(e.to_string())),
            };
            for event in events {
                yield event;
            }
            if session.is_closed() {
                return;
            }
        }

        for event in session.on_upstream_end() {
            yield event;
        }
    })
}

/// Run one streaming chat: a single agent attempt, local fallback when it
/// cannot be reached.
pub fn relay_chat(client: AgentClient, question: AgentQuestion) -> RelayStream {
    Box::pin(async_stream::stream! {
        let mut session = RelaySession::new();
        session.commit_headers();
        debug!(session = %session.id(), "Opening agent stream");

        match client.open_stream(&question).await {
            Ok(upstream) => {
                let mut events = relay_upstream(session, upstream);
                while let Some(event) = events.next().await {
                    yield event;
                }
            }
            Err(e) => {
                warn!(session = %session.id(), "{}; answering from local catalog", e);
                let answer = techexplorer_discovery::respond(&question.question);
                for event in session.fallback(answer) {
                    yield event;
                }
            }
        }
    })
}
