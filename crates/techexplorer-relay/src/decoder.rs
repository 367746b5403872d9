//! Line decoding for the agent's SSE stream.
//!
//! Network chunks do not respect line boundaries, so bytes are buffered until
//! a newline arrives. Only `data:` lines carry events; everything else
//! (comments, `event:` lines, blank separators) is ignored.

use bytes::BytesMut;
use techexplorer_core::{Error, Result};

use crate::types::{UpstreamEvent, DONE_SENTINEL};

/// Longest partial line kept while waiting for its newline.
pub const MAX_LINE_BYTES: usize = 1024 * 1024;

/// Accumulates raw bytes and yields complete lines.
///
/// Bytes before `scanned` are known to hold no newline, so each byte is
/// searched once no matter how many chunks a line spans.
#[derive(Debug)]
pub struct LineDecoder {
    buffer: BytesMut,
    scanned: usize,
    max_line: usize,
}

impl Default for LineDecoder {
    fn default() -> Self {
        Self::with_limit(MAX_LINE_BYTES)
    }
}

impl LineDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(max_line: usize) -> Self {
        Self {
            buffer: BytesMut::new(),
            scanned: 0,
            max_line,
        }
    }

    /// Append a chunk and add every line it completes to `lines`, without
    /// terminators.
    ///
    /// Fails once the unterminated remainder grows past the line limit. Lines
    /// completed by the same chunk are still added, and the remainder is
    /// discarded.
    pub fn push(&mut self, chunk: &[u8], lines: &mut Vec<String>) -> Result<()> {
        self.buffer.extend_from_slice(chunk);

        while let Some(offset) = self.buffer[self.scanned..].iter().position(|&b| b == b'\n') {
            let line = self.buffer.split_to(self.scanned + offset + 1);
            lines.push(decode_line(&line));
            self.scanned = 0;
        }
        self.scanned = self.buffer.len();

        if self.buffer.len() > self.max_line {
            let buffered = self.buffer.len();
            self.buffer.clear();
            self.scanned = 0;
            return Err(Error::MalformedFrame(format!(
                "line exceeds {} bytes ({} buffered without a newline)",
                self.max_line, buffered
            )));
        }
        Ok(())
    }

    /// Take whatever is left after the stream ended without a final newline.
    pub fn finish(&mut self) -> Option<String> {
        if self.buffer.is_empty() {
            return None;
        }
        let rest = self.buffer.split();
        self.scanned = 0;
        Some(decode_line(&rest))
    }
}

fn decode_line(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw)
        .trim_end_matches(['\n', '\r'])
        .to_string()
}

/// Parse one line. Returns `None` for lines that are not data frames.
pub fn parse_line(line: &str) -> Option<UpstreamEvent> {
    if line.trim().is_empty() {
        return None;
    }
    let payload = line.strip_prefix("data:")?.trim();

    if payload == DONE_SENTINEL {
        return Some(UpstreamEvent::Done);
    }

    let text = serde_json::from_str::<serde_json::Value>(payload)
        .ok()
        .and_then(|record| record_text(&record));

    Some(match text {
        Some(text) => UpstreamEvent::Content(text),
        None => UpstreamEvent::Malformed(payload.to_string()),
    })
}

/// `content`, else `text`, ignoring empty or non-string fields.
fn record_text(record: &serde_json::Value) -> Option<String> {
    ["content", "text"]
        .iter()
        .filter_map(|key| record.get(key).and_then(|v| v.as_str()))
        .find(|s| !s.is_empty())
        .map(|s| s.to_string())
}
