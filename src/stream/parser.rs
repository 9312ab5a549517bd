//! Event line parsing.
//!
//! Event-carrying lines are prefixed with `data:`; everything else on the
//! stream (blank keep-alive lines, stray text) is ignored. A single bad
//! payload is reported as a recoverable outcome, never as a stream error:
//! the session must survive malformed input.

use tracing::debug;

use super::decode::{LineFramer, Utf8StreamDecoder};
use super::messages::StreamMessage;

/// Prefix marking an event-carrying line.
pub const DATA_PREFIX: &str = "data:";

/// Outcome of parsing one framed line.
#[derive(Debug, Clone, PartialEq)]
pub enum LineOutcome {
    /// Not an event line (blank keep-alive, comment, stray text).
    Ignored,
    /// A recognized, well-formed message.
    Message(StreamMessage),
    /// A `data:` line whose payload failed to parse. Recoverable; the
    /// caller logs it and moves on.
    Malformed { error: String, line: String },
    /// A structurally valid payload with a `type` this client does not
    /// know. Treated as a no-op so newer backends stay compatible.
    UnknownType { message_type: String },
}

/// Parse one framed line from the stream body.
pub fn parse_line(line: &str) -> LineOutcome {
    let Some(rest) = line.strip_prefix(DATA_PREFIX) else {
        return LineOutcome::Ignored;
    };
    let payload = rest.trim_start();
    if payload.is_empty() {
        return LineOutcome::Ignored;
    }

    // Decode via Value first so an unknown `type` can be told apart from
    // genuinely broken JSON.
    let value: serde_json::Value = match serde_json::from_str(payload) {
        Ok(v) => v,
        Err(e) => {
            return LineOutcome::Malformed {
                error: e.to_string(),
                line: line.to_string(),
            }
        }
    };

    let message_type = value
        .get("type")
        .and_then(|t| t.as_str())
        .map(str::to_string);
    match serde_json::from_value::<StreamMessage>(value) {
        Ok(message) => LineOutcome::Message(message),
        Err(e) => match message_type {
            Some(t) if !StreamMessage::KNOWN_TYPES.contains(&t.as_str()) => {
                LineOutcome::UnknownType { message_type: t }
            }
            _ => LineOutcome::Malformed {
                error: e.to_string(),
                line: line.to_string(),
            },
        },
    }
}

/// Stateful parser turning raw byte chunks into line outcomes.
///
/// Owns the UTF-8 decoder and line framer for one session; one parser per
/// stream, never reused across sessions.
#[derive(Debug, Default)]
pub struct EventParser {
    decoder: Utf8StreamDecoder,
    framer: LineFramer,
}

impl EventParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk from the response body, returning the outcome of
    /// every line the chunk completed.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<LineOutcome> {
        let text = self.decoder.decode(chunk);
        self.framer
            .push(&text)
            .iter()
            .map(|line| parse_line(line))
            .collect()
    }

    /// Signal end-of-stream, draining any text still held by the decoder.
    ///
    /// A trailing segment without a newline terminator is not a complete
    /// line and is discarded, matching the sender's framing contract.
    pub fn finish(&mut self) -> Vec<LineOutcome> {
        let mut outcomes = Vec::new();
        if let Some(text) = self.decoder.finish() {
            outcomes.extend(self.framer.push(&text).iter().map(|l| parse_line(l)));
        }
        if let Some(partial) = self.framer.take_partial() {
            debug!(
                len = partial.len(),
                "dropping unterminated trailing segment at end of stream"
            );
        }
        outcomes
    }
}
