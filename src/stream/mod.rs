//! Wire protocol for the backend's streaming endpoints.
//!
//! The stream body is a sequence of newline-terminated lines; lines
//! prefixed with `data:` carry one JSON message each, and all other lines
//! (including blank keep-alives) are ignored.
//!
//! # Module structure
//! - `decode` - Incremental UTF-8 decoding and line framing
//! - `messages` - The `StreamMessage` tagged union and progress payload
//! - `parser` - Line recognition and tolerant JSON decoding

mod decode;
mod messages;
mod parser;

pub use decode::{LineFramer, Utf8StreamDecoder};
pub use messages::{ProgressReport, StreamMessage};
pub use parser::{parse_line, EventParser, LineOutcome, DATA_PREFIX};
