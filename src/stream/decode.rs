//! Incremental byte-to-line decoding.
//!
//! The backend delivers the stream body in arbitrary chunks: a chunk
//! boundary can fall inside a multi-byte UTF-8 character, inside a line, or
//! inside a JSON object. [`Utf8StreamDecoder`] heals character splits and
//! [`LineFramer`] heals line splits, so the layers above only ever see
//! whole lines.

/// Stateful UTF-8 decoder that tolerates chunk boundaries inside a
/// multi-byte character.
///
/// An incomplete trailing sequence is held back until the next chunk
/// supplies the remaining bytes. Invalid sequences decode to U+FFFD rather
/// than failing the stream.
#[derive(Debug, Default)]
pub struct Utf8StreamDecoder {
    /// Undecoded tail bytes of a split multi-byte character.
    pending: Vec<u8>,
}

impl Utf8StreamDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode one chunk, returning all text that is complete so far.
    pub fn decode(&mut self, chunk: &[u8]) -> String {
        self.pending.extend_from_slice(chunk);
        let split = complete_prefix_len(&self.pending);
        let tail = self.pending.split_off(split);
        let complete = std::mem::replace(&mut self.pending, tail);
        String::from_utf8_lossy(&complete).into_owned()
    }

    /// Flush any bytes held back at end-of-stream.
    ///
    /// A dangling partial character at this point can no longer be
    /// completed and decodes lossily.
    pub fn finish(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            return None;
        }
        let rest = std::mem::take(&mut self.pending);
        Some(String::from_utf8_lossy(&rest).into_owned())
    }
}

/// Length of the longest prefix of `buf` that does not end in a truncated
/// multi-byte character. At most the last three bytes can be truncated.
fn complete_prefix_len(buf: &[u8]) -> usize {
    let len = buf.len();
    let scan_from = len.saturating_sub(3);
    for i in (scan_from..len).rev() {
        let byte = buf[i];
        if byte < 0x80 {
            // ASCII: everything up to the end is complete.
            return len;
        }
        if byte >= 0xC0 {
            // Leading byte: hold it back if its sequence runs past the end.
            let need = if byte >= 0xF0 {
                4
            } else if byte >= 0xE0 {
                3
            } else {
                2
            };
            return if i + need > len { i } else { len };
        }
        // Continuation byte: keep scanning for the leading byte.
    }
    len
}

/// Accumulates decoded text and yields complete newline-terminated lines.
///
/// The final segment after the last newline stays buffered until the next
/// fragment arrives. Per the backend's framing contract a trailing segment
/// without a terminator at end-of-stream is not a line; callers retrieve it
/// via [`LineFramer::take_partial`] only to log that it was discarded.
#[derive(Debug, Default)]
pub struct LineFramer {
    buffer: String,
}

impl LineFramer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a fragment and drain every complete line. A trailing `\r` is
    /// trimmed so CRLF framing parses identically to LF.
    pub fn push(&mut self, fragment: &str) -> Vec<String> {
        self.buffer.push_str(fragment);
        let mut lines = Vec::new();
        while let Some(pos) = self.buffer.find('\n') {
            let mut line: String = self.buffer.drain(..=pos).collect();
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
            lines.push(line);
        }
        lines
    }

    /// Take the unterminated trailing segment, if any.
    pub fn take_partial(&mut self) -> Option<String> {
        if self.buffer.is_empty() {
            None
        } else {
            Some(std::mem::take(&mut self.buffer))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_ascii_chunks() {
        let mut decoder = Utf8StreamDecoder::new();
        assert_eq!(decoder.decode(b"hello "), "hello ");
        assert_eq!(decoder.decode(b"world"), "world");
        assert!(decoder.finish().is_none());
    }

    #[test]
    fn test_decode_split_multibyte_char() {
        // "서울" is three bytes per character; split mid-character.
        let bytes = "서울".as_bytes();
        let mut decoder = Utf8StreamDecoder::new();
        let first = decoder.decode(&bytes[..4]);
        let second = decoder.decode(&bytes[4..]);
        assert_eq!(format!("{}{}", first, second), "서울");
    }

    #[test]
    fn test_decode_split_four_byte_char() {
        let bytes = "𝕏".as_bytes();
        assert_eq!(bytes.len(), 4);
        let mut decoder = Utf8StreamDecoder::new();
        let mut out = String::new();
        for b in bytes {
            out.push_str(&decoder.decode(std::slice::from_ref(b)));
        }
        assert_eq!(out, "𝕏");
    }

    #[test]
    fn test_decode_every_split_point() {
        let text = "données: “ça” 完了\n";
        let bytes = text.as_bytes();
        for split in 0..=bytes.len() {
            let mut decoder = Utf8StreamDecoder::new();
            let mut out = decoder.decode(&bytes[..split]);
            out.push_str(&decoder.decode(&bytes[split..]));
            if let Some(rest) = decoder.finish() {
                out.push_str(&rest);
            }
            assert_eq!(out, text, "split at byte {}", split);
        }
    }

    #[test]
    fn test_decode_invalid_bytes_replaced() {
        let mut decoder = Utf8StreamDecoder::new();
        let out = decoder.decode(&[b'a', 0xFF, b'b']);
        assert_eq!(out, "a\u{FFFD}b");
    }

    #[test]
    fn test_finish_flushes_truncated_char() {
        let mut decoder = Utf8StreamDecoder::new();
        // First two bytes of a three-byte character.
        let out = decoder.decode(&"한".as_bytes()[..2]);
        assert!(out.is_empty());
        assert_eq!(decoder.finish().unwrap(), "\u{FFFD}");
    }

    #[test]
    fn test_framer_basic_lines() {
        let mut framer = LineFramer::new();
        let lines = framer.push("one\ntwo\nthr");
        assert_eq!(lines, vec!["one".to_string(), "two".to_string()]);
        let lines = framer.push("ee\n");
        assert_eq!(lines, vec!["three".to_string()]);
        assert!(framer.take_partial().is_none());
    }

    #[test]
    fn test_framer_crlf() {
        let mut framer = LineFramer::new();
        let lines = framer.push("alpha\r\nbeta\r\n");
        assert_eq!(lines, vec!["alpha".to_string(), "beta".to_string()]);
    }

    #[test]
    fn test_framer_empty_lines_preserved() {
        let mut framer = LineFramer::new();
        let lines = framer.push("data: {}\n\ndata: {}\n");
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "");
    }

    #[test]
    fn test_framer_partial_retained() {
        let mut framer = LineFramer::new();
        assert!(framer.push("no newline yet").is_empty());
        assert_eq!(framer.take_partial().unwrap(), "no newline yet");
        assert!(framer.take_partial().is_none());
    }
}
