//! Stateful frame parser.
//!
//! Splits decoded text into event blocks separated by a blank line. An
//! incomplete trailing block is retained across feeds and re-evaluated when
//! more text arrives; `flush` emits it as a best-effort final frame when the
//! read loop ends without a terminator.

use once_cell::sync::Lazy;
use regex::Regex;

use super::events::{EventFrame, DEFAULT_EVENT_TYPE};

static BLOCK_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\r?\n\r?\n").expect("block separator pattern"));

/// Accumulates decoded text and emits complete event frames.
#[derive(Debug, Default)]
pub struct FrameParser {
    buffer: String,
}

impl FrameParser {
    /// Create a new parser.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed decoded text, returning every frame completed by this feed.
    ///
    /// Frames come back in the order their terminating blank line was
    /// observed. Text after the last blank line stays buffered.
    pub fn feed(&mut self, text: &str) -> Vec<EventFrame> {
        self.buffer.push_str(text);
        let mut frames = Vec::new();
        loop {
            let (start, end) = match BLOCK_SEPARATOR.find(&self.buffer) {
                Some(m) => (m.start(), m.end()),
                None => break,
            };
            let block = self.buffer[..start].to_string();
            self.buffer.drain(..end);
            if let Some(frame) = parse_block(&block) {
                frames.push(frame);
            }
        }
        frames
    }

    /// Emit the trailing partial block, if it holds any data.
    ///
    /// Called when the stream ends naturally without a closing blank line,
    /// so trailing text still contributes to the document.
    pub fn flush(&mut self) -> Option<EventFrame> {
        if self.buffer.trim().is_empty() {
            self.buffer.clear();
            return None;
        }
        let block = std::mem::take(&mut self.buffer);
        parse_block(&block)
    }

    /// Drop any buffered state.
    pub fn reset(&mut self) {
        self.buffer.clear();
    }
}

/// Parse one block into a frame.
///
/// `event:` lines set the type (last one wins), `data:` lines are collected
/// and joined with newlines. Blocks with no data line are malformed and
/// skipped; the session continues.
fn parse_block(block: &str) -> Option<EventFrame> {
    if block.trim().is_empty() {
        return None;
    }

    let mut event_type: Option<String> = None;
    let mut data_lines: Vec<String> = Vec::new();

    for raw_line in block.split('\n') {
        let line = raw_line.trim_end_matches('\r');
        if line.starts_with(':') {
            continue;
        }
        if let Some(rest) = line.strip_prefix("event:") {
            event_type = Some(rest.trim().to_string());
        } else if let Some(rest) = line.strip_prefix("data:") {
            let value = rest.strip_prefix(' ').unwrap_or(rest);
            data_lines.push(value.trim_end().to_string());
        }
    }

    if data_lines.is_empty() {
        tracing::debug!("skipping block without data line");
        return None;
    }

    Some(EventFrame {
        event_type: event_type.unwrap_or_else(|| DEFAULT_EVENT_TYPE.to_string()),
        data: data_lines.join("\n"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_event() {
        let mut parser = FrameParser::new();
        let frames = parser.feed("event: doc\ndata: Hello\n\n");
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].event_type, "doc");
        assert_eq!(frames[0].data, "Hello");
    }

    #[test]
    fn test_default_event_type_is_message() {
        let mut parser = FrameParser::new();
        let frames = parser.feed("data: no type here\n\n");
        assert_eq!(frames[0].event_type, "message");
    }

    #[test]
    fn test_multiple_data_lines_preserve_line_breaks() {
        let mut parser = FrameParser::new();
        let frames = parser.feed("data: first line\ndata: second line\n\n");
        assert_eq!(frames[0].data, "first line\nsecond line");
    }

    #[test]
    fn test_incomplete_block_is_retained_across_feeds() {
        let mut parser = FrameParser::new();
        assert!(parser.feed("event: doc\nda").is_empty());
        let frames = parser.feed("ta: split across reads\n\n");
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].data, "split across reads");
    }

    #[test]
    fn test_crlf_framing() {
        let mut parser = FrameParser::new();
        let frames = parser.feed("event: doc\r\ndata: windows line\r\n\r\n");
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].data, "windows line");
    }

    #[test]
    fn test_multiple_blocks_in_one_feed() {
        let mut parser = FrameParser::new();
        let frames = parser.feed("data: one\n\ndata: two\n\ndata: three\n\n");
        let payloads: Vec<&str> = frames.iter().map(|f| f.data.as_str()).collect();
        assert_eq!(payloads, vec!["one", "two", "three"]);
    }

    #[test]
    fn test_block_without_data_is_skipped() {
        let mut parser = FrameParser::new();
        let frames = parser.feed("event: doc\n\ndata: kept\n\n");
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].data, "kept");
    }

    #[test]
    fn test_comment_lines_are_ignored() {
        let mut parser = FrameParser::new();
        let frames = parser.feed(": keepalive\ndata: payload\n\n");
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].data, "payload");
    }

    #[test]
    fn test_flush_emits_unterminated_trailing_block() {
        let mut parser = FrameParser::new();
        assert!(parser.feed("data: tail without blank line").is_empty());
        let frame = parser.flush().unwrap();
        assert_eq!(frame.data, "tail without blank line");
        assert!(parser.flush().is_none());
    }

    #[test]
    fn test_flush_on_empty_buffer_is_none() {
        let mut parser = FrameParser::new();
        assert!(parser.flush().is_none());
        parser.feed("data: complete\n\n");
        assert!(parser.flush().is_none());
    }

    #[test]
    fn test_reset_drops_partial_state() {
        let mut parser = FrameParser::new();
        parser.feed("data: partial");
        parser.reset();
        assert!(parser.flush().is_none());
    }
}
