//! Transport reader: byte chunks in, event frames out.
//!
//! Pulls chunks from a streaming response body, decodes them with a
//! stateful UTF-8 decoder so multi-byte characters split across chunk
//! boundaries are reassembled, and feeds the decoded text to the frame
//! parser. Cancellation is checked ahead of every chunk pull; once the
//! token fires the reader stops pulling and the connection is dropped.

use std::collections::VecDeque;

use futures_util::stream::{self, Stream};
use futures_util::StreamExt;
use tokio_util::sync::CancellationToken;

use crate::sse::{EventFrame, FrameParser};
use crate::traits::{ByteStream, HttpError};

/// Incremental UTF-8 decoder.
///
/// Keeps an incomplete trailing multi-byte sequence between chunks. Invalid
/// bytes decode to U+FFFD rather than failing the stream.
#[derive(Debug, Default)]
pub struct Utf8Decoder {
    pending: Vec<u8>,
}

impl Utf8Decoder {
    /// Create a new decoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a chunk, returning all complete text it yields.
    pub fn decode(&mut self, chunk: &[u8]) -> String {
        self.pending.extend_from_slice(chunk);
        let mut out = String::new();
        loop {
            match std::str::from_utf8(&self.pending) {
                Ok(valid) => {
                    out.push_str(valid);
                    self.pending.clear();
                    break;
                }
                Err(err) => {
                    let valid_len = err.valid_up_to();
                    if let Ok(valid) = std::str::from_utf8(&self.pending[..valid_len]) {
                        out.push_str(valid);
                    }
                    match err.error_len() {
                        Some(invalid_len) => {
                            out.push('\u{FFFD}');
                            self.pending.drain(..valid_len + invalid_len);
                        }
                        None => {
                            // Incomplete sequence at the tail: keep it for
                            // the next chunk.
                            self.pending.drain(..valid_len);
                            break;
                        }
                    }
                }
            }
        }
        out
    }

    /// Flush at end of stream. A leftover incomplete sequence becomes a
    /// single replacement character.
    pub fn finish(&mut self) -> String {
        if self.pending.is_empty() {
            String::new()
        } else {
            self.pending.clear();
            "\u{FFFD}".to_string()
        }
    }
}

/// What the reader hands the session per item.
#[derive(Debug)]
pub(crate) enum ReaderEvent {
    /// A complete event frame
    Frame(EventFrame),
    /// The cancellation token fired; no further chunks will be pulled
    Aborted,
    /// A mid-stream read failed
    Failed(HttpError),
}

struct ReaderState {
    bytes: ByteStream,
    parser: FrameParser,
    decoder: Utf8Decoder,
    queued: VecDeque<EventFrame>,
    cancel: CancellationToken,
    finished: bool,
}

/// Turn a streaming response body into an ordered stream of frames.
///
/// Frames come out in exactly the order their boundaries were observed in
/// the byte stream. When the body ends without a terminator, the trailing
/// partial block is flushed as a final best-effort frame.
pub(crate) fn read_frames(
    bytes: ByteStream,
    cancel: CancellationToken,
) -> impl Stream<Item = ReaderEvent> + Send {
    let state = ReaderState {
        bytes,
        parser: FrameParser::new(),
        decoder: Utf8Decoder::new(),
        queued: VecDeque::new(),
        cancel,
        finished: false,
    };

    stream::unfold(state, |mut st| async move {
        loop {
            // Frames parsed from already-pulled chunks drain first.
            if let Some(frame) = st.queued.pop_front() {
                return Some((ReaderEvent::Frame(frame), st));
            }
            if st.finished {
                return None;
            }
            if st.cancel.is_cancelled() {
                st.finished = true;
                return Some((ReaderEvent::Aborted, st));
            }

            tokio::select! {
                biased;
                _ = st.cancel.cancelled() => {
                    st.finished = true;
                    return Some((ReaderEvent::Aborted, st));
                }
                next = st.bytes.next() => match next {
                    Some(Ok(chunk)) => {
                        let text = st.decoder.decode(&chunk);
                        if !text.is_empty() {
                            st.queued.extend(st.parser.feed(&text));
                        }
                    }
                    Some(Err(err)) => {
                        st.finished = true;
                        return Some((ReaderEvent::Failed(err), st));
                    }
                    None => {
                        st.finished = true;
                        let tail = st.decoder.finish();
                        if !tail.is_empty() {
                            st.queued.extend(st.parser.feed(&tail));
                        }
                        if let Some(frame) = st.parser.flush() {
                            st.queued.push_back(frame);
                        }
                    }
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn byte_stream(chunks: Vec<&'static [u8]>) -> ByteStream {
        let items: Vec<Result<Bytes, HttpError>> = chunks
            .into_iter()
            .map(|c| Ok(Bytes::from_static(c)))
            .collect();
        Box::pin(stream::iter(items))
    }

    // Utf8Decoder

    #[test]
    fn test_decode_ascii_passthrough() {
        let mut decoder = Utf8Decoder::new();
        assert_eq!(decoder.decode(b"hello"), "hello");
        assert!(decoder.finish().is_empty());
    }

    #[test]
    fn test_decode_multibyte_split_across_chunks() {
        // "é" is 0xC3 0xA9
        let mut decoder = Utf8Decoder::new();
        assert_eq!(decoder.decode(&[0x63, 0x61, 0x66, 0xC3]), "caf");
        assert_eq!(decoder.decode(&[0xA9]), "é");
    }

    #[test]
    fn test_decode_four_byte_char_split_three_ways() {
        // U+1F5E3 (🗣) is F0 9F 97 A3
        let mut decoder = Utf8Decoder::new();
        assert_eq!(decoder.decode(&[0xF0]), "");
        assert_eq!(decoder.decode(&[0x9F, 0x97]), "");
        assert_eq!(decoder.decode(&[0xA3]), "\u{1F5E3}");
    }

    #[test]
    fn test_decode_invalid_byte_becomes_replacement() {
        let mut decoder = Utf8Decoder::new();
        let out = decoder.decode(&[0x61, 0xFF, 0x62]);
        assert_eq!(out, "a\u{FFFD}b");
    }

    #[test]
    fn test_finish_flushes_incomplete_tail() {
        let mut decoder = Utf8Decoder::new();
        decoder.decode(&[0xC3]);
        assert_eq!(decoder.finish(), "\u{FFFD}");
        assert!(decoder.finish().is_empty());
    }

    // read_frames

    #[tokio::test]
    async fn test_frames_from_single_chunk() {
        let bytes = byte_stream(vec![b"data: one\n\ndata: two\n\n"]);
        let frames: Vec<ReaderEvent> =
            read_frames(bytes, CancellationToken::new()).collect().await;
        assert_eq!(frames.len(), 2);
        assert!(matches!(&frames[0], ReaderEvent::Frame(f) if f.data == "one"));
        assert!(matches!(&frames[1], ReaderEvent::Frame(f) if f.data == "two"));
    }

    #[tokio::test]
    async fn test_frames_from_split_chunks() {
        let bytes = byte_stream(vec![b"data: sp", b"lit pay", b"load\n\n"]);
        let frames: Vec<ReaderEvent> =
            read_frames(bytes, CancellationToken::new()).collect().await;
        assert_eq!(frames.len(), 1);
        assert!(matches!(&frames[0], ReaderEvent::Frame(f) if f.data == "split payload"));
    }

    #[tokio::test]
    async fn test_trailing_block_flushed_at_end() {
        let bytes = byte_stream(vec![b"data: complete\n\ndata: trailing"]);
        let frames: Vec<ReaderEvent> =
            read_frames(bytes, CancellationToken::new()).collect().await;
        assert_eq!(frames.len(), 2);
        assert!(matches!(&frames[1], ReaderEvent::Frame(f) if f.data == "trailing"));
    }

    #[tokio::test]
    async fn test_pre_cancelled_token_aborts_immediately() {
        let token = CancellationToken::new();
        token.cancel();
        let bytes = byte_stream(vec![b"data: never seen\n\n"]);
        let events: Vec<ReaderEvent> = read_frames(bytes, token).collect().await;
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], ReaderEvent::Aborted));
    }

    #[tokio::test]
    async fn test_read_failure_surfaces_and_ends() {
        let items: Vec<Result<Bytes, HttpError>> = vec![
            Ok(Bytes::from_static(b"data: ok\n\n")),
            Err(HttpError::Io("reset".to_string())),
        ];
        let bytes: ByteStream = Box::pin(stream::iter(items));
        let events: Vec<ReaderEvent> =
            read_frames(bytes, CancellationToken::new()).collect().await;
        assert_eq!(events.len(), 2);
        assert!(matches!(&events[0], ReaderEvent::Frame(_)));
        assert!(matches!(&events[1], ReaderEvent::Failed(_)));
    }
}
