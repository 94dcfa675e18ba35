// MIT License - Copyright (c) 2026 Peter Wright
// Elk M1 ASCII protocol client

//! Line framing for the M1XEP byte stream.
//!
//! Incoming lines are yielded with their terminators attached, because the
//! telegram decoder locates the payload relative to the end of the raw line.

use bytes::{Buf, BytesMut};
use tokio_util::codec::{Decoder, Encoder};
use tracing::warn;

use crate::error::{ElkError, Result};

/// Default longest line accepted before it is discarded.
pub const DEFAULT_MAX_LINE_LENGTH: usize = 1024;

/// Splits the panel's byte stream into telegram lines and writes framed
/// telegrams back out.
#[derive(Debug)]
pub struct TelegramCodec {
    max_line_length: usize,
    /// Index up to which `src` has already been searched for a newline.
    next_index: usize,
    /// Set while skipping the rest of an oversized line.
    discarding: bool,
}

impl TelegramCodec {
    pub fn new() -> Self {
        Self::with_max_line_length(DEFAULT_MAX_LINE_LENGTH)
    }

    pub fn with_max_line_length(max_line_length: usize) -> Self {
        Self {
            max_line_length,
            next_index: 0,
            discarding: false,
        }
    }

    pub fn max_line_length(&self) -> usize {
        self.max_line_length
    }
}

impl Default for TelegramCodec {
    fn default() -> Self {
        Self::new()
    }
}

fn is_blank(line: &[u8]) -> bool {
    line.iter().all(u8::is_ascii_whitespace)
}

impl Decoder for TelegramCodec {
    type Item = String;
    type Error = ElkError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<String>> {
        loop {
            let start = self.next_index.min(src.len());
            let newline = src[start..]
                .iter()
                .position(|b| *b == b'\n')
                .map(|offset| start + offset);

            match newline {
                Some(pos) => {
                    let line = src.split_to(pos + 1);
                    self.next_index = 0;
                    if self.discarding {
                        self.discarding = false;
                        continue;
                    }
                    if line.len() > self.max_line_length {
                        warn!(
                            "Discarding line longer than {} bytes",
                            self.max_line_length
                        );
                        continue;
                    }
                    if is_blank(&line) {
                        continue;
                    }
                    return Ok(Some(String::from_utf8_lossy(&line).into_owned()));
                }
                None if src.len() > self.max_line_length => {
                    if !self.discarding {
                        warn!(
                            "Discarding line longer than {} bytes",
                            self.max_line_length
                        );
                        self.discarding = true;
                    }
                    src.advance(src.len());
                    self.next_index = 0;
                    return Ok(None);
                }
                None => {
                    self.next_index = src.len();
                    return Ok(None);
                }
            }
        }
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<String>> {
        if let Some(line) = self.decode(src)? {
            return Ok(Some(line));
        }
        self.next_index = 0;
        if self.discarding || src.is_empty() || is_blank(src) {
            self.discarding = false;
            src.clear();
            return Ok(None);
        }
        let rest = src.split_to(src.len());
        Ok(Some(String::from_utf8_lossy(&rest).into_owned()))
    }
}

impl Encoder<String> for TelegramCodec {
    type Error = ElkError;

    /// Writes an already framed telegram.
    fn encode(&mut self, telegram: String, dst: &mut BytesMut) -> Result<()> {
        if telegram.len() > self.max_line_length {
            return Err(ElkError::LineTooLong {
                limit: self.max_line_length,
            });
        }
        dst.extend_from_slice(telegram.as_bytes());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_keeps_terminator() {
        let mut codec = TelegramCodec::new();
        let mut buffer = BytesMut::from(&b"0AZC012100CB\r\n"[..]);
        let line = codec.decode(&mut buffer).unwrap();
        assert_eq!(line.as_deref(), Some("0AZC012100CB\r\n"));
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_decode_partial_then_complete() {
        let mut codec = TelegramCodec::new();
        let mut buffer = BytesMut::from(&b"0AZC01"[..]);
        assert_eq!(codec.decode(&mut buffer).unwrap(), None);

        buffer.extend_from_slice(b"2100CB\r\n1EAS");
        let line = codec.decode(&mut buffer).unwrap();
        assert_eq!(line.as_deref(), Some("0AZC012100CB\r\n"));
        assert_eq!(codec.decode(&mut buffer).unwrap(), None);
        assert_eq!(&buffer[..], b"1EAS");
    }

    #[test]
    fn test_decode_multiple_lines_in_order() {
        let mut codec = TelegramCodec::new();
        let mut buffer = BytesMut::from(&b"first\r\nsecond\r\n"[..]);
        assert_eq!(codec.decode(&mut buffer).unwrap().as_deref(), Some("first\r\n"));
        assert_eq!(codec.decode(&mut buffer).unwrap().as_deref(), Some("second\r\n"));
        assert_eq!(codec.decode(&mut buffer).unwrap(), None);
    }

    #[test]
    fn test_blank_lines_skipped() {
        let mut codec = TelegramCodec::new();
        let mut buffer = BytesMut::from(&b"\r\n\r\n06as0066\r\n"[..]);
        assert_eq!(
            codec.decode(&mut buffer).unwrap().as_deref(),
            Some("06as0066\r\n")
        );
    }

    #[test]
    fn test_oversized_line_discarded() {
        let mut codec = TelegramCodec::with_max_line_length(8);
        let mut buffer = BytesMut::from(&b"0123456789ABCDEF"[..]);
        assert_eq!(codec.decode(&mut buffer).unwrap(), None);
        assert!(buffer.is_empty());

        // Remainder of the long line is dropped, the next line survives.
        buffer.extend_from_slice(b"GHIJ\r\nok\r\n");
        assert_eq!(codec.decode(&mut buffer).unwrap().as_deref(), Some("ok\r\n"));
    }

    #[test]
    fn test_oversized_line_in_one_read_discarded() {
        let mut codec = TelegramCodec::with_max_line_length(8);
        let mut buffer = BytesMut::from(&b"0123456789ABCDEF\r\nok\r\n"[..]);
        assert_eq!(codec.decode(&mut buffer).unwrap().as_deref(), Some("ok\r\n"));
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_decode_eof_yields_remainder() {
        let mut codec = TelegramCodec::new();
        let mut buffer = BytesMut::from(&b"06as0066"[..]);
        assert_eq!(
            codec.decode_eof(&mut buffer).unwrap().as_deref(),
            Some("06as0066")
        );
        assert_eq!(codec.decode_eof(&mut buffer).unwrap(), None);
    }

    #[test]
    fn test_encode() {
        let mut codec = TelegramCodec::new();
        let mut buffer = BytesMut::new();
        codec.encode("06as0066\r\n".to_string(), &mut buffer).unwrap();
        assert_eq!(&buffer[..], b"06as0066\r\n");
    }

    #[test]
    fn test_encode_too_long() {
        let mut codec = TelegramCodec::with_max_line_length(4);
        let mut buffer = BytesMut::new();
        let result = codec.encode("06as0066\r\n".to_string(), &mut buffer);
        assert!(matches!(result, Err(ElkError::LineTooLong { limit: 4 })));
        assert!(buffer.is_empty());
    }
}
