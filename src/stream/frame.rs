//! Event-stream framing: byte chunks → lines → `data: ` frames.
//!
//! Transport chunks are arbitrary: a frame, or a multi-byte UTF-8 character,
//! can be split across two reads. The framer buffers raw bytes and only decodes
//! a line once its terminating `\n` has arrived.

use crate::domain::kline::wire::KlineBatch;
use crate::error::DecodeError;

/// Prefix marking a payload line.
pub const DATA_PREFIX: &str = "data: ";

/// Longest line accepted before it is dropped as a [`DecodeError::LineTooLong`].
pub const MAX_LINE_BYTES: usize = 1 << 20;

/// Reassembles newline-delimited lines from a chunked byte stream.
#[derive(Debug)]
pub struct LineFramer {
    buf: Vec<u8>,
    /// Bytes of `buf` already searched for `\n`.
    scanned: usize,
    max_line: usize,
    /// Dropping the rest of an oversized line up to its terminator.
    discarding: bool,
}

impl Default for LineFramer {
    fn default() -> Self {
        Self::with_max_line(MAX_LINE_BYTES)
    }
}

impl LineFramer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_line(max_line: usize) -> Self {
        Self {
            buf: Vec::new(),
            scanned: 0,
            max_line,
            discarding: false,
        }
    }

    /// Feed one chunk; returns every line it completed, in order.
    ///
    /// Blank lines are dropped. A trailing `\r` is stripped. A line longer than
    /// the limit yields one `LineTooLong` error and is discarded.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<Result<String, DecodeError>> {
        self.buf.extend_from_slice(chunk);

        let mut lines = Vec::new();
        let mut start = 0;
        while let Some(offset) = self.buf[self.scanned..].iter().position(|&b| b == b'\n') {
            let end = self.scanned + offset;
            if self.discarding {
                self.discarding = false;
            } else if end - start > self.max_line {
                lines.push(Err(self.too_long()));
            } else if let Some(line) = decode_line(&self.buf[start..end]) {
                lines.push(line);
            }
            start = end + 1;
            self.scanned = start;
        }
        self.buf.drain(..start);
        self.scanned = self.buf.len();

        if self.buf.len() > self.max_line {
            if !self.discarding {
                lines.push(Err(self.too_long()));
                self.discarding = true;
            }
            self.buf.clear();
            self.scanned = 0;
        }
        lines
    }

    /// Flush an unterminated final line at end-of-stream.
    pub fn finish(&mut self) -> Option<Result<String, DecodeError>> {
        let rest = std::mem::take(&mut self.buf);
        self.scanned = 0;
        if std::mem::take(&mut self.discarding) {
            return None;
        }
        decode_line(&rest)
    }

    /// Bytes held while waiting for a line terminator.
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }

    fn too_long(&self) -> DecodeError {
        DecodeError::LineTooLong {
            limit: self.max_line,
        }
    }
}

fn decode_line(raw: &[u8]) -> Option<Result<String, DecodeError>> {
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    if raw.iter().all(u8::is_ascii_whitespace) {
        return None;
    }
    Some(
        std::str::from_utf8(raw)
            .map(str::to_string)
            .map_err(|_| DecodeError::InvalidUtf8),
    )
}

/// Parse one line. `None` for lines that are not `data: ` frames.
pub fn parse_frame(line: &str) -> Option<Result<KlineBatch, DecodeError>> {
    let payload = line.strip_prefix(DATA_PREFIX)?;
    Some(serde_json::from_str(payload).map_err(DecodeError::from))
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: &str = concat!(
        r#"data: {"klines":[{"timestamp":"1","raw_open":1,"open_decimals":0,"#,
        r#""raw_close":2,"close_decimals":0,"raw_high":3,"high_decimals":0,"#,
        r#""raw_low":1,"low_decimals":0,"raw_volume":5,"volume_decimals":0,"#,
        r#""raw_turnover":7,"turnover_decimals":0}]}"#
    );

    fn ok_lines(lines: Vec<Result<String, DecodeError>>) -> Vec<String> {
        lines.into_iter().map(|l| l.unwrap()).collect()
    }

    #[test]
    fn test_push_complete_lines() {
        let mut framer = LineFramer::new();
        let lines = ok_lines(framer.push(b"data: a\ndata: b\n"));
        assert_eq!(lines, ["data: a", "data: b"]);
        assert_eq!(framer.buffered(), 0);
    }

    #[test]
    fn test_partial_line_across_chunks() {
        let mut framer = LineFramer::new();
        assert!(framer.push(b"data: {\"kl").is_empty());
        assert_eq!(framer.buffered(), 10);
        let lines = ok_lines(framer.push(b"ines\":[]}\n"));
        assert_eq!(lines, ["data: {\"klines\":[]}"]);
    }

    #[test]
    fn test_utf8_split_across_chunks() {
        let bytes = "data: 币种\n".as_bytes();
        let mut framer = LineFramer::new();
        // Split inside the first multi-byte character.
        assert!(framer.push(&bytes[..8]).is_empty());
        let lines = ok_lines(framer.push(&bytes[8..]));
        assert_eq!(lines, ["data: 币种"]);
    }

    #[test]
    fn test_crlf_and_blank_lines() {
        let mut framer = LineFramer::new();
        let lines = ok_lines(framer.push(b"data: a\r\n\r\n\n   \ndata: b\r\n"));
        assert_eq!(lines, ["data: a", "data: b"]);
    }

    #[test]
    fn test_invalid_utf8_line_is_an_error() {
        let mut framer = LineFramer::new();
        let lines = framer.push(b"data: \xff\xfe\ndata: ok\n");
        assert!(matches!(lines[0], Err(DecodeError::InvalidUtf8)));
        assert_eq!(lines[1].as_ref().unwrap(), "data: ok");
    }

    #[test]
    fn test_line_split_over_many_chunks() {
        let mut framer = LineFramer::new();
        for byte in b"data: abc" {
            assert!(framer.push(std::slice::from_ref(byte)).is_empty());
        }
        assert_eq!(framer.buffered(), 9);
        let lines = ok_lines(framer.push(b"\ndata: d\n"));
        assert_eq!(lines, ["data: abc", "data: d"]);
        assert_eq!(framer.buffered(), 0);
    }

    #[test]
    fn test_oversized_unterminated_line_is_dropped() {
        let mut framer = LineFramer::with_max_line(8);
        assert!(framer.push(b"data: 01").is_empty());

        let lines = framer.push(b"23456789");
        assert_eq!(lines.len(), 1);
        assert!(matches!(lines[0], Err(DecodeError::LineTooLong { limit: 8 })));
        assert_eq!(framer.buffered(), 0);

        // The tail of the long line is skipped without a second error.
        assert!(framer.push(b"more bytes").is_empty());
        let lines = ok_lines(framer.push(b"tail\ndata: ok\n"));
        assert_eq!(lines, ["data: ok"]);
    }

    #[test]
    fn test_oversized_terminated_line_is_dropped() {
        let mut framer = LineFramer::with_max_line(8);
        let lines = framer.push(b"data: far too long\ndata: ok\n");
        assert_eq!(lines.len(), 2);
        assert!(matches!(lines[0], Err(DecodeError::LineTooLong { .. })));
        assert_eq!(lines[1].as_ref().unwrap(), "data: ok");
    }

    #[test]
    fn test_finish_after_oversized_line_is_empty() {
        let mut framer = LineFramer::with_max_line(4);
        assert_eq!(framer.push(b"data: xyz").len(), 1);
        assert!(framer.finish().is_none());
    }

    #[test]
    fn test_finish_flushes_unterminated_line() {
        let mut framer = LineFramer::new();
        assert!(framer.push(b"data: tail").is_empty());
        assert_eq!(framer.finish().unwrap().unwrap(), "data: tail");
        assert!(framer.finish().is_none());
    }

    #[test]
    fn test_parse_frame_ignores_other_lines() {
        assert!(parse_frame("event: kline").is_none());
        assert!(parse_frame(": keep-alive").is_none());
        assert!(parse_frame("data:{}").is_none());
    }

    #[test]
    fn test_parse_frame_decodes_batch() {
        let batch = parse_frame(FRAME).unwrap().unwrap();
        assert_eq!(batch.klines.len(), 1);
        assert_eq!(batch.klines[0].raw_close, 2);
    }

    #[test]
    fn test_parse_frame_reports_bad_json() {
        assert!(matches!(
            parse_frame("data: {not json"),
            Some(Err(DecodeError::Json(_)))
        ));
    }
}
