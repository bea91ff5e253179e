//! Per-frame input buffer with unlimited pushback.
//!
//! Pushed-back bytes are written right in front of the read position when
//! there is room there, so ungetting what was just read costs a copy of
//! the ungotten bytes and nothing else. When there is no room the unread
//! remainder is moved into a fresh allocation with headroom in front.
//!
//! Whole tokens are pushed back as *segments*: a token recorded at the
//! read position it was ungotten at. The token is handed out again when
//! the read position comes back to that marker. Segments form a stack:
//! later ungets sit at lower positions and are re-read first.
//!
//! The buffer owns the frame's line counter. Consuming bytes adds their
//! newlines; ungetting bytes subtracts them, so the line number after the
//! whole input is read does not depend on how much was pushed back.

use crate::count_newlines;

/// Smallest headroom reserved in front of the read position on reallocation.
const MIN_HEADROOM: usize = 64;

/// A token waiting in the pushback buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UngotToken {
    pub tok_id: i32,
    pub lexeme: Vec<u8>,
    /// Newlines the token spans; re-added to the line counter on re-read.
    pub n_lfs: u32,
}

#[derive(Clone, Debug)]
struct Segment {
    marker: usize,
    token: UngotToken,
}

/// Input buffer of one frame.
#[derive(Clone, Debug)]
pub struct PushbackBuffer {
    buf: Vec<u8>,
    pos: usize,
    line: i32,
    at_line_start: bool,
    segments: Vec<Segment>,
}

impl PushbackBuffer {
    /// Buffer over `bytes`, starting at line 1.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            buf: bytes,
            pos: 0,
            line: 1,
            at_line_start: true,
            segments: Vec::new(),
        }
    }

    /// Current line number.
    pub fn line(&self) -> i32 {
        self.line
    }

    pub fn set_line(&mut self, line: i32) {
        self.line = line;
    }

    /// Adjust the line counter by `delta` newlines.
    pub fn add_lines(&mut self, delta: u32) {
        self.line = self.line.saturating_add_unsigned(delta);
    }

    /// Returns `true` if the last consumed byte was a newline (or nothing
    /// was consumed yet).
    pub fn at_line_start(&self) -> bool {
        self.at_line_start
    }

    /// Position where the next pending token segment starts, if any.
    fn next_marker(&self) -> usize {
        self.segments.last().map_or(self.buf.len(), |s| s.marker)
    }

    /// Unread bytes up to the next pending token.
    pub fn rest(&self) -> &[u8] {
        &self.buf[self.pos..self.next_marker()]
    }

    /// Consume `n` bytes of [`rest`](Self::rest) (clamped), counting newlines.
    pub fn advance(&mut self, n: usize) {
        let end = (self.pos + n).min(self.next_marker());
        if end == self.pos {
            return;
        }
        let consumed = &self.buf[self.pos..end];
        self.line = self.line.saturating_add_unsigned(count_newlines(consumed));
        self.at_line_start = consumed.last() == Some(&b'\n');
        self.pos = end;
    }

    /// Take the pending token if the read position reached its marker.
    pub fn take_token(&mut self) -> Option<UngotToken> {
        if self.segments.last()?.marker != self.pos {
            return None;
        }
        let segment = self.segments.pop()?;
        self.add_lines(segment.token.n_lfs);
        Some(segment.token)
    }

    /// Push back one character.
    pub fn unget_char(&mut self, ch: char) {
        let mut utf8 = [0u8; 4];
        self.unget_bytes(ch.encode_utf8(&mut utf8).as_bytes());
    }

    /// Push back a string.
    pub fn unget_str(&mut self, s: &str) {
        self.unget_bytes(s.as_bytes());
    }

    /// Push back raw bytes; they are read before anything else.
    pub fn unget_bytes(&mut self, bytes: &[u8]) {
        if bytes.is_empty() {
            return;
        }
        if self.pos < bytes.len() {
            self.make_room(bytes.len());
        }
        let start = self.pos - bytes.len();
        self.buf[start..self.pos].copy_from_slice(bytes);
        self.pos = start;
        self.line = self.line.saturating_sub_unsigned(count_newlines(bytes));
        self.at_line_start = false;
    }

    /// Push back a whole token; it is returned by
    /// [`take_token`](Self::take_token) before any unread byte.
    pub fn unget_token(&mut self, tok_id: i32, lexeme: &[u8], n_lfs: u32) {
        self.line = self.line.saturating_sub_unsigned(n_lfs);
        self.segments.push(Segment {
            marker: self.pos,
            token: UngotToken {
                tok_id,
                lexeme: lexeme.to_vec(),
                n_lfs,
            },
        });
    }

    /// Move the unread remainder into a new allocation with at least
    /// `needed` bytes of headroom in front of it.
    fn make_room(&mut self, needed: usize) {
        let remaining = self.buf.len() - self.pos;
        let headroom = needed.max(remaining).max(MIN_HEADROOM);
        let mut fresh = Vec::with_capacity(headroom + remaining);
        fresh.resize(headroom, 0);
        fresh.extend_from_slice(&self.buf[self.pos..]);
        for segment in &mut self.segments {
            segment.marker = segment.marker - self.pos + headroom;
        }
        self.buf = fresh;
        self.pos = headroom;
    }
}

#[cfg(test)]
mod tests;
