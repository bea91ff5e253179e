//! Cursor over a byte slice with a virtual `0x00` sentinel.
//!
//! Reads at or past the end of the slice yield `0x00`, so the scanner can
//! look ahead a few bytes without bounds checks at every call site. EOF is
//! `pos >= len`; an interior NUL is a NUL at `pos < len`.
//!
//! The cursor is [`Copy`]: the tokenizer snapshots it before trying a
//! token category and simply discards the copy on a miss.

/// Number of `\n` bytes in `bytes`.
///
/// Used wherever a consumed region has to be reflected in the line
/// counter in one step (literals, comments, pushback).
#[allow(
    clippy::cast_possible_truncation,
    reason = "line counts are bounded by u32; inputs larger than 4 GiB are rejected upstream"
)]
pub fn count_newlines(bytes: &[u8]) -> u32 {
    memchr::memchr_iter(b'\n', bytes).count() as u32
}

/// Cursor over a byte slice.
#[derive(Clone, Copy, Debug)]
pub struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Create a cursor at position 0.
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Byte at `pos + offset`, or `0x00` past the end.
    #[inline]
    pub fn byte_at(&self, offset: usize) -> u8 {
        self.buf.get(self.pos + offset).copied().unwrap_or(0)
    }

    /// Returns the byte at the current position.
    #[inline]
    pub fn current(&self) -> u8 {
        self.byte_at(0)
    }

    /// Returns the byte one position ahead of current.
    #[inline]
    pub fn peek(&self) -> u8 {
        self.byte_at(1)
    }

    /// Returns the byte two positions ahead of current.
    #[inline]
    pub fn peek2(&self) -> u8 {
        self.byte_at(2)
    }

    /// Advance the cursor by one byte. Never moves past the end.
    #[inline]
    pub fn advance(&mut self) {
        self.advance_n(1);
    }

    /// Advance the cursor by `n` bytes, clamped to the end of the slice.
    #[inline]
    pub fn advance_n(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.buf.len());
    }

    /// Returns `true` once every byte has been consumed.
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.pos >= self.buf.len()
    }

    /// Current byte offset.
    #[inline]
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Length of the underlying slice.
    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns `true` if the underlying slice is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// The unread remainder.
    #[inline]
    pub fn rest(&self) -> &'a [u8] {
        &self.buf[self.pos..]
    }

    /// Bytes in `start..end`, clamped to the slice.
    pub fn slice(&self, start: usize, end: usize) -> &'a [u8] {
        let end = end.min(self.buf.len());
        let start = start.min(end);
        &self.buf[start..end]
    }

    /// Bytes from `start` up to the current position.
    pub fn slice_from(&self, start: usize) -> &'a [u8] {
        self.slice(start, self.pos)
    }

    /// Returns `true` if the unread remainder starts with `mark`.
    #[inline]
    pub fn starts_with(&self, mark: &[u8]) -> bool {
        self.rest().starts_with(mark)
    }

    /// Consume `mark` if the remainder starts with it.
    pub fn eat(&mut self, mark: &[u8]) -> bool {
        if self.starts_with(mark) {
            self.advance_n(mark.len());
            true
        } else {
            false
        }
    }

    /// Advance while `pred` returns `true` for the current byte.
    ///
    /// Stops at EOF regardless of what `pred(0)` returns.
    #[inline]
    pub fn eat_while(&mut self, pred: impl Fn(u8) -> bool) {
        while !self.is_eof() && pred(self.current()) {
            self.pos += 1;
        }
    }

    /// Advance to the next `\n` (not consumed) or EOF.
    pub fn eat_until_newline_or_eof(&mut self) {
        match memchr::memchr(b'\n', self.rest()) {
            Some(offset) => self.pos += offset,
            None => self.pos = self.buf.len(),
        }
    }

    /// Offset of the first occurrence of `mark` in the unread remainder.
    pub fn find(&self, mark: &[u8]) -> Option<usize> {
        memchr::memmem::find(self.rest(), mark)
    }

    /// Returns the number of bytes in the UTF-8 character starting with `byte`.
    ///
    /// - `0xC0..=0xDF`: 2 bytes
    /// - `0xE0..=0xEF`: 3 bytes
    /// - `0xF0..=0xF7`: 4 bytes
    /// - Everything else (ASCII, continuation, invalid): 1 byte
    #[inline]
    pub fn utf8_char_width(byte: u8) -> usize {
        match byte {
            0xC0..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF7 => 4,
            _ => 1,
        }
    }

    /// Advance the cursor past one full UTF-8 character.
    #[inline]
    pub fn advance_char(&mut self) {
        let width = Self::utf8_char_width(self.current());
        self.advance_n(width);
    }
}

/// Blank bytes skipped between tokens.
#[inline]
pub fn is_blank(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | b'\n' | 0x0B | 0x0C)
}
