//! Packet codec.
//!
//! Every packet is a record `(tok_id, text)`. Binary records are
//!
//! ```text
//! ┌──────────┬──────────┬───────────────┬─────┬─────────┐
//! │ tok_id   │ txt_len  │ text          │ NUL │ padding │
//! │ i32      │ i32      │ txt_len bytes │     │ to 4    │
//! └──────────┴──────────┴───────────────┴─────┴─────────┘
//! ```
//!
//! so a record takes `8 + roundup(txt_len + 1, 4)` bytes. Text records
//! are one line each: `"{tok_id:5} {txt_len:5} {escaped text}\n"`, where
//! `txt_len` counts the unescaped bytes.
//!
//! A `LINENUM` record's text is the line number in upper-case hex,
//! followed by a space and the new tag when the tag changed.

use uls_lexer::TokenId;

use crate::byte_order::read_i32;
use crate::{ByteOrder, StreamError, WireFormat};

/// One packet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record {
    pub tok_id: TokenId,
    pub text: Vec<u8>,
}

impl Record {
    pub fn new(tok_id: TokenId, text: impl Into<Vec<u8>>) -> Self {
        Self {
            tok_id,
            text: text.into(),
        }
    }

    /// `LINENUM` record; `tag` is only given when it changed.
    pub fn line_number(line: i32, tag: Option<&str>) -> Self {
        let mut text = format!("{line:X}");
        if let Some(tag) = tag {
            text.push(' ');
            text.push_str(tag);
        }
        Self::new(TokenId::LINENUM, text)
    }

    /// Line and optional new tag of a `LINENUM` record.
    pub fn parse_line_number(&self) -> Option<(i32, Option<String>)> {
        let text = std::str::from_utf8(&self.text).ok()?;
        let (hex, tag) = match text.split_once(' ') {
            Some((hex, tag)) => (hex, Some(tag.to_owned())),
            None => (text, None),
        };
        let bits = u32::from_str_radix(hex, 16).ok()?;
        Some((i32::from_ne_bytes(bits.to_ne_bytes()), tag))
    }
}

/// Size of a binary record holding `txt_len` text bytes.
pub const fn binary_record_size(txt_len: usize) -> usize {
    8 + ((txt_len + 4) & !3)
}

/// The two scalar fields in front of a binary record.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct RecordHead {
    tok_id: i32,
    txt_len: i32,
}

impl WireFormat for RecordHead {
    fn encode(&self, order: ByteOrder, out: &mut Vec<u8>) {
        order.put_i32(self.tok_id, out);
        order.put_i32(self.txt_len, out);
    }

    fn decode(order: ByteOrder, input: &[u8], offset: usize) -> Result<(Self, usize), StreamError> {
        let tok_id = read_i32(order, input, 0, offset, "truncated record header")?;
        let txt_len = read_i32(order, input, 4, offset, "truncated record header")?;
        Ok((Self { tok_id, txt_len }, 8))
    }
}

impl WireFormat for Record {
    fn encode(&self, order: ByteOrder, out: &mut Vec<u8>) {
        let size = binary_record_size(self.text.len());
        let start = out.len();
        RecordHead {
            tok_id: self.tok_id.raw(),
            txt_len: i32::try_from(self.text.len()).unwrap_or(i32::MAX),
        }
        .encode(order, out);
        out.extend_from_slice(&self.text);
        out.resize(start + size, 0);
    }

    fn decode(order: ByteOrder, input: &[u8], offset: usize) -> Result<(Self, usize), StreamError> {
        let (head, _) = RecordHead::decode(order, input, offset)?;
        let malformed = |reason| StreamError::MalformedRecord { offset, reason };
        let txt_len = usize::try_from(head.txt_len).map_err(|_| malformed("negative text length"))?;
        let size = binary_record_size(txt_len);
        if size > input.len() {
            return Err(malformed("record longer than the remaining stream"));
        }
        if input[8 + txt_len] != 0 {
            return Err(malformed("text is not NUL-terminated"));
        }
        let record = Record::new(TokenId::new(head.tok_id), &input[8..8 + txt_len]);
        Ok((record, size))
    }
}

/// How a stream's records are laid out.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Codec {
    Binary(ByteOrder),
    Text,
}

impl Codec {
    pub fn encode(self, record: &Record, out: &mut Vec<u8>) {
        match self {
            Codec::Binary(order) => record.encode(order, out),
            Codec::Text => encode_text(record, out),
        }
    }

    /// Decode the record at the start of `input`. `None` when `input` is
    /// empty.
    pub fn decode(self, input: &[u8], offset: usize) -> Result<Option<(Record, usize)>, StreamError> {
        if input.is_empty() {
            return Ok(None);
        }
        match self {
            Codec::Binary(order) => Record::decode(order, input, offset).map(Some),
            Codec::Text => decode_text(input, offset).map(Some),
        }
    }
}

fn encode_text(record: &Record, out: &mut Vec<u8>) {
    let head = format!("{:5} {:5} ", record.tok_id, record.text.len());
    out.extend_from_slice(head.as_bytes());
    escape_into(&record.text, out);
    out.push(b'\n');
}

/// Control bytes, DEL and `\` become `\xHH`; everything else is copied.
pub fn escape_into(text: &[u8], out: &mut Vec<u8>) {
    for &b in text {
        if b < 0x20 || b == 0x7F || b == b'\\' {
            out.extend_from_slice(format!("\\x{b:02X}").as_bytes());
        } else {
            out.push(b);
        }
    }
}

/// Reverse of [`escape_into`]. `None` on a malformed escape.
pub fn unescape(text: &[u8]) -> Option<Vec<u8>> {
    let mut out = Vec::with_capacity(text.len());
    let mut i = 0;
    while i < text.len() {
        if text[i] == b'\\' {
            if text.get(i + 1) != Some(&b'x') {
                return None;
            }
            let hex = std::str::from_utf8(text.get(i + 2..i + 4)?).ok()?;
            out.push(u8::from_str_radix(hex, 16).ok()?);
            i += 4;
        } else {
            out.push(text[i]);
            i += 1;
        }
    }
    Some(out)
}

fn decode_text(input: &[u8], offset: usize) -> Result<(Record, usize), StreamError> {
    let malformed = |reason| StreamError::MalformedRecord { offset, reason };
    let end = input
        .iter()
        .position(|&b| b == b'\n')
        .ok_or_else(|| malformed("unterminated text record"))?;
    let line = &input[..end];

    let (tok_id, rest) = take_number(line).ok_or_else(|| malformed("bad token id"))?;
    let (txt_len, rest) = take_number(rest).ok_or_else(|| malformed("bad text length"))?;
    let escaped = rest.strip_prefix(b" ").ok_or_else(|| malformed("missing text separator"))?;
    let text = unescape(escaped).ok_or_else(|| malformed("bad escape"))?;
    if usize::try_from(txt_len).ok() != Some(text.len()) {
        return Err(malformed("text length mismatch"));
    }
    Ok((Record::new(TokenId::new(tok_id), text), end + 1))
}

/// Space-padded decimal at the start of `s` and what follows it.
fn take_number(s: &[u8]) -> Option<(i32, &[u8])> {
    let start = s.iter().position(|&b| b != b' ')?;
    let s = &s[start..];
    let len = s
        .iter()
        .enumerate()
        .take_while(|&(i, &b)| b.is_ascii_digit() || (i == 0 && b == b'-'))
        .count();
    let n = std::str::from_utf8(&s[..len]).ok()?.parse().ok()?;
    Some((n, &s[len..]))
}
