//! Raw input buffer with byte-order-mark detection.
//!
//! Raw (unversioned) input is accepted in UTF-8, UTF-16 or UTF-32. During
//! construction the buffer inspects the leading bytes for a BOM, strips
//! it, and transcodes 16/32-bit input to UTF-8 so every later stage only
//! ever sees UTF-8 bytes.
//!
//! # Encoding Detection
//!
//! | leading bytes   | encoding   |
//! |-----------------|------------|
//! | `00 00 FE FF`   | UTF-32 BE  |
//! | `FF FE 00 00`   | UTF-32 LE  |
//! | `EF BB BF`      | UTF-8      |
//! | `FE FF`         | UTF-16 BE  |
//! | `FF FE`         | UTF-16 LE  |
//!
//! UTF-32 is tested first because its little-endian BOM starts with the
//! UTF-16 little-endian BOM. Input without a BOM is taken as UTF-8.
//!
//! Undecodable units are replaced with U+FFFD and recorded as
//! [`EncodingIssue`] values; interior NUL bytes are recorded too. The
//! tokenizer decides what to do with them.

use crate::Cursor;

/// Input encoding detected from the byte order mark.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Encoding {
    /// No BOM; taken as UTF-8.
    Utf8,
    /// UTF-8 with a `EF BB BF` BOM.
    Utf8Bom,
    Utf16Le,
    Utf16Be,
    Utf32Le,
    Utf32Be,
}

impl Encoding {
    /// Detect the encoding from the leading bytes of `bytes`.
    pub fn detect(bytes: &[u8]) -> Self {
        match bytes {
            [0x00, 0x00, 0xFE, 0xFF, ..] => Encoding::Utf32Be,
            [0xFF, 0xFE, 0x00, 0x00, ..] => Encoding::Utf32Le,
            [0xEF, 0xBB, 0xBF, ..] => Encoding::Utf8Bom,
            [0xFE, 0xFF, ..] => Encoding::Utf16Be,
            [0xFF, 0xFE, ..] => Encoding::Utf16Le,
            _ => Encoding::Utf8,
        }
    }

    /// Length of the BOM in bytes (0 for plain UTF-8).
    pub fn bom_len(self) -> usize {
        match self {
            Encoding::Utf8 => 0,
            Encoding::Utf8Bom => 3,
            Encoding::Utf16Le | Encoding::Utf16Be => 2,
            Encoding::Utf32Le | Encoding::Utf32Be => 4,
        }
    }
}

/// Encoding issue detected while building a [`SourceBuffer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EncodingIssue {
    pub kind: EncodingIssueKind,
    /// Byte offset in the *original* input (BOM included).
    pub pos: usize,
}

/// Kind of encoding issue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EncodingIssueKind {
    /// UTF-16 surrogate without its partner.
    UnpairedSurrogate,
    /// UTF-32 unit that is not a Unicode scalar value.
    InvalidCodePoint,
    /// Input ends in the middle of a 16/32-bit unit.
    TruncatedUnit,
    /// NUL byte inside the (transcoded) content.
    InteriorNull,
}

/// UTF-8 input buffer with the BOM stripped.
#[derive(Clone, Debug)]
pub struct SourceBuffer {
    bytes: Vec<u8>,
    encoding: Encoding,
    encoding_issues: Vec<EncodingIssue>,
}

impl SourceBuffer {
    /// Build a buffer from raw input bytes.
    pub fn new(raw: &[u8]) -> Self {
        let encoding = Encoding::detect(raw);
        let body = &raw[encoding.bom_len()..];
        let mut encoding_issues = Vec::new();

        let bytes = match encoding {
            Encoding::Utf8 | Encoding::Utf8Bom => body.to_vec(),
            Encoding::Utf16Le => decode_utf16(body, false, encoding.bom_len(), &mut encoding_issues),
            Encoding::Utf16Be => decode_utf16(body, true, encoding.bom_len(), &mut encoding_issues),
            Encoding::Utf32Le => decode_utf32(body, false, encoding.bom_len(), &mut encoding_issues),
            Encoding::Utf32Be => decode_utf32(body, true, encoding.bom_len(), &mut encoding_issues),
        };

        detect_interior_nulls(&bytes, &mut encoding_issues);

        Self {
            bytes,
            encoding,
            encoding_issues,
        }
    }

    /// Build a buffer from text that is already UTF-8.
    pub fn from_text(text: &str) -> Self {
        Self::new(text.as_bytes())
    }

    /// The UTF-8 content (without BOM).
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consume the buffer, returning the UTF-8 content.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Create a [`Cursor`] positioned at byte 0.
    pub fn cursor(&self) -> Cursor<'_> {
        Cursor::new(&self.bytes)
    }

    /// Detected input encoding.
    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Encoding issues detected during construction.
    pub fn encoding_issues(&self) -> &[EncodingIssue] {
        &self.encoding_issues
    }
}

fn decode_utf16(
    body: &[u8],
    big_endian: bool,
    base: usize,
    issues: &mut Vec<EncodingIssue>,
) -> Vec<u8> {
    let units = body.chunks_exact(2).map(|pair| {
        let pair = [pair[0], pair[1]];
        if big_endian {
            u16::from_be_bytes(pair)
        } else {
            u16::from_le_bytes(pair)
        }
    });

    let mut out = String::with_capacity(body.len());
    let mut unit_index = 0usize;
    for decoded in char::decode_utf16(units) {
        match decoded {
            Ok(ch) => {
                unit_index += ch.len_utf16();
                out.push(ch);
            }
            Err(_) => {
                issues.push(EncodingIssue {
                    kind: EncodingIssueKind::UnpairedSurrogate,
                    pos: base + unit_index * 2,
                });
                unit_index += 1;
                out.push(char::REPLACEMENT_CHARACTER);
            }
        }
    }

    if body.len() % 2 != 0 {
        issues.push(EncodingIssue {
            kind: EncodingIssueKind::TruncatedUnit,
            pos: base + body.len() - 1,
        });
    }

    out.into_bytes()
}

fn decode_utf32(
    body: &[u8],
    big_endian: bool,
    base: usize,
    issues: &mut Vec<EncodingIssue>,
) -> Vec<u8> {
    let mut out = String::with_capacity(body.len() / 2);
    for (i, quad) in body.chunks_exact(4).enumerate() {
        let quad = [quad[0], quad[1], quad[2], quad[3]];
        let unit = if big_endian {
            u32::from_be_bytes(quad)
        } else {
            u32::from_le_bytes(quad)
        };
        if let Some(ch) = char::from_u32(unit) {
            out.push(ch);
        } else {
            issues.push(EncodingIssue {
                kind: EncodingIssueKind::InvalidCodePoint,
                pos: base + i * 4,
            });
            out.push(char::REPLACEMENT_CHARACTER);
        }
    }

    let tail = body.len() % 4;
    if tail != 0 {
        issues.push(EncodingIssue {
            kind: EncodingIssueKind::TruncatedUnit,
            pos: base + body.len() - tail,
        });
    }

    out.into_bytes()
}

/// Detect NUL bytes within the content.
fn detect_interior_nulls(bytes: &[u8], issues: &mut Vec<EncodingIssue>) {
    for pos in memchr::memchr_iter(0, bytes) {
        issues.push(EncodingIssue {
            kind: EncodingIssueKind::InteriorNull,
            pos,
        });
    }
}

#[cfg(test)]
mod tests;
