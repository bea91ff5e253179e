//! Escape maps and escape-sequence decoding.
//!
//! An [`EscapeMap`] belongs to a quote type and decides what follows the
//! escape symbol. Decoding happens in two steps that mirror the literal
//! matcher's states:
//!
//! 1. [`EscapeMap::classify`] looks at the byte right after the escape
//!    symbol (the *initial* state) and answers simple, numeric or unknown.
//! 2. [`NumericEscape::finish`] consumes the digits of a numeric escape
//!    (the *continuation* state) and appends the decoded bytes.
//!
//! Unknown escapes are copied verbatim: the escape symbol followed by the
//! escaped character.

use std::fmt;

use bitflags::bitflags;

bitflags! {
    /// Numeric escape forms an [`EscapeMap`] accepts.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct NumericEscapes: u8 {
        /// `\NNN`, up to three octal digits, one raw byte.
        const OCTAL = 1 << 0;
        /// `\xHH`, one or two hex digits, one raw byte.
        const HEX = 1 << 1;
        /// `\uHHHH`, exactly four hex digits, UTF-8 encoded.
        const UNICODE4 = 1 << 2;
        /// `\UHHHHHHHH`, exactly eight hex digits, UTF-8 encoded.
        const UNICODE8 = 1 << 3;
    }
}

/// Malformed escape sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EscapeError {
    /// `\x` (or `\u`, `\U`) without enough hex digits.
    MissingDigits { prefix: u8 },
    /// Octal value above `0o377`.
    OctalOverflow { value: u32 },
    /// `\u`/`\U` value that is not a Unicode scalar value.
    InvalidCodePoint { value: u32 },
}

impl fmt::Display for EscapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EscapeError::MissingDigits { prefix } => {
                write!(f, "escape '\\{}' is missing its digits", char::from(*prefix))
            }
            EscapeError::OctalOverflow { value } => {
                write!(f, "octal escape value 0o{value:o} does not fit in a byte")
            }
            EscapeError::InvalidCodePoint { value } => {
                write!(f, "escape value U+{value:X} is not a valid code point")
            }
        }
    }
}

impl std::error::Error for EscapeError {}

/// Numeric escape in progress, produced by [`EscapeMap::classify`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NumericEscape {
    kind: NumericKind,
    /// Value accumulated from the initial byte (octal only).
    initial: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum NumericKind {
    Octal,
    Hex,
    Unicode4,
    Unicode8,
}

impl NumericKind {
    fn prefix(self) -> u8 {
        match self {
            NumericKind::Octal => b'0',
            NumericKind::Hex => b'x',
            NumericKind::Unicode4 => b'u',
            NumericKind::Unicode8 => b'U',
        }
    }
}

/// Result of classifying the byte after the escape symbol.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EscapeStart {
    /// Single replacement byte; the escaped byte is consumed.
    Simple(u8),
    /// Digits follow; continue with [`NumericEscape::finish`].
    Numeric(NumericEscape),
    /// Not an escape this map knows: copy symbol and character verbatim.
    Unknown,
}

impl NumericEscape {
    /// Consume digits from `digits` (the bytes right after the prefix
    /// byte), append the decoded value to `out`, and return how many
    /// digit bytes were consumed.
    pub fn finish(self, digits: &[u8], out: &mut Vec<u8>) -> Result<usize, EscapeError> {
        match self.kind {
            NumericKind::Octal => {
                let mut value = self.initial;
                let mut used = 0;
                for &b in digits.iter().take(2) {
                    if !(b'0'..=b'7').contains(&b) {
                        break;
                    }
                    value = (value << 3) | u32::from(b - b'0');
                    used += 1;
                }
                let byte = u8::try_from(value).map_err(|_| EscapeError::OctalOverflow { value })?;
                out.push(byte);
                Ok(used)
            }
            NumericKind::Hex => {
                let (value, used) = hex_value(digits, 2);
                if used == 0 {
                    return Err(EscapeError::MissingDigits {
                        prefix: self.kind.prefix(),
                    });
                }
                // at most two digits, so the value fits in a byte
                out.push(u8::try_from(value).unwrap_or(u8::MAX));
                Ok(used)
            }
            NumericKind::Unicode4 | NumericKind::Unicode8 => {
                let need = if self.kind == NumericKind::Unicode4 { 4 } else { 8 };
                let (value, used) = hex_value(digits, need);
                if used < need {
                    return Err(EscapeError::MissingDigits {
                        prefix: self.kind.prefix(),
                    });
                }
                let ch = char::from_u32(value).ok_or(EscapeError::InvalidCodePoint { value })?;
                let mut utf8 = [0u8; 4];
                out.extend_from_slice(ch.encode_utf8(&mut utf8).as_bytes());
                Ok(used)
            }
        }
    }
}

/// Accumulate up to `max` hex digits; returns `(value, digits_used)`.
fn hex_value(digits: &[u8], max: usize) -> (u32, usize) {
    let mut value = 0u32;
    let mut used = 0;
    for &b in digits.iter().take(max) {
        let Some(d) = char::from(b).to_digit(16) else {
            break;
        };
        value = (value << 4) | d;
        used += 1;
    }
    (value, used)
}

/// Escape rules of one quote type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EscapeMap {
    /// `None` disables escape processing entirely.
    esc_sym: Option<u8>,
    simple: [Option<u8>; 128],
    numeric: NumericEscapes,
}

impl EscapeMap {
    /// Map with escape symbol `esc_sym` and no escapes registered.
    pub fn new(esc_sym: u8) -> Self {
        Self {
            esc_sym: Some(esc_sym),
            simple: [None; 128],
            numeric: NumericEscapes::empty(),
        }
    }

    /// Register `\<ch>` → `out`. Non-ASCII `ch` is ignored.
    #[must_use]
    pub fn with_simple(mut self, ch: u8, out: u8) -> Self {
        if let Some(slot) = self.simple.get_mut(usize::from(ch)) {
            *slot = Some(out);
        }
        self
    }

    /// Enable numeric escape forms.
    #[must_use]
    pub fn with_numeric(mut self, numeric: NumericEscapes) -> Self {
        self.numeric |= numeric;
        self
    }

    /// `\n \r \t \b \a \v \f`.
    pub fn legacy() -> Self {
        Self::new(b'\\')
            .with_simple(b'n', b'\n')
            .with_simple(b'r', b'\r')
            .with_simple(b't', b'\t')
            .with_simple(b'b', 0x08)
            .with_simple(b'a', 0x07)
            .with_simple(b'v', 0x0B)
            .with_simple(b'f', 0x0C)
    }

    /// [`legacy`](Self::legacy) plus quotes, backslash, octal and `\xHH`.
    pub fn legacy_full() -> Self {
        Self::legacy()
            .with_simple(b'"', b'"')
            .with_simple(b'\'', b'\'')
            .with_simple(b'\\', b'\\')
            .with_numeric(NumericEscapes::OCTAL | NumericEscapes::HEX)
    }

    /// `\n \t \\ \"` plus `\uHHHH` and `\UHHHHHHHH`.
    pub fn modern() -> Self {
        Self::new(b'\\')
            .with_simple(b'n', b'\n')
            .with_simple(b't', b'\t')
            .with_simple(b'\\', b'\\')
            .with_simple(b'"', b'"')
            .with_numeric(NumericEscapes::UNICODE4 | NumericEscapes::UNICODE8)
    }

    /// No escape processing: the backslash is an ordinary character.
    pub fn verbatim() -> Self {
        Self {
            esc_sym: None,
            simple: [None; 128],
            numeric: NumericEscapes::empty(),
        }
    }

    /// Only `\\` is decoded; every other escape is kept as written.
    pub fn verbatim_moderate() -> Self {
        Self::new(b'\\').with_simple(b'\\', b'\\')
    }

    /// Look up a preset by name (`legacy`, `legacy-full`, `modern`,
    /// `verbatim`, `verbatim-moderate`).
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "legacy" => Some(Self::legacy()),
            "legacy-full" | "legacy_full" => Some(Self::legacy_full()),
            "modern" => Some(Self::modern()),
            "verbatim" => Some(Self::verbatim()),
            "verbatim-moderate" | "verbatim_moderate" => Some(Self::verbatim_moderate()),
            _ => None,
        }
    }

    /// The escape symbol, if escapes are enabled.
    pub fn escape_symbol(&self) -> Option<u8> {
        self.esc_sym
    }

    /// Classify the byte following the escape symbol.
    pub fn classify(&self, ch: u8) -> EscapeStart {
        if let Some(Some(out)) = self.simple.get(usize::from(ch)) {
            return EscapeStart::Simple(*out);
        }
        let kind = match ch {
            b'0'..=b'7' if self.numeric.contains(NumericEscapes::OCTAL) => NumericKind::Octal,
            b'x' if self.numeric.contains(NumericEscapes::HEX) => NumericKind::Hex,
            b'u' if self.numeric.contains(NumericEscapes::UNICODE4) => NumericKind::Unicode4,
            b'U' if self.numeric.contains(NumericEscapes::UNICODE8) => NumericKind::Unicode8,
            _ => return EscapeStart::Unknown,
        };
        let initial = if kind == NumericKind::Octal {
            u32::from(ch - b'0')
        } else {
            0
        };
        EscapeStart::Numeric(NumericEscape { kind, initial })
    }

    /// Decode every escape in `text` (no terminating mark involved).
    ///
    /// Unknown escapes are kept as written.
    pub fn unescape(&self, text: &[u8]) -> Result<Vec<u8>, EscapeError> {
        let Some(sym) = self.esc_sym else {
            return Ok(text.to_vec());
        };
        let mut out = Vec::with_capacity(text.len());
        let mut i = 0;
        while i < text.len() {
            let b = text[i];
            if b != sym || i + 1 >= text.len() {
                out.push(b);
                i += 1;
                continue;
            }
            let ch = text[i + 1];
            match self.classify(ch) {
                EscapeStart::Simple(rep) => {
                    out.push(rep);
                    i += 2;
                }
                EscapeStart::Numeric(num) => {
                    let used = num.finish(&text[i + 2..], &mut out)?;
                    i += 2 + used;
                }
                EscapeStart::Unknown => {
                    out.push(sym);
                    out.push(ch);
                    i += 2;
                }
            }
        }
        Ok(out)
    }
}

impl Default for EscapeMap {
    fn default() -> Self {
        Self::legacy()
    }
}
