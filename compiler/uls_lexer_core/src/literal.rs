//! Quote types and the literal-string matcher.
//!
//! The tokenizer recognizes a quote start mark and hands the bytes right
//! after it to [`match_literal`]. The matcher walks them with a small
//! state machine:
//!
//! ```text
//! Scanning ──esc──▶ EscapeInitial ──digits──▶ EscapeContinuation
//!    ▲                    │                          │
//!    └────────────────────┴──────────────────────────┘
//! Scanning ──end mark──▶ Terminated
//! ```
//!
//! Newlines inside the literal are counted into `n_lfs` rather than fed to
//! the line counter one at a time; the caller advances its line number
//! once, after the whole literal has been captured.

use std::fmt;
use std::sync::Arc;

use bitflags::bitflags;

use crate::escape::{EscapeError, EscapeMap, EscapeStart, NumericEscape};
use crate::Cursor;

/// Longest accepted start or end mark, in bytes.
pub const MAX_MARK_LEN: usize = 15;

bitflags! {
    /// Behaviour switches of a [`QuoteType`].
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct QuoteFlags: u8 {
        /// Newlines may appear inside the literal.
        const MULTILINE = 1 << 0;
        /// The start mark alone is the token; nothing is scanned.
        const NOTHING = 1 << 1;
        /// End of input (or of the line, for single-line quotes)
        /// terminates the literal instead of being an error.
        const OPEN = 1 << 2;
        /// The end mark is left in the input.
        const R_EXCLUSIVE = 1 << 3;
        /// The end mark differs from the start mark.
        const ASYMMETRIC = 1 << 4;
    }
}

/// Decides whether a recognized start mark really opens a literal.
///
/// Used for delimiters whose meaning depends on what follows them.
/// Declining yields [`LitOutcome::Dismissed`] and the tokenizer goes on
/// with the next token category.
pub trait LiteralAnalyzer: Send + Sync {
    /// `following` is the input right after the start mark.
    fn admit(&self, following: &[u8]) -> bool;
}

impl<F> LiteralAnalyzer for F
where
    F: Fn(&[u8]) -> bool + Send + Sync,
{
    fn admit(&self, following: &[u8]) -> bool {
        self(following)
    }
}

/// A literal-string delimiter pair.
#[derive(Clone)]
pub struct QuoteType {
    tok_id: i32,
    start_mark: Vec<u8>,
    end_mark: Vec<u8>,
    flags: QuoteFlags,
    escapes: EscapeMap,
    analyzer: Option<Arc<dyn LiteralAnalyzer>>,
}

impl fmt::Debug for QuoteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuoteType")
            .field("tok_id", &self.tok_id)
            .field("start_mark", &String::from_utf8_lossy(&self.start_mark))
            .field("end_mark", &String::from_utf8_lossy(&self.end_mark))
            .field("flags", &self.flags)
            .field("analyzer", &self.analyzer.is_some())
            .finish_non_exhaustive()
    }
}

impl QuoteType {
    /// Symmetric quote: `start_mark` also ends the literal.
    pub fn new(tok_id: i32, start_mark: impl Into<Vec<u8>>) -> Self {
        let start_mark = start_mark.into();
        Self {
            tok_id,
            end_mark: start_mark.clone(),
            start_mark,
            flags: QuoteFlags::empty(),
            escapes: EscapeMap::legacy(),
            analyzer: None,
        }
    }

    /// Use a distinct end mark. Sets [`QuoteFlags::ASYMMETRIC`].
    #[must_use]
    pub fn with_end_mark(mut self, end_mark: impl Into<Vec<u8>>) -> Self {
        self.end_mark = end_mark.into();
        self.flags.set(QuoteFlags::ASYMMETRIC, self.end_mark != self.start_mark);
        self
    }

    #[must_use]
    pub fn with_flags(mut self, flags: QuoteFlags) -> Self {
        self.flags |= flags;
        self
    }

    #[must_use]
    pub fn with_escapes(mut self, escapes: EscapeMap) -> Self {
        self.escapes = escapes;
        self
    }

    #[must_use]
    pub fn with_analyzer(mut self, analyzer: impl LiteralAnalyzer + 'static) -> Self {
        self.analyzer = Some(Arc::new(analyzer));
        self
    }

    pub fn tok_id(&self) -> i32 {
        self.tok_id
    }

    pub fn start_mark(&self) -> &[u8] {
        &self.start_mark
    }

    pub fn end_mark(&self) -> &[u8] {
        &self.end_mark
    }

    pub fn flags(&self) -> QuoteFlags {
        self.flags
    }

    pub fn escapes(&self) -> &EscapeMap {
        &self.escapes
    }
}

/// Why a literal could not be captured.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LiteralError {
    /// Input ended before the end mark.
    Unterminated,
    /// A newline appeared inside a single-line literal.
    NewlineInLiteral,
    /// Malformed escape sequence.
    Escape(EscapeError),
}

impl fmt::Display for LiteralError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiteralError::Unterminated => f.write_str("unterminated literal"),
            LiteralError::NewlineInLiteral => f.write_str("newline in single-line literal"),
            LiteralError::Escape(e) => write!(f, "malformed escape: {e}"),
        }
    }
}

impl std::error::Error for LiteralError {}

impl From<EscapeError> for LiteralError {
    fn from(e: EscapeError) -> Self {
        LiteralError::Escape(e)
    }
}

/// Outcome of [`match_literal`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LitOutcome {
    Terminated {
        /// Decoded literal text, without the marks.
        text: Vec<u8>,
        /// Newlines consumed.
        n_lfs: u32,
        /// Input bytes consumed after the start mark.
        consumed: usize,
    },
    Dismissed,
    Error(LiteralError),
}

#[derive(Clone, Copy)]
enum State {
    Scanning,
    EscapeInitial,
    EscapeContinuation(NumericEscape),
}

/// Capture the literal that follows `quote`'s start mark.
///
/// `input` starts right after the start mark.
pub fn match_literal(quote: &QuoteType, input: &[u8]) -> LitOutcome {
    if let Some(analyzer) = &quote.analyzer {
        if !analyzer.admit(input) {
            return LitOutcome::Dismissed;
        }
    }
    if quote.flags.contains(QuoteFlags::NOTHING) {
        return LitOutcome::Terminated {
            text: Vec::new(),
            n_lfs: 0,
            consumed: 0,
        };
    }

    let multiline = quote.flags.contains(QuoteFlags::MULTILINE);
    let open = quote.flags.contains(QuoteFlags::OPEN);
    let esc_sym = quote.escapes.escape_symbol();
    let end = quote.end_mark.as_slice();

    let mut cursor = Cursor::new(input);
    let mut text = Vec::new();
    let mut n_lfs = 0u32;
    let mut state = State::Scanning;

    loop {
        match state {
            State::Scanning => {
                if cursor.is_eof() {
                    return if open {
                        LitOutcome::Terminated {
                            text,
                            n_lfs,
                            consumed: cursor.pos(),
                        }
                    } else {
                        LitOutcome::Error(LiteralError::Unterminated)
                    };
                }
                if !end.is_empty() && cursor.starts_with(end) {
                    let mut consumed = cursor.pos();
                    if !quote.flags.contains(QuoteFlags::R_EXCLUSIVE) {
                        consumed += end.len();
                    }
                    return LitOutcome::Terminated {
                        text,
                        n_lfs,
                        consumed,
                    };
                }
                let b = cursor.current();
                if Some(b) == esc_sym {
                    cursor.advance();
                    state = State::EscapeInitial;
                    continue;
                }
                if b == b'\n' {
                    if !multiline {
                        return if open {
                            LitOutcome::Terminated {
                                text,
                                n_lfs,
                                consumed: cursor.pos(),
                            }
                        } else {
                            LitOutcome::Error(LiteralError::NewlineInLiteral)
                        };
                    }
                    n_lfs += 1;
                }
                text.push(b);
                cursor.advance();
            }
            State::EscapeInitial => {
                if cursor.is_eof() {
                    if open {
                        text.extend(esc_sym);
                        state = State::Scanning;
                        continue;
                    }
                    return LitOutcome::Error(LiteralError::Unterminated);
                }
                let ch = cursor.current();
                match quote.escapes.classify(ch) {
                    EscapeStart::Simple(rep) => {
                        text.push(rep);
                        cursor.advance();
                        state = State::Scanning;
                    }
                    EscapeStart::Numeric(num) => {
                        cursor.advance();
                        state = State::EscapeContinuation(num);
                    }
                    EscapeStart::Unknown => {
                        let start = cursor.pos();
                        cursor.advance_char();
                        text.extend(esc_sym);
                        text.extend_from_slice(cursor.slice_from(start));
                        if ch == b'\n' {
                            n_lfs += 1;
                        }
                        state = State::Scanning;
                    }
                }
            }
            State::EscapeContinuation(num) => match num.finish(cursor.rest(), &mut text) {
                Ok(used) => {
                    cursor.advance_n(used);
                    state = State::Scanning;
                }
                Err(e) => return LitOutcome::Error(e.into()),
            },
        }
    }
}

/// The quote type whose start mark is the longest prefix of `rest`.
pub fn longest_start<'q>(quotes: &'q [QuoteType], rest: &[u8]) -> Option<&'q QuoteType> {
    quotes
        .iter()
        .filter(|q| !q.start_mark.is_empty() && rest.starts_with(&q.start_mark))
        .max_by_key(|q| q.start_mark.len())
}
