//! Byte-level building blocks for ULS lexers.
//!
//! Everything here works on plain byte slices and knows nothing about
//! token ids, registries or streams:
//!
//! - [`Cursor`]: sentinel-terminated byte cursor
//! - [`SourceBuffer`]: raw input with BOM detection and UTF-16/32 transcoding
//! - [`CharClassTable`]: per-byte token-category flags
//! - [`EscapeMap`]: escape rules and decoding
//! - [`QuoteType`] / [`match_literal`]: the literal-string matcher
//! - [`CommentType`]: comment skipping
//! - [`PushbackBuffer`]: per-frame input with unlimited unget
//!
//! # Design
//!
//! The tokenizer in `uls_lexer` snapshots a [`Cursor`] over the unread part
//! of the current frame, tries token categories against it, and commits the
//! winning length back to the frame's [`PushbackBuffer`]. The matchers in
//! this crate never mutate the frame themselves; they report how many
//! bytes they consumed and how many newlines those contained.

mod char_class;
mod comment;
mod cursor;
mod escape;
mod literal;
mod pushback;
mod source_buffer;

pub use char_class::{CharClass, CharClassTable};
pub use comment::{longest_comment, CommentFlags, CommentType, Skipped};
pub use cursor::{count_newlines, is_blank, Cursor};
pub use escape::{EscapeError, EscapeMap, EscapeStart, NumericEscape, NumericEscapes};
pub use literal::{
    longest_start, match_literal, LitOutcome, LiteralAnalyzer, LiteralError, QuoteFlags,
    QuoteType, MAX_MARK_LEN,
};
pub use pushback::{PushbackBuffer, UngotToken};
pub use source_buffer::{Encoding, EncodingIssue, EncodingIssueKind, SourceBuffer};
