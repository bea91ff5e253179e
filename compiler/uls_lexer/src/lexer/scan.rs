//! The scan loop of one text frame.
//!
//! Precedence after blanks and comments are skipped:
//!
//! 1. quote start mark (longest)
//! 2. number (decimal digit)
//! 3. non-ASCII one-char token
//! 4. identifier, resolved through the keyword table
//! 5. two-plus token (longest)
//! 6. one-char token
//! 7. anonymous one-char token (id = byte value)
//! 8. `ERR`
//!
//! Identifier characters are judged on the decoded code point, and an
//! identifier ends before any non-ASCII character that has a one-char
//! token of its own.

use uls_lexer_core::{
    longest_comment, longest_start, match_literal, CharClass, Cursor, LitOutcome, PushbackBuffer,
};

use super::Tables;
use crate::number::NumScan;
use crate::TokenId;

/// A token read from a frame's bytes.
pub(super) struct Scanned {
    pub(super) tok_id: TokenId,
    pub(super) lexeme: Vec<u8>,
    /// Line the token starts on.
    pub(super) line: i32,
    /// Newlines inside the token.
    pub(super) n_lfs: u32,
}

/// First character of `bytes` and its width; invalid UTF-8 decodes as
/// U+FFFD of width 1.
pub(super) fn decode_char(bytes: &[u8]) -> Option<(char, usize)> {
    let first = *bytes.first()?;
    let width = Cursor::utf8_char_width(first).min(bytes.len());
    match std::str::from_utf8(&bytes[..width]).ok().and_then(|s| s.chars().next()) {
        Some(ch) => Some((ch, width)),
        None => Some((char::REPLACEMENT_CHARACTER, 1)),
    }
}

/// Skip blanks and comments, then read one token. `None` when the
/// frame's bytes are used up.
pub(super) fn next_token(tables: &Tables, input: &mut PushbackBuffer) -> Option<Scanned> {
    loop {
        let rest = input.rest();
        let first = *rest.first()?;
        let class = tables.classes.get(first);

        if class.contains(CharClass::SPACE) {
            let n = rest
                .iter()
                .take_while(|&&b| tables.classes.is(b, CharClass::SPACE))
                .count();
            input.advance(n);
            continue;
        }

        if class.contains(CharClass::COMMENT) {
            if let Some(comment) = longest_comment(&tables.comments, rest, input.at_line_start()) {
                let start = comment.start_mark().len();
                match comment.skip(&rest[start..]) {
                    Ok(skipped) => {
                        input.advance(start + skipped.consumed);
                        continue;
                    }
                    Err(e) => {
                        let line = input.line();
                        tracing::debug!(line, error = %e, "unterminated comment");
                        input.advance(start);
                        return Some(Scanned {
                            tok_id: TokenId::ERR,
                            lexeme: b"unterminated comment".to_vec(),
                            line,
                            n_lfs: 0,
                        });
                    }
                }
            }
        }

        let line = input.line();
        let (tok_id, lexeme, consumed) = classify(tables, rest);
        input.advance(consumed);
        let n_lfs = u32::try_from(input.line() - line).unwrap_or(0);
        return Some(Scanned {
            tok_id,
            lexeme,
            line,
            n_lfs,
        });
    }
}

fn error(message: &str, consumed: usize) -> (TokenId, Vec<u8>, usize) {
    (TokenId::ERR, message.as_bytes().to_vec(), consumed)
}

/// Token at the start of `rest` (not blank, not a comment) as
/// `(id, lexeme, bytes consumed)`.
fn classify(tables: &Tables, rest: &[u8]) -> (TokenId, Vec<u8>, usize) {
    let first = rest[0];
    let class = tables.classes.get(first);

    if class.contains(CharClass::QUOTE) {
        if let Some(quote) = longest_start(&tables.quotes, rest) {
            let start = quote.start_mark().len();
            match match_literal(quote, &rest[start..]) {
                LitOutcome::Terminated { text, consumed, .. } => {
                    return (TokenId::new(quote.tok_id()), text, start + consumed);
                }
                LitOutcome::Dismissed => {}
                LitOutcome::Error(e) => return error(&e.to_string(), start),
            }
        }
    }

    if first.is_ascii_digit() {
        return match tables.numbers.scan(rest) {
            NumScan::Number { lexeme, consumed } => (TokenId::NUM, lexeme, consumed),
            NumScan::Invalid { consumed } => error("invalid number", consumed),
        };
    }

    if first >= 0x80 && class.contains(CharClass::ONE_CHAR) {
        if let Some((ch, width)) = decode_char(rest) {
            if let Some(view) = tables.registry.lookup_one_char(ch) {
                return (view.tok_id(), rest[..width].to_vec(), width);
            }
        }
    }

    let id_first = decode_char(rest).filter(|&(ch, _)| tables.classes.is_id_first(ch));
    if let Some((_, width)) = id_first {
        let len = identifier_len(tables, rest, width);
        let word = &rest[..len];
        let tok_id = tables
            .registry
            .lookup_keyword(word)
            .map_or(TokenId::ID, |view| view.tok_id());
        return (tok_id, word.to_vec(), len);
    }

    if class.contains(CharClass::TWO_PLUS) {
        if let Some((view, len)) = tables.registry.lookup_two_plus(rest) {
            return (view.tok_id(), rest[..len].to_vec(), len);
        }
    }

    if class.contains(CharClass::ONE_CHAR) {
        if let Some((ch, width)) = decode_char(rest) {
            if let Some(view) = tables.registry.lookup_one_char(ch) {
                return (view.tok_id(), rest[..width].to_vec(), width);
            }
        }
    }

    if class.contains(CharClass::ANONYMOUS) {
        return (TokenId::new(i32::from(first)), vec![first], 1);
    }

    let width = decode_char(rest).map_or(1, |(_, w)| w);
    error("unknown character", width)
}

/// Length of the identifier whose first character is `first_width` bytes.
fn identifier_len(tables: &Tables, rest: &[u8], first_width: usize) -> usize {
    let mut len = first_width;
    while let Some((ch, width)) = decode_char(&rest[len..]) {
        let one_char = !ch.is_ascii() && tables.registry.lookup_one_char(ch).is_some();
        if one_char || !tables.classes.is_id(ch) {
            break;
        }
        len += width;
    }
    len
}
