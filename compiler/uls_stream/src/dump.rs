//! Human-readable token listing.
//!
//! One token per line: a tab, the token's label padded to seven columns
//! in brackets, then the lexeme.
//!
//! ```text
//!     [     IF] if
//!     [     ID] a
//!     [     LE] <=
//!     [      -] -
//!     [    NUM] 1
//! ```

use uls_lexer::{Registry, SharedLexer, TokenId};

use crate::{OutputSink, StreamError};

/// Label of `tok_id` and whether its lexeme is worth printing.
pub fn token_label(registry: &Registry, tok_id: TokenId) -> (String, bool) {
    if tok_id == TokenId::EOI || tok_id == TokenId::LINK {
        return (registry.tok2name(tok_id).unwrap_or_default(), false);
    }
    if let Some(name) = registry.tok2name(tok_id) {
        return (name, true);
    }
    match u8::try_from(tok_id.raw()) {
        Ok(b) if b.is_ascii_graphic() => (format!("{b:3}"), true),
        _ => (format!("{tok_id:5}"), false),
    }
}

/// Format one token as a dump line, newline included.
pub fn format_token(registry: &Registry, tok_id: TokenId, lexeme: &[u8]) -> String {
    let (label, with_lexeme) = token_label(registry, tok_id);
    if with_lexeme {
        format!("\t[{label:>7}] {}\n", String::from_utf8_lossy(lexeme))
    } else {
        format!("\t[{label:>7}]\n")
    }
}

pub fn dump_token(
    sink: &OutputSink,
    registry: &Registry,
    tok_id: TokenId,
    lexeme: &[u8],
) -> Result<(), StreamError> {
    sink.write_str(&format_token(registry, tok_id, lexeme))
}

/// Dump every token of `lexer` up to its `EOI`; returns how many were
/// dumped. An `ERR` token is dumped and then reported as an error.
pub fn dump_tokens(sink: &OutputSink, lexer: &SharedLexer) -> Result<usize, StreamError> {
    let mut lx = lexer.lock();
    let mut count = 0;
    loop {
        let tok_id = lx.get_token();
        if tok_id == TokenId::EOI {
            return Ok(count);
        }
        dump_token(sink, lx.registry(), tok_id, lx.lexeme_bytes())?;
        count += 1;
        if tok_id == TokenId::ERR {
            return Err(StreamError::Recognition {
                line: lx.line_number(),
                message: lx.lexeme().into_owned(),
            });
        }
    }
}

#[cfg(test)]
mod tests;
