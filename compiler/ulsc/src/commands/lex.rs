//! `uls lex`: tokenize a file and dump the tokens.

use std::path::Path;

use uls_stream::{dump_tokens, OutputSink, StreamError};

use super::CliError;
use crate::sample_lexer;

/// Dump every token of the file at `path`; returns the token count.
pub fn lex_file(path: &Path, sink: &OutputSink) -> Result<usize, CliError> {
    let mut lexer = sample_lexer()?;
    lexer.push_file(path).map_err(StreamError::from)?;
    Ok(dump_tokens(sink, &lexer.into_shared())?)
}
