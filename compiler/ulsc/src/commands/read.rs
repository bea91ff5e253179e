//! `uls read`: print the tokens of a stream file.

use std::path::Path;
use std::sync::Arc;

use uls_lexer::TokenId;
use uls_stream::{dump_token, dump_tokens, InputStream, OutputSink, TemplateList};

use super::CliError;
use crate::sample_lexer;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReadOptions {
    /// `NAME=VALUE` bindings substituted into identifiers.
    pub templates: Vec<(String, String)>,
    /// Push the stream into the lexer instead of decoding it directly.
    pub replay: bool,
}

/// Dump the tokens of the stream at `path`; returns the token count.
pub fn read_stream(path: &Path, options: &ReadOptions, sink: &OutputSink) -> Result<usize, CliError> {
    let mut stream = InputStream::open_file(path)?;
    let lexer = sample_lexer()?.into_shared();
    stream.bind(Arc::clone(&lexer))?;

    if !options.templates.is_empty() {
        let mut templates = TemplateList::new();
        for (name, value) in &options.templates {
            templates.add(name, value)?;
        }
        stream.set_templates(templates);
    }

    if options.replay {
        stream.push_to_lexer()?;
        return Ok(dump_tokens(sink, &lexer)?);
    }

    let mut count = 0;
    loop {
        let tok = stream.read_tok()?;
        if tok.tok_id == TokenId::EOI {
            return Ok(count);
        }
        dump_token(sink, lexer.lock().registry(), tok.tok_id, &tok.lexeme)?;
        count += 1;
    }
}
