//! Stream errors.

use std::io;

use thiserror::Error;
use uls_lexer::LexError;

use crate::StreamVersion;

/// Failure while writing, reading or binding a token stream.
///
/// A stream that returned an error is not usable any more; the caller
/// drops it. Nothing is retried.
#[derive(Debug, Error)]
pub enum StreamError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error("malformed stream header: {0}")]
    InvalidHeader(String),
    #[error("stream version {found} is newer than the supported {supported}")]
    UnsupportedVersion {
        found: StreamVersion,
        supported: StreamVersion,
    },
    #[error("stream was written for spec `{found}`, the lexer is `{expected}`")]
    SpecMismatch { expected: String, found: String },
    #[error("malformed record at offset {offset}: {reason}")]
    MalformedRecord { offset: usize, reason: &'static str },
    #[error("unsupported stream format `{0}`")]
    UnsupportedFormat(String),
    #[error("no lexer is bound to the stream")]
    Unbound,
    #[error("recognition failed at line {line}: {message}")]
    Recognition { line: i32, message: String },
    #[error("template `{0}` is already defined")]
    DuplicateTemplate(String),
    #[error("unknown template `{0}`")]
    UnknownTemplate(String),
    #[error("template list is full")]
    TemplatesFull,
    #[error("output sink is closed")]
    SinkClosed,
}
