//! Error types for registry construction, configuration and the lexer API.
//!
//! Recognition misses are not errors (lookups return `None`) and literal
//! failures surface as the reserved `ERR` token, so these only cover
//! programming and configuration mistakes.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::TokenId;

/// Failure while registering tokens, spellings or names.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("invalid token name `{0}`")]
    InvalidName(String),
    #[error("token name `{0}` is already in use")]
    DuplicateName(String),
    #[error("token id {0} is already registered")]
    DuplicateId(TokenId),
    #[error("unknown token id {0}")]
    UnknownId(TokenId),
    #[error("spelling `{spelling}` is already registered for token {tok_id}")]
    DuplicateSpelling { tok_id: TokenId, spelling: String },
    #[error("invalid spelling `{spelling}`: {reason}")]
    InvalidSpelling {
        spelling: String,
        reason: &'static str,
    },
    #[error("token registry is full")]
    Full,
}

/// Invalid [`LexerConfig`](crate::LexerConfig).
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error("invalid delimiter mark `{mark}`: {reason}")]
    InvalidMark { mark: String, reason: &'static str },
    #[error("delimiter mark `{0}` is used more than once")]
    DuplicateMark(String),
    #[error("invalid number prefix `{0}`")]
    InvalidNumberPrefix(String),
    #[error("unsupported radix {0}")]
    InvalidRadix(u32),
    #[error("invalid number suffix `{0}`")]
    InvalidNumberSuffix(String),
    #[error("`{0}` cannot separate digits")]
    InvalidSeparator(char),
}

/// Misuse of the lexer API.
#[derive(Debug, Error)]
pub enum LexError {
    #[error("the current token was already pushed back")]
    DoubleUnget,
    #[error("no input source is pushed")]
    NoSource,
    #[error("cannot read `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
