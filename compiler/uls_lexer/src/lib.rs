//! Configurable tokenizer for ULS.
//!
//! A lexer is assembled from a [`LexerConfig`]: the tokens it knows, their
//! spellings, quote and comment types, identifier characters and number
//! syntax. [`Lexer::new`] checks the configuration once and builds the
//! [`Registry`] and scanner tables; after that the lexer reads tokens from
//! a stack of input sources.
//!
//! ```text
//! LexerConfig ──▶ Lexer::new ──▶ Lexer { Registry, tables, frames }
//!                                   │
//!        push_str / push_file ──────┤
//!        push_feed (token streams) ─┘──▶ get_token ──▶ TokenId + lexeme
//! ```

mod config;
mod error;
mod lexer;
mod number;
mod registry;
mod token_id;

pub use config::{LexerConfig, TokenSpec, DEFAULT_STREAM_VERSION};
pub use error::{ConfigError, LexError, RegistryError};
pub use lexer::{eof_lexeme, FedToken, Lexer, SharedLexer, TokenFeed};
pub use number::{NumScan, NumberRules};
pub use registry::{
    is_valid_name, KeywordKind, Registry, Rename, TokenDefId, TokenView, TokenViewId,
    MAX_NAME_LEN, MAX_SPELLING_LEN,
};
pub use token_id::TokenId;

// Delimiter types appear in `LexerConfig`.
pub use uls_lexer_core::{CommentFlags, CommentType, EscapeMap, QuoteFlags, QuoteType};
