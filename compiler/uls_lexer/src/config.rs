//! Lexer configuration.
//!
//! [`LexerConfig`] is a plain options value. It is checked and turned into
//! the registry and scanner tables once, by [`Lexer::new`](crate::Lexer::new).
//!
//! ```text
//! let config = LexerConfig::default()
//!     .with_spec_name("sample")
//!     .with_token(TokenSpec::new(TokenId::new(130), "IF").spelling("if"))
//!     .with_quote("STR", QuoteType::new(131, "\""))
//!     .with_comment(CommentType::line("//"));
//! ```

use std::ops::RangeInclusive;

use uls_lexer_core::{CommentType, QuoteType};

use crate::registry::{KeywordKind, DEFAULT_SLOTS};
use crate::TokenId;

/// Stream format version a lexer reads and writes by default.
pub const DEFAULT_STREAM_VERSION: [u32; 3] = [2, 2, 0];

/// One token and its spellings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenSpec {
    pub tok_id: TokenId,
    /// Display name; empty for unnamed one-char tokens.
    pub name: String,
    /// Spellings with an explicit kind, or `None` to infer it from the
    /// spelling's shape.
    pub spellings: Vec<(String, Option<KeywordKind>)>,
}

impl TokenSpec {
    pub fn new(tok_id: TokenId, name: impl Into<String>) -> Self {
        Self {
            tok_id,
            name: name.into(),
            spellings: Vec::new(),
        }
    }

    /// Unnamed one-char token whose id is the character's code point.
    pub fn one_char(ch: char) -> Self {
        let code = i32::try_from(u32::from(ch)).unwrap_or(i32::MAX);
        Self::new(TokenId::new(code), "").spelling_as(ch.to_string(), KeywordKind::OneChar)
    }

    /// Add a spelling whose kind is inferred: identifier-shaped spellings
    /// are keywords, single characters are one-char tokens, the rest are
    /// two-plus tokens.
    #[must_use]
    pub fn spelling(mut self, spelling: impl Into<String>) -> Self {
        self.spellings.push((spelling.into(), None));
        self
    }

    #[must_use]
    pub fn spelling_as(mut self, spelling: impl Into<String>, kind: KeywordKind) -> Self {
        self.spellings.push((spelling.into(), Some(kind)));
        self
    }
}

/// Options for building a [`Lexer`](crate::Lexer).
#[derive(Clone, Debug)]
#[allow(clippy::struct_excessive_bools)]
pub struct LexerConfig {
    /// Name of the token specification; streams must carry the same name.
    pub spec_name: String,
    /// Newest stream format version this lexer accepts.
    pub stream_version: [u32; 3],
    /// Extra characters that may start an identifier. Non-ASCII letters
    /// always may.
    pub id_first_ranges: Vec<RangeInclusive<char>>,
    /// Extra characters that may continue an identifier.
    pub id_ranges: Vec<RangeInclusive<char>>,
    /// Match keywords ignoring ASCII case.
    pub case_insensitive: bool,
    /// Initial bucket count of the keyword hash.
    pub keyword_slots: usize,
    /// Radix prefixes (`0x` → 16 ...).
    pub number_prefixes: Vec<(String, u32)>,
    pub number_suffixes: Vec<String>,
    /// Separator dropped from number lexemes.
    pub digit_separator: Option<char>,
    /// Decimal numbers may have a fraction and an exponent.
    pub floats: bool,
    pub comments: Vec<CommentType>,
    /// Quote types with the name of their token.
    pub quotes: Vec<(String, QuoteType)>,
    pub tokens: Vec<TokenSpec>,
    /// Display-name changes, applied after all tokens are registered.
    pub renames: Vec<(TokenId, String)>,
    pub aliases: Vec<(TokenId, String)>,
    /// Report `EOF` when an input source ends.
    pub want_eof: bool,
}

impl Default for LexerConfig {
    fn default() -> Self {
        Self {
            spec_name: String::new(),
            stream_version: DEFAULT_STREAM_VERSION,
            id_first_ranges: Vec::new(),
            id_ranges: Vec::new(),
            case_insensitive: false,
            keyword_slots: DEFAULT_SLOTS,
            number_prefixes: vec![("0x".into(), 16), ("0b".into(), 2), ("0o".into(), 8)],
            number_suffixes: Vec::new(),
            digit_separator: Some('_'),
            floats: true,
            comments: Vec::new(),
            quotes: Vec::new(),
            tokens: Vec::new(),
            renames: Vec::new(),
            aliases: Vec::new(),
            want_eof: false,
        }
    }
}

impl LexerConfig {
    #[must_use]
    pub fn with_spec_name(mut self, name: impl Into<String>) -> Self {
        self.spec_name = name.into();
        self
    }

    #[must_use]
    pub fn with_stream_version(mut self, version: [u32; 3]) -> Self {
        self.stream_version = version;
        self
    }

    #[must_use]
    pub fn with_id_first_chars(mut self, chars: &str) -> Self {
        self.id_first_ranges.extend(chars.chars().map(|c| c..=c));
        self
    }

    #[must_use]
    pub fn with_id_first_range(mut self, range: RangeInclusive<char>) -> Self {
        self.id_first_ranges.push(range);
        self
    }

    #[must_use]
    pub fn with_id_chars(mut self, chars: &str) -> Self {
        self.id_ranges.extend(chars.chars().map(|c| c..=c));
        self
    }

    #[must_use]
    pub fn with_id_range(mut self, range: RangeInclusive<char>) -> Self {
        self.id_ranges.push(range);
        self
    }

    #[must_use]
    pub fn case_insensitive(mut self, yes: bool) -> Self {
        self.case_insensitive = yes;
        self
    }

    #[must_use]
    pub fn with_keyword_slots(mut self, slots: usize) -> Self {
        self.keyword_slots = slots;
        self
    }

    /// Add or replace a radix prefix.
    #[must_use]
    pub fn with_number_prefix(mut self, prefix: impl Into<String>, radix: u32) -> Self {
        let prefix = prefix.into();
        self.number_prefixes.retain(|(p, _)| !p.eq_ignore_ascii_case(&prefix));
        self.number_prefixes.push((prefix, radix));
        self
    }

    /// Drop every radix prefix, including the defaults.
    #[must_use]
    pub fn without_number_prefixes(mut self) -> Self {
        self.number_prefixes.clear();
        self
    }

    #[must_use]
    pub fn with_number_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.number_suffixes.push(suffix.into());
        self
    }

    #[must_use]
    pub fn with_digit_separator(mut self, separator: Option<char>) -> Self {
        self.digit_separator = separator;
        self
    }

    #[must_use]
    pub fn with_floats(mut self, floats: bool) -> Self {
        self.floats = floats;
        self
    }

    #[must_use]
    pub fn with_comment(mut self, comment: CommentType) -> Self {
        self.comments.push(comment);
        self
    }

    #[must_use]
    pub fn with_quote(mut self, name: impl Into<String>, quote: QuoteType) -> Self {
        self.quotes.push((name.into(), quote));
        self
    }

    #[must_use]
    pub fn with_token(mut self, token: TokenSpec) -> Self {
        self.tokens.push(token);
        self
    }

    /// Register unnamed one-char tokens for every character of `chars`.
    #[must_use]
    pub fn with_one_chars(mut self, chars: &str) -> Self {
        self.tokens.extend(chars.chars().map(TokenSpec::one_char));
        self
    }

    #[must_use]
    pub fn with_rename(mut self, tok_id: TokenId, name: impl Into<String>) -> Self {
        self.renames.push((tok_id, name.into()));
        self
    }

    #[must_use]
    pub fn with_alias(mut self, tok_id: TokenId, alias: impl Into<String>) -> Self {
        self.aliases.push((tok_id, alias.into()));
        self
    }

    #[must_use]
    pub fn with_want_eof(mut self, want_eof: bool) -> Self {
        self.want_eof = want_eof;
        self
    }
}
