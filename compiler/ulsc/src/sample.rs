//! Built-in token specification: a small C-like language.

use uls_lexer::{
    CommentType, ConfigError, EscapeMap, Lexer, LexerConfig, QuoteType, TokenId, TokenSpec,
};

/// Spec name written into stream headers.
pub const SAMPLE_SPEC: &str = "uls-sample";

const KEYWORDS: [(i32, &str, &str); 7] = [
    (130, "IF", "if"),
    (131, "ELSE", "else"),
    (132, "WHILE", "while"),
    (133, "FOR", "for"),
    (134, "RETURN", "return"),
    (135, "INT", "int"),
    (136, "CHAR", "char"),
];

const OPERATORS: [(i32, &str, &str); 11] = [
    (150, "LE", "<="),
    (151, "GE", ">="),
    (152, "EQ", "=="),
    (153, "NE", "!="),
    (154, "AND", "&&"),
    (155, "OR", "||"),
    (156, "INCR", "++"),
    (157, "DECR", "--"),
    (158, "ARROW", "->"),
    (159, "SHL", "<<"),
    (160, "SHR", ">>"),
];

const STR: i32 = 170;
const CHR: i32 = 171;

pub fn sample_config() -> LexerConfig {
    let mut config = LexerConfig::default()
        .with_spec_name(SAMPLE_SPEC)
        .with_one_chars("+-*/%=<>!&|^~?:;,.()[]{}")
        .with_quote(
            "STR",
            QuoteType::new(STR, "\"").with_escapes(EscapeMap::legacy_full()),
        )
        .with_quote(
            "CHR",
            QuoteType::new(CHR, "'").with_escapes(EscapeMap::legacy_full()),
        )
        .with_comment(CommentType::line("//"))
        .with_comment(CommentType::block("/*", "*/"))
        .with_number_suffix("u")
        .with_number_suffix("l")
        .with_number_suffix("ul");
    for (id, name, spelling) in KEYWORDS.into_iter().chain(OPERATORS) {
        config = config.with_token(TokenSpec::new(TokenId::new(id), name).spelling(spelling));
    }
    config
}

pub fn sample_lexer() -> Result<Lexer, ConfigError> {
    Lexer::new(sample_config())
}
