//! Number literal scanning.
//!
//! A number starts with a decimal digit. A leading `-` is never part of
//! the number; it is an operator token of its own. The lexeme keeps the
//! radix prefix, the fraction and exponent, and any registered suffix,
//! with digit separators removed.

use uls_lexer_core::Cursor;

use crate::{ConfigError, LexerConfig};

/// Number syntax of one lexer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NumberRules {
    /// Radix prefixes, longest first.
    prefixes: Vec<(String, u32)>,
    /// Suffixes, longest first.
    suffixes: Vec<String>,
    separator: Option<u8>,
    floats: bool,
}

/// Outcome of [`NumberRules::scan`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NumScan {
    Number { lexeme: Vec<u8>, consumed: usize },
    /// A radix prefix without a valid digit after it.
    Invalid { consumed: usize },
}

fn is_digit(b: u8, radix: u32) -> bool {
    char::from(b).is_digit(radix)
}

impl NumberRules {
    /// Rules without prefixes, suffixes, separator or floats.
    pub fn plain() -> Self {
        Self {
            prefixes: Vec::new(),
            suffixes: Vec::new(),
            separator: None,
            floats: false,
        }
    }

    /// Check the number options of `config` and build its rules.
    pub fn from_config(config: &LexerConfig) -> Result<Self, ConfigError> {
        let mut rules = Self::plain();
        for (prefix, radix) in &config.number_prefixes {
            let bytes = prefix.as_bytes();
            let well_formed = bytes.len() >= 2
                && bytes[0].is_ascii_digit()
                && bytes[1..].iter().all(u8::is_ascii_alphabetic);
            if !well_formed {
                return Err(ConfigError::InvalidNumberPrefix(prefix.clone()));
            }
            if !matches!(radix, 2 | 8 | 10 | 16) {
                return Err(ConfigError::InvalidRadix(*radix));
            }
            rules.add_prefix(prefix, *radix);
        }
        for suffix in &config.number_suffixes {
            let bytes = suffix.as_bytes();
            let well_formed = bytes.first().is_some_and(u8::is_ascii_alphabetic)
                && bytes.iter().all(|b| b.is_ascii_alphanumeric() || *b == b'_');
            if !well_formed {
                return Err(ConfigError::InvalidNumberSuffix(suffix.clone()));
            }
            rules.add_suffix(suffix);
        }
        let separator = match config.digit_separator {
            Some(ch) if ch.is_ascii() && !ch.is_ascii_alphanumeric() => u8::try_from(ch).ok(),
            Some(ch) => return Err(ConfigError::InvalidSeparator(ch)),
            None => None,
        };
        rules.set_separator(separator);
        rules.set_floats(config.floats);
        Ok(rules)
    }

    /// Register (or replace) a radix prefix.
    fn add_prefix(&mut self, prefix: &str, radix: u32) {
        self.prefixes.retain(|(p, _)| !p.eq_ignore_ascii_case(prefix));
        self.prefixes.push((prefix.to_owned(), radix));
        self.prefixes.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
    }

    fn add_suffix(&mut self, suffix: &str) {
        if !self.suffixes.iter().any(|s| s == suffix) {
            self.suffixes.push(suffix.to_owned());
            self.suffixes.sort_by(|a, b| b.len().cmp(&a.len()));
        }
    }

    fn set_separator(&mut self, separator: Option<u8>) {
        self.separator = separator;
    }

    fn set_floats(&mut self, floats: bool) {
        self.floats = floats;
    }

    /// Scan the number at the start of `rest` (which starts with a digit).
    pub fn scan(&self, rest: &[u8]) -> NumScan {
        let mut cursor = Cursor::new(rest);
        let mut lexeme = Vec::new();

        let prefix = self
            .prefixes
            .iter()
            .find(|(p, _)| rest.len() >= p.len() && rest[..p.len()].eq_ignore_ascii_case(p.as_bytes()));
        let radix = match prefix {
            Some((p, radix)) => {
                lexeme.extend_from_slice(&rest[..p.len()]);
                cursor.advance_n(p.len());
                if !is_digit(cursor.current(), *radix) {
                    return NumScan::Invalid {
                        consumed: cursor.pos(),
                    };
                }
                *radix
            }
            None => 10,
        };

        self.eat_digits(&mut cursor, &mut lexeme, radix);

        if radix == 10 && self.floats {
            if cursor.current() == b'.' && cursor.peek().is_ascii_digit() {
                lexeme.push(b'.');
                cursor.advance();
                self.eat_digits(&mut cursor, &mut lexeme, 10);
            }
            if matches!(cursor.current(), b'e' | b'E') {
                let signed = matches!(cursor.peek(), b'+' | b'-');
                let first_digit = if signed { cursor.peek2() } else { cursor.peek() };
                if first_digit.is_ascii_digit() {
                    let head = if signed { 2 } else { 1 };
                    lexeme.extend_from_slice(&cursor.rest()[..head]);
                    cursor.advance_n(head);
                    self.eat_digits(&mut cursor, &mut lexeme, 10);
                }
            }
        }

        if let Some(suffix) = self.suffixes.iter().find(|s| cursor.starts_with(s.as_bytes())) {
            lexeme.extend_from_slice(suffix.as_bytes());
            cursor.advance_n(suffix.len());
        }

        NumScan::Number {
            lexeme,
            consumed: cursor.pos(),
        }
    }

    /// Digits of `radix`, dropping separators that sit between two digits.
    fn eat_digits(&self, cursor: &mut Cursor<'_>, lexeme: &mut Vec<u8>, radix: u32) {
        loop {
            let b = cursor.current();
            if !cursor.is_eof() && is_digit(b, radix) {
                lexeme.push(b);
                cursor.advance();
            } else if Some(b) == self.separator
                && !cursor.is_eof()
                && is_digit(cursor.peek(), radix)
                && lexeme.last().is_some_and(|&d| is_digit(d, radix))
            {
                cursor.advance();
            } else {
                break;
            }
        }
    }
}
