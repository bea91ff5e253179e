//! Per-byte character classes.
//!
//! The tokenizer dispatches on the class of the first byte of a token
//! before it consults any table. Classes are bit flags because one byte
//! may open several token categories at once (`/` can start a comment
//! and also be a one-char operator).
//!
//! Characters outside ASCII have no byte class of their own. Whether they
//! may form identifiers is decided on the decoded code point: configured
//! ranges first, then the Unicode alphabetic and alphanumeric properties.

use std::ops::RangeInclusive;

use bitflags::bitflags;

bitflags! {
    /// Token categories a byte may start or continue.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct CharClass: u16 {
        /// May start an identifier.
        const ID_FIRST = 1 << 0;
        /// May continue an identifier.
        const ID = 1 << 1;
        /// Decimal digit.
        const DIGIT = 1 << 2;
        /// Blank skipped between tokens.
        const SPACE = 1 << 3;
        /// First byte of some quote start mark.
        const QUOTE = 1 << 4;
        /// First byte of some comment start mark.
        const COMMENT = 1 << 5;
        /// Has a registered one-char token.
        const ONE_CHAR = 1 << 6;
        /// First byte of some two-plus token.
        const TWO_PLUS = 1 << 7;
        /// Emitted as an anonymous one-char token when nothing else matches.
        const ANONYMOUS = 1 << 8;
    }
}

/// Class lookup table for all 256 byte values, plus the identifier
/// ranges for non-ASCII characters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CharClassTable {
    classes: [CharClass; 256],
    id_first_ranges: Vec<RangeInclusive<char>>,
    id_ranges: Vec<RangeInclusive<char>>,
}

impl Default for CharClassTable {
    fn default() -> Self {
        Self::new()
    }
}

impl CharClassTable {
    /// Default classes: ASCII letters and `_` form identifiers; digits
    /// continue them; printable ASCII punctuation is anonymous. Bytes
    /// `>= 0x80` start with no class.
    pub fn new() -> Self {
        let mut classes = [CharClass::empty(); 256];
        for (b, class) in (0u8..=255).zip(classes.iter_mut()) {
            if b.is_ascii_alphabetic() || b == b'_' {
                *class |= CharClass::ID_FIRST | CharClass::ID;
            } else if b.is_ascii_digit() {
                *class |= CharClass::DIGIT | CharClass::ID;
            } else if crate::cursor::is_blank(b) {
                *class |= CharClass::SPACE;
            } else if b.is_ascii_punctuation() {
                *class |= CharClass::ANONYMOUS;
            }
        }
        Self {
            classes,
            id_first_ranges: Vec::new(),
            id_ranges: Vec::new(),
        }
    }

    /// Class of `b`.
    #[inline]
    pub fn get(&self, b: u8) -> CharClass {
        self.classes[usize::from(b)]
    }

    /// Returns `true` if `b` has every flag in `class`.
    #[inline]
    pub fn is(&self, b: u8, class: CharClass) -> bool {
        self.get(b).contains(class)
    }

    /// Add `class` to `b`.
    pub fn insert(&mut self, b: u8, class: CharClass) {
        self.classes[usize::from(b)] |= class;
    }

    /// Remove `class` from `b`.
    pub fn remove(&mut self, b: u8, class: CharClass) {
        self.classes[usize::from(b)].remove(class);
    }

    /// Let every character of `range` start (and continue) identifiers.
    /// ASCII members lose their anonymous class.
    pub fn add_id_first_range(&mut self, range: RangeInclusive<char>) {
        self.mark_ascii(&range, CharClass::ID_FIRST | CharClass::ID);
        self.id_first_ranges.push(range);
    }

    /// Let every character of `range` continue identifiers.
    pub fn add_id_range(&mut self, range: RangeInclusive<char>) {
        self.mark_ascii(&range, CharClass::ID);
        self.id_ranges.push(range);
    }

    fn mark_ascii(&mut self, range: &RangeInclusive<char>, class: CharClass) {
        for b in 0u8..0x80 {
            if range.contains(&char::from(b)) {
                self.insert(b, class);
                self.remove(b, CharClass::ANONYMOUS);
            }
        }
    }

    /// Returns `true` if `ch` may start an identifier.
    pub fn is_id_first(&self, ch: char) -> bool {
        match u8::try_from(ch) {
            Ok(b) if b.is_ascii() => self.is(b, CharClass::ID_FIRST),
            _ => in_ranges(&self.id_first_ranges, ch) || ch.is_alphabetic(),
        }
    }

    /// Returns `true` if `ch` may continue an identifier.
    pub fn is_id(&self, ch: char) -> bool {
        match u8::try_from(ch) {
            Ok(b) if b.is_ascii() => self.is(b, CharClass::ID),
            _ => {
                in_ranges(&self.id_ranges, ch)
                    || in_ranges(&self.id_first_ranges, ch)
                    || ch.is_alphanumeric()
            }
        }
    }
}

fn in_ranges(ranges: &[RangeInclusive<char>], ch: char) -> bool {
    ranges.iter().any(|r| r.contains(&ch))
}
