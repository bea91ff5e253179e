//! Token identifiers.
//!
//! Ids below [`TokenId::FIRST_USER`] are reserved: the named reserved ids
//! occupy `0..=8`, and one-char tokens default to their byte value. User
//! tokens (keywords, operators, literal types) start at 128.

use std::fmt;

/// Integer identifying a token category.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Debug)]
pub struct TokenId(i32);

impl TokenId {
    /// End of all input.
    pub const EOI: TokenId = TokenId(0);
    /// End of the current input frame.
    pub const EOF: TokenId = TokenId(1);
    /// Identifier.
    pub const ID: TokenId = TokenId(2);
    /// Number.
    pub const NUM: TokenId = TokenId(3);
    /// Line-number resynchronization in streams.
    pub const LINENUM: TokenId = TokenId(4);
    /// Template value substituted for an identifier.
    pub const TMPL: TokenId = TokenId(5);
    pub const LINK: TokenId = TokenId(6);
    pub const NONE: TokenId = TokenId(7);
    /// Recognition failure.
    pub const ERR: TokenId = TokenId(8);

    /// First id of user-extensible regular tokens.
    pub const FIRST_USER: i32 = 128;

    /// Reserved ids with their default names.
    pub const RESERVED: [(TokenId, &'static str); 9] = [
        (TokenId::EOI, "EOI"),
        (TokenId::EOF, "EOF"),
        (TokenId::ID, "ID"),
        (TokenId::NUM, "NUM"),
        (TokenId::LINENUM, "LINENUM"),
        (TokenId::TMPL, "TMPL"),
        (TokenId::LINK, "LINK"),
        (TokenId::NONE, "NONE"),
        (TokenId::ERR, "ERR"),
    ];

    #[inline]
    pub const fn new(raw: i32) -> Self {
        TokenId(raw)
    }

    #[inline]
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// Returns `true` for one of the named reserved ids.
    pub fn is_reserved(self) -> bool {
        Self::RESERVED.iter().any(|(id, _)| *id == self)
    }

    /// Returns `true` if the id is in the user-extensible range.
    pub fn is_user(self) -> bool {
        self.0 >= Self::FIRST_USER
    }
}

impl From<i32> for TokenId {
    fn from(raw: i32) -> Self {
        TokenId(raw)
    }
}

impl From<TokenId> for i32 {
    fn from(id: TokenId) -> Self {
        id.0
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests;
