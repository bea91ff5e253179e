//! Token definition registry.
//!
//! Maps spellings to token ids and token ids to their canonical
//! descriptor. The data lives in three arenas addressed by index:
//!
//! - [`TokenView`]: one per token id (name, payload, spelling group, aliases)
//! - `TokenDef`: one per concrete spelling, linked into its view's group
//!   and, for keywords, into a hash bucket chain
//! - `AliasName`: alternate display names of a view
//!
//! Links between them are `Option<Id>` indices instead of pointers. The
//! lookup structures (keyword hash, two-plus trees, one-char map) store
//! `TokenDef` indices and resolve to the owning view on a hit.
//!
//! Lookups never fail with an error: a miss is `None`, and the tokenizer
//! goes on with the next token category.

mod keywords;
mod one_char;
mod two_plus;

use std::any::Any;
use std::fmt;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::{RegistryError, TokenId};

pub(crate) use keywords::DEFAULT_SLOTS;
use keywords::KeywordTable;
use one_char::OneCharMap;
use two_plus::TwoPlusTrees;

/// Longest token name, in bytes.
pub const MAX_NAME_LEN: usize = 31;

/// Longest spelling, in bytes.
pub const MAX_SPELLING_LEN: usize = 31;

/// Index of a [`TokenView`] in the registry.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Debug)]
pub struct TokenViewId(u32);

/// Index of a spelling in the registry.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Debug)]
pub struct TokenDefId(u32);

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
struct AliasId(u32);

macro_rules! arena_index {
    ($($ty:ident),*) => {$(
        impl $ty {
            #[inline]
            fn index(self) -> usize {
                self.0 as usize
            }

            fn next_in(len: usize) -> Result<Self, RegistryError> {
                u32::try_from(len).map($ty).map_err(|_| RegistryError::Full)
            }
        }
    )*};
}

arena_index!(TokenViewId, TokenDefId, AliasId);

/// How a spelling is recognized.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum KeywordKind {
    /// Identifier-shaped keyword, found through the keyword hash.
    IdentifierStyle,
    /// Multi-byte operator, found through the two-plus trees.
    TwoPlusChar,
    /// Single character, found through the one-char map.
    OneChar,
    /// Name of a reserved token.
    Reserved,
    /// Start mark of a quote type.
    Literal,
    /// Spelling recorded for display only.
    User,
}

/// One concrete spelling.
pub(crate) struct TokenDef {
    keyword: SmallVec<[u8; 16]>,
    kind: KeywordKind,
    view: TokenViewId,
    /// Next entry in the keyword hash bucket.
    link: Option<TokenDefId>,
    /// Next spelling of the same token.
    group_next: Option<TokenDefId>,
}

struct AliasName {
    name: String,
    view: TokenViewId,
    next: Option<AliasId>,
}

/// Canonical descriptor of one token id.
pub struct TokenView {
    tok_id: TokenId,
    name: String,
    extra: Option<Box<dyn Any + Send + Sync>>,
    spellings: Option<TokenDefId>,
    aliases: Option<AliasId>,
}

impl TokenView {
    pub fn tok_id(&self) -> TokenId {
        self.tok_id
    }

    /// Display name. Empty for unnamed one-char tokens.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for TokenView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenView")
            .field("tok_id", &self.tok_id)
            .field("name", &self.name)
            .field("extra", &self.extra.is_some())
            .finish_non_exhaustive()
    }
}

/// Result of [`Registry::rename`].
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Rename {
    Unchanged,
    Renamed,
}

/// Returns `true` for `[A-Za-z_][A-Za-z0-9_]*` of at most
/// [`MAX_NAME_LEN`] bytes.
pub fn is_valid_name(name: &str) -> bool {
    let bytes = name.as_bytes();
    match bytes.first() {
        Some(&b) if b.is_ascii_alphabetic() || b == b'_' => {}
        _ => return false,
    }
    bytes.len() <= MAX_NAME_LEN && bytes.iter().all(|&b| b.is_ascii_alphanumeric() || b == b'_')
}

/// Token definition registry of one lexer.
pub struct Registry {
    defs: Vec<TokenDef>,
    views: Vec<TokenView>,
    aliases: Vec<AliasName>,
    by_id: FxHashMap<TokenId, TokenViewId>,
    /// Names and alias names.
    by_name: FxHashMap<String, TokenViewId>,
    keywords: KeywordTable,
    two_plus: TwoPlusTrees,
    one_char: OneCharMap,
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("views", &self.views.len())
            .field("spellings", &self.defs.len())
            .field("aliases", &self.aliases.len())
            .finish_non_exhaustive()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new(DEFAULT_SLOTS, false)
    }
}

impl Registry {
    /// Registry holding the reserved tokens.
    ///
    /// `keyword_slots` is the initial bucket count of the keyword hash;
    /// `case_insensitive` folds keyword spellings to ASCII upper case.
    pub fn new(keyword_slots: usize, case_insensitive: bool) -> Self {
        let mut registry = Self {
            defs: Vec::new(),
            views: Vec::new(),
            aliases: Vec::new(),
            by_id: FxHashMap::default(),
            by_name: FxHashMap::default(),
            keywords: KeywordTable::new(keyword_slots, case_insensitive),
            two_plus: TwoPlusTrees::default(),
            one_char: OneCharMap::default(),
        };
        for (id, name) in TokenId::RESERVED {
            let registered = registry
                .add_token(id, name)
                .and_then(|_| registry.add_tokdef(id, name.as_bytes(), KeywordKind::Reserved));
            debug_assert!(registered.is_ok(), "reserved token {name} collided");
        }
        registry
    }

    // === Registration ===

    /// Create the view for `tok_id`.
    ///
    /// `name` may be empty for unnamed one-char tokens; their display name
    /// is the spelling.
    pub fn add_token(&mut self, tok_id: TokenId, name: &str) -> Result<TokenViewId, RegistryError> {
        if self.by_id.contains_key(&tok_id) {
            return Err(RegistryError::DuplicateId(tok_id));
        }
        if !name.is_empty() {
            if !is_valid_name(name) {
                return Err(RegistryError::InvalidName(name.to_owned()));
            }
            if self.by_name.contains_key(name) {
                return Err(RegistryError::DuplicateName(name.to_owned()));
            }
        }
        let view = TokenViewId::next_in(self.views.len())?;
        self.views.push(TokenView {
            tok_id,
            name: name.to_owned(),
            extra: None,
            spellings: None,
            aliases: None,
        });
        self.by_id.insert(tok_id, view);
        if !name.is_empty() {
            self.by_name.insert(name.to_owned(), view);
        }
        Ok(view)
    }

    /// Register `spelling` for `tok_id` and index it according to `kind`.
    pub fn add_tokdef(
        &mut self,
        tok_id: TokenId,
        spelling: &[u8],
        kind: KeywordKind,
    ) -> Result<TokenDefId, RegistryError> {
        let view = self.view_id(tok_id)?;
        check_spelling(spelling, kind)?;
        if self.spellings_of(view).any(|s| s == spelling) {
            return Err(RegistryError::DuplicateSpelling {
                tok_id,
                spelling: String::from_utf8_lossy(spelling).into_owned(),
            });
        }

        let id = TokenDefId::next_in(self.defs.len())?;
        self.defs.push(TokenDef {
            keyword: SmallVec::from_slice(spelling),
            kind,
            view,
            link: None,
            group_next: None,
        });
        self.append_to_group(view, id);

        match kind {
            KeywordKind::IdentifierStyle => self.keywords.insert(&mut self.defs, id),
            KeywordKind::TwoPlusChar => self.two_plus.insert(spelling, id),
            KeywordKind::OneChar => {
                if let Some(ch) = std::str::from_utf8(spelling).ok().and_then(|s| s.chars().next()) {
                    self.one_char.insert(u32::from(ch), id);
                }
            }
            KeywordKind::Reserved | KeywordKind::Literal | KeywordKind::User => {}
        }
        tracing::trace!(%tok_id, spelling = %String::from_utf8_lossy(spelling), ?kind, "spelling registered");
        Ok(id)
    }

    /// Link `id` at the tail of `view`'s spelling group; the first
    /// registered spelling stays primary.
    fn append_to_group(&mut self, view: TokenViewId, id: TokenDefId) {
        let Some(mut cur) = self.views[view.index()].spellings else {
            self.views[view.index()].spellings = Some(id);
            return;
        };
        while let Some(next) = self.defs[cur.index()].group_next {
            cur = next;
        }
        self.defs[cur.index()].group_next = Some(id);
    }

    /// Add an alternate name for `tok_id`. Adding an alias the token
    /// already has is a no-op.
    pub fn add_alias(&mut self, tok_id: TokenId, alias: &str) -> Result<(), RegistryError> {
        let view = self.view_id(tok_id)?;
        if !is_valid_name(alias) {
            return Err(RegistryError::InvalidName(alias.to_owned()));
        }
        match self.by_name.get(alias) {
            Some(&owner) if owner == view => return Ok(()),
            Some(_) => return Err(RegistryError::DuplicateName(alias.to_owned())),
            None => {}
        }
        self.push_alias(view, alias)?;
        self.by_name.insert(alias.to_owned(), view);
        Ok(())
    }

    fn push_alias(&mut self, view: TokenViewId, alias: &str) -> Result<(), RegistryError> {
        let id = AliasId::next_in(self.aliases.len())?;
        self.aliases.push(AliasName {
            name: alias.to_owned(),
            view,
            next: self.views[view.index()].aliases,
        });
        self.views[view.index()].aliases = Some(id);
        Ok(())
    }

    /// Change the display name of `tok_id`. The id is unchanged and the
    /// previous name stays registered as an alias.
    pub fn rename(&mut self, tok_id: TokenId, new_name: &str) -> Result<Rename, RegistryError> {
        let view = self.view_id(tok_id)?;
        if self.views[view.index()].name == new_name {
            return Ok(Rename::Unchanged);
        }
        if !is_valid_name(new_name) {
            return Err(RegistryError::InvalidName(new_name.to_owned()));
        }
        match self.by_name.get(new_name) {
            Some(&owner) if owner != view => {
                return Err(RegistryError::DuplicateName(new_name.to_owned()));
            }
            Some(_) => {}
            None => {
                self.by_name.insert(new_name.to_owned(), view);
            }
        }
        let old = std::mem::replace(&mut self.views[view.index()].name, new_name.to_owned());
        if !old.is_empty() && !self.aliases(tok_id).contains(&old.as_str()) {
            self.push_alias(view, &old)?;
        }
        tracing::debug!(%tok_id, old = %old, new = new_name, "token renamed");
        Ok(Rename::Renamed)
    }

    /// Attach an opaque payload to `tok_id`, replacing any previous one.
    pub fn set_extra_tokdef<T: Any + Send + Sync>(
        &mut self,
        tok_id: TokenId,
        payload: T,
    ) -> Result<(), RegistryError> {
        let view = self.view_id(tok_id)?;
        self.views[view.index()].extra = Some(Box::new(payload));
        Ok(())
    }

    /// The payload attached to `tok_id`, if it has one of type `T`.
    pub fn extra_tokdef<T: Any + Send + Sync>(&self, tok_id: TokenId) -> Option<&T> {
        self.view(tok_id)?.extra.as_ref()?.downcast_ref::<T>()
    }

    // === Lookup ===

    fn view_id(&self, tok_id: TokenId) -> Result<TokenViewId, RegistryError> {
        self.by_id.get(&tok_id).copied().ok_or(RegistryError::UnknownId(tok_id))
    }

    fn view_of(&self, def: TokenDefId) -> &TokenView {
        &self.views[self.defs[def.index()].view.index()]
    }

    /// The view of `tok_id`.
    pub fn view(&self, tok_id: TokenId) -> Option<&TokenView> {
        self.by_id.get(&tok_id).map(|v| &self.views[v.index()])
    }

    /// Keyword with exactly the spelling `text`.
    pub fn lookup_keyword(&self, text: &[u8]) -> Option<&TokenView> {
        self.keywords.find(&self.defs, text).map(|def| self.view_of(def))
    }

    /// Longest two-plus spelling prefixing `rest`, with its byte length.
    pub fn lookup_two_plus(&self, rest: &[u8]) -> Option<(&TokenView, usize)> {
        self.two_plus
            .longest_match(rest)
            .map(|(def, len)| (self.view_of(def), len))
    }

    /// One-char token for the code point `ch`.
    pub fn lookup_one_char(&self, ch: char) -> Option<&TokenView> {
        self.one_char.get(u32::from(ch)).map(|def| self.view_of(def))
    }

    /// View registered under `name` (current name or alias).
    pub fn resolve_alias(&self, name: &str) -> Option<&TokenView> {
        self.by_name.get(name).map(|v| &self.views[v.index()])
    }

    fn spellings_of(&self, view: TokenViewId) -> impl Iterator<Item = &[u8]> + '_ {
        let mut cur = self.views[view.index()].spellings;
        std::iter::from_fn(move || {
            let id = cur?;
            let def = &self.defs[id.index()];
            cur = def.group_next;
            Some(def.keyword.as_slice())
        })
    }

    /// Spellings of `tok_id`, primary first.
    pub fn spellings(&self, tok_id: TokenId) -> Vec<&[u8]> {
        match self.by_id.get(&tok_id) {
            Some(&view) => self.spellings_of(view).collect(),
            None => Vec::new(),
        }
    }

    /// Alias names of `tok_id`, most recent first.
    pub fn aliases(&self, tok_id: TokenId) -> Vec<&str> {
        let mut out = Vec::new();
        let mut cur = self.view(tok_id).and_then(|v| v.aliases);
        while let Some(id) = cur {
            let alias = &self.aliases[id.index()];
            debug_assert_eq!(self.by_name.get(&alias.name), Some(&alias.view));
            out.push(alias.name.as_str());
            cur = alias.next;
        }
        out
    }

    /// Display name of `tok_id`: its name, or its primary spelling for an
    /// unnamed token.
    pub fn tok2name(&self, tok_id: TokenId) -> Option<String> {
        let view = self.view(tok_id)?;
        if !view.name.is_empty() {
            return Some(view.name.clone());
        }
        self.tok2keyw(tok_id)
    }

    /// Primary spelling of `tok_id`.
    pub fn tok2keyw(&self, tok_id: TokenId) -> Option<String> {
        let first = self.view(tok_id)?.spellings?;
        Some(String::from_utf8_lossy(&self.defs[first.index()].keyword).into_owned())
    }

    /// Returns `true` for the named reserved ids.
    pub fn is_reserved(&self, tok_id: TokenId) -> bool {
        tok_id.is_reserved()
    }

    /// Returns `true` if `tok_id` belongs to a quote type.
    pub fn is_quote_token(&self, tok_id: TokenId) -> bool {
        self.view(tok_id)
            .and_then(|v| v.spellings)
            .is_some_and(|def| self.defs[def.index()].kind == KeywordKind::Literal)
    }

    /// Number of registered token ids.
    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}

fn check_spelling(spelling: &[u8], kind: KeywordKind) -> Result<(), RegistryError> {
    let invalid = |reason| {
        Err(RegistryError::InvalidSpelling {
            spelling: String::from_utf8_lossy(spelling).into_owned(),
            reason,
        })
    };
    if spelling.is_empty() {
        return invalid("empty");
    }
    if spelling.len() > MAX_SPELLING_LEN {
        return invalid("longer than 31 bytes");
    }
    match kind {
        KeywordKind::OneChar => match std::str::from_utf8(spelling) {
            Ok(s) if s.chars().count() == 1 => Ok(()),
            _ => invalid("not a single character"),
        },
        KeywordKind::TwoPlusChar if spelling.len() < 2 => invalid("shorter than two bytes"),
        KeywordKind::TwoPlusChar if starts_like_identifier(spelling) => {
            invalid("two-plus spelling starts like an identifier")
        }
        _ => Ok(()),
    }
}

/// The identifier scan runs before the two-plus lookup, so a two-plus
/// spelling opening with a letter or `_` could never match.
fn starts_like_identifier(spelling: &[u8]) -> bool {
    String::from_utf8_lossy(spelling)
        .chars()
        .next()
        .is_some_and(|c| c == '_' || c.is_alphabetic())
}
