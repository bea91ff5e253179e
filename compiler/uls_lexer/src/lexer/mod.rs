//! The tokenizer.
//!
//! A [`Lexer`] owns its registry and scanner tables and a stack of input
//! frames. [`Lexer::get_token`] reads from the top frame; when that frame
//! is used up it is popped (after an `EOF` token if `want_eof` is set) and
//! reading continues in the frame below. With no frames left every call
//! returns `EOI`.
//!
//! # Errors
//!
//! A literal, comment or number that cannot be recognized produces `ERR`
//! with a diagnostic lexeme. `ERR` is sticky: the frame keeps returning it
//! until the caller pops the frame.

mod frame;
mod scan;

use std::borrow::Cow;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;
use uls_lexer_core::{CharClass, CharClassTable, CommentType, QuoteType, SourceBuffer, MAX_MARK_LEN};

use crate::number::NumberRules;
use crate::registry::{KeywordKind, Registry};
use crate::{ConfigError, LexError, LexerConfig, RegistryError, TokenId};
use frame::Frame;
pub use frame::eof_lexeme;

/// Lexer handle shared between a caller and the stream objects bound to
/// it. A stream holding a handle keeps the lexer alive.
pub type SharedLexer = Arc<Mutex<Lexer>>;

/// A token supplied by a [`TokenFeed`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FedToken {
    pub tok_id: TokenId,
    pub lexeme: Vec<u8>,
    pub line: i32,
    /// New tag of the frame, if it changed.
    pub tag: Option<String>,
}

/// Source of already-recognized tokens, pushed as an input frame.
///
/// The stream reader implements this to replay a token stream through a
/// lexer. Returning `None` ends the frame.
pub trait TokenFeed {
    fn next_token(&mut self) -> Option<FedToken>;
}

/// Everything the scan loop reads but never changes.
struct Tables {
    registry: Registry,
    classes: CharClassTable,
    quotes: Vec<QuoteType>,
    comments: Vec<CommentType>,
    numbers: NumberRules,
}

struct Current {
    tok_id: TokenId,
    lexeme: Vec<u8>,
    line: i32,
    n_lfs: u32,
    ungettable: bool,
}

/// What the top frame produced.
enum Step {
    Token(Current),
    Pop,
    Eoi,
}

/// Configurable tokenizer.
pub struct Lexer {
    tables: Tables,
    spec_name: String,
    stream_version: [u32; 3],
    want_eof: bool,
    frames: Vec<Frame>,
    current: Current,
}

impl fmt::Debug for Lexer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lexer")
            .field("spec_name", &self.spec_name)
            .field("registry", &self.tables.registry)
            .field("frames", &self.frames.len())
            .field("tok_id", &self.current.tok_id)
            .finish_non_exhaustive()
    }
}

impl Lexer {
    /// Check `config` and build the lexer's tables.
    #[tracing::instrument(level = "debug", skip_all, fields(spec = %config.spec_name))]
    pub fn new(config: LexerConfig) -> Result<Self, ConfigError> {
        let tables = build_tables(&config)?;
        tracing::debug!(tokens = tables.registry.len(), "lexer built");
        Ok(Self {
            tables,
            spec_name: config.spec_name,
            stream_version: config.stream_version,
            want_eof: config.want_eof,
            frames: Vec::new(),
            current: Current {
                tok_id: TokenId::NONE,
                lexeme: Vec::new(),
                line: 0,
                n_lfs: 0,
                ungettable: false,
            },
        })
    }

    /// Wrap the lexer in a [`SharedLexer`] handle.
    pub fn into_shared(self) -> SharedLexer {
        Arc::new(Mutex::new(self))
    }

    // === Configuration ===

    pub fn registry(&self) -> &Registry {
        &self.tables.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.tables.registry
    }

    pub fn spec_name(&self) -> &str {
        &self.spec_name
    }

    /// Newest stream format version this lexer accepts.
    pub fn stream_version(&self) -> [u32; 3] {
        self.stream_version
    }

    pub fn want_eof(&self) -> bool {
        self.want_eof
    }

    pub fn set_want_eof(&mut self, want_eof: bool) {
        self.want_eof = want_eof;
    }

    // === Input sources ===

    /// Push `text` as a new input source on top of the current one.
    pub fn push_str(&mut self, text: &str, tag: &str) {
        self.push_frame(Frame::text(text.as_bytes().to_vec(), tag.to_owned()));
    }

    /// Push raw bytes. A byte order mark selects UTF-8, UTF-16 or UTF-32
    /// and is stripped; input without one is taken as UTF-8.
    pub fn push_bytes(&mut self, bytes: &[u8], tag: &str) {
        let source = SourceBuffer::new(bytes);
        for issue in source.encoding_issues() {
            tracing::warn!(tag, pos = issue.pos, kind = ?issue.kind, "encoding issue in input");
        }
        self.push_frame(Frame::text(source.into_bytes(), tag.to_owned()));
    }

    /// Push the contents of the file at `path`, tagged with the path.
    pub fn push_file(&mut self, path: &Path) -> Result<(), LexError> {
        let bytes = std::fs::read(path).map_err(|source| LexError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.push_bytes(&bytes, &path.display().to_string());
        Ok(())
    }

    /// Push a token feed as a new input source.
    pub fn push_feed(&mut self, feed: Box<dyn TokenFeed + Send>, tag: &str) {
        self.push_frame(Frame::feed(feed, tag.to_owned()));
    }

    fn push_frame(&mut self, frame: Frame) {
        tracing::debug!(tag = %frame.tag, depth = self.frames.len() + 1, "input pushed");
        self.frames.push(frame);
        self.current.ungettable = false;
    }

    /// Drop the current input source, including anything pushed back
    /// into it.
    pub fn pop_source(&mut self) -> Result<(), LexError> {
        let frame = self.frames.pop().ok_or(LexError::NoSource)?;
        tracing::debug!(tag = %frame.tag, depth = self.frames.len(), "input popped");
        self.current.ungettable = false;
        Ok(())
    }

    /// Number of pushed input sources.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    // === Tokens ===

    /// Advance to the next token and return its id.
    pub fn get_token(&mut self) -> TokenId {
        loop {
            match self.step() {
                Step::Token(current) => {
                    self.current = current;
                    return self.current.tok_id;
                }
                Step::Pop => {
                    if let Some(frame) = self.frames.pop() {
                        tracing::debug!(tag = %frame.tag, "input exhausted");
                    }
                }
                Step::Eoi => {
                    self.current = Current {
                        tok_id: TokenId::EOI,
                        lexeme: Vec::new(),
                        line: self.current.line,
                        n_lfs: 0,
                        ungettable: false,
                    };
                    return TokenId::EOI;
                }
            }
        }
    }

    fn step(&mut self) -> Step {
        let tables = &self.tables;
        let want_eof = self.want_eof;
        let Some(frame) = self.frames.last_mut() else {
            return Step::Eoi;
        };
        let token = |tok_id, lexeme, line, n_lfs| {
            Step::Token(Current {
                tok_id,
                lexeme,
                line,
                n_lfs,
                ungettable: true,
            })
        };

        let line = frame.input.line();
        if let Some(ungot) = frame.input.take_token() {
            return token(TokenId::new(ungot.tok_id), ungot.lexeme, line, ungot.n_lfs);
        }
        if let Some(message) = &frame.error {
            return token(TokenId::ERR, message.clone(), line, 0);
        }
        if let Some(scanned) = scan::next_token(tables, &mut frame.input) {
            if scanned.tok_id == TokenId::ERR {
                tracing::warn!(
                    tag = %frame.tag,
                    line = scanned.line,
                    error = %String::from_utf8_lossy(&scanned.lexeme),
                    "recognition failed"
                );
                frame.error = Some(scanned.lexeme.clone());
            }
            return token(scanned.tok_id, scanned.lexeme, scanned.line, scanned.n_lfs);
        }
        if let Some(feed) = frame.feed.as_mut() {
            if let Some(fed) = feed.next_token() {
                frame.input.set_line(fed.line);
                if let Some(tag) = fed.tag {
                    frame.tag = tag;
                }
                if fed.tok_id == TokenId::ERR {
                    frame.error = Some(fed.lexeme.clone());
                }
                return token(fed.tok_id, fed.lexeme, fed.line, 0);
            }
            frame.feed = None;
        }
        if want_eof && !frame.eof_sent {
            frame.eof_sent = true;
            let line = frame.input.line();
            return token(TokenId::EOF, eof_lexeme(line, &frame.tag), line, 0);
        }
        Step::Pop
    }

    /// Id of the current token.
    pub fn token_id(&self) -> TokenId {
        self.current.tok_id
    }

    /// Text of the current token.
    pub fn lexeme_bytes(&self) -> &[u8] {
        &self.current.lexeme
    }

    /// Text of the current token, with invalid UTF-8 replaced.
    pub fn lexeme(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.current.lexeme)
    }

    /// Line the current token starts on.
    pub fn line_number(&self) -> i32 {
        self.current.line
    }

    /// Tag of the current input source and the current token's line.
    pub fn tag(&self) -> (&str, i32) {
        let tag = self.frames.last().map_or("", |f| f.tag.as_str());
        (tag, self.current.line)
    }

    /// Rename the current input source.
    pub fn set_tag(&mut self, tag: &str) -> Result<(), LexError> {
        let frame = self.frames.last_mut().ok_or(LexError::NoSource)?;
        frame.tag = tag.to_owned();
        Ok(())
    }

    /// Set the line number of the next unread byte of the current source.
    pub fn set_line(&mut self, line: i32) -> Result<(), LexError> {
        let frame = self.frames.last_mut().ok_or(LexError::NoSource)?;
        frame.input.set_line(line);
        Ok(())
    }

    // === Pushback ===

    fn top_input(&mut self) -> Result<&mut Frame, LexError> {
        self.current.ungettable = false;
        self.frames.last_mut().ok_or(LexError::NoSource)
    }

    /// Push the current token back; the next [`get_token`](Self::get_token)
    /// returns it again. Only the token just read can be pushed back.
    pub fn unget_current(&mut self) -> Result<(), LexError> {
        if !self.current.ungettable {
            return Err(LexError::DoubleUnget);
        }
        let frame = self.frames.last_mut().ok_or(LexError::NoSource)?;
        let current = &mut self.current;
        frame
            .input
            .unget_token(current.tok_id.raw(), &current.lexeme, current.n_lfs);
        current.ungettable = false;
        Ok(())
    }

    /// Push back a token that was never read.
    pub fn unget_token(&mut self, tok_id: TokenId, lexeme: &str) -> Result<(), LexError> {
        let frame = self.top_input()?;
        let n_lfs = uls_lexer_core::count_newlines(lexeme.as_bytes());
        frame.input.unget_token(tok_id.raw(), lexeme.as_bytes(), n_lfs);
        Ok(())
    }

    pub fn unget_char(&mut self, ch: char) -> Result<(), LexError> {
        self.top_input()?.input.unget_char(ch);
        Ok(())
    }

    pub fn unget_str(&mut self, text: &str) -> Result<(), LexError> {
        self.top_input()?.input.unget_str(text);
        Ok(())
    }

    // === Raw characters ===

    /// Next unread character of the current source, without consuming it.
    pub fn peek_char(&self) -> Option<char> {
        let frame = self.frames.last()?;
        scan::decode_char(frame.input.rest()).map(|(ch, _)| ch)
    }

    /// Consume and return the next unread character of the current source.
    pub fn get_char(&mut self) -> Option<char> {
        let frame = self.top_input().ok()?;
        let (ch, width) = scan::decode_char(frame.input.rest())?;
        frame.input.advance(width);
        Some(ch)
    }
}

/// Check `config` and build the registry and scanner tables.
fn build_tables(config: &LexerConfig) -> Result<Tables, ConfigError> {
    let mut classes = CharClassTable::new();
    for range in &config.id_first_ranges {
        classes.add_id_first_range(range.clone());
    }
    for range in &config.id_ranges {
        classes.add_id_range(range.clone());
    }

    check_marks(config, &classes)?;

    let mut registry = Registry::new(config.keyword_slots, config.case_insensitive);

    let mut quotes = Vec::with_capacity(config.quotes.len());
    for (name, quote) in &config.quotes {
        let tok_id = TokenId::new(quote.tok_id());
        if registry.view(tok_id).is_none() {
            registry.add_token(tok_id, name)?;
        }
        registry.add_tokdef(tok_id, quote.start_mark(), KeywordKind::Literal)?;
        classes.insert(quote.start_mark()[0], CharClass::QUOTE);
        quotes.push(quote.clone());
    }

    for comment in &config.comments {
        classes.insert(comment.start_mark()[0], CharClass::COMMENT);
    }

    for spec in &config.tokens {
        if registry.view(spec.tok_id).is_none() {
            registry.add_token(spec.tok_id, &spec.name)?;
        } else if !spec.name.is_empty() {
            registry.add_alias(spec.tok_id, &spec.name)?;
        }
        for (spelling, kind) in &spec.spellings {
            let kind = kind.unwrap_or_else(|| infer_kind(&classes, spelling));
            if kind == KeywordKind::TwoPlusChar
                && spelling.chars().next().is_some_and(|c| classes.is_id_first(c))
            {
                return Err(RegistryError::InvalidSpelling {
                    spelling: spelling.clone(),
                    reason: "two-plus spelling starts like an identifier",
                }
                .into());
            }
            registry.add_tokdef(spec.tok_id, spelling.as_bytes(), kind)?;
            let first = spelling.as_bytes()[0];
            match kind {
                KeywordKind::OneChar => classes.insert(first, CharClass::ONE_CHAR),
                KeywordKind::TwoPlusChar => classes.insert(first, CharClass::TWO_PLUS),
                _ => {}
            }
        }
    }

    for (tok_id, alias) in &config.aliases {
        registry.add_alias(*tok_id, alias)?;
    }
    for (tok_id, name) in &config.renames {
        registry.rename(*tok_id, name)?;
    }

    Ok(Tables {
        registry,
        classes,
        quotes,
        comments: config.comments.clone(),
        numbers: NumberRules::from_config(config)?,
    })
}

/// Kind of a spelling registered without an explicit one.
fn infer_kind(classes: &CharClassTable, spelling: &str) -> KeywordKind {
    let mut chars = spelling.chars();
    let identifier_shaped = chars.next().is_some_and(|c| classes.is_id_first(c))
        && chars.all(|c| classes.is_id(c));
    if identifier_shaped {
        KeywordKind::IdentifierStyle
    } else if spelling.chars().count() == 1 {
        KeywordKind::OneChar
    } else {
        KeywordKind::TwoPlusChar
    }
}

/// Start marks must be non-empty, bounded and unique across quote and
/// comment types. A quote start mark must not be able to begin an
/// identifier or a number fraction, and holds no blanks other than tab
/// and newline.
fn check_marks(config: &LexerConfig, classes: &CharClassTable) -> Result<(), ConfigError> {
    let invalid = |mark: &[u8], reason| ConfigError::InvalidMark {
        mark: String::from_utf8_lossy(mark).into_owned(),
        reason,
    };
    let starts = config
        .quotes
        .iter()
        .map(|(_, q)| (q.start_mark(), q.end_mark()))
        .chain(config.comments.iter().map(|c| (c.start_mark(), c.end_mark())));

    let mut seen: Vec<&[u8]> = Vec::new();
    for (start, end) in starts {
        if start.is_empty() {
            return Err(invalid(start, "empty start mark"));
        }
        if start.len() > MAX_MARK_LEN || end.len() > MAX_MARK_LEN {
            return Err(invalid(start, "mark longer than 15 bytes"));
        }
        if seen.contains(&start) {
            return Err(ConfigError::DuplicateMark(
                String::from_utf8_lossy(start).into_owned(),
            ));
        }
        seen.push(start);
    }
    for (_, quote) in &config.quotes {
        let start = quote.start_mark();
        let printable = start
            .iter()
            .all(|&b| b.is_ascii_graphic() || b >= 0x80 || b == b'\t' || b == b'\n');
        if !printable {
            return Err(invalid(start, "unprintable start mark"));
        }
        if start == b"." {
            return Err(invalid(start, "lone `.` start mark"));
        }
        let first = scan::decode_char(start).map(|(c, _)| c);
        if first.is_some_and(|c| classes.is_id_first(c)) {
            return Err(invalid(start, "start mark begins like an identifier"));
        }
    }
    for comment in &config.comments {
        if comment.end_mark().is_empty() {
            return Err(invalid(comment.start_mark(), "empty end mark"));
        }
    }
    Ok(())
}
