//! Input frames.

use uls_lexer_core::PushbackBuffer;

use super::TokenFeed;

/// One pushed input source.
///
/// A frame reads its own bytes first (including anything pushed back
/// into it) and then, if it has one, pulls tokens from its feed.
pub(super) struct Frame {
    pub(super) input: PushbackBuffer,
    pub(super) tag: String,
    pub(super) feed: Option<Box<dyn TokenFeed + Send>>,
    /// Diagnostic of the `ERR` token this frame is stuck on.
    pub(super) error: Option<Vec<u8>>,
    pub(super) eof_sent: bool,
}

impl Frame {
    pub(super) fn text(bytes: Vec<u8>, tag: String) -> Self {
        Self {
            input: PushbackBuffer::new(bytes),
            tag,
            feed: None,
            error: None,
            eof_sent: false,
        }
    }

    pub(super) fn feed(feed: Box<dyn TokenFeed + Send>, tag: String) -> Self {
        Self {
            feed: Some(feed),
            ..Self::text(Vec::new(), tag)
        }
    }
}

/// `EOF` lexeme: `"<line> <tag length>"`, followed by `" <tag>"` when
/// the tag is not empty.
pub fn eof_lexeme(line: i32, tag: &str) -> Vec<u8> {
    let text = if tag.is_empty() {
        format!("{line} 0")
    } else {
        format!("{line} {} {tag}", tag.len())
    };
    text.into_bytes()
}
