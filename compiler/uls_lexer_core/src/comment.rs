//! Comment types and comment skipping.

use bitflags::bitflags;

use crate::literal::LiteralError;
use crate::{count_newlines, Cursor};

bitflags! {
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct CommentFlags: u8 {
        /// Ends at the next newline, which is consumed.
        const ONELINE = 1 << 0;
        /// Start mark is only recognized at the start of a line.
        const COLUMN0 = 1 << 1;
        /// Start marks inside the comment nest.
        const NESTED = 1 << 2;
    }
}

/// A comment delimiter pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommentType {
    start_mark: Vec<u8>,
    end_mark: Vec<u8>,
    flags: CommentFlags,
}

/// A skipped comment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Skipped {
    /// Bytes consumed after the start mark.
    pub consumed: usize,
    pub n_lfs: u32,
}

impl CommentType {
    /// Line comment such as `//` or `#`.
    pub fn line(start_mark: impl Into<Vec<u8>>) -> Self {
        Self {
            start_mark: start_mark.into(),
            end_mark: b"\n".to_vec(),
            flags: CommentFlags::ONELINE,
        }
    }

    /// Block comment such as `/* ... */`.
    pub fn block(start_mark: impl Into<Vec<u8>>, end_mark: impl Into<Vec<u8>>) -> Self {
        Self {
            start_mark: start_mark.into(),
            end_mark: end_mark.into(),
            flags: CommentFlags::empty(),
        }
    }

    #[must_use]
    pub fn with_flags(mut self, flags: CommentFlags) -> Self {
        self.flags |= flags;
        self
    }

    pub fn start_mark(&self) -> &[u8] {
        &self.start_mark
    }

    pub fn end_mark(&self) -> &[u8] {
        &self.end_mark
    }

    pub fn flags(&self) -> CommentFlags {
        self.flags
    }

    /// Whether the start mark counts at the current column.
    pub fn applies_at(&self, at_line_start: bool) -> bool {
        at_line_start || !self.flags.contains(CommentFlags::COLUMN0)
    }

    /// Skip the comment body. `input` starts right after the start mark.
    ///
    /// A one-line comment at end of input is complete; any other comment
    /// without its end mark is [`LiteralError::Unterminated`].
    pub fn skip(&self, input: &[u8]) -> Result<Skipped, LiteralError> {
        if self.flags.contains(CommentFlags::ONELINE) {
            let mut cursor = Cursor::new(input);
            cursor.eat_until_newline_or_eof();
            let n_lfs = u32::from(cursor.eat(b"\n"));
            return Ok(Skipped {
                consumed: cursor.pos(),
                n_lfs,
            });
        }

        let consumed = if self.flags.contains(CommentFlags::NESTED) {
            self.skip_nested(input)
        } else {
            Cursor::new(input).find(&self.end_mark).map(|at| at + self.end_mark.len())
        };
        let consumed = consumed.ok_or(LiteralError::Unterminated)?;
        Ok(Skipped {
            consumed,
            n_lfs: count_newlines(&input[..consumed]),
        })
    }

    fn skip_nested(&self, input: &[u8]) -> Option<usize> {
        let mut cursor = Cursor::new(input);
        let mut depth = 1usize;
        while !cursor.is_eof() {
            if cursor.eat(&self.end_mark) {
                depth -= 1;
                if depth == 0 {
                    return Some(cursor.pos());
                }
            } else if cursor.eat(&self.start_mark) {
                depth += 1;
            } else {
                cursor.advance();
            }
        }
        None
    }
}

/// The comment type whose start mark is the longest prefix of `rest`.
pub fn longest_comment<'c>(
    comments: &'c [CommentType],
    rest: &[u8],
    at_line_start: bool,
) -> Option<&'c CommentType> {
    comments
        .iter()
        .filter(|c| !c.start_mark.is_empty() && c.applies_at(at_line_start))
        .filter(|c| rest.starts_with(&c.start_mark))
        .max_by_key(|c| c.start_mark.len())
}
