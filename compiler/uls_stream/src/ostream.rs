//! Writing token streams.

use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use uls_lexer::{eof_lexeme, Lexer, SharedLexer, TokenId};

use crate::{Codec, Record, StreamError, StreamFormat, StreamHeader};

/// Buffered packets are written out once they exceed this many bytes.
const FLUSH_THRESHOLD: usize = 1024;

/// A stream being written.
///
/// The header goes out on [`create`](Self::create). Packets are buffered
/// and written in order. [`finish`](Self::finish) appends the closing
/// `EOF` and `EOI` packets; a stream dropped without `finish` has no
/// `EOI` and cannot be read back.
pub struct OutputStream<W: Write> {
    writer: W,
    lexer: SharedLexer,
    header: StreamHeader,
    codec: Codec,
    buf: Vec<u8>,
    last_tag: String,
    last_line: Option<i32>,
    last_tok: TokenId,
}

impl<W: Write> std::fmt::Debug for OutputStream<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputStream")
            .field("header", &self.header)
            .field("buffered", &self.buf.len())
            .finish_non_exhaustive()
    }
}

impl OutputStream<File> {
    /// Create the stream file at `path`.
    pub fn create_file(
        path: &Path,
        lexer: SharedLexer,
        format: StreamFormat,
        tag: &str,
    ) -> Result<Self, StreamError> {
        let file = File::create(path)?;
        Self::create(file, lexer, format, tag)
    }
}

impl<W: Write> OutputStream<W> {
    /// Start a stream of `format` on `writer` for the token specification
    /// of `lexer`. Raw streams have no packets and cannot be written.
    #[tracing::instrument(level = "debug", skip_all, fields(format = %format, tag = %tag))]
    pub fn create(
        mut writer: W,
        lexer: SharedLexer,
        format: StreamFormat,
        tag: &str,
    ) -> Result<Self, StreamError> {
        let codec = match format {
            StreamFormat::Binary(order) => Codec::Binary(order),
            StreamFormat::Text => Codec::Text,
            StreamFormat::Raw => return Err(StreamError::UnsupportedFormat(format.to_string())),
        };
        let spec_name = lexer.lock().spec_name().to_owned();
        let header = StreamHeader::new(&spec_name, format, tag);
        writer.write_all(&header.to_bytes()?)?;
        Ok(Self {
            writer,
            lexer,
            last_tag: header.tag.clone(),
            header,
            codec,
            buf: Vec::with_capacity(2 * FLUSH_THRESHOLD),
            last_line: None,
            last_tok: TokenId::NONE,
        })
    }

    pub fn header(&self) -> &StreamHeader {
        &self.header
    }

    /// Write a token packet.
    pub fn print_tok(&mut self, tok_id: TokenId, lexeme: &[u8]) -> Result<(), StreamError> {
        self.codec.encode(&Record::new(tok_id, lexeme), &mut self.buf);
        self.last_tok = tok_id;
        if self.buf.len() > FLUSH_THRESHOLD {
            self.flush_buf()?;
        }
        Ok(())
    }

    /// Write a `LINENUM` packet moving the reader to `line` of `tag`.
    pub fn print_tok_linenum(&mut self, line: i32, tag: &str) -> Result<(), StreamError> {
        let new_tag = (tag != self.last_tag).then_some(tag);
        let record = Record::line_number(line, new_tag);
        if new_tag.is_some() {
            self.last_tag = tag.to_owned();
        }
        self.last_line = Some(line);
        self.codec.encode(&record, &mut self.buf);
        if self.buf.len() > FLUSH_THRESHOLD {
            self.flush_buf()?;
        }
        Ok(())
    }

    /// Write every token of the bound lexer up to its `EOI`.
    ///
    /// With `numbering` a `LINENUM` packet precedes each token whose tag
    /// or line differs from the previous one. An `ERR` token stops the
    /// stream with [`StreamError::Recognition`].
    #[tracing::instrument(level = "debug", skip(self), fields(tag = %self.header.tag))]
    pub fn start_stream(&mut self, numbering: bool) -> Result<(), StreamError> {
        let lexer = Arc::clone(&self.lexer);
        let mut lx = lexer.lock();
        let want_eof = lx.want_eof();
        lx.set_want_eof(true);
        let result = self.drain(&mut lx, numbering);
        lx.set_want_eof(want_eof);
        result
    }

    fn drain(&mut self, lx: &mut Lexer, numbering: bool) -> Result<(), StreamError> {
        let mut count = 0usize;
        loop {
            let tok_id = lx.get_token();
            if tok_id == TokenId::EOI {
                break;
            }
            if tok_id == TokenId::ERR {
                return Err(StreamError::Recognition {
                    line: lx.line_number(),
                    message: lx.lexeme().into_owned(),
                });
            }
            if numbering {
                let (tag, line) = lx.tag();
                if tag != self.last_tag || Some(line) != self.last_line {
                    self.print_tok_linenum(line, tag)?;
                }
            }
            self.print_tok(tok_id, lx.lexeme_bytes())?;
            count += 1;
        }
        tracing::debug!(tokens = count, "stream written");
        Ok(())
    }

    fn flush_buf(&mut self) -> Result<(), StreamError> {
        self.writer.write_all(&self.buf)?;
        self.buf.clear();
        Ok(())
    }

    /// Close the stream and hand back the writer.
    pub fn finish(mut self) -> Result<W, StreamError> {
        if self.last_tok != TokenId::EOF {
            let lexeme = {
                let lx = self.lexer.lock();
                let (tag, line) = lx.tag();
                eof_lexeme(line, tag)
            };
            self.print_tok(TokenId::EOF, &lexeme)?;
        }
        self.print_tok(TokenId::EOI, b"")?;
        self.flush_buf()?;
        self.writer.flush()?;
        Ok(self.writer)
    }
}

#[cfg(test)]
mod tests;
