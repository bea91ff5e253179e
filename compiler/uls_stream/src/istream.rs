//! Reading streams back.
//!
//! An [`InputStream`] is either a packet stream (a file starting with the
//! stream header) or raw source text. Both are read through a bound
//! lexer: binding checks that the stream was written for the lexer's
//! token specification and that its version is not newer than the lexer
//! supports.

use std::path::Path;
use std::sync::Arc;

use uls_lexer::{SharedLexer, TokenId};
use uls_lexer_core::SourceBuffer;

use crate::reader::{PacketReader, StreamToken};
use crate::{
    Codec, PacketFeed, StreamError, StreamFormat, StreamHeader, StreamVersion, TemplateList,
};

enum Source {
    Raw { text: Vec<u8>, pushed: bool },
    Packets(PacketReader),
}

/// A stream opened for reading.
pub struct InputStream {
    header: StreamHeader,
    source: Source,
    lexer: Option<SharedLexer>,
}

impl std::fmt::Debug for InputStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputStream")
            .field("header", &self.header)
            .field("bound", &self.lexer.is_some())
            .finish_non_exhaustive()
    }
}

impl InputStream {
    /// Open `bytes` as a stream. Without the stream header the bytes are
    /// raw source text named `tag`; a byte-order mark is stripped and
    /// UTF-16/32 text converted to UTF-8.
    pub fn open(bytes: Vec<u8>, tag: &str) -> Result<Self, StreamError> {
        if !StreamHeader::is_stream(&bytes) {
            let source = SourceBuffer::new(&bytes);
            for issue in source.encoding_issues() {
                tracing::warn!(tag, pos = issue.pos, kind = ?issue.kind, "encoding issue in raw input");
            }
            tracing::debug!(tag, encoding = ?source.encoding(), "raw stream opened");
            let header = StreamHeader {
                tag: tag.to_owned(),
                ..StreamHeader::raw()
            };
            return Ok(Self {
                header,
                source: Source::Raw {
                    text: source.into_bytes(),
                    pushed: false,
                },
                lexer: None,
            });
        }

        let header = StreamHeader::parse(&bytes)?;
        let codec = match header.format {
            StreamFormat::Binary(order) => Codec::Binary(order),
            StreamFormat::Text => Codec::Text,
            StreamFormat::Raw => return Err(StreamError::UnsupportedFormat(header.format.to_string())),
        };
        tracing::debug!(
            spec = %header.spec_name,
            format = %header.format,
            version = %header.version,
            "stream opened"
        );
        let reader = PacketReader::new(bytes.into(), header.data_offset(), codec, &header.tag);
        Ok(Self {
            header,
            source: Source::Packets(reader),
            lexer: None,
        })
    }

    /// Open the file at `path`; raw files are tagged with their path.
    #[tracing::instrument(level = "debug", skip_all, fields(path = %path.display()))]
    pub fn open_file(path: &Path) -> Result<Self, StreamError> {
        let bytes = std::fs::read(path)?;
        Self::open(bytes, &path.display().to_string())
    }

    pub fn header(&self) -> &StreamHeader {
        &self.header
    }

    pub fn format(&self) -> StreamFormat {
        self.header.format
    }

    /// Bind the stream to `lexer` after checking compatibility.
    pub fn bind(&mut self, lexer: SharedLexer) -> Result<(), StreamError> {
        {
            let lx = lexer.lock();
            let supported = StreamVersion::from(lx.stream_version());
            self.header.check_compatibility(lx.spec_name(), supported)?;
        }
        tracing::debug!(tag = %self.header.tag, "stream bound");
        self.lexer = Some(lexer);
        Ok(())
    }

    /// Substitute `templates` into `ID` tokens read from now on.
    pub fn set_templates(&mut self, templates: TemplateList) {
        if let Source::Packets(reader) = &mut self.source {
            reader.set_templates(Arc::new(templates));
        }
    }

    /// Restart at the first token.
    pub fn rewind(&mut self) {
        match &mut self.source {
            Source::Raw { pushed, .. } => *pushed = false,
            Source::Packets(reader) => reader.rewind(),
        }
    }

    fn bound(&self) -> Result<&SharedLexer, StreamError> {
        self.lexer.as_ref().ok_or(StreamError::Unbound)
    }

    /// Next token of the stream.
    ///
    /// Raw text is pushed into the bound lexer on the first call and
    /// tokenized there; packet streams are decoded directly.
    pub fn read_tok(&mut self) -> Result<StreamToken, StreamError> {
        let lexer = Arc::clone(self.bound()?);
        match &mut self.source {
            Source::Packets(reader) => reader.next_token(),
            Source::Raw { text, pushed } => {
                let mut lx = lexer.lock();
                if !*pushed {
                    lx.push_bytes(text, &self.header.tag);
                    *pushed = true;
                }
                let tok_id = lx.get_token();
                let (tag, line) = lx.tag();
                if tok_id == TokenId::ERR {
                    return Err(StreamError::Recognition {
                        line,
                        message: lx.lexeme().into_owned(),
                    });
                }
                Ok(StreamToken {
                    tok_id,
                    lexeme: lx.lexeme_bytes().to_vec(),
                    line,
                    tag: tag.to_owned(),
                })
            }
        }
    }

    /// Push the whole stream into the bound lexer as a new input source.
    pub fn push_to_lexer(&self) -> Result<(), StreamError> {
        let mut lx = self.bound()?.lock();
        match &self.source {
            Source::Raw { text, .. } => lx.push_bytes(text, &self.header.tag),
            Source::Packets(reader) => {
                let mut reader = reader.clone();
                reader.rewind();
                lx.push_feed(Box::new(PacketFeed::new(reader)), &self.header.tag);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
