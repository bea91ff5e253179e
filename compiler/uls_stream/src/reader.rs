//! Packet reader.

use std::sync::Arc;

use uls_lexer::TokenId;

use crate::{Codec, StreamError, TemplateList};

/// A token read back from a stream, with the coordinate of the last
/// `LINENUM` packet before it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StreamToken {
    pub tok_id: TokenId,
    pub lexeme: Vec<u8>,
    pub line: i32,
    pub tag: String,
}

/// Cursor over the packets of one stream.
///
/// `LINENUM` packets are consumed here and only update the coordinate
/// reported with the following tokens. After the `EOI` packet every call
/// returns `EOI` again. Clones share the packet bytes.
#[derive(Clone, Debug)]
pub struct PacketReader {
    data: Arc<[u8]>,
    /// Offset of the first packet in `data`.
    start: usize,
    pos: usize,
    codec: Codec,
    line: i32,
    tag: String,
    initial_tag: String,
    templates: Arc<TemplateList>,
    ended: bool,
}

impl PacketReader {
    /// Reader over the packets at `data[start..]`, starting at `tag`.
    pub fn new(data: Arc<[u8]>, start: usize, codec: Codec, tag: &str) -> Self {
        Self {
            data,
            start,
            pos: start,
            codec,
            line: 0,
            tag: tag.to_owned(),
            initial_tag: tag.to_owned(),
            templates: Arc::default(),
            ended: false,
        }
    }

    pub fn set_templates(&mut self, templates: Arc<TemplateList>) {
        self.templates = templates;
    }

    pub fn line(&self) -> i32 {
        self.line
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Start over at the first packet.
    pub fn rewind(&mut self) {
        self.pos = self.start;
        self.line = 0;
        self.tag.clone_from(&self.initial_tag);
        self.ended = false;
    }

    /// Next token of the stream.
    ///
    /// Running out of bytes before the `EOI` packet is a malformed
    /// stream. On error the reader does not advance.
    pub fn next_token(&mut self) -> Result<StreamToken, StreamError> {
        loop {
            if self.ended {
                return Ok(self.token(TokenId::EOI, Vec::new()));
            }
            let offset = self.pos;
            let Some((record, used)) = self.codec.decode(&self.data[offset..], offset)? else {
                return Err(StreamError::MalformedRecord {
                    offset,
                    reason: "stream ends without EOI",
                });
            };

            match record.tok_id {
                TokenId::LINENUM => {
                    let (line, tag) =
                        record
                            .parse_line_number()
                            .ok_or(StreamError::MalformedRecord {
                                offset,
                                reason: "bad LINENUM record",
                            })?;
                    self.pos += used;
                    self.line = line;
                    if let Some(tag) = tag {
                        tracing::trace!(%tag, line, "stream tag changed");
                        self.tag = tag;
                    }
                }
                TokenId::EOI => {
                    self.pos += used;
                    self.ended = true;
                }
                tok_id => {
                    self.pos += used;
                    let (tok_id, lexeme) = self.templates.substitute(tok_id, record.text);
                    return Ok(self.token(tok_id, lexeme));
                }
            }
        }
    }

    fn token(&self, tok_id: TokenId, lexeme: Vec<u8>) -> StreamToken {
        StreamToken {
            tok_id,
            lexeme,
            line: self.line,
            tag: self.tag.clone(),
        }
    }
}
