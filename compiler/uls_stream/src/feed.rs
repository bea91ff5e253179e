//! Replaying a token stream through a lexer.

use uls_lexer::{FedToken, TokenFeed, TokenId};

use crate::reader::PacketReader;

/// [`TokenFeed`] over the packets of a stream.
///
/// `EOF` packets are dropped (the lexer reports its own `EOF` when the
/// frame ends) and the feed ends at the `EOI` packet. A packet that fails
/// to decode becomes an `ERR` token, which the lexer keeps returning
/// until the frame is popped.
#[derive(Debug)]
pub struct PacketFeed {
    reader: PacketReader,
    last_tag: String,
    done: bool,
}

impl PacketFeed {
    pub fn new(reader: PacketReader) -> Self {
        let last_tag = reader.tag().to_owned();
        Self {
            reader,
            last_tag,
            done: false,
        }
    }
}

impl TokenFeed for PacketFeed {
    fn next_token(&mut self) -> Option<FedToken> {
        while !self.done {
            match self.reader.next_token() {
                Ok(tok) if tok.tok_id == TokenId::EOI => self.done = true,
                Ok(tok) if tok.tok_id == TokenId::EOF => {}
                Ok(tok) => {
                    let tag = (tok.tag != self.last_tag).then(|| {
                        self.last_tag.clone_from(&tok.tag);
                        tok.tag
                    });
                    return Some(FedToken {
                        tok_id: tok.tok_id,
                        lexeme: tok.lexeme,
                        line: tok.line,
                        tag,
                    });
                }
                Err(err) => {
                    tracing::warn!(%err, "stream replay failed");
                    self.done = true;
                    return Some(FedToken {
                        tok_id: TokenId::ERR,
                        lexeme: err.to_string().into_bytes(),
                        line: self.reader.line(),
                        tag: None,
                    });
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests;
