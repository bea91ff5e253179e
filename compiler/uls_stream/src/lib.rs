//! Token stream files for ULS.
//!
//! A stream is a recorded token sequence that a lexer can replay instead
//! of scanning source text again:
//!
//! ```text
//! ┌──────────────────────┬──────────────────────────────────────────┐
//! │ header (512 bytes)   │ packets: LINENUM? TOKEN* ... EOF EOI     │
//! └──────────────────────┴──────────────────────────────────────────┘
//! ```
//!
//! [`OutputStream`] writes the header and drives a lexer to produce the
//! packets. [`InputStream`] checks the header against a bound lexer and
//! reads the tokens back, either directly or by pushing a [`PacketFeed`]
//! into the lexer as a new input source. Identifiers matching a
//! [`TemplateList`] entry are read back as `TMPL` tokens.

mod byte_order;
mod dump;
mod error;
mod feed;
mod header;
mod istream;
mod ostream;
mod packet;
mod reader;
mod sink;
mod template;
mod version;

pub use byte_order::{ByteOrder, WireFormat};
pub use dump::{dump_token, dump_tokens, format_token, token_label};
pub use error::StreamError;
pub use feed::PacketFeed;
pub use header::{StreamFormat, StreamHeader, HEADER_SIZE, MAGIC};
pub use istream::InputStream;
pub use ostream::OutputStream;
pub use packet::{binary_record_size, escape_into, unescape, Codec, Record};
pub use reader::{PacketReader, StreamToken};
pub use sink::{OutputSink, SYSTEM_SINK};
pub use template::TemplateList;
pub use version::StreamVersion;
