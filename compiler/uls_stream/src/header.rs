//! The 512-byte stream header.
//!
//! ```text
//! #34183847-D64D-C131-D754-577215664901-ULS-STREAM
//! FILE_VERSION: 2.2
//! SPEC: sample
//! TYPE: BIN/LITTLE
//! CREATION_TIME: 2026-10-16 09:30
//! TAG: input.txt
//! #_______________RECOMMENDED NOT TO EDIT!______________________
//! ...filler...
//! %%
//! ```
//!
//! The header is plain text so `head -c 512` shows what a stream is. The
//! filler pads it to exactly [`HEADER_SIZE`] bytes with `%%\n` as the last
//! three; packets start right after. Streams from older writers may carry
//! a `TOKEN_REMAP: <lines> <blocks>` attribute; that many further blocks
//! sit between the header and the packets and are skipped.

use std::fmt;
use std::str::FromStr;

use crate::{ByteOrder, StreamError, StreamVersion};

/// First line of every stream file, without its newline.
pub const MAGIC: &str = "#34183847-D64D-C131-D754-577215664901-ULS-STREAM";

/// Size of the header block.
pub const HEADER_SIZE: usize = 512;

/// Where the closing `%%\n` starts.
const HEADER_END: usize = HEADER_SIZE - 3;

/// Upper bound on declared remap blocks, so a corrupt count cannot
/// overflow [`StreamHeader::data_offset`].
const MAX_REMAP_BLOCKS: usize = 1 << 16;

const FILLER_WIDTH: usize = 64;

/// Encoding of a stream's packets.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum StreamFormat {
    /// Plain source text without a header.
    Raw,
    Binary(ByteOrder),
    /// One human-readable record per line.
    Text,
}

impl StreamFormat {
    /// Binary in the byte order of the running machine.
    pub const fn host_binary() -> Self {
        StreamFormat::Binary(ByteOrder::host())
    }

    /// Value of the header's `TYPE:` attribute.
    pub fn type_name(self) -> Option<&'static str> {
        match self {
            StreamFormat::Raw => None,
            StreamFormat::Binary(ByteOrder::Little) => Some("BIN/LITTLE"),
            StreamFormat::Binary(ByteOrder::Big) => Some("BIN/BIG"),
            StreamFormat::Text => Some("TEXT/ASCII"),
        }
    }

    fn from_type_name(name: &str) -> Option<Self> {
        match name {
            "BIN/LITTLE" => Some(StreamFormat::Binary(ByteOrder::Little)),
            "BIN/BIG" => Some(StreamFormat::Binary(ByteOrder::Big)),
            "TEXT/ASCII" => Some(StreamFormat::Text),
            _ => None,
        }
    }
}

/// Short names used on the command line: `raw`, `bin`, `bin-le`,
/// `bin-be`, `txt`.
impl FromStr for StreamFormat {
    type Err = StreamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "raw" => Ok(StreamFormat::Raw),
            "bin" => Ok(StreamFormat::host_binary()),
            "bin-le" => Ok(StreamFormat::Binary(ByteOrder::Little)),
            "bin-be" => Ok(StreamFormat::Binary(ByteOrder::Big)),
            "txt" => Ok(StreamFormat::Text),
            _ => Err(StreamError::UnsupportedFormat(s.to_owned())),
        }
    }
}

impl fmt::Display for StreamFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StreamFormat::Raw => "raw",
            StreamFormat::Binary(ByteOrder::Little) => "bin-le",
            StreamFormat::Binary(ByteOrder::Big) => "bin-be",
            StreamFormat::Text => "txt",
        })
    }
}

/// Metadata at the start of a stream file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StreamHeader {
    pub version: StreamVersion,
    /// Name of the token specification the stream was produced with.
    pub spec_name: String,
    pub format: StreamFormat,
    /// `YYYY-MM-DD HH:MM`, local time.
    pub creation_time: String,
    /// Free-form name of the stream's content.
    pub tag: String,
    /// Blocks of [`HEADER_SIZE`] bytes between the header and the first
    /// packet, declared by a `TOKEN_REMAP` attribute. Their token-id remap
    /// table is skipped; this crate never writes one.
    pub remap_blocks: usize,
}

impl StreamHeader {
    /// Header for a new stream, stamped with the current local time.
    pub fn new(spec_name: &str, format: StreamFormat, tag: &str) -> Self {
        Self {
            version: StreamVersion::CURRENT,
            spec_name: spec_name.to_owned(),
            format,
            creation_time: chrono::Local::now().format("%Y-%m-%d %H:%M").to_string(),
            tag: tag.to_owned(),
            remap_blocks: 0,
        }
    }

    /// Header of a raw (header-less) stream.
    pub fn raw() -> Self {
        Self {
            version: StreamVersion::default(),
            spec_name: String::new(),
            format: StreamFormat::Raw,
            creation_time: String::new(),
            tag: String::new(),
            remap_blocks: 0,
        }
    }

    /// Offset of the first packet.
    pub fn data_offset(&self) -> usize {
        HEADER_SIZE * (1 + self.remap_blocks)
    }

    /// Returns `true` if `bytes` starts with the stream magic line.
    pub fn is_stream(bytes: &[u8]) -> bool {
        bytes.starts_with(MAGIC.as_bytes()) && bytes.get(MAGIC.len()) == Some(&b'\n')
    }

    /// Fail unless a lexer named `spec_name` supporting stream versions
    /// up to `supported` may read this stream. Raw streams always pass.
    pub fn check_compatibility(
        &self,
        spec_name: &str,
        supported: StreamVersion,
    ) -> Result<(), StreamError> {
        if self.format == StreamFormat::Raw {
            return Ok(());
        }
        if self.spec_name != spec_name {
            return Err(StreamError::SpecMismatch {
                expected: spec_name.to_owned(),
                found: self.spec_name.clone(),
            });
        }
        if !self.version.is_readable_by(supported) {
            return Err(StreamError::UnsupportedVersion {
                found: self.version,
                supported,
            });
        }
        Ok(())
    }

    /// The header block, exactly [`HEADER_SIZE`] bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, StreamError> {
        let type_name = self
            .format
            .type_name()
            .ok_or_else(|| StreamError::UnsupportedFormat(self.format.to_string()))?;

        let mut buf = Vec::with_capacity(HEADER_SIZE);
        let mut line = |key: &str, value: &str| -> Result<(), StreamError> {
            if value.contains('\n') {
                return Err(StreamError::InvalidHeader(format!("newline in {key}")));
            }
            buf.extend_from_slice(format!("{key}: {value}\n").as_bytes());
            Ok(())
        };
        line("FILE_VERSION", &self.version.to_string())?;
        line("SPEC", &self.spec_name)?;
        line("TYPE", type_name)?;
        line("CREATION_TIME", &self.creation_time)?;
        line("TAG", &self.tag)?;

        let mut out = Vec::with_capacity(HEADER_SIZE);
        out.extend_from_slice(MAGIC.as_bytes());
        out.push(b'\n');
        out.extend_from_slice(&buf);
        if out.len() > HEADER_END {
            return Err(StreamError::InvalidHeader(format!(
                "attributes take {} bytes, more than fit in {HEADER_SIZE}",
                out.len()
            )));
        }
        fill(&mut out);
        debug_assert_eq!(out.len(), HEADER_SIZE);
        Ok(out)
    }

    /// Parse a header block. `bytes` may extend past the header.
    pub fn parse(bytes: &[u8]) -> Result<Self, StreamError> {
        let invalid = |reason: &str| StreamError::InvalidHeader(reason.to_owned());
        if !Self::is_stream(bytes) {
            return Err(invalid("missing magic line"));
        }
        let block = bytes
            .get(..HEADER_SIZE)
            .ok_or_else(|| invalid("shorter than 512 bytes"))?;
        if &block[HEADER_END..] != b"%%\n" {
            return Err(invalid("missing `%%` terminator"));
        }

        let body = String::from_utf8_lossy(&block[MAGIC.len() + 1..HEADER_END]);
        let mut version = None;
        let mut format = None;
        let mut header = Self::raw();
        for line in body.lines() {
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }
            let (key, value) = line
                .split_once(':')
                .ok_or_else(|| StreamError::InvalidHeader(format!("malformed line `{line}`")))?;
            let value = value.trim();
            match key {
                "FILE_VERSION" => version = Some(value.parse()?),
                "SPEC" => header.spec_name = value.to_owned(),
                "TYPE" => {
                    format = Some(StreamFormat::from_type_name(value).ok_or_else(|| {
                        StreamError::UnsupportedFormat(value.to_owned())
                    })?);
                }
                "CREATION_TIME" => header.creation_time = value.to_owned(),
                "TAG" => header.tag = value.to_owned(),
                "TOKEN_REMAP" => header.remap_blocks = parse_remap(value)?,
                _ => {
                    return Err(StreamError::InvalidHeader(format!(
                        "unknown attribute `{key}`"
                    )))
                }
            }
        }
        header.version = version.ok_or_else(|| invalid("missing FILE_VERSION"))?;
        header.format = format.ok_or_else(|| invalid("missing TYPE"))?;
        if bytes.len() < header.data_offset() {
            return Err(invalid("token remap blocks cut short"));
        }
        Ok(header)
    }
}

/// `TOKEN_REMAP: <lines> <blocks>`; returns the block count.
fn parse_remap(value: &str) -> Result<usize, StreamError> {
    let malformed = || StreamError::InvalidHeader(format!("malformed TOKEN_REMAP `{value}`"));
    let mut counts = value.split_whitespace().map(str::parse::<usize>);
    match (counts.next(), counts.next()) {
        (Some(Ok(_lines)), Some(Ok(blocks))) if blocks <= MAX_REMAP_BLOCKS => Ok(blocks),
        _ => Err(malformed()),
    }
}

/// Pad `buf` with comment lines to [`HEADER_END`] and close it with `%%\n`.
fn fill(buf: &mut Vec<u8>) {
    const NOTES: [&[u8]; 2] = [b"RECOMMENDED NOT TO EDIT!", b"FIXED HEADER SIZE UPTO 512-BYTES"];

    let mut n = 0;
    while HEADER_END - buf.len() >= FILLER_WIDTH {
        let mut line = [b'_'; FILLER_WIDTH];
        line[0] = b'#';
        line[FILLER_WIDTH - 1] = b'\n';
        if let Some(note) = NOTES.get(n) {
            line[16..16 + note.len()].copy_from_slice(note);
        }
        buf.extend_from_slice(&line);
        n += 1;
    }
    let rest = HEADER_END - buf.len();
    if rest > 0 {
        buf.resize(buf.len() + rest - 1, b' ');
        buf.push(b'\n');
    }
    buf.extend_from_slice(b"%%\n");
}

#[cfg(test)]
mod tests;
