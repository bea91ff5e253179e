//! Byte order of binary streams.
//!
//! Every scalar field of a binary packet goes through [`WireFormat`] with
//! an explicit [`ByteOrder`], so each field is converted exactly once.
//! Lexeme bytes are never reordered.

use crate::StreamError;

/// Byte order of the scalar fields in a binary stream.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ByteOrder {
    Little,
    Big,
}

impl ByteOrder {
    /// Byte order of the running machine.
    pub const fn host() -> Self {
        if cfg!(target_endian = "big") {
            ByteOrder::Big
        } else {
            ByteOrder::Little
        }
    }

    pub fn put_i32(self, value: i32, out: &mut Vec<u8>) {
        let bytes = match self {
            ByteOrder::Little => value.to_le_bytes(),
            ByteOrder::Big => value.to_be_bytes(),
        };
        out.extend_from_slice(&bytes);
    }

    pub fn get_i32(self, bytes: [u8; 4]) -> i32 {
        match self {
            ByteOrder::Little => i32::from_le_bytes(bytes),
            ByteOrder::Big => i32::from_be_bytes(bytes),
        }
    }
}

/// A value with a fixed binary encoding.
pub trait WireFormat: Sized {
    /// Append the encoding of `self` to `out`.
    fn encode(&self, order: ByteOrder, out: &mut Vec<u8>);

    /// Decode one value from the start of `input`, returning it with the
    /// number of bytes it took. `offset` is the position of `input` in
    /// the stream, for error reports.
    fn decode(order: ByteOrder, input: &[u8], offset: usize) -> Result<(Self, usize), StreamError>;
}

/// Read an `i32` at `at`, or fail with `reason`.
pub(crate) fn read_i32(
    order: ByteOrder,
    input: &[u8],
    at: usize,
    offset: usize,
    reason: &'static str,
) -> Result<i32, StreamError> {
    input
        .get(at..at + 4)
        .and_then(|b| <[u8; 4]>::try_from(b).ok())
        .map(|b| order.get_i32(b))
        .ok_or(StreamError::MalformedRecord {
            offset: offset + at,
            reason,
        })
}

#[cfg(test)]
mod tests;
