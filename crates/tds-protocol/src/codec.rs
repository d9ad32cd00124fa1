//! Codec utilities for TDS protocol encoding and decoding.
//!
//! [`ByteReader`] is the bounds-checked cursor every handshake decoder reads
//! through. It never performs I/O: the transport fills the buffer first and
//! hands it over whole.

use bytes::{Buf, Bytes};

use crate::error::ProtocolError;
use crate::prelude::*;

/// Sequential, bounds-checked reader over an already-received buffer.
///
/// Every read either consumes exactly the requested number of bytes or
/// fails with [`ProtocolError::Truncated`] and leaves the cursor where it
/// was. There is no way to move backwards.
#[derive(Debug, Clone)]
pub struct ByteReader {
    buf: Bytes,
    position: usize,
}

impl ByteReader {
    /// Create a reader positioned at the start of `buf`.
    #[must_use]
    pub fn new(buf: impl Into<Bytes>) -> Self {
        Self {
            buf: buf.into(),
            position: 0,
        }
    }

    /// Number of unread bytes.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.buf.remaining()
    }

    /// Returns true when every byte has been consumed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.buf.has_remaining()
    }

    /// Offset of the cursor from the start of the original buffer.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    fn ensure(&self, needed: usize) -> Result<(), ProtocolError> {
        let remaining = self.buf.remaining();
        if remaining < needed {
            return Err(ProtocolError::Truncated { needed, remaining });
        }
        Ok(())
    }

    /// Read a single byte.
    pub fn read_u8(&mut self) -> Result<u8, ProtocolError> {
        self.ensure(1)?;
        self.position += 1;
        Ok(self.buf.get_u8())
    }

    /// Read a little-endian `u16`.
    pub fn read_u16_le(&mut self) -> Result<u16, ProtocolError> {
        self.ensure(2)?;
        self.position += 2;
        Ok(self.buf.get_u16_le())
    }

    /// Read a little-endian `u32`.
    pub fn read_u32_le(&mut self) -> Result<u32, ProtocolError> {
        self.ensure(4)?;
        self.position += 4;
        Ok(self.buf.get_u32_le())
    }

    /// Read exactly `n` bytes without copying.
    pub fn read_bytes(&mut self, n: usize) -> Result<Bytes, ProtocolError> {
        self.ensure(n)?;
        self.position += n;
        Ok(self.buf.split_to(n))
    }

    /// Read a B_VARCHAR: 1-byte character count followed by UTF-16LE text.
    pub fn read_b_varchar(&mut self) -> Result<String, ProtocolError> {
        self.ensure(1)?;
        let char_count = self.buf[0] as usize;
        // Check the whole string is present before consuming the prefix.
        self.ensure(1 + char_count * 2)?;
        self.read_u8()?;
        let data = self.read_bytes(char_count * 2)?;
        decode_utf16_le(&data)
    }
}

/// Decode UTF-16LE bytes into a `String`.
pub fn decode_utf16_le(data: &[u8]) -> Result<String, ProtocolError> {
    if data.len() % 2 != 0 {
        return Err(ProtocolError::InvalidString);
    }
    let units: Vec<u16> = data
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    String::from_utf16(&units).map_err(|_| ProtocolError::InvalidString)
}
