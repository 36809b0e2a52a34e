//! Byte-consumption cursor shared by the wire decoders

use crate::{Error, Result};

/// Forward-only view over an input buffer.
///
/// Every sub-decoder advances the cursor by exactly the bytes it consumed,
/// so the caller can continue parsing the remaining stream.
pub(crate) struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    pub fn remaining(&self) -> &'a [u8] {
        &self.bytes[self.pos..]
    }

    pub fn is_empty(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    /// Advance past bytes a slice-based decoder already consumed.
    pub fn advance(&mut self, n: usize) {
        debug_assert!(self.pos + n <= self.bytes.len());
        self.pos += n;
    }

    pub fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.bytes.len() - self.pos < n {
            return Err(Error::UnexpectedEndOfInput);
        }
        let out = &self.bytes[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    pub fn take_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn take_u32_be(&mut self) -> Result<u32> {
        let b = self.take(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }
}
