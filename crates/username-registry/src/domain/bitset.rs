//! Fixed-size packed bit array
//!
//! Storage is `ceil(size_bits / 8)` bytes, least significant bit first within
//! each byte. That byte layout is what lands on disk after the generation
//! header.

use bitvec::prelude::*;

use crate::error::CodecError;

/// A fixed-size packed bit array
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BitSet {
    bits: BitVec<u8, Lsb0>,
}

/// Number of bytes needed to hold `size_bits` bits
pub fn byte_len(size_bits: usize) -> usize {
    size_bits.div_ceil(8)
}

impl BitSet {
    /// Create an all-zero bit set of `size_bits` bits
    pub fn new(size_bits: usize) -> Self {
        Self {
            bits: bitvec![u8, Lsb0; 0; size_bits],
        }
    }

    /// Rebuild a bit set from its packed bytes
    ///
    /// `bytes` must be exactly `ceil(size_bits / 8)` long. Padding bits past
    /// `size_bits` in the final byte are cleared.
    pub fn from_bytes(size_bits: usize, bytes: &[u8]) -> Result<Self, CodecError> {
        let expected = byte_len(size_bits);
        if bytes.len() != expected {
            return Err(CodecError::InvalidHeader(format!(
                "bit storage for {} bits must be {} bytes, got {}",
                size_bits,
                expected,
                bytes.len()
            )));
        }

        let mut bits = BitVec::<u8, Lsb0>::from_slice(bytes);
        bits.truncate(size_bits);
        bits.set_uninitialized(false);
        Ok(Self { bits })
    }

    /// Set the bit at `index`
    ///
    /// # Panics
    /// Panics if `index >= size_bits`.
    pub fn set(&mut self, index: usize) {
        self.bits.set(index, true);
    }

    /// Check whether the bit at `index` is set
    ///
    /// # Panics
    /// Panics if `index >= size_bits`.
    pub fn get(&self, index: usize) -> bool {
        self.bits[index]
    }

    pub fn size_bits(&self) -> usize {
        self.bits.len()
    }

    /// Number of `1` bits
    pub fn count_ones(&self) -> usize {
        self.bits.count_ones()
    }

    /// Packed storage, `ceil(size_bits / 8)` bytes
    pub fn as_bytes(&self) -> &[u8] {
        self.bits.as_raw_slice()
    }
}
