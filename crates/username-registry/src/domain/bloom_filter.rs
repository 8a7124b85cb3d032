//! Core Bloom Filter implementation (one generation)
//!
//! INVARIANTS:
//! - No false negatives: once added, `contains()` MUST return true
//! - `m` and `k` are fixed at construction, `n` only grows
//!
//! ## Binary format
//!
//! ```text
//! u32 m (BE) | u32 k (BE) | u32 n (BE) | ceil(m/8) bytes of packed bits
//! ```

use super::bitset::{byte_len, BitSet};
use super::hash_functions::compute_hash_positions;
use super::parameters::{calculate_fpr, calculate_optimal_parameters};
use crate::error::{CodecError, RegistryError};

/// Size of the generation header in bytes
pub const HEADER_LEN: usize = 12;

/// Bloom filter for probabilistic membership testing
///
/// False positives are possible, false negatives are not.
#[derive(Clone, Debug, PartialEq)]
pub struct BloomFilter {
    /// Bit array storing the filter state
    bits: BitSet,
    /// Number of hash functions (k)
    k: usize,
    /// Size in bits (m)
    m: usize,
    /// Number of items inserted (n)
    n: usize,
}

impl BloomFilter {
    /// Create an empty filter with `m` bits and `k` hash functions
    ///
    /// Both must be non-zero and `m` must fit the on-disk `u32` header.
    pub fn new(m: usize, k: usize) -> Result<Self, RegistryError> {
        if m == 0 || k == 0 {
            return Err(RegistryError::InvalidParameters(format!(
                "m and k must be non-zero (m={}, k={})",
                m, k
            )));
        }
        if u32::try_from(m).is_err() || u32::try_from(k).is_err() {
            return Err(RegistryError::InvalidParameters(format!(
                "m={} or k={} exceeds the u32 header range",
                m, k
            )));
        }

        Ok(Self {
            bits: BitSet::new(m),
            k,
            m,
            n: 0,
        })
    }

    /// Create an empty filter sized for `expected_items` at `target_fpr`
    pub fn with_capacity(expected_items: usize, target_fpr: f64) -> Result<Self, RegistryError> {
        let params = calculate_optimal_parameters(expected_items, target_fpr);
        Self::new(params.size_bits, params.hash_count)
    }

    /// Add an item to the filter
    ///
    /// Setting an already-set bit is a no-op; the insert count still grows.
    pub fn add(&mut self, item: &[u8]) {
        for pos in compute_hash_positions(item, self.k, self.m) {
            self.bits.set(pos);
        }
        self.n = self.n.saturating_add(1);
    }

    /// Test if an item might be in the filter
    ///
    /// Returns:
    /// - `true` if the item might be in the set (could be false positive)
    /// - `false` if the item is definitely NOT in the set
    pub fn contains(&self, item: &[u8]) -> bool {
        compute_hash_positions(item, self.k, self.m)
            .into_iter()
            .all(|pos| self.bits.get(pos))
    }

    /// Estimated false positive rate
    ///
    /// Formula: FPR = (1 - e^(-kn/m))^k
    pub fn estimate_false_positive_rate(&self) -> f64 {
        calculate_fpr(self.m, self.n, self.k)
    }

    /// Number of bits set
    pub fn bits_set(&self) -> usize {
        self.bits.count_ones()
    }

    /// Fraction of bits set, in `[0, 1]`
    pub fn fill_ratio(&self) -> f64 {
        self.bits_set() as f64 / self.m as f64
    }

    pub fn size_bits(&self) -> usize {
        self.m
    }

    pub fn hash_count(&self) -> usize {
        self.k
    }

    pub fn inserted_count(&self) -> usize {
        self.n
    }

    /// Length of the serialized form in bytes
    pub fn encoded_len(&self) -> usize {
        HEADER_LEN + byte_len(self.m)
    }

    /// Append the serialized form to `out`
    pub fn encode_into(&self, out: &mut Vec<u8>) {
        // m and k are range-checked at construction; n saturates at the header limit
        let n = u32::try_from(self.n).unwrap_or(u32::MAX);
        out.reserve(self.encoded_len());
        out.extend_from_slice(&(self.m as u32).to_be_bytes());
        out.extend_from_slice(&(self.k as u32).to_be_bytes());
        out.extend_from_slice(&n.to_be_bytes());
        out.extend_from_slice(self.bits.as_bytes());
    }

    /// Serialize the filter to bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        self.encode_into(&mut out);
        out
    }

    /// Decode one generation from the front of `bytes`
    ///
    /// Returns the filter and the number of bytes consumed. `offset` is only
    /// used to make errors point at the right place in a larger stream.
    pub fn decode(bytes: &[u8], offset: usize) -> Result<(Self, usize), CodecError> {
        if bytes.len() < HEADER_LEN {
            return Err(CodecError::TruncatedHeader {
                offset,
                available: bytes.len(),
            });
        }

        let m = read_u32(bytes, 0) as usize;
        let k = read_u32(bytes, 4) as usize;
        let n = read_u32(bytes, 8) as usize;

        if m == 0 {
            return Err(CodecError::InvalidHeader(format!(
                "generation at offset {} has m=0",
                offset
            )));
        }
        if k == 0 {
            return Err(CodecError::InvalidHeader(format!(
                "generation at offset {} has k=0",
                offset
            )));
        }

        let body_len = byte_len(m);
        let body = &bytes[HEADER_LEN..];
        if body.len() < body_len {
            return Err(CodecError::TruncatedBody {
                offset: offset + HEADER_LEN,
                expected: body_len,
                available: body.len(),
            });
        }

        let bits = BitSet::from_bytes(m, &body[..body_len])?;
        Ok((Self { bits, k, m, n }, HEADER_LEN + body_len))
    }

    /// Deserialize exactly one filter from bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        let (filter, consumed) = Self::decode(bytes, 0)?;
        if consumed != bytes.len() {
            return Err(CodecError::InvalidHeader(format!(
                "{} trailing bytes after generation",
                bytes.len() - consumed
            )));
        }
        Ok(filter)
    }
}

fn read_u32(bytes: &[u8], at: usize) -> u32 {
    let mut word = [0u8; 4];
    word.copy_from_slice(&bytes[at..at + 4]);
    u32::from_be_bytes(word)
}
