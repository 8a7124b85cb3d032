//! Hash functions for the Bloom filter
//!
//! MurmurHash3 (x86, 32-bit) with Kirsch–Mitzenmacher double hashing:
//! the first hash seeds the second, and position `i` is `h1 + i * h2`.

use std::io::Cursor;

/// Hash an item with 32-bit MurmurHash3 under the given seed
pub fn hash32(item: &[u8], seed: u32) -> u32 {
    let mut cursor = Cursor::new(item);
    // Reading from an in-memory cursor cannot fail
    murmur3::murmur3_32(&mut cursor, seed).unwrap_or(0)
}

/// Compute k bit positions in `[0, m)` for an item
///
/// `h1 = hash32(item, 0)`, `h2 = hash32(item, h1)`, position `i` is
/// `(h1 + i * h2) mod m`. The sum is taken in 64 bits so it never wraps.
pub fn compute_hash_positions(item: &[u8], k: usize, m: usize) -> Vec<usize> {
    debug_assert!(m > 0, "filter size must be non-zero");

    let h1 = hash32(item, 0) as u64;
    let h2 = hash32(item, h1 as u32) as u64;
    let m = m as u64;

    (0..k as u64)
        .map(|i| (h1.wrapping_add(i.wrapping_mul(h2)) % m) as usize)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash32_deterministic() {
        let item = b"alice";

        assert_eq!(
            hash32(item, 0),
            hash32(item, 0),
            "Same input with same seed must produce same output"
        );
    }

    #[test]
    fn test_hash32_seed_changes_output() {
        let item = b"alice";

        assert_ne!(
            hash32(item, 0),
            hash32(item, 1),
            "Different seeds must produce different outputs"
        );
    }

    #[test]
    fn test_hash32_known_vectors() {
        // Reference values for MurmurHash3_x86_32
        assert_eq!(hash32(b"", 0), 0);
        assert_eq!(hash32(b"", 1), 0x514E_28B7);
        assert_eq!(hash32(b"hello", 0), 0x248B_FA47);
    }

    #[test]
    fn test_second_hash_seeded_by_first() {
        let item = b"newuser";
        let h1 = hash32(item, 0) as u64;
        let h2 = hash32(item, h1 as u32) as u64;

        let positions = compute_hash_positions(item, 3, 1_000_003);
        assert_eq!(positions[0], (h1 % 1_000_003) as usize);
        assert_eq!(positions[1], ((h1 + h2) % 1_000_003) as usize);
        assert_eq!(positions[2], ((h1 + 2 * h2) % 1_000_003) as usize);
    }

    #[test]
    fn test_positions_within_bounds() {
        let m = 800;
        let k = 6;

        let positions = compute_hash_positions(b"bounded", k, m);

        assert_eq!(positions.len(), k, "Should produce k positions");
        for pos in &positions {
            assert!(*pos < m, "Position {} should be < m={}", pos, m);
        }
    }

    #[test]
    fn test_hash_uniformity() {
        let m = 1000;
        let k = 7;
        let mut counts = vec![0usize; 10];

        for i in 0..1000 {
            let item = format!("user_{}", i);
            for pos in compute_hash_positions(item.as_bytes(), k, m) {
                counts[pos / 100] += 1;
            }
        }

        // Each bucket should hold roughly 1000*7/10 = 700 positions
        let expected = 700;
        for (i, count) in counts.iter().enumerate() {
            assert!(
                *count >= expected / 2 && *count <= expected * 3 / 2,
                "Bucket {} has {} entries, expected ~{}",
                i,
                count,
                expected
            );
        }
    }
}
