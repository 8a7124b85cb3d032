//! Optimal Bloom filter parameter calculation
//!
//! Formulas:
//! - m = -n*ln(fpr) / (ln(2)^2)  -- optimal bits
//! - k = (m/n) * ln(2)           -- optimal hash functions
//! - FPR = (1 - e^(-kn/m))^k

use std::f64::consts::LN_2;

/// Upper bound on hash functions per generation
pub const MAX_HASH_COUNT: usize = 32;

/// Bloom filter parameters
#[derive(Clone, Debug, PartialEq)]
pub struct BloomFilterParams {
    /// Number of bits in the filter
    pub size_bits: usize,
    /// Number of hash functions
    pub hash_count: usize,
    /// Expected false positive rate with these parameters
    pub expected_fpr: f64,
}

/// Calculate optimal Bloom filter parameters for given constraints
///
/// # Arguments
/// * `num_elements` - Expected number of elements to insert (n)
/// * `target_fpr` - Target false positive rate
pub fn calculate_optimal_parameters(num_elements: usize, target_fpr: f64) -> BloomFilterParams {
    if num_elements == 0 {
        return BloomFilterParams {
            size_bits: 1,
            hash_count: 1,
            expected_fpr: 1.0,
        };
    }

    let m = minimum_bits(num_elements, target_fpr).max(1);
    let k = optimal_k(m, num_elements as f64);
    let expected_fpr = calculate_fpr(m, num_elements, k);

    BloomFilterParams {
        size_bits: m,
        hash_count: k,
        expected_fpr,
    }
}

/// Calculate the false positive rate for given parameters
///
/// Formula: FPR = (1 - e^(-kn/m))^k
pub fn calculate_fpr(m: usize, n: usize, k: usize) -> f64 {
    if m == 0 {
        return 1.0;
    }
    let exponent = -(k as f64) * (n as f64) / (m as f64);
    (1.0 - exponent.exp()).powi(k as i32)
}

/// Calculate optimal k for m bits and an expected item count
///
/// Clamped to `[1, MAX_HASH_COUNT]`. The expected count is a float because
/// growth events scale it by a fractional factor.
pub fn optimal_k(m: usize, expected: f64) -> usize {
    if expected <= 0.0 {
        return 1;
    }
    let k = ((m as f64 / expected) * LN_2).round() as usize;
    k.clamp(1, MAX_HASH_COUNT)
}

/// Calculate minimum m for given n and target FPR
pub fn minimum_bits(n: usize, target_fpr: f64) -> usize {
    let ln2_squared = LN_2 * LN_2;
    (-(n as f64) * target_fpr.ln() / ln2_squared).ceil() as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optimal_parameters_n10000_fpr001() {
        // For n=10000, FPR=0.01 -> m=95851, k=7
        let params = calculate_optimal_parameters(10_000, 0.01);

        assert_eq!(params.size_bits, 95_851);
        assert_eq!(params.hash_count, 7);
    }

    #[test]
    fn test_optimal_parameters_n100_fpr001() {
        let params = calculate_optimal_parameters(100, 0.01);

        assert!(
            params.hash_count >= 5 && params.hash_count <= 9,
            "Expected k≈7, got k={}",
            params.hash_count
        );
        assert!(
            params.size_bits >= 800 && params.size_bits <= 1200,
            "Expected m≈959, got m={}",
            params.size_bits
        );
    }

    #[test]
    fn test_fpr_calculation() {
        // With m=1000, n=100, k=7, FPR should be around 0.008
        let fpr = calculate_fpr(1000, 100, 7);
        assert!(fpr > 0.005 && fpr < 0.02, "Expected FPR≈0.008, got {}", fpr);
    }

    #[test]
    fn test_fpr_of_empty_filter_is_zero() {
        assert_eq!(calculate_fpr(800, 0, 6), 0.0);
    }

    #[test]
    fn test_expected_fpr_meets_target() {
        let target_fpr = 0.01;
        let params = calculate_optimal_parameters(100, target_fpr);

        assert!(
            params.expected_fpr <= target_fpr * 1.1,
            "Expected FPR {} should be <= target {}",
            params.expected_fpr,
            target_fpr
        );
    }

    #[test]
    fn test_zero_elements() {
        let params = calculate_optimal_parameters(0, 0.01);
        assert_eq!(params.size_bits, 1);
        assert_eq!(params.hash_count, 1);
    }

    #[test]
    fn test_k_clamped_to_reasonable_range() {
        let params = calculate_optimal_parameters(10, 0.000_000_1);
        assert!(params.hash_count <= MAX_HASH_COUNT);
        assert!(params.hash_count >= 1);

        assert_eq!(optimal_k(10, 1_000_000.0), 1);
    }

    #[test]
    fn test_optimal_k_with_fractional_expected() {
        // 1600 bits for 1.5x of 40 items -> (1600/60)*ln2 ≈ 18.5
        assert_eq!(optimal_k(1600, 60.0), 18);
    }
}
