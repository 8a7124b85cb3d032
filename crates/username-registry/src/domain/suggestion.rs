//! Alternative-name suggestions for taken usernames
//!
//! Suggestions are hints, not reservations: nothing here checks the registry.

use rand::seq::SliceRandom;
use rand::Rng;

/// Words appended to the base name
pub const SUFFIX_WORDS: &[&str] = &[
    "dev", "hq", "online", "official", "io", "labs", "studio", "works", "real", "prime",
];

/// Words prepended to the base name
pub const PREFIX_WORDS: &[&str] = &[
    "the", "its", "hey", "just", "mr", "ms", "team", "iam", "super", "daily",
];

/// Largest numeric suffix
pub const MAX_NUMERIC_SUFFIX: u32 = 999;

/// Lowercased, alphanumeric-only form of a canonical name
pub fn suggestion_base(canonical: &str) -> String {
    canonical
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Produce one alternative for `canonical`
///
/// Builds three candidates (word suffix, word prefix, numeric suffix) and
/// returns one of them at random.
pub fn suggest<R: Rng>(canonical: &str, rng: &mut R) -> String {
    let base = suggestion_base(canonical);

    let suffix = SUFFIX_WORDS.choose(rng).copied().unwrap_or("dev");
    let prefix = PREFIX_WORDS.choose(rng).copied().unwrap_or("the");
    let number = rng.gen_range(1..=MAX_NUMERIC_SUFFIX);

    let mut candidates = vec![
        format!("{}{}", base, suffix),
        format!("{}{}", prefix, base),
        format!("{}{}", base, number),
    ];

    let pick = rng.gen_range(0..candidates.len());
    candidates.swap_remove(pick)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_base_strips_hyphens_and_lowercases() {
        assert_eq!(suggestion_base("John-Doe-42"), "johndoe42");
    }

    #[test]
    fn test_suggestion_differs_from_name() {
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..200 {
            let suggestion = suggest("newuser", &mut rng);
            assert!(!suggestion.is_empty());
            assert_ne!(suggestion, "newuser");
            assert!(suggestion.contains("newuser"), "base must be kept: {}", suggestion);
        }
    }

    #[test]
    fn test_suggestion_shapes() {
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..200 {
            let suggestion = suggest("Alice", &mut rng);
            let rest_after = suggestion.strip_prefix("alice");
            let rest_before = suggestion.strip_suffix("alice");

            let ok = match (rest_after, rest_before) {
                (Some(tail), _) if SUFFIX_WORDS.contains(&tail) => true,
                (Some(tail), _) => tail
                    .parse::<u32>()
                    .map(|n| (1..=MAX_NUMERIC_SUFFIX).contains(&n))
                    .unwrap_or(false),
                (None, Some(head)) => PREFIX_WORDS.contains(&head),
                (None, None) => false,
            };
            assert!(ok, "unexpected suggestion shape: {}", suggestion);
        }
    }

    #[test]
    fn test_all_strategies_are_used() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut prefixed = false;
        let mut numbered = false;
        let mut suffixed = false;

        for _ in 0..300 {
            let s = suggest("bob", &mut rng);
            if !s.starts_with("bob") {
                prefixed = true;
            } else if s[3..].chars().all(|c| c.is_ascii_digit()) {
                numbered = true;
            } else {
                suffixed = true;
            }
        }

        assert!(prefixed && numbered && suffixed);
    }
}
