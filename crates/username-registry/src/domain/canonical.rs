//! Username canonicalization
//!
//! Canonical form: trimmed, whitespace runs replaced by a single hyphen, only
//! `[A-Za-z0-9-]` kept. The result must be non-empty, free of `--`, and must
//! not start or end with a hyphen. A length cap applies only when configured.

use std::fmt;

/// Why a raw name has no valid canonical form
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RejectReason {
    /// Nothing left after trimming and stripping
    Empty,
    /// Contains `--`
    DoubleHyphen,
    /// Starts or ends with `-`
    EdgeHyphen,
    /// Longer than a configured maximum
    TooLong { length: usize, max: usize },
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::Empty => write!(f, "username must contain letters or digits"),
            RejectReason::DoubleHyphen => {
                write!(f, "username cannot contain consecutive hyphens")
            }
            RejectReason::EdgeHyphen => {
                write!(f, "username cannot start or end with a hyphen")
            }
            RejectReason::TooLong { length, max } => {
                write!(f, "username is {} characters, maximum is {}", length, max)
            }
        }
    }
}

/// Outcome of canonicalizing a raw username
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Canonicalization {
    Canonicalized(String),
    Rejected(RejectReason),
}

impl Canonicalization {
    /// Whether canonicalization produced exactly `raw`
    pub fn is_identity_of(&self, raw: &str) -> bool {
        matches!(self, Canonicalization::Canonicalized(name) if name == raw)
    }
}

/// Canonicalize a raw username
///
/// ```ignore
/// assert_eq!(
///     canonicalize("  John   Doe!! ", None),
///     Canonicalization::Canonicalized("John-Doe".into())
/// );
/// ```
pub fn canonicalize(raw: &str, max_length: Option<usize>) -> Canonicalization {
    let mut name = String::with_capacity(raw.len());
    let mut in_whitespace = false;

    for c in raw.trim().chars() {
        if c.is_whitespace() {
            in_whitespace = true;
            continue;
        }
        if in_whitespace {
            name.push('-');
            in_whitespace = false;
        }
        if c.is_ascii_alphanumeric() || c == '-' {
            name.push(c);
        }
    }

    if name.is_empty() {
        return Canonicalization::Rejected(RejectReason::Empty);
    }
    if name.starts_with('-') || name.ends_with('-') {
        return Canonicalization::Rejected(RejectReason::EdgeHyphen);
    }
    if name.contains("--") {
        return Canonicalization::Rejected(RejectReason::DoubleHyphen);
    }
    // Canonical names are pure ASCII, so bytes == characters
    if let Some(max) = max_length.filter(|&max| name.len() > max) {
        return Canonicalization::Rejected(RejectReason::TooLong {
            length: name.len(),
            max,
        });
    }

    Canonicalization::Canonicalized(name)
}

/// Key used for membership and cache operations
pub fn registry_key(canonical: &str) -> String {
    canonical.to_ascii_lowercase()
}
