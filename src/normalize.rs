//! Canonical form of free-text player names.

/// Lowercases, trims and collapses runs of whitespace into a single space.
///
/// Two names are the same player name iff their canonical forms are equal.
pub fn name(raw: &str) -> String {
    raw.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}
