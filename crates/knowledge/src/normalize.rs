//! Text normalization applied to both sides of every comparison.

/// Lowercase `text` and drop every character that is not a letter, a digit,
/// or whitespace.
///
/// Idempotent: `normalize(&normalize(s)) == normalize(s)`.
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect()
}
