/*!
 * Punctuation normalization for caption text.
 *
 * Leading and trailing punctuation is removed; punctuation inside the caption
 * is replaced by a double space so the clauses it separated stay apart.
 */

/// ASCII punctuation plus the full-width and CJK marks
const PUNCTUATION: &str = ",.!?;:\"'()[]{}<>、，。！？；：“”‘’（）【】《》";

/// Replacement for punctuation inside a caption
const INTERIOR_REPLACEMENT: &str = "  ";

/// Punctuation normalizer for caption text
pub struct PunctuationNormalizer;

impl PunctuationNormalizer {
    /// Whether a character belongs to the fixed punctuation set
    pub fn is_punctuation(c: char) -> bool {
        PUNCTUATION.contains(c)
    }

    /// Normalize punctuation in a single caption line
    pub fn normalize(text: &str) -> String {
        let trimmed = text.trim_matches(Self::is_punctuation);
        if trimmed.is_empty() {
            return String::new();
        }

        let mut result = String::with_capacity(trimmed.len() + INTERIOR_REPLACEMENT.len());
        for c in trimmed.chars() {
            if Self::is_punctuation(c) {
                result.push_str(INTERIOR_REPLACEMENT);
            } else {
                result.push(c);
            }
        }

        result
    }
}
