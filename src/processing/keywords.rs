//! Keyword assembly for extracted report text.

use crate::extraction::ExtractedFragment;

/// Separator placed between keywords in the assembled list.
pub const KEYWORD_SEPARATOR: &str = ", ";

/// Join the trimmed, non-empty fragments in their original order.
///
/// No deduplication, case folding, or length cap is applied; every surviving fragment is
/// forwarded verbatim.
pub fn assemble_keywords(fragments: &[ExtractedFragment]) -> String {
    fragments
        .iter()
        .map(|fragment| fragment.text.trim())
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(KEYWORD_SEPARATOR)
}
