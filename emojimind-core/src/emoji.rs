use unicode_segmentation::UnicodeSegmentation;

use emojimind_types::{Difficulty, ValidationError};

/// Validate a submitted guess string and return it with whitespace removed.
///
/// The input must consist entirely of emoji glyphs after whitespace
/// stripping, and its scalar-value count may not exceed twice the tier's
/// emoji limit. The length bound counts scalar values, not glyphs, so a
/// variation-selector emoji like ☀️ costs two.
pub fn validate_emoji_input(raw: &str, tier: Difficulty) -> Result<String, ValidationError> {
    let cleaned: String = raw.chars().filter(|c| !c.is_whitespace()).collect();

    if cleaned.is_empty() || !is_emoji_only(&cleaned) {
        return Err(ValidationError::NotEmoji);
    }

    let limit = tier.emoji_limit();
    if cleaned.chars().count() > limit * 2 {
        return Err(ValidationError::TooManyEmojis { limit });
    }

    Ok(cleaned)
}

/// Whether every grapheme cluster in `input` is an emoji, including
/// multi-codepoint sequences with modifiers, joiners, and variation
/// selectors.
pub fn is_emoji_only(input: &str) -> bool {
    if input.is_empty() {
        return false;
    }

    input.graphemes(true).all(|grapheme| {
        // The emoji database knows complete sequences (families, flags,
        // skin tones); fall back to block ranges for anything it misses.
        emojis::get(grapheme).is_some() || grapheme.chars().all(is_emoji_scalar)
    })
}

// Emoji-adjacent Unicode blocks: symbols, pictographs, modifiers, and the
// joiners/selectors that stitch sequences together.
fn is_emoji_scalar(c: char) -> bool {
    matches!(
        u32::from(c),
        0x00a9 | 0x00ae                     // copyright, registered
        | 0x200d                            // zero width joiner
        | 0x203c | 0x2049                   // !! and !?
        | 0x2122 | 0x2139                   // trade mark, information
        | 0x2194..=0x2199 | 0x21a9..=0x21aa // arrows
        | 0x231a..=0x231b | 0x2328 | 0x2388 | 0x23cf
        | 0x23e9..=0x23f3 | 0x23f8..=0x23fa // media controls
        | 0x24c2
        | 0x25aa..=0x25ab | 0x25b6 | 0x25c0 | 0x25fb..=0x25fe
        | 0x2600..=0x27ff                   // misc symbols and dingbats
        | 0x3030 | 0x303d
        | 0x3297 | 0x3299
        | 0xfe0e..=0xfe0f                   // variation selectors
        | 0x1f000..=0x1f02f                 // mahjong tiles
        | 0x1f030..=0x1f093                 // domino tiles
        | 0x1f0a0..=0x1f0f5                 // playing cards
        | 0x1f100..=0x1f1ff                 // enclosed alphanumerics, flags
        | 0x1f200..=0x1f2ff
        | 0x1f300..=0x1f5ff                 // pictographs, skin tones
        | 0x1f600..=0x1f64f                 // emoticons
        | 0x1f680..=0x1f6ff                 // transport and map
        | 0x1f700..=0x1f77f
        | 0x1f780..=0x1f7ff
        | 0x1f800..=0x1f8ff
        | 0x1f900..=0x1f9ff
        | 0x1fa00..=0x1fa6f
        | 0x1fa70..=0x1faff
    )
}
