use std::collections::HashMap;

use crate::types::WordId;
use crate::vocabulary::Vocabulary;

/// Structure tracking the number of occurrences of each glyph at a single cell among a
/// variable's remaining options.
pub type GlyphCounts = HashMap<char, usize>;

/// Count the glyphs appearing at `cell_idx` across the given options.
#[must_use]
pub fn build_glyph_counts(
    vocabulary: &Vocabulary,
    options: &[WordId],
    cell_idx: usize,
) -> GlyphCounts {
    let mut result = GlyphCounts::with_capacity(32);

    for glyph in options
        .iter()
        .filter_map(|&word_id| vocabulary.char_at(word_id, cell_idx))
    {
        *result.entry(glyph).or_insert(0) += 1;
    }

    result
}
