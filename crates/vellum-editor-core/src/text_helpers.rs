//! Text scanning helpers for command execution.

use crate::surface::{Block, Inline};

/// Stand-in for an inline image in character scans.
pub const OBJECT_REPLACEMENT: char = '\u{FFFC}';

/// Characters of a block in surface coordinates, images as
/// [`OBJECT_REPLACEMENT`].
pub fn block_chars(block: &Block) -> Vec<char> {
    let mut chars = Vec::with_capacity(block.char_len());
    for inline in &block.inlines {
        match inline {
            Inline::Text(run) => chars.extend(run.text.chars()),
            Inline::Image(_) => chars.push(OBJECT_REPLACEMENT),
        }
    }
    chars
}

/// Word boundaries around an offset within a block.
///
/// Expands to whitespace boundaries; images also act as boundaries so a
/// word never swallows an adjacent image. Used when applying inline
/// formatting without a selection. Returns an empty range when the offset
/// touches no word.
pub fn word_range(block: &Block, offset: usize) -> (usize, usize) {
    let chars = block_chars(block);
    let offset = offset.min(chars.len());
    let is_boundary = |c: char| c.is_whitespace() || c == OBJECT_REPLACEMENT;

    let mut start = offset;
    while start > 0 && !is_boundary(chars[start - 1]) {
        start -= 1;
    }
    let mut end = offset;
    while end < chars.len() && !is_boundary(chars[end]) {
        end += 1;
    }
    (start, end)
}
