//! Command execution against any surface.
//!
//! `execute_command` is the central dispatch point for all editor
//! operations. The logic is generic over the `Surface` trait, so it runs
//! unchanged against the in-memory surface or a host-provided one.
//!
//! Every command resolves the current selection first (falling back to the
//! end of content), mutates the surface at that location, and re-derives
//! the selection. Commands either succeed or are a no-op; there is no
//! partial-failure state. Serialization and change notification happen in
//! the layer above, unconditionally.

use smol_str::SmolStr;

use crate::commands::{BlockTag, Command, ImageAttrs};
use crate::image::IMAGE_STYLE;
use crate::surface::{Block, ImageNode, Inline, Surface, TextRun};
use crate::text_helpers::word_range;
use crate::types::{
    Alignment, BlockKind, InlineStyle, ListKind, SelectionDescriptor, SurfacePoint,
};

/// Execute an editor command on a surface.
///
/// Returns true if the surface was modified.
pub fn execute_command<S: Surface + ?Sized>(surface: &mut S, command: &Command) -> bool {
    tracing::trace!(command = command.name(), "execute");
    match command {
        Command::Bold => execute_inline_toggle(surface, StyleFlag::Bold),
        Command::Italic => execute_inline_toggle(surface, StyleFlag::Italic),
        Command::Underline => execute_inline_toggle(surface, StyleFlag::Underline),
        Command::Strikethrough => execute_inline_toggle(surface, StyleFlag::Strikethrough),
        Command::FormatBlock(tag) => execute_format_block(surface, *tag),
        Command::InsertUnorderedList => execute_list_toggle(surface, ListKind::Unordered),
        Command::InsertOrderedList => execute_list_toggle(surface, ListKind::Ordered),
        Command::Align(alignment) => execute_align(surface, *alignment),
        Command::CreateLink(url) => execute_create_link(surface, url),
        Command::InsertImage(attrs) => execute_insert_image(surface, attrs),
    }
}

/// Which inline flag a toggle command targets.
#[derive(Clone, Copy, Debug)]
enum StyleFlag {
    Bold,
    Italic,
    Underline,
    Strikethrough,
}

impl StyleFlag {
    fn get(&self, style: &InlineStyle) -> bool {
        match self {
            Self::Bold => style.bold,
            Self::Italic => style.italic,
            Self::Underline => style.underline,
            Self::Strikethrough => style.strikethrough,
        }
    }

    fn set(&self, style: &mut InlineStyle, value: bool) {
        match self {
            Self::Bold => style.bold = value,
            Self::Italic => style.italic = value,
            Self::Underline => style.underline = value,
            Self::Strikethrough => style.strikethrough = value,
        }
    }
}

/// Per-block local ranges covered by a document-ordered selection:
/// `(block index, local start, local end)`.
fn block_ranges<S: Surface + ?Sized>(
    surface: &S,
    sel: &SelectionDescriptor,
) -> Vec<(usize, usize, usize)> {
    let blocks = surface.blocks();
    if blocks.is_empty() {
        return Vec::new();
    }
    let start = sel.start();
    let end = sel.end();
    let first = start.block.min(blocks.len() - 1);
    let last = end.block.min(blocks.len() - 1);
    let mut out = Vec::with_capacity(last - first + 1);
    for idx in first..=last {
        let len = blocks[idx].char_len();
        let local_start = if idx == first { start.offset.min(len) } else { 0 };
        let local_end = if idx == last { end.offset.min(len) } else { len };
        out.push((idx, local_start, local_end));
    }
    out
}

/// Whether every text character in the selection carries the flag.
/// A selection with no text characters is never "fully styled".
fn range_fully_styled<S: Surface + ?Sized>(
    surface: &S,
    sel: &SelectionDescriptor,
    flag: StyleFlag,
) -> bool {
    let mut saw_text = false;
    for (idx, local_start, local_end) in block_ranges(surface, sel) {
        let mut consumed = 0;
        for inline in &surface.blocks()[idx].inlines {
            let len = inline.char_len();
            if let Inline::Text(run) = inline {
                let overlaps = consumed < local_end && consumed + len > local_start;
                if overlaps && len > 0 {
                    saw_text = true;
                    if !flag.get(&run.style) {
                        return false;
                    }
                }
            }
            consumed += len;
        }
    }
    saw_text
}

/// Set the flag on every text run in the selection.
fn apply_style<S: Surface + ?Sized>(
    surface: &mut S,
    sel: &SelectionDescriptor,
    flag: StyleFlag,
    value: bool,
) -> bool {
    let mut changed = false;
    for (idx, local_start, local_end) in block_ranges(surface, sel) {
        let block = &mut surface.blocks_mut()[idx];
        let from = block.seam_at(local_start);
        let to = block.seam_at(local_end).max(from);
        for inline in &mut block.inlines[from..to] {
            if let Inline::Text(run) = inline {
                if flag.get(&run.style) != value {
                    flag.set(&mut run.style, value);
                    changed = true;
                }
            }
        }
        block.normalize();
    }
    changed
}

fn execute_inline_toggle<S: Surface + ?Sized>(surface: &mut S, flag: StyleFlag) -> bool {
    let sel = surface.selection_or_end();
    let (range, keep) = if sel.is_collapsed() {
        if surface.is_empty() {
            return false;
        }
        // No selection: expand to the word around the caret.
        let caret = sel.head;
        let (word_start, word_end) = word_range(&surface.blocks()[caret.block], caret.offset);
        if word_start == word_end {
            return false;
        }
        (
            SelectionDescriptor::new(
                SurfacePoint::new(caret.block, word_start),
                SurfacePoint::new(caret.block, word_end),
            ),
            sel,
        )
    } else {
        (sel, sel)
    };

    // Toggle semantics: if the whole range already carries the style,
    // remove it; otherwise apply it. Two applications over the same
    // selection cancel out.
    let value = !range_fully_styled(surface, &range, flag);
    let changed = apply_style(surface, &range, flag, value);
    surface.restore(keep);
    changed
}

fn execute_format_block<S: Surface + ?Sized>(surface: &mut S, tag: BlockTag) -> bool {
    let kind = tag.kind();
    if surface.is_empty() {
        // Create the block so subsequent typing lands in it.
        surface.blocks_mut().push(Block::new(kind));
        surface.set_selection(Some(SelectionDescriptor::caret(SurfacePoint::new(0, 0))));
        return true;
    }
    let sel = surface.selection_or_end();
    let mut changed = false;
    let first = sel.start().block;
    let last = sel.end().block;
    {
        let blocks = surface.blocks_mut();
        let last = last.min(blocks.len() - 1);
        for block in &mut blocks[first.min(last)..=last] {
            if block.kind != kind {
                block.kind = kind;
                changed = true;
            }
        }
    }
    surface.restore(sel);
    changed
}

fn execute_list_toggle<S: Surface + ?Sized>(surface: &mut S, list: ListKind) -> bool {
    let target = BlockKind::ListItem(list);
    if surface.is_empty() {
        surface.blocks_mut().push(Block::new(target));
        surface.set_selection(Some(SelectionDescriptor::caret(SurfacePoint::new(0, 0))));
        return true;
    }
    let sel = surface.selection_or_end();
    let first = sel.start().block;
    let last = sel.end().block.min(surface.blocks().len() - 1);
    let first = first.min(last);

    // Toggling the same list kind again unwraps back to paragraphs.
    let all_items = surface.blocks()[first..=last]
        .iter()
        .all(|block| block.kind == target);
    let new_kind = if all_items {
        BlockKind::Paragraph
    } else {
        target
    };

    let mut changed = false;
    for block in &mut surface.blocks_mut()[first..=last] {
        if block.kind != new_kind {
            block.kind = new_kind;
            changed = true;
        }
    }
    surface.restore(sel);
    changed
}

fn execute_align<S: Surface + ?Sized>(surface: &mut S, alignment: Alignment) -> bool {
    if surface.is_empty() {
        if alignment == Alignment::Left {
            return false;
        }
        let mut block = Block::new(BlockKind::Paragraph);
        block.align = alignment;
        surface.blocks_mut().push(block);
        surface.set_selection(Some(SelectionDescriptor::caret(SurfacePoint::new(0, 0))));
        return true;
    }
    let sel = surface.selection_or_end();
    let first = sel.start().block;
    let last = sel.end().block.min(surface.blocks().len() - 1);
    let mut changed = false;
    for block in &mut surface.blocks_mut()[first.min(last)..=last] {
        if block.align != alignment {
            block.align = alignment;
            changed = true;
        }
    }
    surface.restore(sel);
    changed
}

fn execute_create_link<S: Surface + ?Sized>(surface: &mut S, url: &str) -> bool {
    if url.is_empty() {
        // Never insert an empty anchor.
        return false;
    }
    let sel = surface.selection_or_end();
    if sel.is_collapsed() {
        // Collapsed selection: the link text defaults to the URL itself.
        surface.insert_inline_at(sel.head, Inline::Text(TextRun::linked(url, url)));
        return true;
    }

    let href = SmolStr::new(url);
    let mut changed = false;
    for (idx, local_start, local_end) in block_ranges(surface, &sel) {
        let block = &mut surface.blocks_mut()[idx];
        let from = block.seam_at(local_start);
        let to = block.seam_at(local_end).max(from);
        for inline in &mut block.inlines[from..to] {
            if let Inline::Text(run) = inline {
                if run.link.as_ref() != Some(&href) {
                    run.link = Some(href.clone());
                    changed = true;
                }
            }
        }
        block.normalize();
    }
    surface.restore(sel);
    changed
}

fn execute_insert_image<S: Surface + ?Sized>(surface: &mut S, attrs: &ImageAttrs) -> bool {
    let sel = surface.selection_or_end();
    if !sel.is_collapsed() {
        surface.delete_range(sel.start(), sel.end());
    }
    // insert_inline_at collapses the selection to just after the node, so
    // repeated insertions land side by side instead of nesting.
    surface.insert_inline_at(
        sel.start(),
        Inline::Image(ImageNode {
            src: attrs.src.clone(),
            style: SmolStr::new(IMAGE_STYLE),
            alt: attrs.alt.clone(),
        }),
    );
    true
}

/// Formatting active at the current selection, for toolbar state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormatState {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikethrough: bool,
    /// Common block kind of the selection, `None` when mixed or the
    /// surface is empty.
    pub block: Option<BlockKind>,
    pub align: Alignment,
    /// Link target at the caret, if any.
    pub link: Option<SmolStr>,
}

/// Query the formatting active at the current selection.
pub fn query_format_state<S: Surface + ?Sized>(surface: &S) -> FormatState {
    if surface.is_empty() {
        return FormatState::default();
    }
    let sel = surface.selection_or_end();

    let (bold, italic, underline, strikethrough, link) = if sel.is_collapsed() {
        let caret = sel.head;
        let (style, link) = surface.blocks()[caret.block].inherited_format(caret.offset);
        (
            style.bold,
            style.italic,
            style.underline,
            style.strikethrough,
            link,
        )
    } else {
        // Link reported from the first selected character.
        let start = sel.start();
        let (_, link) =
            surface.blocks()[start.block].inherited_format(start.offset.saturating_add(1));
        (
            range_fully_styled(surface, &sel, StyleFlag::Bold),
            range_fully_styled(surface, &sel, StyleFlag::Italic),
            range_fully_styled(surface, &sel, StyleFlag::Underline),
            range_fully_styled(surface, &sel, StyleFlag::Strikethrough),
            link,
        )
    };

    let first = sel.start().block;
    let last = sel.end().block.min(surface.blocks().len() - 1);
    let first_kind = surface.blocks()[first.min(last)].kind;
    let block = if surface.blocks()[first.min(last)..=last]
        .iter()
        .all(|b| b.kind == first_kind)
    {
        Some(first_kind)
    } else {
        None
    };

    FormatState {
        bold,
        italic,
        underline,
        strikethrough,
        block,
        align: surface.blocks()[first.min(last)].align,
        link,
    }
}
