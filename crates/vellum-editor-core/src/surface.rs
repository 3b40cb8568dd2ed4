//! The editing surface: block/run document structure and the `Surface` trait.
//!
//! Defines the `Surface` trait for abstracting the live editing surface,
//! allowing different backends (the in-memory `DocumentSurface` here, or a
//! host's native editing widget) while sharing the command logic.
//!
//! Coordinates are character offsets within a block's inline content; an
//! inline image occupies exactly one position.

use smol_str::SmolStr;

use crate::markup;
use crate::types::{Alignment, BlockKind, InlineStyle, SelectionDescriptor, SurfacePoint};

/// A maximal span of block text sharing one style and link target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextRun {
    pub text: String,
    pub style: InlineStyle,
    /// Link target when this run sits inside an anchor.
    pub link: Option<SmolStr>,
}

impl TextRun {
    pub fn new(text: impl Into<String>, style: InlineStyle) -> Self {
        Self {
            text: text.into(),
            style,
            link: None,
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, InlineStyle::PLAIN)
    }

    pub fn linked(text: impl Into<String>, href: impl Into<SmolStr>) -> Self {
        Self {
            text: text.into(),
            style: InlineStyle::PLAIN,
            link: Some(href.into()),
        }
    }

    /// Runs merge when both style and link target agree.
    fn joins(&self, other: &Self) -> bool {
        self.style == other.style && self.link == other.link
    }
}

/// An inline image node.
///
/// `src` is either an external URL or a `data:image/*;base64,...` URI; the
/// surface never holds a live blob handle, so the serialized document stays
/// portable on its own.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageNode {
    pub src: String,
    /// Layout constraint, e.g. `max-width: 100%; height: auto;`.
    pub style: SmolStr,
    pub alt: Option<String>,
}

/// One inline node of a block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Inline {
    Text(TextRun),
    Image(ImageNode),
}

impl Inline {
    /// Characters this node occupies in block coordinates.
    pub fn char_len(&self) -> usize {
        match self {
            Self::Text(run) => run.text.chars().count(),
            Self::Image(_) => 1,
        }
    }
}

/// A top-level block of the surface.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Block {
    pub kind: BlockKind,
    pub align: Alignment,
    pub inlines: Vec<Inline>,
}

impl Block {
    pub fn new(kind: BlockKind) -> Self {
        Self {
            kind,
            align: Alignment::Left,
            inlines: Vec::new(),
        }
    }

    pub fn with_inlines(kind: BlockKind, inlines: Vec<Inline>) -> Self {
        Self {
            kind,
            align: Alignment::Left,
            inlines,
        }
    }

    /// Content length in block coordinates.
    pub fn char_len(&self) -> usize {
        self.inlines.iter().map(Inline::char_len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.inlines.iter().all(|inline| inline.char_len() == 0)
    }

    /// Plain text of the block. Images contribute nothing.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for inline in &self.inlines {
            if let Inline::Text(run) = inline {
                out.push_str(&run.text);
            }
        }
        out
    }

    /// Merge adjacent runs with identical style/link and drop empty runs.
    ///
    /// Fragmented runs serialize to redundant adjacent tags, so every
    /// mutation normalizes before the next serialization.
    pub fn normalize(&mut self) {
        let mut normalized: Vec<Inline> = Vec::with_capacity(self.inlines.len());
        for inline in self.inlines.drain(..) {
            if let Inline::Text(run) = &inline {
                if run.text.is_empty() {
                    continue;
                }
                if let Some(Inline::Text(prev)) = normalized.last_mut() {
                    if prev.joins(run) {
                        prev.text.push_str(&run.text);
                        continue;
                    }
                }
            }
            normalized.push(inline);
        }
        self.inlines = normalized;
    }

    /// Ensure a node boundary at `offset`, splitting a text run if the
    /// offset falls inside one. Returns the inline index at which content
    /// from `offset` begins.
    pub(crate) fn seam_at(&mut self, offset: usize) -> usize {
        let mut consumed = 0;
        for idx in 0..self.inlines.len() {
            let len = self.inlines[idx].char_len();
            if offset <= consumed {
                return idx;
            }
            if offset < consumed + len {
                // Inside this node. Images are atomic, so only text splits.
                if let Inline::Text(run) = &mut self.inlines[idx] {
                    let split_chars = offset - consumed;
                    let byte_split = run
                        .text
                        .char_indices()
                        .nth(split_chars)
                        .map(|(b, _)| b)
                        .unwrap_or(run.text.len());
                    let tail_text = run.text.split_off(byte_split);
                    let tail = TextRun {
                        text: tail_text,
                        style: run.style,
                        link: run.link.clone(),
                    };
                    self.inlines.insert(idx + 1, Inline::Text(tail));
                }
                return idx + 1;
            }
            consumed += len;
        }
        self.inlines.len()
    }

    /// Remove content in `[start, end)` of block coordinates.
    pub(crate) fn remove_range(&mut self, start: usize, end: usize) {
        if start >= end {
            return;
        }
        let from = self.seam_at(start);
        let to = self.seam_at(end).max(from);
        self.inlines.drain(from..to);
        self.normalize();
    }

    /// Split off and return all content from `offset` to the end.
    pub(crate) fn split_inlines_at(&mut self, offset: usize) -> Vec<Inline> {
        let seam = self.seam_at(offset);
        self.inlines.split_off(seam)
    }

    /// Insert a node at `offset`.
    pub(crate) fn insert_inline(&mut self, offset: usize, inline: Inline) {
        let seam = self.seam_at(offset);
        self.inlines.insert(seam, inline);
        self.normalize();
    }

    /// Style and link target the caret would inherit when typing at
    /// `offset`: the run immediately before the caret, falling back to the
    /// run the caret precedes.
    pub(crate) fn inherited_format(&self, offset: usize) -> (InlineStyle, Option<SmolStr>) {
        let mut consumed = 0;
        let mut containing: Option<&TextRun> = None;
        let mut before: Option<&TextRun> = None;
        let mut after: Option<&TextRun> = None;
        for inline in &self.inlines {
            let len = inline.char_len();
            if let Inline::Text(run) = inline {
                if consumed + len <= offset {
                    // Run ends at or before the caret.
                    before = Some(run);
                } else if consumed < offset {
                    // Caret sits strictly inside this run.
                    containing = Some(run);
                } else if after.is_none() {
                    after = Some(run);
                }
            }
            consumed += len;
        }
        match containing.or(before).or(after) {
            Some(run) => (run.style, run.link.clone()),
            None => (InlineStyle::PLAIN, None),
        }
    }
}

/// Abstract capability the command executor is written against: resolve a
/// selection, mutate at it, serialize the result.
///
/// Required methods are storage accessors; everything else is provided, so
/// an implementation only decides where blocks and selection live.
pub trait Surface {
    /// Blocks of the surface, in document order.
    fn blocks(&self) -> &[Block];

    /// Mutable access to the block list.
    fn blocks_mut(&mut self) -> &mut Vec<Block>;

    /// Current selection, if the surface has one.
    fn selection(&self) -> Option<SelectionDescriptor>;

    /// Replace the current selection.
    fn set_selection(&mut self, selection: Option<SelectionDescriptor>);

    // === Provided: geometry ===

    /// Whether the surface has zero content nodes.
    fn is_empty(&self) -> bool {
        self.blocks().is_empty()
    }

    /// The position just past the last character of content.
    fn end_point(&self) -> SurfacePoint {
        match self.blocks().last() {
            Some(last) => SurfacePoint::new(self.blocks().len() - 1, last.char_len()),
            None => SurfacePoint::new(0, 0),
        }
    }

    /// Clamp a point to existing content. Points past the end of a block
    /// snap to the block end; block indices past the end snap to the
    /// end-of-content fallback.
    fn clamp_point(&self, point: SurfacePoint) -> SurfacePoint {
        let blocks = self.blocks();
        if blocks.is_empty() {
            return SurfacePoint::new(0, 0);
        }
        if point.block >= blocks.len() {
            return self.end_point();
        }
        let max = blocks[point.block].char_len();
        SurfacePoint::new(point.block, point.offset.min(max))
    }

    // === Provided: selection tracking ===

    /// Capture the current selection, if any.
    fn capture(&self) -> Option<SelectionDescriptor> {
        self.selection()
    }

    /// Re-establish a previously captured selection.
    ///
    /// Tolerates descriptors whose content was deleted or moved by a later
    /// command: both endpoints are clamped, degrading to end-of-content
    /// rather than failing.
    fn restore(&mut self, descriptor: SelectionDescriptor) {
        let anchor = self.clamp_point(descriptor.anchor);
        let head = self.clamp_point(descriptor.head);
        if anchor != descriptor.anchor || head != descriptor.head {
            tracing::debug!(
                ?descriptor,
                clamped_anchor = ?anchor,
                clamped_head = ?head,
                "selection referenced missing content, clamped"
            );
        }
        self.set_selection(Some(SelectionDescriptor::new(anchor, head)));
    }

    /// The selection a command targets: the current one, or a caret at the
    /// end of content when the surface has none.
    fn selection_or_end(&self) -> SelectionDescriptor {
        match self.selection() {
            Some(sel) => SelectionDescriptor::new(
                self.clamp_point(sel.anchor),
                self.clamp_point(sel.head),
            ),
            None => SelectionDescriptor::caret(self.end_point()),
        }
    }

    // === Provided: mutation ===

    /// Make sure at least one block exists, so insertions have a target.
    /// Returns the index of the last block.
    fn ensure_block(&mut self, kind: BlockKind) -> usize {
        if self.blocks().is_empty() {
            self.blocks_mut().push(Block::new(kind));
        }
        self.blocks().len() - 1
    }

    /// Delete `[start, end)` in document order, merging the boundary blocks
    /// when the range spans more than one. Collapses the selection to the
    /// start of the deleted range.
    fn delete_range(&mut self, start: SurfacePoint, end: SurfacePoint) {
        let start = self.clamp_point(start);
        let end = self.clamp_point(end);
        if start >= end {
            return;
        }
        let blocks = self.blocks_mut();
        if start.block == end.block {
            blocks[start.block].remove_range(start.offset, end.offset);
        } else {
            let tail = blocks[end.block].split_inlines_at(end.offset);
            let seam = blocks[start.block].seam_at(start.offset);
            blocks[start.block].inlines.truncate(seam);
            blocks[start.block].inlines.extend(tail);
            blocks[start.block].normalize();
            blocks.drain(start.block + 1..=end.block);
        }
        self.set_selection(Some(SelectionDescriptor::caret(start)));
    }

    /// Insert plain text at a point. Newlines split the block, so pasted
    /// multi-line text produces multiple blocks of the same kind. Inserted
    /// text inherits the style and link target at the caret. Returns the
    /// caret position after the insertion.
    fn insert_text_at(&mut self, point: SurfacePoint, text: &str) -> SurfacePoint {
        if text.is_empty() {
            return self.clamp_point(point);
        }
        if self.blocks().is_empty() {
            self.ensure_block(BlockKind::Paragraph);
        }
        let mut caret = self.clamp_point(point);
        let mut segments = text.split('\n');

        if let Some(first) = segments.next() {
            if !first.is_empty() {
                let block = &mut self.blocks_mut()[caret.block];
                let (style, link) = block.inherited_format(caret.offset);
                block.insert_inline(
                    caret.offset,
                    Inline::Text(TextRun {
                        text: first.to_owned(),
                        style,
                        link,
                    }),
                );
                caret.offset += first.chars().count();
            }
        }

        for segment in segments {
            // Split the current block at the caret; the remainder starts a
            // new block of the same kind so lists and headings continue.
            let (kind, align) = {
                let block = &self.blocks()[caret.block];
                (block.kind, block.align)
            };
            let tail = self.blocks_mut()[caret.block].split_inlines_at(caret.offset);
            let mut next = Block::with_inlines(kind, tail);
            next.align = align;
            self.blocks_mut().insert(caret.block + 1, next);

            caret = SurfacePoint::new(caret.block + 1, 0);
            if !segment.is_empty() {
                let block = &mut self.blocks_mut()[caret.block];
                block.insert_inline(
                    caret.offset,
                    Inline::Text(TextRun::plain(segment.to_owned())),
                );
                caret.offset += segment.chars().count();
            }
        }

        self.set_selection(Some(SelectionDescriptor::caret(caret)));
        caret
    }

    /// Insert an inline node at a point. Returns the caret position
    /// immediately after the node, so repeated insertions never nest.
    fn insert_inline_at(&mut self, point: SurfacePoint, inline: Inline) -> SurfacePoint {
        if self.blocks().is_empty() {
            self.ensure_block(BlockKind::Paragraph);
        }
        let point = self.clamp_point(point);
        let len = inline.char_len();
        self.blocks_mut()[point.block].insert_inline(point.offset, inline);
        let caret = SurfacePoint::new(point.block, point.offset + len);
        self.set_selection(Some(SelectionDescriptor::caret(caret)));
        caret
    }

    /// Replace the current selection (or type at the caret) with text.
    /// This is the keystroke path.
    fn replace_selection_with_text(&mut self, text: &str) {
        let sel = self.selection_or_end();
        if !sel.is_collapsed() {
            self.delete_range(sel.start(), sel.end());
        }
        let caret = sel.start();
        self.insert_text_at(caret, text);
    }

    // === Provided: read-out ===

    /// Serialize the surface to its canonical markup string.
    fn serialize(&self) -> String {
        markup::serialize_blocks(self.blocks())
    }

    /// Plain text of the whole surface, blocks separated by newlines.
    /// Images contribute nothing.
    fn surface_text(&self) -> String {
        let mut out = String::new();
        for (idx, block) in self.blocks().iter().enumerate() {
            if idx > 0 {
                out.push('\n');
            }
            out.push_str(&block.plain_text());
        }
        out
    }
}

/// In-memory implementation of [`Surface`].
///
/// One owned handle per mounted editor: created on mount, dropped on
/// unmount, never aliased.
#[derive(Clone, Debug, Default)]
pub struct DocumentSurface {
    blocks: Vec<Block>,
    selection: Option<SelectionDescriptor>,
}

impl DocumentSurface {
    /// An empty surface.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a surface from a canonical markup string.
    pub fn from_markup(value: &str) -> Self {
        Self {
            blocks: markup::parse(value),
            selection: None,
        }
    }

    /// Replace the content wholesale from a canonical markup string,
    /// preserving the caret as far as the new content allows.
    pub fn reload(&mut self, value: &str) {
        let previous = self.selection;
        self.blocks = markup::parse(value);
        match previous {
            Some(sel) => self.restore(sel),
            None => self.selection = None,
        }
    }
}

impl Surface for DocumentSurface {
    fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    fn blocks_mut(&mut self) -> &mut Vec<Block> {
        &mut self.blocks
    }

    fn selection(&self) -> Option<SelectionDescriptor> {
        self.selection
    }

    fn set_selection(&mut self, selection: Option<SelectionDescriptor>) {
        self.selection = selection;
    }
}
