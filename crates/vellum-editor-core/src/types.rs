//! Core editor types: selection, inline styles, block kinds.
//!
//! These types are host-agnostic. Selection is always anchored to surface
//! coordinates (block index + character offset), never to canonical-string
//! offsets - the canonical string is rewritten on every serialization, so
//! string offsets would be stale the moment they were captured.

/// Kind of a top-level block on the editing surface.
#[derive(Clone, Debug, Copy, PartialEq, Eq, Default)]
pub enum BlockKind {
    #[default]
    Paragraph,
    Heading1,
    Heading2,
    Heading3,
    /// A list item. Adjacent items of the same kind group into one
    /// `ul`/`ol` container at serialization time.
    ListItem(ListKind),
}

impl BlockKind {
    /// The tag this block serializes to (`li` for list items).
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Paragraph => "p",
            Self::Heading1 => "h1",
            Self::Heading2 => "h2",
            Self::Heading3 => "h3",
            Self::ListItem(_) => "li",
        }
    }

    pub fn is_list_item(&self) -> bool {
        matches!(self, Self::ListItem(_))
    }
}

/// Ordered vs unordered list.
#[derive(Clone, Debug, Copy, PartialEq, Eq)]
pub enum ListKind {
    Ordered,
    Unordered,
}

impl ListKind {
    /// Container tag: `ol` or `ul`.
    pub fn container_tag(&self) -> &'static str {
        match self {
            Self::Ordered => "ol",
            Self::Unordered => "ul",
        }
    }
}

/// Block-level text alignment. Mutually exclusive; `Left` is the default
/// and serializes to no attribute at all.
#[derive(Clone, Debug, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

impl Alignment {
    /// CSS value for a `text-align` declaration.
    pub fn css_value(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }
}

/// Inline emphasis flags carried by a text run.
#[derive(Clone, Debug, Copy, PartialEq, Eq, Default)]
pub struct InlineStyle {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikethrough: bool,
}

impl InlineStyle {
    pub const PLAIN: Self = Self {
        bold: false,
        italic: false,
        underline: false,
        strikethrough: false,
    };

    pub fn is_plain(&self) -> bool {
        *self == Self::PLAIN
    }
}

/// A position on the editing surface.
///
/// `offset` counts characters of the block's inline content; an inline
/// image occupies exactly one position. Ordering is block-major, which is
/// document order.
#[derive(Clone, Debug, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SurfacePoint {
    /// Index of the block.
    pub block: usize,
    /// Character offset within the block's content.
    pub offset: usize,
}

impl SurfacePoint {
    pub fn new(block: usize, offset: usize) -> Self {
        Self { block, offset }
    }
}

/// The user's caret or selection, anchored to surface content.
///
/// The anchor is where the selection started, the head is where the cursor
/// is now. They may be in any order - use `start()` and `end()` for
/// document-ordered bounds.
#[derive(Clone, Debug, Copy, PartialEq, Eq)]
pub struct SelectionDescriptor {
    /// Where selection started.
    pub anchor: SurfacePoint,
    /// Where the cursor is now.
    pub head: SurfacePoint,
}

impl SelectionDescriptor {
    pub fn new(anchor: SurfacePoint, head: SurfacePoint) -> Self {
        Self { anchor, head }
    }

    /// A collapsed selection (caret).
    pub fn caret(point: SurfacePoint) -> Self {
        Self {
            anchor: point,
            head: point,
        }
    }

    /// Document-ordered start of the selection.
    pub fn start(&self) -> SurfacePoint {
        self.anchor.min(self.head)
    }

    /// Document-ordered end of the selection.
    pub fn end(&self) -> SurfacePoint {
        self.anchor.max(self.head)
    }

    /// Whether the selection is collapsed (caret only).
    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.head
    }

    /// Whether head precedes anchor in document order.
    pub fn is_backwards(&self) -> bool {
        self.head < self.anchor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_ordering_is_block_major() {
        assert!(SurfacePoint::new(0, 10) < SurfacePoint::new(1, 0));
        assert!(SurfacePoint::new(1, 0) < SurfacePoint::new(1, 3));
    }

    #[test]
    fn test_selection_bounds() {
        let sel = SelectionDescriptor::new(SurfacePoint::new(1, 4), SurfacePoint::new(0, 2));
        assert_eq!(sel.start(), SurfacePoint::new(0, 2));
        assert_eq!(sel.end(), SurfacePoint::new(1, 4));
        assert!(sel.is_backwards());
        assert!(!sel.is_collapsed());
    }

    #[test]
    fn test_caret_is_collapsed() {
        let sel = SelectionDescriptor::caret(SurfacePoint::new(2, 7));
        assert!(sel.is_collapsed());
        assert_eq!(sel.start(), sel.end());
    }

    #[test]
    fn test_alignment_default_is_left() {
        assert_eq!(Alignment::default(), Alignment::Left);
        assert_eq!(Alignment::Center.css_value(), "center");
    }

    #[test]
    fn test_block_tags() {
        assert_eq!(BlockKind::Paragraph.tag(), "p");
        assert_eq!(BlockKind::Heading2.tag(), "h2");
        assert_eq!(BlockKind::ListItem(ListKind::Ordered).tag(), "li");
        assert_eq!(ListKind::Unordered.container_tag(), "ul");
    }
}
