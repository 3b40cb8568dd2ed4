//! Editor commands.
//!
//! A `Command` is a named, stateless request: a formatting or insertion
//! operation plus its argument. Commands are decoupled from how they're
//! triggered (toolbar button, keyboard shortcut, programmatic call); the
//! executor resolves the current selection and applies them.

use crate::types::{Alignment, BlockKind};

/// Block-level target for [`Command::FormatBlock`].
///
/// List items are not a valid `FormatBlock` target; lists have their own
/// toggle commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockTag {
    Paragraph,
    Heading1,
    Heading2,
    Heading3,
}

impl BlockTag {
    /// The surface block kind this tag maps to.
    pub fn kind(&self) -> BlockKind {
        match self {
            Self::Paragraph => BlockKind::Paragraph,
            Self::Heading1 => BlockKind::Heading1,
            Self::Heading2 => BlockKind::Heading2,
            Self::Heading3 => BlockKind::Heading3,
        }
    }
}

/// Attributes for an image insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAttrs {
    /// External URL or `data:` URI.
    pub src: String,
    /// Alt text, serialized only when non-empty.
    pub alt: Option<String>,
}

/// All editor commands.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    // === Inline toggles ===
    /// Toggle bold on the selection.
    Bold,
    /// Toggle italic on the selection.
    Italic,
    /// Toggle underline on the selection.
    Underline,
    /// Toggle strikethrough on the selection.
    Strikethrough,

    // === Block-level ===
    /// Replace the block container of the selection.
    FormatBlock(BlockTag),
    /// Toggle the selection's blocks into/out of an unordered list.
    InsertUnorderedList,
    /// Toggle the selection's blocks into/out of an ordered list.
    InsertOrderedList,
    /// Set block alignment. Mutually exclusive; `Left` clears.
    Align(Alignment),

    // === Content ===
    /// Wrap the selection in an anchor. Empty URL is a no-op.
    CreateLink(String),
    /// Insert an image node at the insertion point.
    InsertImage(ImageAttrs),
}

impl Command {
    /// Stable name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bold => "bold",
            Self::Italic => "italic",
            Self::Underline => "underline",
            Self::Strikethrough => "strikethrough",
            Self::FormatBlock(_) => "formatBlock",
            Self::InsertUnorderedList => "insertUnorderedList",
            Self::InsertOrderedList => "insertOrderedList",
            Self::Align(_) => "align",
            Self::CreateLink(_) => "createLink",
            Self::InsertImage(_) => "insertImage",
        }
    }
}
