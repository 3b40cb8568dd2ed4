//! vellum-editor-core: Pure Rust rich-text editing logic without host dependencies.
//!
//! This crate provides:
//! - `Surface` trait for editing-surface abstraction
//! - `DocumentSurface` - in-memory block/run implementation
//! - Command execution, markup serialization, image embedding
//! - `SyncController` - echo suppression against the host-owned value

pub mod commands;
pub mod execute;
pub mod image;
pub mod markup;
pub mod surface;
pub mod sync;
pub mod text_helpers;
pub mod types;

pub use commands::{BlockTag, Command, ImageAttrs};
pub use execute::{FormatState, execute_command, query_format_state};
pub use image::{EmbeddedImage, IMAGE_STYLE, embed_image, fit_to_width};
pub use markup::{parse, serialize_blocks, validate};
pub use smol_str::SmolStr;
pub use surface::{Block, DocumentSurface, ImageNode, Inline, Surface, TextRun};
pub use sync::{ExternalUpdate, SyncController, SyncState};
pub use types::{
    Alignment, BlockKind, InlineStyle, ListKind, SelectionDescriptor, SurfacePoint,
};
pub use vellum_common::{MediaError, VellumError};
