//! Error types for vellum - the editor engine's failure taxonomy.
//!
//! The engine has no fatal error category: everything here is absorbed at
//! the component layer and the editor stays usable. These types exist so the
//! fallible seams (media embedding, markup loading) return honest `Result`s
//! instead of panicking or silently lying about what happened.

use miette::Diagnostic;

/// Main error type for vellum operations.
#[derive(thiserror::Error, Debug, Diagnostic)]
#[non_exhaustive]
pub enum VellumError {
    /// Media attachment rejected
    #[error(transparent)]
    #[diagnostic_source]
    Media(#[from] MediaError),

    /// Markup loading error
    #[error(transparent)]
    #[diagnostic_source]
    Markup(#[from] MarkupError),
}

/// Errors from the image embedding pipeline.
#[derive(thiserror::Error, Debug, Diagnostic)]
#[non_exhaustive]
pub enum MediaError {
    /// The attachment is not an image. The editor drops the insertion.
    #[error("unsupported media type: {mime}")]
    #[diagnostic(
        code(vellum::media::unsupported),
        help("only image/* attachments can be embedded in a document")
    )]
    UnsupportedMediaType { mime: String },

    /// The attachment carried no bytes.
    #[error("empty attachment")]
    #[diagnostic(code(vellum::media::empty))]
    EmptyAttachment,
}

/// Errors from canonical markup handling.
///
/// Loading is total over well-formed input; this only reports structurally
/// broken input (an unterminated tag), and even then the loader recovers by
/// treating the remainder as text. Kept as a type so hosts that want strict
/// validation can ask for it.
#[derive(thiserror::Error, Debug, Diagnostic)]
#[non_exhaustive]
pub enum MarkupError {
    /// A tag was opened with `<` but never closed with `>`.
    #[error("unterminated tag at byte {offset}")]
    #[diagnostic(code(vellum::markup::unterminated))]
    UnterminatedTag { offset: usize },
}
