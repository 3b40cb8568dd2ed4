//! Image embedding pipeline.
//!
//! Turns a user-picked file (bytes + declared MIME type) into an inline
//! `data:` URI the surface can carry. The document stays self-contained:
//! no blob handles, no object storage, just the string.
//!
//! No maximum file size is enforced here. The host's separate upload flows
//! cap size on their own; this layer reproduces the uncapped inline-embed
//! behavior and only validates the media type.

use base64::{Engine, engine::general_purpose::STANDARD};
use bytes::Bytes;
use mime_sniffer::MimeTypeSniffer;

use vellum_common::MediaError;

/// Layout constraint applied to every inserted image: render no wider than
/// the surface's content width, height following the intrinsic aspect
/// ratio.
pub const IMAGE_STYLE: &str = "max-width: 100%; height: auto;";

/// A validated, encoded image ready for insertion.
#[derive(Clone, Debug)]
pub struct EmbeddedImage {
    /// `data:{mime};base64,{payload}`
    pub data_uri: String,
    /// Resolved MIME type (declared, or sniffed from the bytes).
    pub mime: String,
    /// Alt text captured alongside the file, if any.
    pub alt: Option<String>,
}

/// Validate and encode an attachment as an inline data URI.
///
/// The declared MIME type must begin with `image/`. A missing or generic
/// declaration is resolved by sniffing the bytes; anything that still
/// isn't an image is rejected.
pub fn embed_image(
    data: &Bytes,
    declared_mime: &str,
    alt: Option<String>,
) -> Result<EmbeddedImage, MediaError> {
    if data.is_empty() {
        return Err(MediaError::EmptyAttachment);
    }
    let mime = resolve_mime(data, declared_mime)?;
    let data_uri = format!("data:{};base64,{}", mime, STANDARD.encode(data));
    Ok(EmbeddedImage {
        data_uri,
        mime,
        alt,
    })
}

fn resolve_mime(data: &Bytes, declared: &str) -> Result<String, MediaError> {
    let declared = declared.trim();
    if declared.starts_with("image/") {
        return Ok(declared.to_owned());
    }
    if declared.is_empty() || declared == "application/octet-stream" {
        if let Some(sniffed) = data.sniff_mime_type() {
            if sniffed.starts_with("image/") {
                tracing::debug!(sniffed, "resolved attachment mime by sniffing");
                return Ok(sniffed.to_owned());
            }
        }
    }
    Err(MediaError::UnsupportedMediaType {
        mime: if declared.is_empty() {
            "unknown".to_owned()
        } else {
            declared.to_owned()
        },
    })
}

/// Displayed dimensions for an image constrained to the content width.
///
/// Images narrower than the content width keep their intrinsic size;
/// wider ones scale down with the aspect ratio preserved.
pub fn fit_to_width(intrinsic: (u32, u32), content_width: u32) -> (u32, u32) {
    let (width, height) = intrinsic;
    if width == 0 || height == 0 || width <= content_width {
        return intrinsic;
    }
    let scaled = (u64::from(height) * u64::from(content_width) + u64::from(width) / 2)
        / u64::from(width);
    (content_width, (scaled as u32).max(1))
}
