//! Canonical markup serialization for the editing surface.
//!
//! The canonical value is a restricted HTML fragment: blocks `h1|h2|h3|p`,
//! inline emphasis `b|i|u|s`, list containers `ul|ol|li`, anchors `a[href]`
//! and inline images `img[src,style,alt]`. Serialization walks the surface
//! blocks and emits markup; parsing replaces surface content wholesale from
//! a string. Both are total for well-formed input, and anything outside the
//! grammar is skipped on input rather than rejected.
//!
//! Canonical form: emphasis tags always nest in the order `b > i > u > s`,
//! adjacent runs sharing a link target share one anchor, and legacy aliases
//! (`strong`, `em`, `strike`, `del`) are normalized on input. For values
//! produced by this module, `serialize_blocks(parse(v)) == v`.

mod escape;
mod parse;
#[cfg(test)]
mod tests;

pub use escape::{escape_attr, escape_text, unescape};
pub use parse::{parse, validate};

use crate::surface::{Block, ImageNode, Inline, TextRun};
use crate::types::{Alignment, BlockKind};

/// Serialize surface blocks to the canonical markup string.
///
/// An empty surface serializes to the empty string, not an empty paragraph.
pub fn serialize_blocks(blocks: &[Block]) -> String {
    let mut out = String::new();
    let mut idx = 0;
    while idx < blocks.len() {
        match blocks[idx].kind {
            BlockKind::ListItem(kind) => {
                let container = kind.container_tag();
                out.push('<');
                out.push_str(container);
                out.push('>');
                while idx < blocks.len() && blocks[idx].kind == BlockKind::ListItem(kind) {
                    write_block(&mut out, &blocks[idx]);
                    idx += 1;
                }
                out.push_str("</");
                out.push_str(container);
                out.push('>');
            }
            _ => {
                write_block(&mut out, &blocks[idx]);
                idx += 1;
            }
        }
    }
    out
}

fn write_block(out: &mut String, block: &Block) {
    let tag = block.kind.tag();
    out.push('<');
    out.push_str(tag);
    if block.align != Alignment::Left {
        out.push_str(" style=\"text-align: ");
        out.push_str(block.align.css_value());
        out.push_str(";\"");
    }
    out.push('>');
    write_inlines(out, &block.inlines);
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}

fn write_inlines(out: &mut String, inlines: &[Inline]) {
    let mut idx = 0;
    while idx < inlines.len() {
        match &inlines[idx] {
            Inline::Image(image) => {
                write_image(out, image);
                idx += 1;
            }
            Inline::Text(run) => match &run.link {
                Some(href) => {
                    out.push_str("<a href=\"");
                    escape_attr(out, href);
                    out.push_str("\">");
                    // All adjacent runs targeting the same href share this
                    // anchor, so a partially-bold link stays one link.
                    while idx < inlines.len() {
                        match &inlines[idx] {
                            Inline::Text(next) if next.link.as_ref() == Some(href) => {
                                write_run(out, next);
                                idx += 1;
                            }
                            _ => break,
                        }
                    }
                    out.push_str("</a>");
                }
                None => {
                    write_run(out, run);
                    idx += 1;
                }
            },
        }
    }
}

fn write_run(out: &mut String, run: &TextRun) {
    // Fixed nesting order keeps the output canonical: b > i > u > s.
    let style = run.style;
    if style.bold {
        out.push_str("<b>");
    }
    if style.italic {
        out.push_str("<i>");
    }
    if style.underline {
        out.push_str("<u>");
    }
    if style.strikethrough {
        out.push_str("<s>");
    }
    escape_text(out, &run.text);
    if style.strikethrough {
        out.push_str("</s>");
    }
    if style.underline {
        out.push_str("</u>");
    }
    if style.italic {
        out.push_str("</i>");
    }
    if style.bold {
        out.push_str("</b>");
    }
}

fn write_image(out: &mut String, image: &ImageNode) {
    out.push_str("<img src=\"");
    escape_attr(out, &image.src);
    out.push('"');
    if !image.style.is_empty() {
        out.push_str(" style=\"");
        escape_attr(out, &image.style);
        out.push('"');
    }
    if let Some(alt) = image.alt.as_deref() {
        if !alt.is_empty() {
            out.push_str(" alt=\"");
            escape_attr(out, alt);
            out.push('"');
        }
    }
    out.push('>');
}
