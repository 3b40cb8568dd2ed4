//! Restricted-grammar markup parsing.
//!
//! A small tag tokenizer feeding a block builder. The surface only ever
//! contains constructs the command executor itself created, so the parser
//! is lenient by policy: unknown tags are skipped (their text content is
//! kept), legacy inline aliases are normalized, and structurally broken
//! input degrades to text instead of failing.

use smol_str::SmolStr;
use vellum_common::MarkupError;

use super::escape::unescape;
use crate::surface::{Block, ImageNode, Inline, TextRun};
use crate::types::{Alignment, BlockKind, InlineStyle, ListKind};

/// Strict structural check, for hosts that want to validate a value before
/// persisting it. [`parse`] itself never fails; it degrades broken input to
/// text instead.
pub fn validate(input: &str) -> Result<(), MarkupError> {
    let mut rest = input;
    let mut consumed = 0;
    while let Some(pos) = rest.find('<') {
        let tag_offset = consumed + pos;
        let after = &rest[pos..];
        let advance = if let Some(body) = after.strip_prefix("<!--") {
            match body.find("-->") {
                Some(end) => 4 + end + 3,
                None => return Err(MarkupError::UnterminatedTag { offset: tag_offset }),
            }
        } else {
            match find_tag_end(after) {
                Some(end) => end + 1,
                None => return Err(MarkupError::UnterminatedTag { offset: tag_offset }),
            }
        };
        rest = &after[advance..];
        consumed = tag_offset + advance;
    }
    Ok(())
}

/// Parse a canonical markup string into surface blocks.
pub fn parse(input: &str) -> Vec<Block> {
    let mut builder = Builder::default();
    for token in Tokenizer::new(input) {
        match token {
            Token::Text(text) => builder.text(&text),
            Token::Open { name, attrs } => builder.open(&name, &attrs),
            Token::Close { name } => builder.close(&name),
        }
    }
    builder.finish()
}

enum Token {
    Text(String),
    Open { name: String, attrs: Vec<(String, String)> },
    Close { name: String },
}

struct Tokenizer<'a> {
    rest: &'a str,
}

impl<'a> Tokenizer<'a> {
    fn new(input: &'a str) -> Self {
        Self { rest: input }
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.rest.is_empty() {
            return None;
        }
        if let Some(after) = self.rest.strip_prefix("<!--") {
            // Comment: skip to the terminator, or swallow the rest.
            match after.find("-->") {
                Some(end) => self.rest = &after[end + 3..],
                None => self.rest = "",
            }
            return self.next();
        }
        if self.rest.starts_with('<') {
            match find_tag_end(self.rest) {
                Some(end) => {
                    let raw = &self.rest[1..end];
                    self.rest = &self.rest[end + 1..];
                    return Some(parse_tag(raw));
                }
                None => {
                    // Unterminated tag: degrade to literal text.
                    let text = self.rest;
                    self.rest = "";
                    return Some(Token::Text(unescape(text)));
                }
            }
        }
        let end = self.rest.find('<').unwrap_or(self.rest.len());
        let (text, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(Token::Text(unescape(text)))
    }
}

/// Find the index of the `>` closing the tag that starts at byte 0,
/// honoring quoted attribute values that may contain `>`.
fn find_tag_end(input: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (idx, ch) in input.char_indices() {
        match quote {
            Some(open) => {
                if ch == open {
                    quote = None;
                }
            }
            None => match ch {
                '"' | '\'' => quote = Some(ch),
                '>' => return Some(idx),
                _ => {}
            },
        }
    }
    None
}

fn parse_tag(raw: &str) -> Token {
    let raw = raw.trim().trim_end_matches('/').trim_end();
    if let Some(name) = raw.strip_prefix('/') {
        return Token::Close {
            name: name.trim().to_ascii_lowercase(),
        };
    }
    let name_end = raw
        .find(|c: char| c.is_ascii_whitespace())
        .unwrap_or(raw.len());
    let name = raw[..name_end].to_ascii_lowercase();
    let attrs = parse_attrs(&raw[name_end..]);
    Token::Open { name, attrs }
}

fn parse_attrs(mut rest: &str) -> Vec<(String, String)> {
    let mut attrs = Vec::new();
    loop {
        rest = rest.trim_start();
        if rest.is_empty() {
            return attrs;
        }
        let name_end = rest
            .find(|c: char| c.is_ascii_whitespace() || c == '=')
            .unwrap_or(rest.len());
        let name = rest[..name_end].to_ascii_lowercase();
        rest = rest[name_end..].trim_start();
        if let Some(after_eq) = rest.strip_prefix('=') {
            let after_eq = after_eq.trim_start();
            let (value, remainder) = match after_eq.chars().next() {
                Some(quote @ ('"' | '\'')) => {
                    let body = &after_eq[1..];
                    match body.find(quote) {
                        Some(end) => (&body[..end], &body[end + 1..]),
                        None => (body, ""),
                    }
                }
                _ => {
                    let end = after_eq
                        .find(|c: char| c.is_ascii_whitespace())
                        .unwrap_or(after_eq.len());
                    after_eq.split_at(end)
                }
            };
            if !name.is_empty() {
                attrs.push((name, unescape(value)));
            }
            rest = remainder;
        } else if !name.is_empty() {
            // Bare attribute with no value.
            attrs.push((name, String::new()));
        } else {
            return attrs;
        }
    }
}

/// Extract the `text-align` declaration from an inline style attribute.
fn parse_text_align(style: &str) -> Alignment {
    for declaration in style.split(';') {
        let mut parts = declaration.splitn(2, ':');
        let property = parts.next().unwrap_or("").trim();
        if !property.eq_ignore_ascii_case("text-align") {
            continue;
        }
        let value = parts.next().unwrap_or("").trim();
        if value.eq_ignore_ascii_case("center") {
            return Alignment::Center;
        }
        if value.eq_ignore_ascii_case("right") {
            return Alignment::Right;
        }
    }
    Alignment::Left
}

fn attr<'a>(attrs: &'a [(String, String)], name: &str) -> Option<&'a str> {
    attrs
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
}

#[derive(Default)]
struct Builder {
    blocks: Vec<Block>,
    current: Option<Block>,
    lists: Vec<ListKind>,
    bold: usize,
    italic: usize,
    underline: usize,
    strikethrough: usize,
    links: Vec<Option<SmolStr>>,
}

impl Builder {
    fn style(&self) -> InlineStyle {
        InlineStyle {
            bold: self.bold > 0,
            italic: self.italic > 0,
            underline: self.underline > 0,
            strikethrough: self.strikethrough > 0,
        }
    }

    fn link(&self) -> Option<SmolStr> {
        self.links.iter().rev().find_map(|href| href.clone())
    }

    fn block(&mut self) -> &mut Block {
        // Bare inline content outside any block wraps into an implicit
        // paragraph, matching how a content surface treats loose nodes.
        self.current.get_or_insert_with(|| Block::new(BlockKind::Paragraph))
    }

    fn flush(&mut self) {
        if let Some(mut block) = self.current.take() {
            block.normalize();
            self.blocks.push(block);
        }
    }

    fn text(&mut self, text: &str) {
        if self.current.is_none() && text.trim().is_empty() {
            // Whitespace between blocks is insignificant.
            return;
        }
        let style = self.style();
        let link = self.link();
        self.block().inlines.push(Inline::Text(TextRun {
            text: text.to_owned(),
            style,
            link,
        }));
    }

    fn open(&mut self, name: &str, attrs: &[(String, String)]) {
        match name {
            "p" | "h1" | "h2" | "h3" => {
                self.flush();
                let kind = match name {
                    "h1" => BlockKind::Heading1,
                    "h2" => BlockKind::Heading2,
                    "h3" => BlockKind::Heading3,
                    _ => BlockKind::Paragraph,
                };
                let mut block = Block::new(kind);
                block.align = parse_text_align(attr(attrs, "style").unwrap_or(""));
                self.current = Some(block);
            }
            "ul" => {
                self.flush();
                self.lists.push(ListKind::Unordered);
            }
            "ol" => {
                self.flush();
                self.lists.push(ListKind::Ordered);
            }
            "li" => {
                self.flush();
                let kind = self.lists.last().copied().unwrap_or(ListKind::Unordered);
                let mut block = Block::new(BlockKind::ListItem(kind));
                block.align = parse_text_align(attr(attrs, "style").unwrap_or(""));
                self.current = Some(block);
            }
            "b" | "strong" => self.bold += 1,
            "i" | "em" => self.italic += 1,
            "u" => self.underline += 1,
            "s" | "strike" | "del" => self.strikethrough += 1,
            "a" => {
                let href = attr(attrs, "href")
                    .filter(|href| !href.is_empty())
                    .map(SmolStr::new);
                self.links.push(href);
            }
            "img" => {
                let Some(src) = attr(attrs, "src") else {
                    tracing::debug!("skipping img without src");
                    return;
                };
                let image = ImageNode {
                    src: src.to_owned(),
                    style: SmolStr::new(attr(attrs, "style").unwrap_or("")),
                    alt: attr(attrs, "alt")
                        .filter(|alt| !alt.is_empty())
                        .map(str::to_owned),
                };
                self.block().inlines.push(Inline::Image(image));
            }
            other => {
                tracing::trace!(tag = other, "skipping unsupported tag");
            }
        }
    }

    fn close(&mut self, name: &str) {
        match name {
            "p" | "h1" | "h2" | "h3" | "li" => self.flush(),
            "ul" | "ol" => {
                self.flush();
                self.lists.pop();
            }
            "b" | "strong" => self.bold = self.bold.saturating_sub(1),
            "i" | "em" => self.italic = self.italic.saturating_sub(1),
            "u" => self.underline = self.underline.saturating_sub(1),
            "s" | "strike" | "del" => {
                self.strikethrough = self.strikethrough.saturating_sub(1)
            }
            "a" => {
                self.links.pop();
            }
            _ => {}
        }
    }

    fn finish(mut self) -> Vec<Block> {
        self.flush();
        self.blocks
    }
}
