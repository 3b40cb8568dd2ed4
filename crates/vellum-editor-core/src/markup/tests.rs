//! Round-trip and grammar tests for the markup serializer.

use super::{parse, serialize_blocks, validate};
use crate::surface::{Block, ImageNode, Inline, TextRun};
use crate::types::{Alignment, BlockKind, InlineStyle, ListKind};

fn round_trip(value: &str) -> String {
    serialize_blocks(&parse(value))
}

// === Round-trip over canonical values ===

#[test]
fn test_round_trip_empty() {
    assert_eq!(round_trip(""), "");
}

#[test]
fn test_round_trip_paragraph() {
    assert_eq!(round_trip("<p>Hi</p>"), "<p>Hi</p>");
}

#[test]
fn test_round_trip_headings() {
    let value = "<h1>Title</h1><h2>Sub</h2><h3>Deep</h3><p>Body</p>";
    assert_eq!(round_trip(value), value);
}

#[test]
fn test_round_trip_inline_styles() {
    let value = "<p><b>bold</b> plain <i>italic</i> <u>under</u> <s>gone</s></p>";
    assert_eq!(round_trip(value), value);
}

#[test]
fn test_round_trip_nested_styles_canonical_order() {
    let value = "<p><b><i>both</i></b></p>";
    assert_eq!(round_trip(value), value);
}

#[test]
fn test_round_trip_lists() {
    let value = "<ul><li>one</li><li>two</li></ul><ol><li>first</li></ol>";
    assert_eq!(round_trip(value), value);
}

#[test]
fn test_round_trip_alignment() {
    let value = "<p style=\"text-align: center;\">centered</p>";
    assert_eq!(round_trip(value), value);
}

#[test]
fn test_round_trip_link() {
    let value = "<p>see <a href=\"https://example.com\">here</a></p>";
    assert_eq!(round_trip(value), value);
}

#[test]
fn test_round_trip_link_with_styled_span() {
    // A partially-bold link is one anchor, not two.
    let value = "<p><a href=\"https://example.com\">plain <b>bold</b></a></p>";
    assert_eq!(round_trip(value), value);
}

#[test]
fn test_round_trip_image() {
    let value = "<p><img src=\"https://example.com/a.png\" style=\"max-width: 100%; height: auto;\"></p>";
    assert_eq!(round_trip(value), value);
}

#[test]
fn test_round_trip_image_with_alt() {
    let value = "<p><img src=\"x.png\" alt=\"a chart\"></p>";
    assert_eq!(round_trip(value), value);
}

#[test]
fn test_round_trip_data_uri_image() {
    let value = "<p><img src=\"data:image/png;base64,iVBORw0KGgo=\" style=\"max-width: 100%; height: auto;\"></p>";
    assert_eq!(round_trip(value), value);
}

#[test]
fn test_round_trip_escaped_text() {
    let value = "<p>1 &lt; 2 &amp; 3 &gt; 2</p>";
    assert_eq!(round_trip(value), value);
}

#[test]
fn test_round_trip_empty_paragraph() {
    assert_eq!(round_trip("<p></p>"), "<p></p>");
}

// === Normalization of foreign input ===

#[test]
fn test_legacy_aliases_normalize() {
    // strike and del both normalize to s, and the now-identical adjacent
    // runs merge into one.
    assert_eq!(
        round_trip("<p><strong>b</strong><em>i</em><strike>s</strike><del>d</del></p>"),
        "<p><b>b</b><i>i</i><s>sd</s></p>"
    );
}

#[test]
fn test_unknown_tags_skipped_content_kept() {
    assert_eq!(
        round_trip("<div><p><span>kept</span></p></div>"),
        "<p>kept</p>"
    );
}

#[test]
fn test_bare_text_wraps_into_paragraph() {
    assert_eq!(round_trip("loose text"), "<p>loose text</p>");
}

#[test]
fn test_whitespace_between_blocks_ignored() {
    assert_eq!(
        round_trip("<p>a</p>\n  <p>b</p>\n"),
        "<p>a</p><p>b</p>"
    );
}

#[test]
fn test_anchor_without_href_is_plain_text() {
    assert_eq!(round_trip("<p><a>naked</a></p>"), "<p>naked</p>");
}

#[test]
fn test_img_without_src_skipped() {
    assert_eq!(round_trip("<p>a<img alt=\"x\">b</p>"), "<p>ab</p>");
}

#[test]
fn test_comment_skipped() {
    assert_eq!(round_trip("<p>a<!-- note -->b</p>"), "<p>ab</p>");
}

#[test]
fn test_unterminated_tag_degrades_to_text() {
    assert_eq!(round_trip("<p>a</p><p"), "<p>a</p><p>&lt;p</p>");
}

#[test]
fn test_validate_accepts_well_formed() {
    assert!(validate("<p>a <b>b</b></p><!-- c -->").is_ok());
    assert!(validate("").is_ok());
}

#[test]
fn test_validate_reports_unterminated_tag() {
    let err = validate("<p>a</p><p").unwrap_err();
    assert!(matches!(
        err,
        vellum_common::MarkupError::UnterminatedTag { offset: 8 }
    ));
}

#[test]
fn test_list_kind_change_splits_containers() {
    let value = "<ul><li>u</li></ul><ol><li>o</li></ol>";
    assert_eq!(round_trip(value), value);
}

#[test]
fn test_fragmented_runs_merge_on_parse() {
    // Adjacent identically-styled runs collapse into one.
    assert_eq!(round_trip("<p><b>a</b><b>b</b></p>"), "<p><b>ab</b></p>");
}

// === Serializer over hand-built surfaces ===

#[test]
fn test_serialize_empty_surface_is_empty_string() {
    assert_eq!(serialize_blocks(&[]), "");
}

#[test]
fn test_serialize_mixed_document_snapshot() {
    let bold = InlineStyle {
        bold: true,
        ..InlineStyle::PLAIN
    };
    let mut heading = Block::new(BlockKind::Heading1);
    heading.inlines.push(Inline::Text(TextRun::plain("Hiring")));

    let mut body = Block::new(BlockKind::Paragraph);
    body.align = Alignment::Center;
    body.inlines.push(Inline::Text(TextRun::plain("We are ")));
    body.inlines.push(Inline::Text(TextRun::new("growing", bold)));

    let mut item = Block::new(BlockKind::ListItem(ListKind::Unordered));
    item.inlines.push(Inline::Text(TextRun::linked(
        "apply",
        "https://example.com/jobs",
    )));

    let mut figure = Block::new(BlockKind::Paragraph);
    figure.inlines.push(Inline::Image(ImageNode {
        src: "data:image/png;base64,AAAA".into(),
        style: "max-width: 100%; height: auto;".into(),
        alt: Some("team photo".into()),
    }));

    let html = serialize_blocks(&[heading, body, item, figure]);
    insta::assert_snapshot!(html, @r#"<h1>Hiring</h1><p style="text-align: center;">We are <b>growing</b></p><ul><li><a href="https://example.com/jobs">apply</a></li></ul><p><img src="data:image/png;base64,AAAA" style="max-width: 100%; height: auto;" alt="team photo"></p>"#);
}

#[test]
fn test_serialize_quote_in_attribute_escaped() {
    let mut block = Block::new(BlockKind::Paragraph);
    block
        .inlines
        .push(Inline::Text(TextRun::linked("x", "https://e.com/?q=\"a\"")));
    let html = serialize_blocks(&[block]);
    insta::assert_snapshot!(html, @r#"<p><a href="https://e.com/?q=&quot;a&quot;">x</a></p>"#);
    // And it survives the trip back.
    assert_eq!(round_trip(&html), html);
}
