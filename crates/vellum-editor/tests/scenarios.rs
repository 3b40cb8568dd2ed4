//! End-to-end host scenarios for the mounted editor.

use std::cell::RefCell;
use std::rc::Rc;

use bytes::Bytes;
use vellum_editor::Editor;
use vellum_editor_core::{
    Alignment, BlockTag, Command, SelectionDescriptor, SurfacePoint,
};

const PNG_MAGIC: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// Collect every change notification the editor fires.
fn notifications() -> (Rc<RefCell<Vec<String>>>, impl FnMut(&str) + 'static) {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    (log, move |value: &str| sink.borrow_mut().push(value.to_owned()))
}

fn select(editor: &mut Editor, anchor: (usize, usize), head: (usize, usize)) {
    editor.select(SelectionDescriptor::new(
        SurfacePoint::new(anchor.0, anchor.1),
        SurfacePoint::new(head.0, head.1),
    ));
}

#[test]
fn empty_document_heading_then_typing() {
    let (log, on_change) = notifications();
    let mut editor = Editor::mount("", on_change);

    editor.execute(&Command::FormatBlock(BlockTag::Heading1));
    editor.insert_text("Hello");

    assert_eq!(editor.value(), "<h1>Hello</h1>");
    assert_eq!(log.borrow().last().map(String::as_str), Some("<h1>Hello</h1>"));
}

#[test]
fn bold_toggle_round_trips_through_host() {
    let (log, on_change) = notifications();
    let mut editor = Editor::mount("<p>Hi</p>", on_change);

    select(&mut editor, (0, 0), (0, 2));
    editor.execute(&Command::Bold);
    assert_eq!(editor.value(), "<p><b>Hi</b></p>");

    editor.execute(&Command::Bold);
    assert_eq!(editor.value(), "<p>Hi</p>");

    assert_eq!(
        log.borrow().as_slice(),
        ["<p><b>Hi</b></p>", "<p>Hi</p>"]
    );
}

#[test]
fn empty_link_url_is_noop_but_still_notifies() {
    let (log, on_change) = notifications();
    let mut editor = Editor::mount("<p>Hi</p>", on_change);

    editor.execute(&Command::CreateLink(String::new()));

    assert_eq!(editor.value(), "<p>Hi</p>");
    // The host must tolerate redundant notifications.
    assert_eq!(log.borrow().as_slice(), ["<p>Hi</p>"]);
}

#[test]
fn echo_of_own_notification_does_not_disturb_edit_state() {
    let (log, on_change) = notifications();
    let mut editor = Editor::mount("<p>Hi</p>", on_change);

    select(&mut editor, (0, 1), (0, 1));
    editor.insert_text("!");
    let caret = editor.selection();
    assert_eq!(
        caret,
        Some(SelectionDescriptor::caret(SurfacePoint::new(0, 2)))
    );

    // The host feeds our own notification back in.
    let echoed = log.borrow().last().cloned().expect("a notification fired");
    editor.set_value(&echoed);

    assert_eq!(editor.value(), "<p>H!i</p>");
    assert_eq!(editor.selection(), caret);
    assert!(!editor.is_editing());
}

#[test]
fn genuinely_external_value_replaces_content() {
    let (_log, on_change) = notifications();
    let mut editor = Editor::mount("<p>draft</p>", on_change);

    editor.set_value("<p>restored from the server</p>");
    assert_eq!(editor.value(), "<p>restored from the server</p>");
}

#[test]
fn stale_selection_survives_external_reload() {
    let (_log, on_change) = notifications();
    let mut editor = Editor::mount("<p>abcdef</p>", on_change);

    select(&mut editor, (0, 2), (0, 6));
    editor.set_value("<p>ab</p>");

    // The referenced content is gone; the selection degrades instead of
    // failing, and the editor stays usable.
    let sel = editor.selection().expect("selection still present");
    assert_eq!(sel.end(), SurfacePoint::new(0, 2));
    editor.execute(&Command::Bold);
    assert_eq!(editor.value(), "<p><b>ab</b></p>");
}

#[test]
fn attached_image_is_inlined_and_bounded() {
    let (log, on_change) = notifications();
    let mut editor = Editor::mount("", on_change);

    let inserted = editor.attach_image(
        Bytes::from_static(&PNG_MAGIC),
        "image/png",
        Some("team photo".into()),
    );
    assert!(inserted);

    let value = editor.value();
    assert!(value.contains("src=\"data:image/png;base64,"));
    assert!(value.contains("style=\"max-width: 100%; height: auto;\""));
    assert!(value.contains("alt=\"team photo\""));
    assert_eq!(log.borrow().len(), 1);
}

#[test]
fn non_image_attachment_is_rejected_silently() {
    let (log, on_change) = notifications();
    let mut editor = Editor::mount("<p>doc</p>", on_change);

    let inserted = editor.attach_image(
        Bytes::from_static(b"%PDF-1.4 definitely a pdf"),
        "application/pdf",
        None,
    );

    assert!(!inserted);
    assert_eq!(editor.value(), "<p>doc</p>");
    // No insertion, no notification, no error surfaced to the host.
    assert!(log.borrow().is_empty());
}

#[test]
fn repeated_image_insertions_sit_side_by_side() {
    let (_log, on_change) = notifications();
    let mut editor = Editor::mount("", on_change);

    let data = Bytes::from_static(&PNG_MAGIC);
    editor.attach_image(data.clone(), "image/png", None);
    editor.attach_image(data, "image/png", None);

    let value = editor.value();
    assert_eq!(value.matches("<img ").count(), 2);
    // Both images live in the same paragraph, not nested structures.
    assert_eq!(value.matches("<p>").count(), 1);
}

#[test]
fn placeholder_shows_only_while_empty() {
    let (_log, on_change) = notifications();
    let mut editor = Editor::mount("", on_change).with_placeholder("Start writing");

    assert_eq!(editor.placeholder_text(), Some("Start writing"));
    editor.insert_text("a");
    assert_eq!(editor.placeholder_text(), None);
}

#[test]
fn unmount_and_remount_against_same_value() {
    let (_log, on_change) = notifications();
    let mut editor = Editor::mount("", on_change);
    editor.execute(&Command::FormatBlock(BlockTag::Heading2));
    editor.insert_text("Open roles");
    editor.execute(&Command::Align(Alignment::Center));
    let value = editor.value();
    drop(editor);

    let (_log, on_change) = notifications();
    let remounted = Editor::mount(&value, on_change);
    assert_eq!(remounted.value(), value);
}

#[test]
fn toolbar_state_follows_selection() {
    let (_log, on_change) = notifications();
    let mut editor = Editor::mount("<h3><b>Perks</b></h3>", on_change);

    select(&mut editor, (0, 0), (0, 5));
    let state = editor.format_state();
    assert!(state.bold);
    assert_eq!(
        state.block,
        Some(vellum_editor_core::BlockKind::Heading3)
    );
}

#[test]
fn plain_text_extraction_skips_markup() {
    let (_log, on_change) = notifications();
    let editor = Editor::mount(
        "<h1>Title</h1><p>Body with <b>bold</b></p>",
        on_change,
    );
    assert_eq!(editor.text(), "Title\nBody with bold");
}
