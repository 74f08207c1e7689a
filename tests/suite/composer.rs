//! Editing through the app's intent API.

use nanokey_engine::composer::{delete_backward, insert_at, resolve_target};
use nanokey_engine::{ActionMode, AppSettings, EditError, Intent, Selection};

use crate::common::{app_with, type_text};

#[test]
fn typing_then_deleting_walks_graphemes() {
    let mut app = app_with(AppSettings::default());
    type_text(&mut app, "Halló");
    app.handle(Intent::Emoji);
    assert_eq!(app.composer().text(), "Halló😊");
    assert_eq!(app.composer().selection(), Selection::caret(6));

    app.handle(Intent::Delete);
    app.handle(Intent::Delete);
    assert_eq!(app.composer().text(), "Hall");
    assert_eq!(app.composer().selection(), Selection::caret(4));
}

#[test]
fn typing_over_a_selection_replaces_it() {
    let mut app = app_with(AppSettings::default());
    type_text(&mut app, "Hello world");
    app.handle(Intent::Select(Selection::new(11, 6)));
    type_text(&mut app, "there");
    assert_eq!(app.composer().text(), "Hello there");
    assert_eq!(app.composer().selection(), Selection::caret(11));
}

#[test]
fn combining_marks_count_as_one_position() {
    let buffer = "cafe\u{301} au lait";
    assert_eq!(resolve_target(buffer, Selection::new(0, 4)), Ok("cafe\u{301}"));

    let (text, caret) = insert_at(buffer, Selection::new(0, 4), "tea");
    assert_eq!(text, "tea au lait");
    assert_eq!(caret, Selection::caret(3));

    let (text, caret) = delete_backward("cafe\u{301}", Selection::caret(4));
    assert_eq!(text, "caf");
    assert_eq!(caret, Selection::caret(3));
}

#[test]
fn out_of_range_selection_is_clamped() {
    let (text, caret) = insert_at("abc", Selection::new(2, 99), "Z");
    assert_eq!(text, "abZ");
    assert_eq!(caret, Selection::caret(3));
}

#[test]
fn blank_selection_has_no_target() {
    assert_eq!(
        resolve_target("a   b", Selection::new(1, 4)),
        Err(EditError::EmptyTarget)
    );
    assert_eq!(resolve_target("a   b", Selection::caret(2)), Ok("a   b"));
}

#[tokio::test]
async fn whitespace_buffer_reports_no_text() {
    let mut app = app_with(AppSettings::default());
    type_text(&mut app, "   ");
    app.handle(Intent::Action(ActionMode::Rewrite));
    assert_eq!(app.toast(), Some("No text found."));
    assert_eq!(app.session().state().label(), "idle");
}
