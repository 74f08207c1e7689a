//! Suggestion flows against the in-process mock backend.

use nanokey_engine::{ActionMode, AppSettings, Intent, SessionEvent, SessionState, Selection};
use nanokey_types::LanguagePreference;

use crate::common::{app_with, type_text};

fn candidate_texts(app: &nanokey_engine::App) -> Vec<String> {
    app.session()
        .presentation()
        .map(|p| p.candidates().iter().map(|c| c.text.clone()).collect())
        .unwrap_or_default()
}

#[tokio::test]
async fn rewrite_selection_and_apply_first_candidate() {
    let mut app = app_with(AppSettings::default());
    type_text(&mut app, "Hello world");
    app.handle(Intent::Select(Selection::new(6, 11)));
    app.handle(Intent::Action(ActionMode::Rewrite));

    let event = app.await_dispatch().await;
    assert_eq!(
        event,
        Some(SessionEvent::Presented {
            mode: ActionMode::Rewrite,
            candidates: 2
        })
    );
    assert_eq!(candidate_texts(&app), ["world (Formal)", "world (Concise)"]);
    let header = app.session().presentation().unwrap().header();
    assert_eq!(header.as_deref(), Some("nanobot • 600ms"));

    app.handle(Intent::SelectCandidate(0));
    assert_eq!(app.composer().text(), "Hello world (Formal)");
    assert_eq!(app.composer().selection(), Selection::caret(20));
    assert_eq!(app.session().state(), &SessionState::Idle);
}

#[tokio::test]
async fn caret_reply_inserts_at_caret() {
    let mut app = app_with(AppSettings::default());
    type_text(&mut app, "See you? ");
    app.handle(Intent::Action(ActionMode::Reply));
    app.await_dispatch().await;

    app.handle(Intent::SelectCandidate(1));
    assert_eq!(app.composer().text(), "See you? No, I can't make it.");
}

#[tokio::test]
async fn translate_follows_keyboard_language() {
    let mut app = app_with(AppSettings::default());
    app.handle(Intent::PickLanguage("is".to_string()));
    type_text(&mut app, "takk");
    app.handle(Intent::Action(ActionMode::Translate));
    app.await_dispatch().await;
    assert_eq!(candidate_texts(&app), ["[EN] takk", "[DK] takk"]);
}

#[tokio::test]
async fn translate_target_override_wins_over_keyboard() {
    let mut app = app_with(AppSettings {
        translate_target: LanguagePreference::Fixed("is".to_string()),
        ..AppSettings::default()
    });
    type_text(&mut app, "thanks");
    app.handle(Intent::Action(ActionMode::Translate));
    app.await_dispatch().await;
    assert_eq!(candidate_texts(&app), ["[EN] thanks", "[DK] thanks"]);
}

#[tokio::test]
async fn rewrite_ignores_reply_override() {
    let mut app = app_with(AppSettings {
        reply_language: LanguagePreference::Fixed("ru".to_string()),
        ..AppSettings::default()
    });
    type_text(&mut app, "ok");
    app.handle(Intent::Action(ActionMode::Reply));
    app.await_dispatch().await;
    assert_eq!(candidate_texts(&app)[0], "Да, конечно.");

    app.handle(Intent::Action(ActionMode::Rewrite));
    app.await_dispatch().await;
    assert_eq!(candidate_texts(&app), ["ok (Formal)", "ok (Concise)"]);
}

#[tokio::test]
async fn dismiss_leaves_buffer_untouched() {
    let mut app = app_with(AppSettings::default());
    type_text(&mut app, "hey");
    app.handle(Intent::Action(ActionMode::Reply));
    app.await_dispatch().await;

    app.handle(Intent::DismissOverlay);
    assert_eq!(app.session().state(), &SessionState::Idle);
    app.handle(Intent::SelectCandidate(0));
    assert_eq!(app.composer().text(), "hey");
}

#[tokio::test]
async fn copy_then_paste_round_trips_through_clipboard() {
    let mut app = app_with(AppSettings::default());
    type_text(&mut app, "Hello world");
    app.handle(Intent::Select(Selection::new(0, 5)));
    app.handle(Intent::Action(ActionMode::Rewrite));
    app.await_dispatch().await;

    app.handle(Intent::CopyCandidate(1));
    assert_eq!(app.toast(), Some(nanokey_engine::NOTICE_COPIED));
    app.handle(Intent::DismissOverlay);
    app.handle(Intent::Select(Selection::caret(11)));
    app.handle(Intent::Paste);
    assert_eq!(app.composer().text(), "Hello worldHello (Concise)");
}

#[tokio::test]
async fn disabled_integration_never_reaches_backend() {
    let mut app = app_with(AppSettings {
        nanobot_enabled: false,
        ..AppSettings::default()
    });
    type_text(&mut app, "hello");
    app.handle(Intent::Action(ActionMode::Reply));
    assert_eq!(app.toast(), Some(nanokey_engine::NOTICE_DISABLED));
    assert!(app.settings_editor().is_some());
    assert_eq!(app.await_dispatch().await, None);
}
