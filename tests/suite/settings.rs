//! Settings editing, persistence, and reload.

use std::fs;

use nanokey_config::SettingsStore;
use nanokey_engine::{
    ActionMode, App, AppSettings, BackendType, Intent, NOTICE_SETTINGS_SAVED, SettingsField,
};
use nanokey_types::LanguagePreference;

use crate::common::type_text;

fn edit(app: &mut App, field: SettingsField, value: &str) {
    app.handle(Intent::EditSetting {
        field,
        value: value.to_string(),
    });
}

#[tokio::test]
async fn saved_settings_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nanokey").join("settings.toml");

    let mut app = App::load(SettingsStore::new(&path));
    assert_eq!(app.settings(), &AppSettings::default());

    app.handle(Intent::OpenSettings);
    edit(&mut app, SettingsField::BackendType, "custom");
    edit(&mut app, SettingsField::BaseUrl, "https://bot.example/");
    edit(&mut app, SettingsField::TimeoutSeconds, "45");
    edit(&mut app, SettingsField::ReplyLanguage, "ru");
    app.handle(Intent::SaveSettings);
    assert_eq!(app.toast(), Some(NOTICE_SETTINGS_SAVED));
    assert!(path.exists());

    let restarted = App::load(SettingsStore::new(&path));
    let settings = restarted.settings();
    assert_eq!(settings.backend_type, BackendType::Custom);
    assert_eq!(settings.base_url, "https://bot.example/");
    assert_eq!(settings.timeout_seconds, 45);
    assert_eq!(settings.reply_language, LanguagePreference::Fixed("ru".to_string()));
    assert_eq!(settings.translate_target, LanguagePreference::Keyboard);
}

#[tokio::test]
async fn cancel_discards_the_draft() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.toml");
    let mut app = App::load(SettingsStore::new(&path));

    app.handle(Intent::OpenSettings);
    edit(&mut app, SettingsField::Enabled, "off");
    app.handle(Intent::CancelSettings);

    assert!(app.settings().nanobot_enabled);
    assert!(app.settings_editor().is_none());
    assert!(!path.exists());
}

#[tokio::test]
async fn invalid_draft_keeps_file_and_live_settings() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.toml");
    fs::write(&path, "timeout_seconds = 30\n").unwrap();
    let mut app = App::load(SettingsStore::new(&path));
    assert_eq!(app.settings().timeout_seconds, 30);

    app.handle(Intent::OpenSettings);
    edit(&mut app, SettingsField::FallbackLanguage, "de");
    app.handle(Intent::SaveSettings);

    assert_eq!(app.settings().fallback_language, "en");
    assert!(app.settings_editor().is_some(), "editor stays open");
    assert_ne!(app.toast(), Some(NOTICE_SETTINGS_SAVED));
    assert_eq!(fs::read_to_string(&path).unwrap(), "timeout_seconds = 30\n");
}

#[tokio::test]
async fn write_failure_is_reported_and_not_applied() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    fs::write(&blocker, "").unwrap();
    let mut app = App::load(SettingsStore::new(blocker.join("settings.toml")));

    app.handle(Intent::OpenSettings);
    edit(&mut app, SettingsField::TimeoutSeconds, "10");
    app.handle(Intent::SaveSettings);

    assert_eq!(app.settings().timeout_seconds, 20);
    let toast = app.toast().unwrap();
    assert!(toast.starts_with("Failed to write settings"), "{toast}");
}

#[tokio::test]
async fn corrupt_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.toml");
    fs::write(&path, "timeout_seconds = \"soon\"").unwrap();

    let app = App::load(SettingsStore::new(&path));
    assert_eq!(app.settings(), &AppSettings::default());
}

#[tokio::test]
async fn stored_settings_that_fail_validation_are_not_used() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.toml");
    fs::write(&path, "timeout_seconds = 0\nbase_url = \"https://bot.example\"\n").unwrap();

    let app = App::load(SettingsStore::new(&path));
    assert_eq!(app.settings(), &AppSettings::default());
    assert!(app.settings().validate().is_ok());

    fs::write(&path, "fallback_language = \"de\"\n").unwrap();
    let app = App::load(SettingsStore::new(&path));
    assert_eq!(app.settings().fallback_language, "en");
}

#[tokio::test]
async fn enabling_after_disabled_notice_allows_dispatch() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.toml");
    fs::write(&path, "nanobot_enabled = false\n").unwrap();
    let mut app = App::load(SettingsStore::new(&path)).with_router(std::sync::Arc::new(
        nanokey_providers::DefaultRouting::new(
            nanokey_providers::MockDispatcher::with_delay(std::time::Duration::ZERO),
            nanokey_providers::HttpDispatcher::new(),
        ),
    ));

    type_text(&mut app, "hi");
    app.handle(Intent::Action(ActionMode::Reply));
    assert!(app.settings_editor().is_some());

    edit(&mut app, SettingsField::Enabled, "on");
    app.handle(Intent::SaveSettings);
    app.handle(Intent::Action(ActionMode::Reply));
    assert!(app.await_dispatch().await.is_some());
    assert!(fs::read_to_string(&path).unwrap().contains("nanobot_enabled = true"));
}
