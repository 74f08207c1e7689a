//! The app against a real HTTP backend served by wiremock.

use std::time::Duration;

use nanokey_engine::{ActionMode, AppSettings, DispatchError, Intent, SessionEvent, Selection};
use nanokey_providers::warn_if_insecure;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{
    app_with, generate_body, mount_generate, mount_generate_status, mount_health, settings_for,
    type_text,
};

#[tokio::test]
async fn request_carries_mode_text_and_language() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/generate"))
        .and(body_partial_json(serde_json::json!({
            "client": "nanokey",
            "version": "0.1",
            "mode": "rewrite",
            "text": "world",
            "app": { "package": "com.facebook.orca", "displayName": "Messenger" },
            "meta": { "keyboardLanguage": "ru" }
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(generate_body(&["мир", "world!", "third"], "clawdbot", 12.5)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut app = app_with(settings_for(&server));
    app.handle(Intent::PickLanguage("ru".to_string()));
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
    let presentation = app.session().presentation().unwrap();
    assert_eq!(presentation.header().as_deref(), Some("clawdbot • 12.5ms"));

    app.handle(Intent::SelectCandidate(0));
    assert_eq!(app.composer().text(), "Hello мир");
    assert_eq!(app.composer().selection(), Selection::caret(9));
}

#[tokio::test]
async fn trailing_slash_in_base_url_is_ignored() {
    let server = MockServer::start().await;
    mount_generate(&server, &["ok"]).await;

    let mut settings = settings_for(&server);
    settings.base_url.push('/');
    let mut app = app_with(settings);
    type_text(&mut app, "hi");
    app.handle(Intent::Action(ActionMode::Reply));

    let event = app.await_dispatch().await.unwrap();
    assert!(matches!(event, SessionEvent::Presented { candidates: 1, .. }), "{event:?}");
}

#[tokio::test]
async fn server_error_becomes_toast() {
    let server = MockServer::start().await;
    mount_generate_status(&server, 503).await;

    let mut app = app_with(settings_for(&server));
    type_text(&mut app, "hi");
    app.handle(Intent::Action(ActionMode::Reply));

    let event = app.await_dispatch().await.unwrap();
    assert_eq!(
        event,
        SessionEvent::Failed {
            mode: ActionMode::Reply,
            error: DispatchError::BackendError(503)
        }
    );
    assert_eq!(app.toast(), Some("Backend error: 503"));
    assert_eq!(app.session().state().label(), "idle");
    assert_eq!(app.composer().text(), "hi");
}

#[tokio::test]
async fn body_without_candidates_is_invalid() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "actions": [] })))
        .mount(&server)
        .await;

    let mut app = app_with(settings_for(&server));
    type_text(&mut app, "hi");
    app.handle(Intent::Action(ActionMode::Reply));
    app.await_dispatch().await;
    assert_eq!(app.toast(), Some("Invalid backend response"));
}

#[tokio::test]
async fn slow_backend_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/generate"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(generate_body(&["late"], "nanobot", 1.0))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let mut settings = settings_for(&server);
    settings.timeout_seconds = 1;
    let mut app = app_with(settings);
    type_text(&mut app, "hi");
    app.handle(Intent::Action(ActionMode::Reply));

    let event = app.await_dispatch().await.unwrap();
    assert!(
        matches!(event, SessionEvent::Failed { error: DispatchError::Timeout, .. }),
        "{event:?}"
    );
    assert_eq!(app.toast(), Some("Backend unreachable (Timeout)"));
}

#[tokio::test]
async fn second_action_while_in_flight_sends_one_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/generate"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(generate_body(&["one"], "nanobot", 1.0))
                .set_delay(Duration::from_millis(200)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut app = app_with(settings_for(&server));
    type_text(&mut app, "hi");
    app.handle(Intent::Action(ActionMode::Reply));
    app.handle(Intent::Action(ActionMode::Translate));
    let event = app.await_dispatch().await.unwrap();
    assert!(matches!(
        event,
        SessionEvent::Presented {
            mode: ActionMode::Reply,
            ..
        }
    ));
}

#[tokio::test]
async fn plain_http_without_dev_mode_is_flagged_but_sent() {
    let server = MockServer::start().await;
    mount_generate(&server, &["sent anyway"]).await;

    let settings = AppSettings {
        dev_mode: false,
        ..settings_for(&server)
    };
    assert!(warn_if_insecure(&settings));
    assert!(!warn_if_insecure(&settings_for(&server)));

    let mut app = app_with(settings);
    type_text(&mut app, "hi");
    app.handle(Intent::Action(ActionMode::Reply));
    let event = app.await_dispatch().await.unwrap();
    assert!(matches!(event, SessionEvent::Presented { .. }), "{event:?}");
}

#[tokio::test]
async fn connection_test_reports_status() {
    let server = MockServer::start().await;
    mount_health(&server, 200).await;

    let mut app = app_with(settings_for(&server));
    app.handle(Intent::OpenSettings);
    app.handle(Intent::TestConnection);
    assert_eq!(app.await_health().await.as_deref(), Some("Success: 200 OK"));
}

#[tokio::test]
async fn connection_test_uses_draft_url() {
    let server = MockServer::start().await;
    mount_health(&server, 500).await;

    let mut app = app_with(AppSettings::default());
    app.handle(Intent::OpenSettings);
    app.handle(Intent::EditSetting {
        field: nanokey_engine::SettingsField::BaseUrl,
        value: server.uri(),
    });
    app.handle(Intent::TestConnection);
    assert_eq!(app.await_health().await.as_deref(), Some("Error: 500"));
    // Testing never applies the draft.
    assert_eq!(app.settings(), &AppSettings::default());
}

#[tokio::test]
async fn unreachable_backend_reports_network_error() {
    let mut app = app_with(AppSettings {
        base_url: "http://127.0.0.1:9".to_string(),
        dev_mode: true,
        ..AppSettings::default()
    });
    app.handle(Intent::OpenSettings);
    app.handle(Intent::TestConnection);
    assert_eq!(
        app.await_health().await.as_deref(),
        Some("Error: Unreachable")
    );
}
