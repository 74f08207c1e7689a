//! Shared test utilities and fixtures
//!
//! Common infrastructure for integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use nanokey_engine::{App, AppSettings, Intent, MemoryClipboard};
use nanokey_providers::{DefaultRouting, HttpDispatcher, MockDispatcher};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Settings pointing at `server`, with dev mode on so no HTTP advisory fires.
pub fn settings_for(server: &MockServer) -> AppSettings {
    AppSettings {
        base_url: server.uri(),
        dev_mode: true,
        ..AppSettings::default()
    }
}

/// App with real routing, an instant mock, and an in-memory clipboard.
pub fn app_with(settings: AppSettings) -> App {
    App::new(settings)
        .with_router(Arc::new(DefaultRouting::new(
            MockDispatcher::with_delay(Duration::ZERO),
            HttpDispatcher::new(),
        )))
        .with_clipboard(MemoryClipboard::default())
}

pub fn type_text(app: &mut App, text: &str) {
    for ch in text.chars() {
        app.handle(Intent::Key(ch.to_string()));
    }
}

pub fn generate_body(candidates: &[&str], backend: &str, latency_ms: f64) -> serde_json::Value {
    let candidates: Vec<_> = candidates
        .iter()
        .map(|text| serde_json::json!({ "text": text }))
        .collect();
    serde_json::json!({
        "candidates": candidates,
        "actions": [],
        "debug": { "backend": backend, "latencyMs": latency_ms }
    })
}

/// Answer every `POST /generate` with `candidates`.
pub async fn mount_generate(server: &MockServer, candidates: &[&str]) {
    Mock::given(method("POST"))
        .and(path("/generate"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(generate_body(candidates, "nanobot", 42.0)),
        )
        .mount(server)
        .await;
}

/// Answer `POST /generate` with a bare status code.
pub async fn mount_generate_status(server: &MockServer, status: u16) {
    Mock::given(method("POST"))
        .and(path("/generate"))
        .respond_with(ResponseTemplate::new(status).set_body_string("upstream failure"))
        .mount(server)
        .await;
}

pub async fn mount_health(server: &MockServer, status: u16) {
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}
