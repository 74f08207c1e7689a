//! In-process backend stand-in.

use std::time::Duration;

use futures_util::FutureExt;
use nanokey_types::{
    ActionMode, AppSettings, BackendRequest, BackendResponse, Candidate, ResponseDebug,
};

use crate::health::MOCK_HEALTH_DELAY;
use crate::{DispatchFuture, Dispatcher};

pub const DEFAULT_MOCK_DELAY: Duration = Duration::from_millis(600);

/// Latency the mock reports in `debug.latencyMs`.
pub const MOCK_LATENCY_MS: f64 = 600.0;

/// Overrides [`DEFAULT_MOCK_DELAY`] in milliseconds.
pub const MOCK_DELAY_ENV: &str = "NANOKEY_MOCK_DELAY_MS";

/// Answers every request from [`mock_response`] after a fixed delay.
///
/// The delay is not cancellable; dropping the future is the only way out.
#[derive(Debug, Clone, Copy)]
pub struct MockDispatcher {
    delay: Duration,
}

impl MockDispatcher {
    #[must_use]
    pub const fn with_delay(delay: Duration) -> Self {
        Self { delay }
    }

    /// Default delay unless `NANOKEY_MOCK_DELAY_MS` holds a positive integer.
    #[must_use]
    pub fn from_env() -> Self {
        Self::with_delay(parse_delay(std::env::var(MOCK_DELAY_ENV).ok().as_deref()))
    }

    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for MockDispatcher {
    fn default() -> Self {
        Self::with_delay(DEFAULT_MOCK_DELAY)
    }
}

fn parse_delay(raw: Option<&str>) -> Duration {
    raw.and_then(|value| value.trim().parse::<u64>().ok())
        .filter(|ms| *ms > 0)
        .map_or(DEFAULT_MOCK_DELAY, Duration::from_millis)
}

impl Dispatcher for MockDispatcher {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn generate(
        &self,
        request: BackendRequest,
        settings: &AppSettings,
    ) -> DispatchFuture<BackendResponse> {
        let delay = self.delay;
        let backend = settings.backend_type;
        async move {
            tokio::time::sleep(delay).await;
            let response = mock_response(
                request.mode,
                request.text.as_str(),
                backend.as_str(),
                &request.meta.keyboard_language,
            );
            tracing::debug!(
                mode = request.mode.as_str(),
                candidates = response.candidates.len(),
                "Mock backend answered"
            );
            Ok(response)
        }
        .boxed()
    }

    fn health(&self, _settings: &AppSettings) -> DispatchFuture<String> {
        async {
            tokio::time::sleep(MOCK_HEALTH_DELAY).await;
            Ok("Mock Backend Ready".to_string())
        }
        .boxed()
    }
}

/// Canned candidates for `(mode, text, backend, language)`.
///
/// Pure: identical inputs always give identical output.
#[must_use]
pub fn mock_response(mode: ActionMode, text: &str, backend: &str, language: &str) -> BackendResponse {
    let candidates: [String; 2] = match mode {
        ActionMode::Reply => {
            let [yes, no] = match language {
                "is" => ["Já, það hljómar vel.", "Nei, ég kemst ekki."],
                "ru" => ["Да, конечно.", "Нет, извините."],
                _ => ["Yes, sounds good.", "No, I can't make it."],
            };
            [yes.to_string(), no.to_string()]
        }
        ActionMode::Rewrite => [format!("{text} (Formal)"), format!("{text} (Concise)")],
        ActionMode::Translate => {
            let [first, second] = if language == "is" {
                ["EN", "DK"]
            } else {
                ["IS", "ES"]
            };
            [format!("[{first}] {text}"), format!("[{second}] {text}")]
        }
    };

    BackendResponse {
        candidates: candidates.into_iter().map(Candidate::new).collect(),
        actions: Vec::new(),
        debug: Some(ResponseDebug {
            backend: backend.to_string(),
            latency_ms: MOCK_LATENCY_MS,
        }),
    }
}
