//! Suggestion backend dispatch.
//!
//! # Architecture
//!
//! The crate is organized around one [`Dispatcher`] capability with two
//! implementations:
//!
//! - [`HttpDispatcher`] - `POST {baseUrl}/generate` against a real backend
//! - [`MockDispatcher`] - deterministic in-process candidates after a fixed delay
//!
//! A [`RoutingPolicy`] picks the implementation for the current
//! [`AppSettings`]. [`DefaultRouting`] sends everything to the mock when
//! `base_url` is `"mock"` or empty. Tests swap in their own policy.
//!
//! [`dispatch`] is the entry point: it validates the target text, builds the
//! [`BackendRequest`], emits the transport advisory, and hands back a
//! `'static` future the caller can spawn.
//!
//! # Error Handling
//!
//! Every failure is a [`DispatchError`]. Its `Display` text is the short
//! notice shown to the user. Nothing is retried.

mod health;
mod http;
mod mock;

pub use health::{HEALTH_TIMEOUT, MOCK_HEALTH_DELAY, describe_health};
pub use http::HttpDispatcher;
pub use mock::{DEFAULT_MOCK_DELAY, MOCK_DELAY_ENV, MOCK_LATENCY_MS, MockDispatcher, mock_response};

pub use nanokey_types;

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use nanokey_types::{
    ActionMode, AppSettings, BackendRequest, BackendResponse, LanguageContext, NonEmptyString,
};
use thiserror::Error;

const CONNECT_TIMEOUT_SECS: u64 = 10;
const TCP_KEEPALIVE_SECS: u64 = 60;
const POOL_MAX_IDLE_PER_HOST: usize = 8;
const POOL_IDLE_TIMEOUT_SECS: u64 = 90;

const MAX_ERROR_BODY_BYTES: usize = 32 * 1024;

/// Future returned by every dispatcher call.
pub type DispatchFuture<T> = BoxFuture<'static, Result<T, DispatchError>>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("No text found.")]
    EmptyInput,
    #[error("Backend unreachable (Timeout)")]
    Timeout,
    #[error("Backend error: {0}")]
    BackendError(u16),
    #[error("Invalid backend response")]
    InvalidResponse,
    #[error("Backend unreachable ({0})")]
    Network(String),
}

impl DispatchError {
    pub(crate) fn from_transport(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Network(transport_summary(err))
        }
    }
}

fn transport_summary(err: &reqwest::Error) -> String {
    if err.is_connect() {
        "connection failed".to_string()
    } else if err.is_request() {
        "request failed".to_string()
    } else {
        err.to_string()
    }
}

/// One way of producing suggestion candidates.
pub trait Dispatcher: Send + Sync {
    /// Route name used in logs (`mock`, `http`).
    fn name(&self) -> &'static str;

    fn generate(&self, request: BackendRequest, settings: &AppSettings)
    -> DispatchFuture<BackendResponse>;

    /// Connectivity probe for the settings screen. Resolves to a short status line.
    fn health(&self, settings: &AppSettings) -> DispatchFuture<String>;
}

/// Chooses the dispatcher for a call.
pub trait RoutingPolicy: Send + Sync {
    fn route(&self, settings: &AppSettings) -> Arc<dyn Dispatcher>;
}

/// Mock when `base_url` is the sentinel or empty, HTTP otherwise.
#[derive(Clone)]
pub struct DefaultRouting {
    mock: Arc<MockDispatcher>,
    http: Arc<HttpDispatcher>,
}

impl DefaultRouting {
    #[must_use]
    pub fn new(mock: MockDispatcher, http: HttpDispatcher) -> Self {
        Self {
            mock: Arc::new(mock),
            http: Arc::new(http),
        }
    }
}

impl Default for DefaultRouting {
    fn default() -> Self {
        Self::new(MockDispatcher::from_env(), HttpDispatcher::new())
    }
}

impl RoutingPolicy for DefaultRouting {
    fn route(&self, settings: &AppSettings) -> Arc<dyn Dispatcher> {
        if settings.uses_mock() {
            self.mock.clone()
        } else {
            self.http.clone()
        }
    }
}

/// Routing that always answers with the same dispatcher.
pub struct FixedRouting(pub Arc<dyn Dispatcher>);

impl RoutingPolicy for FixedRouting {
    fn route(&self, _settings: &AppSettings) -> Arc<dyn Dispatcher> {
        self.0.clone()
    }
}

/// Build the request for `target_text` and start it on the routed dispatcher.
///
/// Empty or whitespace-only text fails with [`DispatchError::EmptyInput`]
/// before any dispatcher is touched.
pub fn dispatch(
    router: &dyn RoutingPolicy,
    target_text: &str,
    mode: ActionMode,
    settings: &AppSettings,
    language: &LanguageContext,
) -> DispatchFuture<BackendResponse> {
    let Ok(text) = NonEmptyString::new(target_text) else {
        return futures_util::future::ready(Err(DispatchError::EmptyInput)).boxed();
    };

    warn_if_insecure(settings);

    let dispatcher = router.route(settings);
    tracing::debug!(
        mode = mode.as_str(),
        route = dispatcher.name(),
        language = %language.language_id,
        text_len = text.len(),
        "Dispatching suggestion request"
    );

    let request = BackendRequest::new(mode, text, language);
    dispatcher.generate(request, settings)
}

/// Run the connectivity probe on the routed dispatcher.
pub fn check_health(router: &dyn RoutingPolicy, settings: &AppSettings) -> DispatchFuture<String> {
    router.route(settings).health(settings)
}

/// Log a warning for plain-HTTP backends outside dev mode. Never blocks.
pub fn warn_if_insecure(settings: &AppSettings) -> bool {
    let insecure = settings.is_insecure_transport();
    if insecure {
        tracing::warn!(
            base_url = %settings.base_url,
            "Security warning: HTTP used without dev mode"
        );
    }
    insecure
}

/// Shared HTTP client.
///
/// Redirects are not followed. Per-call deadlines come from the settings, so
/// the client itself only bounds the connect phase.
pub fn http_client() -> &'static reqwest::Client {
    static CLIENT: OnceLock<reqwest::Client> = OnceLock::new();
    CLIENT.get_or_init(|| {
        base_client_builder().build().unwrap_or_else(|e| {
            tracing::error!("Failed to build HTTP client: {e}. Falling back to defaults.");
            reqwest::Client::new()
        })
    })
}

fn base_client_builder() -> reqwest::ClientBuilder {
    reqwest::Client::builder()
        .user_agent(concat!("nanokey/", env!("CARGO_PKG_VERSION")))
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .redirect(reqwest::redirect::Policy::none())
        .tcp_keepalive(Some(Duration::from_secs(TCP_KEEPALIVE_SECS)))
        .pool_max_idle_per_host(POOL_MAX_IDLE_PER_HOST)
        .pool_idle_timeout(Some(Duration::from_secs(POOL_IDLE_TIMEOUT_SECS)))
}

pub async fn read_capped_error_body(response: reqwest::Response) -> String {
    use futures_util::StreamExt;
    let mut body = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let Ok(chunk) = chunk else { break };
        body.extend_from_slice(&chunk);
        if body.len() > MAX_ERROR_BODY_BYTES {
            body.truncate(MAX_ERROR_BODY_BYTES);
            let text = String::from_utf8_lossy(&body);
            return format!("{text}...(truncated)");
        }
    }
    String::from_utf8_lossy(&body).into_owned()
}
