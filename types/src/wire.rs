//! Backend request/response contract.
//!
//! Field names are camelCase on the wire:
//!
//! ```json
//! {
//!   "client": "nanokey",
//!   "version": "0.1",
//!   "mode": "rewrite",
//!   "text": "world",
//!   "app": { "package": "com.facebook.orca", "displayName": "Messenger" },
//!   "meta": { "keyboardLanguage": "en", "locale": "en-US", "preferredLanguages": ["en", "is", "ru", "es"] }
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::{ActionMode, LanguageContext, NonEmptyString};

pub const CLIENT_ID: &str = "nanokey";
pub const PROTOCOL_VERSION: &str = "0.1";
pub const APP_PACKAGE: &str = "com.facebook.orca";
pub const APP_DISPLAY_NAME: &str = "Messenger";

/// Number of candidates the results overlay shows.
pub const MAX_VISIBLE_CANDIDATES: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppContext {
    pub package: String,
    pub display_name: String,
}

impl Default for AppContext {
    fn default() -> Self {
        Self {
            package: APP_PACKAGE.to_string(),
            display_name: APP_DISPLAY_NAME.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestMeta {
    pub keyboard_language: String,
    pub locale: String,
    pub preferred_languages: Vec<String>,
}

impl From<&LanguageContext> for RequestMeta {
    fn from(ctx: &LanguageContext) -> Self {
        Self {
            keyboard_language: ctx.language_id.clone(),
            locale: ctx.locale.clone(),
            preferred_languages: ctx.preferred_languages.clone(),
        }
    }
}

/// Payload for `POST {baseUrl}/generate`. Built once per invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendRequest {
    pub client: String,
    pub version: String,
    pub mode: ActionMode,
    pub text: NonEmptyString,
    pub app: AppContext,
    pub meta: RequestMeta,
}

impl BackendRequest {
    #[must_use]
    pub fn new(mode: ActionMode, text: NonEmptyString, language: &LanguageContext) -> Self {
        Self {
            client: CLIENT_ID.to_string(),
            version: PROTOCOL_VERSION.to_string(),
            mode,
            text,
            app: AppContext::default(),
            meta: RequestMeta::from(language),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub text: String,
}

impl Candidate {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseDebug {
    pub backend: String,
    pub latency_ms: f64,
}

/// Body of a successful generate call.
///
/// `candidates` is required; a body without it does not deserialize.
/// `actions` is reserved and passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendResponse {
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub actions: Vec<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug: Option<ResponseDebug>,
}

impl BackendResponse {
    /// The candidates the overlay shows: at most [`MAX_VISIBLE_CANDIDATES`].
    #[must_use]
    pub fn visible_candidates(&self) -> &[Candidate] {
        let end = self.candidates.len().min(MAX_VISIBLE_CANDIDATES);
        &self.candidates[..end]
    }

    /// Overlay header text, e.g. `nanobot • 600ms`.
    #[must_use]
    pub fn debug_summary(&self) -> Option<String> {
        self.debug
            .as_ref()
            .map(|debug| format!("{} • {}ms", debug.backend, debug.latency_ms))
    }
}
