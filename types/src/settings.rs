//! Process-wide application settings.
//!
//! `AppSettings` is the resolved form the rest of the app reads. Every field
//! carries a serde default, so a stored record with missing keys is merged
//! shallowly over the initial configuration at the parse boundary.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{ActionMode, BackendType, KeyboardLayout, LayoutRegistry};

/// Sentinel `base_url` that routes every request to the in-process mock.
pub const MOCK_BASE_URL: &str = "mock";

/// Language preference value meaning "follow the active keyboard layout".
pub const KEYBOARD_LANGUAGE: &str = "keyboard";

pub const DEFAULT_TIMEOUT_SECS: u64 = 20;
pub const MIN_TIMEOUT_SECS: u64 = 1;
pub const MAX_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    #[error("Timeout must be between {MIN_TIMEOUT_SECS} and {MAX_TIMEOUT_SECS} seconds (got {0})")]
    TimeoutOutOfRange(u64),
    #[error("Unknown fallback language '{0}'")]
    UnknownFallbackLanguage(String),
    #[error("Unknown {field} language '{id}'")]
    UnknownLanguage { field: &'static str, id: String },
}

/// Which language an action should produce output in.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LanguagePreference {
    /// Use whatever layout is active when the action fires.
    #[default]
    Keyboard,
    /// Always use this language id.
    Fixed(String),
}

impl LanguagePreference {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Keyboard => KEYBOARD_LANGUAGE,
            Self::Fixed(id) => id,
        }
    }

    fn resolve<'a>(&'a self, keyboard_language: &'a str) -> &'a str {
        match self {
            Self::Keyboard => keyboard_language,
            Self::Fixed(id) => id,
        }
    }

    fn validate(&self, field: &'static str) -> Result<(), SettingsError> {
        match self {
            Self::Keyboard => Ok(()),
            Self::Fixed(id) if LayoutRegistry::contains(id) => Ok(()),
            Self::Fixed(id) => Err(SettingsError::UnknownLanguage {
                field,
                id: id.clone(),
            }),
        }
    }
}

impl From<String> for LanguagePreference {
    fn from(value: String) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(KEYBOARD_LANGUAGE) {
            Self::Keyboard
        } else {
            Self::Fixed(trimmed.to_ascii_lowercase())
        }
    }
}

impl From<LanguagePreference> for String {
    fn from(value: LanguagePreference) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for LanguagePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Backend and language-behavior configuration.
///
/// Loaded once at startup and replaced only by an explicit save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Main integration toggle. When off, actions never dispatch.
    pub nanobot_enabled: bool,
    pub backend_type: BackendType,
    /// Backend root, or [`MOCK_BASE_URL`].
    pub base_url: String,
    pub timeout_seconds: u64,
    /// Allow plain-HTTP backends without a warning.
    pub dev_mode: bool,
    pub fallback_language: String,
    pub reply_language: LanguagePreference,
    pub translate_target: LanguagePreference,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            nanobot_enabled: true,
            backend_type: BackendType::Nanobot,
            base_url: MOCK_BASE_URL.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
            dev_mode: false,
            fallback_language: "en".to_string(),
            reply_language: LanguagePreference::Keyboard,
            translate_target: LanguagePreference::Keyboard,
        }
    }
}

impl AppSettings {
    /// Whether requests go to the in-process mock instead of the network.
    ///
    /// An empty `base_url` counts as unset and also routes to the mock.
    #[must_use]
    pub fn uses_mock(&self) -> bool {
        let url = self.base_url.trim();
        url.is_empty() || url.eq_ignore_ascii_case(MOCK_BASE_URL)
    }

    /// `base_url` without surrounding whitespace or trailing slashes.
    #[must_use]
    pub fn normalized_base_url(&self) -> &str {
        self.base_url.trim().trim_end_matches('/')
    }

    /// Plain HTTP outside dev mode. Advisory only; the call still proceeds.
    #[must_use]
    pub fn is_insecure_transport(&self) -> bool {
        !self.dev_mode
            && self
                .base_url
                .trim_start()
                .get(..5)
                .is_some_and(|scheme| scheme.eq_ignore_ascii_case("http:"))
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Layout whose language an action of `mode` should use.
    ///
    /// Reply and Translate honor their overrides; Rewrite always follows the
    /// keyboard. Ids missing from the registry fall back to
    /// `fallback_language`.
    #[must_use]
    pub fn language_for(&self, mode: ActionMode, keyboard_language: &str) -> &'static KeyboardLayout {
        let id = match mode {
            ActionMode::Reply => self.reply_language.resolve(keyboard_language),
            ActionMode::Translate => self.translate_target.resolve(keyboard_language),
            ActionMode::Rewrite => keyboard_language,
        };
        LayoutRegistry::resolve(id, &self.fallback_language)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(MIN_TIMEOUT_SECS..=MAX_TIMEOUT_SECS).contains(&self.timeout_seconds) {
            return Err(SettingsError::TimeoutOutOfRange(self.timeout_seconds));
        }
        if !LayoutRegistry::contains(&self.fallback_language) {
            return Err(SettingsError::UnknownFallbackLanguage(
                self.fallback_language.clone(),
            ));
        }
        self.reply_language.validate("reply")?;
        self.translate_target.validate("translate")?;
        Ok(())
    }
}
