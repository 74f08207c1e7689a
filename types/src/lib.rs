//! Core domain types for NanoKey.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies.
//! Everything here can be used from any layer of the application.

// Pedantic lint configuration - these are intentional design choices
#![allow(clippy::missing_errors_doc)] // Result-returning functions are self-explanatory

mod layout;
mod settings;
mod wire;

pub use layout::{KeyboardLayout, LanguageContext, LayoutRegistry};
pub use settings::{
    AppSettings, DEFAULT_TIMEOUT_SECS, KEYBOARD_LANGUAGE, LanguagePreference, MAX_TIMEOUT_SECS,
    MIN_TIMEOUT_SECS, MOCK_BASE_URL, SettingsError,
};
pub use wire::{
    APP_DISPLAY_NAME, APP_PACKAGE, AppContext, BackendRequest, BackendResponse, CLIENT_ID,
    Candidate, MAX_VISIBLE_CANDIDATES, PROTOCOL_VERSION, RequestMeta, ResponseDebug,
};

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// ============================================================================
// NonEmpty String Types
// ============================================================================

/// A string guaranteed to be non-empty (after trimming).
///
/// Target text handed to a backend is always one of these; holding the value
/// is the proof that the empty-input check already ran.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NonEmptyString(String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("No text found.")]
pub struct EmptyStringError;

impl NonEmptyString {
    pub fn new(value: impl Into<String>) -> Result<Self, EmptyStringError> {
        let value = value.into();
        if value.trim().is_empty() {
            Err(EmptyStringError)
        } else {
            Ok(Self(value))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

}

impl TryFrom<String> for NonEmptyString {
    type Error = EmptyStringError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for NonEmptyString {
    type Error = EmptyStringError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<NonEmptyString> for String {
    fn from(value: NonEmptyString) -> Self {
        value.0
    }
}

impl std::ops::Deref for NonEmptyString {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

impl AsRef<str> for NonEmptyString {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for NonEmptyString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Enum parsing
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumKind {
    ActionMode,
    BackendType,
}

impl EnumKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            EnumKind::ActionMode => "action mode",
            EnumKind::BackendType => "backend type",
        }
    }
}

impl fmt::Display for EnumKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {kind} value '{raw}'; expected one of: {expected:?}")]
pub struct EnumParseError {
    kind: EnumKind,
    raw: String,
    expected: &'static [&'static str],
}

impl EnumParseError {
    #[must_use]
    pub fn new(kind: EnumKind, raw: impl Into<String>, expected: &'static [&'static str]) -> Self {
        Self {
            kind,
            raw: raw.into(),
            expected,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> EnumKind {
        self.kind
    }
}

// ============================================================================
// Action Modes
// ============================================================================

/// The AI action bound to one action-bar button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionMode {
    Reply,
    Rewrite,
    Translate,
}

const ACTION_MODE_PARSE_VALUES: &[&str] = &["reply", "rewrite", "translate"];

impl ActionMode {
    pub const ALL: [Self; 3] = [Self::Reply, Self::Rewrite, Self::Translate];

    /// Wire value sent in `BackendRequest::mode`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Reply => "reply",
            Self::Rewrite => "rewrite",
            Self::Translate => "translate",
        }
    }

    /// Short caption shown on the action bar.
    #[must_use]
    pub const fn button_label(self) -> &'static str {
        match self {
            Self::Reply => "REPLY",
            Self::Rewrite => "RWR",
            Self::Translate => "TRN",
        }
    }

    /// Parse a mode name. `gen`/`generate` are accepted for the older
    /// action bar, where the first button was "generate".
    pub fn parse(raw: &str) -> Result<Self, EnumParseError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "reply" | "gen" | "generate" => Ok(Self::Reply),
            "rewrite" | "rwr" => Ok(Self::Rewrite),
            "translate" | "trn" => Ok(Self::Translate),
            _ => Err(EnumParseError::new(
                EnumKind::ActionMode,
                raw,
                ACTION_MODE_PARSE_VALUES,
            )),
        }
    }
}

impl fmt::Display for ActionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Backend Types
// ============================================================================

/// Backend family label. Echoed by the mock backend in `debug.backend`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendType {
    #[default]
    Nanobot,
    Clawdbot,
    Custom,
}

const BACKEND_TYPE_PARSE_VALUES: &[&str] = &["nanobot", "clawdbot", "custom"];

impl BackendType {
    pub const ALL: [Self; 3] = [Self::Nanobot, Self::Clawdbot, Self::Custom];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Nanobot => "nanobot",
            Self::Clawdbot => "clawdbot",
            Self::Custom => "custom",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, EnumParseError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "nanobot" => Ok(Self::Nanobot),
            "clawdbot" => Ok(Self::Clawdbot),
            "custom" => Ok(Self::Custom),
            _ => Err(EnumParseError::new(
                EnumKind::BackendType,
                raw,
                BACKEND_TYPE_PARSE_VALUES,
            )),
        }
    }
}

impl fmt::Display for BackendType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
