use nanokey_types::{AppSettings, BackendType, EnumParseError, LanguagePreference};
use thiserror::Error;

/// One editable field on the settings screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsField {
    Enabled,
    BackendType,
    BaseUrl,
    TimeoutSeconds,
    DevMode,
    FallbackLanguage,
    ReplyLanguage,
    TranslateTarget,
}

impl SettingsField {
    pub const ALL: [Self; 8] = [
        Self::Enabled,
        Self::BackendType,
        Self::BaseUrl,
        Self::TimeoutSeconds,
        Self::DevMode,
        Self::FallbackLanguage,
        Self::ReplyLanguage,
        Self::TranslateTarget,
    ];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Enabled => "enabled",
            Self::BackendType => "backend",
            Self::BaseUrl => "url",
            Self::TimeoutSeconds => "timeout",
            Self::DevMode => "dev",
            Self::FallbackLanguage => "fallback",
            Self::ReplyLanguage => "reply",
            Self::TranslateTarget => "translate",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, SettingsInputError> {
        let raw = raw.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|field| field.key() == raw)
            .ok_or(SettingsInputError::UnknownField(raw))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsInputError {
    #[error("Unknown setting '{0}'")]
    UnknownField(String),
    #[error("Expected on/off, got '{0}'")]
    InvalidToggle(String),
    #[error("Expected a whole number of seconds, got '{0}'")]
    InvalidNumber(String),
    #[error(transparent)]
    Backend(#[from] EnumParseError),
}

fn parse_toggle(raw: &str) -> Result<bool, SettingsInputError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Ok(true),
        "off" | "false" | "no" | "0" => Ok(false),
        _ => Err(SettingsInputError::InvalidToggle(raw.to_string())),
    }
}

#[must_use]
pub fn on_off(value: bool) -> &'static str {
    if value { "on" } else { "off" }
}

/// Settings screen state: the live settings as a baseline and a draft the
/// user edits. Nothing reaches the live settings until the draft is saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsEditor {
    baseline: AppSettings,
    draft: AppSettings,
    test_result: Option<String>,
}

impl SettingsEditor {
    #[must_use]
    pub fn new(initial: AppSettings) -> Self {
        Self {
            baseline: initial.clone(),
            draft: initial,
            test_result: None,
        }
    }

    #[must_use]
    pub fn draft(&self) -> &AppSettings {
        &self.draft
    }

    #[must_use]
    pub fn baseline(&self) -> &AppSettings {
        &self.baseline
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.draft != self.baseline
    }

    /// Result line of the last connection test.
    #[must_use]
    pub fn test_result(&self) -> Option<&str> {
        self.test_result.as_deref()
    }

    pub(crate) fn set_test_result(&mut self, result: Option<String>) {
        self.test_result = result;
    }

    /// Parse `raw` into `field` on the draft.
    ///
    /// Range checks wait for save; only the shape of the value is checked here.
    pub fn set(&mut self, field: SettingsField, raw: &str) -> Result<(), SettingsInputError> {
        let value = raw.trim();
        match field {
            SettingsField::Enabled => self.draft.nanobot_enabled = parse_toggle(value)?,
            SettingsField::BackendType => self.draft.backend_type = BackendType::parse(value)?,
            SettingsField::BaseUrl => self.draft.base_url = value.to_string(),
            SettingsField::TimeoutSeconds => {
                self.draft.timeout_seconds = value
                    .parse()
                    .map_err(|_| SettingsInputError::InvalidNumber(value.to_string()))?;
            }
            SettingsField::DevMode => self.draft.dev_mode = parse_toggle(value)?,
            SettingsField::FallbackLanguage => {
                self.draft.fallback_language = value.to_ascii_lowercase();
            }
            SettingsField::ReplyLanguage => {
                self.draft.reply_language = LanguagePreference::from(value.to_string());
            }
            SettingsField::TranslateTarget => {
                self.draft.translate_target = LanguagePreference::from(value.to_string());
            }
        }
        self.test_result = None;
        Ok(())
    }

    /// Current draft value of `field`, formatted the way `set` accepts it.
    #[must_use]
    pub fn display(&self, field: SettingsField) -> String {
        let draft = &self.draft;
        match field {
            SettingsField::Enabled => on_off(draft.nanobot_enabled).to_string(),
            SettingsField::BackendType => draft.backend_type.to_string(),
            SettingsField::BaseUrl => draft.base_url.clone(),
            SettingsField::TimeoutSeconds => draft.timeout_seconds.to_string(),
            SettingsField::DevMode => on_off(draft.dev_mode).to_string(),
            SettingsField::FallbackLanguage => draft.fallback_language.clone(),
            SettingsField::ReplyLanguage => draft.reply_language.to_string(),
            SettingsField::TranslateTarget => draft.translate_target.to_string(),
        }
    }

    pub(crate) fn into_draft(self) -> AppSettings {
        self.draft
    }
}
