//! Settings persistence.
//!
//! Settings live in a flat TOML file, `~/.nanokey/settings.toml` by default:
//!
//! ```toml
//! # NanoKey settings
//! nanobot_enabled = true
//! backend_type = "nanobot"
//! base_url = "mock"
//! timeout_seconds = 20
//! dev_mode = false
//! fallback_language = "en"
//! reply_language = "keyboard"
//! translate_target = "keyboard"
//! ```
//!
//! Missing keys take their defaults. Saving edits the document in place so
//! comments and unknown keys survive.

mod atomic_write;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use nanokey_types::{AppSettings, SettingsError};
use thiserror::Error;

pub use atomic_write::atomic_write;

/// Overrides the settings file location.
pub const SETTINGS_PATH_ENV: &str = "NANOKEY_SETTINGS_PATH";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not determine settings path")]
    NoPath,
    #[error("Failed to read settings at {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("Failed to parse settings at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Settings file at {} is not editable TOML: {source}", path.display())]
    Edit {
        path: PathBuf,
        source: toml_edit::TomlError,
    },
    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Failed to write settings at {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
    #[error(transparent)]
    Invalid(#[from] SettingsError),
}

impl ConfigError {
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Read { path, .. }
            | Self::Parse { path, .. }
            | Self::Edit { path, .. }
            | Self::Write { path, .. } => Some(path),
            Self::NoPath | Self::Serialize(_) | Self::Invalid(_) => None,
        }
    }
}

/// Default settings location, honoring [`SETTINGS_PATH_ENV`].
#[must_use]
pub fn settings_path() -> Option<PathBuf> {
    if let Some(custom) = std::env::var_os(SETTINGS_PATH_ENV)
        && !custom.is_empty()
    {
        return Some(PathBuf::from(custom));
    }
    dirs::home_dir().map(|home| home.join(".nanokey").join("settings.toml"))
}

/// Reads and writes one settings file.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at [`settings_path`].
    pub fn open_default() -> Result<Self, ConfigError> {
        settings_path().map(Self::new).ok_or(ConfigError::NoPath)
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stored settings, or `None` when the file does not exist.
    ///
    /// Values that `save` would reject fail with [`ConfigError::Invalid`].
    pub fn load(&self) -> Result<Option<AppSettings>, ConfigError> {
        let path = &self.path;
        if !path.exists() {
            return Ok(None);
        }

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!(path = %path.display(), "Failed to read settings: {err}");
                return Err(ConfigError::Read {
                    path: path.clone(),
                    source: err,
                });
            }
        };

        let settings: AppSettings = match toml::from_str(&content) {
            Ok(settings) => settings,
            Err(err) => {
                tracing::warn!(path = %path.display(), "Failed to parse settings: {err}");
                return Err(ConfigError::Parse {
                    path: path.clone(),
                    source: err,
                });
            }
        };

        if let Err(err) = settings.validate() {
            tracing::warn!(path = %path.display(), "Stored settings are invalid: {err}");
            return Err(ConfigError::Invalid(err));
        }
        Ok(Some(settings))
    }

    /// Stored settings, falling back to defaults on any error.
    #[must_use]
    pub fn load_or_default(&self) -> AppSettings {
        match self.load() {
            Ok(Some(settings)) => settings,
            Ok(None) => AppSettings::default(),
            Err(err) => {
                tracing::warn!("Using default settings: {err}");
                AppSettings::default()
            }
        }
    }

    /// Validate and persist `settings`.
    ///
    /// Creates the parent directory if needed. On Unix the directory is
    /// tightened to 0o700 and the file written as 0o600.
    pub fn save(&self, settings: &AppSettings) -> Result<(), ConfigError> {
        settings.validate()?;

        let path = &self.path;
        let write_err = |source: io::Error| ConfigError::Write {
            path: path.clone(),
            source,
        };

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(write_err)?;
            #[cfg(unix)]
            restrict_dir_permissions(parent).map_err(write_err)?;
        }

        let existing = if path.exists() {
            fs::read_to_string(path).map_err(|source| ConfigError::Read {
                path: path.clone(),
                source,
            })?
        } else {
            String::new()
        };

        let serialized = merge_into_document(&existing, settings).map_err(|err| match err {
            MergeError::Existing(source) => ConfigError::Edit {
                path: path.clone(),
                source,
            },
            MergeError::Serialize(source) => ConfigError::Serialize(source),
        })?;

        atomic_write(path, serialized.as_bytes(), Some(0o600)).map_err(write_err)?;
        tracing::info!(path = %path.display(), "Settings saved");
        Ok(())
    }
}

enum MergeError {
    Existing(toml_edit::TomlError),
    Serialize(toml::ser::Error),
}

/// Overwrite every settings key in `existing`, keeping comments and other keys.
fn merge_into_document(existing: &str, settings: &AppSettings) -> Result<String, MergeError> {
    let mut doc = existing
        .parse::<toml_edit::DocumentMut>()
        .map_err(MergeError::Existing)?;

    let fresh = toml::to_string(settings)
        .map_err(MergeError::Serialize)?
        .parse::<toml_edit::DocumentMut>()
        .map_err(MergeError::Existing)?;

    for (key, item) in fresh.iter() {
        doc[key] = item.clone();
    }
    Ok(doc.to_string())
}

#[cfg(unix)]
fn restrict_dir_permissions(dir: &Path) -> io::Result<()> {
    use std::os::unix::fs::{MetadataExt, PermissionsExt};

    let metadata = fs::metadata(dir)?;
    // Only modify permissions if we own the directory
    let our_uid = unsafe { libc::getuid() };
    if metadata.uid() == our_uid {
        let mode = metadata.permissions().mode() & 0o777;
        if mode & 0o077 != 0 {
            fs::set_permissions(dir, fs::Permissions::from_mode(0o700))?;
        }
    }
    Ok(())
}
