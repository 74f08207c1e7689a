//! Core engine for NanoKey - keyboard state machine and orchestration.
//!
//! This crate contains the [`App`] state machine without any rendering:
//!
//! - [`composer`]: text buffer, selection, and suggestion insertion
//! - [`session`]: one AI action at a time, from dispatch to applied candidate
//! - [`keyboard`]: active layout and the language picker
//! - [`notifications`]: the transient toast slot
//! - [`clipboard`]: system and in-memory clipboards
//!
//! A front end reads state from `App` and forwards user input back to it as
//! [`Intent`]s.

pub mod clipboard;
pub mod composer;
pub mod keyboard;
pub mod notifications;
pub mod session;

mod app;

pub use app::{
    App, EMOJI_PLACEHOLDER, Intent, NOTICE_COPIED, NOTICE_DISABLED, NOTICE_SETTINGS_SAVED,
    NOTICE_SIMULATED_PASTE, PASTE_PLACEHOLDER, SettingsEditor, SettingsField, SettingsInputError,
    on_off,
};
pub use clipboard::{Clipboard, ClipboardError, MemoryClipboard, SystemClipboard, UnavailableClipboard};
pub use composer::{Composer, EditError, Selection};
pub use keyboard::{KeyboardError, KeyboardState};
pub use notifications::{TOAST_DURATION, Toast, ToastId, ToastSlot};
pub use session::{Presentation, SessionEvent, SessionState, SuggestionSession, TriggerOutcome};

pub use nanokey_config::{self, ConfigError, SettingsStore};
pub use nanokey_providers::{self, DispatchError};
pub use nanokey_types::{self, ActionMode, AppSettings, BackendType, LayoutRegistry};
