//! The keyboard simulator's state machine.
//!
//! [`App`] owns every piece of mutable state: the composer, the keyboard
//! layout, the suggestion session, the toast slot, and the live settings.
//! UI layers read through its getters and change it only by sending an
//! [`Intent`] to [`App::handle`]. Async work (suggestion dispatch, connection
//! tests) is collected by [`App::poll`] or awaited with
//! [`App::await_dispatch`] / [`App::await_health`].

mod settings;

pub use settings::{SettingsEditor, SettingsField, SettingsInputError, on_off};

use std::sync::Arc;

use nanokey_config::SettingsStore;
use nanokey_providers::{DefaultRouting, DispatchError, RoutingPolicy, check_health, describe_health};
use nanokey_types::{ActionMode, AppSettings};
use tokio::sync::oneshot;
use tokio::time::Instant;

use crate::clipboard::{Clipboard, SystemClipboard};
use crate::composer::{Composer, Selection};
use crate::keyboard::KeyboardState;
use crate::notifications::{Toast, ToastSlot};
use crate::session::{SessionEvent, SuggestionSession, TriggerOutcome};

pub const NOTICE_DISABLED: &str = "NanoBot integration is disabled. Enable it in Settings.";
pub const NOTICE_COPIED: &str = "Copied to clipboard";
pub const NOTICE_SIMULATED_PASTE: &str = "Clipboard unavailable — simulated paste";
pub const NOTICE_SETTINGS_SAVED: &str = "Settings Saved";

/// Inserted when the clipboard cannot be read.
pub const PASTE_PLACEHOLDER: &str = "[Pasted Text]";
/// Inserted by the emoji key.
pub const EMOJI_PLACEHOLDER: &str = "😊";

/// Everything a UI can ask the app to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// A letter, digit, punctuation, or space key.
    Key(String),
    Delete,
    Select(Selection),
    Action(ActionMode),
    SelectCandidate(usize),
    CopyCandidate(usize),
    DismissOverlay,
    CycleLanguage,
    LongPressSpace,
    PickLanguage(String),
    ClosePicker,
    Paste,
    Emoji,
    OpenSettings,
    EditSetting { field: SettingsField, value: String },
    TestConnection,
    SaveSettings,
    CancelSettings,
}

type HealthResult = Result<String, DispatchError>;

pub struct App {
    settings: AppSettings,
    store: Option<SettingsStore>,
    router: Arc<dyn RoutingPolicy>,
    clipboard: Box<dyn Clipboard>,
    composer: Composer,
    keyboard: KeyboardState,
    session: SuggestionSession,
    toasts: ToastSlot,
    settings_editor: Option<SettingsEditor>,
    pending_health: Option<oneshot::Receiver<HealthResult>>,
}

impl App {
    /// App on `settings` with the default routing and the system clipboard.
    ///
    /// Nothing is persisted until a store is attached with [`App::with_store`].
    #[must_use]
    pub fn new(settings: AppSettings) -> Self {
        let keyboard = KeyboardState::new(&settings.fallback_language);
        Self {
            settings,
            store: None,
            router: Arc::new(DefaultRouting::default()),
            clipboard: Box::new(SystemClipboard::new()),
            composer: Composer::default(),
            keyboard,
            session: SuggestionSession::new(),
            toasts: ToastSlot::new(),
            settings_editor: None,
            pending_health: None,
        }
    }

    /// App on whatever `store` holds, or defaults if it cannot be read.
    #[must_use]
    pub fn load(store: SettingsStore) -> Self {
        let settings = store.load_or_default();
        Self::new(settings).with_store(store)
    }

    #[must_use]
    pub fn with_store(mut self, store: SettingsStore) -> Self {
        self.store = Some(store);
        self
    }

    #[must_use]
    pub fn with_router(mut self, router: Arc<dyn RoutingPolicy>) -> Self {
        self.router = router;
        self
    }

    #[must_use]
    pub fn with_clipboard(mut self, clipboard: impl Clipboard + 'static) -> Self {
        self.clipboard = Box::new(clipboard);
        self
    }

    #[must_use]
    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    #[must_use]
    pub fn composer(&self) -> &Composer {
        &self.composer
    }

    #[must_use]
    pub fn keyboard(&self) -> &KeyboardState {
        &self.keyboard
    }

    #[must_use]
    pub fn session(&self) -> &SuggestionSession {
        &self.session
    }

    /// Message of the toast currently showing.
    #[must_use]
    pub fn toast(&self) -> Option<&str> {
        self.toasts.current().map(Toast::message)
    }

    #[must_use]
    pub fn settings_editor(&self) -> Option<&SettingsEditor> {
        self.settings_editor.as_ref()
    }

    #[must_use]
    pub fn is_testing_connection(&self) -> bool {
        self.pending_health.is_some()
    }

    fn notify(&mut self, message: impl Into<String>) {
        self.toasts.push(message, Instant::now());
    }

    pub fn handle(&mut self, intent: Intent) {
        match intent {
            Intent::Key(key) => self.composer.type_character(&key),
            Intent::Delete => self.composer.delete_backward(),
            Intent::Select(selection) => self.composer.select(selection),
            Intent::Action(mode) => self.trigger(mode),
            Intent::SelectCandidate(index) => {
                if let Some(text) = self.session.select(index, &mut self.composer) {
                    tracing::debug!(inserted_len = text.len(), "Candidate applied");
                }
            }
            Intent::CopyCandidate(index) => self.copy_candidate(index),
            Intent::DismissOverlay => {
                self.session.dismiss();
            }
            Intent::CycleLanguage => {
                let layout = self.keyboard.cycle();
                tracing::debug!(language = layout.id(), "Keyboard language changed");
            }
            Intent::LongPressSpace => self.keyboard.open_picker(),
            Intent::PickLanguage(id) => {
                if let Err(err) = self.keyboard.pick(&id) {
                    self.notify(err.to_string());
                }
            }
            Intent::ClosePicker => self.keyboard.close_picker(),
            Intent::Paste => self.paste(),
            Intent::Emoji => self.composer.type_character(EMOJI_PLACEHOLDER),
            Intent::OpenSettings => self.open_settings(),
            Intent::EditSetting { field, value } => self.edit_setting(field, &value),
            Intent::TestConnection => self.test_connection(),
            Intent::SaveSettings => self.save_settings(),
            Intent::CancelSettings => {
                self.settings_editor = None;
                self.pending_health = None;
            }
        }
    }

    fn trigger(&mut self, mode: ActionMode) {
        let outcome = self.session.trigger(
            mode,
            &self.composer,
            &self.settings,
            self.keyboard.language_id(),
            self.router.as_ref(),
        );
        match outcome {
            TriggerOutcome::Started | TriggerOutcome::Ignored => {}
            TriggerOutcome::Disabled => {
                self.notify(NOTICE_DISABLED);
                self.open_settings();
            }
            TriggerOutcome::EmptyTarget(err) => self.notify(err.to_string()),
        }
    }

    fn copy_candidate(&mut self, index: usize) {
        let Some(text) = self.session.candidate(index).map(|c| c.text.clone()) else {
            return;
        };
        if let Err(err) = self.clipboard.write_text(&text) {
            tracing::warn!(%err, "Clipboard write failed");
        }
        self.notify(NOTICE_COPIED);
    }

    fn paste(&mut self) {
        match self.clipboard.read_text() {
            Ok(text) => self.composer.insert(&text),
            Err(err) => {
                tracing::warn!(%err, "Clipboard read failed");
                self.composer.insert(PASTE_PLACEHOLDER);
                self.notify(NOTICE_SIMULATED_PASTE);
            }
        }
    }

    fn open_settings(&mut self) {
        if self.settings_editor.is_none() {
            self.settings_editor = Some(SettingsEditor::new(self.settings.clone()));
        }
    }

    fn edit_setting(&mut self, field: SettingsField, value: &str) {
        let Some(editor) = self.settings_editor.as_mut() else {
            return;
        };
        if let Err(err) = editor.set(field, value) {
            self.notify(err.to_string());
        }
    }

    fn test_connection(&mut self) {
        let Some(editor) = self.settings_editor.as_mut() else {
            return;
        };
        if self.pending_health.is_some() {
            return;
        }
        editor.set_test_result(None);
        let future = check_health(self.router.as_ref(), editor.draft());
        let (tx, rx) = oneshot::channel();
        tokio::spawn(async move {
            let _ = tx.send(future.await);
        });
        self.pending_health = Some(rx);
    }

    fn save_settings(&mut self) {
        let Some(editor) = self.settings_editor.as_ref() else {
            return;
        };
        let draft = editor.draft();
        if let Err(err) = draft.validate() {
            self.notify(err.to_string());
            return;
        }
        if let Some(store) = &self.store
            && let Err(err) = store.save(draft)
        {
            tracing::warn!(%err, "Failed to persist settings");
            self.notify(err.to_string());
            return;
        }

        if let Some(editor) = self.settings_editor.take() {
            self.settings = editor.into_draft();
        }
        self.pending_health = None;
        tracing::info!(
            base_url = %self.settings.base_url,
            backend = %self.settings.backend_type,
            "Settings applied"
        );
        self.notify(NOTICE_SETTINGS_SAVED);
    }

    /// Collect finished async work and expire the toast. Never blocks.
    pub fn poll(&mut self) {
        if let Some(event) = self.session.poll() {
            self.on_session_event(event);
        }
        if let Some(rx) = self.pending_health.as_mut() {
            match rx.try_recv() {
                Ok(result) => self.finish_health(&result),
                Err(oneshot::error::TryRecvError::Empty) => {}
                Err(oneshot::error::TryRecvError::Closed) => {
                    self.finish_health(&Err(DispatchError::Network("test aborted".to_string())));
                }
            }
        }
        self.toasts.expire(Instant::now());
    }

    /// Wait for the in-flight dispatch and apply its result.
    pub async fn await_dispatch(&mut self) -> Option<SessionEvent> {
        let event = self.session.wait().await?;
        self.on_session_event(event.clone());
        Some(event)
    }

    /// Wait for the running connection test and record its result line.
    pub async fn await_health(&mut self) -> Option<String> {
        let rx = self.pending_health.take()?;
        let result = rx
            .await
            .unwrap_or_else(|_| Err(DispatchError::Network("test aborted".to_string())));
        self.finish_health(&result);
        self.settings_editor
            .as_ref()
            .and_then(|editor| editor.test_result().map(str::to_string))
    }

    fn finish_health(&mut self, result: &HealthResult) {
        self.pending_health = None;
        let line = describe_health(result);
        tracing::info!(result = %line, "Connection test finished");
        if let Some(editor) = self.settings_editor.as_mut() {
            editor.set_test_result(Some(line));
        }
    }

    fn on_session_event(&mut self, event: SessionEvent) {
        if let SessionEvent::Failed { error, .. } = event {
            self.notify(error.to_string());
        }
    }
}
