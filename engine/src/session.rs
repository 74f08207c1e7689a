//! One AI action at a time: dispatch, present, apply.
//!
//! ```text
//! Idle ──trigger──▶ Dispatching ──ok──▶ Presenting ──select/dismiss──▶ Idle
//!                        │
//!                        └──err──▶ Idle (failure reported once)
//! ```
//!
//! The dispatch future runs on the tokio runtime and reports back over a
//! oneshot channel. The owner polls with [`SuggestionSession::poll`] from its
//! event loop or awaits [`SuggestionSession::wait`]. Triggers that arrive
//! while a dispatch is in flight are ignored, not queued.

use nanokey_providers::{DispatchError, RoutingPolicy, dispatch};
use nanokey_types::{ActionMode, AppSettings, BackendResponse, Candidate, LanguageContext};
use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;

use crate::composer::{Composer, EditError};

type DispatchResult = Result<BackendResponse, DispatchError>;

/// Candidates returned for one invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct Presentation {
    mode: ActionMode,
    target: String,
    response: BackendResponse,
}

impl Presentation {
    #[must_use]
    pub fn mode(&self) -> ActionMode {
        self.mode
    }

    /// The text the action was run on.
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    #[must_use]
    pub fn response(&self) -> &BackendResponse {
        &self.response
    }

    /// At most two candidates, in backend order.
    #[must_use]
    pub fn candidates(&self) -> &[Candidate] {
        self.response.visible_candidates()
    }

    /// Overlay header, e.g. `nanobot • 600ms`.
    #[must_use]
    pub fn header(&self) -> Option<String> {
        self.response.debug_summary()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Dispatching {
        mode: ActionMode,
    },
    Presenting(Presentation),
}

impl SessionState {
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Dispatching { .. } => "dispatching",
            Self::Presenting(_) => "presenting",
        }
    }
}

/// What happened when an action was triggered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerOutcome {
    Started,
    /// A dispatch is already in flight.
    Ignored,
    /// The integration toggle is off.
    Disabled,
    EmptyTarget(EditError),
}

/// A finished dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Presented { mode: ActionMode, candidates: usize },
    Failed { mode: ActionMode, error: DispatchError },
}

#[derive(Debug)]
struct PendingDispatch {
    mode: ActionMode,
    target: String,
    receiver: oneshot::Receiver<DispatchResult>,
}

#[derive(Debug, Default)]
pub struct SuggestionSession {
    state: SessionState,
    pending: Option<PendingDispatch>,
}

impl SuggestionSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub fn is_dispatching(&self) -> bool {
        matches!(self.state, SessionState::Dispatching { .. })
    }

    #[must_use]
    pub fn presentation(&self) -> Option<&Presentation> {
        match &self.state {
            SessionState::Presenting(presentation) => Some(presentation),
            _ => None,
        }
    }

    /// Start `mode` on the composer's current target.
    ///
    /// Must be called from within a tokio runtime. A trigger while presenting
    /// replaces the shown candidates.
    pub fn trigger(
        &mut self,
        mode: ActionMode,
        composer: &Composer,
        settings: &AppSettings,
        keyboard_language: &str,
        router: &dyn RoutingPolicy,
    ) -> TriggerOutcome {
        if self.is_dispatching() {
            tracing::debug!(mode = mode.as_str(), "Trigger ignored: dispatch in flight");
            return TriggerOutcome::Ignored;
        }
        if !settings.nanobot_enabled {
            return TriggerOutcome::Disabled;
        }
        let target = match composer.resolve_target() {
            Ok(target) => target.to_string(),
            Err(err) => return TriggerOutcome::EmptyTarget(err),
        };

        let layout = settings.language_for(mode, keyboard_language);
        let language = LanguageContext::for_layout(layout);
        let future = dispatch(router, &target, mode, settings, &language);

        let (tx, receiver) = oneshot::channel();
        tokio::spawn(async move {
            let _ = tx.send(future.await);
        });

        self.state = SessionState::Dispatching { mode };
        self.pending = Some(PendingDispatch {
            mode,
            target,
            receiver,
        });
        TriggerOutcome::Started
    }

    /// Collect a finished dispatch without blocking.
    pub fn poll(&mut self) -> Option<SessionEvent> {
        let pending = self.pending.as_mut()?;
        let result = match pending.receiver.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Closed) => Err(DispatchError::Network("request aborted".to_string())),
        };
        let pending = self.pending.take()?;
        Some(self.finish(pending, result))
    }

    /// Wait for the in-flight dispatch, if any.
    ///
    /// Cancel-safe: dropping the future leaves the dispatch pending.
    pub async fn wait(&mut self) -> Option<SessionEvent> {
        let receiver = &mut self.pending.as_mut()?.receiver;
        let result = receiver
            .await
            .unwrap_or_else(|_| Err(DispatchError::Network("request aborted".to_string())));
        let pending = self.pending.take()?;
        Some(self.finish(pending, result))
    }

    fn finish(&mut self, pending: PendingDispatch, result: DispatchResult) -> SessionEvent {
        let mode = pending.mode;
        match result {
            Ok(response) => {
                let candidates = response.visible_candidates().len();
                tracing::info!(mode = mode.as_str(), candidates, "Suggestions received");
                self.state = SessionState::Presenting(Presentation {
                    mode,
                    target: pending.target,
                    response,
                });
                SessionEvent::Presented { mode, candidates }
            }
            Err(error) => {
                tracing::warn!(mode = mode.as_str(), %error, "Suggestion request failed");
                self.state = SessionState::Idle;
                SessionEvent::Failed { mode, error }
            }
        }
    }

    /// Visible candidate `index` while presenting.
    #[must_use]
    pub fn candidate(&self, index: usize) -> Option<&Candidate> {
        self.presentation()?.candidates().get(index)
    }

    /// Splice candidate `index` into the composer and return to idle.
    ///
    /// Returns the inserted text, or `None` if nothing is presented at `index`.
    pub fn select(&mut self, index: usize, composer: &mut Composer) -> Option<String> {
        let text = self.candidate(index)?.text.clone();
        composer.insert(&text);
        self.state = SessionState::Idle;
        Some(text)
    }

    /// Close the overlay. Returns whether anything was presented.
    pub fn dismiss(&mut self) -> bool {
        if matches!(self.state, SessionState::Presenting(_)) {
            self.state = SessionState::Idle;
            true
        } else {
            false
        }
    }
}
