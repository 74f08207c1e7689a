//! Transient user notices.
//!
//! There is a single toast slot. Pushing replaces whatever is showing, and
//! each toast expires on its own deadline, so an old timer can never clear a
//! newer message.

use std::time::Duration;

use tokio::time::Instant;

/// How long a toast stays visible.
pub const TOAST_DURATION: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ToastId(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    id: ToastId,
    message: String,
    expires_at: Instant,
}

impl Toast {
    #[must_use]
    pub fn id(&self) -> ToastId {
        self.id
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Debug, Default)]
pub struct ToastSlot {
    current: Option<Toast>,
    next_id: u64,
}

impl ToastSlot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Show `message`, replacing any current toast.
    pub fn push(&mut self, message: impl Into<String>, now: Instant) -> ToastId {
        self.next_id = self.next_id.wrapping_add(1);
        let id = ToastId(self.next_id);
        let message = message.into();
        tracing::debug!(toast = %message, "Toast shown");
        self.current = Some(Toast {
            id,
            message,
            expires_at: now + TOAST_DURATION,
        });
        id
    }

    #[must_use]
    pub fn current(&self) -> Option<&Toast> {
        self.current.as_ref()
    }

    /// Drop the current toast once its deadline has passed.
    pub fn expire(&mut self, now: Instant) {
        if let Some(toast) = &self.current
            && now >= toast.expires_at
        {
            self.current = None;
        }
    }
}
