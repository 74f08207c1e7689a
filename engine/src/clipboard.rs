//! Clipboard access.
//!
//! The system clipboard is opened lazily and may be missing entirely (no
//! display server, sandboxed test runs). Callers treat every failure the same
//! way, so the error carries only a description for the log.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClipboardError {
    #[error("Clipboard unavailable: {0}")]
    Unavailable(String),
}

pub trait Clipboard {
    fn read_text(&mut self) -> Result<String, ClipboardError>;

    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// The OS clipboard via `arboard`.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl SystemClipboard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn handle(&mut self) -> Result<&mut arboard::Clipboard, ClipboardError> {
        if self.inner.is_none() {
            let clipboard = arboard::Clipboard::new()
                .map_err(|e| ClipboardError::Unavailable(e.to_string()))?;
            self.inner = Some(clipboard);
        }
        self.inner
            .as_mut()
            .ok_or_else(|| ClipboardError::Unavailable("not initialized".to_string()))
    }
}

impl Clipboard for SystemClipboard {
    fn read_text(&mut self) -> Result<String, ClipboardError> {
        self.handle()?
            .get_text()
            .map_err(|e| ClipboardError::Unavailable(e.to_string()))
    }

    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.handle()?
            .set_text(text.to_string())
            .map_err(|e| ClipboardError::Unavailable(e.to_string()))
    }
}

/// In-memory clipboard. Reading before anything was written fails.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    contents: Option<String>,
}

impl MemoryClipboard {
    #[must_use]
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            contents: Some(text.into()),
        }
    }

    #[must_use]
    pub fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }
}

impl Clipboard for MemoryClipboard {
    fn read_text(&mut self) -> Result<String, ClipboardError> {
        self.contents
            .clone()
            .ok_or_else(|| ClipboardError::Unavailable("empty".to_string()))
    }

    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.contents = Some(text.to_string());
        Ok(())
    }
}

/// A clipboard that always fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableClipboard;

impl Clipboard for UnavailableClipboard {
    fn read_text(&mut self) -> Result<String, ClipboardError> {
        Err(ClipboardError::Unavailable("disabled".to_string()))
    }

    fn write_text(&mut self, _text: &str) -> Result<(), ClipboardError> {
        Err(ClipboardError::Unavailable("disabled".to_string()))
    }
}
