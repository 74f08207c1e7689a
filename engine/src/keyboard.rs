//! Active keyboard layout and the language picker.

use nanokey_types::{KeyboardLayout, LayoutRegistry};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyboardError {
    #[error("Unknown language '{0}'")]
    UnknownLanguage(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyboardState {
    layout: &'static KeyboardLayout,
    picker_open: bool,
}

impl KeyboardState {
    /// Start on `language_id`, or the default layout if it is unknown.
    #[must_use]
    pub fn new(language_id: &str) -> Self {
        Self {
            layout: LayoutRegistry::get(language_id).unwrap_or_else(LayoutRegistry::default_layout),
            picker_open: false,
        }
    }

    #[must_use]
    pub fn layout(&self) -> &'static KeyboardLayout {
        self.layout
    }

    #[must_use]
    pub fn language_id(&self) -> &'static str {
        self.layout.id()
    }

    /// Caption for the space bar.
    #[must_use]
    pub fn space_label(&self) -> &'static str {
        self.layout.label()
    }

    #[must_use]
    pub fn picker_open(&self) -> bool {
        self.picker_open
    }

    /// Advance to the next layout in cycle order.
    pub fn cycle(&mut self) -> &'static KeyboardLayout {
        self.layout = LayoutRegistry::next_after(self.layout.id());
        self.layout
    }

    pub fn open_picker(&mut self) {
        self.picker_open = true;
    }

    pub fn close_picker(&mut self) {
        self.picker_open = false;
    }

    /// Switch to `language_id` and close the picker.
    ///
    /// An unknown id changes nothing; the picker stays as it was.
    pub fn pick(&mut self, language_id: &str) -> Result<&'static KeyboardLayout, KeyboardError> {
        let layout = LayoutRegistry::get(language_id)
            .ok_or_else(|| KeyboardError::UnknownLanguage(language_id.to_string()))?;
        self.layout = layout;
        self.picker_open = false;
        Ok(layout)
    }
}

impl Default for KeyboardState {
    fn default() -> Self {
        Self::new(LayoutRegistry::default_layout().id())
    }
}
