//! Message composer: text buffer, selection, and suggestion insertion.
//!
//! Positions count extended grapheme clusters, so a caret can never land
//! inside a multi-byte character or split an emoji sequence. Every operation
//! clamps its input selection to the buffer first and returns a selection
//! with `start <= end <= grapheme_count(buffer)`.

use thiserror::Error;
use unicode_segmentation::UnicodeSegmentation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EditError {
    /// The resolved target is empty or whitespace-only.
    #[error("No text found.")]
    EmptyTarget,
}

/// A `[start, end)` range over grapheme positions. `start == end` is a caret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    /// Range between `a` and `b`, in either order.
    #[must_use]
    pub const fn new(a: usize, b: usize) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    #[must_use]
    pub const fn caret(position: usize) -> Self {
        Self {
            start: position,
            end: position,
        }
    }

    #[must_use]
    pub const fn is_caret(self) -> bool {
        self.start >= self.end
    }

    /// Fit the range inside a buffer of `len` graphemes.
    #[must_use]
    pub fn clamp(self, len: usize) -> Self {
        let end = self.end.min(len);
        Self {
            start: self.start.min(end),
            end,
        }
    }
}

impl std::fmt::Display for Selection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{{},{}}}", self.start, self.end)
    }
}

#[must_use]
pub fn grapheme_count(text: &str) -> usize {
    text.graphemes(true).count()
}

fn byte_index_at(text: &str, grapheme_index: usize) -> usize {
    text.grapheme_indices(true)
        .nth(grapheme_index)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}

fn byte_range(text: &str, selection: Selection) -> std::ops::Range<usize> {
    byte_index_at(text, selection.start)..byte_index_at(text, selection.end)
}

/// Replace `range` with `inserted` and put the caret right after it.
fn splice(buffer: &str, range: std::ops::Range<usize>, inserted: &str) -> (String, Selection) {
    let mut result = String::with_capacity(buffer.len() - range.len() + inserted.len());
    result.push_str(&buffer[..range.start]);
    result.push_str(inserted);
    let caret_byte = result.len();
    result.push_str(&buffer[range.end..]);

    // Counted on the result: an insertion can merge with its neighbours.
    let caret = grapheme_count(&result[..caret_byte]);
    (result, Selection::caret(caret))
}

/// Text an AI action should operate on.
///
/// A non-empty selection yields exactly the selected range. A caret yields
/// the whole buffer.
pub fn resolve_target(buffer: &str, selection: Selection) -> Result<&str, EditError> {
    let selection = selection.clamp(grapheme_count(buffer));
    let target = if selection.is_caret() {
        buffer
    } else {
        &buffer[byte_range(buffer, selection)]
    };

    if target.trim().is_empty() {
        Err(EditError::EmptyTarget)
    } else {
        Ok(target)
    }
}

/// Replace the selected range with `inserted`, or insert at the caret.
///
/// The selection collapses to a caret just past the inserted text.
#[must_use]
pub fn insert_at(buffer: &str, selection: Selection, inserted: &str) -> (String, Selection) {
    let selection = selection.clamp(grapheme_count(buffer));
    let range = if selection.is_caret() {
        let at = byte_index_at(buffer, selection.end);
        at..at
    } else {
        byte_range(buffer, selection)
    };
    splice(buffer, range, inserted)
}

#[must_use]
pub fn type_character(buffer: &str, selection: Selection, key: &str) -> (String, Selection) {
    insert_at(buffer, selection, key)
}

/// Delete the selected range, or the grapheme before the caret.
///
/// A caret at position 0 leaves the buffer untouched.
#[must_use]
pub fn delete_backward(buffer: &str, selection: Selection) -> (String, Selection) {
    let selection = selection.clamp(grapheme_count(buffer));
    if !selection.is_caret() {
        return splice(buffer, byte_range(buffer, selection), "");
    }
    if selection.end == 0 {
        return (buffer.to_string(), Selection::caret(0));
    }
    let range = byte_range(buffer, Selection::new(selection.end - 1, selection.end));
    splice(buffer, range, "")
}

/// The single composer of a conversation. Owns the buffer and its selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Composer {
    text: String,
    selection: Selection,
}

impl Composer {
    /// Composer holding `text` with the caret at the end.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let selection = Selection::caret(grapheme_count(&text));
        Self { text, selection }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn selection(&self) -> Selection {
        self.selection
    }

    #[must_use]
    pub fn len(&self) -> usize {
        grapheme_count(&self.text)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Set the selection, clamped to the buffer.
    pub fn select(&mut self, selection: Selection) {
        self.selection = selection.clamp(self.len());
    }

    /// Text as seen through the current selection, for display.
    #[must_use]
    pub fn selected_text(&self) -> Option<&str> {
        let selection = self.selection.clamp(self.len());
        (!selection.is_caret()).then(|| &self.text[byte_range(&self.text, selection)])
    }

    pub fn resolve_target(&self) -> Result<&str, EditError> {
        resolve_target(&self.text, self.selection)
    }

    pub fn insert(&mut self, inserted: &str) {
        let (text, selection) = insert_at(&self.text, self.selection, inserted);
        self.apply(text, selection);
    }

    pub fn type_character(&mut self, key: &str) {
        let (text, selection) = type_character(&self.text, self.selection, key);
        self.apply(text, selection);
    }

    pub fn delete_backward(&mut self) {
        let (text, selection) = delete_backward(&self.text, self.selection);
        self.apply(text, selection);
    }

    pub fn clear(&mut self) {
        self.apply(String::new(), Selection::caret(0));
    }

    fn apply(&mut self, text: String, selection: Selection) {
        self.text = text;
        self.selection = selection;
    }
}
