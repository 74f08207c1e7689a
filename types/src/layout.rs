//! Static keyboard layouts and the language cycle order.

use serde::{Deserialize, Serialize};

/// One language-specific key arrangement.
///
/// Layouts are compiled in; the set of ids never changes at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyboardLayout {
    id: &'static str,
    label: &'static str,
    locale: &'static str,
    rows: &'static [&'static [&'static str]],
}

impl KeyboardLayout {
    #[must_use]
    pub const fn id(&self) -> &'static str {
        self.id
    }

    /// Text shown on the space bar.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        self.label
    }

    #[must_use]
    pub const fn locale(&self) -> &'static str {
        self.locale
    }

    #[must_use]
    pub const fn rows(&self) -> &'static [&'static [&'static str]] {
        self.rows
    }

    /// Whether `key` is a letter key on this layout.
    #[must_use]
    pub fn has_key(&self, key: &str) -> bool {
        self.rows.iter().any(|row| row.contains(&key))
    }
}

// Entries are in cycle order.
static LAYOUTS: [KeyboardLayout; 4] = [
    KeyboardLayout {
        id: "en",
        label: "English",
        locale: "en-US",
        rows: &[
            &["q", "w", "e", "r", "t", "y", "u", "i", "o", "p"],
            &["a", "s", "d", "f", "g", "h", "j", "k", "l"],
            &["z", "x", "c", "v", "b", "n", "m"],
        ],
    },
    KeyboardLayout {
        id: "is",
        label: "Íslenska",
        locale: "is-IS",
        rows: &[
            &["q", "w", "e", "r", "t", "y", "u", "i", "o", "p", "ð", "ö"],
            &["a", "s", "d", "f", "g", "h", "j", "k", "l", "æ"],
            &["z", "x", "c", "v", "b", "n", "m", "þ"],
        ],
    },
    KeyboardLayout {
        id: "ru",
        label: "Русский",
        locale: "ru-RU",
        rows: &[
            &["й", "ц", "у", "к", "е", "н", "г", "ш", "щ", "з", "х"],
            &["ф", "ы", "в", "а", "п", "р", "о", "л", "д", "ж", "э"],
            &["я", "ч", "с", "м", "и", "т", "ь", "б", "ю"],
        ],
    },
    KeyboardLayout {
        id: "es",
        label: "Español",
        locale: "es-ES",
        rows: &[
            &["q", "w", "e", "r", "t", "y", "u", "i", "o", "p"],
            &["a", "s", "d", "f", "g", "h", "j", "k", "l", "ñ"],
            &["z", "x", "c", "v", "b", "n", "m"],
        ],
    },
];

/// Lookup over the compiled-in layouts.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutRegistry;

impl LayoutRegistry {
    /// All layouts, in cycle order.
    #[must_use]
    pub fn all() -> &'static [KeyboardLayout] {
        &LAYOUTS
    }

    /// Language ids in cycle order.
    pub fn order() -> impl Iterator<Item = &'static str> {
        LAYOUTS.iter().map(KeyboardLayout::id)
    }

    #[must_use]
    pub fn get(id: &str) -> Option<&'static KeyboardLayout> {
        LAYOUTS.iter().find(|layout| layout.id == id)
    }

    #[must_use]
    pub fn contains(id: &str) -> bool {
        Self::get(id).is_some()
    }

    /// The first layout in cycle order (English).
    #[must_use]
    pub fn default_layout() -> &'static KeyboardLayout {
        &LAYOUTS[0]
    }

    /// The layout after `id` in cycle order, wrapping at the end.
    ///
    /// An unknown id restarts the cycle at the first layout.
    #[must_use]
    pub fn next_after(id: &str) -> &'static KeyboardLayout {
        match LAYOUTS.iter().position(|layout| layout.id == id) {
            Some(index) => &LAYOUTS[(index + 1) % LAYOUTS.len()],
            None => Self::default_layout(),
        }
    }

    /// `id` if known, else `fallback`, else the default layout.
    #[must_use]
    pub fn resolve(id: &str, fallback: &str) -> &'static KeyboardLayout {
        Self::get(id)
            .or_else(|| Self::get(fallback))
            .unwrap_or_else(Self::default_layout)
    }
}

/// Language metadata attached to each backend request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageContext {
    pub language_id: String,
    pub locale: String,
    pub preferred_languages: Vec<String>,
}

impl LanguageContext {
    #[must_use]
    pub fn for_layout(layout: &KeyboardLayout) -> Self {
        Self {
            language_id: layout.id().to_string(),
            locale: layout.locale().to_string(),
            preferred_languages: LayoutRegistry::order().map(str::to_string).collect(),
        }
    }
}
