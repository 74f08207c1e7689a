//! Plain-text snapshot of the app, printed after every command.

use std::fmt::Write as _;

use nanokey_engine::{ActionMode, App, SessionState, SettingsField, nanokey_types::LayoutRegistry};

pub fn render(app: &App) -> String {
    let mut out = String::new();
    let composer = app.composer();
    let _ = writeln!(
        out,
        "buffer: {:?}  selection: {}  state: {}",
        composer.text(),
        composer.selection(),
        app.session().state().label()
    );

    let keyboard = app.keyboard();
    let _ = write!(out, "keyboard: {} [{}]", keyboard.space_label(), keyboard.language_id());
    if keyboard.picker_open() {
        let ids: Vec<_> = LayoutRegistry::order().collect();
        let _ = write!(out, "  picker: {}", ids.join(" "));
    }
    out.push('\n');

    let buttons: Vec<_> = ActionMode::ALL
        .iter()
        .map(|mode| format!("[{}]", mode.button_label()))
        .collect();
    let _ = writeln!(out, "actions: {}", buttons.join(" "));

    match app.session().state() {
        SessionState::Idle => {}
        SessionState::Dispatching { mode } => {
            let _ = writeln!(out, "thinking: {mode}...");
        }
        SessionState::Presenting(presentation) => {
            let header = presentation.header().unwrap_or_default();
            let _ = writeln!(out, "suggestions ({}) {header}", presentation.mode());
            for (index, candidate) in presentation.candidates().iter().enumerate() {
                let _ = writeln!(out, "  [{index}] {}", candidate.text);
            }
        }
    }

    if let Some(editor) = app.settings_editor() {
        let dirty = if editor.is_dirty() { " (unsaved)" } else { "" };
        let _ = writeln!(out, "settings{dirty}:");
        for field in SettingsField::ALL {
            let _ = writeln!(out, "  {:<10} {}", field.key(), editor.display(field));
        }
        if app.is_testing_connection() {
            out.push_str("  test: Testing...\n");
        } else if let Some(result) = editor.test_result() {
            let _ = writeln!(out, "  test: {result}");
        }
    }

    if let Some(message) = app.toast() {
        let _ = writeln!(out, "notice: {message}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use nanokey_engine::{AppSettings, Intent, MemoryClipboard};

    #[tokio::test]
    async fn idle_frame_shows_buffer_and_keyboard() {
        let mut app = App::new(AppSettings::default()).with_clipboard(MemoryClipboard::default());
        app.handle(Intent::Key("h".to_string()));
        app.handle(Intent::Key("i".to_string()));

        let frame = render(&app);
        assert!(frame.starts_with("buffer: \"hi\"  selection: {2,2}  state: idle\n"), "{frame}");
        assert!(frame.contains("keyboard: "), "{frame}");
        assert!(frame.contains("actions: [REPLY] [RWR] [TRN]\n"), "{frame}");
        assert!(!frame.contains("settings"), "{frame}");
    }

    #[tokio::test]
    async fn settings_and_notice_are_listed() {
        let mut app = App::new(AppSettings::default()).with_clipboard(MemoryClipboard::default());
        app.handle(Intent::OpenSettings);
        app.handle(Intent::EditSetting {
            field: SettingsField::TimeoutSeconds,
            value: "abc".to_string(),
        });

        let frame = render(&app);
        assert!(frame.contains("settings:\n"), "{frame}");
        assert!(frame.contains("  timeout    20\n"), "{frame}");
        assert!(frame.contains("notice: Expected a whole number of seconds, got 'abc'"), "{frame}");
    }

    #[tokio::test]
    async fn picker_lists_languages() {
        let mut app = App::new(AppSettings::default()).with_clipboard(MemoryClipboard::default());
        app.handle(Intent::LongPressSpace);
        assert!(render(&app).contains("picker: en is ru es"));
    }
}
